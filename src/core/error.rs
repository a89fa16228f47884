use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnumError {
    #[error("Collision in enum values method '{0}'")]
    MemberCollision(String),

    #[error("Attribute '{0}' is not an enumerated attribute of model '{1}'")]
    UnknownAttribute(String, String),

    #[error("Member '{0}' not found on model '{1}'")]
    UnknownMember(String, String),

    #[error("Scope '{0}' not found on model '{1}'")]
    UnknownScope(String, String),

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Record {1} not found in table '{0}'")]
    RecordNotFound(String, u64),

    #[error("Validation failed: '{value}' is not an allowed value for attribute '{attribute}'")]
    ValueNotAllowed { attribute: String, value: String },

    #[error("Validation failed: attribute '{0}' cannot be null")]
    NullNotAllowed(String),

    #[error("Lock error: {0}")]
    LockError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Snapshot error: {0}")]
    SnapshotError(String),
}

pub type Result<T> = std::result::Result<T, EnumError>;

impl<T> From<std::sync::PoisonError<T>> for EnumError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<std::io::Error> for EnumError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
