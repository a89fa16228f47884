use crate::core::{EnumError, RawValue, Result};

/// Inclusion constraint installed by enum registration.
///
/// The raw stored value, when present, must equal the stringified form of
/// one of the allowed values. A null raw value is valid only when the
/// declaration opted into `allow_nil`.
#[derive(Debug, Clone)]
pub struct InclusionRule {
    attribute: String,
    allowed: Vec<String>,
    allow_nil: bool,
}

impl InclusionRule {
    pub(crate) fn new(attribute: impl Into<String>, allowed: Vec<String>, allow_nil: bool) -> Self {
        Self {
            attribute: attribute.into(),
            allowed,
            allow_nil,
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn check(&self, raw: &RawValue) -> Result<()> {
        match raw.as_str() {
            None => {
                if self.allow_nil {
                    Ok(())
                } else {
                    Err(EnumError::NullNotAllowed(self.attribute.clone()))
                }
            }
            Some(value) => {
                if self.allowed.iter().any(|allowed| allowed == value) {
                    Ok(())
                } else {
                    Err(EnumError::ValueNotAllowed {
                        attribute: self.attribute.clone(),
                        value: value.to_string(),
                    })
                }
            }
        }
    }
}
