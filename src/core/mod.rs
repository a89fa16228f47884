pub mod error;
pub mod value;

pub use error::{EnumError, Result};
pub use value::{RawValue, Token, TokenInput};
