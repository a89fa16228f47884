use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized, application-facing form of an allowed value.
///
/// Tokens are what accessors return and predicates compare against. String
/// and token input forms normalize to the same `Token`, so equality never
/// depends on which form the caller used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Storage representation of an enumerated attribute: a nullable string.
///
/// Raw storage never holds the token type directly; the backing store's
/// equality and indexing semantics operate on strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawValue(Option<String>);

impl RawValue {
    pub fn null() -> Self {
        Self(None)
    }

    pub fn new(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    pub fn from_token(token: Option<&Token>) -> Self {
        Self(token.map(|t| t.as_str().to_string()))
    }

    /// Null and empty raw storage both normalize to no token.
    pub fn to_token(&self) -> Option<Token> {
        match self.0.as_deref() {
            None | Some("") => None,
            Some(s) => Some(Token::new(s)),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

impl From<Option<String>> for RawValue {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

/// Input forms accepted by the plain setter: a token, a string, or null.
pub trait TokenInput {
    fn into_token(self) -> Option<Token>;
}

impl TokenInput for Option<Token> {
    fn into_token(self) -> Option<Token> {
        self
    }
}

impl TokenInput for Token {
    fn into_token(self) -> Option<Token> {
        Some(self)
    }
}

impl TokenInput for &Token {
    fn into_token(self) -> Option<Token> {
        Some(self.clone())
    }
}

impl TokenInput for &str {
    fn into_token(self) -> Option<Token> {
        Some(Token::from(self))
    }
}

impl TokenInput for String {
    fn into_token(self) -> Option<Token> {
        Some(Token::from(self))
    }
}

impl TokenInput for Option<&str> {
    fn into_token(self) -> Option<Token> {
        self.map(Token::from)
    }
}
