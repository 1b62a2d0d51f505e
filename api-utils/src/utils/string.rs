//! String utility functions

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("invalid unsigned integer: {0:?}")]
    Invalid(String),

    #[error("value out of range for a 32-bit unsigned integer: {0}")]
    OutOfRange(String),
}

/// `userName` -> `UserName`. Only the first character changes.
pub fn camel_to_pascal(s: &str) -> String {
    map_first_char(s, char::to_uppercase)
}

/// `UserName` -> `userName`. Only the first character changes.
pub fn pascal_to_camel(s: &str) -> String {
    map_first_char(s, char::to_lowercase)
}

fn map_first_char<F, I>(s: &str, f: F) -> String
where
    F: FnOnce(char) -> I,
    I: Iterator<Item = char>,
{
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => f(first).chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a base-10 unsigned 32-bit integer. Signs and whitespace are rejected.
pub fn string_to_uint(s: &str) -> Result<u32, ConversionError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConversionError::Invalid(s.to_string()));
    }
    s.parse()
        .map_err(|_| ConversionError::OutOfRange(s.to_string()))
}
