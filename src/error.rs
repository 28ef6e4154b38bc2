//! Error types for the card model

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardError {
    /// Mana cost or symbol text that does not match the cost grammar
    #[error("Malformed mana token: {0}")]
    MalformedToken(String),

    /// More than one generic group, or `{0}` combined with other groups
    #[error("Conflicting generic amount: {0}")]
    ConflictingGeneric(String),

    /// Misuse of the link protocol or of a `Whole` accessor
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// A value outside its domain (negative amount, unknown color code, ...)
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Expansion not found: {0}")]
    ExpansionNotFound(String),

    #[error("Invalid card format: {0}")]
    InvalidCardFormat(String),

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CardError>;
