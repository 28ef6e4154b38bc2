//! Expansion (set) metadata

use crate::{CardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A card set, identified by its short code ("APC", "KOK")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Expansion {
    code: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    block: Option<String>,
}

impl Expansion {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let expansion = Expansion {
            code: code.into(),
            name: name.into(),
            release_date: None,
            block: None,
        };
        expansion.validate()?;
        Ok(expansion)
    }

    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    pub fn with_block(mut self, block: impl Into<String>) -> Self {
        self.block = Some(block.into());
        self
    }

    /// Codes are non-empty alphanumeric; names are non-empty
    pub fn validate(&self) -> Result<()> {
        if self.code.is_empty() || !self.code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CardError::InvalidValue(format!(
                "Invalid expansion code: {:?}",
                self.code
            )));
        }
        if self.name.trim().is_empty() {
            return Err(CardError::InvalidValue(format!(
                "Expansion {} has no name",
                self.code
            )));
        }
        Ok(())
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn release_date(&self) -> Option<&str> {
        self.release_date.as_deref()
    }

    pub fn block(&self) -> Option<&str> {
        self.block.as_deref()
    }
}

impl fmt::Display for Expansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expansion() {
        let apc = Expansion::new("APC", "Apocalypse")
            .unwrap()
            .with_block("Invasion");
        assert_eq!(apc.code(), "APC");
        assert_eq!(apc.block(), Some("Invasion"));
        assert_eq!(apc.release_date(), None);
        assert_eq!(apc.to_string(), "Apocalypse (APC)");
    }

    #[test]
    fn test_invalid_expansion() {
        assert!(Expansion::new("", "Nameless").is_err());
        assert!(Expansion::new("A-B", "Dashed").is_err());
        assert!(Expansion::new("ABC", "  ").is_err());
    }

    #[test]
    fn test_expansion_json() {
        let json = r#"{"code": "KOK", "name": "Champions of Kamigawa", "release_date": "2004-10-01"}"#;
        let kok: Expansion = serde_json::from_str(json).unwrap();
        assert_eq!(kok.release_date(), Some("2004-10-01"));
        assert!(kok.validate().is_ok());
    }
}
