//! JSON set files
//!
//! One file per expansion:
//!
//! ```json
//! {
//!   "expansion": {"code": "APC", "name": "Apocalypse"},
//!   "cards": [{"only": {"name": "...", "mana_cost": "{1}{R}", "types": ["Instant"]}}],
//!   "printings": [{"card": "...", "rarity": "C", "faces": {"only": {...}}}]
//! }
//! ```
//!
//! Card and printing records are kept as raw JSON until they are decoded one
//! by one, so a single bad record doesn't make the whole file unreadable.

use crate::core::card::FaceBuilder;
use crate::core::expansion::Expansion;
use crate::core::printing::PrintingBuilder;
use crate::link::WholeBuilder;
use crate::{CardError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct SetFile {
    pub expansion: Expansion,
    #[serde(default)]
    pub cards: Vec<Value>,
    #[serde(default)]
    pub printings: Vec<Value>,
    /// File the set was read from, for error messages
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl SetFile {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut set = Self::parse(&content).map_err(|e| {
            CardError::InvalidCardFormat(format!(
                "Failed to parse set file '{}': {e}",
                path.display()
            ))
        })?;
        set.source = Some(path.to_path_buf());
        Ok(set)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let set: SetFile = serde_json::from_str(content)?;
        set.expansion.validate()?;
        Ok(set)
    }

    pub fn code(&self) -> &str {
        self.expansion.code()
    }

    /// Decode the card record at `index`
    pub fn card(&self, index: usize) -> Result<WholeBuilder<FaceBuilder>> {
        let record = self.cards.get(index).ok_or_else(|| self.missing("card", index))?;
        WholeBuilder::deserialize(record).map_err(|e| self.bad_record("card", index, e))
    }

    /// Decode the printing record at `index`
    pub fn printing(&self, index: usize) -> Result<PrintingBuilder> {
        let record = self
            .printings
            .get(index)
            .ok_or_else(|| self.missing("printing", index))?;
        PrintingBuilder::deserialize(record).map_err(|e| self.bad_record("printing", index, e))
    }

    fn location(&self) -> String {
        match &self.source {
            Some(path) => format!("{} ({})", self.code(), path.display()),
            None => self.code().to_string(),
        }
    }

    fn missing(&self, kind: &str, index: usize) -> CardError {
        CardError::InvalidCardFormat(format!("{}: no {kind} record #{index}", self.location()))
    }

    fn bad_record(&self, kind: &str, index: usize, e: serde_json::Error) -> CardError {
        CardError::InvalidCardFormat(format!(
            "{}: {kind} record #{index}: {e}",
            self.location()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Layout;

    const APOCALYPSE: &str = r#"{
        "expansion": {"code": "APC", "name": "Apocalypse", "block": "Invasion"},
        "cards": [
            {"pair": {"layout": "split", "parts": [
                {"name": "Fire", "mana_cost": "{1}{R}", "types": ["Instant"]},
                {"name": "Ice", "mana_cost": "{1}{U}", "types": ["Instant"]}
            ]}},
            {"only": {"name": "Broken", "mana_cost": "{Q}", "types": ["Instant"]}}
        ],
        "printings": [
            {"card": "Fire // Ice", "rarity": "U", "faces": {"pair": {"layout": "split", "parts": [
                {"artist": "Franz Vohwinkel", "collector_number": "128a"},
                {"artist": "Franz Vohwinkel", "collector_number": "128b"}
            ]}}}
        ]
    }"#;

    #[test]
    fn test_parse_set_file() {
        let set = SetFile::parse(APOCALYPSE).unwrap();
        assert_eq!(set.code(), "APC");
        assert_eq!(set.cards.len(), 2);

        let fire_ice = set.card(0).unwrap();
        assert_eq!(fire_ice.layout(), Some(Layout::Split));
        assert_eq!(set.printing(0).unwrap().card_name(), "Fire // Ice");
    }

    #[test]
    fn test_bad_record_is_isolated() {
        let set = SetFile::parse(APOCALYPSE).unwrap();
        let err = set.card(1).unwrap_err();
        assert!(matches!(err, CardError::InvalidCardFormat(_)));
        assert!(err.to_string().contains("card record #1"));
        assert!(set.card(5).is_err());
    }

    #[test]
    fn test_invalid_expansion_rejected() {
        let json = r#"{"expansion": {"code": "", "name": "Nothing"}}"#;
        assert!(matches!(SetFile::parse(json), Err(CardError::InvalidValue(_))));
        assert!(SetFile::parse("not json").is_err());
    }
}
