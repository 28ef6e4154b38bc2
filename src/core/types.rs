//! Strongly-typed wrappers for card attributes
//!
//! Newtypes and closed enums so that names, type words, rarities and
//! collector numbers cannot be mixed up with bare strings.

use crate::{CardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card name (distinct from other string types)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardName(String);

impl CardName {
    pub fn new(s: impl Into<String>) -> Self {
        CardName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lookup key: ASCII-folded and lowercased, so "Æther Vial" and
    /// "aether vial" share a key
    pub fn normalized(&self) -> String {
        normalize_name(&self.0)
    }
}

/// Fold a raw name the same way [`CardName::normalized`] does
pub fn normalize_name(name: &str) -> String {
    deunicode::deunicode(name.trim()).to_lowercase()
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CardName {
    fn from(s: String) -> Self {
        CardName(s)
    }
}

impl From<&str> for CardName {
    fn from(s: &str) -> Self {
        CardName(s.to_string())
    }
}

/// Card subtype (creature type, artifact type, land type, etc.)
///
/// Examples: "Goblin", "Warrior", "Equipment", "Island"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subtype(String);

impl Subtype {
    pub fn new(s: impl Into<String>) -> Self {
        Subtype(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Subtype {
    fn from(s: &str) -> Self {
        Subtype(s.to_string())
    }
}

/// Supertypes, printed before the card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Supertype {
    Basic,
    Legendary,
    Ongoing,
    Snow,
    World,
}

impl Supertype {
    pub fn name(self) -> &'static str {
        match self {
            Supertype::Basic => "Basic",
            Supertype::Legendary => "Legendary",
            Supertype::Ongoing => "Ongoing",
            Supertype::Snow => "Snow",
            Supertype::World => "World",
        }
    }
}

impl fmt::Display for Supertype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Supertype {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Basic" => Ok(Supertype::Basic),
            "Legendary" => Ok(Supertype::Legendary),
            "Ongoing" => Ok(Supertype::Ongoing),
            "Snow" => Ok(Supertype::Snow),
            "World" => Ok(Supertype::World),
            _ => Err(CardError::InvalidValue(format!("Unknown supertype: {s}"))),
        }
    }
}

/// Card types in MTG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Artifact,
    Battle,
    Creature,
    Enchantment,
    Instant,
    Land,
    Planeswalker,
    Sorcery,
    Tribal,
}

impl CardType {
    pub fn name(self) -> &'static str {
        match self {
            CardType::Artifact => "Artifact",
            CardType::Battle => "Battle",
            CardType::Creature => "Creature",
            CardType::Enchantment => "Enchantment",
            CardType::Instant => "Instant",
            CardType::Land => "Land",
            CardType::Planeswalker => "Planeswalker",
            CardType::Sorcery => "Sorcery",
            CardType::Tribal => "Tribal",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CardType {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Artifact" => Ok(CardType::Artifact),
            "Battle" => Ok(CardType::Battle),
            "Creature" => Ok(CardType::Creature),
            "Enchantment" => Ok(CardType::Enchantment),
            "Instant" => Ok(CardType::Instant),
            "Land" => Ok(CardType::Land),
            "Planeswalker" => Ok(CardType::Planeswalker),
            "Sorcery" => Ok(CardType::Sorcery),
            "Tribal" => Ok(CardType::Tribal),
            _ => Err(CardError::InvalidValue(format!("Unknown card type: {s}"))),
        }
    }
}

/// Printing rarity, serialized by its one-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[serde(rename = "L")]
    BasicLand,
    #[serde(rename = "C")]
    Common,
    #[serde(rename = "U")]
    Uncommon,
    #[serde(rename = "R")]
    Rare,
    #[serde(rename = "M")]
    Mythic,
    #[serde(rename = "S")]
    Special,
}

impl Rarity {
    pub fn code(self) -> char {
        match self {
            Rarity::BasicLand => 'L',
            Rarity::Common => 'C',
            Rarity::Uncommon => 'U',
            Rarity::Rare => 'R',
            Rarity::Mythic => 'M',
            Rarity::Special => 'S',
        }
    }

    pub fn from_code(code: char) -> Result<Self> {
        match code {
            'L' => Ok(Rarity::BasicLand),
            'C' => Ok(Rarity::Common),
            'U' => Ok(Rarity::Uncommon),
            'R' => Ok(Rarity::Rare),
            'M' => Ok(Rarity::Mythic),
            'S' => Ok(Rarity::Special),
            _ => Err(CardError::InvalidValue(format!("Unknown rarity code: {code}"))),
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::BasicLand => "Basic Land",
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Mythic => "Mythic Rare",
            Rarity::Special => "Special",
        };
        f.write_str(name)
    }
}

/// Parses the one-letter code
impl FromStr for Rarity {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => Rarity::from_code(code),
            _ => Err(CardError::InvalidValue(format!("Unknown rarity code: {s}"))),
        }
    }
}

/// Collector number within an expansion: a positive number with an optional
/// letter suffix ("123", "45a")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectorNumber {
    number: u32,
    suffix: String,
}

impl CollectorNumber {
    pub fn new(number: i64) -> Result<Self> {
        Self::with_suffix(number, "")
    }

    pub fn with_suffix(number: i64, suffix: &str) -> Result<Self> {
        if number <= 0 {
            return Err(CardError::InvalidValue(format!(
                "Collector number must be positive: {number}"
            )));
        }
        let number = u32::try_from(number).map_err(|_| {
            CardError::InvalidValue(format!("Collector number out of range: {number}"))
        })?;
        if !suffix.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(CardError::InvalidValue(format!(
                "Invalid collector number suffix: {suffix:?}"
            )));
        }
        Ok(CollectorNumber {
            number,
            suffix: suffix.to_string(),
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl FromStr for CollectorNumber {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, suffix) = s.split_at(split);
        let number = digits
            .parse::<i64>()
            .map_err(|_| CardError::InvalidValue(format!("Invalid collector number: {s:?}")))?;
        Self::with_suffix(number, suffix)
    }
}

impl TryFrom<String> for CollectorNumber {
    type Error = CardError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<CollectorNumber> for String {
    fn from(number: CollectorNumber) -> Self {
        number.to_string()
    }
}

impl fmt::Display for CollectorNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.suffix)
    }
}
