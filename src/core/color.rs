//! The five colors and sets of them

use crate::{CardError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Colors in MTG, declared in WUBRG order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
}

impl Color {
    /// All colors in WUBRG order
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// One-character code used in mana symbols and color indicators
    pub const fn code(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_code(code: char) -> Result<Self> {
        match code {
            'W' => Ok(Color::White),
            'U' => Ok(Color::Blue),
            'B' => Ok(Color::Black),
            'R' => Ok(Color::Red),
            'G' => Ok(Color::Green),
            _ => Err(CardError::InvalidValue(format!("Unknown color code: {code}"))),
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An immutable set of colors
///
/// Stored as a 5-bit mask in a `Copy` value, so structurally equal sets are
/// the same value and there is nothing to allocate or share.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorSet(u8);

impl ColorSet {
    pub const EMPTY: ColorSet = ColorSet(0);
    pub const ALL: ColorSet = ColorSet(0b1_1111);

    pub const fn of(color: Color) -> Self {
        ColorSet(color.bit())
    }

    pub const fn pair(a: Color, b: Color) -> Self {
        ColorSet(a.bit() | b.bit())
    }

    pub const fn contains(self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    pub const fn with(self, color: Color) -> Self {
        ColorSet(self.0 | color.bit())
    }

    pub const fn union(self, other: ColorSet) -> Self {
        ColorSet(self.0 | other.0)
    }

    pub const fn intersects(self, other: ColorSet) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_subset(self, other: ColorSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn is_multicolor(self) -> bool {
        self.len() > 1
    }

    /// Colors in WUBRG order
    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }

    /// Parse a run of upper-case color codes like "WU", in any order
    pub fn from_codes(codes: &str) -> Result<Self> {
        codes.chars().map(Color::from_code).collect()
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        iter.into_iter().fold(ColorSet::EMPTY, ColorSet::with)
    }
}

impl From<Color> for ColorSet {
    fn from(color: Color) -> Self {
        ColorSet::of(color)
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in self.iter() {
            write!(f, "{}", color.code())?;
        }
        Ok(())
    }
}

impl fmt::Debug for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColorSet({self})")
    }
}

impl FromStr for ColorSet {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        ColorSet::from_codes(s)
    }
}

impl Serialize for ColorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ColorSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let codes = String::deserialize(deserializer)?;
        codes.parse().map_err(serde::de::Error::custom)
    }
}
