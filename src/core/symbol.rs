//! Mana symbols
//!
//! A closed catalogue of payment tokens. Every symbol except `{n}` comes
//! from a fixed table; `{n}` carries its own amount.
//!
//! Payability here is a *color presence* check: a symbol is payable with a
//! palette when the palette holds a color that can pay it. Amounts of
//! available mana are never tracked, so this is not a payment solver.

use crate::core::color::{Color, ColorSet};
use crate::{CardError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A single payment token in a mana cost, e.g. `{W}`, `{2/U}`, `{B/P}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManaSymbol {
    /// `{n}`: n mana of any type
    Generic(u32),
    /// `{C}`: one colorless mana
    Colorless,
    /// `{W}`, `{U}`, ...
    Primary(Color),
    /// `{W/U}`: payable with either color
    Hybrid(HybridPair),
    /// `{2/W}`: one mana of the color or two generic
    MonocoloredHybrid(Color),
    /// `{W/P}`: one mana of the color or 2 life
    Phyrexian(Color),
    /// `{X}`
    Variable,
    /// `{S}`: one mana from a snow source
    Snow,
}

use ManaSymbol::*;

/// The ten two-color pairs, in the order hybrid symbols are printed
pub const HYBRID_PAIRS: [(Color, Color); 10] = [
    (Color::White, Color::Blue),
    (Color::Blue, Color::Black),
    (Color::Black, Color::Red),
    (Color::Red, Color::Green),
    (Color::Green, Color::White),
    (Color::White, Color::Black),
    (Color::Blue, Color::Red),
    (Color::Black, Color::Green),
    (Color::Red, Color::White),
    (Color::Green, Color::Blue),
];

/// One of the ten color pairs a hybrid symbol can carry
///
/// Only obtainable through [`HybridPair::new`] or [`ManaSymbol::hybrid`], so
/// every hybrid symbol is in the catalogue and prints as a parseable token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HybridPair(u8);

impl HybridPair {
    /// The pair for two colors, in either order
    pub fn new(a: Color, b: Color) -> Result<Self> {
        HYBRID_PAIRS
            .iter()
            .position(|&pair| pair == (a, b) || pair == (b, a))
            .map(|index| HybridPair(index as u8))
            .ok_or_else(|| CardError::InvalidValue(format!("No hybrid symbol for {a}/{b}")))
    }

    /// Color printed first, e.g. W in `{W/U}`
    pub const fn first(self) -> Color {
        HYBRID_PAIRS[self.0 as usize].0
    }

    pub const fn second(self) -> Color {
        HYBRID_PAIRS[self.0 as usize].1
    }

    pub const fn colors(self) -> ColorSet {
        ColorSet::pair(self.first(), self.second())
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for HybridPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.first().code(), self.second().code())
    }
}

/// Every non-generic symbol, in canonical print order
pub const CATALOGUE: [ManaSymbol; 28] = {
    let mut table = [Colorless; 28];
    let mut i = 0;
    while i < 5 {
        let color = Color::ALL[i];
        table[i] = Primary(color);
        table[15 + i] = MonocoloredHybrid(color);
        table[20 + i] = Phyrexian(color);
        i += 1;
    }
    let mut h = 0;
    while h < 10 {
        table[5 + h] = Hybrid(HybridPair(h as u8));
        h += 1;
    }
    table[25] = Variable;
    table[26] = Colorless;
    table[27] = Snow;
    table
};

/// Inner token text (without braces) -> symbol, built on first use
static LOOKUP: OnceLock<FxHashMap<String, ManaSymbol>> = OnceLock::new();

fn lookup_table() -> &'static FxHashMap<String, ManaSymbol> {
    LOOKUP.get_or_init(|| {
        CATALOGUE
            .iter()
            .map(|symbol| (symbol.inner(), *symbol))
            .collect()
    })
}

impl ManaSymbol {
    /// Hybrid symbol for two colors, in either order
    pub fn hybrid(a: Color, b: Color) -> Result<Self> {
        HybridPair::new(a, b).map(Hybrid)
    }

    /// Look up a catalogue symbol by its inner text, e.g. "W/U" or "X"
    pub fn lookup(inner: &str) -> Option<ManaSymbol> {
        lookup_table().get(inner).copied()
    }

    /// Parse a bracketed token exactly as printed, e.g. `{2/G}` or `{3}`
    pub fn parse(token: &str) -> Result<Self> {
        let inner = token
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .ok_or_else(|| CardError::MalformedToken(format!("Unbracketed symbol: {token:?}")))?;
        Self::from_inner(inner)
    }

    /// Parse the text between the braces of a token
    pub(crate) fn from_inner(inner: &str) -> Result<Self> {
        if !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()) {
            let amount = inner.parse::<u32>().map_err(|_| {
                CardError::InvalidValue(format!("Generic amount out of range: {inner}"))
            })?;
            return Ok(Generic(amount));
        }
        Self::lookup(inner)
            .ok_or_else(|| CardError::MalformedToken(format!("Unknown mana symbol: {{{inner}}}")))
    }

    /// Contribution to converted mana cost
    pub const fn converted(self) -> u32 {
        match self {
            Generic(amount) => amount,
            MonocoloredHybrid(_) => 2,
            Variable => 0,
            Colorless | Primary(_) | Hybrid(..) | Phyrexian(_) | Snow => 1,
        }
    }

    pub const fn colors(self) -> ColorSet {
        match self {
            Primary(c) | MonocoloredHybrid(c) | Phyrexian(c) => ColorSet::of(c),
            Hybrid(pair) => pair.colors(),
            Generic(_) | Colorless | Variable | Snow => ColorSet::EMPTY,
        }
    }

    /// Whether a palette of available colors can pay this symbol
    ///
    /// Monocolored hybrid falls back to generic mana and phyrexian to life,
    /// so both are always payable.
    pub const fn payable_with(self, palette: ColorSet) -> bool {
        match self {
            Primary(c) => palette.contains(c),
            Hybrid(pair) => palette.intersects(pair.colors()),
            Generic(_) | Colorless | MonocoloredHybrid(_) | Phyrexian(_) | Variable | Snow => true,
        }
    }

    pub const fn is_generic(self) -> bool {
        matches!(self, Generic(_))
    }

    /// Position in [`CATALOGUE`]
    pub fn catalogue_index(self) -> Option<usize> {
        match self {
            Generic(_) => None,
            Primary(c) => Some(c as usize),
            Hybrid(pair) => Some(5 + pair.index()),
            MonocoloredHybrid(c) => Some(15 + c as usize),
            Phyrexian(c) => Some(20 + c as usize),
            Variable => Some(25),
            Colorless => Some(26),
            Snow => Some(27),
        }
    }

    /// Generic symbols first by amount, then catalogue order
    fn sort_key(self) -> (u32, u32) {
        match self.catalogue_index() {
            Some(index) => (1, index as u32),
            None => (0, self.converted()),
        }
    }

    fn inner(self) -> String {
        match self {
            Generic(amount) => amount.to_string(),
            Colorless => "C".to_string(),
            Primary(c) => c.code().to_string(),
            Hybrid(pair) => pair.to_string(),
            MonocoloredHybrid(c) => format!("2/{}", c.code()),
            Phyrexian(c) => format!("{}/P", c.code()),
            Variable => "X".to_string(),
            Snow => "S".to_string(),
        }
    }
}

impl Ord for ManaSymbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for ManaSymbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ManaSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.inner())
    }
}

impl FromStr for ManaSymbol {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        ManaSymbol::parse(s)
    }
}

impl Serialize for ManaSymbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ManaSymbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}
