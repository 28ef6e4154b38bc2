//! Mana costs
//!
//! A cost is a generic amount plus a multiset of non-generic symbols, kept in
//! canonical order so that printing is deterministic and exactly inverts
//! parsing. Two costs are special: [`ManaCost::EMPTY`] (no cost at all, as on
//! a land) and [`ManaCost::ZERO`] (the printed `{0}`).
//!
//! Grammar: `cost := group*`, `group := "{" (symbol | digits) "}"`, no separators.

use crate::core::color::{Color, ColorSet};
use crate::core::symbol::ManaSymbol;
use crate::{CardError, Result};
use nom::{
    bytes::complete::take_while1, character::complete::char, combinator::all_consuming,
    multi::many1, sequence::delimited, IResult,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Symbol multiset: (symbol, multiplicity) in ascending symbol order
type SymbolCounts = SmallVec<[(ManaSymbol, u32); 4]>;

#[derive(Clone, PartialEq, Eq, Hash)]
enum Repr {
    Empty,
    Zero,
    Symbols { generic: u32, symbols: SymbolCounts },
}

/// An immutable mana cost
///
/// Converted value and colors are computed once at construction.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ManaCost {
    repr: Repr,
    converted: u32,
    colors: ColorSet,
}

impl ManaCost {
    /// No mana cost (lands, most back faces)
    pub const EMPTY: ManaCost = ManaCost {
        repr: Repr::Empty,
        converted: 0,
        colors: ColorSet::EMPTY,
    };

    /// The printed cost `{0}`
    pub const ZERO: ManaCost = ManaCost {
        repr: Repr::Zero,
        converted: 0,
        colors: ColorSet::EMPTY,
    };

    pub fn empty() -> Self {
        Self::EMPTY
    }

    /// Build a cost from a generic amount and symbols in any order
    ///
    /// Generic symbols among `symbols` are added to `generic`. With nothing
    /// left to pay this returns [`ManaCost::ZERO`], not `EMPTY`; ask for
    /// [`ManaCost::empty`] explicitly when a missing cost is meant.
    pub fn of(generic: u32, symbols: impl IntoIterator<Item = ManaSymbol>) -> Self {
        let mut generic = generic;
        let mut sorted: SmallVec<[ManaSymbol; 8]> = SmallVec::new();
        for symbol in symbols {
            match symbol {
                ManaSymbol::Generic(amount) => generic = generic.saturating_add(amount),
                other => sorted.push(other),
            }
        }

        if generic == 0 && sorted.is_empty() {
            return Self::ZERO;
        }

        sorted.sort_unstable();
        let mut counts = SymbolCounts::new();
        for symbol in sorted {
            match counts.last_mut() {
                Some((last, count)) if *last == symbol => *count += 1,
                _ => counts.push((symbol, 1)),
            }
        }

        Self::from_counts(generic, counts)
    }

    fn from_counts(generic: u32, symbols: SymbolCounts) -> Self {
        let converted = symbols
            .iter()
            .fold(generic, |total, (symbol, count)| {
                total.saturating_add(symbol.converted().saturating_mul(*count))
            });
        let colors = symbols
            .iter()
            .fold(ColorSet::EMPTY, |colors, (symbol, _)| colors.union(symbol.colors()));

        ManaCost {
            repr: Repr::Symbols { generic, symbols },
            converted,
            colors,
        }
    }

    /// Parse a cost such as `{2}{W}{W}`, `{X}{R}`, `{0}` or the empty string
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Ok(Self::EMPTY);
        }

        let (_, groups) = cost_groups(input)
            .map_err(|_| CardError::MalformedToken(format!("Malformed mana cost: {input:?}")))?;

        let mut generic: Option<u32> = None;
        let mut symbols = Vec::with_capacity(groups.len());
        for inner in &groups {
            match ManaSymbol::from_inner(inner)? {
                ManaSymbol::Generic(0) if groups.len() == 1 => return Ok(Self::ZERO),
                ManaSymbol::Generic(0) => {
                    return Err(CardError::ConflictingGeneric(format!(
                        "{{0}} combined with other symbols in {input:?}"
                    )))
                }
                ManaSymbol::Generic(amount) => {
                    if generic.replace(amount).is_some() {
                        return Err(CardError::ConflictingGeneric(format!(
                            "More than one generic amount in {input:?}"
                        )));
                    }
                }
                symbol => symbols.push(symbol),
            }
        }

        Ok(Self::of(generic.unwrap_or(0), symbols))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.repr, Repr::Empty)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.repr, Repr::Zero)
    }

    /// Generic amount (0 for `EMPTY` and `ZERO`)
    pub fn generic(&self) -> u32 {
        match &self.repr {
            Repr::Symbols { generic, .. } => *generic,
            Repr::Empty | Repr::Zero => 0,
        }
    }

    /// Distinct non-generic symbols with their multiplicities, in print order
    pub fn symbols(&self) -> impl Iterator<Item = (ManaSymbol, u32)> + '_ {
        let counts: &[(ManaSymbol, u32)] = match &self.repr {
            Repr::Symbols { symbols, .. } => symbols,
            Repr::Empty | Repr::Zero => &[],
        };
        counts.iter().copied()
    }

    /// Multiplicity of one symbol
    pub fn count(&self, symbol: ManaSymbol) -> u32 {
        self.symbols()
            .find(|(s, _)| *s == symbol)
            .map(|(_, count)| count)
            .unwrap_or(0)
    }

    /// Converted mana cost: generic plus each symbol's value times its multiplicity
    pub fn converted(&self) -> u32 {
        self.converted
    }

    /// Union of the colors of all symbols
    pub fn colors(&self) -> ColorSet {
        self.colors
    }

    /// Whether every symbol can be paid from a palette of available colors
    ///
    /// Only color presence is checked, never amounts.
    pub fn payable_with(&self, palette: ColorSet) -> bool {
        self.symbols().all(|(symbol, _)| symbol.payable_with(palette))
    }

    /// Number of symbols (with multiplicity) that carry `color`
    pub fn count_color(&self, color: Color) -> u32 {
        self.symbols()
            .filter(|(symbol, _)| symbol.colors().contains(color))
            .fold(0, |total: u32, (_, count)| total.saturating_add(count))
    }
}

/// Split `{a}{b}...` into the inner texts of its groups
fn cost_groups(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(many1(delimited(
        char('{'),
        take_while1(|c: char| c != '{' && c != '}'),
        char('}'),
    )))(input)
}

impl Default for ManaCost {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Empty => Ok(()),
            Repr::Zero => write!(f, "{{0}}"),
            Repr::Symbols { generic, symbols } => {
                if *generic > 0 {
                    write!(f, "{{{generic}}}")?;
                }
                for (symbol, count) in symbols {
                    for _ in 0..*count {
                        write!(f, "{symbol}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            Repr::Empty => write!(f, "ManaCost::EMPTY"),
            _ => write!(f, "ManaCost({self})"),
        }
    }
}

impl FromStr for ManaCost {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        ManaCost::parse(s)
    }
}

impl Serialize for ManaCost {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ManaCost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbol::ManaSymbol::*;

    const W: Color = Color::White;
    const U: Color = Color::Blue;
    const B: Color = Color::Black;
    const R: Color = Color::Red;
    const G: Color = Color::Green;

    #[test]
    fn test_mana_cost_parsing() {
        let cost = ManaCost::parse("{2}{W}{W}").unwrap();
        assert_eq!(cost.generic(), 2);
        assert_eq!(cost.count(Primary(W)), 2);
        assert_eq!(cost.converted(), 4);
        assert_eq!(cost.colors(), ColorSet::of(W));

        let cost2 = ManaCost::parse("{1}{U}{B}").unwrap();
        assert_eq!(cost2.generic(), 1);
        assert_eq!(cost2.count(Primary(U)), 1);
        assert_eq!(cost2.count(Primary(B)), 1);
        assert_eq!(cost2.converted(), 3);
    }

    #[test]
    fn test_converted_additivity() {
        let cost = ManaCost::parse("{3}{2/W}{2/W}{G/U}{R/P}{X}").unwrap();
        let expected = 3 + 2 * 2 + 1 + 1;
        assert_eq!(cost.converted(), expected);
        let summed: u32 = cost.generic()
            + cost
                .symbols()
                .map(|(symbol, count)| symbol.converted() * count)
                .sum::<u32>();
        assert_eq!(cost.converted(), summed);
    }

    #[test]
    fn test_canonical_print_order() {
        let cost = ManaCost::parse("{G}{W}{3}{W}{S}").unwrap();
        assert_eq!(cost.to_string(), "{3}{W}{W}{G}{S}");

        let cost = ManaCost::of(1, [ManaSymbol::hybrid(U, G).unwrap(), Primary(R), Variable, Phyrexian(B)]);
        assert_eq!(cost.to_string(), "{1}{R}{G/U}{B/P}{X}");
    }

    #[test]
    fn test_special_costs() {
        assert!(ManaCost::parse("").unwrap().is_empty());
        assert!(ManaCost::parse("{0}").unwrap().is_zero());
        assert_ne!(ManaCost::EMPTY, ManaCost::ZERO);
        assert_eq!(ManaCost::EMPTY.to_string(), "");
        assert_eq!(ManaCost::ZERO.to_string(), "{0}");
        assert_eq!(ManaCost::ZERO.converted(), 0);
    }

    #[test]
    fn test_of_zero_is_zero_not_empty() {
        let cost = ManaCost::of(0, []);
        assert!(cost.is_zero());
        assert!(!cost.is_empty());
        assert_eq!(cost, ManaCost::ZERO);
        assert!(ManaCost::empty().is_empty());
    }

    #[test]
    fn test_of_folds_generic_symbols() {
        let cost = ManaCost::of(1, [Generic(2), Primary(R)]);
        assert_eq!(cost, ManaCost::parse("{3}{R}").unwrap());
    }

    #[test]
    fn test_parse_rejections() {
        assert!(matches!(
            ManaCost::parse("{1}{2}"),
            Err(CardError::ConflictingGeneric(_))
        ));
        assert!(matches!(
            ManaCost::parse("{0}{W}"),
            Err(CardError::ConflictingGeneric(_))
        ));
        assert!(matches!(
            ManaCost::parse("{W}{0}"),
            Err(CardError::ConflictingGeneric(_))
        ));
        assert!(matches!(
            ManaCost::parse("{Q}"),
            Err(CardError::MalformedToken(_))
        ));
        assert!(matches!(
            ManaCost::parse("{W"),
            Err(CardError::MalformedToken(_))
        ));
        assert!(ManaCost::parse("{W} {U}").is_err());
        assert!(ManaCost::parse("W").is_err());
        assert!(ManaCost::parse("{{W}}").is_err());
        assert!(ManaCost::parse("{}").is_err());
        assert!(ManaCost::parse("{+1}").is_err());
    }

    #[test]
    fn test_payability() {
        let cost = ManaCost::parse("{W/U}{B}").unwrap();
        assert!(cost.payable_with(ColorSet::pair(W, B)));
        assert!(!cost.payable_with(ColorSet::of(U)));

        let generic_only = ManaCost::parse("{7}").unwrap();
        assert!(generic_only.payable_with(ColorSet::EMPTY));

        let phyrexian = ManaCost::parse("{1}{G/P}{2/R}").unwrap();
        assert!(phyrexian.payable_with(ColorSet::EMPTY));
    }

    #[test]
    fn test_count_color() {
        let cost = ManaCost::parse("{1}{W}{W}{W/U}{2/W}{U/P}").unwrap();
        assert_eq!(cost.count_color(W), 4);
        assert_eq!(cost.count_color(U), 2);
        assert_eq!(cost.count_color(G), 0);
        assert_eq!(cost.colors(), ColorSet::pair(W, U));
    }

    #[test]
    fn test_round_trip_examples() {
        for text in ["", "{0}", "{X}{R}", "{2}{W}{U}", "{15}", "{C}{C}", "{S}{S}{S}", "{W/P}{W/P}"] {
            let cost = ManaCost::parse(text).unwrap();
            assert_eq!(ManaCost::parse(&cost.to_string()).unwrap(), cost, "{text}");
        }
    }

    #[test]
    fn test_serde_as_string() {
        let cost = ManaCost::parse("{1}{U}{U}").unwrap();
        let json = serde_json::to_string(&cost).unwrap();
        assert_eq!(json, "\"{1}{U}{U}\"");
        let back: ManaCost = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cost);
        assert!(serde_json::from_str::<ManaCost>("\"{1}{1}\"").is_err());
    }
}
