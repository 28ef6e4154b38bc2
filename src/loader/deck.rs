//! Deck file loader (.dck format)

use crate::core::card::Card;
use crate::core::color::{Color, ColorSet};
use crate::core::lookup::CardLookup;
use crate::{CardError, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Deck loader for .dck files
pub struct DeckLoader;

impl DeckLoader {
    /// Load a deck from a .dck file
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a deck from its text content
    ///
    /// Lines are `N Card Name` or `N Card Name|SET`; `[Sideboard]` switches
    /// to the sideboard, other `[...]` headers and `#` comments are ignored.
    pub fn parse(content: &str) -> Result<DeckList> {
        let mut main_deck = Vec::new();
        let mut sideboard = Vec::new();
        let mut in_sideboard = false;

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(section) = line.strip_prefix('[') {
                in_sideboard = section.trim_end_matches(']').eq_ignore_ascii_case("sideboard");
                continue;
            }
            // Metadata lines such as "Name=Test Deck"
            if line.contains('=') {
                continue;
            }

            let entry = Self::parse_entry(line).ok_or_else(|| {
                CardError::InvalidDeckFormat(format!("line {}: {line:?}", line_no + 1))
            })?;
            if in_sideboard {
                sideboard.push(entry);
            } else {
                main_deck.push(entry);
            }
        }

        if main_deck.is_empty() {
            return Err(CardError::InvalidDeckFormat("Empty deck".to_string()));
        }

        Ok(DeckList {
            main_deck,
            sideboard,
        })
    }

    fn parse_entry(line: &str) -> Option<DeckEntry> {
        let (count_str, rest) = line.split_once(' ')?;
        let count = count_str.parse::<u8>().ok().filter(|&count| count > 0)?;
        let (card_name, set) = match rest.split_once('|') {
            Some((name, set)) => (name.trim(), Some(set.trim().to_string())),
            None => (rest.trim(), None),
        };
        if card_name.is_empty() {
            return None;
        }
        Some(DeckEntry {
            card_name: card_name.to_string(),
            count,
            set,
        })
    }
}

/// Represents a deck entry (card name, count and optional expansion code)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub card_name: String,
    pub count: u8,
    pub set: Option<String>,
}

/// Represents a complete deck list
#[derive(Debug, Clone)]
pub struct DeckList {
    pub main_deck: Vec<DeckEntry>,
    pub sideboard: Vec<DeckEntry>,
}

impl DeckList {
    /// Total cards in main deck
    pub fn total_cards(&self) -> usize {
        self.main_deck.iter().map(|e| e.count as usize).sum()
    }

    /// Total cards in sideboard
    pub fn sideboard_size(&self) -> usize {
        self.sideboard.iter().map(|e| e.count as usize).sum()
    }

    /// Resolve every entry against `lookup`
    ///
    /// Fails on the first unknown card or expansion code.
    pub fn resolve(&self, lookup: &impl CardLookup) -> Result<ResolvedDeck> {
        let resolve_all = |entries: &[DeckEntry]| -> Result<Vec<(Arc<Card>, u8)>> {
            entries
                .iter()
                .map(|entry| {
                    if let Some(code) = &entry.set {
                        lookup
                            .expansion_by_code(code)
                            .ok_or_else(|| CardError::ExpansionNotFound(code.clone()))?;
                    }
                    let card = lookup
                        .card_by_name(&entry.card_name)
                        .ok_or_else(|| CardError::CardNotFound(entry.card_name.clone()))?;
                    Ok((card, entry.count))
                })
                .collect()
        };
        Ok(ResolvedDeck {
            main_deck: resolve_all(&self.main_deck)?,
            sideboard: resolve_all(&self.sideboard)?,
        })
    }
}

/// A deck list whose entries point at cards
#[derive(Debug, Clone)]
pub struct ResolvedDeck {
    pub main_deck: Vec<(Arc<Card>, u8)>,
    pub sideboard: Vec<(Arc<Card>, u8)>,
}

impl ResolvedDeck {
    /// Colors of the main deck, from the colors of its cards
    pub fn colors(&self) -> ColorSet {
        self.main_deck
            .iter()
            .fold(ColorSet::EMPTY, |colors, (card, _)| colors.union(card.colors()))
    }

    /// Colored mana symbols of `color` across the main deck, weighted by count
    pub fn count_color(&self, color: Color) -> u32 {
        self.main_deck
            .iter()
            .fold(0, |total: u32, (card, count)| {
                total.saturating_add(card.count_color(color).saturating_mul(u32::from(*count)))
            })
    }

    /// Average converted cost of the main deck's nonland cards
    pub fn average_converted(&self) -> f64 {
        let (total, cards) = self
            .main_deck
            .iter()
            .filter(|(card, _)| !card.front().is_land())
            .fold((0u64, 0u64), |(total, cards), (card, count)| {
                let count = u64::from(*count);
                (total + u64::from(card.converted()) * count, cards + count)
            });
        if cards == 0 {
            0.0
        } else {
            total as f64 / cards as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::FaceBuilder;
    use crate::core::expansion::Expansion;
    use crate::core::mana::ManaCost;
    use crate::core::types::{CardType, Supertype};
    use crate::link::WholeBuilder;

    #[test]
    fn test_parse_simple_deck() {
        let content = r#"
[metadata]
Name=Test Deck

[Main]
20 Mountain
40 Lightning Bolt|LEA

[Sideboard]
15 Shock
"#;

        let deck = DeckLoader::parse(content).unwrap();
        assert_eq!(deck.main_deck.len(), 2);
        assert_eq!(deck.total_cards(), 60);

        assert_eq!(deck.main_deck[0].card_name, "Mountain");
        assert_eq!(deck.main_deck[0].count, 20);
        assert_eq!(deck.main_deck[0].set, None);

        assert_eq!(deck.main_deck[1].card_name, "Lightning Bolt");
        assert_eq!(deck.main_deck[1].count, 40);
        assert_eq!(deck.main_deck[1].set.as_deref(), Some("LEA"));

        assert_eq!(deck.sideboard.len(), 1);
        assert_eq!(deck.sideboard[0].card_name, "Shock");
        assert_eq!(deck.sideboard_size(), 15);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            DeckLoader::parse("[Main]\n"),
            Err(CardError::InvalidDeckFormat(_))
        ));
        assert!(DeckLoader::parse("[Main]\nfour Mountain\n").is_err());
        assert!(DeckLoader::parse("[Main]\n0 Mountain\n").is_err());
    }

    struct Pool {
        cards: Vec<Arc<Card>>,
    }

    impl CardLookup for Pool {
        fn card_by_name(&self, name: &str) -> Option<Arc<Card>> {
            self.cards.iter().find(|card| card.name() == name).cloned()
        }

        fn expansion_by_code(&self, code: &str) -> Option<Arc<Expansion>> {
            (code == "LEA").then(|| Arc::new(Expansion::new("LEA", "Limited Edition Alpha").unwrap()))
        }
    }

    fn pool() -> Pool {
        let mountain = WholeBuilder::only(
            FaceBuilder::new("Mountain")
                .supertype(Supertype::Basic)
                .card_type(CardType::Land)
                .subtype("Mountain"),
        );
        let bolt = WholeBuilder::only(
            FaceBuilder::new("Lightning Bolt")
                .mana_cost(ManaCost::parse("{R}").unwrap())
                .card_type(CardType::Instant),
        );
        let counterspell = WholeBuilder::only(
            FaceBuilder::new("Counterspell")
                .mana_cost(ManaCost::parse("{U}{U}").unwrap())
                .card_type(CardType::Instant),
        );
        let colossus = WholeBuilder::only(
            FaceBuilder::new("Colossus")
                .mana_cost(ManaCost::parse("{4294967295}{G}").unwrap())
                .card_type(CardType::Sorcery),
        );
        Pool {
            cards: vec![
                mountain.build().unwrap(),
                bolt.build().unwrap(),
                counterspell.build().unwrap(),
                colossus.build().unwrap(),
            ],
        }
    }

    #[test]
    fn test_resolve_deck() {
        let deck = DeckLoader::parse("20 Mountain\n30 Lightning Bolt|LEA\n10 Counterspell\n").unwrap();
        let resolved = deck.resolve(&pool()).unwrap();
        assert_eq!(resolved.main_deck.len(), 3);
        assert_eq!(resolved.colors(), ColorSet::pair(Color::Blue, Color::Red));
        assert_eq!(resolved.count_color(Color::Blue), 20);
        assert_eq!(resolved.count_color(Color::Red), 30);
        assert!((resolved.average_converted() - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_huge_costs_do_not_overflow() {
        let deck = DeckLoader::parse("60 Colossus\n").unwrap();
        let resolved = deck.resolve(&pool()).unwrap();
        assert_eq!(resolved.main_deck[0].0.converted(), u32::MAX);
        assert_eq!(resolved.average_converted(), f64::from(u32::MAX));
        assert_eq!(resolved.count_color(Color::Green), 60);
    }

    #[test]
    fn test_resolve_unknown() {
        let deck = DeckLoader::parse("4 Black Lotus\n").unwrap();
        assert!(matches!(deck.resolve(&pool()), Err(CardError::CardNotFound(_))));

        let deck = DeckLoader::parse("4 Lightning Bolt|XXX\n").unwrap();
        assert!(matches!(
            deck.resolve(&pool()),
            Err(CardError::ExpansionNotFound(_))
        ));
    }
}
