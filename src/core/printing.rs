//! Printings: a card as it appears in one expansion
//!
//! Printed attributes mirror the card's structure one level down. A split card
//! printed in an expansion has two printed faces, linked the same way its
//! characteristics are.

use crate::core::card::{Card, CardFace};
use crate::core::expansion::Expansion;
use crate::core::lookup::CardLookup;
use crate::core::types::{CollectorNumber, Rarity};
use crate::link::{Layout, Partial, PartialBuilder, Placement, Whole, WholeBuilder};
use crate::{CardError, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Per-face printed attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintedFace {
    #[serde(skip_serializing_if = "Option::is_none")]
    flavor_text: Option<String>,
    artist: String,
    collector_number: CollectorNumber,
    #[serde(skip_serializing_if = "Option::is_none")]
    watermark: Option<String>,
}

/// One printed face
pub type PartialPrinting = Partial<PrintedFace>;

impl PrintedFace {
    pub fn flavor_text(&self) -> Option<&str> {
        self.flavor_text.as_deref()
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn collector_number(&self) -> &CollectorNumber {
        &self.collector_number
    }

    pub fn watermark(&self) -> Option<&str> {
        self.watermark.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrintedFaceBuilder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flavor_text: Option<String>,
    artist: String,
    collector_number: CollectorNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    watermark: Option<String>,
}

impl PrintedFaceBuilder {
    pub fn new(artist: impl Into<String>, collector_number: CollectorNumber) -> Self {
        PrintedFaceBuilder {
            flavor_text: None,
            artist: artist.into(),
            collector_number,
            watermark: None,
        }
    }

    pub fn flavor_text(mut self, text: impl Into<String>) -> Self {
        self.flavor_text = Some(text.into());
        self
    }

    pub fn watermark(mut self, watermark: impl Into<String>) -> Self {
        self.watermark = Some(watermark.into());
        self
    }
}

impl PartialBuilder for PrintedFaceBuilder {
    type Output = PrintedFace;

    fn validate(&self, _placement: Placement) -> Result<()> {
        if self.artist.trim().is_empty() {
            return Err(CardError::InvalidValue(format!(
                "Printed face #{} has no artist",
                self.collector_number
            )));
        }
        Ok(())
    }

    fn finish(self, _placement: Placement) -> PrintedFace {
        PrintedFace {
            flavor_text: self.flavor_text,
            artist: self.artist,
            collector_number: self.collector_number,
            watermark: self.watermark,
        }
    }
}

/// A card printed in an expansion
#[derive(Debug, Clone)]
pub struct Printing {
    card: Arc<Card>,
    expansion: Arc<Expansion>,
    rarity: Rarity,
    faces: Arc<Whole<PrintedFace>>,
}

impl Printing {
    pub fn card(&self) -> &Arc<Card> {
        &self.card
    }

    pub fn expansion(&self) -> &Arc<Expansion> {
        &self.expansion
    }

    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    pub fn faces(&self) -> &Whole<PrintedFace> {
        &self.faces
    }

    /// Each card face with its printed face
    pub fn face_pairs(&self) -> impl Iterator<Item = (&CardFace, &PartialPrinting)> {
        self.card.parts().zip(self.faces.parts())
    }

    /// Collector number of the front face
    pub fn collector_number(&self) -> &CollectorNumber {
        self.faces.front().collector_number()
    }
}

/// `Fire // Ice (APC U #128)`
impl fmt::Display for Printing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {} #{})",
            self.card.name(),
            self.expansion.code(),
            self.rarity.code(),
            self.collector_number()
        )
    }
}

#[derive(Serialize)]
struct PrintingRepr<'a> {
    card: String,
    expansion: &'a str,
    rarity: Rarity,
    faces: &'a Whole<PrintedFace>,
}

impl Serialize for Printing {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        PrintingRepr {
            card: self.card.name(),
            expansion: self.expansion.code(),
            rarity: self.rarity,
            faces: &self.faces,
        }
        .serialize(serializer)
    }
}

/// A printing record as it appears in a set file; the card is referenced by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrintingBuilder {
    card: String,
    rarity: Rarity,
    faces: WholeBuilder<PrintedFaceBuilder>,
}

impl PrintingBuilder {
    pub fn new(card: impl Into<String>, rarity: Rarity, faces: WholeBuilder<PrintedFaceBuilder>) -> Self {
        PrintingBuilder {
            card: card.into(),
            rarity,
            faces,
        }
    }

    pub fn card_name(&self) -> &str {
        &self.card
    }

    /// Resolve the card and expansion, then build the printed faces
    ///
    /// The printed faces must have the same shape as the card: one face for
    /// a standalone card, a pair with the same layout otherwise.
    pub fn build(self, expansion_code: &str, lookup: &impl CardLookup) -> Result<Printing> {
        let card = lookup
            .card_by_name(&self.card)
            .ok_or_else(|| CardError::CardNotFound(self.card.clone()))?;
        let expansion = lookup
            .expansion_by_code(expansion_code)
            .ok_or_else(|| CardError::ExpansionNotFound(expansion_code.to_string()))?;

        if card.layout() != self.faces.layout() {
            return Err(CardError::InvalidCardFormat(format!(
                "Printing of {} in {} has layout {}, card has {}",
                self.card,
                expansion_code,
                layout_name(self.faces.layout()),
                layout_name(card.layout())
            )));
        }

        let faces = self.faces.build()?;
        Ok(Printing {
            card,
            expansion,
            rarity: self.rarity,
            faces,
        })
    }
}

fn layout_name(layout: Option<Layout>) -> &'static str {
    layout.map_or("standalone", |layout| layout.name())
}
