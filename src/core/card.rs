//! Card faces and cards
//!
//! A [`Card`] is a [`Whole`] of faces; each face is a [`Partial`] carrying
//! [`Characteristics`]. The second half of a flip card usually has no cost of
//! its own and borrows the cost, color indicator and loyalty of the upright
//! half through its link.

use crate::core::color::{Color, ColorSet};
use crate::core::mana::ManaCost;
use crate::core::types::{CardName, CardType, Subtype, Supertype};
use crate::link::{Layout, Partial, PartialBuilder, Placement, Whole};
use crate::{CardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A card: one face, or two linked faces
pub type Card = Whole<Characteristics>;

/// One face of a card
pub type CardFace = Partial<Characteristics>;

/// The printed attributes of one card face
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Characteristics {
    name: CardName,
    #[serde(skip_serializing_if = "Option::is_none")]
    mana_cost: Option<ManaCost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color_indicator: Option<ColorSet>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    supertypes: Vec<Supertype>,
    types: Vec<CardType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    subtypes: Vec<Subtype>,
    #[serde(skip_serializing_if = "String::is_empty")]
    rules_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    power: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    toughness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    loyalty: Option<String>,
    /// Flipped face whose cost, color indicator and loyalty come from its partner
    #[serde(skip)]
    defined_by_partner: bool,
}

impl Characteristics {
    pub fn name(&self) -> &CardName {
        &self.name
    }

    /// The cost printed on this face itself, if any
    pub fn own_mana_cost(&self) -> Option<&ManaCost> {
        self.mana_cost.as_ref()
    }

    pub fn own_color_indicator(&self) -> Option<ColorSet> {
        self.color_indicator
    }

    pub fn own_loyalty(&self) -> Option<&str> {
        self.loyalty.as_deref()
    }

    pub fn supertypes(&self) -> &[Supertype] {
        &self.supertypes
    }

    pub fn types(&self) -> &[CardType] {
        &self.types
    }

    pub fn subtypes(&self) -> &[Subtype] {
        &self.subtypes
    }

    pub fn rules_text(&self) -> &str {
        &self.rules_text
    }

    pub fn power(&self) -> Option<&str> {
        self.power.as_deref()
    }

    pub fn toughness(&self) -> Option<&str> {
        self.toughness.as_deref()
    }

    pub fn is_defined_by_partner(&self) -> bool {
        self.defined_by_partner
    }

    pub fn is_type(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }

    pub fn is_creature(&self) -> bool {
        self.is_type(CardType::Creature)
    }

    pub fn is_land(&self) -> bool {
        self.is_type(CardType::Land)
    }

    /// Supertypes and types, then subtypes after a dash
    pub fn type_line(&self) -> String {
        let mut line = self
            .supertypes
            .iter()
            .map(|s| s.name())
            .chain(self.types.iter().map(|t| t.name()))
            .collect::<Vec<_>>()
            .join(" ");
        if !self.subtypes.is_empty() {
            let subtypes = self
                .subtypes
                .iter()
                .map(Subtype::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            line.push_str(" \u{2014} ");
            line.push_str(&subtypes);
        }
        line
    }
}

impl Partial<Characteristics> {
    fn partner_value<R>(&self, read: impl FnOnce(&Characteristics) -> R) -> Option<R> {
        if !self.defined_by_partner {
            return None;
        }
        self.other().map(|other| read(other.value()))
    }

    /// Mana cost, taken from the partner on a flipped face
    pub fn mana_cost(&self) -> ManaCost {
        if let Some(cost) = &self.mana_cost {
            return cost.clone();
        }
        self.partner_value(|partner| partner.mana_cost.clone())
            .flatten()
            .unwrap_or(ManaCost::EMPTY)
    }

    pub fn color_indicator(&self) -> Option<ColorSet> {
        self.color_indicator
            .or_else(|| self.partner_value(|partner| partner.color_indicator).flatten())
    }

    pub fn loyalty(&self) -> Option<String> {
        self.loyalty
            .clone()
            .or_else(|| self.partner_value(|partner| partner.loyalty.clone()).flatten())
    }

    /// Color indicator if set and non-empty, otherwise the colors of the cost
    pub fn colors(&self) -> ColorSet {
        match self.color_indicator() {
            Some(indicator) if !indicator.is_empty() => indicator,
            _ => self.mana_cost().colors(),
        }
    }

    pub fn converted(&self) -> u32 {
        self.mana_cost().converted()
    }
}

/// The canonical text block of a face
impl fmt::Display for Partial<Characteristics> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cost = self.mana_cost();
        if cost.is_empty() {
            writeln!(f, "{}", self.name)?;
        } else {
            writeln!(f, "{} {}", self.name, cost)?;
        }
        if let Some(indicator) = self.color_indicator().filter(|c| !c.is_empty()) {
            writeln!(f, "({indicator})")?;
        }
        write!(f, "{}", self.type_line())?;
        if !self.rules_text.is_empty() {
            write!(f, "\n{}", self.rules_text)?;
        }
        if let (Some(power), Some(toughness)) = (&self.power, &self.toughness) {
            write!(f, "\n{power}/{toughness}")?;
        } else if let Some(loyalty) = self.loyalty() {
            write!(f, "\nLoyalty: {loyalty}")?;
        }
        Ok(())
    }
}

impl Whole<Characteristics> {
    /// Full card name, joined according to the layout
    pub fn name(&self) -> String {
        match self {
            Whole::Standalone(only) => only.name.to_string(),
            Whole::Composite { layout, pair } => {
                layout.join_names(pair.first().name.as_str(), pair.second().name.as_str())
            }
        }
    }

    /// Faces in order
    pub fn faces(&self) -> impl Iterator<Item = &CardFace> {
        self.parts()
    }

    /// Union of the colors of all faces
    pub fn colors(&self) -> ColorSet {
        self.parts()
            .fold(ColorSet::EMPTY, |colors, face| colors.union(face.colors()))
    }

    /// Converted cost of the card as a whole: both halves of a split card
    /// count, otherwise only the front face
    pub fn converted(&self) -> u32 {
        match self.layout() {
            Some(Layout::Split) => self
                .parts()
                .fold(0, |total: u32, face| total.saturating_add(face.converted())),
            _ => self.front().converted(),
        }
    }

    /// Find a face by name (case-insensitive)
    pub fn face(&self, name: &str) -> Option<&CardFace> {
        self.parts()
            .find(|face| face.name.as_str().eq_ignore_ascii_case(name))
    }

    pub fn count_color(&self, color: Color) -> u32 {
        self.parts().fold(0, |total: u32, face| {
            total.saturating_add(face.mana_cost().count_color(color))
        })
    }
}

/// Builder for one card face; deserializes from the JSON face object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaceBuilder {
    name: CardName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mana_cost: Option<ManaCost>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color_indicator: Option<ColorSet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    supertypes: Vec<Supertype>,
    #[serde(default)]
    types: Vec<CardType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    subtypes: Vec<Subtype>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    rules_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    power: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    toughness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    loyalty: Option<String>,
}

impl FaceBuilder {
    pub fn new(name: impl Into<CardName>) -> Self {
        FaceBuilder {
            name: name.into(),
            mana_cost: None,
            color_indicator: None,
            supertypes: Vec::new(),
            types: Vec::new(),
            subtypes: Vec::new(),
            rules_text: String::new(),
            power: None,
            toughness: None,
            loyalty: None,
        }
    }

    pub fn mana_cost(mut self, cost: ManaCost) -> Self {
        self.mana_cost = Some(cost);
        self
    }

    pub fn color_indicator(mut self, colors: ColorSet) -> Self {
        self.color_indicator = Some(colors);
        self
    }

    pub fn supertype(mut self, supertype: Supertype) -> Self {
        self.supertypes.push(supertype);
        self
    }

    pub fn card_type(mut self, card_type: CardType) -> Self {
        self.types.push(card_type);
        self
    }

    pub fn subtype(mut self, subtype: impl Into<Subtype>) -> Self {
        self.subtypes.push(subtype.into());
        self
    }

    pub fn rules_text(mut self, text: impl Into<String>) -> Self {
        self.rules_text = text.into();
        self
    }

    pub fn power_toughness(mut self, power: impl Into<String>, toughness: impl Into<String>) -> Self {
        self.power = Some(power.into());
        self.toughness = Some(toughness.into());
        self
    }

    pub fn loyalty(mut self, loyalty: impl Into<String>) -> Self {
        self.loyalty = Some(loyalty.into());
        self
    }

    pub fn name(&self) -> &CardName {
        &self.name
    }
}

impl PartialBuilder for FaceBuilder {
    type Output = Characteristics;

    fn validate(&self, _placement: Placement) -> Result<()> {
        if self.name.as_str().trim().is_empty() {
            return Err(CardError::InvalidValue("Card face without a name".to_string()));
        }
        if self.types.is_empty() {
            return Err(CardError::InvalidValue(format!(
                "Card face {} has no types",
                self.name
            )));
        }
        if self.power.is_some() != self.toughness.is_some() {
            return Err(CardError::InvalidValue(format!(
                "Card face {} has only one of power and toughness",
                self.name
            )));
        }
        Ok(())
    }

    fn finish(self, placement: Placement) -> Characteristics {
        let defined_by_partner =
            placement == Placement::Second(Layout::Flip) && self.mana_cost.is_none();
        Characteristics {
            name: self.name,
            mana_cost: self.mana_cost,
            color_indicator: self.color_indicator,
            supertypes: self.supertypes,
            types: self.types,
            subtypes: self.subtypes,
            rules_text: self.rules_text,
            power: self.power,
            toughness: self.toughness,
            loyalty: self.loyalty,
            defined_by_partner,
        }
    }
}
