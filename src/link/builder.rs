//! Builders for linked wholes
//!
//! Each part has its own builder carrying every attribute except the link.
//! The first builder is told about its partner with
//! [`LinkBuilder::prepare_link`]; building it finishes the partner first
//! (handing it a link back to the first half), then finishes itself with a
//! link to the partner. Ownership enforces the rest of the protocol: the
//! partner builder is moved into the first one, so it can't be built on its
//! own, and `build` consumes the builder, so nothing is built twice.

use crate::link::{Layout, Link, Pair, Partial, Whole};
use crate::{CardError, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};

/// Where a part ends up inside its whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    Standalone,
    First(Layout),
    Second(Layout),
}

impl Placement {
    pub fn layout(self) -> Option<Layout> {
        match self {
            Placement::Standalone => None,
            Placement::First(layout) | Placement::Second(layout) => Some(layout),
        }
    }

    pub fn is_second(self) -> bool {
        matches!(self, Placement::Second(_))
    }
}

/// Builder for the payload of one part
pub trait PartialBuilder {
    type Output;

    /// Check everything `finish` relies on; a whole is only allocated once
    /// every part has validated
    fn validate(&self, placement: Placement) -> Result<()>;

    fn finish(self, placement: Placement) -> Self::Output;
}

/// The first part's builder, optionally holding its partner's builder
pub struct LinkBuilder<B> {
    builder: B,
    partner: Option<(Layout, B)>,
}

impl<B: PartialBuilder> LinkBuilder<B> {
    pub fn new(builder: B) -> Self {
        LinkBuilder {
            builder,
            partner: None,
        }
    }

    /// Register the builder of the second part
    pub fn prepare_link(&mut self, layout: Layout, partner: B) -> Result<()> {
        if self.partner.is_some() {
            return Err(CardError::IllegalState(
                "prepare_link called twice on the same builder".to_string(),
            ));
        }
        self.partner = Some((layout, partner));
        Ok(())
    }

    pub fn is_linked(&self) -> bool {
        self.partner.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        match &self.partner {
            None => self.builder.validate(Placement::Standalone),
            Some((layout, partner)) => {
                self.builder.validate(Placement::First(*layout))?;
                partner.validate(Placement::Second(*layout))
            }
        }
    }

    /// Build the whole: standalone without a partner, else a linked pair
    pub fn build(self) -> Result<Arc<Whole<B::Output>>> {
        self.validate()?;
        Ok(Arc::new_cyclic(move |whole| self.finalize(whole)))
    }

    fn finalize(self, whole: &Weak<Whole<B::Output>>) -> Whole<B::Output> {
        match self.partner {
            None => Whole::Standalone(Partial::new(
                self.builder.finish(Placement::Standalone),
                None,
                whole.clone(),
            )),
            Some((layout, partner)) => {
                let second = Partial::new(
                    partner.finish(Placement::Second(layout)),
                    Some(Link::new(whole.clone(), false)),
                    whole.clone(),
                );
                let first = Partial::new(
                    self.builder.finish(Placement::First(layout)),
                    Some(Link::new(whole.clone(), true)),
                    whole.clone(),
                );
                Whole::Composite {
                    layout,
                    pair: Pair { first, second },
                }
            }
        }
    }
}

/// Serializable description of a whole, in the same shape a built
/// [`Whole`] serializes to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WholeBuilder<B> {
    Only(B),
    Pair { layout: Layout, parts: [B; 2] },
}

impl<B: PartialBuilder> WholeBuilder<B> {
    pub fn only(builder: B) -> Self {
        WholeBuilder::Only(builder)
    }

    pub fn pair(layout: Layout, first: B, second: B) -> Self {
        WholeBuilder::Pair {
            layout,
            parts: [first, second],
        }
    }

    pub fn layout(&self) -> Option<Layout> {
        match self {
            WholeBuilder::Only(_) => None,
            WholeBuilder::Pair { layout, .. } => Some(*layout),
        }
    }

    pub fn parts(&self) -> impl Iterator<Item = &B> {
        let parts: &[B] = match self {
            WholeBuilder::Only(builder) => std::slice::from_ref(builder),
            WholeBuilder::Pair { parts, .. } => parts,
        };
        parts.iter()
    }

    pub fn into_link_builder(self) -> LinkBuilder<B> {
        match self {
            WholeBuilder::Only(builder) => LinkBuilder::new(builder),
            WholeBuilder::Pair {
                layout,
                parts: [first, second],
            } => LinkBuilder {
                builder: first,
                partner: Some((layout, second)),
            },
        }
    }

    pub fn build(self) -> Result<Arc<Whole<B::Output>>> {
        self.into_link_builder().build()
    }
}
