//! Lookup service used to link printings to their cards and expansions

use crate::core::card::Card;
use crate::core::expansion::Expansion;
use std::sync::Arc;

/// Resolves card names and expansion codes
pub trait CardLookup {
    /// Find a card by its full name or the name of one of its faces
    fn card_by_name(&self, name: &str) -> Option<Arc<Card>>;

    fn expansion_by_code(&self, code: &str) -> Option<Arc<Expansion>>;
}
