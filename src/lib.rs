//! MTG card model
//!
//! Mana costs and symbols, two-faced cards built through a linking protocol,
//! per-expansion printings, and a loader for JSON set files.

pub mod core;
pub mod error;
pub mod link;
pub mod loader;

pub use error::{CardError, Result};
