//! Loaders for JSON set files and deck lists

/// Per-record debug logging, compiled out without the `verbose-logging` feature
///
/// Keeps `format!` work for every loaded record out of bulk loads.
macro_rules! debug_if_verbose {
    ($($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            tracing::debug!($($arg)*);
        }
    };
}

pub mod database;
pub mod deck;
pub mod set_file;

pub use database::{CardDatabase, CardFilter, LoadOptions};
pub use deck::{DeckEntry, DeckList, DeckLoader, ResolvedDeck};
pub use set_file::SetFile;
