//! Core card model: colors, mana, faces, printings

pub mod card;
pub mod color;
pub mod expansion;
pub mod lookup;
pub mod mana;
pub mod printing;
pub mod symbol;
pub mod types;

pub use card::{Card, CardFace, Characteristics, FaceBuilder};
pub use color::{Color, ColorSet};
pub use expansion::Expansion;
pub use lookup::CardLookup;
pub use mana::ManaCost;
pub use printing::{PartialPrinting, PrintedFace, PrintedFaceBuilder, Printing, PrintingBuilder};
pub use symbol::{HybridPair, ManaSymbol};
pub use types::{CardName, CardType, CollectorNumber, Rarity, Subtype, Supertype};
