//! Card database for looking up cards, expansions and printings
//!
//! Loads a directory of JSON set files. Files are read and decoded in
//! parallel; registration happens in path order so that the first definition
//! of a card name always wins.

use crate::core::card::Card;
use crate::core::color::ColorSet;
use crate::core::expansion::Expansion;
use crate::core::lookup::CardLookup;
use crate::core::printing::Printing;
use crate::core::types::{normalize_name, CardType, Rarity, Supertype};
use crate::loader::set_file::SetFile;
use crate::{CardError, Result};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Options for loading set files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Abort on the first bad file or record instead of skipping it
    pub strict: bool,
    /// Extension of set files, without the dot
    pub extension: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            strict: false,
            extension: "json".to_string(),
        }
    }
}

impl LoadOptions {
    pub fn strict() -> Self {
        LoadOptions {
            strict: true,
            ..Self::default()
        }
    }
}

/// Criteria for [`CardDatabase::filter`]; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFilter {
    /// Some face has this type
    pub card_type: Option<CardType>,
    /// Some face has this supertype
    pub supertype: Option<Supertype>,
    /// Shares a color with the card; the empty set selects colorless cards
    pub colors: Option<ColorSet>,
    /// Some printing has this rarity
    pub rarity: Option<Rarity>,
}

impl CardFilter {
    fn matches(&self, db: &CardDatabase, card: &Card) -> bool {
        let type_ok = self
            .card_type
            .map_or(true, |card_type| card.faces().any(|face| face.is_type(card_type)));
        let supertype_ok = self.supertype.map_or(true, |supertype| {
            card.faces().any(|face| face.supertypes().contains(&supertype))
        });
        let colors_ok = self.colors.map_or(true, |colors| {
            if colors.is_empty() {
                card.colors().is_empty()
            } else {
                card.colors().intersects(colors)
            }
        });
        let rarity_ok = self.rarity.map_or(true, |rarity| {
            db.printings_of(&card.name())
                .iter()
                .any(|printing| printing.rarity() == rarity)
        });
        type_ok && supertype_ok && colors_ok && rarity_ok
    }
}

/// Database of cards, expansions and printings
#[derive(Default)]
pub struct CardDatabase {
    /// Normalized name (full name and each face name) -> card
    cards: FxHashMap<String, Arc<Card>>,
    /// Cards in registration order
    order: Vec<Arc<Card>>,
    expansions: FxHashMap<String, Arc<Expansion>>,
    expansion_order: Vec<Arc<Expansion>>,
    /// Normalized full card name -> printings
    printings: FxHashMap<String, Vec<Printing>>,
    skipped: usize,
}

impl CardDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every set file below `dir`
    pub fn load_dir(dir: &Path, options: &LoadOptions) -> Result<Self> {
        if !dir.is_dir() {
            return Err(CardError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Set directory not found: {}", dir.display()),
            )));
        }
        let start = Instant::now();
        let paths = find_set_files(dir, &options.extension)?;
        info!(dir = %dir.display(), files = paths.len(), "loading set files");

        let mut sets = Vec::with_capacity(paths.len());
        let mut file_errors = 0;
        let loaded: Vec<Result<SetFile>> = paths
            .par_iter()
            .map(|path| SetFile::load_from_file(path))
            .collect();
        for result in loaded {
            match result {
                Ok(set) => sets.push(set),
                Err(e) if options.strict => return Err(e),
                Err(e) => {
                    warn!("skipping set file: {e}");
                    file_errors += 1;
                }
            }
        }

        let mut db = Self::from_set_files(sets, options)?;
        db.skipped += file_errors;
        info!(
            cards = db.len(),
            expansions = db.expansion_order.len(),
            skipped = db.skipped,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "card database loaded"
        );
        Ok(db)
    }

    /// Load a single set file into this database
    pub fn load_file(&mut self, path: &Path, options: &LoadOptions) -> Result<()> {
        let set = SetFile::load_from_file(path)?;
        self.add_set_files(vec![set], options)
    }

    /// Build a database from already parsed set files
    pub fn from_set_files(sets: Vec<SetFile>, options: &LoadOptions) -> Result<Self> {
        let mut db = CardDatabase::new();
        db.add_set_files(sets, options)?;
        Ok(db)
    }

    /// Register expansions, then cards, then printings
    ///
    /// The batch is built in a scratch database and merged only once it is
    /// complete, so a strict failure leaves `self` as it was. Printings are
    /// linked last so they can refer to cards from any of the given files.
    fn add_set_files(&mut self, sets: Vec<SetFile>, options: &LoadOptions) -> Result<()> {
        let mut batch = CardDatabase::new();
        for set in &sets {
            if self.get_expansion(set.code()).is_none() {
                batch.add_expansion(set.expansion.clone());
            }
        }

        let built: Vec<Vec<Result<Arc<Card>>>> = sets
            .par_iter()
            .map(|set| {
                (0..set.cards.len())
                    .into_par_iter()
                    .map(|index| set.card(index)?.build())
                    .collect()
            })
            .collect();
        for (set, cards) in sets.iter().zip(built) {
            for card in cards {
                match card {
                    Ok(card) => {
                        debug_if_verbose!(expansion = set.code(), card = %card.name(), "built card");
                        if self.contains(&card.name()) || !batch.add_card(card.clone()) {
                            debug_if_verbose!(card = %card.name(), "duplicate card definition ignored");
                        }
                    }
                    Err(e) => batch.skip(e, options)?,
                }
            }
        }

        let printings: Vec<Result<Printing>> = {
            let lookup = &Staged {
                base: &*self,
                batch: &batch,
            };
            sets.par_iter()
                .flat_map_iter(|set| {
                    (0..set.printings.len())
                        .map(move |index| set.printing(index)?.build(set.code(), lookup))
                })
                .collect()
        };
        for printing in printings {
            match printing {
                Ok(printing) => batch.add_printing(printing),
                Err(e) => batch.skip(e, options)?,
            }
        }

        self.merge(batch);
        Ok(())
    }

    fn merge(&mut self, batch: CardDatabase) {
        for expansion in batch.expansion_order {
            self.insert_expansion(expansion);
        }
        for card in batch.order {
            self.add_card(card);
        }
        for printing in batch.printings.into_values().flatten() {
            self.add_printing(printing);
        }
        self.skipped += batch.skipped;
    }

    fn skip(&mut self, error: CardError, options: &LoadOptions) -> Result<()> {
        if options.strict {
            return Err(error);
        }
        warn!("skipping record: {error}");
        self.skipped += 1;
        Ok(())
    }

    /// Add a card; returns false if a card with the same name already exists
    ///
    /// A two-faced card is also reachable through each face name, unless
    /// that name is already taken.
    pub fn add_card(&mut self, card: Arc<Card>) -> bool {
        let key = normalize_name(&card.name());
        if self.cards.contains_key(&key) {
            return false;
        }
        self.cards.insert(key, card.clone());
        if card.is_composite() {
            for face in card.faces() {
                self.cards
                    .entry(face.name().normalized())
                    .or_insert_with(|| card.clone());
            }
        }
        self.order.push(card);
        true
    }

    /// Add an expansion; an existing expansion with the same code is kept
    pub fn add_expansion(&mut self, expansion: Expansion) -> Arc<Expansion> {
        self.insert_expansion(Arc::new(expansion))
    }

    fn insert_expansion(&mut self, expansion: Arc<Expansion>) -> Arc<Expansion> {
        let key = expansion.code().to_ascii_uppercase();
        if let Some(existing) = self.expansions.get(&key) {
            return existing.clone();
        }
        self.expansions.insert(key, expansion.clone());
        self.expansion_order.push(expansion.clone());
        expansion
    }

    pub fn add_printing(&mut self, printing: Printing) {
        let key = normalize_name(&printing.card().name());
        self.printings.entry(key).or_default().push(printing);
    }

    /// Look up a card by full name or face name, ignoring case and diacritics
    pub fn get_card(&self, name: &str) -> Option<&Arc<Card>> {
        self.cards.get(&normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get_card(name).is_some()
    }

    pub fn get_expansion(&self, code: &str) -> Option<&Arc<Expansion>> {
        self.expansions.get(&code.to_ascii_uppercase())
    }

    /// All printings of the named card, in load order
    pub fn printings_of(&self, name: &str) -> &[Printing] {
        self.get_card(name)
            .and_then(|card| self.printings.get(&normalize_name(&card.name())))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Cards in registration order
    pub fn cards(&self) -> impl Iterator<Item = &Arc<Card>> {
        self.order.iter()
    }

    /// Cards matching `filter`, in registration order
    pub fn filter<'a>(&'a self, filter: &'a CardFilter) -> impl Iterator<Item = &'a Arc<Card>> + 'a {
        self.order.iter().filter(move |card| filter.matches(self, card))
    }

    /// Expansions in registration order
    pub fn expansions(&self) -> impl Iterator<Item = &Arc<Expansion>> {
        self.expansion_order.iter()
    }

    /// Number of distinct cards
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Files and records skipped during lenient loading
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl CardLookup for CardDatabase {
    fn card_by_name(&self, name: &str) -> Option<Arc<Card>> {
        self.get_card(name).cloned()
    }

    fn expansion_by_code(&self, code: &str) -> Option<Arc<Expansion>> {
        self.get_expansion(code).cloned()
    }
}

/// A database seen together with a batch that has not been merged into it
///
/// Entries already in `base` win over the batch.
struct Staged<'a> {
    base: &'a CardDatabase,
    batch: &'a CardDatabase,
}

impl CardLookup for Staged<'_> {
    fn card_by_name(&self, name: &str) -> Option<Arc<Card>> {
        self.base
            .card_by_name(name)
            .or_else(|| self.batch.card_by_name(name))
    }

    fn expansion_by_code(&self, code: &str) -> Option<Arc<Expansion>> {
        self.base
            .expansion_by_code(code)
            .or_else(|| self.batch.expansion_by_code(code))
    }
}

/// Set files below `dir`, sorted by path
fn find_set_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in jwalk::WalkDir::new(dir).sort(true) {
        let entry = entry.map_err(|e| {
            CardError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == extension) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
