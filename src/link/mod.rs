//! One- and two-part entities with symmetric links
//!
//! A [`Whole`] is either a single standalone [`Partial`] or a linked pair of
//! them (the two halves of a split card, the two sides of a flip or
//! double-faced card, and their printings). Each half of a pair carries a
//! [`Link`] to the other half, tagged with whether it is the first half.
//!
//! Wholes are only ever built through [`WholeBuilder`] / [`LinkBuilder`],
//! which allocate the whole with [`Arc::new_cyclic`]: the halves receive a
//! weak handle to their owner while it is being built, so no field is ever
//! patched after construction. The whole owns both halves; links and
//! back-references are weak and therefore never form a reference cycle.

pub mod builder;

pub use builder::{LinkBuilder, PartialBuilder, Placement, WholeBuilder};

use crate::{CardError, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

/// How the two parts of a composite entity are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Two half-cards side by side ("Fire // Ice")
    Split,
    /// One card printed upright and upside down
    Flip,
    /// Front and back of a transforming card
    DoubleFaced,
}

impl Layout {
    pub fn name(self) -> &'static str {
        match self {
            Layout::Split => "split",
            Layout::Flip => "flip",
            Layout::DoubleFaced => "double-faced",
        }
    }

    /// Display name of the whole entity from its two part names
    pub fn join_names(self, first: &str, second: &str) -> String {
        match self {
            Layout::Split => format!("{first} // {second}"),
            Layout::Flip | Layout::DoubleFaced => first.to_string(),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reference from one half of a pair to the other
pub struct Link<T> {
    whole: Weak<Whole<T>>,
    first: bool,
}

impl<T> Link<T> {
    pub(crate) fn new(whole: Weak<Whole<T>>, first: bool) -> Self {
        Link { whole, first }
    }

    /// Whether the half holding this link is the first half
    pub fn is_first(&self) -> bool {
        self.first
    }

    /// The other half
    pub fn get(&self) -> Result<PartialRef<T>> {
        let whole = self.whole.upgrade().ok_or_else(|| {
            CardError::IllegalState("link resolved after its whole was released".to_string())
        })?;
        if !whole.is_composite() {
            return Err(CardError::IllegalState(
                "link inside a standalone whole".to_string(),
            ));
        }
        Ok(PartialRef {
            whole,
            first: !self.first,
        })
    }
}

impl<T> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link").field("first", &self.first).finish()
    }
}

/// One part of a [`Whole`]: an attribute payload plus its optional link
pub struct Partial<T> {
    value: T,
    link: Option<Link<T>>,
    whole: Weak<Whole<T>>,
}

impl<T> Partial<T> {
    pub(crate) fn new(value: T, link: Option<Link<T>>, whole: Weak<Whole<T>>) -> Self {
        Partial { value, link, whole }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Link to the other half, `None` for a standalone part
    pub fn link(&self) -> Option<&Link<T>> {
        self.link.as_ref()
    }

    /// The other half, if this part has one and its whole is alive
    pub fn other(&self) -> Option<PartialRef<T>> {
        self.link.as_ref().and_then(|link| link.get().ok())
    }

    /// The whole this part belongs to
    pub fn whole(&self) -> Option<Arc<Whole<T>>> {
        self.whole.upgrade()
    }

    /// Identity comparison
    pub fn same_as(&self, other: &Partial<T>) -> bool {
        std::ptr::eq(self, other)
    }
}

impl<T> Deref for Partial<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// Structural equality: same payload and same position in the pair
impl<T: PartialEq> PartialEq for Partial<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.link.as_ref().map(Link::is_first) == other.link.as_ref().map(Link::is_first)
    }
}

impl<T: fmt::Debug> fmt::Debug for Partial<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Partial")
            .field("value", &self.value)
            .field("link", &self.link)
            .finish()
    }
}

/// Serializes as the bare payload
impl<T: Serialize> Serialize for Partial<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

/// Owned handle to one part, keeping its whole alive
pub struct PartialRef<T> {
    whole: Arc<Whole<T>>,
    first: bool,
}

impl<T> PartialRef<T> {
    pub fn whole(&self) -> &Arc<Whole<T>> {
        &self.whole
    }
}

impl<T> Deref for PartialRef<T> {
    type Target = Partial<T>;

    fn deref(&self) -> &Partial<T> {
        match &*self.whole {
            Whole::Standalone(only) => only,
            Whole::Composite { pair, .. } => pair.get(self.first),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PartialRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

/// The two halves of a composite whole
#[derive(Debug, PartialEq)]
pub struct Pair<T> {
    first: Partial<T>,
    second: Partial<T>,
}

impl<T> Pair<T> {
    pub fn first(&self) -> &Partial<T> {
        &self.first
    }

    pub fn second(&self) -> &Partial<T> {
        &self.second
    }

    pub fn get(&self, first: bool) -> &Partial<T> {
        if first {
            &self.first
        } else {
            &self.second
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Partial<T>> {
        [&self.first, &self.second].into_iter()
    }
}

/// A complete entity: one standalone part or a linked pair
#[derive(Debug, PartialEq)]
pub enum Whole<T> {
    Standalone(Partial<T>),
    Composite { layout: Layout, pair: Pair<T> },
}

impl<T> Whole<T> {
    /// The single part of a standalone whole
    pub fn only(&self) -> Result<&Partial<T>> {
        match self {
            Whole::Standalone(only) => Ok(only),
            Whole::Composite { layout, .. } => Err(CardError::IllegalState(format!(
                "only() called on a {layout} whole"
            ))),
        }
    }

    /// The two parts of a composite whole
    pub fn pair(&self) -> Result<&Pair<T>> {
        match self {
            Whole::Composite { pair, .. } => Ok(pair),
            Whole::Standalone(_) => Err(CardError::IllegalState(
                "pair() called on a standalone whole".to_string(),
            )),
        }
    }

    pub fn layout(&self) -> Option<Layout> {
        match self {
            Whole::Standalone(_) => None,
            Whole::Composite { layout, .. } => Some(*layout),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Whole::Composite { .. })
    }

    /// The standalone part, or the first half of a pair
    pub fn front(&self) -> &Partial<T> {
        match self {
            Whole::Standalone(only) => only,
            Whole::Composite { pair, .. } => pair.first(),
        }
    }

    /// All parts in order: one for standalone, two for composite
    pub fn parts(&self) -> impl Iterator<Item = &Partial<T>> {
        let (front, back) = match self {
            Whole::Standalone(only) => (only, None),
            Whole::Composite { pair, .. } => (pair.first(), Some(pair.second())),
        };
        std::iter::once(front).chain(back)
    }

    pub fn len(&self) -> usize {
        if self.is_composite() {
            2
        } else {
            1
        }
    }
}

/// `{"only": part}` or `{"pair": {"layout": ..., "parts": [a, b]}}`
#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum WholeRepr<'a, T> {
    Only(&'a Partial<T>),
    Pair {
        layout: Layout,
        parts: [&'a Partial<T>; 2],
    },
}

impl<T: Serialize> Serialize for Whole<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let repr = match self {
            Whole::Standalone(only) => WholeRepr::Only(only),
            Whole::Composite { layout, pair } => WholeRepr::Pair {
                layout: *layout,
                parts: [pair.first(), pair.second()],
            },
        };
        repr.serialize(serializer)
    }
}

/// Parts separated by a `//` line
impl<T> fmt::Display for Whole<T>
where
    Partial<T>: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Whole::Standalone(only) => write!(f, "{only}"),
            Whole::Composite { pair, .. } => {
                write!(f, "{}\n//\n{}", pair.first(), pair.second())
            }
        }
    }
}
