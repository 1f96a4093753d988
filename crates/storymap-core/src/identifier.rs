//! Hierarchical cell identifiers.
//!
//! Every generated diagram node carries a `cell_id` built by joining the
//! slugified names of its ancestors with `/`. The same string is the DrawIO
//! `mxCell` id and the key into saved layout data, so it must be stable for
//! a given position in the story graph.
//!
//! Generated epic ids start with the [`EPIC_PREFIX`] segment so that every
//! generated container id contains at least one separator. Ids typed by
//! hand in the diagram tool never do, which is how reconciliation tells
//! generated nodes from user-created ones.

use std::fmt;

/// Separator between hierarchy segments.
pub const SEPARATOR: char = '/';

/// Leading segment of every generated epic id.
pub const EPIC_PREFIX: &str = "epic";

/// Leading segment of every generated increment lane id.
pub const INCREMENT_PREFIX: &str = "increment";

/// Converts a display name into a lowercase, dash-separated slug.
///
/// Runs of non-alphanumeric characters collapse into a single dash and
/// leading or trailing dashes are removed. An empty result becomes `"node"`.
///
/// # Examples
///
/// ```
/// use storymap_core::identifier::slugify;
///
/// assert_eq!(slugify("Enter Card Number"), "enter-card-number");
/// assert_eq!(slugify("  Pay / Refund!! "), "pay-refund");
/// assert_eq!(slugify("???"), "node");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("node");
    }
    slug
}

/// A hierarchical diagram cell identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(String);

impl CellId {
    /// Wraps an existing identifier string, e.g. one read from a diagram file.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the id of a generated epic.
    ///
    /// ```
    /// use storymap_core::identifier::CellId;
    ///
    /// assert_eq!(CellId::epic("Checkout").as_str(), "epic/checkout");
    /// ```
    pub fn epic(name: &str) -> Self {
        Self(format!("{EPIC_PREFIX}{SEPARATOR}{}", slugify(name)))
    }

    /// Builds the id of a generated increment lane.
    pub fn increment(name: &str) -> Self {
        Self(format!("{INCREMENT_PREFIX}{SEPARATOR}{}", slugify(name)))
    }

    /// Builds the id of a child named `name` below this id.
    ///
    /// ```
    /// use storymap_core::identifier::CellId;
    ///
    /// let story = CellId::epic("Checkout").child("Pay").child("Enter Card");
    /// assert_eq!(story.as_str(), "epic/checkout/pay/enter-card");
    /// ```
    pub fn child(&self, name: &str) -> Self {
        self.child_segment(&slugify(name))
    }

    /// Appends an already-formed segment without slugifying it.
    pub fn child_segment(&self, segment: &str) -> Self {
        Self(format!("{}{SEPARATOR}{segment}", self.0))
    }

    /// Returns a copy with a numeric suffix, used to break slug collisions.
    pub fn with_suffix(&self, n: usize) -> Self {
        Self(format!("{}-{n}", self.0))
    }

    /// Returns true if this id was produced by the generator rather than
    /// typed by hand in the diagram tool.
    pub fn is_generated(&self) -> bool {
        self.0.contains(SEPARATOR)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CellId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
