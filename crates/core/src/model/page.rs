use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based page position within a document, as the store records it.
///
/// The viewer control is 1-based; the conversion lives here so the
/// off-by-one boundary is crossed in exactly one place.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PageIndex(u32);

impl PageIndex {
    /// Creates a new `PageIndex` from a zero-based value.
    #[must_use]
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the underlying zero-based value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The 1-based number the viewer control displays.
    #[must_use]
    pub fn display_number(&self) -> u32 {
        self.0.saturating_add(1)
    }

    /// Converts a 1-based viewer number back to a store index.
    ///
    /// Returns `None` for 0, which no valid viewer control reports.
    #[must_use]
    pub fn from_display_number(number: u32) -> Option<Self> {
        number.checked_sub(1).map(Self)
    }
}

impl fmt::Debug for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageIndex({})", self.0)
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
