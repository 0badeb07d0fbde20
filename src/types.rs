//! Identifier and position primitives shared by every cursor.
//!
//! Exhaustion is signalled with the sentinels [`UNDEFINED_DOCUMENT_ID`] and
//! [`UNDEFINED_LOCATION`] rather than `Option`. Both sentinels are the
//! largest representable value, so "no more matches" compares greater than
//! every real identifier and the skip loops need no extra branch for it.

use serde::{Deserialize, Serialize};

/// Identifier of a document in the index. Ordered, compared numerically.
pub type DocumentId = u32;

/// Token offset inside one document.
pub type Location = u32;

/// Returned by document cursors when no further document matches.
pub const UNDEFINED_DOCUMENT_ID: DocumentId = u32::MAX;

/// Returned by location cursors when no further position matches.
pub const UNDEFINED_LOCATION: Location = u32::MAX;

/// A match inside a document: where it starts and how many tokens it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occurrence {
    /// Start position of the match.
    pub location: Location,
    /// Number of tokens covered by the match.
    pub length: u32,
}

impl Occurrence {
    /// The exhausted occurrence.
    pub const UNDEFINED: Occurrence = Occurrence {
        location: UNDEFINED_LOCATION,
        length: 0,
    };

    /// Create a new occurrence.
    pub fn new(location: Location, length: u32) -> Self {
        Occurrence { location, length }
    }

    /// True if this is the exhausted sentinel.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        self.location == UNDEFINED_LOCATION
    }

    /// One past the last token of the match.
    #[inline]
    pub fn end(&self) -> Location {
        self.location.saturating_add(self.length)
    }
}

/// Increment an id without running into the sentinel.
#[inline]
pub(crate) fn successor(value: u32) -> u32 {
    value.saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_sort_last() {
        assert!(UNDEFINED_DOCUMENT_ID > 1_000_000);
        assert!(Occurrence::UNDEFINED.is_undefined());
        assert!(!Occurrence::new(3, 1).is_undefined());
    }

    #[test]
    fn test_occurrence_end() {
        assert_eq!(Occurrence::new(5, 3).end(), 8);
        assert_eq!(Occurrence::UNDEFINED.end(), UNDEFINED_LOCATION);
    }

    #[test]
    fn test_successor_saturates() {
        assert_eq!(successor(4), 5);
        assert_eq!(successor(UNDEFINED_DOCUMENT_ID), UNDEFINED_DOCUMENT_ID);
    }
}
