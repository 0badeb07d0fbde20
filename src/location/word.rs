//! Word-boundary verification.
//!
//! A term found by an n-gram or sub-word index is only a *word* match when
//! real word breaks surround it. Word breaks are stored as an ordinary
//! position list (the separator list); a [`WordPositionSet`] names the
//! offsets, relative to the term occurrence, at which a break must exist.

use std::any::Any;

use serde::{Deserialize, Serialize};

use super::{CursorState, LocationCursor};
use crate::types::{Location, Occurrence, successor};

/// How many word-boundary offsets must line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordMatchMode {
    /// Every offset in the set must be a boundary.
    Exact,
    /// Only the first offset must be a boundary.
    Simple,
}

/// Ordered offsets, relative to a term occurrence, that must be word breaks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPositionSet {
    offsets: Vec<u32>,
}

impl WordPositionSet {
    /// Build a set from arbitrary offsets. They are sorted and de-duplicated.
    pub fn new(mut offsets: Vec<u32>) -> Self {
        offsets.sort_unstable();
        offsets.dedup();
        WordPositionSet { offsets }
    }

    /// Boundaries before and after a word of `length` tokens.
    pub fn word(length: u32) -> Self {
        WordPositionSet::new(vec![0, length])
    }

    /// The offsets in increasing order.
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// True if no boundary is required.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Number of offsets.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }
}

/// Term cursor filtered by word boundaries found in a separator cursor.
#[derive(Debug)]
pub struct WordLocationCursor {
    term: Option<Box<dyn LocationCursor>>,
    separator: Option<Box<dyn LocationCursor>>,
    positions: WordPositionSet,
    mode: WordMatchMode,
    /// Last location looked up in the separator; lookups behind it need a rewind.
    last_lookup: Location,
    state: CursorState,
}

impl WordLocationCursor {
    /// Create an unbound cursor.
    pub fn new(positions: WordPositionSet, mode: WordMatchMode) -> Self {
        WordLocationCursor {
            term: None,
            separator: None,
            positions,
            mode,
            last_lookup: 0,
            state: CursorState::default(),
        }
    }

    /// Attach the term and separator cursors of the current document.
    pub fn bind(
        &mut self,
        term: Box<dyn LocationCursor>,
        separator: Option<Box<dyn LocationCursor>>,
    ) {
        self.term = Some(term);
        self.separator = separator;
        self.reset();
    }

    /// Detach and return the wrapped cursors so their owners can recycle them.
    pub fn unbind(
        &mut self,
    ) -> (
        Option<Box<dyn LocationCursor>>,
        Option<Box<dyn LocationCursor>>,
    ) {
        self.state.reset();
        (self.term.take(), self.separator.take())
    }

    /// The boundary offsets this cursor checks.
    pub fn positions(&self) -> &WordPositionSet {
        &self.positions
    }

    /// Exact or simple matching.
    pub fn mode(&self) -> WordMatchMode {
        self.mode
    }

    fn required_offsets(&self) -> usize {
        match self.mode {
            WordMatchMode::Exact => self.positions.len(),
            WordMatchMode::Simple => self.positions.len().min(1),
        }
    }

    fn is_bounded(&mut self, location: Location) -> bool {
        let required = self.required_offsets();
        if required == 0 {
            return true;
        }
        let Some(separator) = self.separator.as_mut() else {
            return false;
        };
        for &offset in &self.positions.offsets()[..required] {
            let boundary = location.saturating_add(offset);
            if boundary < self.last_lookup {
                separator.reset();
            }
            self.last_lookup = boundary;
            if !separator.find(boundary) {
                return false;
            }
        }
        true
    }

    fn lower_bound_impl(&mut self, location: Location) -> Occurrence {
        let mut candidate = location;
        loop {
            let hit = match self.term.as_mut() {
                Some(term) => term.lower_bound(candidate),
                None => return Occurrence::UNDEFINED,
            };
            if hit.is_undefined() || self.is_bounded(hit.location) {
                return hit;
            }
            // Step one position, not to the next known occurrence; overlapping
            // variants of the same word may still line up.
            candidate = successor(hit.location);
        }
    }
}

impl LocationCursor for WordLocationCursor {
    fn lower_bound(&mut self, location: Location) -> Occurrence {
        if let Some(hit) = self.state.cached(location) {
            return hit;
        }
        let hit = self.lower_bound_impl(location);
        self.state.store(hit)
    }

    fn current(&self) -> Occurrence {
        self.state.current()
    }

    fn next(&mut self) -> Occurrence {
        let target = self.state.next_target();
        self.lower_bound(target)
    }

    fn reset(&mut self) {
        if let Some(term) = self.term.as_mut() {
            term.reset();
        }
        if let Some(separator) = self.separator.as_mut() {
            separator.reset();
        }
        self.last_lookup = 0;
        self.state.reset();
    }

    fn clear(&mut self) {
        self.term = None;
        self.separator = None;
        self.last_lookup = 0;
        self.state.reset();
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
