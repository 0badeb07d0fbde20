//! Cursors anchored to the start or the end of a document.

use std::any::Any;

use super::{CursorState, LocationCursor};
use crate::types::{Location, Occurrence};

/// Matches only when the term's first occurrence sits at a fixed location
/// counted from the head of the document (1 = first token).
#[derive(Debug)]
pub struct HeadLocationCursor {
    term: Option<Box<dyn LocationCursor>>,
    anchor: Location,
    state: CursorState,
}

impl HeadLocationCursor {
    /// Create an unbound cursor anchored at `anchor`.
    pub fn new(anchor: Location) -> Self {
        HeadLocationCursor {
            term: None,
            anchor,
            state: CursorState::default(),
        }
    }

    /// Attach the term cursor of the current document.
    pub fn bind(&mut self, term: Box<dyn LocationCursor>) {
        self.term = Some(term);
        self.reset();
    }

    /// Detach the wrapped term cursor.
    pub fn unbind(&mut self) -> Option<Box<dyn LocationCursor>> {
        self.state.reset();
        self.term.take()
    }

    /// The anchor location.
    pub fn anchor(&self) -> Location {
        self.anchor
    }

    fn lower_bound_impl(&mut self, location: Location) -> Occurrence {
        if location > self.anchor {
            return Occurrence::UNDEFINED;
        }
        let Some(term) = self.term.as_mut() else {
            return Occurrence::UNDEFINED;
        };
        let first = term.lower_bound(1);
        if first.location == self.anchor {
            first
        } else {
            Occurrence::UNDEFINED
        }
    }
}

impl LocationCursor for HeadLocationCursor {
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
        self.state.reset();
    }

    fn clear(&mut self) {
        self.term = None;
        self.state.reset();
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Matches only when an occurrence ends a fixed distance before the end of
/// the document.
///
/// For an occurrence of length `L` the accepted start is
/// `document_length - L - offset + 1`. The owning node must call
/// [`TailLocationCursor::set_document_length`] before the cursor is used.
#[derive(Debug)]
pub struct TailLocationCursor {
    term: Option<Box<dyn LocationCursor>>,
    offset: u32,
    document_length: Option<u32>,
    state: CursorState,
}

impl TailLocationCursor {
    /// Create an unbound cursor `offset` tokens away from the tail.
    pub fn new(offset: u32) -> Self {
        TailLocationCursor {
            term: None,
            offset,
            document_length: None,
            state: CursorState::default(),
        }
    }

    /// Attach the term cursor of the current document.
    pub fn bind(&mut self, term: Box<dyn LocationCursor>) {
        self.term = Some(term);
        self.reset();
    }

    /// Detach the wrapped term cursor and forget the document length.
    pub fn unbind(&mut self) -> Option<Box<dyn LocationCursor>> {
        self.state.reset();
        self.document_length = None;
        self.term.take()
    }

    /// Length, in tokens, of the current document.
    pub fn set_document_length(&mut self, length: u32) {
        self.document_length = Some(length);
        self.state.reset();
    }

    /// Distance from the tail.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    fn expected_start(&self, document_length: u32, length: u32) -> Option<Location> {
        (document_length + 1).checked_sub(length.saturating_add(self.offset))
    }

    fn lower_bound_impl(&mut self, location: Location) -> Occurrence {
        let document_length = match self.document_length {
            Some(length) => length,
            None => panic!("tail-anchored cursor used before its document length was set"),
        };
        let mut candidate = location;
        loop {
            let Some(term) = self.term.as_mut() else {
                return Occurrence::UNDEFINED;
            };
            let hit = term.lower_bound(candidate);
            if hit.is_undefined() || hit.location > document_length {
                return Occurrence::UNDEFINED;
            }
            if self.expected_start(document_length, hit.length) == Some(hit.location) {
                return hit;
            }
            candidate = hit.location + 1;
        }
    }
}

impl LocationCursor for TailLocationCursor {
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
        self.state.reset();
    }

    fn clear(&mut self) {
        self.term = None;
        self.document_length = None;
        self.state.reset();
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::SliceLocationCursor;

    fn head(positions: Vec<Location>, anchor: Location) -> HeadLocationCursor {
        let mut cursor = HeadLocationCursor::new(anchor);
        cursor.bind(Box::new(SliceLocationCursor::new(positions, 1)));
        cursor
    }

    fn tail(positions: Vec<Location>, length: u32, offset: u32, dl: u32) -> TailLocationCursor {
        let mut cursor = TailLocationCursor::new(offset);
        cursor.bind(Box::new(SliceLocationCursor::new(positions, length)));
        cursor.set_document_length(dl);
        cursor
    }

    #[test]
    fn test_head_matches_first_token_once() {
        let mut cursor = head(vec![1, 4, 8], 1);
        assert_eq!(cursor.next(), Occurrence::new(1, 1));
        assert!(cursor.next().is_undefined());
        assert_eq!(cursor.term_frequency(), 1);
    }

    #[test]
    fn test_head_rejects_late_first_occurrence() {
        let mut cursor = head(vec![2, 4], 1);
        assert!(cursor.next().is_undefined());

        let mut cursor = head(vec![2, 4], 2);
        assert_eq!(cursor.next().location, 2);
    }

    #[test]
    fn test_tail_matches_last_token() {
        // Ten token document, term at 10 is the last token.
        let mut cursor = tail(vec![3, 10], 1, 0, 10);
        assert_eq!(cursor.next(), Occurrence::new(10, 1));
        assert!(cursor.next().is_undefined());
    }

    #[test]
    fn test_tail_accounts_for_match_length_and_offset() {
        // A two-token match ending one token before the end starts at 8.
        let mut cursor = tail(vec![8], 2, 1, 10);
        assert_eq!(cursor.next(), Occurrence::new(8, 2));

        let mut cursor = tail(vec![9], 2, 1, 10);
        assert!(cursor.next().is_undefined());
    }

    #[test]
    #[should_panic(expected = "document length")]
    fn test_tail_without_document_length_panics() {
        let mut cursor = TailLocationCursor::new(0);
        cursor.bind(Box::new(SliceLocationCursor::new(vec![1], 1)));
        cursor.next();
    }

    #[test]
    fn test_anchor_reset_round_trip() {
        let mut cursor = tail(vec![5, 7], 1, 0, 7);
        let first = cursor.next();
        cursor.reset();
        assert_eq!(cursor.next(), first);

        let mut cursor = head(vec![1], 1);
        let first = cursor.next();
        cursor.reset();
        assert_eq!(cursor.next(), first);
    }
}
