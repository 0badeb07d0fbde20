//! Positional verification shared by the nodes that filter candidates.

use std::fmt::Debug;

use crate::location::{LocationCursor, downcast_cursor};
use crate::types::{DocumentId, UNDEFINED_DOCUMENT_ID};

/// Builds and recycles the location cursor a node uses for exact checks.
///
/// `Source` is whatever the cursor's children come from: a single child node
/// for unary nodes, the child list for intersections.
pub(crate) trait PositionCheck: Debug + Send {
    type Cursor: LocationCursor + 'static;
    type Source: ?Sized;

    /// Cursor over the positions of document `id`, or `None` if the source
    /// has no positions for it.
    fn build(&mut self, source: &mut Self::Source, id: DocumentId) -> Option<Box<Self::Cursor>>;

    /// Hand the cursor's children back to the source and pool the cursor.
    fn recycle(&mut self, source: &mut Self::Source, cursor: Box<Self::Cursor>);
}

/// A [`PositionCheck`] plus the cursor that last passed it.
///
/// The cursor is kept so the match found during verification can be handed
/// out again by `location_cursor` without rebuilding it.
#[derive(Debug)]
pub(crate) struct Verified<P: PositionCheck> {
    pub(crate) check: P,
    cached: Option<Box<P::Cursor>>,
    cached_for: DocumentId,
}

impl<P: PositionCheck> Verified<P> {
    pub(crate) fn new(check: P) -> Self {
        Verified {
            check,
            cached: None,
            cached_for: UNDEFINED_DOCUMENT_ID,
        }
    }

    /// True if document `id` has at least one positional match.
    pub(crate) fn verify(&mut self, source: &mut P::Source, id: DocumentId) -> bool {
        self.discard(source);
        let Some(mut cursor) = self.check.build(source, id) else {
            return false;
        };
        if cursor.next().is_undefined() {
            self.check.recycle(source, cursor);
            return false;
        }
        cursor.reset();
        self.cached = Some(cursor);
        self.cached_for = id;
        true
    }

    /// Recycle the cached cursor, if any.
    pub(crate) fn discard(&mut self, source: &mut P::Source) {
        if let Some(cursor) = self.cached.take() {
            self.check.recycle(source, cursor);
        }
        self.cached_for = UNDEFINED_DOCUMENT_ID;
    }

    /// Cursor for document `id`, reusing the verified one when possible.
    pub(crate) fn take_cursor(
        &mut self,
        source: &mut P::Source,
        id: DocumentId,
    ) -> Option<Box<dyn LocationCursor>> {
        if self.cached_for == id {
            if let Some(cursor) = self.cached.take() {
                self.cached_for = UNDEFINED_DOCUMENT_ID;
                return Some(cursor);
            }
        }
        self.discard(source);
        self.check
            .build(source, id)
            .map(|cursor| cursor as Box<dyn LocationCursor>)
    }

    /// Take back a cursor handed out by [`Verified::take_cursor`].
    pub(crate) fn release(&mut self, source: &mut P::Source, cursor: Box<dyn LocationCursor>) {
        if let Some(cursor) = downcast_cursor::<P::Cursor>(cursor) {
            self.check.recycle(source, cursor);
        }
    }

    /// Number of matches in document `id`.
    pub(crate) fn term_frequency(&mut self, source: &mut P::Source, id: DocumentId) -> u32 {
        match self.take_cursor(source, id) {
            Some(mut cursor) => {
                let frequency = cursor.term_frequency();
                self.release(source, cursor);
                frequency
            }
            None => 0,
        }
    }
}
