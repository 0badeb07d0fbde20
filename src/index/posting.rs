//! Boundary to the index-access layer.

use std::fmt::Debug;

use crate::location::LocationCursor;
use crate::types::DocumentId;

/// A decoded postings list for one term: a document cursor that can also
/// hand out the positions of its current document.
///
/// Implementations live in the index-access layer; the query engine only
/// consumes this contract.
pub trait PostingCursor: Debug + Send {
    /// First document id at or after `id`, or
    /// [`crate::types::UNDEFINED_DOCUMENT_ID`].
    fn lower_bound(&mut self, id: DocumentId) -> DocumentId;

    /// Document the cursor is positioned on.
    fn current_id(&self) -> DocumentId;

    /// Number of documents in the list, or an upper estimate of it.
    fn estimate_count(&self) -> u32;

    /// Occurrences of the term in the current document.
    fn term_frequency(&self) -> u32;

    /// Positions of the term in the current document, or `None` when the
    /// cursor is not positioned on a document.
    fn location_cursor(&mut self) -> Option<Box<dyn LocationCursor>>;

    /// Give back a cursor obtained from [`PostingCursor::location_cursor`].
    fn release_location_cursor(&mut self, _cursor: Box<dyn LocationCursor>) {}

    /// Rewind before the first document.
    fn reset(&mut self);

    /// Independent cursor over the same list, positioned at the start.
    fn copy(&self) -> Box<dyn PostingCursor>;
}
