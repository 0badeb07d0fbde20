//! Document-skipping query nodes.
//!
//! A query is a tree of [`QueryNode`]s. The caller walks the root with
//! increasing ids through [`QueryNode::lower_bound`]; nodes intersect their
//! children's answers and, unless a rough answer is enough, verify positional
//! constraints with a [`LocationCursor`] before accepting a document.

pub mod and;
pub mod and_not;
pub mod anchor;
pub mod factory;
pub mod or;
pub mod ordered;
pub mod term;
pub mod unary;
mod verify;
pub mod word;

use std::fmt::Debug;

use crate::location::LocationCursor;
use crate::types::{DocumentId, UNDEFINED_DOCUMENT_ID};

pub use self::and::AndLeafNode;
pub use self::and_not::AndNotLeafNode;
pub use self::anchor::{HeadLeafNode, TailLeafNode};
pub use self::factory::NodeFactory;
pub use self::or::OrLeafNode;
pub use self::ordered::{OrderedDistanceLeafNode, WithinOrderedLeafNode};
pub use self::term::TermLeafNode;
pub use self::unary::UnaryLeafNode;
pub use self::word::WordLeafNode;

/// Contract shared by every node of a query tree.
///
/// Invariants:
/// - `lower_bound(id)` never returns an id smaller than `id`;
/// - once a result is cached, a call with the same or a smaller id returns
///   it without consulting any child;
/// - calls with increasing ids yield a non-decreasing sequence.
pub trait QueryNode: Debug + Send {
    /// First matching document at or after `id`, or
    /// [`UNDEFINED_DOCUMENT_ID`] when none is left.
    ///
    /// With `rough` set, positional verification is skipped and the result
    /// may be a false positive.
    fn lower_bound(&mut self, id: DocumentId, rough: bool) -> DocumentId;

    /// Document returned by the last `lower_bound`, or
    /// [`UNDEFINED_DOCUMENT_ID`] before the first call.
    fn current_id(&self) -> DocumentId;

    /// Estimated number of matching documents, used to order intersections.
    fn estimate_count(&mut self) -> u32;

    /// Number of matches inside the current document.
    fn term_frequency(&mut self) -> u32;

    /// Positions of the matches inside the current document, rewound to the
    /// start. `None` when the node has no positional information or is not
    /// on a document.
    fn location_cursor(&mut self) -> Option<Box<dyn LocationCursor>>;

    /// Give back a cursor obtained from [`QueryNode::location_cursor`].
    fn release_location_cursor(&mut self, cursor: Box<dyn LocationCursor>);

    /// Forget the cached document and rewind every child.
    fn reset(&mut self);

    /// Deep copy of the tree structure, without cached documents or positions.
    fn copy(&self) -> Box<dyn QueryNode>;

    /// Human-readable description of the node and its children.
    fn description(&self) -> String;
}

/// Cached answer of a node's last `lower_bound`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CurrentDocument {
    id: Option<DocumentId>,
    /// True if the cached id passed positional verification.
    exact: bool,
}

impl CurrentDocument {
    /// Cached answer for `id`, if it is still valid for the requested mode.
    #[inline]
    pub(crate) fn cached(&self, id: DocumentId, rough: bool) -> Option<DocumentId> {
        match self.id {
            Some(current) if id <= current && (self.exact || rough || current == UNDEFINED_DOCUMENT_ID) => {
                Some(current)
            }
            _ => None,
        }
    }

    /// Where a recomputation for `id` may start.
    ///
    /// Nothing before a roughly matched document can match exactly.
    #[inline]
    pub(crate) fn resume_from(&self, id: DocumentId) -> DocumentId {
        match self.id {
            Some(current) if id <= current => current,
            _ => id,
        }
    }

    #[inline]
    pub(crate) fn store(&mut self, id: DocumentId, exact: bool) -> DocumentId {
        self.id = Some(id);
        self.exact = exact;
        id
    }

    #[inline]
    pub(crate) fn get(&self) -> DocumentId {
        self.id.unwrap_or(UNDEFINED_DOCUMENT_ID)
    }

    /// True if the node sits on a real document.
    #[inline]
    pub(crate) fn is_positioned(&self) -> bool {
        matches!(self.id, Some(id) if id != UNDEFINED_DOCUMENT_ID)
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        *self = CurrentDocument::default();
    }
}

/// Estimate after a static selectivity divisor.
#[inline]
pub(crate) fn divide_estimate(estimate: u32, divisor: u32) -> u32 {
    estimate / divisor.max(1)
}
