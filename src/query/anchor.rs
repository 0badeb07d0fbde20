//! Head- and tail-anchored nodes.

use std::sync::Arc;

use crate::location::{CursorPool, HeadLocationCursor, LocationCursor, TailLocationCursor};
use crate::query::unary::UnaryLeafNode;
use crate::query::verify::{PositionCheck, Verified};
use crate::query::{QueryNode, divide_estimate};
use crate::search_info::SearchInformation;
use crate::types::{DocumentId, Location};

/// Static selectivity divisor for anchored matches. Anchoring is assumed rare.
pub const ANCHOR_SELECTIVITY: u32 = 30;

#[derive(Debug)]
pub(crate) struct HeadCheck {
    anchor: Location,
    pool: CursorPool<HeadLocationCursor>,
}

impl PositionCheck for HeadCheck {
    type Cursor = HeadLocationCursor;
    type Source = dyn QueryNode;

    fn build(&mut self, child: &mut Self::Source, _id: DocumentId) -> Option<Box<HeadLocationCursor>> {
        let term = child.location_cursor()?;
        let anchor = self.anchor;
        let mut cursor = self.pool.acquire_or_else(|| HeadLocationCursor::new(anchor));
        cursor.bind(term);
        Some(cursor)
    }

    fn recycle(&mut self, child: &mut Self::Source, mut cursor: Box<HeadLocationCursor>) {
        if let Some(term) = cursor.unbind() {
            child.release_location_cursor(term);
        }
        self.pool.release(cursor);
    }
}

#[derive(Debug)]
pub(crate) struct TailCheck {
    offset: u32,
    info: Arc<dyn SearchInformation>,
    pool: CursorPool<TailLocationCursor>,
}

impl PositionCheck for TailCheck {
    type Cursor = TailLocationCursor;
    type Source = dyn QueryNode;

    fn build(&mut self, child: &mut Self::Source, id: DocumentId) -> Option<Box<TailLocationCursor>> {
        // Without a length the tail cannot be located.
        let length = self.info.document_length(id)?;
        let term = child.location_cursor()?;
        let offset = self.offset;
        let mut cursor = self.pool.acquire_or_else(|| TailLocationCursor::new(offset));
        cursor.bind(term);
        cursor.set_document_length(length);
        Some(cursor)
    }

    fn recycle(&mut self, child: &mut Self::Source, mut cursor: Box<TailLocationCursor>) {
        if let Some(term) = cursor.unbind() {
            child.release_location_cursor(term);
        }
        self.pool.release(cursor);
    }
}

/// Matches documents where the child occurs exactly at `anchor`, counted
/// from 1 at the start of the document.
#[derive(Debug)]
pub struct HeadLeafNode {
    base: UnaryLeafNode,
    verified: Verified<HeadCheck>,
    selectivity: u32,
}

impl HeadLeafNode {
    /// Anchor `child` at position `anchor`, counted from 1.
    ///
    /// An anchor of 0 never matches; [`crate::query::NodeFactory::head`]
    /// rejects it up front.
    pub fn new(child: Box<dyn QueryNode>, anchor: Location) -> Self {
        HeadLeafNode {
            base: UnaryLeafNode::new(child),
            verified: Verified::new(HeadCheck {
                anchor,
                pool: CursorPool::default(),
            }),
            selectivity: ANCHOR_SELECTIVITY,
        }
    }

    /// Override the static selectivity divisor.
    pub fn with_selectivity(mut self, divisor: u32) -> Self {
        self.selectivity = divisor;
        self
    }

    /// Override how many idle cursors the node keeps.
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.verified.check.pool = CursorPool::new(capacity);
        self
    }

    /// Position the child must start at.
    pub fn anchor(&self) -> Location {
        self.verified.check.anchor
    }
}

impl QueryNode for HeadLeafNode {
    fn lower_bound(&mut self, id: DocumentId, rough: bool) -> DocumentId {
        self.base.lower_bound_with(id, rough, &mut self.verified)
    }

    fn current_id(&self) -> DocumentId {
        self.base.current_id()
    }

    fn estimate_count(&mut self) -> u32 {
        divide_estimate(self.base.child_estimate(), self.selectivity)
    }

    fn term_frequency(&mut self) -> u32 {
        self.base.term_frequency_with(&mut self.verified)
    }

    fn location_cursor(&mut self) -> Option<Box<dyn LocationCursor>> {
        self.base.location_cursor_with(&mut self.verified)
    }

    fn release_location_cursor(&mut self, cursor: Box<dyn LocationCursor>) {
        self.base.release_location_cursor_with(&mut self.verified, cursor);
    }

    fn reset(&mut self) {
        self.base.reset_with(&mut self.verified);
    }

    fn copy(&self) -> Box<dyn QueryNode> {
        Box::new(HeadLeafNode {
            base: self.base.copy_unary(),
            verified: Verified::new(HeadCheck {
                anchor: self.verified.check.anchor,
                pool: CursorPool::new(self.verified.check.pool.capacity()),
            }),
            selectivity: self.selectivity,
        })
    }

    fn description(&self) -> String {
        format!("Head[{}]({})", self.anchor(), self.base.child().description())
    }
}

/// Matches documents where the child ends `offset` tokens before the end
/// of the document.
///
/// Document lengths come from [`SearchInformation`]; a document whose length
/// is unknown never matches.
#[derive(Debug)]
pub struct TailLeafNode {
    base: UnaryLeafNode,
    verified: Verified<TailCheck>,
    selectivity: u32,
}

impl TailLeafNode {
    /// Anchor `child` so that it ends `offset` tokens before the end of the
    /// document, with lengths looked up in `info`.
    pub fn new(child: Box<dyn QueryNode>, offset: u32, info: Arc<dyn SearchInformation>) -> Self {
        TailLeafNode {
            base: UnaryLeafNode::new(child),
            verified: Verified::new(TailCheck {
                offset,
                info,
                pool: CursorPool::default(),
            }),
            selectivity: ANCHOR_SELECTIVITY,
        }
    }

    /// Override the static selectivity divisor.
    pub fn with_selectivity(mut self, divisor: u32) -> Self {
        self.selectivity = divisor;
        self
    }

    /// Override how many idle cursors the node keeps.
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.verified.check.pool = CursorPool::new(capacity);
        self
    }

    /// Tokens allowed between the child's end and the document's end.
    pub fn offset(&self) -> u32 {
        self.verified.check.offset
    }
}

impl QueryNode for TailLeafNode {
    fn lower_bound(&mut self, id: DocumentId, rough: bool) -> DocumentId {
        self.base.lower_bound_with(id, rough, &mut self.verified)
    }

    fn current_id(&self) -> DocumentId {
        self.base.current_id()
    }

    fn estimate_count(&mut self) -> u32 {
        divide_estimate(self.base.child_estimate(), self.selectivity)
    }

    fn term_frequency(&mut self) -> u32 {
        self.base.term_frequency_with(&mut self.verified)
    }

    fn location_cursor(&mut self) -> Option<Box<dyn LocationCursor>> {
        self.base.location_cursor_with(&mut self.verified)
    }

    fn release_location_cursor(&mut self, cursor: Box<dyn LocationCursor>) {
        self.base.release_location_cursor_with(&mut self.verified, cursor);
    }

    fn reset(&mut self) {
        self.base.reset_with(&mut self.verified);
    }

    fn copy(&self) -> Box<dyn QueryNode> {
        let check = &self.verified.check;
        Box::new(TailLeafNode {
            base: self.base.copy_unary(),
            verified: Verified::new(TailCheck {
                offset: check.offset,
                info: Arc::clone(&check.info),
                pool: CursorPool::new(check.pool.capacity()),
            }),
            selectivity: self.selectivity,
        })
    }

    fn description(&self) -> String {
        format!("Tail[{}]({})", self.offset(), self.base.child().description())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::query::OrderedDistanceLeafNode;
    use crate::query::test_support::{collect, counting_term, term};
    use crate::search_info::MemorySearchInformation;
    use crate::types::UNDEFINED_DOCUMENT_ID;

    #[test]
    fn test_head_requires_anchor() {
        let mut node = HeadLeafNode::new(
            term(vec![(1, vec![1, 5]), (2, vec![3]), (3, vec![1])]),
            1,
        );
        assert_eq!(collect(&mut node), vec![1, 3]);

        node.reset();
        assert_eq!(node.lower_bound(2, true), 2);
        assert_eq!(node.lower_bound(2, false), 3);
    }

    #[test]
    fn test_head_cursor_yields_single_hit() {
        let mut node = HeadLeafNode::new(term(vec![(1, vec![1, 5])]), 1);
        assert_eq!(node.lower_bound(0, false), 1);
        assert_eq!(node.term_frequency(), 1);

        let mut cursor = node.location_cursor().unwrap();
        assert_eq!(cursor.next().location, 1);
        assert!(cursor.next().is_undefined());
        node.release_location_cursor(cursor);
    }

    fn lengths() -> Arc<dyn SearchInformation> {
        Arc::new(MemorySearchInformation::from_iter([(1, 5), (2, 10), (4, 3)]))
    }

    #[test]
    fn test_tail_uses_document_length() {
        // Document 3 has no known length and is skipped.
        let mut node = TailLeafNode::new(
            term(vec![(1, vec![5]), (2, vec![5]), (3, vec![7]), (4, vec![2])]),
            0,
            lengths(),
        );
        assert_eq!(collect(&mut node), vec![1]);

        let mut offset = TailLeafNode::new(
            term(vec![(1, vec![4]), (2, vec![9]), (4, vec![2])]),
            1,
            lengths(),
        );
        assert_eq!(collect(&mut offset), vec![1, 2, 4]);
    }

    #[test]
    fn test_tail_exact_answer_after_rough_is_cached() {
        let (child, calls) = counting_term(vec![(1, vec![3]), (2, vec![10]), (4, vec![3])]);
        let mut node = TailLeafNode::new(child, 0, lengths());

        assert_eq!(node.lower_bound(0, true), 1);
        // Document 1 is five tokens long, so its match does not reach the end.
        assert_eq!(node.lower_bound(0, false), 2);
        let before = calls.load(Ordering::SeqCst);
        assert_eq!(node.lower_bound(0, false), 2);
        assert_eq!(node.lower_bound(2, false), 2);
        assert_eq!(calls.load(Ordering::SeqCst), before);
    }

    #[test]
    fn test_tail_over_phrase() {
        let phrase = OrderedDistanceLeafNode::new(vec![
            term(vec![(1, vec![4]), (2, vec![2])]),
            term(vec![(1, vec![5]), (2, vec![3])]),
        ]);
        let mut node = TailLeafNode::new(Box::new(phrase), 0, lengths());
        assert_eq!(node.lower_bound(0, false), 1);
        assert_eq!(node.lower_bound(2, false), UNDEFINED_DOCUMENT_ID);
    }

    #[test]
    fn test_anchor_estimates_and_copy() {
        let child = term((1..=60).map(|id| (id, vec![1])).collect());
        let mut head = HeadLeafNode::new(child, 1);
        assert_eq!(head.estimate_count(), 2);
        head = head.with_selectivity(6);
        assert_eq!(head.estimate_count(), 10);

        let tail = TailLeafNode::new(term(vec![(1, vec![5])]), 0, lengths());
        let mut copy = tail.copy();
        assert_eq!(copy.lower_bound(0, false), 1);
        assert_eq!(copy.description(), "Tail[0](Term)");
    }
}
