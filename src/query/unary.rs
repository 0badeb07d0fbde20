//! Single-child wrapper shared by the word and anchor nodes.

use crate::location::LocationCursor;
use crate::query::verify::{PositionCheck, Verified};
use crate::query::{CurrentDocument, QueryNode};
use crate::types::{DocumentId, UNDEFINED_DOCUMENT_ID, successor};

/// Wraps exactly one child and caches the current document.
///
/// On its own it is a transparent pass-through; the word and anchor nodes
/// embed it and add a positional check through the `*_with` helpers.
#[derive(Debug)]
pub struct UnaryLeafNode {
    child: Box<dyn QueryNode>,
    current: CurrentDocument,
}

impl UnaryLeafNode {
    /// Wrap `child`.
    pub fn new(child: Box<dyn QueryNode>) -> Self {
        UnaryLeafNode {
            child,
            current: CurrentDocument::default(),
        }
    }

    /// The wrapped node.
    pub fn child(&self) -> &dyn QueryNode {
        self.child.as_ref()
    }

    /// The wrapped node, mutably.
    pub fn child_mut(&mut self) -> &mut dyn QueryNode {
        self.child.as_mut()
    }

    /// `lower_bound` that, unless `rough`, keeps only candidates passing `verified`.
    ///
    /// A rejected candidate moves the search one document forward.
    pub(crate) fn lower_bound_with<P>(
        &mut self,
        id: DocumentId,
        rough: bool,
        verified: &mut Verified<P>,
    ) -> DocumentId
    where
        P: PositionCheck<Source = dyn QueryNode>,
    {
        if let Some(current) = self.current.cached(id, rough) {
            return current;
        }
        let mut target = self.current.resume_from(id);
        verified.discard(self.child.as_mut());
        loop {
            let candidate = self.child.lower_bound(target, rough);
            if candidate == UNDEFINED_DOCUMENT_ID || rough {
                return self.current.store(candidate, !rough);
            }
            if verified.verify(self.child.as_mut(), candidate) {
                return self.current.store(candidate, true);
            }
            target = successor(candidate);
        }
    }

    pub(crate) fn location_cursor_with<P>(
        &mut self,
        verified: &mut Verified<P>,
    ) -> Option<Box<dyn LocationCursor>>
    where
        P: PositionCheck<Source = dyn QueryNode>,
    {
        if !self.current.is_positioned() {
            return None;
        }
        verified.take_cursor(self.child.as_mut(), self.current.get())
    }

    pub(crate) fn release_location_cursor_with<P>(
        &mut self,
        verified: &mut Verified<P>,
        cursor: Box<dyn LocationCursor>,
    ) where
        P: PositionCheck<Source = dyn QueryNode>,
    {
        verified.release(self.child.as_mut(), cursor);
    }

    pub(crate) fn term_frequency_with<P>(&mut self, verified: &mut Verified<P>) -> u32
    where
        P: PositionCheck<Source = dyn QueryNode>,
    {
        if !self.current.is_positioned() {
            return 0;
        }
        verified.term_frequency(self.child.as_mut(), self.current.get())
    }

    pub(crate) fn reset_with<P>(&mut self, verified: &mut Verified<P>)
    where
        P: PositionCheck<Source = dyn QueryNode>,
    {
        verified.discard(self.child.as_mut());
        self.reset();
    }

    /// Estimate of the wrapped node.
    pub fn child_estimate(&mut self) -> u32 {
        self.child.estimate_count()
    }

    /// Fresh wrapper around a copy of the child.
    pub fn copy_unary(&self) -> UnaryLeafNode {
        UnaryLeafNode::new(self.child.copy())
    }
}

impl QueryNode for UnaryLeafNode {
    fn lower_bound(&mut self, id: DocumentId, rough: bool) -> DocumentId {
        if let Some(current) = self.current.cached(id, rough) {
            return current;
        }
        let target = self.current.resume_from(id);
        let found = self.child.lower_bound(target, rough);
        self.current.store(found, !rough)
    }

    fn current_id(&self) -> DocumentId {
        self.current.get()
    }

    fn estimate_count(&mut self) -> u32 {
        self.child.estimate_count()
    }

    fn term_frequency(&mut self) -> u32 {
        self.child.term_frequency()
    }

    fn location_cursor(&mut self) -> Option<Box<dyn LocationCursor>> {
        self.child.location_cursor()
    }

    fn release_location_cursor(&mut self, cursor: Box<dyn LocationCursor>) {
        self.child.release_location_cursor(cursor);
    }

    fn reset(&mut self) {
        self.child.reset();
        self.current.clear();
    }

    fn copy(&self) -> Box<dyn QueryNode> {
        Box::new(self.copy_unary())
    }

    fn description(&self) -> String {
        format!("Unary({})", self.child.description())
    }
}
