//! Phrase and proximity nodes.

use crate::location::{CursorPool, DistanceWindow, LocationCursor, OrderedDistanceLocationCursor};
use crate::query::and::AndLeafNode;
use crate::query::verify::{PositionCheck, Verified};
use crate::query::QueryNode;
use crate::types::DocumentId;

#[derive(Debug)]
pub(crate) struct OrderedCheck {
    window: DistanceWindow,
    pool: CursorPool<OrderedDistanceLocationCursor>,
}

impl PositionCheck for OrderedCheck {
    type Cursor = OrderedDistanceLocationCursor;
    type Source = [Box<dyn QueryNode>];

    fn build(
        &mut self,
        children: &mut [Box<dyn QueryNode>],
        _id: DocumentId,
    ) -> Option<Box<OrderedDistanceLocationCursor>> {
        if children.is_empty() {
            return None;
        }
        let window = self.window;
        let capacity = children.len();
        let mut cursor = self
            .pool
            .acquire_or_else(|| OrderedDistanceLocationCursor::new(window, capacity));
        for index in 0..children.len() {
            match children[index].location_cursor() {
                Some(sub) => cursor.push(sub),
                None => {
                    // A child without positions cannot be ordered.
                    self.recycle(children, cursor);
                    return None;
                }
            }
        }
        Some(cursor)
    }

    fn recycle(
        &mut self,
        children: &mut [Box<dyn QueryNode>],
        mut cursor: Box<OrderedDistanceLocationCursor>,
    ) {
        for (child, sub) in children.iter_mut().zip(cursor.unbind()) {
            child.release_location_cursor(sub);
        }
        self.pool.release(cursor);
    }
}

/// Matches documents where the children occur in the given order, each
/// starting at or after the end of the previous one.
///
/// The reported occurrence covers the first child's start to the last
/// child's end; the term frequency is the number of such occurrences.
#[derive(Debug)]
pub struct OrderedDistanceLeafNode {
    base: AndLeafNode,
    verified: Verified<OrderedCheck>,
}

impl OrderedDistanceLeafNode {
    /// Phrase over `children`, in order, with no width limit.
    pub fn new(children: Vec<Box<dyn QueryNode>>) -> Self {
        Self::with_window(children, DistanceWindow::UNBOUNDED)
    }

    /// Ordered match whose start-to-start width must lie in `window`.
    pub fn with_window(children: Vec<Box<dyn QueryNode>>, window: DistanceWindow) -> Self {
        OrderedDistanceLeafNode {
            base: AndLeafNode::new(children),
            verified: Verified::new(OrderedCheck {
                window,
                pool: CursorPool::default(),
            }),
        }
    }

    /// Override how many idle cursors the node keeps.
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.verified.check.pool = CursorPool::new(capacity);
        self
    }

    /// The accepted width.
    pub fn window(&self) -> DistanceWindow {
        self.verified.check.window
    }

    /// The phrase members, in order.
    pub fn children(&self) -> &[Box<dyn QueryNode>] {
        self.base.children()
    }

    fn copy_ordered(&self) -> OrderedDistanceLeafNode {
        OrderedDistanceLeafNode {
            base: self.base.copy_and(),
            verified: Verified::new(OrderedCheck {
                window: self.verified.check.window,
                pool: CursorPool::new(self.verified.check.pool.capacity()),
            }),
        }
    }
}

impl QueryNode for OrderedDistanceLeafNode {
    fn lower_bound(&mut self, id: DocumentId, rough: bool) -> DocumentId {
        self.base.lower_bound_with(id, rough, &mut self.verified)
    }

    fn current_id(&self) -> DocumentId {
        self.base.current_id()
    }

    fn estimate_count(&mut self) -> u32 {
        self.base.estimate_count()
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
        Box::new(self.copy_ordered())
    }

    fn description(&self) -> String {
        format!("Ordered({})", self.base.describe_children())
    }
}

/// Ordered match whose start-to-start width lies in `[lower, upper]`.
#[derive(Debug)]
pub struct WithinOrderedLeafNode {
    inner: OrderedDistanceLeafNode,
}

impl WithinOrderedLeafNode {
    /// # Panics
    ///
    /// Panics if `lower > upper`.
    pub fn new(children: Vec<Box<dyn QueryNode>>, lower: u32, upper: u32) -> Self {
        WithinOrderedLeafNode {
            inner: OrderedDistanceLeafNode::with_window(children, DistanceWindow::new(lower, upper)),
        }
    }

    /// Override how many idle cursors the node keeps.
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.inner = self.inner.with_pool_capacity(capacity);
        self
    }

    /// Smallest accepted width.
    pub fn lower(&self) -> u32 {
        self.inner.window().lower
    }

    /// Largest accepted width.
    pub fn upper(&self) -> u32 {
        self.inner.window().upper
    }
}

impl QueryNode for WithinOrderedLeafNode {
    fn lower_bound(&mut self, id: DocumentId, rough: bool) -> DocumentId {
        self.inner.lower_bound(id, rough)
    }

    fn current_id(&self) -> DocumentId {
        self.inner.current_id()
    }

    fn estimate_count(&mut self) -> u32 {
        self.inner.estimate_count()
    }

    fn term_frequency(&mut self) -> u32 {
        self.inner.term_frequency()
    }

    fn location_cursor(&mut self) -> Option<Box<dyn LocationCursor>> {
        self.inner.location_cursor()
    }

    fn release_location_cursor(&mut self, cursor: Box<dyn LocationCursor>) {
        self.inner.release_location_cursor(cursor);
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn copy(&self) -> Box<dyn QueryNode> {
        Box::new(WithinOrderedLeafNode {
            inner: self.inner.copy_ordered(),
        })
    }

    fn description(&self) -> String {
        format!(
            "Within[{}, {}]({})",
            self.lower(),
            self.upper(),
            self.inner.base.describe_children()
        )
    }
}
