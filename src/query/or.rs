//! N-ary union.

use log::debug;

use crate::location::{CursorPool, LocationCursor, UnionLocationCursor, downcast_cursor};
use crate::query::{CurrentDocument, QueryNode};
use crate::types::{DocumentId, UNDEFINED_DOCUMENT_ID};

/// Union of its children.
///
/// Every child is advanced to the requested id and the smallest answer wins.
/// A child answering exactly the requested id ends the scan early, since
/// nothing can come before it.
#[derive(Debug)]
pub struct OrLeafNode {
    children: Vec<Box<dyn QueryNode>>,
    estimate: Option<u32>,
    current: CurrentDocument,
    pool: CursorPool<UnionLocationCursor>,
}

impl OrLeafNode {
    /// Union of `children`. An empty list matches nothing.
    pub fn new(children: Vec<Box<dyn QueryNode>>) -> Self {
        OrLeafNode {
            children,
            estimate: None,
            current: CurrentDocument::default(),
            pool: CursorPool::default(),
        }
    }

    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool = CursorPool::new(capacity);
        self
    }

    /// The united nodes, in the order given.
    pub fn children(&self) -> &[Box<dyn QueryNode>] {
        &self.children
    }

    fn merge(&mut self, id: DocumentId, rough: bool) -> DocumentId {
        let mut found = UNDEFINED_DOCUMENT_ID;
        for child in &mut self.children {
            let candidate = child.lower_bound(id, rough);
            if candidate < found {
                found = candidate;
            }
            if found == id {
                break;
            }
        }
        found
    }

    /// Indices of the children matching the current document exactly.
    fn matching_children(&mut self) -> Vec<usize> {
        if !self.current.is_positioned() {
            return Vec::new();
        }
        let id = self.current.get();
        self.children
            .iter_mut()
            .enumerate()
            .filter_map(|(index, child)| (child.lower_bound(id, false) == id).then_some(index))
            .collect()
    }
}

impl QueryNode for OrLeafNode {
    fn lower_bound(&mut self, id: DocumentId, rough: bool) -> DocumentId {
        if let Some(current) = self.current.cached(id, rough) {
            return current;
        }
        let target = self.current.resume_from(id);
        let found = self.merge(target, rough);
        self.current.store(found, !rough)
    }

    fn current_id(&self) -> DocumentId {
        self.current.get()
    }

    /// Sum of the child estimates, computed once until the next reset.
    fn estimate_count(&mut self) -> u32 {
        if let Some(estimate) = self.estimate {
            return estimate;
        }
        let estimate = self
            .children
            .iter_mut()
            .fold(0u32, |sum, child| sum.saturating_add(child.estimate_count()));
        debug!("union of {} children estimated at {}", self.children.len(), estimate);
        self.estimate = Some(estimate);
        estimate
    }

    /// Sum of the frequencies of the children matching the current document.
    fn term_frequency(&mut self) -> u32 {
        self.matching_children()
            .into_iter()
            .fold(0u32, |sum, index| sum.saturating_add(self.children[index].term_frequency()))
    }

    fn location_cursor(&mut self) -> Option<Box<dyn LocationCursor>> {
        let matching = self.matching_children();
        if matching.is_empty() {
            return None;
        }
        let capacity = matching.len();
        let mut cursor = self.pool.acquire_or_else(|| UnionLocationCursor::new(capacity));
        for index in matching {
            if let Some(sub) = self.children[index].location_cursor() {
                cursor.push(index, sub);
            }
        }
        if cursor.is_empty() {
            self.pool.release(cursor);
            return None;
        }
        Some(cursor)
    }

    fn release_location_cursor(&mut self, cursor: Box<dyn LocationCursor>) {
        let Some(mut cursor) = downcast_cursor::<UnionLocationCursor>(cursor) else {
            return;
        };
        for (index, sub) in cursor.unbind() {
            if let Some(child) = self.children.get_mut(index) {
                child.release_location_cursor(sub);
            }
        }
        self.pool.release(cursor);
    }

    fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
        self.estimate = None;
        self.current.clear();
    }

    fn copy(&self) -> Box<dyn QueryNode> {
        Box::new(
            OrLeafNode::new(self.children.iter().map(|child| child.copy()).collect())
                .with_pool_capacity(self.pool.capacity()),
        )
    }

    fn description(&self) -> String {
        let children = self
            .children
            .iter()
            .map(|child| child.description())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Or({children})")
    }
}
