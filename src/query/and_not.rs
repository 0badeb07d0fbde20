//! Set difference of two nodes.

use crate::location::LocationCursor;
use crate::query::{CurrentDocument, QueryNode};
use crate::types::{DocumentId, UNDEFINED_DOCUMENT_ID, successor};

/// Documents matched by `positive` but not by `negative`.
///
/// A rough answer is the positive child's rough answer: the negative child is
/// only consulted when an exact answer is required. Frequencies and positions
/// come from the positive child alone.
#[derive(Debug)]
pub struct AndNotLeafNode {
    positive: Box<dyn QueryNode>,
    negative: Box<dyn QueryNode>,
    current: CurrentDocument,
}

impl AndNotLeafNode {
    pub fn new(positive: Box<dyn QueryNode>, negative: Box<dyn QueryNode>) -> Self {
        AndNotLeafNode {
            positive,
            negative,
            current: CurrentDocument::default(),
        }
    }

    /// The node whose documents are kept.
    pub fn positive(&self) -> &dyn QueryNode {
        self.positive.as_ref()
    }

    /// The node whose documents are removed.
    pub fn negative(&self) -> &dyn QueryNode {
        self.negative.as_ref()
    }

    fn difference(&mut self, id: DocumentId) -> DocumentId {
        let mut target = id;
        loop {
            let candidate = self.positive.lower_bound(target, false);
            if candidate == UNDEFINED_DOCUMENT_ID
                || self.negative.lower_bound(candidate, false) != candidate
            {
                return candidate;
            }
            target = successor(candidate);
        }
    }
}

impl QueryNode for AndNotLeafNode {
    fn lower_bound(&mut self, id: DocumentId, rough: bool) -> DocumentId {
        if let Some(current) = self.current.cached(id, rough) {
            return current;
        }
        let target = self.current.resume_from(id);
        if rough {
            let found = self.positive.lower_bound(target, true);
            return self.current.store(found, false);
        }
        let found = self.difference(target);
        self.current.store(found, true)
    }

    fn current_id(&self) -> DocumentId {
        self.current.get()
    }

    fn estimate_count(&mut self) -> u32 {
        self.positive.estimate_count()
    }

    fn term_frequency(&mut self) -> u32 {
        if !self.current.is_positioned() {
            return 0;
        }
        self.positive.term_frequency()
    }

    fn location_cursor(&mut self) -> Option<Box<dyn LocationCursor>> {
        if !self.current.is_positioned() {
            return None;
        }
        self.positive.location_cursor()
    }

    fn release_location_cursor(&mut self, cursor: Box<dyn LocationCursor>) {
        self.positive.release_location_cursor(cursor);
    }

    fn reset(&mut self) {
        self.positive.reset();
        self.negative.reset();
        self.current.clear();
    }

    fn copy(&self) -> Box<dyn QueryNode> {
        Box::new(AndNotLeafNode::new(self.positive.copy(), self.negative.copy()))
    }

    fn description(&self) -> String {
        format!(
            "AndNot({}, {})",
            self.positive.description(),
            self.negative.description()
        )
    }
}
