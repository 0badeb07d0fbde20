//! Leaf node over a single decoded postings list.

use crate::index::posting::PostingCursor;
use crate::location::LocationCursor;
use crate::query::{CurrentDocument, QueryNode};
use crate::types::DocumentId;

/// A node that matches the documents of one postings list.
///
/// Term postings are exact by construction, so the `rough` flag is ignored.
#[derive(Debug)]
pub struct TermLeafNode {
    postings: Box<dyn PostingCursor>,
    label: Option<String>,
    current: CurrentDocument,
}

impl TermLeafNode {
    /// Create a term node over a postings cursor.
    pub fn new(postings: Box<dyn PostingCursor>) -> Self {
        TermLeafNode {
            postings,
            label: None,
            current: CurrentDocument::default(),
        }
    }

    /// Attach the term text, used in descriptions and logs.
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The term text, if one was attached.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl QueryNode for TermLeafNode {
    fn lower_bound(&mut self, id: DocumentId, _rough: bool) -> DocumentId {
        if let Some(current) = self.current.cached(id, false) {
            return current;
        }
        let found = self.postings.lower_bound(id);
        self.current.store(found, true)
    }

    fn current_id(&self) -> DocumentId {
        self.current.get()
    }

    fn estimate_count(&mut self) -> u32 {
        self.postings.estimate_count()
    }

    fn term_frequency(&mut self) -> u32 {
        if self.current.is_positioned() {
            self.postings.term_frequency()
        } else {
            0
        }
    }

    fn location_cursor(&mut self) -> Option<Box<dyn LocationCursor>> {
        if self.current.is_positioned() {
            self.postings.location_cursor()
        } else {
            None
        }
    }

    fn release_location_cursor(&mut self, cursor: Box<dyn LocationCursor>) {
        self.postings.release_location_cursor(cursor);
    }

    fn reset(&mut self) {
        self.postings.reset();
        self.current.clear();
    }

    fn copy(&self) -> Box<dyn QueryNode> {
        Box::new(TermLeafNode {
            postings: self.postings.copy(),
            label: self.label.clone(),
            current: CurrentDocument::default(),
        })
    }

    fn description(&self) -> String {
        match &self.label {
            Some(label) => format!("Term({label})"),
            None => "Term".to_string(),
        }
    }
}
