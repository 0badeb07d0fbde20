//! Corpus statistics consumed by tail anchoring and scoring.

use std::fmt::Debug;

use ahash::AHashMap;

use crate::types::DocumentId;

/// Read-only per-query view of corpus statistics.
///
/// Owned and populated by the index layer; the query engine never mutates it.
pub trait SearchInformation: Debug + Send + Sync {
    /// Length in tokens of a document, if the document is known.
    fn document_length(&self, id: DocumentId) -> Option<u32>;

    /// Number of documents in the corpus.
    fn document_count(&self) -> u32;

    /// Sum of all document lengths.
    fn total_document_length(&self) -> u64;

    /// Mean document length, 0 for an empty corpus.
    fn average_document_length(&self) -> f64 {
        match self.document_count() {
            0 => 0.0,
            count => self.total_document_length() as f64 / count as f64,
        }
    }
}

/// Hash-map backed [`SearchInformation`].
#[derive(Debug, Clone, Default)]
pub struct MemorySearchInformation {
    lengths: AHashMap<DocumentId, u32>,
    total_length: u64,
}

impl MemorySearchInformation {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the length of a document, replacing any previous value.
    pub fn insert(&mut self, id: DocumentId, length: u32) {
        if let Some(previous) = self.lengths.insert(id, length) {
            self.total_length -= previous as u64;
        }
        self.total_length += length as u64;
    }

    /// Forget a document.
    pub fn remove(&mut self, id: DocumentId) -> Option<u32> {
        let removed = self.lengths.remove(&id);
        if let Some(length) = removed {
            self.total_length -= length as u64;
        }
        removed
    }
}

impl FromIterator<(DocumentId, u32)> for MemorySearchInformation {
    fn from_iter<I: IntoIterator<Item = (DocumentId, u32)>>(iter: I) -> Self {
        let mut information = MemorySearchInformation::new();
        for (id, length) in iter {
            information.insert(id, length);
        }
        information
    }
}

impl SearchInformation for MemorySearchInformation {
    fn document_length(&self, id: DocumentId) -> Option<u32> {
        self.lengths.get(&id).copied()
    }

    fn document_count(&self) -> u32 {
        self.lengths.len() as u32
    }

    fn total_document_length(&self) -> u64 {
        self.total_length
    }
}
