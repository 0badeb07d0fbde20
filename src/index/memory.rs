//! In-memory postings for pre-tokenized documents.
//!
//! This is a reference implementation of the index-access boundary, used by
//! the tests, the benchmarks and the command line tool. Positions are
//! 1-based. A token written with a leading `##` continues the previous word
//! (WordPiece convention): it gets its own position but no word break in
//! front of it.

use std::sync::Arc;

use ahash::AHashMap;
use log::debug;

use crate::error::{DocwalkError, Result};
use crate::index::posting::PostingCursor;
use crate::location::{CursorPool, LocationCursor, SliceLocationCursor, downcast_cursor};
use crate::search_info::MemorySearchInformation;
use crate::types::{DocumentId, Location, UNDEFINED_DOCUMENT_ID};

/// Prefix marking a token that continues the previous word.
pub const CONTINUATION_PREFIX: &str = "##";

/// Sorted documents and their sorted positions for one term.
#[derive(Debug, Clone, Default)]
pub struct PostingList {
    documents: Vec<DocumentId>,
    /// `offsets[i]..offsets[i + 1]` are the positions of `documents[i]`.
    offsets: Vec<usize>,
    positions: Vec<Location>,
    length: u32,
}

impl PostingList {
    /// Create an empty list whose occurrences span `length` tokens.
    pub fn new(length: u32) -> Self {
        PostingList {
            documents: Vec::new(),
            offsets: vec![0],
            positions: Vec::new(),
            length,
        }
    }

    /// Build a list from `(document, positions)` pairs.
    pub fn from_entries<I>(length: u32, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (DocumentId, Vec<Location>)>,
    {
        let mut list = PostingList::new(length);
        for (id, positions) in entries {
            list.push(id, &positions)?;
        }
        Ok(list)
    }

    /// Append a document. Ids must increase and positions must be sorted.
    pub fn push(&mut self, id: DocumentId, positions: &[Location]) -> Result<()> {
        if id == UNDEFINED_DOCUMENT_ID {
            return Err(DocwalkError::index("document id collides with the end marker"));
        }
        if self.documents.last().is_some_and(|&last| last >= id) {
            return Err(DocwalkError::index(format!(
                "document {id} appended out of order"
            )));
        }
        if !positions.windows(2).all(|w| w[0] < w[1]) {
            return Err(DocwalkError::index(format!(
                "positions of document {id} are not strictly increasing"
            )));
        }
        self.documents.push(id);
        self.positions.extend_from_slice(positions);
        self.offsets.push(self.positions.len());
        Ok(())
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True if the list holds no document.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Occurrence length in tokens.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// The document ids, in order.
    pub fn documents(&self) -> &[DocumentId] {
        &self.documents
    }

    fn positions_at(&self, index: usize) -> &[Location] {
        &self.positions[self.offsets[index]..self.offsets[index + 1]]
    }
}

/// Cursor over a shared [`PostingList`].
#[derive(Debug)]
pub struct MemoryPostings {
    list: Arc<PostingList>,
    index: usize,
    current: Option<DocumentId>,
    pool: CursorPool<SliceLocationCursor>,
}

impl MemoryPostings {
    /// Create a cursor positioned before the first document.
    pub fn new(list: Arc<PostingList>) -> Self {
        MemoryPostings {
            list,
            index: 0,
            current: None,
            pool: CursorPool::default(),
        }
    }

    /// The list this cursor walks.
    pub fn list(&self) -> &Arc<PostingList> {
        &self.list
    }
}

impl PostingCursor for MemoryPostings {
    fn lower_bound(&mut self, id: DocumentId) -> DocumentId {
        if let Some(current) = self.current {
            if id <= current {
                return current;
            }
        }
        let rest = &self.list.documents[self.index..];
        self.index += rest.partition_point(|&d| d < id);
        let found = self
            .list
            .documents
            .get(self.index)
            .copied()
            .unwrap_or(UNDEFINED_DOCUMENT_ID);
        self.current = Some(found);
        found
    }

    fn current_id(&self) -> DocumentId {
        self.current.unwrap_or(UNDEFINED_DOCUMENT_ID)
    }

    fn estimate_count(&self) -> u32 {
        self.list.len() as u32
    }

    fn term_frequency(&self) -> u32 {
        match self.current {
            Some(id) if id != UNDEFINED_DOCUMENT_ID => self.list.positions_at(self.index).len() as u32,
            _ => 0,
        }
    }

    fn location_cursor(&mut self) -> Option<Box<dyn LocationCursor>> {
        match self.current {
            Some(id) if id != UNDEFINED_DOCUMENT_ID => {
                let length = self.list.length;
                let mut cursor = self
                    .pool
                    .acquire_or_else(|| SliceLocationCursor::new(Vec::new(), length));
                cursor.rebind(self.list.positions_at(self.index), length);
                Some(cursor)
            }
            _ => None,
        }
    }

    fn release_location_cursor(&mut self, cursor: Box<dyn LocationCursor>) {
        if let Some(cursor) = downcast_cursor::<SliceLocationCursor>(cursor) {
            self.pool.release(cursor);
        }
    }

    fn reset(&mut self) {
        self.index = 0;
        self.current = None;
    }

    fn copy(&self) -> Box<dyn PostingCursor> {
        Box::new(MemoryPostings::new(Arc::clone(&self.list)))
    }
}

/// Inverted index over pre-tokenized documents, kept in memory.
#[derive(Debug, Clone)]
pub struct MemoryIndex {
    terms: AHashMap<String, Arc<PostingList>>,
    separators: Arc<PostingList>,
    information: Arc<MemorySearchInformation>,
}

impl MemoryIndex {
    /// Index `(id, tokens)` pairs. Ids must be unique; order does not matter.
    pub fn from_documents<I, S>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = (DocumentId, Vec<S>)>,
        S: AsRef<str>,
    {
        let mut documents: Vec<(DocumentId, Vec<S>)> = documents.into_iter().collect();
        documents.sort_by_key(|(id, _)| *id);
        if let Some(pair) = documents.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(DocwalkError::index(format!(
                "duplicate document id {}",
                pair[0].0
            )));
        }

        let mut terms: AHashMap<String, PostingList> = AHashMap::new();
        let mut separators = PostingList::new(0);
        let mut information = MemorySearchInformation::new();
        let mut local: AHashMap<&str, Vec<Location>> = AHashMap::new();
        let mut boundaries = Vec::new();

        for (id, tokens) in &documents {
            local.clear();
            boundaries.clear();
            for (offset, token) in tokens.iter().enumerate() {
                let token = token.as_ref();
                let location = offset as Location + 1;
                if !token.starts_with(CONTINUATION_PREFIX) {
                    boundaries.push(location);
                }
                local.entry(token).or_default().push(location);
            }
            let length = tokens.len() as u32;
            boundaries.push(length + 1);

            for (token, positions) in local.drain() {
                terms
                    .entry(token.to_string())
                    .or_insert_with(|| PostingList::new(1))
                    .push(*id, &positions)?;
            }
            separators.push(*id, &boundaries)?;
            information.insert(*id, length);
        }

        debug!(
            "indexed {} documents with {} distinct terms",
            documents.len(),
            terms.len()
        );

        Ok(MemoryIndex {
            terms: terms.into_iter().map(|(t, l)| (t, Arc::new(l))).collect(),
            separators: Arc::new(separators),
            information: Arc::new(information),
        })
    }

    /// Postings of a term, if it occurs anywhere.
    pub fn postings(&self, term: &str) -> Option<MemoryPostings> {
        self.terms
            .get(term)
            .map(|list| MemoryPostings::new(Arc::clone(list)))
    }

    /// Postings of a term, empty if it never occurs.
    pub fn postings_or_empty(&self, term: &str) -> MemoryPostings {
        self.postings(term)
            .unwrap_or_else(|| MemoryPostings::new(Arc::new(PostingList::new(1))))
    }

    /// Word-break positions of every document.
    pub fn separators(&self) -> MemoryPostings {
        MemoryPostings::new(Arc::clone(&self.separators))
    }

    /// Corpus statistics gathered while indexing.
    pub fn search_information(&self) -> Arc<MemorySearchInformation> {
        Arc::clone(&self.information)
    }

    /// Number of distinct terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }
}
