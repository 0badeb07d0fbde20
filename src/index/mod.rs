//! Index access layer.
//!
//! The query engine consumes decoded postings through [`PostingCursor`].
//! [`MemoryIndex`] is a reference implementation built from pre-tokenized
//! documents; it is not a persistence format.

pub mod memory;
pub mod posting;

pub use memory::{MemoryIndex, MemoryPostings, PostingList};
pub use posting::PostingCursor;
