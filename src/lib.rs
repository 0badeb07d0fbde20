//! # docwalk
//!
//! A cursor-based full-text query evaluation engine.
//!
//! A query is a tree of [`query::QueryNode`]s walked with increasing
//! document ids. Phrase, proximity, word-boundary and anchored constraints
//! are verified per document with [`location::LocationCursor`]s, and hits
//! are weighted by an Okapi-family [`scoring::ScoreCalculator`].
//!
//! ## Features
//!
//! - Document skipping driven by the rarest child of an intersection
//! - Phrase and windowed proximity matching
//! - Exact and simple word-boundary checks against a separator list
//! - Head and tail anchoring
//! - Unions and exclusions
//! - Pooled location cursors
//! - Ten IDF formulas behind a `k:x:y:q:a:s` parameter string

pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod location;
pub mod query;
pub mod scoring;
pub mod search;
pub mod search_info;
pub mod types;

pub mod prelude {
    pub use crate::config::QueryConfig;
    pub use crate::error::{DocwalkError, Result};
    pub use crate::index::{MemoryIndex, PostingCursor};
    pub use crate::location::LocationCursor;
    pub use crate::query::{NodeFactory, QueryNode};
    pub use crate::scoring::{ScoreCalculator, create_calculator};
    pub use crate::search::{ScoredDocument, Searcher};
    pub use crate::search_info::{MemorySearchInformation, SearchInformation};
    pub use crate::types::{DocumentId, Location, Occurrence, UNDEFINED_DOCUMENT_ID};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
