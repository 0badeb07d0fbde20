//! Word node: a term accepted only where real word breaks surround it.

use crate::location::{CursorPool, LocationCursor, WordLocationCursor, WordMatchMode, WordPositionSet};
use crate::query::unary::UnaryLeafNode;
use crate::query::verify::{PositionCheck, Verified};
use crate::query::{QueryNode, divide_estimate};
use crate::types::DocumentId;

/// Static selectivity divisor for exact word matching.
///
/// A configured heuristic, not a measurement; tune through
/// [`crate::config::SelectivityConfig`].
pub const EXACT_WORD_SELECTIVITY: u32 = 4;

/// Static selectivity divisor for simple word matching.
pub const SIMPLE_WORD_SELECTIVITY: u32 = 2;

#[derive(Debug)]
pub(crate) struct WordCheck {
    separator: Box<dyn QueryNode>,
    positions: WordPositionSet,
    mode: WordMatchMode,
    pool: CursorPool<WordLocationCursor>,
}

impl PositionCheck for WordCheck {
    type Cursor = WordLocationCursor;
    type Source = dyn QueryNode;

    fn build(&mut self, child: &mut Self::Source, id: DocumentId) -> Option<Box<WordLocationCursor>> {
        let term = child.location_cursor()?;
        let separator = if !self.positions.is_empty() && self.separator.lower_bound(id, false) == id {
            self.separator.location_cursor()
        } else {
            None
        };
        let (positions, mode) = (&self.positions, self.mode);
        let mut cursor = self
            .pool
            .acquire_or_else(|| WordLocationCursor::new(positions.clone(), mode));
        cursor.bind(term, separator);
        Some(cursor)
    }

    fn recycle(&mut self, child: &mut Self::Source, mut cursor: Box<WordLocationCursor>) {
        let (term, separator) = cursor.unbind();
        if let Some(term) = term {
            child.release_location_cursor(term);
        }
        if let Some(separator) = separator {
            self.separator.release_location_cursor(separator);
        }
        self.pool.release(cursor);
    }
}

/// Matches documents where the child term occurs bounded by word breaks.
///
/// Word breaks come from a separate separator node; a [`WordPositionSet`]
/// gives the offsets, relative to the term occurrence, that must be breaks.
#[derive(Debug)]
pub struct WordLeafNode {
    base: UnaryLeafNode,
    verified: Verified<WordCheck>,
    selectivity: u32,
}

impl WordLeafNode {
    /// Create a word node with the default divisor for `mode`.
    pub fn new(
        child: Box<dyn QueryNode>,
        separator: Box<dyn QueryNode>,
        positions: WordPositionSet,
        mode: WordMatchMode,
    ) -> Self {
        let selectivity = match mode {
            WordMatchMode::Exact => EXACT_WORD_SELECTIVITY,
            WordMatchMode::Simple => SIMPLE_WORD_SELECTIVITY,
        };
        WordLeafNode {
            base: UnaryLeafNode::new(child),
            verified: Verified::new(WordCheck {
                separator,
                positions,
                mode,
                pool: CursorPool::default(),
            }),
            selectivity,
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

    /// Exact or simple matching.
    pub fn mode(&self) -> WordMatchMode {
        self.verified.check.mode
    }
}

impl QueryNode for WordLeafNode {
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
        self.verified.check.separator.reset();
    }

    fn copy(&self) -> Box<dyn QueryNode> {
        let check = &self.verified.check;
        Box::new(WordLeafNode {
            base: self.base.copy_unary(),
            verified: Verified::new(WordCheck {
                separator: check.separator.copy(),
                positions: check.positions.clone(),
                mode: check.mode,
                pool: CursorPool::new(check.pool.capacity()),
            }),
            selectivity: self.selectivity,
        })
    }

    fn description(&self) -> String {
        format!(
            "Word[{:?} {:?}]({})",
            self.verified.check.mode,
            self.verified.check.positions.offsets(),
            self.base.child().description()
        )
    }
}
