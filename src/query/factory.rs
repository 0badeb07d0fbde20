//! Node construction honoring a [`QueryConfig`].

use std::sync::Arc;

use crate::config::QueryConfig;
use crate::error::{DocwalkError, Result};
use crate::index::memory::MemoryIndex;
use crate::index::posting::PostingCursor;
use crate::location::{WordMatchMode, WordPositionSet};
use crate::query::{
    AndLeafNode, AndNotLeafNode, HeadLeafNode, OrLeafNode, OrderedDistanceLeafNode, QueryNode,
    TailLeafNode, TermLeafNode, WithinOrderedLeafNode, WordLeafNode,
};
use crate::search_info::SearchInformation;
use crate::types::Location;

/// Builds query nodes with the configured pool capacity and selectivity.
///
/// The factory checks arguments and reports bad ones as
/// [`DocwalkError::Query`]; it does not parse query text.
#[derive(Debug, Clone, Default)]
pub struct NodeFactory {
    config: QueryConfig,
}

impl NodeFactory {
    pub fn new(config: QueryConfig) -> Self {
        NodeFactory { config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Leaf over raw postings.
    pub fn term(&self, postings: Box<dyn PostingCursor>, label: &str) -> Box<dyn QueryNode> {
        Box::new(TermLeafNode::new(postings).with_label(label))
    }

    /// Leaf over the postings of `text` in `index`; matches nothing if the
    /// term is absent.
    pub fn term_in(&self, index: &MemoryIndex, text: &str) -> Box<dyn QueryNode> {
        self.term(Box::new(index.postings_or_empty(text)), text)
    }

    /// Word-boundary check of `child` against `separator`.
    pub fn word(
        &self,
        child: Box<dyn QueryNode>,
        separator: Box<dyn QueryNode>,
        positions: WordPositionSet,
        mode: WordMatchMode,
    ) -> Box<dyn QueryNode> {
        let selectivity = match mode {
            WordMatchMode::Exact => self.config.selectivity.exact_word,
            WordMatchMode::Simple => self.config.selectivity.simple_word,
        };
        Box::new(
            WordLeafNode::new(child, separator, positions, mode)
                .with_selectivity(selectivity)
                .with_pool_capacity(self.config.pool_capacity),
        )
    }

    /// `text` as a whole single-token word of `index`.
    pub fn word_in(&self, index: &MemoryIndex, text: &str) -> Box<dyn QueryNode> {
        let separator = self.term(Box::new(index.separators()), "<separator>");
        self.word(
            self.term_in(index, text),
            separator,
            WordPositionSet::word(1),
            WordMatchMode::Exact,
        )
    }

    /// `child` starting at token `anchor`, counted from 1.
    pub fn head(&self, child: Box<dyn QueryNode>, anchor: Location) -> Result<Box<dyn QueryNode>> {
        if anchor == 0 {
            return Err(DocwalkError::query("head anchor counts from 1"));
        }
        Ok(Box::new(
            HeadLeafNode::new(child, anchor)
                .with_selectivity(self.config.selectivity.anchored)
                .with_pool_capacity(self.config.pool_capacity),
        ))
    }

    /// `child` ending `offset` tokens before the document end.
    pub fn tail(
        &self,
        child: Box<dyn QueryNode>,
        offset: u32,
        info: Arc<dyn SearchInformation>,
    ) -> Box<dyn QueryNode> {
        Box::new(
            TailLeafNode::new(child, offset, info)
                .with_selectivity(self.config.selectivity.anchored)
                .with_pool_capacity(self.config.pool_capacity),
        )
    }

    /// Intersection without positional constraints.
    pub fn and(&self, children: Vec<Box<dyn QueryNode>>) -> Result<Box<dyn QueryNode>> {
        Self::require_children(&children)?;
        Ok(Box::new(AndLeafNode::new(children)))
    }

    /// Union of `children`.
    pub fn or(&self, children: Vec<Box<dyn QueryNode>>) -> Result<Box<dyn QueryNode>> {
        Self::require_children(&children)?;
        Ok(Box::new(
            OrLeafNode::new(children).with_pool_capacity(self.config.pool_capacity),
        ))
    }

    /// Documents of `positive` that `negative` does not match.
    pub fn and_not(
        &self,
        positive: Box<dyn QueryNode>,
        negative: Box<dyn QueryNode>,
    ) -> Box<dyn QueryNode> {
        Box::new(AndNotLeafNode::new(positive, negative))
    }

    /// Children in order, each at or after the end of the previous one.
    pub fn ordered_distance(&self, children: Vec<Box<dyn QueryNode>>) -> Result<Box<dyn QueryNode>> {
        Self::require_children(&children)?;
        Ok(Box::new(
            OrderedDistanceLeafNode::new(children).with_pool_capacity(self.config.pool_capacity),
        ))
    }

    /// Ordered children whose start-to-start width lies in `[lower, upper]`.
    pub fn within(
        &self,
        children: Vec<Box<dyn QueryNode>>,
        lower: u32,
        upper: u32,
    ) -> Result<Box<dyn QueryNode>> {
        Self::require_children(&children)?;
        if lower > upper {
            return Err(DocwalkError::query(format!(
                "window lower bound {lower} exceeds upper bound {upper}"
            )));
        }
        Ok(Box::new(
            WithinOrderedLeafNode::new(children, lower, upper)
                .with_pool_capacity(self.config.pool_capacity),
        ))
    }

    fn require_children(children: &[Box<dyn QueryNode>]) -> Result<()> {
        if children.is_empty() {
            return Err(DocwalkError::query("a query node needs at least one child"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectivityConfig;
    use crate::query::test_support::collect;

    fn index() -> MemoryIndex {
        let documents = vec![
            (1, vec!["the", "quick", "brown", "fox"]),
            (2, vec!["quick", "quick", "fox", "brown"]),
            (3, vec!["brown", "fox", "and", "the", "##re", "quick", "dog"]),
        ];
        MemoryIndex::from_documents(documents).unwrap()
    }

    #[test]
    fn test_phrase_of_words() {
        let index = index();
        let factory = NodeFactory::default();
        let mut phrase = factory
            .ordered_distance(vec![factory.word_in(&index, "brown"), factory.word_in(&index, "fox")])
            .unwrap();
        assert_eq!(collect(phrase.as_mut()), vec![1, 3]);
    }

    #[test]
    fn test_word_rejects_partial_tokens() {
        let index = index();
        let factory = NodeFactory::default();
        // Document 3 has "the" followed by a continuation piece.
        let mut word = factory.word_in(&index, "the");
        assert_eq!(collect(word.as_mut()), vec![1]);

        let mut term = factory.term_in(&index, "the");
        assert_eq!(collect(term.as_mut()), vec![1, 3]);
    }

    #[test]
    fn test_anchors_and_within() {
        let index = index();
        let factory = NodeFactory::default();

        let mut head = factory.head(factory.word_in(&index, "quick"), 1).unwrap();
        assert_eq!(collect(head.as_mut()), vec![2]);

        let mut tail = factory.tail(
            factory.word_in(&index, "fox"),
            0,
            index.search_information(),
        );
        assert_eq!(collect(tail.as_mut()), vec![1]);

        let mut near = factory
            .within(vec![factory.word_in(&index, "quick"), factory.word_in(&index, "brown")], 0, 2)
            .unwrap();
        assert_eq!(collect(near.as_mut()), vec![1, 2]);
    }

    #[test]
    fn test_union_and_exclusion() {
        let index = index();
        let factory = NodeFactory::default();
        let mut either = factory
            .or(vec![factory.word_in(&index, "dog"), factory.word_in(&index, "the")])
            .unwrap();
        assert_eq!(collect(either.as_mut()), vec![1, 3]);

        let fox = factory.word_in(&index, "fox");
        let excluded = factory.or(vec![factory.word_in(&index, "dog")]).unwrap();
        let mut without_dog = factory.and_not(fox, excluded);
        assert_eq!(collect(without_dog.as_mut()), vec![1, 2]);
        let description = without_dog.description();
        assert!(description.starts_with("AndNot(Word["), "{description}");
        assert!(description.contains("Or(Word["), "{description}");
    }

    #[test]
    fn test_invalid_arguments() {
        let index = index();
        let factory = NodeFactory::default();
        assert!(factory.ordered_distance(Vec::new()).is_err());
        assert!(factory.and(Vec::new()).is_err());
        assert!(factory.or(Vec::new()).is_err());
        assert!(factory.head(factory.word_in(&index, "fox"), 0).is_err());
        let err = factory
            .within(vec![factory.word_in(&index, "fox")], 3, 1)
            .unwrap_err();
        assert!(matches!(err, DocwalkError::Query(_)));
    }

    #[test]
    fn test_configured_selectivity() {
        let index = index();
        let factory = NodeFactory::new(QueryConfig {
            selectivity: SelectivityConfig {
                exact_word: 1,
                ..SelectivityConfig::default()
            },
            ..QueryConfig::default()
        });
        assert_eq!(factory.word_in(&index, "fox").estimate_count(), 3);
        assert_eq!(NodeFactory::default().word_in(&index, "fox").estimate_count(), 0);
    }
}
