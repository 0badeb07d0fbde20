//! Top-level driver: walks a query tree and scores every hit.

use std::cmp::Ordering;
use std::sync::Arc;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::QueryConfig;
use crate::error::{DocwalkError, Result};
use crate::query::QueryNode;
use crate::scoring::{ScoreArgument, ScoreArgumentKind, ScoreCalculator};
use crate::search_info::SearchInformation;
use crate::types::{DocumentId, Occurrence, UNDEFINED_DOCUMENT_ID, successor};

/// One document matched by a query, before scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: DocumentId,
    pub term_frequency: u32,
    /// Empty when the root node has no positional information.
    pub occurrences: Vec<Occurrence>,
}

/// A scored hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub id: DocumentId,
    pub term_frequency: u32,
    pub document_length: u32,
    pub score: f64,
    pub occurrences: Vec<Occurrence>,
}

/// Matches of one walk plus the total number of matching documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    pub matches: Vec<Match>,
    /// Matching documents, including those past the hit limit.
    pub document_frequency: u32,
}

/// Runs query trees against one corpus.
#[derive(Debug)]
pub struct Searcher {
    info: Arc<dyn SearchInformation>,
    calculator: Box<dyn ScoreCalculator>,
    arguments: Vec<ScoreArgumentKind>,
    max_hits: Option<usize>,
}

impl Searcher {
    pub fn new(info: Arc<dyn SearchInformation>, mut calculator: Box<dyn ScoreCalculator>) -> Self {
        let mut arguments = Vec::new();
        calculator.initialize(&mut arguments);
        Searcher {
            info,
            calculator,
            arguments,
            max_hits: None,
        }
    }

    /// Searcher with the calculator and hit limit of `config`.
    pub fn from_config(config: &QueryConfig, info: Arc<dyn SearchInformation>) -> Result<Self> {
        Ok(Searcher::new(info, config.calculator()?).with_max_hits(config.max_hits))
    }

    /// Keep at most `max_hits` hits. Documents past the limit still count
    /// towards the document frequency.
    pub fn with_max_hits(mut self, max_hits: Option<usize>) -> Self {
        self.max_hits = max_hits;
        self
    }

    /// Statistics the calculator reads.
    pub fn arguments(&self) -> &[ScoreArgumentKind] {
        &self.arguments
    }

    /// Walk `root` from the first document, collecting matches and positions.
    pub fn collect(&self, root: &mut dyn QueryNode) -> MatchSet {
        root.reset();
        let limit = self.max_hits.unwrap_or(usize::MAX);
        let mut set = MatchSet::default();

        let mut id = root.lower_bound(0, false);
        while id != UNDEFINED_DOCUMENT_ID {
            set.document_frequency += 1;
            if set.matches.len() < limit {
                let term_frequency = root.term_frequency();
                let occurrences = Self::occurrences(root);
                trace!("document {id} matched {term_frequency} times");
                set.matches.push(Match {
                    id,
                    term_frequency,
                    occurrences,
                });
            }
            id = root.lower_bound(successor(id), false);
        }
        debug!(
            "{} matched {} documents",
            root.description(),
            set.document_frequency
        );
        set
    }

    fn occurrences(root: &mut dyn QueryNode) -> Vec<Occurrence> {
        let Some(mut cursor) = root.location_cursor() else {
            return Vec::new();
        };
        let mut occurrences = Vec::new();
        loop {
            let occurrence = cursor.next();
            if occurrence.is_undefined() {
                break;
            }
            occurrences.push(occurrence);
        }
        root.release_location_cursor(cursor);
        occurrences
    }

    /// Score a match. The document frequency is the number of matching
    /// documents.
    pub fn score(&self, hit: Match, document_frequency: u32) -> Result<ScoredDocument> {
        let document_length = self.info.document_length(hit.id).ok_or_else(|| {
            DocwalkError::index(format!("no length recorded for document {}", hit.id))
        })?;
        let argument = ScoreArgument {
            term_frequency: hit.term_frequency,
            document_frequency,
            total_document_count: self.info.document_count(),
            document_length,
            average_document_length: self.info.average_document_length(),
        };
        Ok(ScoredDocument {
            id: hit.id,
            term_frequency: hit.term_frequency,
            document_length,
            score: self.calculator.score(&argument),
            occurrences: hit.occurrences,
        })
    }

    /// Every hit of `root`, in document order.
    pub fn search(&self, root: &mut dyn QueryNode) -> Result<Vec<ScoredDocument>> {
        let MatchSet {
            matches,
            document_frequency,
        } = self.collect(root);
        matches
            .into_iter()
            .map(|hit| self.score(hit, document_frequency))
            .collect()
    }
}

/// Sort by descending score, ties by ascending id.
pub fn rank(hits: &mut [ScoredDocument]) {
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;
    use crate::query::NodeFactory;
    use crate::scoring::create_calculator;
    use crate::search_info::MemorySearchInformation;

    fn corpus() -> MemoryIndex {
        MemoryIndex::from_documents(vec![
            (1, vec!["a", "b", "c", "a", "b"]),
            (2, vec!["b", "a", "c"]),
            (3, vec!["c", "a", "b", "c", "c", "c", "c", "c"]),
            (4, vec!["d"]),
        ])
        .unwrap()
    }

    fn phrase(factory: &NodeFactory, index: &MemoryIndex) -> Box<dyn QueryNode> {
        factory
            .ordered_distance(vec![factory.word_in(index, "a"), factory.word_in(index, "b")])
            .unwrap()
    }

    #[test]
    fn test_collect_positions_and_frequency() {
        let index = corpus();
        let factory = NodeFactory::default();
        let searcher = Searcher::new(index.search_information(), create_calculator("").unwrap());
        let mut root = phrase(&factory, &index);

        let set = searcher.collect(root.as_mut());
        assert_eq!(set.document_frequency, 2);
        assert_eq!(set.matches[0].id, 1);
        assert_eq!(set.matches[0].term_frequency, 2);
        assert_eq!(
            set.matches[0].occurrences,
            vec![Occurrence::new(1, 2), Occurrence::new(4, 2)]
        );
        assert_eq!(set.matches[1].id, 3);
        assert_eq!(set.matches[1].occurrences, vec![Occurrence::new(2, 2)]);
    }

    #[test]
    fn test_search_scores_hits() {
        let index = corpus();
        let factory = NodeFactory::default();
        let searcher = Searcher::new(index.search_information(), create_calculator("OkapiTf").unwrap());
        let mut root = phrase(&factory, &index);

        let mut hits = searcher.search(root.as_mut()).unwrap();
        assert_eq!(hits.len(), 2);
        // avgdl = 17 / 4
        let avg = 17.0 / 4.0;
        assert_eq!(hits[0].score, 2.0 / (2.0 + 5.0 / avg));
        assert_eq!(hits[1].score, 1.0 / (1.0 + 8.0 / avg));

        rank(&mut hits);
        assert_eq!(hits[0].id, 1);

        // A second search over the same tree starts from the beginning.
        assert_eq!(searcher.search(root.as_mut()).unwrap().len(), 2);
    }

    #[test]
    fn test_max_hits_still_counts_every_document() {
        let index = corpus();
        let factory = NodeFactory::default();
        let config = QueryConfig {
            max_hits: Some(1),
            ..QueryConfig::default()
        };
        let searcher = Searcher::from_config(&config, index.search_information()).unwrap();
        let mut root = phrase(&factory, &index);

        let set = searcher.collect(root.as_mut());
        assert_eq!(set.matches.len(), 1);
        assert_eq!(set.document_frequency, 2);
    }

    #[test]
    fn test_missing_length_is_an_index_error() {
        let index = corpus();
        let factory = NodeFactory::default();
        let info = Arc::new(MemorySearchInformation::from_iter([(1, 5)]));
        let searcher = Searcher::new(info, create_calculator("").unwrap());
        let mut root = phrase(&factory, &index);

        let err = searcher.search(root.as_mut()).unwrap_err();
        assert!(matches!(err, DocwalkError::Index(_)));
    }

    #[test]
    fn test_rank_orders_by_score_then_id() {
        let hit = |id, score| ScoredDocument {
            id,
            term_frequency: 1,
            document_length: 1,
            score,
            occurrences: Vec::new(),
        };
        let mut hits = vec![hit(3, 0.5), hit(1, 0.9), hit(2, 0.5)];
        rank(&mut hits);
        let ids: Vec<DocumentId> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
