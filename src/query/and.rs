//! N-ary intersection driven by the cheapest child.

use log::debug;

use crate::location::LocationCursor;
use crate::query::verify::{PositionCheck, Verified};
use crate::query::{CurrentDocument, QueryNode};
use crate::types::{DocumentId, UNDEFINED_DOCUMENT_ID, successor};

/// Intersection of its children.
///
/// On first use every child is asked for its estimate once; the child with
/// the smallest estimate becomes the driver. The driver proposes candidates
/// and every other child is asked for the same id. A disagreeing child
/// moves the driver to that child's answer, so the work done stays close to
/// the size of the rarest child.
#[derive(Debug)]
pub struct AndLeafNode {
    children: Vec<Box<dyn QueryNode>>,
    driver: Option<usize>,
    estimate: Option<u32>,
    current: CurrentDocument,
}

impl AndLeafNode {
    /// Intersect `children`. An empty list matches nothing.
    pub fn new(children: Vec<Box<dyn QueryNode>>) -> Self {
        AndLeafNode {
            children,
            driver: None,
            estimate: None,
            current: CurrentDocument::default(),
        }
    }

    /// The intersected nodes, in the order given.
    pub fn children(&self) -> &[Box<dyn QueryNode>] {
        &self.children
    }

    /// The intersected nodes, mutably.
    pub fn children_mut(&mut self) -> &mut [Box<dyn QueryNode>] {
        &mut self.children
    }

    /// Index of the driving child, once chosen.
    pub fn driver_index(&self) -> Option<usize> {
        self.driver
    }

    fn initialize(&mut self) -> usize {
        if let Some(driver) = self.driver {
            return driver;
        }
        let mut driver = 0;
        let mut cheapest = u32::MAX;
        for (index, child) in self.children.iter_mut().enumerate() {
            let estimate = child.estimate_count();
            if estimate < cheapest {
                cheapest = estimate;
                driver = index;
            }
        }
        if self.children.is_empty() {
            cheapest = 0;
        }
        debug!(
            "intersection of {} children driven by child {} (estimate {})",
            self.children.len(),
            driver,
            cheapest
        );
        self.driver = Some(driver);
        self.estimate = Some(cheapest);
        driver
    }

    fn intersect(&mut self, id: DocumentId, rough: bool) -> DocumentId {
        if self.children.is_empty() {
            return UNDEFINED_DOCUMENT_ID;
        }
        let driver = self.initialize();
        let mut target = id;
        'candidates: loop {
            let candidate = self.children[driver].lower_bound(target, rough);
            if candidate == UNDEFINED_DOCUMENT_ID {
                return UNDEFINED_DOCUMENT_ID;
            }
            for (index, child) in self.children.iter_mut().enumerate() {
                if index == driver {
                    continue;
                }
                let answer = child.lower_bound(candidate, rough);
                if answer == UNDEFINED_DOCUMENT_ID {
                    return UNDEFINED_DOCUMENT_ID;
                }
                if answer != candidate {
                    target = answer;
                    continue 'candidates;
                }
            }
            return candidate;
        }
    }

    /// `lower_bound` that, unless `rough`, keeps only intersections passing
    /// `verified`. A rejected candidate moves the search one document forward.
    pub(crate) fn lower_bound_with<P>(
        &mut self,
        id: DocumentId,
        rough: bool,
        verified: &mut Verified<P>,
    ) -> DocumentId
    where
        P: PositionCheck<Source = [Box<dyn QueryNode>]>,
    {
        if let Some(current) = self.current.cached(id, rough) {
            return current;
        }
        let mut target = self.current.resume_from(id);
        verified.discard(self.children.as_mut_slice());
        loop {
            let candidate = self.intersect(target, rough);
            if candidate == UNDEFINED_DOCUMENT_ID || rough {
                return self.current.store(candidate, !rough);
            }
            if verified.verify(self.children.as_mut_slice(), candidate) {
                return self.current.store(candidate, true);
            }
            target = successor(candidate);
        }
    }

    pub(crate) fn location_cursor_with<P>(
        &mut self,
        verified: &mut Verified<P>,
    ) -> Option<Box<dyn LocationCursor>>
    where
        P: PositionCheck<Source = [Box<dyn QueryNode>]>,
    {
        if !self.current.is_positioned() {
            return None;
        }
        verified.take_cursor(self.children.as_mut_slice(), self.current.get())
    }

    pub(crate) fn release_location_cursor_with<P>(
        &mut self,
        verified: &mut Verified<P>,
        cursor: Box<dyn LocationCursor>,
    ) where
        P: PositionCheck<Source = [Box<dyn QueryNode>]>,
    {
        verified.release(self.children.as_mut_slice(), cursor);
    }

    pub(crate) fn term_frequency_with<P>(&mut self, verified: &mut Verified<P>) -> u32
    where
        P: PositionCheck<Source = [Box<dyn QueryNode>]>,
    {
        if !self.current.is_positioned() {
            return 0;
        }
        verified.term_frequency(self.children.as_mut_slice(), self.current.get())
    }

    pub(crate) fn reset_with<P>(&mut self, verified: &mut Verified<P>)
    where
        P: PositionCheck<Source = [Box<dyn QueryNode>]>,
    {
        verified.discard(self.children.as_mut_slice());
        self.reset();
    }

    /// Fresh intersection over copies of the children.
    pub fn copy_and(&self) -> AndLeafNode {
        AndLeafNode::new(self.children.iter().map(|child| child.copy()).collect())
    }

    pub(crate) fn describe_children(&self) -> String {
        self.children
            .iter()
            .map(|child| child.description())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl QueryNode for AndLeafNode {
    fn lower_bound(&mut self, id: DocumentId, rough: bool) -> DocumentId {
        if let Some(current) = self.current.cached(id, rough) {
            return current;
        }
        let target = self.current.resume_from(id);
        let found = self.intersect(target, rough);
        self.current.store(found, !rough)
    }

    fn current_id(&self) -> DocumentId {
        self.current.get()
    }

    /// Smallest child estimate, computed once until the next reset.
    fn estimate_count(&mut self) -> u32 {
        self.initialize();
        self.estimate.unwrap_or(0)
    }

    /// Smallest child frequency: every child occurs at least that often.
    fn term_frequency(&mut self) -> u32 {
        if !self.current.is_positioned() {
            return 0;
        }
        self.children
            .iter_mut()
            .map(|child| child.term_frequency())
            .min()
            .unwrap_or(0)
    }

    fn location_cursor(&mut self) -> Option<Box<dyn LocationCursor>> {
        None
    }

    fn release_location_cursor(&mut self, _cursor: Box<dyn LocationCursor>) {}

    fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
        self.driver = None;
        self.estimate = None;
        self.current.clear();
    }

    fn copy(&self) -> Box<dyn QueryNode> {
        Box::new(self.copy_and())
    }

    fn description(&self) -> String {
        format!("And({})", self.describe_children())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::atomic::Ordering;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::query::test_support::{collect, counting_term, term};

    fn docs(ids: &[DocumentId]) -> Box<dyn QueryNode> {
        term(ids.iter().map(|&id| (id, vec![1])).collect())
    }

    fn and_of<'a>(sets: impl Iterator<Item = &'a BTreeSet<DocumentId>>) -> AndLeafNode {
        AndLeafNode::new(
            sets.map(|set| docs(&set.iter().copied().collect::<Vec<_>>()))
                .collect(),
        )
    }

    #[test]
    fn test_intersection_of_fixed_sets() {
        let mut node = AndLeafNode::new(vec![
            docs(&[1, 2, 3, 5, 8, 13, 21]),
            docs(&[2, 3, 5, 7, 11, 13]),
            docs(&[3, 5, 13, 30]),
        ]);
        assert_eq!(collect(&mut node), vec![3, 5, 13]);
        // The last child is the rarest.
        assert_eq!(node.driver_index(), Some(2));
        assert_eq!(node.estimate_count(), 4);
    }

    #[test]
    fn test_empty_and_disjoint() {
        let mut empty = AndLeafNode::new(Vec::new());
        assert_eq!(empty.lower_bound(0, false), UNDEFINED_DOCUMENT_ID);
        assert_eq!(empty.estimate_count(), 0);

        let mut disjoint = AndLeafNode::new(vec![docs(&[1, 3]), docs(&[2, 4])]);
        assert!(collect(&mut disjoint).is_empty());
    }

    #[test]
    fn test_random_intersections_match_set_semantics() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let count = rng.random_range(1..=4);
            let sets: Vec<BTreeSet<DocumentId>> = (0..count)
                .map(|_| {
                    let size = rng.random_range(0..60);
                    (0..size).map(|_| rng.random_range(0..100)).collect()
                })
                .collect();

            let mut expected: BTreeSet<DocumentId> = sets[0].clone();
            for set in &sets[1..] {
                expected = expected.intersection(set).copied().collect();
            }

            let mut forward = and_of(sets.iter());
            let mut backward = and_of(sets.iter().rev());

            let expected: Vec<DocumentId> = expected.into_iter().collect();
            assert_eq!(collect(&mut forward), expected);
            assert_eq!(collect(&mut backward), expected);
        }
    }

    #[test]
    fn test_repeated_lower_bound_makes_no_child_calls() {
        let (left, left_calls) = counting_term(vec![(2, vec![1]), (4, vec![1]), (9, vec![1])]);
        let (right, right_calls) = counting_term(vec![(4, vec![1]), (9, vec![1])]);
        let mut node = AndLeafNode::new(vec![left, right]);

        assert_eq!(node.lower_bound(3, false), 4);
        let before = (
            left_calls.load(Ordering::SeqCst),
            right_calls.load(Ordering::SeqCst),
        );
        assert_eq!(node.lower_bound(3, false), 4);
        assert_eq!(node.lower_bound(4, false), 4);
        let after = (
            left_calls.load(Ordering::SeqCst),
            right_calls.load(Ordering::SeqCst),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_lower_bound_is_monotonic() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut node = AndLeafNode::new(vec![
            docs(&(0..200).step_by(2).collect::<Vec<_>>()),
            docs(&(0..200).step_by(3).collect::<Vec<_>>()),
        ]);
        let mut targets: Vec<DocumentId> = (0..40).map(|_| rng.random_range(0..220)).collect();
        targets.sort_unstable();

        let mut previous = 0;
        for target in targets {
            let found = node.lower_bound(target, false);
            assert!(found >= target);
            assert!(found >= previous);
            if found != UNDEFINED_DOCUMENT_ID {
                assert_eq!(found % 6, 0);
            }
            previous = found;
        }
    }

    #[test]
    fn test_frequency_reset_and_copy() {
        let mut node = AndLeafNode::new(vec![
            term(vec![(3, vec![1, 4, 6])]),
            term(vec![(3, vec![2, 9]), (5, vec![1])]),
        ]);
        assert_eq!(node.term_frequency(), 0);
        assert!(node.location_cursor().is_none());
        assert_eq!(node.lower_bound(0, false), 3);
        assert_eq!(node.term_frequency(), 2);

        node.reset();
        assert_eq!(node.driver_index(), None);
        assert_eq!(node.current_id(), UNDEFINED_DOCUMENT_ID);
        assert_eq!(collect(&mut node), vec![3]);

        let mut copy = node.copy();
        assert_eq!(collect(copy.as_mut()), vec![3]);
        assert_eq!(copy.description(), "And(Term, Term)");
    }
}
