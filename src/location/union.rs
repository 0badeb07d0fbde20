//! Union of several position lists.

use std::any::Any;

use super::{CursorState, LocationCursor};
use crate::types::{Location, Occurrence};

/// Merges the occurrences of several cursors in location order.
///
/// Each child carries a tag naming the node it came from, so the owner can
/// hand it back after [`UnionLocationCursor::unbind`]. When several children
/// start at the same location the shortest occurrence is reported, and only
/// once.
#[derive(Debug, Default)]
pub struct UnionLocationCursor {
    children: Vec<(usize, Box<dyn LocationCursor>)>,
    state: CursorState,
}

impl UnionLocationCursor {
    pub fn new(capacity: usize) -> Self {
        UnionLocationCursor {
            children: Vec::with_capacity(capacity),
            state: CursorState::default(),
        }
    }

    /// Add the positions of the child tagged `tag`.
    pub fn push(&mut self, tag: usize, child: Box<dyn LocationCursor>) {
        self.children.push((tag, child));
        self.state.reset();
    }

    /// Detach every child together with its tag.
    pub fn unbind(&mut self) -> std::vec::Drain<'_, (usize, Box<dyn LocationCursor>)> {
        self.state.reset();
        self.children.drain(..)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn lower_bound_impl(&mut self, location: Location) -> Occurrence {
        let mut best = Occurrence::UNDEFINED;
        for (_, child) in &mut self.children {
            let hit = child.lower_bound(location);
            if hit.location < best.location
                || (hit.location == best.location && hit.length < best.length)
            {
                best = hit;
            }
        }
        best
    }
}

impl LocationCursor for UnionLocationCursor {
    fn lower_bound(&mut self, location: Location) -> Occurrence {
        if let Some(hit) = self.state.cached(location) {
            return hit;
        }
        let hit = self.lower_bound_impl(location);
        self.state.store(hit)
    }

    fn current(&self) -> Occurrence {
        self.state.current()
    }

    fn next(&mut self) -> Occurrence {
        let target = self.state.next_target();
        self.lower_bound(target)
    }

    fn reset(&mut self) {
        for (_, child) in &mut self.children {
            child.reset();
        }
        self.state.reset();
    }

    fn clear(&mut self) {
        self.children.clear();
        self.state.reset();
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::SliceLocationCursor;

    fn union(children: Vec<(Vec<Location>, u32)>) -> UnionLocationCursor {
        let mut cursor = UnionLocationCursor::new(children.len());
        for (tag, (positions, length)) in children.into_iter().enumerate() {
            cursor.push(tag, Box::new(SliceLocationCursor::new(positions, length)));
        }
        cursor
    }

    fn drain(cursor: &mut UnionLocationCursor) -> Vec<Occurrence> {
        std::iter::from_fn(|| Some(cursor.next()))
            .take_while(|o| !o.is_undefined())
            .collect()
    }

    #[test]
    fn test_merges_in_location_order() {
        let mut cursor = union(vec![(vec![2, 9], 1), (vec![4, 5, 9], 1)]);
        let locations: Vec<Location> = drain(&mut cursor).iter().map(|o| o.location).collect();
        assert_eq!(locations, vec![2, 4, 5, 9]);
        assert_eq!(cursor.term_frequency(), 4);
    }

    #[test]
    fn test_shared_start_reports_shortest() {
        let mut cursor = union(vec![(vec![3], 2), (vec![3], 1)]);
        assert_eq!(cursor.lower_bound(1), Occurrence::new(3, 1));
        assert!(cursor.next().is_undefined());
    }

    #[test]
    fn test_unbind_returns_tags_and_reset_round_trips() {
        let mut cursor = union(vec![(vec![1], 1), (Vec::new(), 1), (vec![6], 1)]);
        let first = drain(&mut cursor);
        cursor.reset();
        assert_eq!(drain(&mut cursor), first);

        let tags: Vec<usize> = cursor.unbind().map(|(tag, _)| tag).collect();
        assert_eq!(tags, vec![0, 1, 2]);
        assert!(cursor.is_empty());

        let mut empty = UnionLocationCursor::new(0);
        assert!(empty.next().is_undefined());
    }
}
