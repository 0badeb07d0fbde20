//! Ordered-distance (phrase) merging of several position lists.

use std::any::Any;

use serde::{Deserialize, Serialize};

use super::{CursorState, LocationCursor};
use crate::types::{Location, Occurrence, successor};

/// Bounds on the distance between the first and the last child's start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceWindow {
    /// Smallest accepted start-to-start width.
    pub lower: u32,
    /// Largest accepted start-to-start width.
    pub upper: u32,
}

impl DistanceWindow {
    /// Any ordered arrangement is accepted.
    pub const UNBOUNDED: DistanceWindow = DistanceWindow {
        lower: 0,
        upper: u32::MAX,
    };

    /// A window accepting widths in `lower..=upper`.
    ///
    /// # Panics
    ///
    /// Panics if `lower > upper`.
    pub fn new(lower: u32, upper: u32) -> Self {
        assert!(
            lower <= upper,
            "distance window lower bound {lower} exceeds upper bound {upper}"
        );
        DistanceWindow { lower, upper }
    }

    /// True if `width` lies inside the window.
    #[inline]
    pub fn contains(&self, width: u32) -> bool {
        self.lower <= width && width <= self.upper
    }
}

impl Default for DistanceWindow {
    fn default() -> Self {
        DistanceWindow::UNBOUNDED
    }
}

/// Matches when every child occurs, in order, each child starting at or
/// after the end of the previous child's occurrence.
///
/// The reported occurrence starts at the first child's match and ends at the
/// last child's match end.
#[derive(Debug)]
pub struct OrderedDistanceLocationCursor {
    children: Vec<Box<dyn LocationCursor>>,
    window: DistanceWindow,
    state: CursorState,
}

impl OrderedDistanceLocationCursor {
    /// Create an empty cursor with room for `capacity` children.
    pub fn new(window: DistanceWindow, capacity: usize) -> Self {
        OrderedDistanceLocationCursor {
            children: Vec::with_capacity(capacity),
            window,
            state: CursorState::default(),
        }
    }

    /// Append the next child in phrase order.
    pub fn push(&mut self, child: Box<dyn LocationCursor>) {
        self.children.push(child);
        self.state.reset();
    }

    /// Detach every child, in phrase order. The vector keeps its capacity.
    pub fn unbind(&mut self) -> std::vec::Drain<'_, Box<dyn LocationCursor>> {
        self.state.reset();
        self.children.drain(..)
    }

    /// Number of bound children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True if no child is bound.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The accepted window.
    pub fn window(&self) -> DistanceWindow {
        self.window
    }

    fn lower_bound_impl(&mut self, location: Location) -> Occurrence {
        assert!(
            !self.children.is_empty(),
            "ordered-distance cursor evaluated without children"
        );
        let last = self.children.len() - 1;
        let mut candidate = location;

        'restart: loop {
            let first = self.children[0].lower_bound(candidate);
            if first.is_undefined() {
                return Occurrence::UNDEFINED;
            }
            let start = first.location;
            let mut end = first.end();
            let mut last_start = start;

            for index in 1..=last {
                let mut target = end;
                if index == last {
                    target = target.max(start.saturating_add(self.window.lower));
                }
                let hit = self.children[index].lower_bound(target);
                if hit.is_undefined() {
                    // Later starts only push every target further right.
                    return Occurrence::UNDEFINED;
                }
                if index == last && hit.location - start > self.window.upper {
                    candidate = successor(start);
                    continue 'restart;
                }
                last_start = hit.location;
                end = hit.end();
            }

            if !self.window.contains(last_start - start) {
                // Only reachable with a single child and a non-zero lower bound.
                return Occurrence::UNDEFINED;
            }
            return Occurrence::new(start, end - start);
        }
    }
}

impl LocationCursor for OrderedDistanceLocationCursor {
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
        for child in &mut self.children {
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
