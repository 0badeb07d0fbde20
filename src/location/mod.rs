//! Positional cursors used to verify phrase, proximity and word-boundary
//! constraints inside one document.
//!
//! Every cursor walks the sorted position list of its owner's *current*
//! document. Within one reset cycle the positions it returns are strictly
//! increasing; [`LocationCursor::reset`] is the only way back to the start.

pub mod anchor;
pub mod ordered;
pub mod pool;
pub mod union;
pub mod word;

use std::any::Any;
use std::fmt::Debug;

use crate::types::{Location, Occurrence, successor};

pub use self::anchor::{HeadLocationCursor, TailLocationCursor};
pub use self::ordered::{DistanceWindow, OrderedDistanceLocationCursor};
pub use self::pool::{CursorPool, DEFAULT_POOL_CAPACITY};
pub use self::union::UnionLocationCursor;
pub use self::word::{WordLocationCursor, WordMatchMode, WordPositionSet};

/// Contract shared by every positional cursor.
pub trait LocationCursor: Debug + Send {
    /// First occurrence at or after `location`.
    ///
    /// A call with the same or a smaller `location` than the last one returns
    /// the previous result without touching any wrapped cursor.
    fn lower_bound(&mut self, location: Location) -> Occurrence;

    /// The occurrence returned by the last `lower_bound`/`next`, or
    /// [`Occurrence::UNDEFINED`] if nothing was consumed since the last reset.
    fn current(&self) -> Occurrence;

    /// Advance past the current occurrence.
    fn next(&mut self) -> Occurrence;

    /// Rewind to the start of the position list, re-arming wrapped cursors.
    fn reset(&mut self);

    /// Drop references to borrowed child cursors.
    fn clear(&mut self) {}

    /// Convert into `Any` so the owning node can put the cursor back into
    /// its typed pool.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// True iff the first occurrence at or after `location` starts exactly
    /// at `location`.
    fn find(&mut self, location: Location) -> bool {
        location != crate::types::UNDEFINED_LOCATION
            && self.lower_bound(location).location == location
    }

    /// Number of occurrences in the document. Walks the whole list.
    fn term_frequency(&mut self) -> u32 {
        self.reset();
        let mut count = 0;
        while !self.next().is_undefined() {
            count += 1;
        }
        self.reset();
        count
    }
}

/// Reset/positioned/exhausted bookkeeping shared by the concrete cursors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CursorState {
    current: Occurrence,
    started: bool,
}

impl Default for CursorState {
    fn default() -> Self {
        CursorState {
            current: Occurrence::UNDEFINED,
            started: false,
        }
    }
}

impl CursorState {
    /// Cached answer for `location`, if the last result already covers it.
    #[inline]
    pub(crate) fn cached(&self, location: Location) -> Option<Occurrence> {
        if self.started && location <= self.current.location {
            Some(self.current)
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn store(&mut self, occurrence: Occurrence) -> Occurrence {
        self.started = true;
        self.current = occurrence;
        occurrence
    }

    /// Target for `next()`.
    #[inline]
    pub(crate) fn next_target(&self) -> Location {
        if self.started {
            successor(self.current.location)
        } else {
            0
        }
    }

    #[inline]
    pub(crate) fn current(&self) -> Occurrence {
        if self.started {
            self.current
        } else {
            Occurrence::UNDEFINED
        }
    }

    #[inline]
    pub(crate) fn reset(&mut self) {
        *self = CursorState::default();
    }
}

/// Recover a concrete cursor from a trait object handed back by a parent.
pub fn downcast_cursor<C: LocationCursor + 'static>(
    cursor: Box<dyn LocationCursor>,
) -> Option<Box<C>> {
    cursor.into_any().downcast::<C>().ok()
}

/// Cursor over a plain sorted slice of positions.
///
/// This is the shape of cursor the index-access layer hands out; it is also
/// what the tests use as a fixture.
#[derive(Debug, Clone)]
pub struct SliceLocationCursor {
    positions: Vec<Location>,
    length: u32,
    index: usize,
    state: CursorState,
}

impl SliceLocationCursor {
    /// Create a cursor over `positions` where every match spans `length` tokens.
    ///
    /// Positions must be sorted and unique.
    pub fn new(positions: Vec<Location>, length: u32) -> Self {
        debug_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        SliceLocationCursor {
            positions,
            length,
            index: 0,
            state: CursorState::default(),
        }
    }

    /// Replace the position list, keeping the allocation.
    pub fn rebind(&mut self, positions: &[Location], length: u32) {
        self.positions.clear();
        self.positions.extend_from_slice(positions);
        self.length = length;
        self.reset();
    }
}

impl LocationCursor for SliceLocationCursor {
    fn lower_bound(&mut self, location: Location) -> Occurrence {
        if let Some(hit) = self.state.cached(location) {
            return hit;
        }
        let rest = &self.positions[self.index..];
        self.index += rest.partition_point(|&p| p < location);
        let hit = match self.positions.get(self.index) {
            Some(&p) => Occurrence::new(p, self.length),
            None => Occurrence::UNDEFINED,
        };
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
        self.index = 0;
        self.state.reset();
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn term_frequency(&mut self) -> u32 {
        self.positions.len() as u32
    }
}
