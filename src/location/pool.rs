//! Per-node freelist of location cursors.

use log::trace;

use super::LocationCursor;

/// Default number of idle cursors a node keeps around.
pub const DEFAULT_POOL_CAPACITY: usize = 8;

/// A bounded freelist of boxed cursors owned by one query node.
///
/// Cursors are recycled between documents so that verifying a candidate
/// does not allocate once the pool is warm. The pool is private to its node
/// and therefore needs no synchronization.
#[derive(Debug)]
pub struct CursorPool<C> {
    free: Vec<Box<C>>,
    capacity: usize,
}

impl<C: LocationCursor> CursorPool<C> {
    /// Create an empty pool that retains at most `capacity` cursors.
    pub fn new(capacity: usize) -> Self {
        CursorPool {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Take an idle cursor, if any.
    pub fn acquire(&mut self) -> Option<Box<C>> {
        self.free.pop()
    }

    /// Take an idle cursor or build a new one.
    pub fn acquire_or_else<F: FnOnce() -> C>(&mut self, build: F) -> Box<C> {
        self.acquire().unwrap_or_else(|| Box::new(build()))
    }

    /// Return a cursor to the pool.
    ///
    /// Borrowed child cursors are cleared first. Returns `false` when the
    /// pool is saturated, in which case the cursor is dropped.
    pub fn release(&mut self, mut cursor: Box<C>) -> bool {
        cursor.clear();
        if self.free.len() >= self.capacity {
            trace!("cursor pool saturated at {}, dropping cursor", self.capacity);
            return false;
        }
        cursor.reset();
        self.free.push(cursor);
        true
    }

    /// Number of idle cursors.
    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// True if no idle cursor is available.
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Maximum number of idle cursors retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every idle cursor.
    pub fn clear(&mut self) {
        self.free.clear();
    }
}

impl<C: LocationCursor> Default for CursorPool<C> {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}
