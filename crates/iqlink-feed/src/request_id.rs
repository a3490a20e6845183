//! Correlation id allocation for historical requests.

use std::sync::atomic::{AtomicU32, Ordering};

/// Monotonically increasing request ids.
///
/// Ids start at 1, are unique for the process lifetime, and are never
/// reused. Allocation never blocks and is safe from any thread.
#[derive(Debug)]
pub struct RequestIdAllocator {
    next: AtomicU32,
}

impl RequestIdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }

    /// A fresh id, greater than every previously returned one.
    pub fn next_id(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for RequestIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
