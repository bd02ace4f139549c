//! Visited-node tracking for graph traversal.
//!
//! Replaces `HashSet<u32>` with direct array indexing; node ids are dense,
//! so a byte per node beats hashing on every expansion.

pub(crate) struct VisitedSet {
    data: Vec<bool>,
}

impl VisitedSet {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            data: vec![false; capacity],
        }
    }

    /// Mark `id` as visited. Returns `true` if it was NOT previously visited.
    #[inline]
    pub(crate) fn insert(&mut self, id: u32) -> bool {
        let idx = id as usize;
        if self.data[idx] {
            false
        } else {
            self.data[idx] = true;
            true
        }
    }
}
