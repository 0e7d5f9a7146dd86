//! Per-call options for batch queries

use crate::float_types::default_num_threads;

/// Options shared by the batch query operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Worker threads to split the batch over (0 is treated as 1)
    pub n_threads: usize,
    /// Skip the index for points outside the mesh's bounding box
    pub trunc_aabb: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            n_threads: default_num_threads(),
            trunc_aabb: false,
        }
    }
}

impl QueryOptions {
    pub const fn with_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }

    pub const fn with_trunc_aabb(mut self, trunc_aabb: bool) -> Self {
        self.trunc_aabb = trunc_aabb;
        self
    }
}
