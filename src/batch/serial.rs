//! Serial implementation of batch queries

use crate::batch::traits::{BatchOps, chunk_len};
use crate::float_types::Real;
use nalgebra::Point3;

/// Processes the same chunks a parallel run would, one after another.
#[derive(Debug, Clone, Copy)]
pub struct SerialBatchOps {
    n_threads: usize,
}

impl SerialBatchOps {
    pub const fn new(n_threads: usize) -> Self {
        Self { n_threads }
    }
}

impl Default for SerialBatchOps {
    fn default() -> Self {
        Self::new(1)
    }
}

impl BatchOps for SerialBatchOps {
    fn map_into<T, F>(&self, points: &[Point3<Real>], out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(&Point3<Real>) -> T + Sync,
    {
        debug_assert_eq!(points.len(), out.len());
        let chunk = chunk_len(points.len(), self.n_threads);
        out.chunks_mut(chunk)
            .zip(points.chunks(chunk))
            .for_each(|(out, points)| {
                out.iter_mut().zip(points).for_each(|(o, p)| *o = f(p));
            });
    }
}
