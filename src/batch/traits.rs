//! Trait defining batch fan-out for dependency inversion

use crate::float_types::Real;
use nalgebra::Point3;

/// Runs a per-point function over a batch and writes each result at the
/// point's own index.
///
/// Points are split into contiguous chunks of [`chunk_len`] points, one per
/// worker. Implementations must return only after every chunk is written.
pub trait BatchOps {
    /// Evaluate `f` for every point into the matching slot of `out`.
    ///
    /// `out.len()` must equal `points.len()`.
    fn map_into<T, F>(&self, points: &[Point3<Real>], out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(&Point3<Real>) -> T + Sync;

    /// Allocate the output and evaluate `f` for every point.
    fn map<T, F>(&self, points: &[Point3<Real>], f: F) -> Vec<T>
    where
        T: Send + Clone + Default,
        F: Fn(&Point3<Real>) -> T + Sync,
    {
        let mut out = vec![T::default(); points.len()];
        self.map_into(points, &mut out, f);
        out
    }
}

/// Points per chunk when splitting `n_points` across `n_threads` workers
/// (`ceil(n_points / n_threads)`, at least 1).
#[inline]
pub const fn chunk_len(n_points: usize, n_threads: usize) -> usize {
    let n_threads = if n_threads == 0 { 1 } else { n_threads };
    let len = n_points.div_ceil(n_threads);
    if len == 0 { 1 } else { len }
}
