//! Batch query engine
//!
//! Splits a point set into contiguous chunks, evaluates each chunk on its own
//! worker and writes results in input order. Workers share the engine
//! read-only; `&self` access for the whole batch means nothing can mutate the
//! mesh or its index until every worker has joined.

pub mod serial;
pub mod traits;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use serial::SerialBatchOps;
pub use traits::{BatchOps, chunk_len};

#[cfg(feature = "parallel")]
pub use parallel::ParallelBatchOps;

/// Batch backend selected by the `parallel` feature
#[cfg(feature = "parallel")]
pub type DefaultBatchOps = ParallelBatchOps;

/// Batch backend selected by the `parallel` feature
#[cfg(not(feature = "parallel"))]
pub type DefaultBatchOps = SerialBatchOps;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::Real;
    use nalgebra::Point3;

    fn line(n: usize) -> Vec<Point3<Real>> {
        (0..n).map(|i| Point3::new(i as Real, 0.0, 0.0)).collect()
    }

    #[test]
    fn chunking() {
        assert_eq!(chunk_len(10, 3), 4);
        assert_eq!(chunk_len(9, 3), 3);
        assert_eq!(chunk_len(0, 4), 1);
        assert_eq!(chunk_len(5, 0), 5);
    }

    #[test]
    fn serial_preserves_order() {
        let pts = line(17);
        let out: Vec<Real> = SerialBatchOps::new(4).map(&pts, |p| p.x * 2.0);
        assert_eq!(out, (0..17).map(|i| i as Real * 2.0).collect::<Vec<_>>());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_serial() {
        let pts = line(1001);
        let f = |p: &Point3<Real>| (p.x * 0.37).sin();
        let serial: Vec<Real> = SerialBatchOps::new(1).map(&pts, f);
        for n in [1, 2, 3, 8, 64] {
            let parallel: Vec<Real> = ParallelBatchOps::new(n).map(&pts, f);
            assert_eq!(parallel, serial);
        }
        let empty: Vec<Real> = ParallelBatchOps::new(4).map(&[], f);
        assert!(empty.is_empty());
    }
}
