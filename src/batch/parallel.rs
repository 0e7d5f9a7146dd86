//! Parallel implementation of batch queries

use rayon::prelude::*;

use crate::batch::serial::SerialBatchOps;
use crate::batch::traits::{BatchOps, chunk_len};
use crate::float_types::{MAX_DEFAULT_THREADS, Real};
use hashbrown::HashMap;
use nalgebra::Point3;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Worker pools kept alive between batches, keyed by thread count.
static POOLS: OnceLock<Mutex<HashMap<usize, Arc<ThreadPool>>>> = OnceLock::new();

/// Pool with `n_threads` workers. Pools of up to [`MAX_DEFAULT_THREADS`]
/// workers are cached for the life of the process; larger ones are built
/// per call.
fn worker_pool(n_threads: usize) -> Result<Arc<ThreadPool>, ThreadPoolBuildError> {
    let build = || ThreadPoolBuilder::new().num_threads(n_threads).build().map(Arc::new);
    if n_threads > MAX_DEFAULT_THREADS {
        return build();
    }
    let mut pools = POOLS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(pool) = pools.get(&n_threads) {
        return Ok(Arc::clone(pool));
    }
    let pool = build()?;
    pools.insert(n_threads, Arc::clone(&pool));
    Ok(pool)
}

/// Fans chunks out over a rayon pool of `n_threads` workers and joins before
/// returning. Each worker writes only its own output slice.
#[derive(Debug, Clone, Copy)]
pub struct ParallelBatchOps {
    n_threads: usize,
}

impl ParallelBatchOps {
    pub const fn new(n_threads: usize) -> Self {
        Self { n_threads }
    }
}

impl Default for ParallelBatchOps {
    fn default() -> Self {
        Self::new(crate::float_types::default_num_threads())
    }
}

impl BatchOps for ParallelBatchOps {
    fn map_into<T, F>(&self, points: &[Point3<Real>], out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(&Point3<Real>) -> T + Sync,
    {
        debug_assert_eq!(points.len(), out.len());
        let n_threads = self.n_threads.max(1);
        if n_threads == 1 || points.len() <= 1 {
            return SerialBatchOps::new(1).map_into(points, out, f);
        }

        let pool = match worker_pool(n_threads) {
            Ok(pool) => pool,
            Err(err) => {
                tracing::warn!(%err, n_threads, "could not start worker pool, running serially");
                return SerialBatchOps::new(n_threads).map_into(points, out, f);
            },
        };

        let chunk = chunk_len(points.len(), n_threads);
        tracing::trace!(points = points.len(), n_threads, chunk, "dispatching batch");
        pool.install(|| {
            out.par_chunks_mut(chunk)
                .zip(points.par_chunks(chunk))
                .for_each(|(out, points)| {
                    out.iter_mut().zip(points).for_each(|(o, p)| *o = f(p));
                });
        });
    }
}
