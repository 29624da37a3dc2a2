//! Off-thread triangulation of polygons submitted without indices.
//!
//! Work items run FIFO on a dedicated rayon pool. The submitting thread
//! never blocks in [`TessellationScheduler::submit`]; the rendering thread
//! joins with [`TessellationScheduler::wait_idle`].

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use super::buffer::SlotRef;
use super::error::{BatchError, GeometryError};
use super::pool::TessellatorPool;

/// Triangulation that failed; the polygon stays unindexed.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFailure {
    /// Submission slot (the index returned by `append`).
    pub slot: usize,
    pub error: GeometryError,
}

#[derive(Default)]
struct InFlight {
    count: Mutex<usize>,
    idle: Condvar,
}

impl InFlight {
    fn enter(&self) {
        *self.count.lock() += 1;
    }

    fn leave(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }
}

/// Decrements the in-flight counter when the work item ends, panics included.
struct InFlightGuard(Arc<InFlight>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.leave();
    }
}

pub struct TessellationScheduler {
    workers: rayon::ThreadPool,
    pool: Arc<TessellatorPool>,
    in_flight: Arc<InFlight>,
    failures: Arc<Mutex<Vec<(u64, PolygonFailure)>>>,
}

impl TessellationScheduler {
    pub fn new(worker_threads: usize) -> Result<Self, BatchError> {
        let workers = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_threads)
            .thread_name(|idx| format!("geobatch-tess-{idx}"))
            .panic_handler(|payload| {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::error!("tessellation worker panicked: {msg}");
            })
            .build()?;

        log::debug!("tessellation scheduler started with {worker_threads} workers");

        Ok(Self {
            workers,
            pool: Arc::new(TessellatorPool::new(worker_threads)),
            in_flight: Arc::new(InFlight::default()),
            failures: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Queues triangulation of the polygon in `slot`. Never blocks.
    pub fn submit(&self, index: usize, slot: SlotRef) {
        self.in_flight.enter();

        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        let pool = Arc::clone(&self.pool);
        let failures = Arc::clone(&self.failures);

        self.workers.spawn_fifo(move || {
            let _guard = guard;

            // Slot was reset before the worker got to it.
            let Some(vertices) = slot.vertices() else { return };

            let result = pool.lease().triangulate(&vertices);
            match result {
                Ok(indices) => {
                    if !slot.store_indices(indices) {
                        log::trace!("dropping triangulation for recycled slot {index}");
                    }
                }
                Err(error) => {
                    log::warn!("polygon {index} could not be triangulated: {error}");
                    failures
                        .lock()
                        .push((slot.generation(), PolygonFailure { slot: index, error }));
                }
            }
        });
    }

    /// Blocks until no work item is queued or running.
    pub fn wait_idle(&self) {
        let mut count = self.in_flight.count.lock();
        while *count > 0 {
            self.in_flight.idle.wait(&mut count);
        }
    }

    #[inline]
    pub fn in_flight(&self) -> usize {
        *self.in_flight.count.lock()
    }

    /// Removes and returns the failures recorded for `generation`; failures
    /// of older generations are discarded.
    pub fn take_failures(&self, generation: u64) -> Vec<PolygonFailure> {
        let mut all = self.failures.lock();
        let mut out: Vec<PolygonFailure> = all
            .drain(..)
            .filter(|(g, _)| *g == generation)
            .map(|(_, f)| f)
            .collect();
        out.sort_by_key(|f| f.slot);
        out
    }

    #[inline]
    pub fn pool(&self) -> &TessellatorPool {
        &self.pool
    }

    #[inline]
    pub fn worker_count(&self) -> usize {
        self.workers.current_num_threads()
    }
}
