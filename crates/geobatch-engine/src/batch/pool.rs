//! Pool of reusable tessellator contexts shared by the worker threads.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_queue::SegQueue;

use super::tessellate::TessellatorContext;

/// Lock-free pool of [`TessellatorContext`]s.
///
/// Grows on demand and never shrinks. Creating more contexts than there are
/// workers is harmless but logged, since it means contexts are not being
/// returned promptly.
pub struct TessellatorPool {
    idle: SegQueue<TessellatorContext>,
    created: AtomicUsize,
    expected: usize,
}

impl TessellatorPool {
    /// `expected` is the number of contexts the pool should settle at
    /// (normally the worker count).
    pub fn new(expected: usize) -> Self {
        Self {
            idle: SegQueue::new(),
            created: AtomicUsize::new(0),
            expected,
        }
    }

    /// Pops an idle context or constructs a new one.
    pub fn acquire(&self) -> TessellatorContext {
        if let Some(ctx) = self.idle.pop() {
            return ctx;
        }

        let created = self.created.fetch_add(1, Ordering::Relaxed) + 1;
        if created > self.expected {
            log::info!(
                "tessellator pool grew to {created} contexts (expected at most {})",
                self.expected
            );
        }
        TessellatorContext::new()
    }

    #[inline]
    pub fn release(&self, ctx: TessellatorContext) {
        self.idle.push(ctx);
    }

    /// Acquires a context that returns to the pool when the lease drops.
    #[inline]
    pub fn lease(&self) -> TessellatorLease<'_> {
        TessellatorLease {
            pool: self,
            ctx: Some(self.acquire()),
        }
    }

    /// Contexts constructed so far.
    #[inline]
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    /// Contexts currently sitting in the pool.
    #[inline]
    pub fn idle(&self) -> usize {
        self.idle.len()
    }
}

/// Scoped pool checkout. Released on every exit path, unwinding included.
pub struct TessellatorLease<'a> {
    pool: &'a TessellatorPool,
    ctx: Option<TessellatorContext>,
}

impl Deref for TessellatorLease<'_> {
    type Target = TessellatorContext;

    fn deref(&self) -> &TessellatorContext {
        // Only taken in `drop`.
        self.ctx.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl DerefMut for TessellatorLease<'_> {
    fn deref_mut(&mut self) -> &mut TessellatorContext {
        self.ctx.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl Drop for TessellatorLease<'_> {
    fn drop(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            self.pool.release(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_context_is_reused() {
        let pool = TessellatorPool::new(2);
        let ctx = pool.acquire();
        pool.release(ctx);
        let _again = pool.acquire();
        assert_eq!(pool.created(), 1);
    }

    #[test]
    fn grows_past_expected_when_contended() {
        let pool = TessellatorPool::new(1);
        let a = pool.acquire();
        let b = pool.acquire();
        assert_eq!(pool.created(), 2);
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn lease_returns_on_drop() {
        let pool = TessellatorPool::new(1);
        {
            let _lease = pool.lease();
            assert_eq!(pool.idle(), 0);
        }
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn lease_returns_on_unwind() {
        let pool = TessellatorPool::new(1);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _lease = pool.lease();
            panic!("worker failure");
        }));
        assert!(result.is_err());
        assert_eq!(pool.idle(), 1);
    }
}
