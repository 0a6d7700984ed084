#[macro_use]
extern crate tracing;

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::{any::Any, num::NonZero, sync::Arc};
use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] ThreadPoolBuildError),

    /// The closure panicked, so its result was never sent back
    #[error("stylesheet worker panicked")]
    Panicked,

    #[error(transparent)]
    TokioJoin(#[from] tokio::task::JoinError),
}

/// Thread pool for CPU-bound stylesheet work (compilation, prefixing)
///
/// Cheap to clone. All clones share the same threads.
#[derive(Clone)]
pub struct CpuPool {
    inner: Arc<ThreadPool>,
}

impl CpuPool {
    /// Build a new pool
    ///
    /// Without an explicit thread count, rayon picks one thread per logical core.
    /// A panicking closure is logged and fails only its own [`CpuPool::spawn`] call.
    pub fn new(num_threads: Option<NonZero<usize>>) -> Result<Self, Error> {
        let mut builder = ThreadPoolBuilder::new()
            .thread_name(|idx| format!("chime-cpu-{idx}"))
            .panic_handler(|payload| {
                error!(panic = panic_message(payload.as_ref()), "worker panicked");
            });
        if let Some(num_threads) = num_threads {
            builder = builder.num_threads(num_threads.get());
        }

        Ok(Self {
            inner: Arc::new(builder.build()?),
        })
    }

    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.inner.current_num_threads()
    }

    /// Run the closure on the pool and wait for its output without blocking the runtime
    pub async fn spawn<F, O>(&self, func: F) -> Result<O, Error>
    where
        F: FnOnce() -> O + Send + 'static,
        O: Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();

        self.inner.spawn(move || {
            let _span = debug_span!("cpu-worker", id = ?rayon::current_thread_index()).entered();

            let out = func();

            if sender.send(out).is_err() {
                debug!("Failed to send back value from rayon threadpool");
            }
        });

        receiver.await.map_err(|_| Error::Panicked)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}

/// Spawn I/O-bound blocking work (directory walks, blocking filesystem operations)
#[inline]
pub async fn io<F, O>(func: F) -> Result<O, Error>
where
    F: FnOnce() -> O + Send + 'static,
    O: Send + 'static,
{
    tokio::task::spawn_blocking(func).await.map_err(Error::from)
}

#[cfg(test)]
mod test {
    use crate::{CpuPool, Error};
    use std::num::NonZero;

    #[tokio::test]
    async fn runs_on_pool() {
        let pool = CpuPool::new(NonZero::new(2)).unwrap();
        assert_eq!(pool.num_threads(), 2);

        let name = pool
            .spawn(|| std::thread::current().name().map(ToOwned::to_owned))
            .await
            .unwrap();
        assert!(name.unwrap().starts_with("chime-cpu-"));
    }

    #[tokio::test]
    async fn panicking_job_fails_alone() {
        let pool = CpuPool::new(NonZero::new(1)).unwrap();

        let result = pool.spawn(|| -> u8 { panic!("compiler bug") }).await;
        assert!(matches!(result, Err(Error::Panicked)));

        let value = pool.spawn(|| 7).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn io_returns_value() {
        let value = crate::io(|| 21 * 2).await.unwrap();
        assert_eq!(value, 42);
    }
}
