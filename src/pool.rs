//! Pool providers: the concurrency adapter used by `map_with`, `filter_with`,
//! `any_with` and `all_with`.
//!
//! A [`PoolProvider`] resolves per-call [`ConcurrencyOptions`] into either
//! `None` ("run sequentially") or a [`BulkMapper`]. The stream engine never
//! owns a pool; providers are injected per call, so tests can pass
//! [`SequentialPool`] or [`InlinePool`] and get deterministic behaviour.

use futures_util::stream::{BoxStream, StreamExt};
use log::{debug, warn};
use std::sync::Arc;

use crate::error::{StreamError, StreamResult};
use crate::stream_configuration::{ConcurrencyOptions, ExecutorKind};

/// A unit of dispatched work: the operation paired with the item it applies to
pub struct Task<F, T> {
    pub operation: Arc<F>,
    pub item: T,
}

impl<F, T> Task<F, T> {
    pub fn new(operation: Arc<F>, item: T) -> Self {
        Self { operation, item }
    }
}

/// Applies a worker function to a batch of tasks, possibly in parallel.
///
/// Results carry no ordering guarantee unless the implementation documents
/// one. A worker failure is reported as a single `Err` item.
pub trait BulkMapper: Send + Sync + 'static {
    fn bulk_map<I, O, W>(
        &self,
        worker: W,
        tasks: BoxStream<'static, I>,
    ) -> BoxStream<'static, StreamResult<O>>
    where
        I: Send + 'static,
        O: Send + 'static,
        W: Fn(I) -> O + Send + Sync + 'static;
}

/// Resolves concurrency options into a bulk mapper, or `None` for sequential
pub trait PoolProvider {
    type Mapper: BulkMapper;

    fn resolve(&self, options: &ConcurrencyOptions) -> Option<Self::Mapper>;
}

/// Runs every task on the consuming task, in input order
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineMapper;

impl BulkMapper for InlineMapper {
    fn bulk_map<I, O, W>(
        &self,
        worker: W,
        tasks: BoxStream<'static, I>,
    ) -> BoxStream<'static, StreamResult<O>>
    where
        I: Send + 'static,
        O: Send + 'static,
        W: Fn(I) -> O + Send + Sync + 'static,
    {
        tasks.map(move |task| Ok(worker(task))).boxed()
    }
}

/// Provider that never hands out a mapper: every call runs sequentially
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialPool;

impl PoolProvider for SequentialPool {
    type Mapper = InlineMapper;

    fn resolve(&self, _options: &ConcurrencyOptions) -> Option<InlineMapper> {
        None
    }
}

/// Provider that always dispatches through [`InlineMapper`].
///
/// Exercises the bulk-mapping path without any threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlinePool;

impl PoolProvider for InlinePool {
    type Mapper = InlineMapper;

    fn resolve(&self, _options: &ConcurrencyOptions) -> Option<InlineMapper> {
        Some(InlineMapper)
    }
}

/// Provider backed by the ambient tokio runtime
#[derive(Debug, Clone)]
pub struct TokioPool {
    default_workers: usize,
}

impl Default for TokioPool {
    fn default() -> Self {
        Self {
            default_workers: num_cpus::get(),
        }
    }
}

impl TokioPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_workers(default_workers: usize) -> Self {
        Self {
            default_workers: default_workers.max(1),
        }
    }

    pub fn default_workers(&self) -> usize {
        self.default_workers
    }
}

impl PoolProvider for TokioPool {
    type Mapper = TokioBulkMapper;

    fn resolve(&self, options: &ConcurrencyOptions) -> Option<TokioBulkMapper> {
        if options.executor == ExecutorKind::Sequential {
            debug!("Concurrency options resolved to sequential execution");
            return None;
        }

        // Zero workers would never make progress
        let workers = options.workers.unwrap_or(self.default_workers).max(1);
        debug!(
            "Resolved {:?} executor with {} workers (ordered: {})",
            options.executor, workers, options.ordered
        );

        Some(TokioBulkMapper {
            executor: options.executor,
            workers,
            ordered: options.ordered,
            timeout: options.timeout,
        })
    }
}

/// Bulk mapper running each task on tokio, with at most `workers` in flight.
///
/// Must be driven from inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioBulkMapper {
    executor: ExecutorKind,
    workers: usize,
    ordered: bool,
    timeout: Option<std::time::Duration>,
}

impl TokioBulkMapper {
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }
}

impl BulkMapper for TokioBulkMapper {
    fn bulk_map<I, O, W>(
        &self,
        worker: W,
        tasks: BoxStream<'static, I>,
    ) -> BoxStream<'static, StreamResult<O>>
    where
        I: Send + 'static,
        O: Send + 'static,
        W: Fn(I) -> O + Send + Sync + 'static,
    {
        let worker = Arc::new(worker);
        let executor = self.executor;
        let timeout = self.timeout;

        let jobs = tasks.map(move |task| {
            let worker = Arc::clone(&worker);
            async move {
                let handle = match executor {
                    ExecutorKind::Tasks => tokio::spawn(async move { worker(task) }),
                    _ => tokio::task::spawn_blocking(move || worker(task)),
                };

                let joined = match timeout {
                    Some(limit) => match tokio::time::timeout(limit, handle).await {
                        Ok(joined) => joined,
                        Err(elapsed) => {
                            warn!("Dispatched task exceeded {:?}", limit);
                            return Err(StreamError::from(elapsed));
                        }
                    },
                    None => handle.await,
                };

                joined.map_err(|err| {
                    warn!("Dispatched task failed: {}", err);
                    StreamError::from(err)
                })
            }
        });

        if self.ordered {
            jobs.buffered(self.workers).boxed()
        } else {
            jobs.buffer_unordered(self.workers).boxed()
        }
    }
}
