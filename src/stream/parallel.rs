//! Concurrency-dispatched variants of map, filter, exclude, any and all.
//!
//! Each call asks the injected [`PoolProvider`] to resolve its options. When
//! the provider answers `None` the plain sequential combinator runs instead.
//! Otherwise every element becomes a [`Task`] handed to the bulk mapper, and
//! the output order is whatever the mapper produces.

use futures::future;
use futures_util::stream::StreamExt;
use std::sync::Arc;

use super::core::{RS2Stream, Stream};
use crate::error::StreamResult;
use crate::pool::{BulkMapper, PoolProvider, Task};
use crate::stream_configuration::ConcurrencyOptions;

fn run_map_task<F, T, U>(task: StreamResult<Task<F, T>>) -> StreamResult<U>
where
    F: Fn(T) -> U,
{
    task.map(|task| (task.operation)(task.item))
}

fn run_filter_task<P, T>(task: StreamResult<Task<P, T>>) -> StreamResult<(bool, T)>
where
    P: Fn(&T) -> bool,
{
    task.map(|task| {
        let verdict = (task.operation)(&task.item);
        (verdict, task.item)
    })
}

impl<T: Send + 'static> Stream<T> {
    fn into_tasks<F>(self, operation: F) -> RS2Stream<StreamResult<Task<F, T>>>
    where
        F: Send + Sync + 'static,
    {
        let operation = Arc::new(operation);
        self.into_inner()
            .map(move |item| item.map(|value| Task::new(Arc::clone(&operation), value)))
            .boxed()
    }

    fn dispatch_map<M, F, U>(self, bulk: &M, mapper: F) -> Stream<U>
    where
        M: BulkMapper,
        F: Fn(T) -> U + Send + Sync + 'static,
        U: Send + 'static,
    {
        let results = bulk.bulk_map(run_map_task::<F, T, U>, self.into_tasks(mapper));
        Stream::lazy(results.map(|result| result.and_then(|output| output)).boxed())
    }

    fn dispatch_filter<M, P>(self, bulk: &M, predicate: P, keep: bool) -> Self
    where
        M: BulkMapper,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let results = bulk.bulk_map(run_filter_task::<P, T>, self.into_tasks(predicate));
        Self::lazy(
            results
                .filter_map(move |result| {
                    future::ready(match result.and_then(|output| output) {
                        Ok((verdict, item)) => (verdict == keep).then_some(Ok(item)),
                        Err(err) => Some(Err(err)),
                    })
                })
                .boxed(),
        )
    }

    /// `map`, dispatched through `pool` when it resolves `options` to a mapper
    pub fn map_with<P, F, U>(self, pool: &P, options: &ConcurrencyOptions, mapper: F) -> Stream<U>
    where
        P: PoolProvider,
        F: Fn(T) -> U + Send + Sync + 'static,
        U: Send + 'static,
    {
        match pool.resolve(options) {
            Some(bulk) => self.dispatch_map(&bulk, mapper),
            None => self.map(mapper),
        }
    }

    /// `filter`, dispatched through `pool` when it resolves `options` to a mapper
    pub fn filter_with<P, F>(self, pool: &P, options: &ConcurrencyOptions, predicate: F) -> Self
    where
        P: PoolProvider,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        match pool.resolve(options) {
            Some(bulk) => self.dispatch_filter(&bulk, predicate, true),
            None => self.filter(predicate),
        }
    }

    /// `exclude`, dispatched through `pool` when it resolves `options` to a mapper
    pub fn exclude_with<P, F>(self, pool: &P, options: &ConcurrencyOptions, predicate: F) -> Self
    where
        P: PoolProvider,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        match pool.resolve(options) {
            Some(bulk) => self.dispatch_filter(&bulk, predicate, false),
            None => self.exclude(predicate),
        }
    }

    /// `any`. Once dispatched, the predicate runs on every element before
    /// the results are reduced; there is no short-circuit.
    pub async fn any_with<P, F>(
        self,
        pool: &P,
        options: &ConcurrencyOptions,
        predicate: F,
    ) -> StreamResult<bool>
    where
        P: PoolProvider,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        match pool.resolve(options) {
            Some(bulk) => {
                self.dispatch_map(&bulk, move |item: T| predicate(&item))
                    .fold(false, |found, verdict| found || verdict)
                    .await
            }
            None => self.any(predicate).await,
        }
    }

    /// `all`. Once dispatched, the predicate runs on every element before
    /// the results are reduced; there is no short-circuit.
    pub async fn all_with<P, F>(
        self,
        pool: &P,
        options: &ConcurrencyOptions,
        predicate: F,
    ) -> StreamResult<bool>
    where
        P: PoolProvider,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        match pool.resolve(options) {
            Some(bulk) => {
                self.dispatch_map(&bulk, move |item: T| predicate(&item))
                    .fold(true, |held, verdict| held && verdict)
                    .await
            }
            None => self.all(predicate).await,
        }
    }
}

impl<K, V> Stream<(K, V)>
where
    K: Send + 'static,
    V: Send + 'static,
{
    /// `value_map`, dispatched through `pool` when it resolves `options`
    pub fn value_map_with<P, F, W>(
        self,
        pool: &P,
        options: &ConcurrencyOptions,
        mapper: F,
    ) -> Stream<(K, W)>
    where
        P: PoolProvider,
        F: Fn(V) -> W + Send + Sync + 'static,
        W: Send + 'static,
    {
        self.map_with(pool, options, move |(key, value)| (key, mapper(value)))
    }

    /// `key_map`, dispatched through `pool` when it resolves `options`
    pub fn key_map_with<P, F, J>(
        self,
        pool: &P,
        options: &ConcurrencyOptions,
        mapper: F,
    ) -> Stream<(J, V)>
    where
        P: PoolProvider,
        F: Fn(K) -> J + Send + Sync + 'static,
        J: Send + 'static,
    {
        self.map_with(pool, options, move |(key, value)| (mapper(key), value))
    }
}
