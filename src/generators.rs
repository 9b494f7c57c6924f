//! Standalone lazy generators: distinct, partly_distinct, peek, accumulate, seed
//!
//! Each transformer consumes one upstream stream of `Result` items and yields
//! another. `Err` items pass through untouched and in position, so whichever
//! terminal operation drives the pipeline sees the failure. An exhausted
//! generator cannot be restarted; build a new one from a fresh source.

use async_stream::stream;
use futures_core::Stream;
use futures_util::pin_mut;
use futures_util::stream::StreamExt;
use std::collections::HashSet;
use std::hash::Hash;

use crate::stream::RS2Stream;

/// Keep only the first occurrence of every value.
///
/// Remembers every value seen so far.
///
/// # Examples
/// ```
/// use rs2_seq::generators::distinct;
/// use futures_util::stream::{self, StreamExt};
///
/// # async fn example() {
/// let source = stream::iter(vec![Ok::<_, ()>(1), Ok(1), Ok(2), Ok(1)]);
/// let result: Vec<_> = distinct(source).collect().await;
/// assert_eq!(result, vec![Ok(1), Ok(2)]);
/// # }
/// ```
pub fn distinct<S, T, E>(source: S) -> RS2Stream<Result<T, E>>
where
    S: Stream<Item = Result<T, E>> + Send + 'static,
    T: Eq + Hash + Clone + Send + 'static,
    E: Send + 'static,
{
    stream! {
        pin_mut!(source);
        let mut seen: HashSet<T> = HashSet::new();

        while let Some(item) = source.next().await {
            match item {
                Ok(value) => {
                    if seen.insert(value.clone()) {
                        yield Ok(value);
                    }
                }
                Err(err) => yield Err(err),
            }
        }
    }
    .boxed()
}

/// Collapse runs of adjacent equal values into one.
///
/// Only the previous value is remembered, so `[1, 1, 2, 1]` becomes
/// `[1, 2, 1]`.
pub fn partly_distinct<S, T, E>(source: S) -> RS2Stream<Result<T, E>>
where
    S: Stream<Item = Result<T, E>> + Send + 'static,
    T: PartialEq + Clone + Send + 'static,
    E: Send + 'static,
{
    stream! {
        pin_mut!(source);
        let mut prev: Option<T> = None;

        while let Some(item) = source.next().await {
            match item {
                Ok(value) => match &prev {
                    Some(p) if p == &value => {}
                    _ => {
                        prev = Some(value.clone());
                        yield Ok(value);
                    }
                },
                Err(err) => yield Err(err),
            }
        }
    }
    .boxed()
}

/// Pass every value through unchanged, calling `observer` on it first
pub fn peek<S, T, E, F>(source: S, mut observer: F) -> RS2Stream<Result<T, E>>
where
    S: Stream<Item = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    F: FnMut(&T) + Send + 'static,
{
    stream! {
        pin_mut!(source);
        while let Some(item) = source.next().await {
            if let Ok(value) = &item {
                observer(value);
            }
            yield item;
        }
    }
    .boxed()
}

/// Yield the running fold of the source: `a`, `f(a, b)`, `f(f(a, b), c)`, ...
pub fn accumulate<S, T, E, F>(source: S, mut combiner: F) -> RS2Stream<Result<T, E>>
where
    S: Stream<Item = Result<T, E>> + Send + 'static,
    T: Clone + Send + 'static,
    E: Send + 'static,
    F: FnMut(T, T) -> T + Send + 'static,
{
    stream! {
        pin_mut!(source);
        let mut total: Option<T> = None;

        while let Some(item) = source.next().await {
            match item {
                Ok(value) => {
                    let next = match total.take() {
                        Some(acc) => combiner(acc, value),
                        None => value,
                    };
                    total = Some(next.clone());
                    yield Ok(next);
                }
                Err(err) => yield Err(err),
            }
        }
    }
    .boxed()
}

/// Infinite stream `seed`, `f(seed)`, `f(f(seed))`, ...
pub fn seed<T, F>(mut function: F, seed_value: T) -> RS2Stream<T>
where
    T: Clone + Send + 'static,
    F: FnMut(&T) -> T + Send + 'static,
{
    stream! {
        let mut current = seed_value;
        loop {
            yield current.clone();
            current = function(&current);
        }
    }
    .boxed()
}
