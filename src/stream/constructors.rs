//! Stream constructors: sequences, pairs, futures streams, concat, iterate, range

use futures_core::Stream as FuturesStream;
use futures_util::stream::{self, StreamExt};
use std::collections::VecDeque;

use super::core::Stream;
use crate::error::{StreamError, StreamResult};
use crate::generators;

impl<T: Send + 'static> Stream<T> {
    /// Stream over an in-memory sequence.
    ///
    /// The elements are buffered, so the stream knows its length and can be
    /// reversed without copying. Use [`Stream::from_iterator`] for unbounded
    /// iterators.
    pub fn from_sequence<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::buffered(items.into_iter().collect())
    }

    /// Stream pulling lazily from an iterator, which may be infinite
    pub fn from_iterator<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self::lazy(stream::iter(items.into_iter().map(Ok)).boxed())
    }

    /// Stream over any futures stream
    pub fn from_stream<S>(source: S) -> Self
    where
        S: FuturesStream<Item = T> + Send + 'static,
    {
        Self::lazy(source.map(Ok).boxed())
    }

    /// Stream over a fallible futures stream; the first `Err` aborts consumption
    pub fn from_results<S>(source: S) -> Self
    where
        S: FuturesStream<Item = StreamResult<T>> + Send + 'static,
    {
        Self::lazy(source.boxed())
    }

    pub fn empty() -> Self {
        Self::buffered(VecDeque::new())
    }

    /// Flatten several streams into one, in argument order
    pub fn concat<I>(streams: I) -> Self
    where
        I: IntoIterator<Item = Stream<T>>,
    {
        Stream::from_sequence(streams).chain()
    }

    /// Infinite stream `seed`, `function(seed)`, `function(function(seed))`, ...
    pub fn iterate<F>(function: F, seed: T) -> Self
    where
        T: Clone,
        F: FnMut(&T) -> T + Send + 'static,
    {
        Self::from_stream(generators::seed(function, seed))
    }
}

impl<K, V> Stream<(K, V)>
where
    K: Send + 'static,
    V: Send + 'static,
{
    /// Stream over a mapping's `(key, value)` pairs, in the mapping's own
    /// iteration order
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_sequence(pairs)
    }
}

impl Stream<i64> {
    /// `0, 1, ..., stop - 1`
    pub fn range_to(stop: i64) -> Self {
        Self::range(0, stop)
    }

    /// `start, start + 1, ..., stop - 1`
    pub fn range(start: i64, stop: i64) -> Self {
        Self::from_iterator(start..stop)
    }

    /// Arithmetic range with an exclusive `stop`; `step` may be negative.
    ///
    /// A zero `step` is rejected.
    pub fn range_step(start: i64, stop: i64, step: i64) -> StreamResult<Self> {
        if step == 0 {
            return Err(StreamError::InvalidArgument(
                "range step must not be zero".to_string(),
            ));
        }

        let span = if step > 0 {
            i128::from(stop) - i128::from(start)
        } else {
            i128::from(start) - i128::from(stop)
        };
        let stride = i128::from(step).abs();
        let len = if span > 0 { (span + stride - 1) / stride } else { 0 };

        // Every produced value lies between start and stop, so it fits in i64
        Ok(Self::from_iterator(
            (0..len as u64).map(move |i| (i128::from(start) + i128::from(i) * i128::from(step)) as i64),
        ))
    }
}
