//! Terminal operations: folds, counts, boolean reductions and order statistics
//!
//! Each one consumes the stream and returns the first `Err` it meets.

use futures_util::stream::{StreamExt, TryStreamExt};
use log::debug;
use num_traits::ToPrimitive;
use std::cmp;
use std::ops::Add;

use super::core::Stream;
use crate::error::{StreamError, StreamResult};
use crate::generators;
use crate::order_statistics::{self, RunningMedian};

fn as_f64<T: ToPrimitive>(value: &T) -> StreamResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| StreamError::ElementOperation("value has no f64 representation".to_string()))
}

impl<T: Send + 'static> Stream<T> {
    /// Materialize every element
    pub async fn collect(self) -> StreamResult<Vec<T>> {
        match self.into_buffered() {
            Ok(items) => Ok(items.into()),
            Err(stream) => stream.into_inner().try_collect().await,
        }
    }

    pub async fn for_each<F>(self, mut action: F) -> StreamResult<()>
    where
        F: FnMut(T),
    {
        let mut inner = self.into_inner();
        while let Some(item) = inner.next().await {
            action(item?);
        }
        Ok(())
    }

    /// Left fold. Without `initial` the first element seeds the fold, and an
    /// empty stream is a [`StreamError::EmptySequence`].
    pub async fn reduce<F>(self, mut function: F, initial: Option<T>) -> StreamResult<T>
    where
        F: FnMut(T, T) -> T,
    {
        let mut inner = self.into_inner();
        let mut acc = match initial {
            Some(seed) => seed,
            None => match inner.next().await {
                Some(item) => item?,
                None => return Err(StreamError::EmptySequence),
            },
        };
        while let Some(item) = inner.next().await {
            acc = function(acc, item?);
        }
        Ok(acc)
    }

    /// Left fold into an accumulator of another type
    pub async fn fold<A, F>(self, initial: A, mut function: F) -> StreamResult<A>
    where
        F: FnMut(A, T) -> A,
    {
        let mut inner = self.into_inner();
        let mut acc = initial;
        while let Some(item) = inner.next().await {
            acc = function(acc, item?);
        }
        Ok(acc)
    }

    /// Running addition seeded by the first element; empty is an error
    pub async fn sum(self) -> StreamResult<T>
    where
        T: Add<Output = T> + Clone,
    {
        let mut totals = generators::accumulate(self.into_inner(), |acc, item| acc + item);
        let mut last = match totals.next().await {
            Some(total) => total?,
            None => return Err(StreamError::EmptySequence),
        };
        while let Some(total) = totals.next().await {
            last = total?;
        }
        Ok(last)
    }

    /// Arithmetic mean as `f64`; empty is an error
    pub async fn average(self) -> StreamResult<f64>
    where
        T: ToPrimitive,
    {
        let mut inner = self.into_inner();
        let mut total = match inner.next().await {
            Some(item) => as_f64(&item?)?,
            None => return Err(StreamError::EmptySequence),
        };
        let mut counter: usize = 1;
        while let Some(item) = inner.next().await {
            total += as_f64(&item?)?;
            counter += 1;
        }
        Ok(total / counter as f64)
    }

    /// Number of elements. A buffered source answers from its length; a lazy
    /// one is consumed so its mappers run and its errors surface.
    pub async fn count(self) -> StreamResult<usize> {
        if let Some(len) = self.known_len() {
            debug!("Counting from known size: {}", len);
            return Ok(len);
        }
        let mut inner = self.into_inner();
        let mut count = 0;
        while let Some(item) = inner.next().await {
            item?;
            count += 1;
        }
        Ok(count)
    }

    /// Number of elements equal to `element`; always consumes the stream
    pub async fn count_of(self, element: &T) -> StreamResult<usize>
    where
        T: PartialEq,
    {
        let mut inner = self.into_inner();
        let mut count = 0;
        while let Some(item) = inner.next().await {
            if item? == *element {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Short-circuits on the first match
    pub async fn any<P>(self, mut predicate: P) -> StreamResult<bool>
    where
        P: FnMut(&T) -> bool,
    {
        let mut inner = self.into_inner();
        while let Some(item) = inner.next().await {
            if predicate(&item?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Short-circuits on the first mismatch
    pub async fn all<P>(self, mut predicate: P) -> StreamResult<bool>
    where
        P: FnMut(&T) -> bool,
    {
        let mut inner = self.into_inner();
        while let Some(item) = inner.next().await {
            if !predicate(&item?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub async fn min(self) -> StreamResult<T>
    where
        T: Ord,
    {
        self.reduce(cmp::min, None).await
    }

    pub async fn max(self) -> StreamResult<T>
    where
        T: Ord,
    {
        self.reduce(cmp::max, None).await
    }

    /// The `nth` smallest element, 1-indexed; `Ok(None)` when the stream
    /// holds fewer than `nth` elements.
    ///
    /// `nth == 1` is a single O(n) scan. Anything larger materializes the
    /// stream and selects with a heap of size `nth`.
    pub async fn nth_element(self, nth: usize) -> StreamResult<Option<T>>
    where
        T: Ord,
    {
        match nth {
            0 => Ok(None),
            1 => match self.min().await {
                Ok(min) => Ok(Some(min)),
                Err(StreamError::EmptySequence) => Ok(None),
                Err(err) => Err(err),
            },
            _ => {
                let items = self.collect().await?;
                debug!("Selecting element {} of {}", nth, items.len());
                Ok(order_statistics::nth_element(items, nth))
            }
        }
    }

    /// Streaming median over two heaps; the lower middle for even lengths
    /// and `Ok(None)` for an empty stream
    pub async fn median(self) -> StreamResult<Option<T>>
    where
        T: Ord,
    {
        let mut inner = self.into_inner();
        let mut running = RunningMedian::new();
        while let Some(item) = inner.next().await {
            running.push(item?);
        }
        Ok(running.into_median())
    }
}

impl Stream<bool> {
    pub async fn any_true(self) -> StreamResult<bool> {
        self.any(|item| *item).await
    }

    pub async fn all_true(self) -> StreamResult<bool> {
        self.all(|item| *item).await
    }
}
