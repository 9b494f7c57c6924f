//! Core `Stream` type: one owned, single-pass producer plus a lookahead slot

use futures::future;
use futures_core::Stream as FuturesStream;
use futures_util::stream::{self, BoxStream, StreamExt};
use std::collections::VecDeque;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::{StreamError, StreamResult};

/// A boxed, heap-allocated futures stream
pub type RS2Stream<O> = BoxStream<'static, O>;

pub(crate) enum Source<T> {
    /// In-memory elements: length known in O(1), reversible in place
    Buffered(VecDeque<T>),
    /// Any other producer, pulled on demand
    Lazy(RS2Stream<StreamResult<T>>),
}

/// A lazy, single-pass sequence supporting chained deferred transformations.
///
/// Every combinator takes `self` by value, so the previous handle cannot be
/// used again once a new stage is built on top of it. Items flow through the
/// pipeline as [`StreamResult`]s; terminal operations stop at the first
/// `Err` and return it.
pub struct Stream<T> {
    pub(crate) source: Source<T>,
    pub(crate) lookahead: Option<T>,
}

// No field is ever structurally pinned.
impl<T> Unpin for Stream<T> {}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            Source::Buffered(items) => format!("Buffered({} items)", items.len()),
            Source::Lazy(_) => "Lazy".to_string(),
        };
        f.debug_struct("Stream")
            .field("source", &source)
            .field("lookahead", &self.lookahead.is_some())
            .finish()
    }
}

impl<T: Send + 'static> Stream<T> {
    pub(crate) fn buffered(items: VecDeque<T>) -> Self {
        Self {
            source: Source::Buffered(items),
            lookahead: None,
        }
    }

    pub(crate) fn lazy(inner: RS2Stream<StreamResult<T>>) -> Self {
        Self {
            source: Source::Lazy(inner),
            lookahead: None,
        }
    }

    /// A stream whose only item is `err`
    pub(crate) fn failed(err: StreamError) -> Self {
        Self::lazy(stream::once(future::ready(Err(err))).boxed())
    }

    /// Convert into the underlying fallible futures stream, looked-ahead
    /// element first
    pub fn into_inner(self) -> RS2Stream<StreamResult<T>> {
        let Stream { source, lookahead } = self;
        let rest = match source {
            Source::Buffered(items) => stream::iter(items.into_iter().map(Ok)).boxed(),
            Source::Lazy(inner) => inner,
        };
        match lookahead {
            Some(first) => stream::once(future::ready(Ok(first))).chain(rest).boxed(),
            None => rest,
        }
    }

    /// Hand back the in-memory elements, or the stream itself when it is lazy
    pub(crate) fn into_buffered(self) -> Result<VecDeque<T>, Self> {
        match self.source {
            Source::Buffered(mut items) => {
                if let Some(first) = self.lookahead {
                    items.push_front(first);
                }
                Ok(items)
            }
            source => Err(Self {
                source,
                lookahead: self.lookahead,
            }),
        }
    }

    /// Number of remaining elements when it is known without pulling any.
    ///
    /// Only buffered sources know their length. A lazy source may still run
    /// mappers or yield an `Err`, whatever its size hint says.
    pub fn known_len(&self) -> Option<usize> {
        match &self.source {
            Source::Buffered(items) => Some(items.len() + usize::from(self.lookahead.is_some())),
            Source::Lazy(_) => None,
        }
    }

    /// Peek at the first element without removing it from the stream.
    ///
    /// Pulls at most one element from a lazy source and keeps it in the
    /// lookahead slot, so a later traversal still yields it first. Returns
    /// `Ok(None)` for an empty stream.
    pub async fn first(&mut self) -> StreamResult<Option<&T>> {
        match &mut self.source {
            Source::Buffered(items) => Ok(items.front()),
            Source::Lazy(inner) => {
                if self.lookahead.is_none() {
                    match inner.next().await {
                        Some(Ok(item)) => self.lookahead = Some(item),
                        Some(Err(err)) => return Err(err),
                        None => return Ok(None),
                    }
                }
                Ok(self.lookahead.as_ref())
            }
        }
    }
}

impl<T> FuturesStream for Stream<T> {
    type Item = StreamResult<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if let Some(item) = this.lookahead.take() {
            return Poll::Ready(Some(Ok(item)));
        }
        match &mut this.source {
            Source::Buffered(items) => Poll::Ready(items.pop_front().map(Ok)),
            Source::Lazy(inner) => inner.poll_next_unpin(cx),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let extra = usize::from(self.lookahead.is_some());
        match &self.source {
            Source::Buffered(items) => (items.len() + extra, Some(items.len() + extra)),
            Source::Lazy(inner) => {
                let (lower, upper) = inner.size_hint();
                (
                    lower.saturating_add(extra),
                    upper.and_then(|upper| upper.checked_add(extra)),
                )
            }
        }
    }
}

impl<T: Send + 'static> FromIterator<T> for Stream<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::buffered(iter.into_iter().collect())
    }
}
