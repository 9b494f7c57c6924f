//! Chainable combinators. All of them are lazy except the sorting family,
//! `reversed`, `largest` and `smallest`, which need the whole source.

use async_stream::stream;
use futures::future;
use futures_util::stream::{StreamExt, TryStreamExt};
use log::debug;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::Hash;
use std::ops::Rem;
use std::str::FromStr;

use super::core::Stream;
use crate::error::{StreamError, StreamResult};
use crate::generators;
use crate::order_statistics::{Largest, Smallest};

impl<T: Send + 'static> Stream<T> {
    /// Keep the elements matching `predicate`, in order
    pub fn filter<P>(self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + Send + 'static,
    {
        Self::lazy(
            self.into_inner()
                .filter(move |item| {
                    let keep = match item {
                        Ok(value) => predicate(value),
                        Err(_) => true,
                    };
                    future::ready(keep)
                })
                .boxed(),
        )
    }

    /// Drop the elements matching `predicate`, in order
    pub fn exclude<P>(self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + Send + 'static,
    {
        self.filter(move |item| !predicate(item))
    }

    /// Fallible filter; a predicate error aborts consumption
    pub fn try_filter<P, E>(self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> Result<bool, E> + Send + 'static,
        E: Display + Send,
    {
        let inner = self.into_inner();
        Self::lazy(
            stream! {
                let mut inner = inner;
                while let Some(item) = inner.next().await {
                    match item {
                        Ok(value) => {
                            let verdict = predicate(&value).map_err(StreamError::element);
                            match verdict {
                                Ok(true) => yield Ok(value),
                                Ok(false) => {}
                                Err(err) => yield Err(err),
                            }
                        }
                        Err(err) => yield Err(err),
                    }
                }
            }
            .boxed(),
        )
    }

    pub fn map<U, F>(self, mut mapper: F) -> Stream<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        Stream::lazy(self.into_inner().map(move |item| item.map(&mut mapper)).boxed())
    }

    /// Fallible map; a mapper error becomes [`StreamError::ElementOperation`]
    pub fn try_map<U, E, F>(self, mut mapper: F) -> Stream<U>
    where
        U: Send + 'static,
        E: Display + Send,
        F: FnMut(T) -> Result<U, E> + Send + 'static,
    {
        Stream::lazy(
            self.into_inner()
                .map(move |item| item.and_then(|value| mapper(value).map_err(StreamError::element)))
                .boxed(),
        )
    }

    /// Map and drop the elements for which `mapper` returns `None`
    pub fn filter_map<U, F>(self, mut mapper: F) -> Stream<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> Option<U> + Send + 'static,
    {
        Stream::lazy(
            self.into_inner()
                .filter_map(move |item| {
                    future::ready(match item {
                        Ok(value) => mapper(value).map(Ok),
                        Err(err) => Some(Err(err)),
                    })
                })
                .boxed(),
        )
    }

    /// Call `observer` on every element as it passes through
    pub fn peek<F>(self, observer: F) -> Self
    where
        F: FnMut(&T) + Send + 'static,
    {
        Self::lazy(generators::peek(self.into_inner(), observer))
    }

    /// First occurrence of every value, in first-occurrence order
    pub fn distinct(self) -> Self
    where
        T: Eq + Hash + Clone,
    {
        Self::lazy(generators::distinct(self.into_inner()))
    }

    /// Collapse adjacent runs of equal values; non-adjacent repeats survive
    pub fn partly_distinct(self) -> Self
    where
        T: PartialEq + Clone,
    {
        Self::lazy(generators::partly_distinct(self.into_inner()))
    }

    /// At most the first `size` elements
    pub fn limit(self, size: usize) -> Self {
        match self.into_buffered() {
            Ok(mut items) => {
                items.truncate(size);
                Self::buffered(items)
            }
            Err(stream) => Self::lazy(stream.into_inner().take(size).boxed()),
        }
    }

    /// Everything after the first `size` elements
    pub fn skip(self, size: usize) -> Self {
        match self.into_buffered() {
            Ok(mut items) => {
                items.drain(..size.min(items.len()));
                Self::buffered(items)
            }
            Err(stream) => Self::lazy(stream.into_inner().skip(size).boxed()),
        }
    }

    /// Each element repeated `clones` times
    pub fn tuplify(self, clones: usize) -> Stream<Vec<T>>
    where
        T: Clone,
    {
        self.map(move |item| vec![item; clones])
    }

    pub fn sorted(self) -> Self
    where
        T: Ord,
    {
        self.materialize_with(|items| items.sort())
    }

    /// Stable sort by `key`; `reverse` flips the order but keeps ties in
    /// their original order
    pub fn sorted_by_key<K, F>(self, mut key: F, reverse: bool) -> Self
    where
        K: Ord,
        F: FnMut(&T) -> K + Send + 'static,
    {
        self.materialize_with(move |items| {
            items.sort_by(|a, b| {
                let order = key(a).cmp(&key(b));
                if reverse {
                    order.reverse()
                } else {
                    order
                }
            })
        })
    }

    pub fn sorted_by<C>(self, mut compare: C) -> Self
    where
        C: FnMut(&T, &T) -> Ordering + Send + 'static,
    {
        self.materialize_with(move |items| items.sort_by(&mut compare))
    }

    /// Reverse the stream. Buffered sources reverse in place; lazy ones are
    /// materialized first.
    pub fn reversed(self) -> Self {
        match self.into_buffered() {
            Ok(mut items) => {
                items.make_contiguous().reverse();
                Self::buffered(items)
            }
            Err(stream) => stream.materialize_with(|items| items.reverse()),
        }
    }

    /// The `size` largest elements, largest first, via a bounded heap
    pub fn largest(self, size: usize) -> Self
    where
        T: Ord,
    {
        let inner = self.into_inner();
        Self::lazy(
            stream! {
                let mut inner = inner;
                let mut selection = Largest::new(size);
                let mut failure = None;

                while let Some(item) = inner.next().await {
                    match item {
                        Ok(value) => selection.push(value),
                        Err(err) => {
                            failure = Some(err);
                            break;
                        }
                    }
                }

                match failure {
                    Some(err) => yield Err(err),
                    None => {
                        for item in selection.into_sorted_vec() {
                            yield Ok(item);
                        }
                    }
                }
            }
            .boxed(),
        )
    }

    /// The `size` smallest elements, smallest first, via a bounded heap
    pub fn smallest(self, size: usize) -> Self
    where
        T: Ord,
    {
        let inner = self.into_inner();
        Self::lazy(
            stream! {
                let mut inner = inner;
                let mut selection = Smallest::new(size);
                let mut failure = None;

                while let Some(item) = inner.next().await {
                    match item {
                        Ok(value) => selection.push(value),
                        Err(err) => {
                            failure = Some(err);
                            break;
                        }
                    }
                }

                match failure {
                    Some(err) => yield Err(err),
                    None => {
                        for item in selection.into_sorted_vec() {
                            yield Ok(item);
                        }
                    }
                }
            }
            .boxed(),
        )
    }

    /// Collect the whole source, rearrange it, and stream it back.
    ///
    /// Buffered sources are rearranged immediately. Lazy ones are collected
    /// on the first pull; an upstream error is yielded instead of any item.
    pub(crate) fn materialize_with<F>(self, arrange: F) -> Self
    where
        F: FnOnce(&mut Vec<T>) + Send + 'static,
    {
        match self.into_buffered() {
            Ok(items) => {
                let mut items = Vec::from(items);
                arrange(&mut items);
                Self::buffered(items.into())
            }
            Err(stream) => {
                let inner = stream.into_inner();
                Self::lazy(
                    stream! {
                        match inner.try_collect::<Vec<T>>().await {
                            Ok(mut items) => {
                                debug!("Materialized {} elements from a lazy source", items.len());
                                arrange(&mut items);
                                for item in items {
                                    yield Ok(item);
                                }
                            }
                            Err(err) => yield Err(err),
                        }
                    }
                    .boxed(),
                )
            }
        }
    }
}

impl<U: Send + 'static> Stream<Stream<U>> {
    /// Flatten a stream of streams, keeping the order of sub-streams and of
    /// the elements inside each
    pub fn chain(self) -> Stream<U> {
        let outer = self.into_inner();
        Stream::lazy(
            stream! {
                let mut outer = outer;
                while let Some(sub) = outer.next().await {
                    match sub {
                        Ok(mut sub) => {
                            while let Some(item) = sub.next().await {
                                yield item;
                            }
                        }
                        Err(err) => yield Err(err),
                    }
                }
            }
            .boxed(),
        )
    }
}

impl<K, V> Stream<(K, V)>
where
    K: Send + 'static,
    V: Send + 'static,
{
    pub fn keys(self) -> Stream<K> {
        self.map(|(key, _)| key)
    }

    pub fn values(self) -> Stream<V> {
        self.map(|(_, value)| value)
    }

    /// Transform only the value of each pair
    pub fn value_map<W, F>(self, mut mapper: F) -> Stream<(K, W)>
    where
        W: Send + 'static,
        F: FnMut(V) -> W + Send + 'static,
    {
        self.map(move |(key, value)| (key, mapper(value)))
    }

    /// Transform only the key of each pair
    pub fn key_map<J, F>(self, mut mapper: F) -> Stream<(J, V)>
    where
        J: Send + 'static,
        F: FnMut(K) -> J + Send + 'static,
    {
        self.map(move |(key, value)| (mapper(key), value))
    }
}

impl<T> Stream<T>
where
    T: AsRef<str> + Send + 'static,
{
    /// Keep the strings matching `pattern` at their start.
    ///
    /// An invalid pattern is an [`StreamError::InvalidArgument`].
    pub fn regexp(self, pattern: &str) -> StreamResult<Self> {
        let regex = Regex::new(&format!("^(?:{})", pattern))
            .map_err(|err| StreamError::InvalidArgument(err.to_string()))?;
        Ok(self.filter(move |item| regex.is_match(item.as_ref())))
    }

    /// Parse every string, dropping the ones that do not parse
    pub fn parsed<U>(self) -> Stream<U>
    where
        U: FromStr + Send + 'static,
    {
        self.filter_map(|text| text.as_ref().trim().parse::<U>().ok())
    }

    pub fn ints(self) -> Stream<i64> {
        self.parsed()
    }

    pub fn floats(self) -> Stream<f64> {
        self.parsed()
    }
}

impl<T> Stream<T>
where
    T: Copy + PartialEq + Rem<Output = T> + From<u8> + Send + 'static,
{
    /// Multiples of `number`. A zero divisor yields an
    /// [`StreamError::InvalidArgument`] on the first pull.
    pub fn divisible_by(self, number: T) -> Self {
        let zero = T::from(0);
        if number == zero {
            return Self::failed(StreamError::InvalidArgument(
                "cannot test divisibility by zero".to_string(),
            ));
        }
        self.filter(move |item| *item % number == zero)
    }

    pub fn evens(self) -> Self {
        self.divisible_by(T::from(2))
    }

    pub fn odds(self) -> Self {
        let zero = T::from(0);
        let two = T::from(2);
        self.filter(move |item| *item % two != zero)
    }
}

impl<T> Stream<T>
where
    T: Display + Send + 'static,
{
    /// Render every element with its `Display` impl
    pub fn strings(self) -> Stream<String> {
        self.map(|item| item.to_string())
    }
}

impl<T: Send + 'static> Stream<Option<T>> {
    pub fn exclude_nones(self) -> Stream<T> {
        self.filter_map(|item| item)
    }

    pub fn only_nones(self) -> Self {
        self.filter(Option::is_none)
    }
}

impl Stream<bool> {
    pub fn only_trues(self) -> Self {
        self.filter(|item| *item)
    }

    pub fn only_falses(self) -> Self {
        self.filter(|item| !*item)
    }
}
