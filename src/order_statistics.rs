//! Order statistics: streaming median and heap-based partial selection
//!
//! `BinaryHeap` is a max-heap; wrapping values in [`Reverse`] turns it into
//! the min-structure each algorithm needs.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Online median over a stream of values using two balanced heaps.
///
/// `smaller` is a max-heap over the lower half and `bigger` a min-heap over
/// the upper half. Every value in `smaller` is `<=` every value in `bigger`,
/// and the two sizes never differ by more than one.
///
/// When both halves hold the same number of values, [`median`](Self::median)
/// reports the root of the lower half, so `[1, 2, 3, 4]` has median `2`.
#[derive(Debug, Clone)]
pub struct RunningMedian<T> {
    smaller: BinaryHeap<T>,
    bigger: BinaryHeap<Reverse<T>>,
}

impl<T: Ord> Default for RunningMedian<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> RunningMedian<T> {
    pub fn new() -> Self {
        Self {
            smaller: BinaryHeap::new(),
            bigger: BinaryHeap::new(),
        }
    }

    /// Insert a value in O(log n).
    ///
    /// The first value seeds `smaller`; the second lands in whichever half
    /// keeps the two seeds ordered.
    pub fn push(&mut self, item: T) {
        match self.smaller.peek() {
            Some(root) if item >= *root => self.bigger.push(Reverse(item)),
            _ => self.smaller.push(item),
        }
        self.rebalance();
    }

    fn rebalance(&mut self) {
        if self.smaller.len() > self.bigger.len() + 1 {
            if let Some(root) = self.smaller.pop() {
                self.bigger.push(Reverse(root));
            }
        } else if self.bigger.len() > self.smaller.len() + 1 {
            if let Some(Reverse(root)) = self.bigger.pop() {
                self.smaller.push(root);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.smaller.len() + self.bigger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current median, or `None` before the first value
    pub fn median(&self) -> Option<&T> {
        if self.bigger.len() > self.smaller.len() {
            self.bigger.peek().map(|Reverse(root)| root)
        } else {
            self.smaller.peek()
        }
    }

    pub fn into_median(mut self) -> Option<T> {
        if self.bigger.len() > self.smaller.len() {
            self.bigger.pop().map(|Reverse(root)| root)
        } else {
            self.smaller.pop()
        }
    }
}

impl<T: Ord> Extend<T> for RunningMedian<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

/// Keeps the `k` largest values seen so far in a min-heap of size `k`
#[derive(Debug, Clone)]
pub struct Largest<T> {
    capacity: usize,
    heap: BinaryHeap<Reverse<T>>,
}

impl<T: Ord> Largest<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, item: T) {
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(item));
            return;
        }
        let replace = matches!(self.heap.peek(), Some(Reverse(root)) if item > *root);
        if replace {
            self.heap.pop();
            self.heap.push(Reverse(item));
        }
    }

    /// Selected values, largest first
    pub fn into_sorted_vec(self) -> Vec<T> {
        // Ascending in `Reverse` order is descending in `T`
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(item)| item)
            .collect()
    }
}

/// Keeps the `k` smallest values seen so far in a max-heap of size `k`
#[derive(Debug, Clone)]
pub struct Smallest<T> {
    capacity: usize,
    heap: BinaryHeap<T>,
}

impl<T: Ord> Smallest<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, item: T) {
        if self.heap.len() < self.capacity {
            self.heap.push(item);
            return;
        }
        let replace = matches!(self.heap.peek(), Some(root) if item < *root);
        if replace {
            self.heap.pop();
            self.heap.push(item);
        }
    }

    /// Largest of the selected values, i.e. the k-th smallest overall once
    /// the selection is full
    pub fn peek_max(&self) -> Option<&T> {
        self.heap.peek()
    }

    /// Consume the selection, keeping only its largest value
    pub fn into_max(mut self) -> Option<T> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Selected values, smallest first
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.heap.into_sorted_vec()
    }
}

/// The `k` largest values, largest first, in O(n log k)
pub fn largest<I, T>(items: I, k: usize) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: Ord,
{
    let mut selection = Largest::new(k);
    for item in items {
        selection.push(item);
    }
    selection.into_sorted_vec()
}

/// The `k` smallest values, smallest first, in O(n log k)
pub fn smallest<I, T>(items: I, k: usize) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: Ord,
{
    let mut selection = Smallest::new(k);
    for item in items {
        selection.push(item);
    }
    selection.into_sorted_vec()
}

/// The `nth` smallest value (1-indexed), or `None` when there are fewer
/// than `nth` values. `nth == 0` is also `None`.
pub fn nth_element<I, T>(items: I, nth: usize) -> Option<T>
where
    I: IntoIterator<Item = T>,
    T: Ord,
{
    match nth {
        0 => None,
        1 => items.into_iter().min(),
        _ => {
            let mut selection = Smallest::new(nth);
            for item in items {
                selection.push(item);
            }
            if selection.len() < nth {
                return None;
            }
            selection.into_max()
        }
    }
}

/// Median of a finite sequence, lower middle for even lengths
pub fn median<I, T>(items: I) -> Option<T>
where
    I: IntoIterator<Item = T>,
    T: Ord,
{
    let mut running = RunningMedian::new();
    running.extend(items);
    running.into_median()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_length() {
        assert_eq!(median(vec![5, 3, 1, 2, 4]), Some(3));
    }

    #[test]
    fn test_median_even_length_reports_lower_half() {
        assert_eq!(median(vec![1, 2, 3, 4]), Some(2));
        assert_eq!(median(vec![4, 3, 2, 1]), Some(2));
        assert_eq!(median(vec![10, 20]), Some(10));
        assert_eq!(median(vec![20, 10]), Some(10));
    }

    #[test]
    fn test_median_empty_and_single() {
        assert_eq!(median(Vec::<i32>::new()), None);
        assert_eq!(median(vec![7]), Some(7));
    }

    #[test]
    fn test_median_with_duplicates() {
        assert_eq!(median(vec![2, 2, 2, 1, 3]), Some(2));
        assert_eq!(median(vec![1, 1, 1, 1]), Some(1));
    }

    #[test]
    fn test_running_median_keeps_halves_balanced() {
        let mut running = RunningMedian::new();
        for (i, item) in [9, 1, 8, 2, 7, 3, 6, 4, 5].into_iter().enumerate() {
            running.push(item);
            assert_eq!(running.len(), i + 1);
            let diff = running.smaller.len() as isize - running.bigger.len() as isize;
            assert!(diff.abs() <= 1, "halves unbalanced after {} pushes", i + 1);
            if let (Some(low), Some(Reverse(high))) = (running.smaller.peek(), running.bigger.peek()) {
                assert!(low <= high);
            }
        }
        assert_eq!(running.median(), Some(&5));
    }

    #[test]
    fn test_running_median_matches_sorted_middle() {
        let values = vec![31, 4, 15, 92, 65, 35, 89, 79, 32, 38, 46, 26];
        let mut running = RunningMedian::new();
        for (i, item) in values.iter().enumerate() {
            running.push(*item);
            let mut prefix = values[..=i].to_vec();
            prefix.sort();
            assert_eq!(running.median(), Some(&prefix[i / 2]));
        }
    }

    #[test]
    fn test_nth_element() {
        assert_eq!(nth_element(vec![5, 1, 4, 2, 3], 1), Some(1));
        assert_eq!(nth_element(vec![5, 1, 4, 2, 3], 3), Some(3));
        assert_eq!(nth_element(vec![5, 1, 4, 2, 3], 5), Some(5));
        assert_eq!(nth_element(vec![5, 1, 4, 2, 3], 10), None);
        assert_eq!(nth_element(vec![5, 1, 4, 2, 3], 0), None);
        assert_eq!(nth_element(Vec::<i32>::new(), 1), None);
    }

    #[test]
    fn test_smallest_tracks_kth_value() {
        let mut selection = Smallest::new(3);
        assert_eq!(selection.peek_max(), None);
        for item in [8, 3, 9, 1] {
            selection.push(item);
        }
        assert_eq!(selection.peek_max(), Some(&8));
        selection.push(2);
        assert_eq!(selection.peek_max(), Some(&3));
        assert_eq!(selection.len(), 3);
        assert_eq!(selection.into_max(), Some(3));
    }

    #[test]
    fn test_largest_and_smallest() {
        assert_eq!(largest(vec![5, 3, 9, 1], 2), vec![9, 5]);
        assert_eq!(smallest(vec![5, 3, 9, 1], 2), vec![1, 3]);
        assert_eq!(largest(vec![5, 3], 10), vec![5, 3]);
        assert_eq!(smallest(vec![5, 3, 9], 0), Vec::<i32>::new());
    }
}
