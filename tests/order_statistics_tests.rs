use futures_util::stream;
use quickcheck::quickcheck;
use rs2_seq::order_statistics::{largest, smallest};
use rs2_seq::{RunningMedian, Stream};
use tokio::runtime::Runtime;

#[tokio::test]
async fn test_median_cases() {
    assert_eq!(Stream::from_sequence(vec![5, 3, 1, 2, 4]).median().await.unwrap(), Some(3));
    // Even lengths report the lower middle
    assert_eq!(Stream::from_sequence(vec![1, 2, 3, 4]).median().await.unwrap(), Some(2));
    assert_eq!(Stream::<i32>::empty().median().await.unwrap(), None);
    assert_eq!(Stream::from_sequence(vec![7]).median().await.unwrap(), Some(7));
}

#[tokio::test]
async fn test_median_on_lazy_source() {
    let median = Stream::from_stream(stream::iter(vec![9, 7, 8, 1, 2, 3, 5]))
        .median()
        .await
        .unwrap();
    assert_eq!(median, Some(5));
}

#[tokio::test]
async fn test_median_of_strings() {
    let words = vec!["pear", "apple", "fig"];
    assert_eq!(Stream::from_sequence(words).median().await.unwrap(), Some("fig"));
}

fn prop_median_is_lower_middle(values: Vec<i32>) -> bool {
    let rt = Runtime::new().unwrap();
    let median = rt.block_on(Stream::from_sequence(values.clone()).median()).unwrap();

    let mut sorted = values;
    sorted.sort();
    if sorted.is_empty() {
        median.is_none()
    } else {
        median == Some(sorted[(sorted.len() - 1) / 2])
    }
}

#[test]
fn test_median_property() {
    quickcheck(prop_median_is_lower_middle as fn(Vec<i32>) -> bool);
}

#[test]
fn test_running_median_is_online() {
    let mut running = RunningMedian::new();
    assert_eq!(running.median(), None);

    running.push(10);
    assert_eq!(running.median(), Some(&10));
    running.push(20);
    assert_eq!(running.median(), Some(&10));
    running.push(30);
    assert_eq!(running.median(), Some(&20));
    running.push(5);
    assert_eq!(running.median(), Some(&10));
    assert_eq!(running.len(), 4);
}

#[tokio::test]
async fn test_nth_element() {
    let source = || Stream::from_sequence(vec![5, 1, 4, 2, 3]);
    assert_eq!(source().nth_element(1).await.unwrap(), Some(1));
    assert_eq!(source().nth_element(3).await.unwrap(), Some(3));
    assert_eq!(source().nth_element(5).await.unwrap(), Some(5));
    assert_eq!(source().nth_element(10).await.unwrap(), None);
    assert_eq!(source().nth_element(0).await.unwrap(), None);
    assert_eq!(Stream::<i32>::empty().nth_element(1).await.unwrap(), None);
}

fn prop_nth_element_matches_sort(values: Vec<i16>, nth: u8) -> bool {
    let nth = nth as usize;
    let rt = Runtime::new().unwrap();
    let found = rt.block_on(Stream::from_sequence(values.clone()).nth_element(nth)).unwrap();

    let mut sorted = values;
    sorted.sort();
    let expected = if nth == 0 { None } else { sorted.get(nth - 1).copied() };
    found == expected
}

#[test]
fn test_nth_element_property() {
    quickcheck(prop_nth_element_matches_sort as fn(Vec<i16>, u8) -> bool);
}

fn prop_selection_matches_sort(values: Vec<i32>, k: u8) -> bool {
    let k = k as usize % 16;
    let mut ascending = values.clone();
    ascending.sort();
    let mut descending = ascending.clone();
    descending.reverse();

    let expected_small: Vec<i32> = ascending.into_iter().take(k).collect();
    let expected_large: Vec<i32> = descending.into_iter().take(k).collect();

    smallest(values.clone(), k) == expected_small && largest(values, k) == expected_large
}

#[test]
fn test_selection_property() {
    quickcheck(prop_selection_matches_sort as fn(Vec<i32>, u8) -> bool);
}
