use futures_util::stream::{self, StreamExt};
use rs2_seq::generators::{accumulate, distinct, partly_distinct, peek, seed};
use std::sync::{Arc, Mutex};

fn oks<T>(values: Vec<T>) -> Vec<Result<T, String>> {
    values.into_iter().map(Ok).collect()
}

#[tokio::test]
async fn test_distinct_generator() {
    let result: Vec<_> = distinct(stream::iter(oks(vec![3, 1, 3, 2, 1]))).collect().await;
    assert_eq!(result, oks(vec![3, 1, 2]));
}

#[tokio::test]
async fn test_partly_distinct_generator() {
    let result: Vec<_> = partly_distinct(stream::iter(oks(vec![1, 1, 2, 2, 2, 1, 1])))
        .collect()
        .await;
    assert_eq!(result, oks(vec![1, 2, 1]));
}

#[tokio::test]
async fn test_generators_pass_errors_through_in_place() {
    let source = vec![Ok(1), Err("bad".to_string()), Ok(1)];
    let result: Vec<_> = distinct(stream::iter(source)).collect().await;
    assert_eq!(result, vec![Ok(1), Err("bad".to_string())]);
}

#[tokio::test]
async fn test_peek_generator() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let result: Vec<_> = peek(stream::iter(oks(vec!['a', 'b'])), move |c: &char| {
        sink.lock().unwrap().push(*c)
    })
    .collect()
    .await;

    assert_eq!(result, oks(vec!['a', 'b']));
    assert_eq!(*seen.lock().unwrap(), vec!['a', 'b']);
}

#[tokio::test]
async fn test_accumulate_yields_prefix_folds() {
    let result: Vec<_> = accumulate(stream::iter(oks(vec![1, 2, 3, 4])), |a, b| a + b)
        .collect()
        .await;
    assert_eq!(result, oks(vec![1, 3, 6, 10]));

    let empty: Vec<Result<i32, String>> = accumulate(stream::iter(oks(Vec::new())), |a, b| a + b)
        .collect()
        .await;
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_seed_is_infinite() {
    let result: Vec<u32> = seed(|x: &u32| x * 3, 1).take(4).collect().await;
    assert_eq!(result, vec![1, 3, 9, 27]);
}

#[tokio::test]
async fn test_exhausted_generator_stays_exhausted() {
    let mut generator = distinct(stream::iter(oks(vec![1])));
    assert_eq!(generator.next().await, Some(Ok(1)));
    assert_eq!(generator.next().await, None);
    assert_eq!(generator.next().await, None);
}
