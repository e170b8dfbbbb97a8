use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_item_yields_one_result() {
    let mut pool = WorkerPool::start(4, (0..100).collect::<Vec<u32>>(), |i| async move { i * 2 });
    let mut results = Vec::new();
    while let Some(r) = pool.recv().await {
        results.push(r);
    }
    results.sort_unstable();
    assert_eq!(results, (0..100).map(|i| i * 2).collect::<Vec<u32>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_worker_count_bounds_concurrency() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let (in_flight_w, peak_w) = (in_flight.clone(), peak.clone());
    let mut pool = WorkerPool::start(3, (0..30).collect::<Vec<u32>>(), move |i| {
        let in_flight = in_flight_w.clone();
        let peak = peak_w.clone();
        async move {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(2)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            i
        }
    });

    let mut count = 0;
    while pool.recv().await.is_some() {
        count += 1;
    }
    assert_eq!(count, 30);
    assert!(peak.load(Ordering::SeqCst) <= 3);
    assert_eq!(in_flight.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_item_is_not_dropped() {
    let mut pool = WorkerPool::start(2, vec![200u64, 1, 1, 1], |ms| async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        ms
    });
    let mut results = Vec::new();
    while let Some(r) = pool.recv().await {
        results.push(r);
    }
    assert_eq!(results.len(), 4);
    assert_eq!(results.last(), Some(&200));
}

#[tokio::test]
async fn test_zero_workers_and_no_items() {
    let mut pool = WorkerPool::start(0, Vec::<u8>::new(), |b| async move { b });
    assert!(pool.recv().await.is_none());

    let mut pool = WorkerPool::start(0, vec![7u8], |b| async move { b + 1 });
    assert_eq!(pool.recv().await, Some(8));
    assert_eq!(pool.recv().await, None);
}
