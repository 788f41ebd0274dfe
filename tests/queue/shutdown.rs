//! Shutdown through the public API

use crate::common::{item, shared_queue};
use prioqueue::queue::WaitOutcome;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_blocked_producers_and_consumers_are_released() {
    let (full, token) = shared_queue(1);
    full.insert(item(0, 0)).unwrap();
    let empty: prioqueue::queue::PriorityQueue<prioqueue::queue::Item> = prioqueue::queue::PriorityQueue::new(1, token.clone()).unwrap();
    let empty = std::sync::Arc::new(empty);

    let mut producers = Vec::new();
    for n in 1..=3 {
        let queue = full.clone();
        producers.push(thread::spawn(move || queue.insert(item(n, 9))));
    }
    let mut consumers = Vec::new();
    for _ in 0..3 {
        let queue = empty.clone();
        consumers.push(thread::spawn(move || queue.remove()));
    }

    thread::sleep(Duration::from_millis(50));
    let start = Instant::now();
    assert!(full.signal_shutdown());
    assert!(!full.signal_shutdown());

    for handle in producers {
        let rejected = handle.join().unwrap().unwrap_err();
        assert!(rejected.is_cancelled());
    }
    for handle in consumers {
        assert!(handle.join().unwrap().unwrap_err().is_cancelled());
    }
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_wait_outcome_reports_blocking() {
    let (queue, _token) = shared_queue(1);
    queue.insert(item(1, 0)).unwrap();

    let blocked = {
        let queue = queue.clone();
        thread::spawn(move || queue.insert(item(2, 0)).unwrap())
    };
    thread::sleep(Duration::from_millis(30));
    let first = queue.remove().unwrap();

    assert_eq!(first.outcome, WaitOutcome::Immediate);
    assert!(blocked.join().unwrap().waited());
}

#[test]
fn test_token_sleep_is_interruptible() {
    let (_queue, token) = shared_queue(1);
    let sleeper = token.clone();

    let handle = thread::spawn(move || sleeper.sleep(Duration::from_secs(60)));
    thread::sleep(Duration::from_millis(20));
    token.signal();

    assert!(handle.join().unwrap());
}
