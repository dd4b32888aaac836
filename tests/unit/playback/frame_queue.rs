use super::*;
use crate::foundation::core::Box2i;
use std::sync::Arc;
use std::thread;

fn item(generation: u64, index: i64) -> QueuedFrame {
    QueuedFrame {
        generation,
        index,
        frame: RgbaFrame::new(Box2i::new(0, 0, 0, 0)),
    }
}

#[test]
fn fifo_order_within_a_generation() {
    let q = FrameQueue::new(4);
    assert!(q.push(item(0, 1)));
    assert!(q.push(item(0, 2)));
    assert_eq!(q.len(), 2);
    assert_eq!(q.pop_timeout(Duration::ZERO).unwrap().index, 1);
    assert_eq!(q.pop_timeout(Duration::ZERO).unwrap().index, 2);
    assert!(q.pop_timeout(Duration::from_millis(1)).is_none());
}

#[test]
fn bump_discards_queued_and_stale_frames() {
    let q = FrameQueue::new(4);
    q.push(item(0, 1));
    let g = q.bump_generation();
    assert_eq!(g, 1);
    assert_eq!(q.len(), 0);

    // Stale pushes are accepted but dropped.
    assert!(q.push(item(0, 5)));
    assert_eq!(q.len(), 0);
    assert!(q.push(item(1, 6)));
    assert_eq!(q.pop_timeout(Duration::ZERO).unwrap().index, 6);
}

#[test]
fn full_queue_blocks_until_pop() {
    let q = Arc::new(FrameQueue::new(1));
    q.push(item(0, 0));
    let producer = {
        let q = Arc::clone(&q);
        thread::spawn(move || q.push(item(0, 1)))
    };
    thread::sleep(Duration::from_millis(20));
    assert_eq!(q.pop_timeout(Duration::ZERO).unwrap().index, 0);
    assert!(producer.join().unwrap());
    assert_eq!(q.pop_timeout(Duration::from_secs(1)).unwrap().index, 1);
}

#[test]
fn bump_releases_blocked_producer() {
    let q = Arc::new(FrameQueue::new(1));
    q.push(item(0, 0));
    let producer = {
        let q = Arc::clone(&q);
        thread::spawn(move || q.push(item(0, 1)))
    };
    thread::sleep(Duration::from_millis(20));
    q.bump_generation();
    assert!(producer.join().unwrap());
    assert_eq!(q.len(), 0);
}

#[test]
fn close_stops_producers_and_waiters() {
    let q = FrameQueue::new(2);
    q.close();
    assert!(q.is_closed());
    assert!(!q.push(item(0, 0)));
    assert!(q.wait_change(0, Duration::from_secs(10)));
}
