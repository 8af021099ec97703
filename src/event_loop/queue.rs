// src/event_loop/queue.rs
//! Unbounded multi-producer FIFO with a blocking pull.
//!
//! Per-producer order is preserved: items pushed by one thread in sequence
//! are pulled in that sequence. No order is promised between producers
//! beyond each push being atomic.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

pub struct MessageQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> Default for MessageQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MessageQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Appends `item` and wakes one blocked puller. Never blocks beyond the
    /// internal lock.
    pub fn push(&self, item: T) {
        self.lock().push_back(item);
        self.available.notify_one();
    }

    /// Removes and returns the head, blocking while the queue is empty.
    pub fn pull(&self) -> T {
        let mut items = self.lock();
        loop {
            if let Some(item) = items.pop_front() {
                return item;
            }
            items = self
                .available
                .wait(items)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Snapshot only: another thread may push right after this returns.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test_log::test]
    fn push_then_pull_is_fifo() {
        let queue = MessageQueue::new();
        for i in 0..5 {
            queue.push(i);
        }
        assert!(!queue.is_empty());

        let pulled: Vec<i32> = (0..5).map(|_| queue.pull()).collect();
        assert_eq!(pulled, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test_log::test]
    fn pull_leaves_remaining_items() {
        let queue = MessageQueue::new();
        queue.push("first");
        queue.push("second");

        assert_eq!(queue.pull(), "first");
        assert!(!queue.is_empty());
        assert_eq!(queue.pull(), "second");
        assert!(queue.is_empty());
    }

    #[test_log::test]
    fn empty_reflects_contents() {
        let queue = MessageQueue::new();
        assert!(queue.is_empty());

        queue.push(1u8);
        assert!(!queue.is_empty());
        assert_eq!(queue.pull(), 1);
        assert!(queue.is_empty());
    }

    #[test_log::test]
    fn pull_blocks_until_push() {
        let queue = Arc::new(MessageQueue::new());
        let waiter = {
            let queue = queue.clone();
            thread::spawn(move || queue.pull())
        };

        // Give the waiter time to block on the empty queue.
        thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished(), "pull returned on an empty queue");

        queue.push(99);
        assert_eq!(waiter.join().unwrap(), 99);
        assert!(queue.is_empty());
    }

    #[test_log::test]
    fn concurrent_producers_keep_their_own_order() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 250;

        let queue = Arc::new(MessageQueue::new());
        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let queue = queue.clone();
                thread::spawn(move || {
                    for seq in 0..PER_PRODUCER {
                        queue.push((p, seq));
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        let mut next_expected = [0usize; PRODUCERS];
        for _ in 0..PRODUCERS * PER_PRODUCER {
            let (p, seq) = queue.pull();
            assert_eq!(seq, next_expected[p], "producer {p} reordered");
            next_expected[p] += 1;
        }
        assert!(queue.is_empty());
    }
}
