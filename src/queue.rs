//! FIFO with a hard capacity.
//!
//! The engine is expected to acknowledge every forwarded key event, but a
//! stalled renderer would otherwise let the pending queues grow without
//! limit. On overflow the oldest entry is dropped and logged.

use std::collections::VecDeque;

use tracing::warn;

#[derive(Debug)]
pub struct BoundedQueue<T> {
    name: &'static str,
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// A zero capacity is raised to one.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            name,
            items: VecDeque::with_capacity(capacity.min(16)),
            capacity,
        }
    }

    /// Appends `item`, returning the entry evicted to make room, if any.
    pub fn push(&mut self, item: T) -> Option<T> {
        let dropped = if self.items.len() >= self.capacity {
            let dropped = self.items.pop_front();
            warn!(
                queue = self.name,
                capacity = self.capacity,
                "Pending queue full, dropping oldest entry"
            );
            dropped
        } else {
            None
        };
        self.items.push_back(item);
        dropped
    }

    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = BoundedQueue::new("test", 4);
        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.front(), Some(&1));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let mut queue = BoundedQueue::new("test", 2);
        assert_eq!(queue.push("a"), None);
        assert_eq!(queue.push("b"), None);
        assert_eq!(queue.push("c"), Some("a"));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some("b"));
        assert_eq!(queue.pop(), Some("c"));
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut queue = BoundedQueue::new("test", 0);
        assert_eq!(queue.capacity(), 1);
        queue.push(7);
        assert_eq!(queue.push(8), Some(7));
        assert_eq!(queue.front(), Some(&8));
    }

    #[test]
    fn test_clear() {
        let mut queue = BoundedQueue::new("test", 8);
        queue.push(1);
        queue.push(2);
        queue.clear();
        assert!(queue.is_empty());
    }
}
