//! Core queue functionality tests: ordering, capacity and occupancy

#[cfg(test)]
mod tests {
    use super::super::item;
    use crate::core::shutdown::CancellationToken;
    use crate::queue::{Prioritized, Priority, PriorityQueue, QueueError, WaitOutcome};

    fn queue(capacity: usize) -> PriorityQueue<crate::queue::Item> {
        PriorityQueue::new(capacity, CancellationToken::new()).unwrap()
    }

    #[test]
    fn test_queue_creation() {
        let queue = queue(5);

        assert_eq!(queue.capacity(), 5);
        assert_eq!(queue.size(), 0);
        assert!(queue.is_empty());
        assert!(!queue.is_full());
        assert!(!queue.is_cancelled());
    }

    #[test]
    fn test_invalid_capacity() {
        let zero = PriorityQueue::<crate::queue::Item>::new(0, CancellationToken::new());
        assert_eq!(
            zero.unwrap_err(),
            QueueError::InvalidCapacity {
                capacity: 0,
                max: 20
            }
        );

        let too_big = PriorityQueue::<crate::queue::Item>::new(21, CancellationToken::new());
        assert!(matches!(
            too_big,
            Err(QueueError::InvalidCapacity { capacity: 21, .. })
        ));

        let custom =
            PriorityQueue::<crate::queue::Item>::with_max_capacity(64, 64, CancellationToken::new());
        assert_eq!(custom.unwrap().capacity(), 64);
    }

    #[test]
    fn test_priority_dominance() {
        let queue = queue(5);
        queue.insert(item(1, 2)).unwrap();
        queue.insert(item(2, 2)).unwrap();
        queue.insert(item(3, 5)).unwrap();

        let first = queue.remove().unwrap().item;
        assert_eq!(first.priority(), Priority(5));
        assert_eq!(first.value(), 3);
    }

    #[test]
    fn test_fifo_tie_break() {
        let queue = queue(5);
        queue.insert(item(b'A'.into(), 3)).unwrap();
        queue.insert(item(b'B'.into(), 3)).unwrap();
        queue.insert(item(b'C'.into(), 5)).unwrap();

        let order: Vec<u8> = (0..3)
            .map(|_| queue.remove().unwrap().item.value() as u8)
            .collect();
        assert_eq!(order, b"CAB".to_vec());
    }

    #[test]
    fn test_plain_fifo_when_priorities_equal() {
        let queue = queue(8);
        for value in 0..8 {
            queue.insert(item(value, 5)).unwrap();
        }

        for expected in 0..8 {
            assert_eq!(queue.remove().unwrap().item.value(), expected);
        }
    }

    #[test]
    fn test_equal_priorities_keep_order_after_out_of_order_removals() {
        let queue = queue(6);
        // Interleave low items with high items that will be pulled from the middle
        for (value, priority) in [(1, 0), (2, 9), (3, 0), (4, 9), (5, 0), (6, 5)] {
            queue.insert(item(value, priority)).unwrap();
        }

        let order: Vec<u32> = (0..6).map(|_| queue.remove().unwrap().item.value()).collect();
        assert_eq!(order, vec![2, 4, 6, 1, 3, 5]);
    }

    #[test]
    fn test_ordering_survives_wraparound() {
        let queue = queue(3);

        // Cycle the head around the ring several times
        for round in 0..5u32 {
            let base = round * 10;
            queue.insert(item(base + 1, 1)).unwrap();
            queue.insert(item(base + 2, 7)).unwrap();
            queue.insert(item(base + 3, 1)).unwrap();

            assert_eq!(queue.remove().unwrap().item.value(), base + 2);
            assert_eq!(queue.priorities(), vec![Priority(1), Priority(1)]);
            assert_eq!(queue.remove().unwrap().item.value(), base + 1);
            assert_eq!(queue.remove().unwrap().item.value(), base + 3);
        }
    }

    #[test]
    fn test_size_tracks_occupancy() {
        let queue = queue(3);

        queue.insert(item(1, 0)).unwrap();
        assert_eq!(queue.size(), 1);
        queue.insert(item(2, 0)).unwrap();
        queue.insert(item(3, 0)).unwrap();
        assert_eq!(queue.size(), 3);
        assert!(queue.is_full());

        queue.remove().unwrap();
        assert_eq!(queue.size(), 2);
        assert!(!queue.is_full());
    }

    #[test]
    fn test_uncontended_calls_report_immediate() {
        let queue = queue(2);

        assert_eq!(queue.insert(item(1, 0)).unwrap(), WaitOutcome::Immediate);
        let dequeued = queue.remove().unwrap();
        assert_eq!(dequeued.outcome, WaitOutcome::Immediate);
        assert!(!dequeued.outcome.waited());
    }

    #[test]
    fn test_drain_returns_remaining_items() {
        let queue = queue(4);
        queue.insert(item(1, 0)).unwrap();
        queue.insert(item(2, 9)).unwrap();

        let remaining: Vec<u32> = queue.drain().iter().map(|i| i.value()).collect();
        assert_eq!(remaining, vec![1, 2]);
        assert!(queue.is_empty());
    }
}
