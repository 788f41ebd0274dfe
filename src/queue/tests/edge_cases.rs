//! Edge case tests: poisoning, single-slot queues and custom priority keys

#[cfg(test)]
mod tests {
    use super::super::item;
    use crate::core::shutdown::CancellationToken;
    use crate::queue::{Prioritized, PriorityQueue, QueueError};
    use std::sync::Arc;
    use std::thread;

    #[derive(Debug)]
    struct Ticket {
        name: &'static str,
        urgency: i64,
    }

    impl Prioritized for Ticket {
        type Key = i64;

        fn priority(&self) -> i64 {
            self.urgency
        }
    }

    #[test]
    fn test_custom_priority_key_with_negative_values() {
        let queue = PriorityQueue::new(4, CancellationToken::new()).unwrap();
        for (name, urgency) in [("a", -5), ("b", -1), ("c", -1), ("d", -10)] {
            queue.insert(Ticket { name, urgency }).unwrap();
        }

        let names: Vec<_> = (0..4).map(|_| queue.remove().unwrap().item.name).collect();
        assert_eq!(names, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_single_slot_alternation() {
        let queue = PriorityQueue::new(1, CancellationToken::new()).unwrap();

        for value in 0..10 {
            queue.insert(item(value, (value % 3) as u8)).unwrap();
            assert!(queue.is_full());
            assert_eq!(queue.remove().unwrap().item.value(), value);
            assert!(queue.is_empty());
        }
    }

    #[test]
    fn test_poisoned_queue_reports_synchronisation_error() {
        #[derive(Debug)]
        struct Grenade(u8);

        impl Prioritized for Grenade {
            type Key = u8;

            fn priority(&self) -> u8 {
                // Panics inside remove() while the queue lock is held
                assert!(self.0 != 0, "boom");
                self.0
            }
        }

        let token = CancellationToken::new();
        let queue = Arc::new(PriorityQueue::new(2, token.clone()).unwrap());
        queue.insert(Grenade(0)).unwrap();

        let remover = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let _ = queue.remove();
            })
        };
        assert!(remover.join().is_err(), "priority() panicked under the lock");

        assert!(matches!(
            queue.remove(),
            Err(QueueError::Synchronisation { .. })
        ));
        let rejected = queue.insert(Grenade(1)).unwrap_err();
        assert!(!rejected.is_cancelled());
        assert!(rejected.to_string().contains("synchronisation"));

        // Advisory reads and shutdown still work on a poisoned queue
        assert_eq!(queue.size(), 1);
        assert!(token.signal());
    }

    #[test]
    fn test_rejected_converts_into_queue_error() {
        let token = CancellationToken::new();
        token.signal();
        let queue = PriorityQueue::new(1, token).unwrap();

        let rejected = queue.insert(item(7, 9)).unwrap_err();
        let (returned, reason) = rejected.into_parts();
        assert_eq!(returned.value(), 7);
        assert_eq!(reason, QueueError::Cancelled);

        let error: QueueError = queue.insert(item(8, 9)).unwrap_err().into();
        assert!(error.is_cancelled());
    }
}
