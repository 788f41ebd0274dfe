//! Synchronization utilities for robust mutex handling
//!
//! Converts lock poisoning into application errors in one consistent place,
//! so the queue can report a poisoned monitor instead of panicking.

use std::sync::LockResult;

/// Handle poisoned mutex cases with consistent error handling
///
/// Works for both `Mutex::lock` and `Condvar::wait`, which return the same
/// `LockResult` shape.
///
/// # Arguments
/// * `result` - The result from a lock or wait operation
/// * `error_constructor` - Function to create the appropriate error type
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use prioqueue::core::sync::handle_mutex_poison;
/// use prioqueue::queue::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(
///     mutex.lock(),
///     |message| QueueError::Synchronisation { message }
/// ).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|_| {
        error_constructor(
            "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock".to_string()
        )
    })
}
