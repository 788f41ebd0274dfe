//! Fatal error reporting
//!
//! Startup errors fall in two groups: problems the user can fix (bad
//! arguments, a broken config file) and system failures (a thread that could
//! not be spawned, a poisoned lock). The former are shown verbatim; the latter
//! get a short context line with the details at debug level.

/// Errors that know whether their message is meant for the user
pub trait ContextualError: std::error::Error {
    /// True when the message describes something the user can fix
    fn is_user_actionable(&self) -> bool;

    /// The message to show the user. `Some` exactly when
    /// [`is_user_actionable`](Self::is_user_actionable) is true.
    fn user_message(&self) -> Option<String>;
}

/// Log a fatal error with detail appropriate to its kind
pub fn log_error_with_context<E: ContextualError>(error: &E, operation_context: &str) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
