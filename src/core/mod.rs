//! Core services and infrastructure

pub mod error_handling;
pub mod logging;
pub mod shutdown;
pub mod styles; // colour roles for tables and help output
pub mod sync;
pub mod system;
pub mod validation;
