//! Queue Integration Test Modules

pub mod metrics;
pub mod ordering;
pub mod shutdown;
