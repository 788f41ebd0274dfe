pub mod app;
pub mod core;
pub mod metrics;
pub mod queue;
pub mod worker;

include!(concat!(env!("OUT_DIR"), "/version.rs"));
