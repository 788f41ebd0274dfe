//! Test modules for the queue system
//!
//! Tests are organized by functional area for better maintainability.

mod core_functionality;
mod edge_cases;

use crate::queue::{Item, Priority};

/// Build an item whose value doubles as a label in assertions
pub(super) fn item(value: u32, priority: u8) -> Item {
    Item::new(value, Priority(priority), 1, u64::from(value))
}
