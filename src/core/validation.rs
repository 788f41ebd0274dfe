//! Validation helpers shared by the CLI and the configuration file

use std::fmt::Display;
use std::ops::RangeInclusive;

/// Check that `value` lies within `range`, naming the setting in the message
pub fn check_range<T: PartialOrd + Display>(
    name: &str,
    value: T,
    range: RangeInclusive<T>,
) -> Result<(), String> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "{} must be between {} and {} (got {})",
            name,
            range.start(),
            range.end(),
            value
        ))
    }
}

/// Accumulates every problem found so they can be reported together
#[derive(Debug, Default)]
pub struct Problems(Vec<String>);

impl Problems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, result: Result<(), String>) {
        if let Err(problem) = result {
            self.0.push(problem);
        }
    }

    pub fn push(&mut self, problem: impl Into<String>) {
        self.0.push(problem.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok` when nothing was recorded, otherwise every problem in order
    pub fn into_result(self) -> Result<(), Vec<String>> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(check_range("capacity", 20, 1..=20).is_ok());
        assert_eq!(
            check_range("capacity", 21, 1..=20),
            Err("capacity must be between 1 and 20 (got 21)".to_string())
        );
    }

    #[test]
    fn test_problems_collects_all() {
        let mut problems = Problems::new();
        problems.check(check_range("producers", 0, 1..=10));
        problems.check(check_range("consumers", 5, 1..=10));
        problems.push("timeout must be positive");

        let listed = problems.into_result().unwrap_err();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].starts_with("producers"));
    }
}
