//! Maintenance check types.
//!
//! Two categories of preventive check are modeled. They differ in how fast
//! they restore the performance metric and in how much of each station
//! resource they consume while being performed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A preventive maintenance check category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CheckType {
    /// Light, frequent line check.
    A,
    /// Heavy structural check.
    C,
}

impl CheckType {
    /// All check types, in model order.
    pub const ALL: [CheckType; 2] = [CheckType::A, CheckType::C];

    /// Short label used in constraint and variable names.
    pub fn label(self) -> &'static str {
        match self {
            CheckType::A => "A",
            CheckType::C => "C",
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_ordered() {
        let mut sorted = CheckType::ALL;
        sorted.sort();
        assert_eq!(sorted, CheckType::ALL);
    }

    #[test]
    fn test_labels() {
        assert_eq!(CheckType::A.to_string(), "A");
        assert_eq!(CheckType::C.label(), "C");
    }

    #[test]
    fn test_serde_roundtrip_names() {
        let json = serde_json::to_string(&CheckType::C).unwrap();
        assert_eq!(json, "\"C\"");
    }
}
