//! Maintenance plan records.
//!
//! Flat, serializable records describing a solved plan: performance
//! checkpoints, scheduled checks, per-interval resource usage, and any
//! violations detected when auditing the plan against the model's rules.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};

use super::CheckType;

/// Performance of one aircraft at the start of one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    /// Global interval index.
    pub interval: usize,
    /// Aircraft ID.
    pub aircraft: String,
    /// Performance metric value.
    pub value: f64,
}

/// A check scheduled on an aircraft in an interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceAction {
    /// Global interval index.
    pub interval: usize,
    /// Aircraft ID.
    pub aircraft: String,
    /// Check type.
    pub check: CheckType,
    /// Solved value of the binary decision (≈1.0).
    pub value: f64,
}

/// Consumption of one resource in one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    /// Resource name.
    pub resource: String,
    /// Global interval index.
    pub interval: usize,
    /// Units consumed by the checks performed in the interval.
    pub used: f64,
    /// Units available per interval.
    pub capacity: f64,
}

/// A rule broken by a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity (aircraft or resource).
    pub entity_id: String,
    /// Global interval index where the violation occurs.
    pub interval: usize,
    /// Human-readable description.
    pub message: String,
}

/// Classification of plan violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Simultaneous checks use more of a resource than the station has.
    CapacityExceeded,
    /// Both check types scheduled on the same aircraft in the same interval.
    DoubleCheck,
    /// Performance below the airworthiness floor.
    BelowFloor,
}

impl PerformancePoint {
    /// Creates a performance point.
    pub fn new(interval: usize, aircraft: impl Into<String>, value: f64) -> Self {
        Self {
            interval,
            aircraft: aircraft.into(),
            value,
        }
    }
}

impl MaintenanceAction {
    /// Creates a maintenance action.
    pub fn new(interval: usize, aircraft: impl Into<String>, check: CheckType, value: f64) -> Self {
        Self {
            interval,
            aircraft: aircraft.into(),
            check,
            value,
        }
    }
}

impl ResourceUsage {
    /// Unused capacity (negative when over capacity).
    #[inline]
    pub fn slack(&self) -> f64 {
        self.capacity - self.used
    }

    /// Fraction of capacity in use.
    ///
    /// Returns `None` for zero-capacity resources.
    pub fn utilization(&self) -> Option<f64> {
        if self.capacity <= 0.0 {
            return None;
        }
        Some(self.used / self.capacity)
    }
}

impl Violation {
    /// Creates a capacity exceeded violation.
    pub fn capacity_exceeded(
        resource: impl Into<String>,
        interval: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type: ViolationType::CapacityExceeded,
            entity_id: resource.into(),
            interval,
            message: message.into(),
        }
    }

    /// Creates a double check violation.
    pub fn double_check(aircraft: impl Into<String>, interval: usize) -> Self {
        let aircraft = aircraft.into();
        let message = format!("aircraft '{aircraft}' has both A and C checks in interval {interval}");
        Self {
            violation_type: ViolationType::DoubleCheck,
            entity_id: aircraft,
            interval,
            message,
        }
    }

    /// Creates a below-floor violation.
    pub fn below_floor(aircraft: impl Into<String>, interval: usize, value: f64, floor: f64) -> Self {
        let aircraft = aircraft.into();
        let message = format!("aircraft '{aircraft}' at {value:.6} below floor {floor} in interval {interval}");
        Self {
            violation_type: ViolationType::BelowFloor,
            entity_id: aircraft,
            interval,
            message,
        }
    }
}
