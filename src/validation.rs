//! Input validation for maintenance planning problems.
//!
//! Checks structural integrity of an interval snapshot before any model is
//! built. Detects:
//! - Duplicate aircraft in the roster
//! - Aircraft present in an interval but missing from the roster
//! - An empty interval sequence
//! - Intervals whose end does not follow their start
//! - Intervals out of start-time order
//! - Intervals without a station
//!
//! Roster aircraft that never appear in an interval are not errors; the
//! indexer reports them as idle.

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::models::{Interval, IntervalSnapshot};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// An aircraft is listed twice in the roster.
    DuplicateAircraft,
    /// An interval references an aircraft that is not in the roster.
    UnknownAircraft,
    /// The snapshot contains no intervals.
    EmptyHorizon,
    /// An interval ends at or before its start.
    InvalidInterval,
    /// An interval starts at or before its predecessor.
    UnorderedIntervals,
    /// An interval has an empty station identifier.
    EmptyStation,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValidationErrorKind::DuplicateAircraft => "duplicate aircraft",
            ValidationErrorKind::UnknownAircraft => "unknown aircraft",
            ValidationErrorKind::EmptyHorizon => "empty horizon",
            ValidationErrorKind::InvalidInterval => "invalid interval",
            ValidationErrorKind::UnorderedIntervals => "unordered intervals",
            ValidationErrorKind::EmptyStation => "empty station",
        };
        f.write_str(s)
    }
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a snapshot.
pub fn validate_snapshot(snapshot: &IntervalSnapshot) -> ValidationResult {
    validate_input(&snapshot.intervals, &snapshot.aircraft)
}

/// Validates an interval sequence against a fleet roster.
///
/// Checks:
/// 1. No duplicate aircraft in the roster
/// 2. At least one interval
/// 3. Every interval ends after it starts and has a station
/// 4. Interval starts are strictly increasing
/// 5. Every aircraft present in an interval is in the roster
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(intervals: &[Interval], roster: &[String]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut known = HashSet::new();
    for aircraft in roster {
        if !known.insert(aircraft.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateAircraft,
                format!("Duplicate aircraft in roster: {aircraft}"),
            ));
        }
    }

    if intervals.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyHorizon,
            "Snapshot has no intervals",
        ));
    }

    for (index, interval) in intervals.iter().enumerate() {
        if interval.end <= interval.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidInterval,
                format!(
                    "Interval {index} (id {}) ends at {} which is not after its start {}",
                    interval.id, interval.end, interval.start
                ),
            ));
        }

        if interval.station.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyStation,
                format!("Interval {index} (id {}) has no station", interval.id),
            ));
        }

        if index > 0 && interval.start <= intervals[index - 1].start {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnorderedIntervals,
                format!(
                    "Interval {index} (id {}) starts at {} which is not after interval {}",
                    interval.id,
                    interval.start,
                    index - 1
                ),
            ));
        }

        for aircraft in &interval.aircraft {
            if !known.contains(aircraft.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownAircraft,
                    format!(
                        "Interval {index} at station '{}' references unknown aircraft '{aircraft}'",
                        interval.station
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
