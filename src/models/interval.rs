//! Interval and snapshot models.
//!
//! An interval is a slice of the planning horizon during which a set of
//! aircraft sits at one station and can be taken in for maintenance.
//! Intervals are produced upstream and consumed here as a frozen,
//! versioned snapshot.
//!
//! # Indexing
//! Intervals are globally ordered `0..n` by start time. Index 0 is the
//! start-of-horizon boundary and index `n` (one past the last interval)
//! is the end-of-horizon boundary; neither carries decision variables
//! for maintenance.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// A time slice at one station with the aircraft present during it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Upstream interval identifier (used for labelling only).
    pub id: u64,
    /// Interval start.
    pub start: DateTime<Utc>,
    /// Interval end.
    pub end: DateTime<Utc>,
    /// Station where the aircraft are parked.
    pub station: String,
    /// Aircraft schedulable during this interval.
    #[serde(default)]
    pub aircraft: BTreeSet<String>,
}

impl Interval {
    /// Creates an interval with no aircraft.
    pub fn new(
        id: u64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        station: impl Into<String>,
    ) -> Self {
        Self {
            id,
            start,
            end,
            station: station.into(),
            aircraft: BTreeSet::new(),
        }
    }

    /// Adds an aircraft.
    pub fn with_aircraft(mut self, aircraft: impl Into<String>) -> Self {
        self.aircraft.insert(aircraft.into());
        self
    }

    /// Adds several aircraft.
    pub fn with_fleet<I, S>(mut self, aircraft: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aircraft.extend(aircraft.into_iter().map(Into::into));
        self
    }

    /// Duration in seconds.
    #[inline]
    pub fn duration_secs(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }

    /// Whether the given aircraft is present.
    pub fn contains_aircraft(&self, aircraft: &str) -> bool {
        self.aircraft.contains(aircraft)
    }
}

/// A frozen upstream snapshot: the interval sequence plus the fleet roster.
///
/// Regenerating intervals upstream can change their count and therefore
/// the optimum, so runs are always fed from a stored snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSnapshot {
    /// Snapshot version tag, recorded in logs and reports.
    #[serde(default)]
    pub version: String,
    /// Fleet roster.
    pub aircraft: Vec<String>,
    /// Globally ordered intervals.
    pub intervals: Vec<Interval>,
}

impl IntervalSnapshot {
    /// Creates a snapshot.
    pub fn new(version: impl Into<String>, aircraft: Vec<String>, intervals: Vec<Interval>) -> Self {
        Self {
            version: version.into(),
            aircraft,
            intervals,
        }
    }

    /// Parses a snapshot from JSON text.
    pub fn from_json_str(json: &str) -> PlannerResult<Self> {
        serde_json::from_str(json).map_err(PlannerError::SnapshotParse)
    }

    /// Loads a snapshot from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PlannerResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| PlannerError::SnapshotIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Number of intervals (`n`), which is also the end-of-horizon index.
    pub fn horizon(&self) -> usize {
        self.intervals.len()
    }

    /// Distinct stations, sorted.
    pub fn stations(&self) -> BTreeSet<&str> {
        self.intervals.iter().map(|i| i.station.as_str()).collect()
    }
}
