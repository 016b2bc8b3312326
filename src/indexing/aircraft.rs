//! Per-aircraft interval index.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::error::{PlannerError, PlannerResult};
use crate::models::Interval;

/// The interval indices at which each aircraft can be scheduled.
///
/// Every indexed aircraft carries the horizon sentinels `0` and `n` plus
/// each interval in `1..n` where it is present, sorted and deduplicated.
/// Roster aircraft that never appear are kept apart as idle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AircraftIntervals {
    horizon: usize,
    by_aircraft: BTreeMap<String, Vec<usize>>,
    idle: Vec<String>,
}

impl AircraftIntervals {
    /// End-of-horizon index `n`.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Sorted interval indices of an aircraft.
    pub fn get(&self, aircraft: &str) -> Option<&[usize]> {
        self.by_aircraft.get(aircraft).map(Vec::as_slice)
    }

    /// Iterates aircraft in ascending ID order with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.by_aircraft
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Indexed aircraft, ascending.
    pub fn aircraft(&self) -> impl Iterator<Item = &str> {
        self.by_aircraft.keys().map(String::as_str)
    }

    /// Roster aircraft with no relevant interval, ascending.
    pub fn idle(&self) -> &[String] {
        &self.idle
    }

    /// Number of indexed aircraft.
    pub fn len(&self) -> usize {
        self.by_aircraft.len()
    }

    /// Whether no aircraft is indexed.
    pub fn is_empty(&self) -> bool {
        self.by_aircraft.is_empty()
    }

    /// Whether `(interval, aircraft)` is an indexed key.
    pub fn contains(&self, interval: usize, aircraft: &str) -> bool {
        self.get(aircraft)
            .map(|v| v.binary_search(&interval).is_ok())
            .unwrap_or(false)
    }

    /// All `(interval, aircraft)` keys, aircraft-major.
    pub fn keys(&self) -> impl Iterator<Item = (usize, &str)> {
        self.iter()
            .flat_map(|(k, v)| v.iter().map(move |&i| (i, k)))
    }

    #[cfg(test)]
    pub(crate) fn from_slots<'s>(
        horizon: usize,
        slots: impl IntoIterator<Item = (&'s str, Vec<usize>)>,
    ) -> Self {
        Self {
            horizon,
            by_aircraft: slots
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            idle: Vec::new(),
        }
    }
}

/// Builds the per-aircraft interval index.
///
/// Only appearances in intervals `1..n` count; interval 0 is the start of
/// the horizon and carries no maintenance decision.
///
/// # Errors
/// `PlannerError::UnknownAircraft` if an interval lists an aircraft that is
/// not in the roster.
pub fn index_aircraft_intervals(
    intervals: &[Interval],
    roster: &[String],
) -> PlannerResult<AircraftIntervals> {
    let n = intervals.len();
    let mut seen: BTreeMap<String, BTreeSet<usize>> = roster
        .iter()
        .map(|k| (k.clone(), BTreeSet::new()))
        .collect();

    for (i, interval) in intervals.iter().enumerate().skip(1) {
        for aircraft in &interval.aircraft {
            let slots = seen
                .get_mut(aircraft)
                .ok_or_else(|| PlannerError::UnknownAircraft {
                    aircraft: aircraft.clone(),
                    interval: i,
                })?;
            slots.insert(i);
        }
    }

    let mut by_aircraft = BTreeMap::new();
    let mut idle = Vec::new();
    for (aircraft, mut slots) in seen {
        if slots.is_empty() {
            idle.push(aircraft);
            continue;
        }
        slots.insert(0);
        slots.insert(n);
        by_aircraft.insert(aircraft, slots.into_iter().collect());
    }

    debug!(
        "indexed {} aircraft over {} intervals ({} idle)",
        by_aircraft.len(),
        n,
        idle.len()
    );

    Ok(AircraftIntervals {
        horizon: n,
        by_aircraft,
        idle,
    })
}
