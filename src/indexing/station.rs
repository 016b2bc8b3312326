//! Per-station projection of the interval sequence.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};

use crate::models::Interval;

/// The part of the interval sequence that belongs to one station.
///
/// All indices are global positions in the full sequence, never renumbered,
/// so they address the fleet-wide model variables directly.
#[derive(Debug, Clone, PartialEq)]
pub struct StationProjection<'a> {
    station: String,
    horizon: usize,
    intervals: Vec<(usize, &'a Interval)>,
    keys: BTreeSet<(usize, String)>,
    aircraft: BTreeSet<String>,
}

impl<'a> StationProjection<'a> {
    /// Station identifier.
    pub fn station(&self) -> &str {
        &self.station
    }

    /// End-of-horizon index `n` of the full sequence.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Intervals at this station with their global indices, ascending.
    pub fn intervals(&self) -> &[(usize, &'a Interval)] {
        &self.intervals
    }

    /// Global indices of the station's intervals.
    pub fn interval_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.intervals.iter().map(|(i, _)| *i)
    }

    /// `(interval, aircraft)` keys relevant to this station, including the
    /// `(0, k)` and `(n, k)` boundary keys.
    pub fn keys(&self) -> &BTreeSet<(usize, String)> {
        &self.keys
    }

    /// Whether `(interval, aircraft)` is relevant to this station.
    pub fn contains(&self, interval: usize, aircraft: &str) -> bool {
        self.keys.contains(&(interval, aircraft.to_string()))
    }

    /// Aircraft seen at this station, ascending.
    pub fn aircraft(&self) -> &BTreeSet<String> {
        &self.aircraft
    }

    /// Whether no aircraft visits this station.
    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }
}

/// Station → interval index multimap, built once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationIndex {
    horizon: usize,
    by_station: BTreeMap<String, Vec<usize>>,
}

impl StationIndex {
    /// Groups interval indices by station.
    pub fn build(intervals: &[Interval]) -> Self {
        let mut by_station: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, interval) in intervals.iter().enumerate() {
            by_station
                .entry(interval.station.clone())
                .or_default()
                .push(i);
        }
        Self {
            horizon: intervals.len(),
            by_station,
        }
    }

    /// Stations, ascending.
    pub fn stations(&self) -> impl Iterator<Item = &str> {
        self.by_station.keys().map(String::as_str)
    }

    /// Global interval indices of a station (empty if unknown).
    pub fn indices(&self, station: &str) -> &[usize] {
        self.by_station
            .get(station)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Projects the sequence onto a station using the precomputed indices.
    ///
    /// `intervals` should be the sequence this index was built from. Indices
    /// that fall outside it, or that land on another station's interval,
    /// are skipped with a warning.
    pub fn project<'a>(
        &self,
        intervals: &'a [Interval],
        roster: &[String],
        station: &str,
    ) -> StationProjection<'a> {
        if intervals.len() != self.horizon {
            warn!(
                "station index built for {} intervals, projecting {}",
                self.horizon,
                intervals.len()
            );
        }
        build_projection(
            intervals,
            roster,
            station,
            self.indices(station).iter().copied(),
        )
    }
}

/// Projects the interval sequence onto one station by scanning it.
///
/// Keys are collected from the station's intervals at indices `1..n`; each
/// aircraft found there also gets `(0, k)` and `(n, k)`. Aircraft missing
/// from the roster are skipped.
pub fn project_station<'a>(
    intervals: &'a [Interval],
    roster: &[String],
    station: &str,
) -> StationProjection<'a> {
    let indices = intervals
        .iter()
        .enumerate()
        .filter(|(_, iv)| iv.station == station)
        .map(|(i, _)| i);
    build_projection(intervals, roster, station, indices)
}

fn build_projection<'a>(
    intervals: &'a [Interval],
    roster: &[String],
    station: &str,
    indices: impl Iterator<Item = usize>,
) -> StationProjection<'a> {
    let n = intervals.len();
    let known: BTreeSet<&str> = roster.iter().map(String::as_str).collect();

    let mut selected = Vec::new();
    let mut keys = BTreeSet::new();
    let mut aircraft = BTreeSet::new();

    for i in indices {
        let Some(interval) = intervals.get(i).filter(|iv| iv.station == station) else {
            warn!("station {station}: interval {i} not in the projected sequence, skipped");
            continue;
        };
        selected.push((i, interval));
        if i == 0 {
            continue;
        }
        for k in &interval.aircraft {
            if !known.contains(k.as_str()) {
                debug!("station {station}: skipping aircraft '{k}' not in roster");
                continue;
            }
            keys.insert((i, k.clone()));
            aircraft.insert(k.clone());
        }
    }

    for k in &aircraft {
        keys.insert((0, k.clone()));
        keys.insert((n, k.clone()));
    }

    StationProjection {
        station: station.to_string(),
        horizon: n,
        intervals: selected,
        keys,
        aircraft,
    }
}
