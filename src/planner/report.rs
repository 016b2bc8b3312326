//! Per-station plan reports.
//!
//! A `StationReport` carries everything needed to render or audit one
//! station's share of the fleet plan. It is plain data: flat record lists
//! so it serializes directly to JSON.
//!
//! # Contents
//!
//! | Field | Definition |
//! |-------|-----------|
//! | performance | Solved `d[i,k]` at the station's checkpoints |
//! | trajectories | `performance` extended to every interval `1..=n` |
//! | actions_by_check | Scheduled checks per type, by interval |
//! | resource_usage | Σ_c (#checks of type c) · demand(r, c) per interval |
//! | service_level_count | Station aircraft ending at or above the service level |
//! | violations | Audit of the plan against floor, single check, capacity |

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RateConfig;
use crate::constants::ModelConstants;
use crate::extraction::{fill_performance, StationSolution};
use crate::indexing::StationProjection;
use crate::models::{
    CheckType, MaintenanceAction, PerformancePoint, ResourceUsage, StationResource, Violation,
};

/// Numerical slack allowed when auditing solved values.
const AUDIT_EPSILON: f64 = 1e-6;

/// An interval of the station with its global index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInterval {
    /// Global interval index.
    pub index: usize,
    /// Upstream interval identifier.
    pub id: u64,
    /// Interval start.
    pub start: DateTime<Utc>,
    /// Interval end.
    pub end: DateTime<Utc>,
}

/// One station's view of a solved plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    /// Station identifier.
    pub station: String,
    /// Aircraft seen at the station, ascending.
    pub aircraft: Vec<String>,
    /// The station's intervals.
    pub intervals: Vec<StationInterval>,
    /// Interval boundaries of the whole horizon, UNIX seconds.
    pub times: Vec<i64>,
    /// Solved performance at the station's checkpoints.
    pub performance: Vec<PerformancePoint>,
    /// Reconstructed performance for every interval `1..=n`.
    pub trajectories: Vec<PerformancePoint>,
    /// Scheduled checks, grouped by type and sorted by interval.
    pub actions_by_check: BTreeMap<CheckType, Vec<MaintenanceAction>>,
    /// Demand and capacity tables used by the model.
    pub resources: Vec<StationResource>,
    /// Resource consumption at each station interval with checks.
    pub resource_usage: Vec<ResourceUsage>,
    /// Aircraft of the station at or above the service level.
    pub service_level_count: usize,
    /// Rates the model was built with.
    pub rates: RateConfig,
    /// Rule violations found in the extracted plan.
    pub violations: Vec<Violation>,
}

impl StationReport {
    /// Assembles the report of one station.
    pub fn build(
        projection: &StationProjection<'_>,
        solution: &StationSolution,
        constants: &ModelConstants,
    ) -> Self {
        let n = constants.horizon();

        let intervals = projection
            .intervals()
            .iter()
            .map(|(index, iv)| StationInterval {
                index: *index,
                id: iv.id,
                start: iv.start,
                end: iv.end,
            })
            .collect();

        let trajectories = fill_performance(
            n,
            &solution.performance,
            projection.keys(),
            constants.degradation,
            &constants.times,
            constants.bounds.initial,
        )
        .into_iter()
        .map(|((i, k), v)| PerformancePoint::new(i, k, v))
        .collect();

        let mut actions_by_check: BTreeMap<CheckType, Vec<MaintenanceAction>> =
            CheckType::ALL.into_iter().map(|c| (c, Vec::new())).collect();
        for action in solution.actions() {
            actions_by_check.entry(action.check).or_default().push(action);
        }
        for actions in actions_by_check.values_mut() {
            actions.sort_by(|a, b| a.interval.cmp(&b.interval).then_with(|| a.aircraft.cmp(&b.aircraft)));
        }

        let resource_usage = resource_usage(projection, solution, constants);
        let violations = audit(solution, &resource_usage, constants);

        Self {
            station: projection.station().to_string(),
            aircraft: projection.aircraft().iter().cloned().collect(),
            intervals,
            times: constants.times.clone(),
            performance: solution.performance_points(),
            trajectories,
            actions_by_check,
            resources: constants.resources.resources().to_vec(),
            resource_usage,
            service_level_count: solution.service_level_count(),
            rates: RateConfig {
                check_a: constants.rate_a,
                check_c: constants.rate_c,
                degradation: constants.degradation,
            },
            violations,
        }
    }

    /// Scheduled checks of one type, by interval.
    pub fn actions(&self, check: CheckType) -> &[MaintenanceAction] {
        self.actions_by_check
            .get(&check)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of scheduled checks.
    pub fn action_count(&self) -> usize {
        self.actions_by_check.values().map(Vec::len).sum()
    }

    /// Highest consumption of a resource over the station's intervals.
    pub fn peak_usage(&self, resource: &str) -> f64 {
        self.resource_usage
            .iter()
            .filter(|u| u.resource == resource)
            .map(|u| u.used)
            .fold(0.0, f64::max)
    }

    /// Whether the audit found no violation.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Per-interval consumption of each resource by the station's checks.
///
/// Only station intervals in `1..n` that carry at least one check produce
/// records. Check values are rounded to whole checks first.
fn resource_usage(
    projection: &StationProjection<'_>,
    solution: &StationSolution,
    constants: &ModelConstants,
) -> Vec<ResourceUsage> {
    let n = constants.horizon();
    let mut checks: BTreeMap<usize, BTreeMap<CheckType, f64>> = BTreeMap::new();
    for ((i, _, c), v) in &solution.maintenance {
        *checks.entry(*i).or_default().entry(*c).or_insert(0.0) += v.round();
    }

    let mut usage = Vec::new();
    for i in projection.interval_indices().filter(|&i| i >= 1 && i < n) {
        let Some(counts) = checks.get(&i) else {
            continue;
        };
        for resource in constants.resources.resources() {
            let used: f64 = counts
                .iter()
                .map(|(c, count)| count * resource.demand(*c))
                .sum();
            usage.push(ResourceUsage {
                resource: resource.name.clone(),
                interval: i,
                used,
                capacity: resource.capacity,
            });
        }
    }
    usage
}

fn audit(
    solution: &StationSolution,
    usage: &[ResourceUsage],
    constants: &ModelConstants,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for u in usage.iter().filter(|u| u.slack() < -AUDIT_EPSILON) {
        violations.push(Violation::capacity_exceeded(
            u.resource.clone(),
            u.interval,
            format!("uses {} of {} units", u.used, u.capacity),
        ));
    }

    let mut checked: BTreeMap<(usize, &str), usize> = BTreeMap::new();
    for (i, k, _) in solution.maintenance.keys() {
        *checked.entry((*i, k.as_str())).or_insert(0) += 1;
    }
    for ((i, k), _) in checked.into_iter().filter(|(_, count)| *count > 1) {
        violations.push(Violation::double_check(k, i));
    }

    let floor = constants.bounds.floor;
    for ((i, k), v) in &solution.performance {
        if *v < floor - AUDIT_EPSILON {
            violations.push(Violation::below_floor(k.clone(), *i, *v, floor));
        }
    }

    violations
}
