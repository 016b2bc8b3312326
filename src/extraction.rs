//! Solution extraction and trajectory reconstruction.
//!
//! Reads a solved fleet-wide model back through one station's key set:
//! performance values, scheduled checks (solver noise filtered out by
//! `ToleranceConfig`), and service-level flags. `fill_performance` then
//! extends the sparse checkpoint values into a full per-interval
//! trajectory, and `resource_slacks` reports how much capacity each
//! resource constraint leaves unused.

use std::collections::{BTreeMap, BTreeSet};

use log::warn;

use crate::config::ToleranceConfig;
use crate::formulation::MaintenanceVars;
use crate::indexing::StationProjection;
use crate::milp::{MipModel, MipSolution};
use crate::models::{CheckType, MaintenanceAction, PerformancePoint};

/// Constraint-name prefix of the resource capacity rows.
pub const RESOURCE_CONSTRAINTS: &str = "Resources*";

/// Solved values scoped to one station.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationSolution {
    /// `d[i,k]` for keys of the station.
    pub performance: BTreeMap<(usize, String), f64>,
    /// Active `m[i,k,c]` for keys of the station.
    pub maintenance: BTreeMap<(usize, String, CheckType), f64>,
    /// Aircraft at the station whose `C[k]` is set, mapped to 1.0.
    pub service_level: BTreeMap<String, f64>,
}

impl StationSolution {
    /// Number of station aircraft at or above the service level.
    pub fn service_level_count(&self) -> usize {
        self.service_level.len()
    }

    /// Performance values as flat records, aircraft-minor.
    pub fn performance_points(&self) -> Vec<PerformancePoint> {
        self.performance
            .iter()
            .map(|((i, k), v)| PerformancePoint::new(*i, k.clone(), *v))
            .collect()
    }

    /// Scheduled checks as flat records, ordered by interval.
    pub fn actions(&self) -> Vec<MaintenanceAction> {
        self.maintenance
            .iter()
            .map(|((i, k, c), v)| MaintenanceAction::new(*i, k.clone(), *c, *v))
            .collect()
    }
}

/// Filters a solved model down to one station.
///
/// - performance: every `d[i,k]` whose key belongs to the station
/// - maintenance: every `m[i,k,c]` whose `(i,k)` belongs to the station and
///   whose value exceeds the maintenance tolerance
/// - service level: `C[k]` of the station's aircraft within the binary
///   tolerance of 1, stored as exactly 1.0
pub fn extract_station_solution(
    vars: &MaintenanceVars,
    solution: &MipSolution,
    projection: &StationProjection<'_>,
    tolerance: &ToleranceConfig,
) -> StationSolution {
    let performance = vars
        .iter_performance()
        .filter(|(i, k, _)| projection.contains(*i, k))
        .map(|(i, k, var)| ((i, k.to_string()), solution.value(var)))
        .collect();

    let maintenance = vars
        .iter_maintenance()
        .filter(|(i, k, _, _)| projection.contains(*i, k))
        .map(|(i, k, c, var)| ((i, k, c), solution.value(var)))
        .filter(|(_, value)| tolerance.is_active(*value))
        .map(|((i, k, c), value)| ((i, k.to_string(), c), value))
        .collect();

    let service_level = projection
        .aircraft()
        .iter()
        .filter_map(|k| vars.service_level(k).map(|var| (k, solution.value(var))))
        .filter(|(_, value)| tolerance.is_set(*value))
        .map(|(k, _)| (k.clone(), 1.0))
        .collect();

    StationSolution {
        performance,
        maintenance,
        service_level,
    }
}

/// Reconstructs full performance trajectories from sparse checkpoint values.
///
/// For every aircraft in `keys` the chain is seeded with its explicit
/// `(0,k)` value, or `initial` when there is none. Then for every `i` in
/// `1..=n`, ascending: the explicit value when `(i,k)` has one, otherwise the
/// previous value plus `degradation · (times[i] − times[i−1])`. With no
/// explicit values this is the pure decay `initial + degradation · (times[i] − times[0])`.
///
/// `times` must hold the `n + 1` interval boundaries; a shorter slice is
/// reconstructed only as far as it reaches.
pub fn fill_performance(
    n: usize,
    performance: &BTreeMap<(usize, String), f64>,
    keys: &BTreeSet<(usize, String)>,
    degradation: f64,
    times: &[i64],
    initial: f64,
) -> BTreeMap<(usize, String), f64> {
    let last = times.len().saturating_sub(1);
    if n > last {
        warn!(
            "trajectories cut at interval {last}: {} boundaries do not cover horizon {n}",
            times.len()
        );
    }
    let n = n.min(last);

    let aircraft: BTreeSet<&str> = keys.iter().map(|(_, k)| k.as_str()).collect();
    let mut filled = BTreeMap::new();

    for k in aircraft {
        let mut prev = performance
            .get(&(0, k.to_string()))
            .copied()
            .unwrap_or(initial);
        for i in 1..=n {
            let key = (i, k.to_string());
            let value = match performance.get(&key) {
                Some(v) => *v,
                None => prev + degradation * (times[i] - times[i - 1]) as f64,
            };
            filled.insert(key, value);
            prev = value;
        }
    }
    filled
}

/// Slack of every resource capacity constraint, keyed by
/// `(resource, interval)`.
pub fn resource_slacks(model: &MipModel, solution: &MipSolution) -> BTreeMap<(String, usize), f64> {
    solution
        .slacks_matching(model, RESOURCE_CONSTRAINTS)
        .into_iter()
        .filter_map(|(name, slack)| {
            let (resource, interval) = parse_resource_name(&name)?;
            Some(((resource.to_string(), interval), slack))
        })
        .collect()
}

/// Splits `Resources[r1,4]` into `("r1", 4)`.
fn parse_resource_name(name: &str) -> Option<(&str, usize)> {
    let inner = name.strip_prefix("Resources[")?.strip_suffix(']')?;
    let (resource, interval) = inner.rsplit_once(',')?;
    Some((resource, interval.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::constants::ModelConstants;
    use crate::formulation::MaintenanceModelBuilder;
    use crate::indexing::test_support::{intervals, roster};
    use crate::indexing::{index_aircraft_intervals, project_station};
    use crate::models::Interval;

    const DAY: f64 = 86_400.0;

    fn build() -> (Vec<Interval>, MipModel, MaintenanceVars, ModelConstants) {
        let ivs = intervals();
        let idx = index_aircraft_intervals(&ivs, &roster()).unwrap();
        let constants = ModelConstants::from_intervals(&ivs, &PlannerConfig::default()).unwrap();
        let (model, vars) = MaintenanceModelBuilder::new(&idx, &ivs, &constants).build();
        (ivs, model, vars, constants)
    }

    #[test]
    fn test_fill_performance_linear_decay() {
        let times: Vec<i64> = (0..=3).map(|i| i * 86_400).collect();
        let keys: BTreeSet<(usize, String)> = [(0, "K1".to_string()), (3, "K1".to_string())]
            .into_iter()
            .collect();

        let filled = fill_performance(3, &BTreeMap::new(), &keys, -1e-8, &times, 0.4);

        assert_eq!(filled.len(), 3);
        for i in 1..=3 {
            let expected = 0.4 - 1e-8 * (times[i] - times[0]) as f64;
            assert!((filled[&(i, "K1".to_string())] - expected).abs() < 1e-12);
        }
        assert!((filled[&(1, "K1".to_string())] - (0.4 - 8.64e-4)).abs() < 1e-12);
    }

    #[test]
    fn test_fill_performance_seeded_from_explicit_start() {
        let times: Vec<i64> = (0..=2).map(|i| i * 86_400).collect();
        let keys: BTreeSet<(usize, String)> = [(0, "K1".to_string())].into_iter().collect();
        let explicit: BTreeMap<(usize, String), f64> =
            [((0, "K1".to_string()), 0.6)].into_iter().collect();

        let filled = fill_performance(2, &explicit, &keys, -1e-8, &times, 0.4);

        assert!((filled[&(1, "K1".to_string())] - (0.6 - 1e-8 * DAY)).abs() < 1e-12);
        assert!((filled[&(2, "K1".to_string())] - (0.6 - 2e-8 * DAY)).abs() < 1e-12);
    }

    #[test]
    fn test_fill_performance_chains_from_explicit_values() {
        let times: Vec<i64> = (0..=4).map(|i| i * 86_400).collect();
        let keys: BTreeSet<(usize, String)> =
            [(0, "K2".to_string()), (2, "K2".to_string())].into_iter().collect();
        let explicit: BTreeMap<(usize, String), f64> =
            [((2, "K2".to_string()), 0.7)].into_iter().collect();

        let filled = fill_performance(4, &explicit, &keys, -1e-8, &times, 0.4);

        assert!((filled[&(1, "K2".to_string())] - (0.4 - 1e-8 * DAY)).abs() < 1e-12);
        assert!((filled[&(2, "K2".to_string())] - 0.7).abs() < 1e-12);
        assert!((filled[&(3, "K2".to_string())] - (0.7 - 1e-8 * DAY)).abs() < 1e-12);
        assert!((filled[&(4, "K2".to_string())] - (0.7 - 2e-8 * DAY)).abs() < 1e-12);
    }

    #[test]
    fn test_fill_performance_short_times() {
        let keys: BTreeSet<(usize, String)> = [(0, "K1".to_string())].into_iter().collect();
        let filled = fill_performance(0, &BTreeMap::new(), &keys, -1e-8, &[0], 0.4);
        assert!(filled.is_empty());

        // Boundaries stop at interval 2 although the horizon is 5.
        let filled = fill_performance(5, &BTreeMap::new(), &keys, -1e-8, &[0, 86_400, 172_800], 0.4);
        assert_eq!(
            filled.keys().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_extraction_scoped_to_station() {
        let (ivs, model, vars, _) = build();
        let mut values = vec![0.0; model.variable_count()];
        for (_, _, var) in vars.iter_performance() {
            values[var.index()] = 0.5;
        }
        let solution = MipSolution::new(values, 0.0);

        let man = project_station(&ivs, &roster(), "MAN");
        let out = extract_station_solution(&vars, &solution, &man, &ToleranceConfig::default());

        // MAN: K1 at 2,4 and K2 at 2,4, plus boundary keys.
        assert_eq!(out.performance.len(), 8);
        assert!(out.performance.contains_key(&(2, "K2".to_string())));
        assert!(!out.performance.contains_key(&(1, "K1".to_string())));
        assert!(out.maintenance.is_empty());
        assert_eq!(out.service_level_count(), 0);
    }

    #[test]
    fn test_maintenance_noise_filtered() {
        let (ivs, model, vars, _) = build();
        let mut values = vec![0.0; model.variable_count()];
        values[vars.maintenance(2, "K1", CheckType::A).unwrap().index()] = 1.0;
        values[vars.maintenance(4, "K2", CheckType::C).unwrap().index()] = 1e-13;
        values[vars.maintenance(1, "K1", CheckType::C).unwrap().index()] = 1.0;
        let solution = MipSolution::new(values, 0.0);

        let man = project_station(&ivs, &roster(), "MAN");
        let out = extract_station_solution(&vars, &solution, &man, &ToleranceConfig::default());

        let actions = out.actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].interval, 2);
        assert_eq!(actions[0].aircraft, "K1");
        assert_eq!(actions[0].check, CheckType::A);
    }

    #[test]
    fn test_service_level_uses_tolerance() {
        let (ivs, model, vars, _) = build();
        let mut values = vec![0.0; model.variable_count()];
        values[vars.service_level("K1").unwrap().index()] = 1.0 - 1e-9;
        values[vars.service_level("K2").unwrap().index()] = 0.5;
        values[vars.service_level("K3").unwrap().index()] = 1.0;
        let solution = MipSolution::new(values, 0.0);

        let man = project_station(&ivs, &roster(), "MAN");
        let out = extract_station_solution(&vars, &solution, &man, &ToleranceConfig::default());

        // K3 never visits MAN.
        assert_eq!(out.service_level.len(), 1);
        assert_eq!(out.service_level.get("K1"), Some(&1.0));
    }

    #[test]
    fn test_resource_slacks_by_name() {
        let (_, model, _, _) = build();
        let solution = MipSolution::new(vec![0.0; model.variable_count()], 0.0);

        let slacks = resource_slacks(&model, &solution);
        assert_eq!(slacks.len(), 16);
        assert!((slacks[&("r2".to_string(), 3)] - 2.0).abs() < 1e-12);
        assert!((slacks[&("r1".to_string(), 1)] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_resource_name() {
        assert_eq!(parse_resource_name("Resources[r1,4]"), Some(("r1", 4)));
        assert_eq!(parse_resource_name("Resources[bay,2,12]"), Some(("bay,2", 12)));
        assert_eq!(parse_resource_name("SingleCheck[1,K1]"), None);
        assert_eq!(parse_resource_name("Resources[r1,x]"), None);
    }
}
