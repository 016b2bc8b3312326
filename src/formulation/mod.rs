//! MILP formulation of fleet maintenance.
//!
//! Translates the aircraft interval index and the run constants into a
//! `MipModel`:
//!
//! - A performance variable `d[i,k] ∈ [floor, ceiling]` per indexed
//!   `(interval, aircraft)` pair, two binary check variables `m[i,k,A]` and
//!   `m[i,k,C]`, and one binary service-level flag `C[k]` per aircraft.
//! - A recurrence along each aircraft's checkpoints: performance improves
//!   at the check rate after a check and decays at the degradation rate
//!   otherwise. At most one check type per checkpoint; none at `n`.
//! - Per-interval resource capacity shared by all checks in that interval.
//! - Objective: maximize the number of aircraft ending at or above the
//!   service level.
//!
//! # Reference
//! - Sriram & Haghani (2003), "An optimization model for aircraft
//!   maintenance scheduling and re-assignment"
//! - Wolsey (2020), "Integer Programming", 2nd ed.

mod variables;

pub use variables::MaintenanceVars;

use log::{debug, info};

use crate::config::SolverConfig;
use crate::constants::ModelConstants;
use crate::error::SolveError;
use crate::indexing::AircraftIntervals;
use crate::milp::{LinExpr, MipModel, MipSolution, MipSolver, ObjectiveSense, Relation, VarId};
use crate::models::{CheckType, Interval};

/// Default model name.
pub const MODEL_NAME: &str = "interval-maintenance";

/// A solved maintenance model with its variable handles.
#[derive(Debug, Clone)]
pub struct SolvedModel {
    /// The model that was solved.
    pub model: MipModel,
    /// Variable handles into `solution`.
    pub vars: MaintenanceVars,
    /// Solved values.
    pub solution: MipSolution,
}

impl SolvedModel {
    /// Number of aircraft at or above the service level, i.e. the objective.
    pub fn objective(&self) -> f64 {
        self.solution.objective()
    }
}

/// Builds the maintenance MILP from the interval index.
///
/// # Example
/// ```no_run
/// use u_maintenance::config::{PlannerConfig, SolverConfig};
/// use u_maintenance::constants::ModelConstants;
/// use u_maintenance::formulation::MaintenanceModelBuilder;
/// use u_maintenance::indexing::index_aircraft_intervals;
/// use u_maintenance::milp::GoodLpSolver;
/// use u_maintenance::models::IntervalSnapshot;
///
/// let snapshot = IntervalSnapshot::from_json_file("intervals.json").unwrap();
/// let index = index_aircraft_intervals(&snapshot.intervals, &snapshot.aircraft).unwrap();
/// let constants = ModelConstants::from_intervals(&snapshot.intervals, &PlannerConfig::default()).unwrap();
///
/// let builder = MaintenanceModelBuilder::new(&index, &snapshot.intervals, &constants);
/// let solved = builder.solve(&GoodLpSolver::new(), &SolverConfig::default()).unwrap();
/// println!("{} aircraft at service level", solved.objective());
/// ```
pub struct MaintenanceModelBuilder<'a> {
    index: &'a AircraftIntervals,
    intervals: &'a [Interval],
    constants: &'a ModelConstants,
    name: String,
}

impl<'a> MaintenanceModelBuilder<'a> {
    /// Creates a builder. `intervals` must be the sequence `index` was
    /// built from.
    pub fn new(
        index: &'a AircraftIntervals,
        intervals: &'a [Interval],
        constants: &'a ModelConstants,
    ) -> Self {
        Self {
            index,
            intervals,
            constants,
            name: MODEL_NAME.to_string(),
        }
    }

    /// Sets the model name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builds the model.
    ///
    /// Aircraft are traversed in ascending ID order and indices ascending,
    /// so the variable and constraint order is fully determined by the
    /// inputs.
    pub fn build(&self) -> (MipModel, MaintenanceVars) {
        let mut model = MipModel::new(&self.name);
        let mut vars = MaintenanceVars::new();

        let columns: Vec<AircraftColumns<'_>> = self
            .index
            .iter()
            .map(|(k, slots)| self.create_variables(&mut model, &mut vars, k, slots))
            .collect();

        for col in &columns {
            self.add_initialisation(&mut model, col);
        }

        let mut objective = LinExpr::new();
        for col in &columns {
            objective.add_term(col.service_level, 1.0);
        }
        model.set_objective(objective, ObjectiveSense::Maximize);

        for col in &columns {
            self.add_recurrence(&mut model, col);
            add_single_check(&mut model, col);
        }

        self.add_resources(&mut model, &vars);

        info!(
            "built '{}': {} aircraft, {} variables ({} binary), {} constraints",
            model.name(),
            columns.len(),
            model.variable_count(),
            model.binary_count(),
            model.constraint_count()
        );

        (model, vars)
    }

    /// Builds and solves the model.
    ///
    /// # Errors
    /// Propagates the solver's `SolveError`.
    pub fn solve<S: MipSolver>(
        &self,
        solver: &S,
        config: &SolverConfig,
    ) -> Result<SolvedModel, SolveError> {
        let (model, vars) = self.build();
        let solution = solver.solve(&model, config)?;
        info!(
            "solved '{}': {} of {} aircraft at service level",
            model.name(),
            solution.objective().round(),
            vars.aircraft_count()
        );
        Ok(SolvedModel {
            model,
            vars,
            solution,
        })
    }

    fn create_variables<'k>(
        &self,
        model: &mut MipModel,
        vars: &mut MaintenanceVars,
        aircraft: &'k str,
        slots: &'k [usize],
    ) -> AircraftColumns<'k> {
        let bounds = &self.constants.bounds;
        let mut performance = Vec::with_capacity(slots.len());
        let mut checks = Vec::with_capacity(slots.len());

        for &i in slots {
            let d = model.add_continuous(format!("d[{i},{aircraft}]"), bounds.floor, bounds.ceiling);
            vars.insert_performance(i, aircraft, d);
            performance.push(d);

            let pair = CheckType::ALL.map(|c| {
                let m = model.add_binary(format!("m[{i},{aircraft},{c}]"));
                vars.insert_maintenance(i, aircraft, c, m);
                m
            });
            checks.push(pair);
        }

        let service_level = model.add_binary(format!("C[{aircraft}]"));
        vars.insert_service_level(aircraft, service_level);

        AircraftColumns {
            aircraft,
            slots,
            performance,
            checks,
            service_level,
        }
    }

    fn add_initialisation(&self, model: &mut MipModel, col: &AircraftColumns<'_>) {
        let k = col.aircraft;
        let bounds = &self.constants.bounds;

        model.add_constraint(
            format!("ServiceLevel[{k}]"),
            LinExpr::new()
                .plus(col.end(), 1.0)
                .plus(col.service_level, -bounds.service_level),
            Relation::GreaterEq,
            0.0,
        );
        model.add_constraint(
            format!("InitialPerformance[{k}]"),
            LinExpr::new().plus(col.performance[0], 1.0),
            Relation::Equal,
            bounds.initial,
        );
        for (pos, c) in CheckType::ALL.into_iter().enumerate() {
            model.add_constraint(
                format!("InitialMaintenance[{k},{c}]"),
                LinExpr::new().plus(col.checks[0][pos], 1.0),
                Relation::Equal,
                0.0,
            );
            // No interval follows n.
            model.add_constraint(
                format!("FinalMaintenance[{k},{c}]"),
                LinExpr::new().plus(col.end_checks()[pos], 1.0),
                Relation::Equal,
                0.0,
            );
        }
    }

    /// Walks the `(prev, cur, next)` triples of one aircraft's checkpoints.
    fn add_recurrence(&self, model: &mut MipModel, col: &AircraftColumns<'_>) {
        let k = col.aircraft;
        let n = self.constants.horizon();
        let w = self.constants.degradation;

        for (pos, &cur) in col.slots.iter().enumerate() {
            let prev_pos = pos.saturating_sub(1);
            let prev = col.slots[prev_pos];

            let next_pos = match col.slots.get(pos + 1) {
                Some(&next) if next != n && cur != n => pos + 1,
                _ => {
                    // d[n,k] <= d[prev,k] + w·(t[n] − t[prev])
                    model.add_constraint(
                        format!("PerformanceEnd[{cur},{k}]"),
                        LinExpr::new()
                            .plus(col.end(), 1.0)
                            .plus(col.performance[prev_pos], -1.0),
                        Relation::LessEq,
                        w * self.constants.remaining(prev),
                    );
                    debug!("aircraft {k}: recurrence closed at interval {cur}");
                    break;
                }
            };

            if cur != prev {
                let dt = self.constants.elapsed(prev, cur);
                let mut lhs = LinExpr::new()
                    .plus(col.performance[pos], 1.0)
                    .plus(col.performance[prev_pos], -1.0);
                for (c_pos, c) in CheckType::ALL.into_iter().enumerate() {
                    let gain = dt * (self.constants.improvement(c) - w);
                    lhs.add_term(col.checks[prev_pos][c_pos], -gain);
                }
                model.add_constraint(
                    format!("PerformanceTransition[{cur},{k}]"),
                    lhs,
                    Relation::LessEq,
                    w * dt,
                );
            }

            model.add_constraint(
                format!("FlightFloor[{cur},{k}]"),
                LinExpr::new().plus(col.performance[next_pos], 1.0),
                Relation::GreaterEq,
                self.constants.bounds.floor,
            );
        }
    }

    fn add_resources(&self, model: &mut MipModel, vars: &MaintenanceVars) {
        let n = self.constants.horizon();
        let resources = &self.constants.resources;

        for i in 1..n {
            let Some(interval) = self.intervals.get(i) else {
                break;
            };
            for resource in resources.resources() {
                let mut lhs = LinExpr::new();
                for c in CheckType::ALL {
                    let demand = resource.demand(c);
                    for k in &interval.aircraft {
                        if let Some(m) = vars.maintenance(i, k, c) {
                            lhs.add_term(m, demand);
                        }
                    }
                }
                if lhs.is_constant() {
                    continue;
                }
                model.add_constraint(
                    format!("Resources[{},{i}]", resource.name),
                    lhs,
                    Relation::LessEq,
                    resource.capacity,
                );
            }
        }
    }
}

/// `m[i,k,A] + m[i,k,C] <= 1` at every checkpoint of the aircraft,
/// sentinels and the closing checkpoint included.
fn add_single_check(model: &mut MipModel, col: &AircraftColumns<'_>) {
    let k = col.aircraft;
    for (&i, pair) in col.slots.iter().zip(&col.checks) {
        model.add_constraint(
            format!("SingleCheck[{i},{k}]"),
            LinExpr::new().plus(pair[0], 1.0).plus(pair[1], 1.0),
            Relation::LessEq,
            1.0,
        );
    }
}

/// Variables of one aircraft, aligned with its checkpoint list.
struct AircraftColumns<'k> {
    aircraft: &'k str,
    slots: &'k [usize],
    performance: Vec<VarId>,
    checks: Vec<[VarId; 2]>,
    service_level: VarId,
}

impl AircraftColumns<'_> {
    /// `d[n,k]`; the checkpoint list always ends at `n`.
    fn end(&self) -> VarId {
        self.performance[self.performance.len() - 1]
    }

    /// `m[n,k,·]`.
    fn end_checks(&self) -> [VarId; 2] {
        self.checks[self.checks.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::indexing::index_aircraft_intervals;
    use crate::indexing::test_support::{intervals, roster};
    use crate::milp::GoodLpSolver;

    const DAY: f64 = 86_400.0;

    fn fixture() -> (Vec<Interval>, AircraftIntervals, ModelConstants) {
        let ivs = intervals();
        let idx = index_aircraft_intervals(&ivs, &roster()).unwrap();
        let constants = ModelConstants::from_intervals(&ivs, &PlannerConfig::default()).unwrap();
        (ivs, idx, constants)
    }

    #[test]
    fn test_variable_counts() {
        let (ivs, idx, constants) = fixture();
        let (model, vars) = MaintenanceModelBuilder::new(&idx, &ivs, &constants).build();

        // K1: 6 checkpoints, K2: 4, K3: 3
        assert_eq!(vars.iter_performance().count(), 13);
        assert_eq!(vars.iter_maintenance().count(), 26);
        assert_eq!(vars.aircraft_count(), 3);
        assert_eq!(model.variable_count(), 13 + 26 + 3);
        assert_eq!(model.binary_count(), 26 + 3);
        assert!(vars.service_level("K4").is_none());
        assert!(vars.performance(1, "K2").is_none());
    }

    #[test]
    fn test_initialisation() {
        let (ivs, idx, constants) = fixture();
        let (model, vars) = MaintenanceModelBuilder::new(&idx, &ivs, &constants).build();

        let init = model.constraint("InitialPerformance[K1]").unwrap();
        assert_eq!(init.relation, Relation::Equal);
        assert!((init.rhs - 0.4).abs() < 1e-12);
        assert_eq!(init.lhs.coefficient(vars.performance(0, "K1").unwrap()), 1.0);

        for c in CheckType::ALL {
            let name = format!("InitialMaintenance[K2,{c}]");
            let con = model.constraint(&name).unwrap();
            assert_eq!(con.rhs, 0.0);
            assert_eq!(con.lhs.coefficient(vars.maintenance(0, "K2", c).unwrap()), 1.0);
        }

        let sl = model.constraint("ServiceLevel[K3]").unwrap();
        assert_eq!(sl.relation, Relation::GreaterEq);
        assert_eq!(sl.lhs.coefficient(vars.performance(5, "K3").unwrap()), 1.0);
        assert!((sl.lhs.coefficient(vars.service_level("K3").unwrap()) + 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_transition_coefficients() {
        let (ivs, idx, constants) = fixture();
        let (model, vars) = MaintenanceModelBuilder::new(&idx, &ivs, &constants).build();

        let con = model.constraint("PerformanceTransition[2,K1]").unwrap();
        let m_a = vars.maintenance(1, "K1", CheckType::A).unwrap();
        let m_c = vars.maintenance(1, "K1", CheckType::C).unwrap();
        let expected = -DAY * (5.4e-8 + 1e-8);

        assert_eq!(con.relation, Relation::LessEq);
        assert!((con.lhs.coefficient(m_a) - expected).abs() < 1e-12);
        assert!((con.lhs.coefficient(m_c) - expected).abs() < 1e-12);
        assert_eq!(con.lhs.coefficient(vars.performance(2, "K1").unwrap()), 1.0);
        assert_eq!(con.lhs.coefficient(vars.performance(1, "K1").unwrap()), -1.0);
        assert!((con.rhs + 1e-8 * DAY).abs() < 1e-15);

        // K2 first appears in interval 2, two days after the horizon start.
        let con = model.constraint("PerformanceTransition[2,K2]").unwrap();
        assert!((con.rhs + 2.0 * 1e-8 * DAY).abs() < 1e-15);
    }

    #[test]
    fn test_first_entry_has_no_transition() {
        let (ivs, idx, constants) = fixture();
        let (model, _) = MaintenanceModelBuilder::new(&idx, &ivs, &constants).build();

        assert!(model.constraint("PerformanceTransition[0,K1]").is_none());
        assert!(model.constraint("SingleCheck[0,K1]").is_some());
        assert!(model.constraint("FlightFloor[0,K1]").is_some());
    }

    #[test]
    fn test_recurrence_closes_before_horizon() {
        let (ivs, idx, constants) = fixture();
        let (model, vars) = MaintenanceModelBuilder::new(&idx, &ivs, &constants).build();

        // K1: 0,1,2,3,4,5 -> closed at 4, bridging from 3.
        let end = model.constraint("PerformanceEnd[4,K1]").unwrap();
        assert_eq!(end.lhs.coefficient(vars.performance(5, "K1").unwrap()), 1.0);
        assert_eq!(end.lhs.coefficient(vars.performance(3, "K1").unwrap()), -1.0);
        assert!((end.rhs + 2.0 * 1e-8 * DAY).abs() < 1e-15);
        assert!(model.constraint("PerformanceTransition[4,K1]").is_none());

        // K3: 0,3,5 -> closed at 3, bridging from 0.
        let end = model.constraint("PerformanceEnd[3,K3]").unwrap();
        assert_eq!(end.lhs.coefficient(vars.performance(0, "K3").unwrap()), -1.0);
        assert!((end.rhs + 5.0 * 1e-8 * DAY).abs() < 1e-15);
        assert_eq!(model.constraints_matching("PerformanceEnd*").count(), 3);
    }

    #[test]
    fn test_sentinel_only_aircraft() {
        let ivs = intervals();
        let constants = ModelConstants::from_intervals(&ivs, &PlannerConfig::default()).unwrap();
        let idx = AircraftIntervals::from_slots(5, [("K9", vec![0, 5])]);
        let (model, _) = MaintenanceModelBuilder::new(&idx, &ivs, &constants).build();

        let recurrence: Vec<&str> = model
            .constraints()
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| {
                ["PerformanceEnd", "PerformanceTransition", "FlightFloor"]
                    .iter()
                    .any(|p| name.starts_with(p))
            })
            .collect();
        assert_eq!(recurrence, vec!["PerformanceEnd[0,K9]"]);
        assert_eq!(model.constraints_matching("SingleCheck*").count(), 2);
    }

    #[test]
    fn test_every_checkpoint_has_single_check() {
        let (ivs, idx, constants) = fixture();
        let (model, vars) = MaintenanceModelBuilder::new(&idx, &ivs, &constants).build();

        for (i, k, c, m) in vars.iter_maintenance() {
            let name = format!("SingleCheck[{i},{k}]");
            let con = model.constraint(&name).unwrap_or_else(|| panic!("{name} missing"));
            assert_eq!(con.rhs, 1.0);
            assert_eq!(con.lhs.coefficient(m), 1.0, "{name} lacks m[{i},{k},{c}]");
        }
        assert_eq!(model.constraints_matching("SingleCheck*").count(), 13);
    }

    #[test]
    fn test_no_check_at_horizon_end() {
        let (ivs, idx, constants) = fixture();
        let (model, vars) = MaintenanceModelBuilder::new(&idx, &ivs, &constants).build();

        for (k, _) in vars.iter_service_level() {
            for c in CheckType::ALL {
                let con = model.constraint(&format!("FinalMaintenance[{k},{c}]")).unwrap();
                assert_eq!(con.relation, Relation::Equal);
                assert_eq!(con.rhs, 0.0);
                assert_eq!(con.lhs.coefficient(vars.maintenance(5, k, c).unwrap()), 1.0);
            }
        }
    }

    #[test]
    fn test_double_check_at_closing_checkpoint_rejected() {
        let (ivs, idx, constants) = fixture();
        let solved = MaintenanceModelBuilder::new(&idx, &ivs, &constants)
            .solve(&GoodLpSolver::new(), &SolverConfig::default())
            .unwrap();

        // K1 closes at 4, so no transition reads m[4,K1,·].
        let mut values = solved.solution.values().to_vec();
        for c in CheckType::ALL {
            values[solved.vars.maintenance(4, "K1", c).unwrap().index()] = 1.0;
        }
        let broken: Vec<&str> = solved
            .model
            .constraints()
            .iter()
            .filter(|con| !con.is_satisfied(&values, 1e-6))
            .map(|con| con.name.as_str())
            .collect();
        assert!(broken.contains(&"SingleCheck[4,K1]"));
    }

    #[test]
    fn test_resource_constraints() {
        let (ivs, idx, constants) = fixture();
        let (model, vars) = MaintenanceModelBuilder::new(&idx, &ivs, &constants).build();

        // Intervals 1..4 each carry at least one aircraft, 4 resources each.
        assert_eq!(model.constraints_matching("Resources*").count(), 16);
        assert!(model.constraint("Resources[r1,0]").is_none());

        let con = model.constraint("Resources[r2,2]").unwrap();
        assert_eq!(con.rhs, 2.0);
        assert_eq!(con.lhs.coefficient(vars.maintenance(2, "K1", CheckType::A).unwrap()), 2.0);
        assert_eq!(con.lhs.coefficient(vars.maintenance(2, "K2", CheckType::C).unwrap()), 1.0);
        assert_eq!(con.lhs.terms().count(), 4);
    }

    #[test]
    fn test_objective_counts_aircraft() {
        let (ivs, idx, constants) = fixture();
        let (model, vars) = MaintenanceModelBuilder::new(&idx, &ivs, &constants).build();

        assert_eq!(model.sense(), ObjectiveSense::Maximize);
        assert_eq!(model.objective().terms().count(), 3);
        for (_, c) in vars.iter_service_level() {
            assert_eq!(model.objective().coefficient(c), 1.0);
        }
    }

    #[test]
    fn test_empty_fleet() {
        let ivs: Vec<Interval> = intervals()
            .into_iter()
            .map(|mut iv| {
                iv.aircraft.clear();
                iv
            })
            .collect();
        let idx = index_aircraft_intervals(&ivs, &roster()).unwrap();
        let constants = ModelConstants::from_intervals(&ivs, &PlannerConfig::default()).unwrap();
        let (model, vars) = MaintenanceModelBuilder::new(&idx, &ivs, &constants).build();

        assert!(vars.is_empty());
        assert_eq!(model.variable_count(), 0);
        assert_eq!(model.constraint_count(), 0);
        assert!(model.objective().is_constant());
    }

    #[test]
    fn test_build_is_deterministic() {
        let (ivs, idx, constants) = fixture();
        let builder = MaintenanceModelBuilder::new(&idx, &ivs, &constants).with_name("det");
        let (a, _) = builder.build();
        let (b, _) = builder.build();
        assert_eq!(a, b);
        assert_eq!(a.name(), "det");
    }

    #[test]
    fn test_solved_model_respects_constraints() {
        let (ivs, idx, constants) = fixture();
        let solved = MaintenanceModelBuilder::new(&idx, &ivs, &constants)
            .solve(&GoodLpSolver::new(), &SolverConfig::default())
            .unwrap();

        let values = solved.solution.values();
        for con in solved.model.constraints() {
            assert!(con.is_satisfied(values, 1e-6), "{} violated", con.name);
        }
        for (k, c) in solved.vars.iter_service_level() {
            if solved.solution.value(c) > 0.5 {
                let d_end = solved.solution.value(solved.vars.performance(5, k).unwrap());
                assert!(d_end >= 0.4 - 1e-6);
            }
        }
    }
}
