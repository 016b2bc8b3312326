//! Planning pipeline.
//!
//! `MaintenancePlanner` runs one snapshot end to end:
//!
//! 1. Validate the snapshot.
//! 2. Index aircraft intervals and derive the run constants.
//! 3. Build and solve the fleet-wide MILP.
//! 4. For each station: project, extract, report, and hand the report to
//!    a `ReportSink`.
//!
//! A sink failure is recorded in the outcome and the remaining stations
//! are still reported. Anything before step 4 aborts the run.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

mod report;
mod sink;

pub use report::{StationInterval, StationReport};
pub use sink::{CollectingSink, JsonReportSink, ReportSink};

use std::collections::BTreeMap;

use log::{info, warn};

use crate::config::PlannerConfig;
use crate::constants::ModelConstants;
use crate::error::{PlannerError, PlannerResult};
use crate::extraction::{extract_station_solution, resource_slacks};
use crate::formulation::{MaintenanceModelBuilder, SolvedModel};
use crate::indexing::{index_aircraft_intervals, StationIndex};
use crate::milp::{GoodLpSolver, MipSolver};
use crate::models::IntervalSnapshot;
use crate::validation::validate_snapshot;

/// Per-station summary of a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSummary {
    /// Station identifier.
    pub station: String,
    /// Aircraft seen at the station.
    pub aircraft_count: usize,
    /// Station aircraft at or above the service level.
    pub service_level_count: usize,
    /// Checks scheduled at the station.
    pub action_count: usize,
    /// Violations found by the report audit.
    pub violation_count: usize,
}

/// Result of planning one snapshot.
#[derive(Debug)]
pub struct PlanOutcome {
    /// Snapshot version.
    pub version: String,
    /// Aircraft at or above the service level, fleet-wide.
    pub objective: f64,
    /// Roster aircraft with no relevant interval.
    pub idle: Vec<String>,
    /// One summary per station, ascending by station.
    pub stations: Vec<StationSummary>,
    /// Slack of each resource constraint, keyed by `(resource, interval)`.
    pub resource_slacks: BTreeMap<(String, usize), f64>,
    /// Sink errors, one per station that could not be delivered.
    pub sink_failures: Vec<PlannerError>,
    /// The solved model.
    pub solved: SolvedModel,
}

impl PlanOutcome {
    /// Number of aircraft at or above the service level.
    pub fn service_level_count(&self) -> usize {
        self.objective.round().max(0.0) as usize
    }

    /// Whether every station report was delivered.
    pub fn is_complete(&self) -> bool {
        self.sink_failures.is_empty()
    }

    /// Summary of one station.
    pub fn station(&self, station: &str) -> Option<&StationSummary> {
        self.stations.iter().find(|s| s.station == station)
    }
}

/// Fleet maintenance planner.
///
/// # Example
/// ```no_run
/// use u_maintenance::config::PlannerConfig;
/// use u_maintenance::models::IntervalSnapshot;
/// use u_maintenance::planner::{JsonReportSink, MaintenancePlanner};
///
/// let config = PlannerConfig::from_file("planner.toml").unwrap();
/// let snapshot = IntervalSnapshot::from_json_file("intervals.json").unwrap();
///
/// let planner = MaintenancePlanner::new(config);
/// let mut sink = JsonReportSink::new("output");
/// let outcome = planner.plan(&snapshot, &mut sink).unwrap();
/// println!("{} aircraft at service level", outcome.service_level_count());
/// ```
#[derive(Debug, Clone)]
pub struct MaintenancePlanner<S = GoodLpSolver> {
    solver: S,
    config: PlannerConfig,
}

impl MaintenancePlanner<GoodLpSolver> {
    /// Creates a planner with the default `good_lp` solver.
    pub fn new(config: PlannerConfig) -> Self {
        Self::with_solver(GoodLpSolver::new(), config)
    }
}

impl<S: MipSolver> MaintenancePlanner<S> {
    /// Creates a planner with a custom solver.
    pub fn with_solver(solver: S, config: PlannerConfig) -> Self {
        Self { solver, config }
    }

    /// Planner configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans one snapshot and reports every station to `sink`.
    ///
    /// # Errors
    /// - `Config` if the configuration is inconsistent.
    /// - `Validation` if the snapshot is malformed.
    /// - `Solve` if the model is infeasible or the backend fails.
    ///
    /// Sink failures are not errors; see `PlanOutcome::sink_failures`.
    pub fn plan(
        &self,
        snapshot: &IntervalSnapshot,
        sink: &mut dyn ReportSink,
    ) -> PlannerResult<PlanOutcome> {
        self.config.validate()?;
        validate_snapshot(snapshot).map_err(PlannerError::Validation)?;

        let intervals = &snapshot.intervals;
        let index = index_aircraft_intervals(intervals, &snapshot.aircraft)?;
        for k in index.idle() {
            warn!("aircraft '{k}' has no relevant interval, excluded from the model");
        }

        let constants = ModelConstants::from_intervals(intervals, &self.config)?;
        info!(
            "planning snapshot '{}': {} intervals, {} aircraft",
            snapshot.version,
            constants.horizon(),
            index.len()
        );

        let solved = MaintenanceModelBuilder::new(&index, intervals, &constants)
            .solve(&self.solver, &self.config.solver)?;

        let stations = StationIndex::build(intervals);
        let mut summaries = Vec::new();
        let mut sink_failures = Vec::new();

        for station in stations.stations() {
            let projection = stations.project(intervals, &snapshot.aircraft, station);
            let solution = extract_station_solution(
                &solved.vars,
                &solved.solution,
                &projection,
                &self.config.tolerance,
            );
            let report = StationReport::build(&projection, &solution, &constants);

            info!(
                "station {station}: {}/{} aircraft at service level, {} checks",
                report.service_level_count,
                report.aircraft.len(),
                report.action_count()
            );
            for v in &report.violations {
                warn!("station {station}: {}", v.message);
            }

            summaries.push(StationSummary {
                station: station.to_string(),
                aircraft_count: report.aircraft.len(),
                service_level_count: report.service_level_count,
                action_count: report.action_count(),
                violation_count: report.violations.len(),
            });

            if let Err(e) = sink.accept(&report) {
                warn!("{e}");
                sink_failures.push(e);
            }
        }

        Ok(PlanOutcome {
            version: snapshot.version.clone(),
            objective: solved.objective(),
            idle: index.idle().to_vec(),
            stations: summaries,
            resource_slacks: resource_slacks(&solved.model, &solved.solution),
            sink_failures,
            solved,
        })
    }

    /// Plans several snapshots in order. A failing snapshot does not stop
    /// the others.
    pub fn plan_batch(
        &self,
        snapshots: &[IntervalSnapshot],
        sink: &mut dyn ReportSink,
    ) -> Vec<PlannerResult<PlanOutcome>> {
        snapshots
            .iter()
            .map(|snapshot| {
                let result = self.plan(snapshot, sink);
                if let Err(e) = &result {
                    warn!("snapshot '{}' failed: {e}", snapshot.version);
                }
                result
            })
            .collect()
    }
}
