//! Fleet maintenance planning for the U-Engine ecosystem.
//!
//! Schedules preventive A and C checks for a fleet of aircraft across
//! maintenance stations. Performance of each aircraft decays while flying
//! and recovers after a check; stations share a limited pool of resources
//! per interval. The crate formulates this as a mixed-integer linear
//! program, maximizing the number of aircraft that end the horizon at or
//! above the service level, and reconstructs per-station results from the
//! solved model.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Interval`, `IntervalSnapshot`, `CheckType`,
//!   `StationResource`, plan records
//! - **`validation`**: Input integrity checks (roster, ordering, stations)
//! - **`config`**: `PlannerConfig`, loaded from TOML
//! - **`indexing`**: Per-aircraft interval index and per-station projection
//! - **`constants`**: Rates, interval boundaries, resource tables of a run
//! - **`milp`**: Solver-neutral MILP model and the `MipSolver` seam
//! - **`formulation`**: `MaintenanceModelBuilder`, the MILP formulation
//! - **`extraction`**: Station-scoped solution values and trajectory
//!   reconstruction
//! - **`planner`**: `MaintenancePlanner` pipeline, `StationReport`, sinks
//!
//! # Architecture
//!
//! The crate only builds models and reads solutions back. Branch-and-bound
//! is delegated to `good_lp` (`microlp` by default, HiGHS with the `highs`
//! feature). Interval data arrives as a frozen JSON snapshot; rendering is
//! left to `ReportSink` implementations.
//!
//! # References
//!
//! - Sriram & Haghani (2003), "An optimization model for aircraft
//!   maintenance scheduling and re-assignment"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Wolsey (2020), "Integer Programming"

pub mod config;
pub mod constants;
pub mod error;
pub mod extraction;
pub mod formulation;
pub mod indexing;
pub mod milp;
pub mod models;
pub mod planner;
pub mod validation;

pub use error::{PlannerError, PlannerResult, SolveError};
