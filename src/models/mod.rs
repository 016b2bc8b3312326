//! Maintenance planning domain models.
//!
//! Provides the data types for describing a fleet maintenance problem and
//! its solution: intervals at stations, check types, station resources,
//! and flat plan records.
//!
//! # Domain Mappings
//!
//! | u-maintenance | Airline MRO | Rail | Bus depot |
//! |---------------|-------------|------|-----------|
//! | Interval | Ground time slot | Stabling window | Overnight park |
//! | Station | Line station / hangar | Depot | Garage |
//! | CheckType | A / C check | Exam / overhaul | Service / rebuild |
//! | StationResource | Crew, hangar bay | Pit road | Lift |

mod check;
mod interval;
mod plan;
mod resource;

pub use check::CheckType;
pub use interval::{Interval, IntervalSnapshot};
pub use plan::{MaintenanceAction, PerformancePoint, ResourceUsage, Violation, ViolationType};
pub use resource::{ResourceTable, StationResource};
