//! Run-wide model constants.
//!
//! Gathers everything the formulation treats as data: rates of the
//! performance recurrence, absolute interval boundaries, and the resource
//! tables. Built once per run from the interval sequence and the planner
//! configuration, immutable afterwards.
//!
//! # Time Model
//! `times[i]` is the start of interval `i` in UNIX seconds and `times[n]`
//! is the end of the last interval, so the vector has `n + 1` strictly
//! increasing entries. Rates are per second.

use crate::config::{PerformanceBounds, PlannerConfig};
use crate::error::{PlannerError, PlannerResult};
use crate::models::{CheckType, Interval, ResourceTable};

/// Fixed parameters of one optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConstants {
    /// Improvement per second after an A check.
    pub rate_a: f64,
    /// Improvement per second after a C check.
    pub rate_c: f64,
    /// Change per second while flying.
    pub degradation: f64,
    /// Interval boundaries in seconds, `n + 1` entries.
    pub times: Vec<i64>,
    /// Demand and capacity tables.
    pub resources: ResourceTable,
    /// Performance bounds and thresholds.
    pub bounds: PerformanceBounds,
}

impl ModelConstants {
    /// Derives the constants for an interval sequence.
    ///
    /// # Errors
    /// - `EmptyHorizon` if there are no intervals.
    /// - `NonIncreasingTimes` if the boundaries are not strictly increasing.
    pub fn from_intervals(intervals: &[Interval], config: &PlannerConfig) -> PlannerResult<Self> {
        let last = intervals.last().ok_or(PlannerError::EmptyHorizon)?;

        let mut times: Vec<i64> = intervals.iter().map(|iv| iv.start.timestamp()).collect();
        times.push(last.end.timestamp());

        if let Some(index) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(PlannerError::NonIncreasingTimes { index: index + 1 });
        }

        Ok(Self {
            rate_a: config.rates.check_a,
            rate_c: config.rates.check_c,
            degradation: config.rates.degradation,
            times,
            resources: config.resource_table(),
            bounds: config.performance.clone(),
        })
    }

    /// End-of-horizon index `n`.
    #[inline]
    pub fn horizon(&self) -> usize {
        self.times.len() - 1
    }

    /// Improvement rate of a check type.
    #[inline]
    pub fn improvement(&self, check: CheckType) -> f64 {
        match check {
            CheckType::A => self.rate_a,
            CheckType::C => self.rate_c,
        }
    }

    /// Seconds between boundaries `from` and `to`.
    #[inline]
    pub fn elapsed(&self, from: usize, to: usize) -> f64 {
        (self.times[to] - self.times[from]) as f64
    }

    /// Seconds from boundary `from` to the end of the horizon.
    #[inline]
    pub fn remaining(&self, from: usize) -> f64 {
        self.elapsed(from, self.horizon())
    }
}
