//! Planner configuration.
//!
//! All model parameters (performance bounds, rates, resource tables,
//! numeric tolerances, solver options) live in one `PlannerConfig`, which
//! can be read from a TOML file. Every section is optional and falls back
//! to the reference parameter set.
//!
//! ```toml
//! [performance]
//! initial = 0.4
//! service_level = 0.4
//!
//! [rates]
//! check_a = 5.4e-8
//! degradation = -1e-8
//!
//! [[resources]]
//! name = "r1"
//! capacity = 1
//! demand_a = 1
//! demand_c = 1
//!
//! [solver]
//! time_limit_secs = 600
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::{CheckType, ResourceTable, StationResource};

/// Complete planner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub performance: PerformanceBounds,
    #[serde(default)]
    pub rates: RateConfig,
    #[serde(default = "default_resources")]
    pub resources: Vec<StationResource>,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
    #[serde(default)]
    pub solver: SolverConfig,
}

/// Bounds and thresholds of the performance metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceBounds {
    /// Performance of every aircraft at the start of the horizon.
    #[serde(default = "default_initial")]
    pub initial: f64,
    /// Airworthiness floor.
    #[serde(default = "default_floor")]
    pub floor: f64,
    /// Upper bound of the metric.
    #[serde(default = "default_ceiling")]
    pub ceiling: f64,
    /// End-of-horizon threshold counted by the objective.
    #[serde(default = "default_service_level")]
    pub service_level: f64,
}

/// Per-second rates of the performance recurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateConfig {
    /// Improvement per second after an A check.
    #[serde(default = "default_improvement")]
    pub check_a: f64,
    /// Improvement per second after a C check.
    #[serde(default = "default_improvement")]
    pub check_c: f64,
    /// Change per second while flying (non-positive).
    #[serde(default = "default_degradation")]
    pub degradation: f64,
}

/// Tolerances used when reading solved values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToleranceConfig {
    /// Maintenance values at or below this are treated as unset.
    #[serde(default = "default_maintenance_tolerance")]
    pub maintenance: f64,
    /// Band around 1.0 within which a binary counts as set.
    #[serde(default = "default_binary_tolerance")]
    pub binary: f64,
}

/// Options forwarded to the MILP backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Wall-clock limit for one solve, in seconds.
    #[serde(default)]
    pub time_limit_secs: Option<f64>,
}

fn default_initial() -> f64 {
    0.4
}

fn default_floor() -> f64 {
    0.2
}

fn default_ceiling() -> f64 {
    1.0
}

fn default_service_level() -> f64 {
    0.4
}

fn default_improvement() -> f64 {
    5.4e-8
}

fn default_degradation() -> f64 {
    -1e-8
}

fn default_maintenance_tolerance() -> f64 {
    3e-12
}

fn default_binary_tolerance() -> f64 {
    1e-6
}

fn default_resources() -> Vec<StationResource> {
    vec![
        StationResource::new("r1", 1.0)
            .with_demand(CheckType::A, 1.0)
            .with_demand(CheckType::C, 1.0),
        StationResource::new("r2", 2.0)
            .with_demand(CheckType::A, 2.0)
            .with_demand(CheckType::C, 1.0),
        StationResource::new("r3", 1.0)
            .with_demand(CheckType::A, 1.0)
            .with_demand(CheckType::C, 1.0),
        StationResource::new("r4", 2.0)
            .with_demand(CheckType::A, 1.0)
            .with_demand(CheckType::C, 2.0),
    ]
}

impl Default for PerformanceBounds {
    fn default() -> Self {
        Self {
            initial: default_initial(),
            floor: default_floor(),
            ceiling: default_ceiling(),
            service_level: default_service_level(),
        }
    }
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            check_a: default_improvement(),
            check_c: default_improvement(),
            degradation: default_degradation(),
        }
    }
}

impl RateConfig {
    /// Improvement rate of a check type.
    #[inline]
    pub fn improvement(&self, check: CheckType) -> f64 {
        match check {
            CheckType::A => self.check_a,
            CheckType::C => self.check_c,
        }
    }
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            maintenance: default_maintenance_tolerance(),
            binary: default_binary_tolerance(),
        }
    }
}

impl ToleranceConfig {
    /// Whether a solved binary value counts as 1.
    #[inline]
    pub fn is_set(&self, value: f64) -> bool {
        (value - 1.0).abs() < self.binary
    }

    /// Whether a solved maintenance value counts as scheduled.
    #[inline]
    pub fn is_active(&self, value: f64) -> bool {
        value > self.maintenance
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            performance: PerformanceBounds::default(),
            rates: RateConfig::default(),
            resources: default_resources(),
            tolerance: ToleranceConfig::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Replaces the resource definitions.
    pub fn with_resources(mut self, resources: Vec<StationResource>) -> Self {
        self.resources = resources;
        self
    }

    /// Replaces the rates.
    pub fn with_rates(mut self, rates: RateConfig) -> Self {
        self.rates = rates;
        self
    }

    /// Sets the solver time limit.
    pub fn with_time_limit(mut self, secs: f64) -> Self {
        self.solver.time_limit_secs = Some(secs);
        self
    }

    /// Resource demand and capacity tables.
    pub fn resource_table(&self) -> ResourceTable {
        ResourceTable::new(self.resources.clone())
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.performance;
        if !(p.floor <= p.initial && p.initial <= p.ceiling) {
            return Err(ConfigError::Invalid(format!(
                "performance bounds must satisfy floor <= initial <= ceiling (got {} / {} / {})",
                p.floor, p.initial, p.ceiling
            )));
        }
        if !(p.floor..=p.ceiling).contains(&p.service_level) {
            return Err(ConfigError::Invalid(format!(
                "service level {} outside [{}, {}]",
                p.service_level, p.floor, p.ceiling
            )));
        }

        for check in CheckType::ALL {
            if self.rates.improvement(check) <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "improvement rate for check {check} must be positive"
                )));
            }
        }
        if self.rates.degradation > 0.0 {
            return Err(ConfigError::Invalid(
                "degradation rate must not be positive".to_string(),
            ));
        }

        let mut names = BTreeSet::new();
        for r in &self.resources {
            if !names.insert(r.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate resource '{}'", r.name)));
            }
            if r.capacity < 0.0 || r.demand_a < 0.0 || r.demand_c < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "resource '{}' has a negative capacity or demand",
                    r.name
                )));
            }
        }

        if self.tolerance.maintenance < 0.0 || self.tolerance.binary <= 0.0 {
            return Err(ConfigError::Invalid("tolerances must be positive".to_string()));
        }
        Ok(())
    }
}
