//! Decision variable registry.

use std::collections::BTreeMap;

use crate::milp::VarId;
use crate::models::CheckType;

/// Handles of the decision variables of one maintenance model.
///
/// - `d[i,k]`: performance of aircraft `k` at the start of interval `i`
/// - `m[i,k,c]`: check of type `c` on aircraft `k` in interval `i`
/// - `C[k]`: aircraft `k` ends the horizon at or above the service level
///
/// Keyed by aircraft first so lookups take `&str`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceVars {
    performance: BTreeMap<String, BTreeMap<usize, VarId>>,
    maintenance: BTreeMap<String, BTreeMap<(usize, CheckType), VarId>>,
    service_level: BTreeMap<String, VarId>,
}

impl MaintenanceVars {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_performance(&mut self, interval: usize, aircraft: &str, var: VarId) {
        self.performance
            .entry(aircraft.to_string())
            .or_default()
            .insert(interval, var);
    }

    pub(crate) fn insert_maintenance(
        &mut self,
        interval: usize,
        aircraft: &str,
        check: CheckType,
        var: VarId,
    ) {
        self.maintenance
            .entry(aircraft.to_string())
            .or_default()
            .insert((interval, check), var);
    }

    pub(crate) fn insert_service_level(&mut self, aircraft: &str, var: VarId) {
        self.service_level.insert(aircraft.to_string(), var);
    }

    /// `d[i,k]`.
    pub fn performance(&self, interval: usize, aircraft: &str) -> Option<VarId> {
        self.performance.get(aircraft)?.get(&interval).copied()
    }

    /// `m[i,k,c]`.
    pub fn maintenance(&self, interval: usize, aircraft: &str, check: CheckType) -> Option<VarId> {
        self.maintenance.get(aircraft)?.get(&(interval, check)).copied()
    }

    /// `C[k]`.
    pub fn service_level(&self, aircraft: &str) -> Option<VarId> {
        self.service_level.get(aircraft).copied()
    }

    /// All `d` variables as `(interval, aircraft, var)`, aircraft-major.
    pub fn iter_performance(&self) -> impl Iterator<Item = (usize, &str, VarId)> {
        self.performance
            .iter()
            .flat_map(|(k, m)| m.iter().map(move |(&i, &v)| (i, k.as_str(), v)))
    }

    /// All `m` variables as `(interval, aircraft, check, var)`, aircraft-major.
    pub fn iter_maintenance(&self) -> impl Iterator<Item = (usize, &str, CheckType, VarId)> {
        self.maintenance
            .iter()
            .flat_map(|(k, m)| m.iter().map(move |(&(i, c), &v)| (i, k.as_str(), c, v)))
    }

    /// All `C` variables as `(aircraft, var)`.
    pub fn iter_service_level(&self) -> impl Iterator<Item = (&str, VarId)> {
        self.service_level.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Number of modeled aircraft.
    pub fn aircraft_count(&self) -> usize {
        self.service_level.len()
    }

    /// Whether no variable was created.
    pub fn is_empty(&self) -> bool {
        self.service_level.is_empty() && self.performance.is_empty()
    }
}
