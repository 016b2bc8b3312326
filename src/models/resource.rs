//! Station resource model.
//!
//! Resources are the shared pools a station draws on while performing
//! checks: hangar slots, crews, tooling, ground equipment. Each check type
//! consumes a fixed number of units of each resource in the interval where
//! it is performed, and every resource offers a fixed number of units per
//! interval.

use serde::{Deserialize, Serialize};

use super::CheckType;

/// A station resource with its per-interval capacity and per-check demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationResource {
    /// Unique resource name (e.g. "r1").
    pub name: String,
    /// Units available per interval.
    pub capacity: f64,
    /// Units consumed by one A check.
    #[serde(default)]
    pub demand_a: f64,
    /// Units consumed by one C check.
    #[serde(default)]
    pub demand_c: f64,
}

impl StationResource {
    /// Creates a resource with no demand from either check type.
    pub fn new(name: impl Into<String>, capacity: f64) -> Self {
        Self {
            name: name.into(),
            capacity,
            demand_a: 0.0,
            demand_c: 0.0,
        }
    }

    /// Sets the demand of one check type.
    pub fn with_demand(mut self, check: CheckType, units: f64) -> Self {
        match check {
            CheckType::A => self.demand_a = units,
            CheckType::C => self.demand_c = units,
        }
        self
    }

    /// Units consumed by one check of the given type.
    #[inline]
    pub fn demand(&self, check: CheckType) -> f64 {
        match check {
            CheckType::A => self.demand_a,
            CheckType::C => self.demand_c,
        }
    }
}

/// The demand (`b`) and capacity (`B`) tables, in resource order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceTable {
    resources: Vec<StationResource>,
}

impl ResourceTable {
    /// Creates a table from resource definitions.
    pub fn new(resources: Vec<StationResource>) -> Self {
        Self { resources }
    }

    /// Resource names, in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(|r| r.name.as_str())
    }

    /// All resource definitions.
    pub fn resources(&self) -> &[StationResource] {
        &self.resources
    }

    /// Looks up a resource by name.
    pub fn get(&self, name: &str) -> Option<&StationResource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Demand `b[(resource, check)]`; 0 for unknown resources.
    pub fn demand(&self, resource: &str, check: CheckType) -> f64 {
        self.get(resource).map(|r| r.demand(check)).unwrap_or(0.0)
    }

    /// Capacity `B[resource]`.
    pub fn capacity(&self, resource: &str) -> Option<f64> {
        self.get(resource).map(|r| r.capacity)
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether no resources are defined.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_builder() {
        let r = StationResource::new("r2", 2.0)
            .with_demand(CheckType::A, 2.0)
            .with_demand(CheckType::C, 1.0);

        assert_eq!(r.name, "r2");
        assert!((r.capacity - 2.0).abs() < 1e-10);
        assert!((r.demand(CheckType::A) - 2.0).abs() < 1e-10);
        assert!((r.demand(CheckType::C) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_table_lookup() {
        let table = ResourceTable::new(vec![
            StationResource::new("r1", 1.0).with_demand(CheckType::A, 1.0),
            StationResource::new("r4", 2.0).with_demand(CheckType::C, 2.0),
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["r1", "r4"]);
        assert!((table.demand("r4", CheckType::C) - 2.0).abs() < 1e-10);
        assert!((table.demand("r4", CheckType::A) - 0.0).abs() < 1e-10);
        assert!((table.demand("missing", CheckType::A) - 0.0).abs() < 1e-10);
        assert_eq!(table.capacity("r1"), Some(1.0));
        assert_eq!(table.capacity("missing"), None);
    }

    #[test]
    fn test_empty_table() {
        let table = ResourceTable::default();
        assert!(table.is_empty());
        assert_eq!(table.names().count(), 0);
    }
}
