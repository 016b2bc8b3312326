//! Solver-neutral MILP model.
//!
//! `MipModel` records variables, named linear constraints, and a single
//! linear objective. It is built by the formulation and handed to a
//! `MipSolver`; keeping it independent of any backend makes the
//! formulation inspectable in tests and lets slack be read back by
//! constraint name.

use std::collections::BTreeMap;
use std::fmt;

/// Handle of a variable inside one `MipModel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    /// Position of the variable in the model.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarDomain {
    /// Real-valued within `[lower, upper]`.
    Continuous { lower: f64, upper: f64 },
    /// 0 or 1.
    Binary,
}

/// A declared variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDef {
    /// Display name (e.g. `d[3,K1]`).
    pub name: String,
    /// Domain.
    pub domain: VarDomain,
}

/// An affine expression `Σ coef·var + constant`.
///
/// Terms are kept ordered by variable and merged on insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinExpr {
    terms: BTreeMap<VarId, f64>,
    constant: f64,
}

impl LinExpr {
    /// Creates the zero expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a constant expression.
    pub fn constant(value: f64) -> Self {
        Self {
            terms: BTreeMap::new(),
            constant: value,
        }
    }

    /// Adds `coef·var`, merging with an existing term.
    pub fn add_term(&mut self, var: VarId, coef: f64) {
        *self.terms.entry(var).or_insert(0.0) += coef;
    }

    /// Adds a constant.
    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    /// Builder form of `add_term`.
    pub fn plus(mut self, var: VarId, coef: f64) -> Self {
        self.add_term(var, coef);
        self
    }

    /// Builder form of `add_constant`.
    pub fn plus_constant(mut self, value: f64) -> Self {
        self.add_constant(value);
        self
    }

    /// Coefficient of a variable (0 if absent).
    pub fn coefficient(&self, var: VarId) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.0)
    }

    /// Constant part.
    pub fn constant_part(&self) -> f64 {
        self.constant
    }

    /// Terms in variable order.
    pub fn terms(&self) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.terms.iter().map(|(v, c)| (*v, *c))
    }

    /// Whether the expression has no variable terms.
    pub fn is_constant(&self) -> bool {
        self.terms.values().all(|c| *c == 0.0)
    }

    /// Evaluates the expression against values indexed by `VarId`.
    pub fn eval(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values[v.index()])
            .sum::<f64>()
            + self.constant
    }
}

/// Relation between the two sides of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessEq,
    GreaterEq,
    Equal,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::LessEq => "<=",
            Relation::GreaterEq => ">=",
            Relation::Equal => "==",
        })
    }
}

/// A named linear constraint `lhs (<=|>=|==) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Constraint name (e.g. `Resources[r1,4]`).
    pub name: String,
    /// Left-hand side.
    pub lhs: LinExpr,
    /// Relation.
    pub relation: Relation,
    /// Right-hand side constant.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Slack of the constraint under the given values.
    ///
    /// Non-negative when satisfied: `rhs − lhs` for `<=`, `lhs − rhs` for
    /// `>=`, and `−|lhs − rhs|` for equalities.
    pub fn slack(&self, values: &[f64]) -> f64 {
        let lhs = self.lhs.eval(values);
        match self.relation {
            Relation::LessEq => self.rhs - lhs,
            Relation::GreaterEq => lhs - self.rhs,
            Relation::Equal => -(lhs - self.rhs).abs(),
        }
    }

    /// Whether the constraint holds within `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.slack(values) >= -tolerance
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectiveSense {
    #[default]
    Maximize,
    Minimize,
}

/// A mixed-integer linear program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MipModel {
    name: String,
    variables: Vec<VarDef>,
    constraints: Vec<LinearConstraint>,
    objective: LinExpr,
    sense: ObjectiveSense,
}

impl MipModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares a continuous variable.
    pub fn add_continuous(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        self.push_var(name.into(), VarDomain::Continuous { lower, upper })
    }

    /// Declares a binary variable.
    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.push_var(name.into(), VarDomain::Binary)
    }

    fn push_var(&mut self, name: String, domain: VarDomain) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(VarDef { name, domain });
        id
    }

    /// Adds a named constraint. Constant terms on the left are moved to the
    /// right-hand side.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        mut lhs: LinExpr,
        relation: Relation,
        rhs: f64,
    ) {
        let rhs = rhs - lhs.constant;
        lhs.constant = 0.0;
        self.constraints.push(LinearConstraint {
            name: name.into(),
            lhs,
            relation,
            rhs,
        });
    }

    /// Sets the objective.
    pub fn set_objective(&mut self, objective: LinExpr, sense: ObjectiveSense) {
        self.objective = objective;
        self.sense = sense;
    }

    /// Objective expression.
    pub fn objective(&self) -> &LinExpr {
        &self.objective
    }

    /// Objective direction.
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    /// Variable definition.
    pub fn variable(&self, id: VarId) -> &VarDef {
        &self.variables[id.index()]
    }

    /// All variables in declaration order.
    pub fn variables(&self) -> &[VarDef] {
        &self.variables
    }

    /// All constraints in insertion order.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Looks up a constraint by exact name.
    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Constraints whose name matches `pattern`.
    ///
    /// A trailing `*` matches any suffix (`Resources*`); otherwise the name
    /// must match exactly.
    pub fn constraints_matching<'a>(
        &'a self,
        pattern: &'a str,
    ) -> impl Iterator<Item = &'a LinearConstraint> + 'a {
        self.constraints
            .iter()
            .filter(move |c| name_matches(&c.name, pattern))
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of binary variables.
    pub fn binary_count(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.domain == VarDomain::Binary)
            .count()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

fn name_matches(name: &str, pattern: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => name.starts_with(prefix),
        None => name == pattern,
    }
}
