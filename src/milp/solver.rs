//! MILP solver seam and the `good_lp` backend.
//!
//! The formulation only ever talks to `MipSolver`. `GoodLpSolver` translates
//! a `MipModel` into a `good_lp` problem and solves it with the backend
//! selected by cargo features: HiGHS when `highs` is enabled, otherwise the
//! pure-Rust `microlp` branch-and-bound.

use good_lp::variable::UnsolvedProblem;
use good_lp::{variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable};
use log::{debug, info};

use super::model::{LinExpr, LinearConstraint, MipModel, ObjectiveSense, Relation, VarDomain, VarId};
use crate::config::SolverConfig;
use crate::error::SolveError;

#[cfg(not(any(feature = "microlp", feature = "highs")))]
compile_error!("enable the `microlp` or `highs` feature to select a MILP backend");

/// A MILP engine able to solve a `MipModel`.
pub trait MipSolver {
    /// Backend name, for logs.
    fn name(&self) -> &str;

    /// Solves the model to optimality (or until the configured limit).
    ///
    /// # Errors
    /// `SolveError::Infeasible` / `SolveError::Unbounded` when the model has
    /// no optimum, `SolveError::Backend` for any other backend failure.
    fn solve(&self, model: &MipModel, config: &SolverConfig) -> Result<MipSolution, SolveError>;
}

/// Solved variable values.
#[derive(Debug, Clone, PartialEq)]
pub struct MipSolution {
    values: Vec<f64>,
    objective: f64,
}

impl MipSolution {
    /// Creates a solution from values indexed by `VarId`.
    pub fn new(values: Vec<f64>, objective: f64) -> Self {
        Self { values, objective }
    }

    /// Solved value of a variable.
    #[inline]
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }

    /// All values, indexed by `VarId`.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Objective value.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Slack of one constraint at this solution.
    pub fn slack(&self, constraint: &LinearConstraint) -> f64 {
        constraint.slack(&self.values)
    }

    /// Slack of every constraint whose name matches `pattern`
    /// (trailing `*` = prefix match), in model order.
    pub fn slacks_matching(&self, model: &MipModel, pattern: &str) -> Vec<(String, f64)> {
        model
            .constraints_matching(pattern)
            .map(|c| (c.name.clone(), self.slack(c)))
            .collect()
    }
}

/// `MipSolver` backed by `good_lp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    /// Creates the solver.
    pub fn new() -> Self {
        Self
    }
}

impl MipSolver for GoodLpSolver {
    fn name(&self) -> &str {
        if cfg!(feature = "highs") {
            "good_lp/highs"
        } else {
            "good_lp/microlp"
        }
    }

    fn solve(&self, model: &MipModel, config: &SolverConfig) -> Result<MipSolution, SolveError> {
        if model.variable_count() == 0 {
            debug!("model '{}' has no variables, skipping backend", model.name());
            return Ok(MipSolution::new(Vec::new(), model.objective().constant_part()));
        }

        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = model
            .variables()
            .iter()
            .map(|def| {
                let definition = match def.domain {
                    VarDomain::Continuous { lower, upper } => variable().min(lower).max(upper),
                    VarDomain::Binary => variable().binary(),
                };
                vars.add(definition.name(def.name.clone()))
            })
            .collect();

        let objective = to_expression(model.objective(), &handles);
        let unsolved = match model.sense() {
            ObjectiveSense::Maximize => vars.maximise(objective),
            ObjectiveSense::Minimize => vars.minimise(objective),
        };

        info!(
            "solving '{}' with {}: {} variables ({} binary), {} constraints",
            model.name(),
            self.name(),
            model.variable_count(),
            model.binary_count(),
            model.constraint_count()
        );

        let values = run_backend(unsolved, model, &handles, config)?;
        let objective = model.objective().eval(&values);
        Ok(MipSolution::new(values, objective))
    }
}

#[cfg(feature = "highs")]
fn run_backend(
    unsolved: UnsolvedProblem,
    model: &MipModel,
    handles: &[Variable],
    config: &SolverConfig,
) -> Result<Vec<f64>, SolveError> {
    use good_lp::solvers::WithTimeLimit;

    let mut problem = good_lp::solvers::highs::highs(unsolved);
    if let Some(secs) = config.time_limit_secs {
        problem = problem.with_time_limit(secs);
    }
    solve_problem(problem, model, handles)
}

#[cfg(all(feature = "microlp", not(feature = "highs")))]
fn run_backend(
    unsolved: UnsolvedProblem,
    model: &MipModel,
    handles: &[Variable],
    config: &SolverConfig,
) -> Result<Vec<f64>, SolveError> {
    if let Some(secs) = config.time_limit_secs {
        log::warn!("microlp backend does not support time limits, ignoring {secs}s");
    }
    solve_problem(good_lp::solvers::microlp::microlp(unsolved), model, handles)
}

fn solve_problem<P>(mut problem: P, model: &MipModel, handles: &[Variable]) -> Result<Vec<f64>, SolveError>
where
    P: SolverModel<Error = ResolutionError>,
{
    for c in model.constraints() {
        let lhs = to_expression(&c.lhs, handles);
        let constraint = match c.relation {
            Relation::LessEq => lhs.leq(c.rhs),
            Relation::GreaterEq => lhs.geq(c.rhs),
            Relation::Equal => lhs.eq(c.rhs),
        };
        problem.add_constraint(constraint);
    }

    let solution = problem.solve().map_err(|e| match e {
        ResolutionError::Infeasible => SolveError::Infeasible,
        ResolutionError::Unbounded => SolveError::Unbounded,
        other => SolveError::Backend(other.to_string()),
    })?;

    Ok(handles.iter().map(|v| solution.value(*v)).collect())
}

fn to_expression(expr: &LinExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant_part());
    for (var, coef) in expr.terms() {
        if coef != 0.0 {
            out += coef * handles[var.index()];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knapsack() -> (MipModel, VarId, VarId, VarId) {
        // max 3x + 2y + z  s.t. x + y + z <= 2, x + z <= 1, all binary
        let mut m = MipModel::new("knapsack");
        let x = m.add_binary("x");
        let y = m.add_binary("y");
        let z = m.add_binary("z");
        m.add_constraint(
            "Capacity[all]",
            LinExpr::new().plus(x, 1.0).plus(y, 1.0).plus(z, 1.0),
            Relation::LessEq,
            2.0,
        );
        m.add_constraint(
            "Capacity[xz]",
            LinExpr::new().plus(x, 1.0).plus(z, 1.0),
            Relation::LessEq,
            1.0,
        );
        m.set_objective(
            LinExpr::new().plus(x, 3.0).plus(y, 2.0).plus(z, 1.0),
            ObjectiveSense::Maximize,
        );
        (m, x, y, z)
    }

    #[test]
    fn test_solve_binary_model() {
        let (m, x, y, z) = knapsack();
        let sol = GoodLpSolver::new().solve(&m, &SolverConfig::default()).unwrap();

        assert!((sol.objective() - 5.0).abs() < 1e-6);
        assert!((sol.value(x) - 1.0).abs() < 1e-6);
        assert!((sol.value(y) - 1.0).abs() < 1e-6);
        assert!(sol.value(z).abs() < 1e-6);
    }

    #[test]
    fn test_slacks_by_pattern() {
        let (m, ..) = knapsack();
        let sol = GoodLpSolver::new().solve(&m, &SolverConfig::default()).unwrap();

        let slacks = sol.slacks_matching(&m, "Capacity*");
        assert_eq!(slacks.len(), 2);
        assert_eq!(slacks[0].0, "Capacity[all]");
        assert!(slacks.iter().all(|(_, s)| s.abs() < 1e-6));
    }

    #[test]
    fn test_continuous_bounds_and_equality() {
        let mut m = MipModel::new("bounds");
        let d = m.add_continuous("d", 0.2, 1.0);
        let e = m.add_continuous("e", 0.2, 1.0);
        m.add_constraint("fix", LinExpr::new().plus(d, 1.0), Relation::Equal, 0.4);
        m.add_constraint(
            "link",
            LinExpr::new().plus(e, 1.0).plus(d, -1.0),
            Relation::LessEq,
            0.25,
        );
        m.set_objective(LinExpr::new().plus(e, 1.0), ObjectiveSense::Maximize);

        let sol = GoodLpSolver::new().solve(&m, &SolverConfig::default()).unwrap();
        assert!((sol.value(d) - 0.4).abs() < 1e-6);
        assert!((sol.value(e) - 0.65).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible_model() {
        let mut m = MipModel::new("infeasible");
        let x = m.add_continuous("x", 0.0, 1.0);
        m.add_constraint("low", LinExpr::new().plus(x, 1.0), Relation::GreaterEq, 2.0);
        m.set_objective(LinExpr::new().plus(x, 1.0), ObjectiveSense::Maximize);

        let err = GoodLpSolver::new()
            .solve(&m, &SolverConfig::default())
            .unwrap_err();
        assert_eq!(err, SolveError::Infeasible);
    }

    #[test]
    fn test_empty_model() {
        let m = MipModel::new("empty");
        let sol = GoodLpSolver::new().solve(&m, &SolverConfig::default()).unwrap();
        assert!(sol.values().is_empty());
        assert_eq!(sol.objective(), 0.0);
    }
}
