//! Mixed-integer linear programming layer.
//!
//! Separates *what* is solved from *how*:
//!
//! - **`MipModel`**: variables, named linear constraints, and one linear
//!   objective, with no dependency on a solver library.
//! - **`MipSolver`**: the solving seam. `GoodLpSolver` is the shipped
//!   implementation.
//!
//! # Reference
//! - Wolsey (2020), "Integer Programming", 2nd ed., Ch. 1
//! - Nemhauser & Wolsey (1988), "Integer and Combinatorial Optimization"

mod model;
mod solver;

pub use model::{
    LinExpr, LinearConstraint, MipModel, ObjectiveSense, Relation, VarDef, VarDomain, VarId,
};
pub use solver::{GoodLpSolver, MipSolution, MipSolver};
