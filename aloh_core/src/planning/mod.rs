//! Module turning a catalog into an order acceptance and production plan

pub mod builder;
pub mod model;
pub mod objective;
pub mod plan;
pub mod projector;

use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::catalog::{CyclicDependencyError, ValidationError};
use crate::optimize::problem::ProblemError;
use crate::optimize::solvers::SolverError;

pub use model::OptModel;
pub use plan::Plan;

/// Errors returned by [`OptModel::evaluate`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// Malformed catalog or configuration
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The bill of materials contains a cycle
    #[error(transparent)]
    CyclicDependency(#[from] CyclicDependencyError),
    /// No plan satisfies every constraint
    #[error(
        "Model `{model}` is infeasible, constraint classes involved: {}",
        .constraint_classes.join(", ")
    )]
    Infeasible {
        /// Name of the model
        model: String,
        /// Constraint classes present in the problem handed to the solver
        constraint_classes: Vec<String>,
    },
    /// The solver couldn't reach an optimal or infeasible verdict
    #[error("Solver failed ({kind}): {message}")]
    SolverFailure {
        /// What went wrong
        kind: SolverFailureKind,
        /// Details reported by the backend
        message: String,
    },
    /// The linear problem couldn't be assembled
    #[error("Failed to build the linear problem: {0}")]
    Problem(#[from] ProblemError),
}

impl From<SolverError> for EvaluationError {
    fn from(err: SolverError) -> Self {
        EvaluationError::SolverFailure {
            kind: SolverFailureKind::Backend,
            message: err.to_string(),
        }
    }
}

/// Reason a solve ended without a definitive verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverFailureKind {
    /// The objective can grow without bound
    Unbounded,
    /// The backend ran into numerical trouble or stalled
    Numerical,
    /// The configured time limit was reached
    Timeout,
    /// The backend is unavailable or failed to run
    Backend,
}

impl Display for SolverFailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverFailureKind::Unbounded => write!(f, "unbounded"),
            SolverFailureKind::Numerical => write!(f, "numerical"),
            SolverFailureKind::Timeout => write!(f, "timeout"),
            SolverFailureKind::Backend => write!(f, "backend"),
        }
    }
}
