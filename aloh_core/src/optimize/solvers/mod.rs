//! Solver backends for [`Problem`]s
//!
//! Every backend implements [`Solver`], so the planning layer only ever sees a
//! [`ProblemSolution`].
use thiserror::Error;

use crate::configuration::{Configuration, SolverBackend};
use crate::optimize::problem::Problem;
use crate::optimize::ProblemSolution;

pub mod clarabel;
#[cfg(feature = "highs")]
pub mod highs;
#[cfg(feature = "minilp")]
pub mod microlp;

/// A linear programming backend
pub trait Solver {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Solve `problem`, returning the status and, when available, the variable values
    ///
    /// A definitive verdict (optimal, infeasible, unbounded, halted) is reported through
    /// [`ProblemSolution::status`]; `Err` is reserved for the backend failing to run at all.
    fn solve(&self, problem: &Problem) -> Result<ProblemSolution, SolverError>;
}

/// Errors raised by a backend before it reaches a verdict
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The requested backend was not compiled in
    #[error("solver backend `{0}` is not enabled in this build")]
    BackendUnavailable(&'static str),
    /// The backend rejected its settings
    #[error("invalid solver settings: {0}")]
    InvalidSettings(String),
    /// The backend failed internally
    #[error("solver backend failed: {0}")]
    Backend(String),
}

/// Create the backend selected by `configuration`
pub fn from_configuration(configuration: &Configuration) -> Result<Box<dyn Solver>, SolverError> {
    let time_limit = configuration.time_limit.map(|limit| limit.as_secs_f64());
    match configuration.solver {
        SolverBackend::Clarabel => Ok(Box::new(clarabel::ClarabelSolver::new(
            time_limit,
            configuration.verbose,
        ))),
        SolverBackend::Highs => highs_backend(time_limit, configuration.verbose),
        SolverBackend::Microlp => microlp_backend(time_limit, configuration.verbose),
    }
}

#[cfg(feature = "highs")]
fn highs_backend(time_limit: Option<f64>, verbose: bool) -> Result<Box<dyn Solver>, SolverError> {
    Ok(Box::new(highs::HighsSolver::new(time_limit, verbose)))
}

#[cfg(not(feature = "highs"))]
fn highs_backend(
    _time_limit: Option<f64>,
    _verbose: bool,
) -> Result<Box<dyn Solver>, SolverError> {
    Err(SolverError::BackendUnavailable("highs"))
}

#[cfg(feature = "minilp")]
fn microlp_backend(
    time_limit: Option<f64>,
    _verbose: bool,
) -> Result<Box<dyn Solver>, SolverError> {
    if time_limit.is_some() {
        tracing::warn!("microlp does not support a time limit, ignoring it");
    }
    Ok(Box::new(microlp::MicrolpSolver::new()))
}

#[cfg(not(feature = "minilp"))]
fn microlp_backend(
    _time_limit: Option<f64>,
    _verbose: bool,
) -> Result<Box<dyn Solver>, SolverError> {
    Err(SolverError::BackendUnavailable("microlp"))
}
