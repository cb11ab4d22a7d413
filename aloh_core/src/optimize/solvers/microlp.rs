//! Implements a solver interface for microlp, a pure rust simplex solver
use ::microlp::{ComparisonOp, OptimizationDirection};

use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Simplex backend, requires the minilp feature
#[derive(Clone, Debug, Default)]
pub struct MicrolpSolver {}

impl MicrolpSolver {
    /// Create a new microlp backend
    pub fn new() -> Self {
        Self {}
    }
}

impl Solver for MicrolpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        let direction = match problem.objective().sense() {
            ObjectiveSense::Maximize => OptimizationDirection::Maximize,
            ObjectiveSense::Minimize => OptimizationDirection::Minimize,
        };
        let mut lp = ::microlp::Problem::new(direction);
        let coefficients = problem.objective().coefficients(problem.num_variables());
        let columns: Vec<_> = problem
            .variables()
            .zip(&coefficients)
            .map(|(var, coef)| lp.add_var(*coef, (var.lower_bound, var.upper_bound)))
            .collect();

        for cons in problem.constraints() {
            let terms: Vec<_> = cons
                .terms()
                .iter()
                .map(|t| (columns[t.variable], t.coefficient))
                .collect();
            let (lower, upper) = cons.bounds();
            if lower == upper {
                lp.add_constraint(terms.as_slice(), ComparisonOp::Eq, upper);
                continue;
            }
            if upper.is_finite() {
                lp.add_constraint(terms.as_slice(), ComparisonOp::Le, upper);
            }
            if lower.is_finite() {
                lp.add_constraint(terms.as_slice(), ComparisonOp::Ge, lower);
            }
        }

        match lp.solve() {
            Ok(solution) => {
                let values = columns.iter().map(|col| solution[*col]).collect();
                Ok(ProblemSolution::with_values(
                    problem,
                    OptimizationStatus::Optimal,
                    values,
                ))
            }
            Err(::microlp::Error::Infeasible) => Ok(ProblemSolution::without_values(
                OptimizationStatus::Infeasible,
            )),
            Err(::microlp::Error::Unbounded) => Ok(ProblemSolution::without_values(
                OptimizationStatus::Unbounded,
            )),
            Err(err) => Err(SolverError::Backend(err.to_string())),
        }
    }
}
