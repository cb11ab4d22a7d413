//! Implements a solver interface for HiGHS
use ::highs::{HighsModelStatus, RowProblem, Sense};

use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// HiGHS backend, requires the highs feature
#[derive(Clone, Debug, Default)]
pub struct HighsSolver {
    /// Wall clock limit in seconds
    time_limit: Option<f64>,
    /// Print solver progress
    verbose: bool,
}

impl HighsSolver {
    /// Create a new HiGHS backend
    pub fn new(time_limit: Option<f64>, verbose: bool) -> Self {
        Self {
            time_limit,
            verbose,
        }
    }
}

impl Solver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve(&self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        let mut pb = RowProblem::default();
        let coefficients = problem.objective().coefficients(problem.num_variables());
        let columns: Vec<_> = problem
            .variables()
            .zip(&coefficients)
            .map(|(var, coef)| pb.add_column(*coef, var.lower_bound..=var.upper_bound))
            .collect();
        for cons in problem.constraints() {
            let (lower, upper) = cons.bounds();
            let factors: Vec<_> = cons
                .terms()
                .iter()
                .map(|t| (columns[t.variable], t.coefficient))
                .collect();
            pb.add_row(lower..=upper, factors);
        }

        let sense = match problem.objective().sense() {
            ObjectiveSense::Maximize => Sense::Maximise,
            ObjectiveSense::Minimize => Sense::Minimise,
        };
        let mut model = pb.optimise(sense);
        model.set_option("output_flag", self.verbose);
        if let Some(limit) = self.time_limit {
            model.set_option("time_limit", limit);
        }
        let solved = model.solve();

        let status = match solved.status() {
            HighsModelStatus::Optimal => OptimizationStatus::Optimal,
            HighsModelStatus::Infeasible => OptimizationStatus::Infeasible,
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                OptimizationStatus::Unbounded
            }
            HighsModelStatus::ReachedTimeLimit => OptimizationStatus::TimeLimit,
            HighsModelStatus::ReachedIterationLimit => OptimizationStatus::SolverHalted,
            other => {
                return Err(SolverError::Backend(format!(
                    "HiGHS finished with status {:?}",
                    other
                )))
            }
        };
        Ok(match status {
            OptimizationStatus::Optimal => {
                let values = solved.get_solution().columns().to_vec();
                ProblemSolution::with_values(problem, status, values)
            }
            _ => ProblemSolution::without_values(status),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::solvers::tests::{check_small_problem, infeasible_problem};

    #[test]
    fn small_problem() {
        check_small_problem(&HighsSolver::default());
    }

    #[test]
    fn infeasible() {
        let solution = HighsSolver::default().solve(&infeasible_problem()).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Infeasible);
    }
}
