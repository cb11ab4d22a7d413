//! Implements a solver interface for Clarabel
//!
//! Clarabel solves `min 1/2 x'Px + q'x  s.t.  Ax + s = b, s in K`. Variable bounds and
//! constraints are lowered into rows of `A`, equalities into the zero cone and one-sided
//! inequalities into the nonnegative cone. `P` is empty since every objective here is linear.
use ::clarabel::algebra::CscMatrix;
use ::clarabel::solver::*;
use nalgebra_sparse::CooMatrix;

use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Feasibility and duality gap tolerance, below the default rounding tolerance of a plan
const CONVERGENCE_TOLERANCE: f64 = 1e-10;

/// Interior point backend, always available
#[derive(Clone, Debug, Default)]
pub struct ClarabelSolver {
    /// Wall clock limit in seconds
    time_limit: Option<f64>,
    /// Print solver progress
    verbose: bool,
}

impl ClarabelSolver {
    /// Create a new Clarabel backend
    pub fn new(time_limit: Option<f64>, verbose: bool) -> Self {
        Self {
            time_limit,
            verbose,
        }
    }
}

/// Rows of `Ax + s = b` split by cone
#[derive(Default)]
struct ConicRows {
    equalities: Vec<(Vec<(usize, f64)>, f64)>,
    inequalities: Vec<(Vec<(usize, f64)>, f64)>,
}

impl ConicRows {
    fn from_problem(problem: &Problem) -> Self {
        let mut rows = ConicRows::default();
        for var in problem.variables() {
            let i = var.index();
            rows.push_range(vec![(i, 1.)], var.lower_bound, var.upper_bound);
        }
        for cons in problem.constraints() {
            let (lower, upper) = cons.bounds();
            let terms = cons
                .terms()
                .iter()
                .map(|t| (t.variable, t.coefficient))
                .collect();
            rows.push_range(terms, lower, upper);
        }
        rows
    }

    /// Add `lower <= terms <= upper`, dropping infinite sides
    fn push_range(&mut self, terms: Vec<(usize, f64)>, lower: f64, upper: f64) {
        if lower == upper {
            self.equalities.push((terms, upper));
            return;
        }
        if upper.is_finite() {
            self.inequalities.push((terms.clone(), upper));
        }
        if lower.is_finite() {
            let negated = terms.into_iter().map(|(v, c)| (v, -c)).collect();
            self.inequalities.push((negated, -lower));
        }
    }

    fn num_rows(&self) -> usize {
        self.equalities.len() + self.inequalities.len()
    }

    /// Assemble `A` and `b`, zero cone rows first
    fn assemble(&self, num_variables: usize) -> Result<(CscMatrix<f64>, Vec<f64>), SolverError> {
        let num_rows = self.num_rows();
        let mut row_indices = Vec::new();
        let mut col_indices = Vec::new();
        let mut values = Vec::new();
        let mut b = Vec::with_capacity(num_rows);
        for (row, (terms, rhs)) in self.equalities.iter().chain(&self.inequalities).enumerate() {
            for &(col, coef) in terms {
                row_indices.push(row);
                col_indices.push(col);
                values.push(coef);
            }
            b.push(*rhs);
        }
        let coo = CooMatrix::try_from_triplets(
            num_rows,
            num_variables,
            row_indices,
            col_indices,
            values,
        )
        .map_err(|err| SolverError::Backend(err.to_string()))?;
        // Conversion sorts the row indices of each column and sums duplicates
        let (col_offsets, row_indices, values) =
            nalgebra_sparse::CscMatrix::from(&coo).disassemble();
        Ok((
            CscMatrix::new(num_rows, num_variables, col_offsets, row_indices, values),
            b,
        ))
    }

    fn cones(&self) -> Vec<SupportedConeT<f64>> {
        let mut cones = Vec::with_capacity(2);
        if !self.equalities.is_empty() {
            cones.push(ZeroConeT(self.equalities.len()));
        }
        if !self.inequalities.is_empty() {
            cones.push(NonnegativeConeT(self.inequalities.len()));
        }
        cones
    }
}

impl Solver for ClarabelSolver {
    fn name(&self) -> &'static str {
        "clarabel"
    }

    fn solve(&self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        let n = problem.num_variables();
        let rows = ConicRows::from_problem(problem);
        let (a, b) = rows.assemble(n)?;
        let cones = rows.cones();
        let p = CscMatrix::new(n, n, vec![0; n + 1], Vec::new(), Vec::new());
        let mut q = problem.objective().coefficients(n);
        if problem.objective().sense() == ObjectiveSense::Maximize {
            q.iter_mut().for_each(|c| *c = -*c);
        }

        let settings = DefaultSettingsBuilder::default()
            .verbose(self.verbose)
            .time_limit(self.time_limit.unwrap_or(f64::INFINITY))
            .tol_feas(CONVERGENCE_TOLERANCE)
            .tol_gap_abs(CONVERGENCE_TOLERANCE)
            .tol_gap_rel(CONVERGENCE_TOLERANCE)
            .build()
            .map_err(|err| SolverError::InvalidSettings(err.to_string()))?;

        tracing::debug!(
            "clarabel: {} variables, {} equality rows, {} inequality rows",
            n,
            rows.equalities.len(),
            rows.inequalities.len()
        );
        let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings);
        solver.solve();

        let status = match solver.solution.status {
            SolverStatus::Solved => OptimizationStatus::Optimal,
            SolverStatus::AlmostSolved => OptimizationStatus::AlmostOptimal,
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                OptimizationStatus::Infeasible
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                OptimizationStatus::Unbounded
            }
            SolverStatus::MaxTime => OptimizationStatus::TimeLimit,
            SolverStatus::MaxIterations | SolverStatus::InsufficientProgress => {
                OptimizationStatus::SolverHalted
            }
            _ => OptimizationStatus::NumericalError,
        };
        Ok(match status {
            OptimizationStatus::Optimal | OptimizationStatus::AlmostOptimal => {
                ProblemSolution::with_values(problem, status, solver.solution.x.clone())
            }
            _ => ProblemSolution::without_values(status),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::solvers::tests::{
        check_small_problem, infeasible_problem, unbounded_problem,
    };

    #[test]
    fn small_problem() {
        check_small_problem(&ClarabelSolver::default());
    }

    #[test]
    fn infeasible() {
        let solution = ClarabelSolver::default()
            .solve(&infeasible_problem())
            .unwrap();
        assert_eq!(solution.status, OptimizationStatus::Infeasible);
        assert!(solution.variable_values.is_none());
    }

    #[test]
    fn unbounded() {
        let solution = ClarabelSolver::default()
            .solve(&unbounded_problem())
            .unwrap();
        assert_eq!(solution.status, OptimizationStatus::Unbounded);
    }

    #[test]
    fn fixed_variables_become_equalities() {
        let mut problem = Problem::new_minimization();
        problem.add_new_variable("fixed", 2., 2.).unwrap();
        problem.add_new_variable("free", 0., f64::INFINITY).unwrap();
        let rows = ConicRows::from_problem(&problem);
        assert_eq!(rows.equalities.len(), 1);
        assert_eq!(rows.inequalities.len(), 1);
        let (_, b) = rows.assemble(2).unwrap();
        assert_eq!(b, vec![2., -0.]);
    }
}
