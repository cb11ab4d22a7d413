//! Module for constructing and solving linear optimization problems

pub mod constraint;
pub mod objective;
pub mod problem;
pub mod solvers;
pub mod variable;

use indexmap::IndexMap;

use crate::optimize::problem::Problem;

/// Struct representing the solution to an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemSolution {
    /// The status of the optimization problem, representing if the optimization was
    /// completed successfully
    pub status: OptimizationStatus,
    /// Optimized value of the objective
    ///
    /// Some(f64) if the optimization was completed successfully, None otherwise
    pub objective_value: Option<f64>,
    /// Values of the variables at the optimum,
    ///
    /// Some(IndexMap), keyed by variable id, with values corresponding to variable
    /// values at optimum if the problem could be solved, None otherwise
    pub variable_values: Option<IndexMap<String, f64>>,
}

impl ProblemSolution {
    /// Solution carrying a dense assignment, ordered by variable index
    pub fn with_values(problem: &Problem, status: OptimizationStatus, values: Vec<f64>) -> Self {
        let objective_value = problem.objective_value(&values);
        let variable_values = problem
            .variables()
            .zip(values)
            .map(|(var, value)| (var.id.clone(), value))
            .collect();
        Self {
            status,
            objective_value: Some(objective_value),
            variable_values: Some(variable_values),
        }
    }

    /// Solution without an assignment, for failed solves
    pub fn without_values(status: OptimizationStatus) -> Self {
        Self {
            status,
            objective_value: None,
            variable_values: None,
        }
    }

    /// Value of the variable `id`, if the solve produced values
    pub fn value(&self, id: &str) -> Option<f64> {
        self.variable_values
            .as_ref()
            .and_then(|values| values.get(id).copied())
    }

    /// Values ordered by variable index, None if any variable of `problem` has no value
    pub fn dense_values(&self, problem: &Problem) -> Option<Vec<f64>> {
        problem.variables().map(|var| self.value(&var.id)).collect()
    }
}

/// Status of an optimization problem
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OptimizationStatus {
    /// Problem has been optimized
    Optimal,
    /// An approximate solution has been found
    AlmostOptimal,
    /// Problem can't be optimized because objective value is not bounded
    Unbounded,
    /// Problem can't be solved because it is infeasible (conflicting constraints)
    Infeasible,
    /// A numerical error occurred during solving
    NumericalError,
    /// The solver hit the configured time limit
    TimeLimit,
    /// The solver hit the maximum allowed iterations, or made insufficient progress
    SolverHalted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::variable::VariableBuilder;

    #[test]
    fn dense_values_follow_variable_order() {
        let mut problem = Problem::new_maximization();
        for id in ["x", "y"] {
            problem
                .add_variable(VariableBuilder::default().id(id).build().unwrap())
                .unwrap();
        }
        problem.add_new_linear_objective_term(1, 2.).unwrap();
        let solution =
            ProblemSolution::with_values(&problem, OptimizationStatus::Optimal, vec![3., 4.]);
        assert_eq!(solution.objective_value, Some(8.));
        assert_eq!(solution.dense_values(&problem), Some(vec![3., 4.]));

        let mut partial = solution.clone();
        if let Some(values) = partial.variable_values.as_mut() {
            values.shift_remove("x");
        }
        assert_eq!(partial.dense_values(&problem), None);
        let failed = ProblemSolution::without_values(OptimizationStatus::Infeasible);
        assert_eq!(failed.dense_values(&problem), None);
    }
}
