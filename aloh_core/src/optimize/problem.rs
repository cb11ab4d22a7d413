//! Provides struct representing an optimization problem
use indexmap::IndexMap;
use thiserror::Error;

use crate::optimize::constraint::Constraint;
use crate::optimize::objective::{Objective, ObjectiveSense, ObjectiveTerm};
use crate::optimize::variable::{Variable, VariableBuilder};

/// A linear optimization problem, independent of any solver backend
#[derive(Debug, Clone)]
pub struct Problem {
    /// Objective to optimize
    objective: Objective,
    /// Variables of the optimization problem, position in the map is the variable index
    variables: IndexMap<String, Variable>,
    /// Constraints of the optimization problem
    constraints: IndexMap<String, Constraint>,
}

impl Problem {
    // region Creation Functions
    /// Create a new optimization problem
    pub fn new(objective_sense: ObjectiveSense) -> Self {
        Self {
            objective: Objective::new(objective_sense),
            variables: IndexMap::new(),
            constraints: IndexMap::new(),
        }
    }

    /// Create a new maximization problem
    pub fn new_maximization() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new minimization problem
    pub fn new_minimization() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }
    // endregion Creation Functions

    // region Accessors
    /// Objective of the problem
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Variables of the problem, in index order
    pub fn variables(&self) -> impl ExactSizeIterator<Item = &Variable> {
        self.variables.values()
    }

    /// Variable at `index`
    pub fn variable(&self, index: usize) -> Option<&Variable> {
        self.variables.get_index(index).map(|(_, var)| var)
    }

    /// Index of the variable with id `id`
    pub fn variable_index(&self, id: &str) -> Option<usize> {
        self.variables.get_index_of(id)
    }

    /// Constraints of the problem, in insertion order
    pub fn constraints(&self) -> impl ExactSizeIterator<Item = &Constraint> {
        self.constraints.values()
    }

    /// Constraint with id `id`
    pub fn constraint(&self, id: &str) -> Option<&Constraint> {
        self.constraints.get(id)
    }

    /// Current number of variables
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Current number of constraints
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
    // endregion Accessors

    // region Update Objective Sense
    /// Update the objective sense of the problem
    pub fn update_objective_sense(&mut self, sense: ObjectiveSense) {
        self.objective.set_sense(sense);
    }
    // endregion Update Objective Sense

    // region Adding Variables
    /// Add a variable to the optimization problem, returning its index
    pub fn add_variable(&mut self, mut variable: Variable) -> Result<usize, ProblemError> {
        self.validate_variable(&variable)?;
        let index = self.variables.len();
        variable.index = index;
        self.variables.insert(variable.id.clone(), variable);
        Ok(index)
    }

    /// Create a new continuous variable and add it to the optimization problem
    pub fn add_new_variable(
        &mut self,
        id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<usize, ProblemError> {
        let variable = VariableBuilder::default()
            .id(id)
            .lower_bound(lower_bound)
            .upper_bound(upper_bound)
            .build()
            .map_err(|_| ProblemError::InvalidVariableBounds(id.to_string()))?;
        self.add_variable(variable)
    }
    // endregion Adding Variables

    // region Adding Constraints
    /// Add a constraint to the problem
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), ProblemError> {
        self.validate_constraint(&constraint)?;
        self.constraints
            .insert(constraint.get_id().to_string(), constraint);
        Ok(())
    }

    /// Create a new equality constraint over variable indices and add it to the problem
    pub fn add_new_equality_constraint(
        &mut self,
        id: &str,
        terms: &[(usize, f64)],
        equals: f64,
    ) -> Result<(), ProblemError> {
        self.add_constraint(Constraint::new_equality(id, terms, equals))
    }

    /// Create a new inequality constraint over variable indices and add it to the problem
    pub fn add_new_inequality_constraint(
        &mut self,
        id: &str,
        terms: &[(usize, f64)],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        self.add_constraint(Constraint::new_inequality(
            id,
            terms,
            lower_bound,
            upper_bound,
        ))
    }

    // endregion Adding Constraints

    // region Adding Objective Terms
    /// Add a new linear term to the objective
    pub fn add_new_linear_objective_term(
        &mut self,
        variable: usize,
        coefficient: f64,
    ) -> Result<(), ProblemError> {
        if variable >= self.variables.len() {
            return Err(ProblemError::NonExistentVariablesInObjective);
        }
        if !coefficient.is_finite() {
            return Err(ProblemError::NonFiniteCoefficient(format!("objective x{}", variable)));
        }
        self.objective
            .add_term(ObjectiveTerm::new(variable, coefficient));
        Ok(())
    }

    /// Remove all terms from the objective
    pub fn remove_all_objective_terms(&mut self) {
        self.objective.remove_all_terms();
    }
    // endregion Adding Objective Terms

    // region Evaluation
    /// Objective value of a dense assignment
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.value(values)
    }

    /// Largest bound or constraint violation of a dense assignment
    pub fn max_violation(&self, values: &[f64]) -> f64 {
        let bound_violation = self
            .variables
            .values()
            .map(|var| {
                let value = values[var.index];
                (var.lower_bound - value).max(value - var.upper_bound).max(0.)
            })
            .fold(0., f64::max);
        self.constraints
            .values()
            .map(|cons| cons.violation(values))
            .fold(bound_violation, f64::max)
    }
    // endregion Evaluation

    // region Validation Functions
    /// Check that a variable to be added is valid to add to this problem
    fn validate_variable(&self, variable: &Variable) -> Result<(), ProblemError> {
        if self.variables.contains_key(&variable.id) {
            return Err(ProblemError::VariableIdAlreadyExists(variable.id.clone()));
        }
        if variable.lower_bound.is_nan()
            || variable.upper_bound.is_nan()
            || variable.lower_bound > variable.upper_bound
        {
            return Err(ProblemError::InvalidVariableBounds(variable.id.clone()));
        }
        Ok(())
    }

    /// Check that a constraint to be added is valid to add to this Problem
    fn validate_constraint(&self, constraint: &Constraint) -> Result<(), ProblemError> {
        let id = constraint.get_id();
        if self.constraints.contains_key(id) {
            return Err(ProblemError::ConstraintAlreadyExists(id.to_string()));
        }
        let (lower_bound, upper_bound) = constraint.bounds();
        if lower_bound.is_nan() || upper_bound.is_nan() || lower_bound > upper_bound {
            return Err(ProblemError::InvalidConstraintBounds(id.to_string()));
        }
        for term in constraint.terms() {
            if term.variable >= self.variables.len() {
                return Err(ProblemError::NonExistentVariablesInConstraint(id.to_string()));
            }
            if !term.coefficient.is_finite() {
                return Err(ProblemError::NonFiniteCoefficient(id.to_string()));
            }
        }
        Ok(())
    }
    // endregion Validation Functions
}

/// Errors associated with the Problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// Error when trying to add a variable with the same id as an existing variable
    #[error("Tried to add variable `{0}` with the same id as an existing variable")]
    VariableIdAlreadyExists(String),
    /// Error when trying to add variable with invalid bounds
    #[error("Tried to add variable `{0}` with lower_bound > upper_bound")]
    InvalidVariableBounds(String),
    /// Error when trying to add a constraint with the same id as an existing constraint
    #[error("Tried to add constraint `{0}` with the same id as an existing constraint")]
    ConstraintAlreadyExists(String),
    /// Error when trying to add a constraint with invalid bounds
    #[error("Tried to add inequality constraint `{0}` with lower_bound > upper_bound")]
    InvalidConstraintBounds(String),
    /// Error when trying to add a constraint that contains variables not in the model
    #[error("Tried to add constraint `{0}` with variables not in the model")]
    NonExistentVariablesInConstraint(String),
    /// Error when a coefficient is NaN or infinite
    #[error("Non finite coefficient in `{0}`")]
    NonFiniteCoefficient(String),
    /// Error when trying to add an objective term which includes variables not in the model
    #[error("Tried adding an objective term with variables not in the model")]
    NonExistentVariablesInObjective,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_problem() {
        let max_problem = Problem::new_maximization();
        assert_eq!(max_problem.objective.sense(), ObjectiveSense::Maximize);

        let min_problem = Problem::new_minimization();
        assert_eq!(min_problem.objective.sense(), ObjectiveSense::Minimize);
    }

    #[test]
    fn update_objective_sense() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.update_objective_sense(ObjectiveSense::Minimize);
        assert_eq!(problem.objective.sense(), ObjectiveSense::Minimize);
    }

    #[test]
    fn add_variables() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);

        let x = problem.add_new_variable("x", 64., 100.).unwrap();
        let y = problem.add_new_variable("y", 0., f64::INFINITY).unwrap();
        assert_eq!((x, y), (0, 1));
        let var = problem.variable(1).unwrap();
        assert_eq!(var.id, "y");
        assert_eq!(var.index(), 1);
        assert_eq!(problem.variable_index("x"), Some(0));
        assert_eq!(problem.num_variables(), 2);
    }

    #[test]
    fn add_bad_variable() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);

        let res = problem.add_new_variable("x", 100., 64.);
        assert_eq!(res, Err(ProblemError::InvalidVariableBounds("x".to_string())));

        problem.add_new_variable("x", 0., 1.).unwrap();
        let res = problem.add_new_variable("x", 0., 1.);
        assert_eq!(res, Err(ProblemError::VariableIdAlreadyExists("x".to_string())));
    }

    #[test]
    fn add_constraint() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.add_new_variable("x", 64., 100.).unwrap();
        problem.add_new_variable("y", 64., 100.).unwrap();

        problem
            .add_new_equality_constraint("eq", &[(0, 2.), (1, 3.)], 200.)
            .unwrap();
        match problem.constraint("eq").unwrap() {
            Constraint::Equality { equals, .. } => assert!((equals - 200.).abs() < 1e-25),
            Constraint::Inequality { .. } => panic!("Incorrect constraint type added"),
        }

        problem
            .add_new_inequality_constraint("ineq", &[(0, 2.), (1, 3.)], 100., 200.)
            .unwrap();
        assert_eq!(problem.constraint("ineq").unwrap().bounds(), (100., 200.));

        let res = problem.add_new_equality_constraint("eq", &[(0, 1.)], 0.);
        assert_eq!(res, Err(ProblemError::ConstraintAlreadyExists("eq".to_string())));
        assert_eq!(problem.num_constraints(), 2);
    }

    #[test]
    fn add_bad_constraint() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.add_new_variable("x", 64., 100.).unwrap();

        let res = problem.add_new_inequality_constraint("bad", &[(0, 2.)], 200., 100.);
        assert_eq!(res, Err(ProblemError::InvalidConstraintBounds("bad".to_string())));

        let res = problem.add_new_equality_constraint("index", &[(4, 1.)], 0.);
        assert_eq!(
            res,
            Err(ProblemError::NonExistentVariablesInConstraint("index".to_string()))
        );
    }

    #[test]
    fn violation_and_objective() {
        let mut problem = Problem::new_maximization();
        let x = problem.add_new_variable("x", 0., 2.).unwrap();
        let y = problem.add_new_variable("y", 0., 2.).unwrap();
        problem
            .add_new_equality_constraint("sum", &[(x, 1.), (y, 1.)], 3.)
            .unwrap();
        problem.add_new_linear_objective_term(x, 2.).unwrap();
        problem.add_new_linear_objective_term(y, 1.).unwrap();

        assert!((problem.objective_value(&[2., 1.]) - 5.).abs() < 1e-12);
        assert_eq!(problem.max_violation(&[2., 1.]), 0.);
        assert!((problem.max_violation(&[3., 1.]) - 1.).abs() < 1e-12);
        assert_eq!(
            problem.add_new_linear_objective_term(7, 1.),
            Err(ProblemError::NonExistentVariablesInObjective)
        );
    }
}
