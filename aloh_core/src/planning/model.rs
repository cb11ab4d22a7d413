//! This module provides the OptModel struct, the entry point of a planning run
use crate::catalog::catalog::Catalog;
use crate::catalog::product::Product;
use crate::catalog::requirements::RequirementGraph;
use crate::configuration::Configuration;
use crate::optimize::solvers::{self, Solver};
use crate::optimize::{OptimizationStatus, ProblemSolution};
use crate::planning::builder::{ConstraintBuilder, PlanningProblem};
use crate::planning::objective::{least_activity_problem, set_profit_objective};
use crate::planning::plan::Plan;
use crate::planning::projector::Projector;
use crate::planning::{EvaluationError, SolverFailureKind};

/// Balance residuals and constraint violations above this are logged as a warning
const RESIDUAL_WARNING: f64 = 1e-6;

/// A named catalog together with the settings used to plan it
///
/// # Examples
/// ```rust
/// use aloh_core::catalog::{Catalog, ProductBuilder};
/// use aloh_core::configuration::Configuration;
/// use aloh_core::planning::OptModel;
///
/// let mut product = ProductBuilder::default()
///     .id("A")
///     .capacity(10.)
///     .unit_cost(0.1)
///     .build()
///     .unwrap();
/// product.add_order(0, 1., 0.2);
/// let catalog = Catalog::new(vec![product]).unwrap();
/// let model = OptModel::new("bakery", catalog, Configuration::default());
/// let plan = model.evaluate().unwrap();
/// assert!((plan.accepted_orders()["A"][0] - 1.).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OptModel {
    name: String,
    catalog: Catalog,
    configuration: Configuration,
}

impl OptModel {
    /// Create a new model
    pub fn new(name: &str, catalog: Catalog, configuration: Configuration) -> Self {
        Self {
            name: name.to_string(),
            catalog,
            configuration,
        }
    }

    /// Validate `products` into a catalog and create a model over it
    pub fn from_products(
        name: &str,
        products: Vec<Product>,
        configuration: Configuration,
    ) -> Result<Self, EvaluationError> {
        Ok(Self::new(name, Catalog::new(products)?, configuration))
    }

    /// Create a model with default settings and the given inventory holding penalty
    pub fn with_inventory_weight(name: &str, catalog: Catalog, inventory_weight: f64) -> Self {
        Self::new(
            name,
            catalog,
            Configuration::default().with_inventory_weight(inventory_weight),
        )
    }

    /// Name of the model
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Products being planned
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Settings of the model
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Number of days planned, the latest order day plus one, extended to the configured
    /// minimum horizon
    pub fn horizon(&self) -> usize {
        self.catalog
            .horizon()
            .max(self.configuration.horizon_days.unwrap_or(0))
    }

    /// Compute the most profitable plan with the configured backend
    pub fn evaluate(&self) -> Result<Plan, EvaluationError> {
        let graph = self.resolve()?;
        let solver = solvers::from_configuration(&self.configuration)?;
        self.run(&graph, solver.as_ref())
    }

    /// Compute the most profitable plan with `solver`
    pub fn evaluate_with(&self, solver: &dyn Solver) -> Result<Plan, EvaluationError> {
        let graph = self.resolve()?;
        self.run(&graph, solver)
    }

    /// Checks that have to pass before anything is handed to a solver
    fn resolve(&self) -> Result<RequirementGraph, EvaluationError> {
        self.configuration.validate()?;
        Ok(self.catalog.requirement_graph()?)
    }

    fn run(&self, graph: &RequirementGraph, solver: &dyn Solver) -> Result<Plan, EvaluationError> {
        let horizon = self.horizon();
        tracing::info!(
            "evaluating model `{}`: {} products over {} days",
            self.name,
            self.catalog.len(),
            horizon
        );
        if horizon == 0 {
            tracing::debug!("no orders and no configured horizon, nothing to solve");
            return Ok(Plan::idle(&self.name, &self.catalog, 0));
        }

        let mut planning = ConstraintBuilder::new(&self.catalog, graph, horizon).build()?;
        set_profit_objective(
            &mut planning,
            &self.catalog,
            self.configuration.inventory_weight,
        )?;

        tracing::debug!("solving with {}", solver.name());
        let solution = solver.solve(&planning.problem)?;
        self.check_status(&solution, &planning)?;
        let solution = if self.configuration.least_activity {
            self.least_activity(&planning, solver, solution)?
        } else {
            solution
        };
        if let Some(values) = solution.dense_values(&planning.problem) {
            let violation = planning.problem.max_violation(&values);
            if violation > RESIDUAL_WARNING {
                tracing::warn!("solved values violate the problem by up to {violation}");
            }
        }

        let plan = Projector::new(&planning, &solution, self.configuration.tolerance)
            .project(&self.name, &self.catalog)?;
        let residual = plan.max_balance_residual(graph);
        if residual > RESIDUAL_WARNING {
            tracing::warn!("plan violates material balance by up to {residual}");
        }
        tracing::info!(
            "model `{}` evaluated, objective value {}",
            self.name,
            plan.objective_value
        );
        Ok(plan)
    }

    /// Re-solve for the least production and inventory without giving up profit
    ///
    /// Keeps `solution` when it has no values or the second solve doesn't reach an optimum.
    fn least_activity(
        &self,
        planning: &PlanningProblem,
        solver: &dyn Solver,
        solution: ProblemSolution,
    ) -> Result<ProblemSolution, EvaluationError> {
        let Some(values) = solution.dense_values(&planning.problem) else {
            return Ok(solution);
        };
        let problem = least_activity_problem(
            planning,
            &self.catalog,
            &values,
            self.configuration.inventory_weight,
            self.configuration.tolerance,
        )?;
        tracing::debug!("solving for the least active plan with {}", solver.name());
        let settled = match solver.solve(&problem) {
            Ok(settled) => settled,
            Err(err) => {
                tracing::warn!("least activity solve failed, keeping the first plan: {err}");
                return Ok(solution);
            }
        };
        match settled.status {
            OptimizationStatus::Optimal | OptimizationStatus::AlmostOptimal => {}
            status => {
                tracing::warn!("least activity solve ended {status:?}, keeping the first plan");
                return Ok(solution);
            }
        }
        match settled.dense_values(&problem) {
            // same variables, so the profit is read off the original problem
            Some(values) => Ok(ProblemSolution::with_values(
                &planning.problem,
                settled.status,
                values,
            )),
            None => {
                tracing::warn!("least activity solve returned no values, keeping the first plan");
                Ok(solution)
            }
        }
    }

    fn check_status(
        &self,
        solution: &ProblemSolution,
        planning: &PlanningProblem,
    ) -> Result<(), EvaluationError> {
        let failure = |kind, message: &str| EvaluationError::SolverFailure {
            kind,
            message: message.to_string(),
        };
        match solution.status {
            OptimizationStatus::Optimal => Ok(()),
            OptimizationStatus::AlmostOptimal => {
                tracing::warn!("solver reached reduced accuracy only, using its solution");
                Ok(())
            }
            OptimizationStatus::Infeasible => Err(EvaluationError::Infeasible {
                model: self.name.clone(),
                constraint_classes: planning.constraint_classes(),
            }),
            OptimizationStatus::Unbounded => Err(failure(
                SolverFailureKind::Unbounded,
                "objective is unbounded",
            )),
            OptimizationStatus::NumericalError => Err(failure(
                SolverFailureKind::Numerical,
                "solver ran into numerical trouble",
            )),
            OptimizationStatus::SolverHalted => Err(failure(
                SolverFailureKind::Numerical,
                "solver stopped before converging",
            )),
            OptimizationStatus::TimeLimit => Err(failure(
                SolverFailureKind::Timeout,
                "time limit reached",
            )),
        }
    }
}
