//! Reads a solver assignment back into a [`Plan`]
use indexmap::IndexMap;

use crate::catalog::catalog::Catalog;
use crate::optimize::ProblemSolution;
use crate::planning::builder::PlanningProblem;
use crate::planning::plan::Plan;
use crate::planning::{EvaluationError, SolverFailureKind};

/// Projects solved variable values onto products and days
pub struct Projector<'a> {
    planning: &'a PlanningProblem,
    solution: &'a ProblemSolution,
    tolerance: f64,
    /// Values moved back into their bounds by more than the tolerance
    clamped: usize,
}

impl<'a> Projector<'a> {
    /// Create a projector rounding values within `tolerance` of a bound onto it
    pub fn new(
        planning: &'a PlanningProblem,
        solution: &'a ProblemSolution,
        tolerance: f64,
    ) -> Self {
        Self {
            planning,
            solution,
            tolerance,
            clamped: 0,
        }
    }

    /// Build the plan of `catalog` from the solution
    pub fn project(mut self, model_name: &str, catalog: &Catalog) -> Result<Plan, EvaluationError> {
        if self.solution.variable_values.is_none() {
            return Err(EvaluationError::SolverFailure {
                kind: SolverFailureKind::Numerical,
                message: format!("solver reported {:?} without values", self.solution.status),
            });
        }
        let planning = self.planning;
        let horizon = planning.horizon;
        let mut plan = Plan::idle(model_name, catalog, horizon);
        plan.objective_value = self.solution.objective_value.unwrap_or(0.);

        for (product, vars) in catalog.products().zip(&planning.variables) {
            let mut accepted = vec![0.; horizon];
            let mut by_order = vec![0.; product.orders.len()];
            let mut production = Vec::with_capacity(horizon);
            let mut inventory = Vec::with_capacity(horizon);
            for d in 0..horizon {
                for &(k, var) in &vars.accept[d] {
                    let value = self.value(var)?;
                    by_order[k] = value;
                    accepted[d] += value;
                }
                production.push(self.value(vars.produce[d])?);
                inventory.push(self.value(vars.inventory[d])?);
            }
            Self::store(&mut plan.accepted, &product.id, accepted);
            Self::store(&mut plan.accepted_by_order, &product.id, by_order);
            Self::store(&mut plan.production, &product.id, production);
            Self::store(&mut plan.inventory, &product.id, inventory);
        }

        if self.clamped > 0 {
            tracing::warn!(
                "{} solved values were outside their bounds by more than {}",
                self.clamped,
                self.tolerance
            );
        }
        Ok(plan)
    }

    fn store(map: &mut IndexMap<String, Vec<f64>>, id: &str, values: Vec<f64>) {
        if let Some(entry) = map.get_mut(id) {
            *entry = values;
        }
    }

    /// Solved value of the variable at `index`, snapped onto its bounds and cleaned of noise
    fn value(&mut self, index: usize) -> Result<f64, EvaluationError> {
        let variable = self.planning.problem.variable(index).ok_or_else(|| {
            EvaluationError::SolverFailure {
                kind: SolverFailureKind::Numerical,
                message: format!("no variable at position {index}"),
            }
        })?;
        let raw = self.solution.value(&variable.id).ok_or_else(|| {
            EvaluationError::SolverFailure {
                kind: SolverFailureKind::Numerical,
                message: format!("solver returned no value for `{}`", variable.id),
            }
        })?;
        if (variable.clamp(raw) - raw).abs() > self.tolerance {
            self.clamped += 1;
        }
        let value = variable.snap(raw, self.tolerance);
        if value.abs() < self.tolerance {
            Ok(0.)
        } else {
            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::product::Product;
    use crate::optimize::OptimizationStatus;
    use crate::planning::builder::ConstraintBuilder;

    fn setup() -> (Catalog, PlanningProblem) {
        let mut a = Product::new("A");
        a.capacity = 10.;
        a.storage_days = 1;
        a.add_order(0, 1., 1.);
        a.add_order(0, 2., 2.);
        let catalog = Catalog::new(vec![a]).unwrap();
        let graph = catalog.requirement_graph().unwrap();
        let planning = ConstraintBuilder::new(&catalog, &graph, 1).build().unwrap();
        (catalog, planning)
    }

    #[test]
    fn sums_orders_and_cleans_noise() {
        let (catalog, planning) = setup();
        // accept[0][0], accept[0][1], produce[0], inventory[0]
        let values = vec![1. + 1e-12, 2., 3.000_000_1, -1e-12];
        let solution =
            ProblemSolution::with_values(&planning.problem, OptimizationStatus::Optimal, values);
        let plan = Projector::new(&planning, &solution, 1e-9)
            .project("m", &catalog)
            .unwrap();
        assert_eq!(plan.accepted_by_order["A"], vec![1., 2.]);
        assert_eq!(plan.accepted["A"], vec![3.]);
        assert_eq!(plan.production["A"], vec![3.000_000_1]);
        assert_eq!(plan.inventory["A"], vec![0.]);
        assert_eq!(plan.horizon, 1);
    }

    #[test]
    fn small_magnitudes_become_zero() {
        let (catalog, planning) = setup();
        let values = vec![1e-7, 0., 1e-7, 0.];
        let solution =
            ProblemSolution::with_values(&planning.problem, OptimizationStatus::Optimal, values);
        let plan = Projector::new(&planning, &solution, 1e-6)
            .project("m", &catalog)
            .unwrap();
        assert_eq!(plan.accepted["A"], vec![0.]);
        assert_eq!(plan.production["A"], vec![0.]);
    }

    #[test]
    fn values_near_a_bound_land_on_it() {
        let (catalog, planning) = setup();
        let values = vec![1. - 4e-10, 2. - 8e-10, 3. - 1e-9, 9e-10];
        let solution =
            ProblemSolution::with_values(&planning.problem, OptimizationStatus::Optimal, values);
        let plan = Projector::new(&planning, &solution, 1e-9)
            .project("m", &catalog)
            .unwrap();
        assert_eq!(plan.accepted_by_order["A"], vec![1., 2.]);
        // 3 is not a bound of the production variable
        assert_eq!(plan.production["A"], vec![3. - 1e-9]);
        assert_eq!(plan.inventory["A"], vec![0.]);
    }

    #[test]
    fn value_missing_for_one_variable_is_a_failure() {
        let (catalog, planning) = setup();
        let mut values: IndexMap<String, f64> = planning
            .problem
            .variables()
            .map(|var| (var.id.clone(), 1.))
            .collect();
        let produce = planning.problem.variable(planning.variables[0].produce[0]).unwrap();
        values.shift_remove(&produce.id);
        let solution = ProblemSolution {
            status: OptimizationStatus::Optimal,
            objective_value: Some(1.),
            variable_values: Some(values),
        };
        let err = Projector::new(&planning, &solution, 1e-9)
            .project("m", &catalog)
            .unwrap_err();
        match err {
            EvaluationError::SolverFailure { kind, message } => {
                assert_eq!(kind, SolverFailureKind::Numerical);
                assert!(message.contains(&produce.id));
            }
            other => panic!("expected a solver failure, got {other:?}"),
        }
    }

    #[test]
    fn missing_values_are_a_failure() {
        let (catalog, planning) = setup();
        let solution = ProblemSolution::without_values(OptimizationStatus::Optimal);
        let err = Projector::new(&planning, &solution, 1e-9)
            .project("m", &catalog)
            .unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::SolverFailure {
                kind: SolverFailureKind::Numerical,
                ..
            }
        ));
    }
}
