//! Objectives of a planning problem
//!
//! A run maximizes net profit. Profit alone often leaves a whole face of optimal plans, so
//! a second problem picks the one with the least production and inventory on it.
use crate::catalog::catalog::Catalog;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::{Problem, ProblemError};
use crate::planning::builder::PlanningProblem;

/// Relative room on the operating cost of the least activity problem
const COST_SLACK: f64 = 1e-7;

/// Replace the objective of `planning` with the net profit
///
/// `sum price * accept - sum unit_cost * produce - inventory_weight * sum inventory`, to be
/// maximized. Zero coefficients are left out.
pub fn set_profit_objective(
    planning: &mut PlanningProblem,
    catalog: &Catalog,
    inventory_weight: f64,
) -> Result<(), ProblemError> {
    let problem = &mut planning.problem;
    problem.remove_all_objective_terms();
    problem.update_objective_sense(ObjectiveSense::Maximize);
    for (product, vars) in catalog.products().zip(&planning.variables) {
        for d in 0..planning.horizon {
            for &(k, var) in &vars.accept[d] {
                let price = product.orders[k].price;
                if price != 0. {
                    problem.add_new_linear_objective_term(var, price)?;
                }
            }
            if product.unit_cost != 0. {
                problem.add_new_linear_objective_term(vars.produce[d], -product.unit_cost)?;
            }
            if inventory_weight != 0. {
                problem.add_new_linear_objective_term(vars.inventory[d], -inventory_weight)?;
            }
        }
    }
    Ok(())
}

/// Problem selecting, among the plans that accept what `values` accepts at no more
/// operating cost, the one producing and holding the least
///
/// `values` is a dense assignment of `planning.problem`. Acceptance variables are pinned
/// to their value snapped onto their bounds within `tolerance`. The variables keep their
/// positions, so a solution of the returned problem is a solution of `planning.problem`.
pub fn least_activity_problem(
    planning: &PlanningProblem,
    catalog: &Catalog,
    values: &[f64],
    inventory_weight: f64,
    tolerance: f64,
) -> Result<Problem, ProblemError> {
    let mut problem = planning.problem.clone();
    problem.remove_all_objective_terms();
    problem.update_objective_sense(ObjectiveSense::Minimize);
    let mut cost_terms = Vec::new();
    for (product, vars) in catalog.products().zip(&planning.variables) {
        for d in 0..planning.horizon {
            for &(_, var) in &vars.accept[d] {
                let (Some(variable), Some(&value)) =
                    (planning.problem.variable(var), values.get(var))
                else {
                    return Err(ProblemError::NonExistentVariablesInConstraint(format!(
                        "settled x{var}"
                    )));
                };
                problem.add_new_equality_constraint(
                    &format!("settled[{}]", variable.id),
                    &[(var, 1.)],
                    variable.snap(value, tolerance),
                )?;
            }
            problem.add_new_linear_objective_term(vars.produce[d], 1.)?;
            problem.add_new_linear_objective_term(vars.inventory[d], 1.)?;
            if product.unit_cost != 0. {
                cost_terms.push((vars.produce[d], product.unit_cost));
            }
            if inventory_weight != 0. {
                cost_terms.push((vars.inventory[d], inventory_weight));
            }
        }
    }
    if !cost_terms.is_empty() {
        let cost: f64 = cost_terms
            .iter()
            .map(|&(var, coefficient)| coefficient * values.get(var).copied().unwrap_or(0.))
            .sum();
        problem.add_new_inequality_constraint(
            "operating_cost",
            &cost_terms,
            f64::NEG_INFINITY,
            cost + COST_SLACK * (1. + cost.abs()),
        )?;
    }
    Ok(problem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::product::Product;
    use crate::planning::builder::ConstraintBuilder;

    #[test]
    fn profit_coefficients() {
        let mut a = Product::new("A");
        a.unit_cost = 0.1;
        a.storage_days = 1;
        a.add_order(1, 1., 0.2);
        a.add_order(1, 2., 0.);
        let catalog = Catalog::new(vec![a]).unwrap();
        let graph = catalog.requirement_graph().unwrap();
        let mut planning = ConstraintBuilder::new(&catalog, &graph, 2).build().unwrap();
        set_profit_objective(&mut planning, &catalog, 0.5).unwrap();

        let vars = planning.variables[0].clone();
        let n = planning.problem.num_variables();
        let coefficients = planning.problem.objective().coefficients(n);
        assert_eq!(planning.problem.objective().sense(), ObjectiveSense::Maximize);
        assert_eq!(coefficients[vars.accept[1][0].1], 0.2);
        assert_eq!(coefficients[vars.accept[1][1].1], 0.);
        assert_eq!(coefficients[vars.produce[0]], -0.1);
        assert_eq!(coefficients[vars.inventory[1]], -0.5);
        // one price, two costs, two holding penalties
        assert_eq!(planning.problem.objective().terms().len(), 5);

        // setting it again doesn't duplicate terms
        set_profit_objective(&mut planning, &catalog, 0.).unwrap();
        assert_eq!(planning.problem.objective().terms().len(), 3);
    }

    #[test]
    fn least_activity_pins_acceptance() {
        let mut a = Product::new("A");
        a.capacity = 1.;
        a.unit_cost = 0.1;
        a.storage_days = 1;
        a.add_order(1, 2., 1.);
        let catalog = Catalog::new(vec![a]).unwrap();
        let graph = catalog.requirement_graph().unwrap();
        let mut planning = ConstraintBuilder::new(&catalog, &graph, 2).build().unwrap();
        set_profit_objective(&mut planning, &catalog, 0.).unwrap();

        let vars = planning.variables[0].clone();
        let accept = vars.accept[1][0].1;
        let mut values = vec![0.; planning.problem.num_variables()];
        values[accept] = 2. - 1e-12;
        values[vars.produce[0]] = 1.;
        values[vars.produce[1]] = 1.;
        values[vars.inventory[0]] = 1.;

        let problem = least_activity_problem(&planning, &catalog, &values, 0., 1e-9).unwrap();
        assert_eq!(problem.objective().sense(), ObjectiveSense::Minimize);
        // every production and inventory variable, at unit weight
        assert_eq!(problem.objective().terms().len(), 4);
        assert_eq!(problem.num_variables(), planning.problem.num_variables());

        let id = &planning.problem.variable(accept).unwrap().id;
        let settled = problem.constraint(&format!("settled[{id}]")).unwrap();
        assert_eq!(settled.bounds(), (2., 2.));
        let (lower, upper) = problem.constraint("operating_cost").unwrap().bounds();
        assert!(lower.is_infinite());
        assert!(upper >= 0.2 && upper - 0.2 < 1e-6);

        // the profit problem itself is left alone
        assert_eq!(planning.problem.objective().sense(), ObjectiveSense::Maximize);
        assert!(planning.problem.constraint("operating_cost").is_none());
    }

    #[test]
    fn least_activity_without_costs_has_no_cost_row() {
        let mut a = Product::new("A");
        a.add_order(0, 1., 1.);
        let catalog = Catalog::new(vec![a]).unwrap();
        let graph = catalog.requirement_graph().unwrap();
        let planning = ConstraintBuilder::new(&catalog, &graph, 1).build().unwrap();
        let values = vec![1.; planning.problem.num_variables()];
        let problem = least_activity_problem(&planning, &catalog, &values, 0., 1e-9).unwrap();
        assert!(problem.constraint("operating_cost").is_none());

        let short = least_activity_problem(&planning, &catalog, &[], 0., 1e-9);
        assert!(short.is_err());
    }
}
