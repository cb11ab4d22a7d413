//! Translates a catalog and a horizon into a linear [`Problem`]
//!
//! Per product `p` and day `d` the problem holds
//! - `accept[p][d][k]` in `[0, volume]` for every order `k` due on `d` with a positive volume,
//! - `produce[p][d]` in `[0, capacity]`,
//! - `inventory[p][d] >= 0`, usable stock at the end of the day, fixed to 0 when the product
//!   can't be stored.
//!
//! and the constraints
//! - material balance: `inventory[p][d] = inventory[p][d-1] + produce[p][d] - accept[p][d]
//!   - sum_q requires[q][p] * produce[q][d]`,
//! - shelf life: `inventory[p][d] <= sum of produce[p][t] for t in d-s+1..=d`, with `s` the
//!   storage days of `p`. Consuming oldest stock first, this is exactly "nothing older than
//!   `s` days is on hand".
use crate::catalog::catalog::Catalog;
use crate::catalog::product::Product;
use crate::catalog::requirements::RequirementGraph;
use crate::optimize::problem::{Problem, ProblemError};

/// Constraint class of the material balance rows
pub const MATERIAL_BALANCE: &str = "material balance";
/// Constraint class of the shelf life rows
pub const SHELF_LIFE: &str = "shelf life";
/// Constraint class of the production variable bounds
pub const CAPACITY: &str = "capacity";
/// Constraint class of the acceptance variable bounds
pub const ORDER_BOUND: &str = "order bound";

/// Variable indices of one product
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductVariables {
    /// Per day, `(order position, variable index)` for every order accepted that day
    pub accept: Vec<Vec<(usize, usize)>>,
    /// Per day, production variable
    pub produce: Vec<usize>,
    /// Per day, end of day inventory variable
    pub inventory: Vec<usize>,
}

/// A built problem together with the variable layout needed to read a solution back
#[derive(Debug, Clone)]
pub struct PlanningProblem {
    /// The linear problem handed to the solver
    pub problem: Problem,
    /// Number of planning days
    pub horizon: usize,
    /// Variables by catalog position
    pub variables: Vec<ProductVariables>,
    /// Number of shelf life rows emitted
    pub shelf_life_rows: usize,
}

impl PlanningProblem {
    /// Names of the constraint classes present in the problem
    pub fn constraint_classes(&self) -> Vec<String> {
        let mut classes = vec![MATERIAL_BALANCE, CAPACITY, ORDER_BOUND];
        if self.shelf_life_rows > 0 {
            classes.insert(1, SHELF_LIFE);
        }
        classes.into_iter().map(str::to_string).collect()
    }
}

/// Builds the variables and constraints of a planning run
pub struct ConstraintBuilder<'a> {
    /// Products by catalog position
    products: Vec<&'a Product>,
    graph: &'a RequirementGraph,
    horizon: usize,
}

impl<'a> ConstraintBuilder<'a> {
    /// Create a builder over `horizon` days
    pub fn new(catalog: &'a Catalog, graph: &'a RequirementGraph, horizon: usize) -> Self {
        Self {
            products: catalog.products().collect(),
            graph,
            horizon,
        }
    }

    /// Build the problem, with an empty objective
    ///
    /// Products are visited in topological order, so the production variables of a
    /// product's suppliers always exist before the product's own rows are added.
    pub fn build(&self) -> Result<PlanningProblem, ProblemError> {
        let mut planning = PlanningProblem {
            problem: Problem::new_maximization(),
            horizon: self.horizon,
            variables: vec![ProductVariables::default(); self.products.len()],
            shelf_life_rows: 0,
        };
        for &p in self.graph.topological_indices() {
            planning.variables[p] = self.add_variables(&mut planning.problem, self.products[p])?;
        }
        for &p in self.graph.topological_indices() {
            self.add_material_balance(&mut planning, p)?;
            planning.shelf_life_rows += self.add_shelf_life(&mut planning, p)?;
        }
        tracing::debug!(
            "built problem over {} days: {} variables, {} constraints ({} shelf life)",
            self.horizon,
            planning.problem.num_variables(),
            planning.problem.num_constraints(),
            planning.shelf_life_rows
        );
        Ok(planning)
    }

    fn add_variables(
        &self,
        problem: &mut Problem,
        product: &Product,
    ) -> Result<ProductVariables, ProblemError> {
        let mut vars = ProductVariables::default();
        let inventory_upper = if product.storage_days == 0 {
            0.
        } else {
            f64::INFINITY
        };
        for d in 0..self.horizon {
            let mut accepted = Vec::new();
            for (k, order) in product.orders_on(d as u32) {
                // an order for nothing fixes acceptance at 0, no variable needed
                if order.volume > 0. {
                    let var =
                        problem.add_new_variable(&product.accept_id(d, k), 0., order.volume)?;
                    accepted.push((k, var));
                }
            }
            vars.accept.push(accepted);
            vars.produce.push(problem.add_new_variable(
                &product.produce_id(d),
                0.,
                product.capacity,
            )?);
            vars.inventory.push(problem.add_new_variable(
                &product.inventory_id(d),
                0.,
                inventory_upper,
            )?);
        }
        Ok(vars)
    }

    fn add_material_balance(
        &self,
        planning: &mut PlanningProblem,
        p: usize,
    ) -> Result<(), ProblemError> {
        let product = self.products[p];
        let vars = &planning.variables[p];
        for d in 0..self.horizon {
            let mut terms = vec![(vars.inventory[d], 1.), (vars.produce[d], -1.)];
            if d > 0 {
                terms.push((vars.inventory[d - 1], -1.));
            }
            terms.extend(vars.accept[d].iter().map(|&(_, var)| (var, 1.)));
            terms.extend(
                self.graph
                    .consumers_of(p)
                    .iter()
                    .map(|&(q, w)| (planning.variables[q].produce[d], w)),
            );
            let id = format!("balance[{}][{}]", product.id, d);
            planning
                .problem
                .add_new_equality_constraint(&id, &terms, 0.)?;
        }
        Ok(())
    }

    /// Returns the number of rows added
    fn add_shelf_life(
        &self,
        planning: &mut PlanningProblem,
        p: usize,
    ) -> Result<usize, ProblemError> {
        let product = self.products[p];
        let storage = product.storage_days as usize;
        if storage == 0 {
            // inventory is fixed at 0 through its bounds
            return Ok(0);
        }
        let vars = &planning.variables[p];
        let mut rows = 0;
        // while the window still reaches day 0 the row is implied by the balance
        for d in storage..self.horizon {
            let mut terms = vec![(vars.inventory[d], 1.)];
            terms.extend((d + 1 - storage..=d).map(|t| (vars.produce[t], -1.)));
            let id = format!("shelf_life[{}][{}]", product.id, d);
            planning.problem.add_new_inequality_constraint(
                &id,
                &terms,
                f64::NEG_INFINITY,
                0.,
            )?;
            rows += 1;
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::constraint::Constraint;

    fn build(catalog: &Catalog, horizon: usize) -> PlanningProblem {
        let graph = catalog.requirement_graph().unwrap();
        ConstraintBuilder::new(catalog, &graph, horizon)
            .build()
            .unwrap()
    }

    #[test]
    fn variables_per_day() {
        let mut a = Product::new("A");
        a.capacity = 10.;
        a.add_order(0, 1., 0.2);
        a.add_order(0, 2., 0.3);
        a.add_order(1, 0., 0.3);
        let catalog = Catalog::new(vec![a]).unwrap();
        let planning = build(&catalog, 2);

        let vars = &planning.variables[0];
        assert_eq!(vars.accept[0].len(), 2);
        assert!(vars.accept[1].is_empty());
        assert_eq!(planning.problem.num_variables(), 2 + 2 + 2);

        let accept = planning.problem.variable(vars.accept[0][1].1).unwrap();
        assert_eq!(accept.id, "accept[A][0][1]");
        assert_eq!(accept.upper_bound, 2.);
        let produce = planning.problem.variable(vars.produce[1]).unwrap();
        assert_eq!(produce.upper_bound, 10.);
        let inventory = planning.problem.variable(vars.inventory[0]).unwrap();
        assert!(inventory.is_fixed());
    }

    #[test]
    fn balance_includes_downstream_consumption() {
        let mut a = Product::new("A");
        a.add_requirement("B", 0.8);
        a.add_order(0, 1., 1.);
        let catalog = Catalog::new(vec![a, Product::new("B")]).unwrap();
        let planning = build(&catalog, 1);

        let produce_a = planning.variables[0].produce[0];
        let balance_b = planning.problem.constraint("balance[B][0]").unwrap();
        assert!(balance_b
            .terms()
            .iter()
            .any(|t| t.variable == produce_a && (t.coefficient - 0.8).abs() < 1e-12));
        assert!(matches!(balance_b, Constraint::Equality { equals, .. } if *equals == 0.));
        assert_eq!(planning.problem.num_constraints(), 2);
    }

    #[test]
    fn shelf_life_window() {
        let mut a = Product::new("A");
        a.storage_days = 2;
        a.add_order(4, 1., 1.);
        let catalog = Catalog::new(vec![a]).unwrap();
        let planning = build(&catalog, 5);

        // rows for days 2, 3 and 4
        assert_eq!(planning.shelf_life_rows, 3);
        assert!(planning.problem.constraint("shelf_life[A][1]").is_none());
        let row = planning.problem.constraint("shelf_life[A][3]").unwrap();
        let vars = &planning.variables[0];
        let produced: Vec<usize> = row
            .terms()
            .iter()
            .filter(|t| t.coefficient < 0.)
            .map(|t| t.variable)
            .collect();
        assert_eq!(produced, vec![vars.produce[2], vars.produce[3]]);
        assert_eq!(row.bounds(), (f64::NEG_INFINITY, 0.));
        assert_eq!(
            planning.constraint_classes(),
            vec![MATERIAL_BALANCE, SHELF_LIFE, CAPACITY, ORDER_BOUND]
        );
    }
}
