//! The result of evaluating an [`OptModel`](crate::planning::model::OptModel)
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::catalog::Catalog;
use crate::catalog::requirements::RequirementGraph;

/// Accepted volume, production and inventory per product and day
///
/// Every sequence has one entry per planning day. Products keep catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Name of the model the plan was computed for
    pub model_name: String,
    /// Number of planning days
    pub horizon: usize,
    /// Net profit of the plan
    pub objective_value: f64,
    /// Accepted volume per day, summed over the orders due that day
    pub accepted: IndexMap<String, Vec<f64>>,
    /// Accepted volume per order, in the product's order list order
    pub accepted_by_order: IndexMap<String, Vec<f64>>,
    /// Produced volume per day
    pub production: IndexMap<String, Vec<f64>>,
    /// Usable stock at the end of each day
    pub inventory: IndexMap<String, Vec<f64>>,
}

impl Plan {
    /// Plan producing and accepting nothing over `horizon` days
    pub fn idle(model_name: &str, catalog: &Catalog, horizon: usize) -> Self {
        let days = || -> IndexMap<String, Vec<f64>> {
            catalog
                .ids()
                .map(|id| (id.to_string(), vec![0.; horizon]))
                .collect()
        };
        Plan {
            model_name: model_name.to_string(),
            horizon,
            objective_value: 0.,
            accepted: days(),
            accepted_by_order: catalog
                .products()
                .map(|p| (p.id.clone(), vec![0.; p.orders.len()]))
                .collect(),
            production: days(),
            inventory: days(),
        }
    }

    /// Accepted volume per product and day
    pub fn accepted_orders(&self) -> &IndexMap<String, Vec<f64>> {
        &self.accepted
    }

    /// Produced volume per product and day
    pub fn estimated_production(&self) -> &IndexMap<String, Vec<f64>> {
        &self.production
    }

    /// End of day inventory per product and day
    pub fn inventory(&self) -> &IndexMap<String, Vec<f64>> {
        &self.inventory
    }

    /// Total revenue of the accepted volume
    pub fn revenue(&self, catalog: &Catalog) -> f64 {
        catalog
            .products()
            .filter_map(|p| {
                self.accepted_by_order.get(&p.id).map(|accepted| {
                    p.orders
                        .iter()
                        .zip(accepted)
                        .map(|(order, volume)| order.price * volume)
                        .sum::<f64>()
                })
            })
            .sum()
    }

    /// Split into the `(accepted, production)` pair
    pub fn into_parts(self) -> (IndexMap<String, Vec<f64>>, IndexMap<String, Vec<f64>>) {
        (self.accepted, self.production)
    }

    /// Material balance residual per product and day
    ///
    /// `inventory[d-1] + production[d] - accepted[d] - consumed[d] - inventory[d]`, where
    /// `consumed` is the quantity used by downstream production that day. A valid plan has
    /// residuals of 0 up to solver accuracy.
    pub fn balance_residuals(&self, graph: &RequirementGraph) -> IndexMap<String, Vec<f64>> {
        let mut residuals: IndexMap<String, Vec<f64>> = self
            .production
            .keys()
            .map(|id| (id.clone(), vec![0.; self.horizon]))
            .collect();
        for d in 0..self.horizon {
            let produced: IndexMap<String, f64> = self
                .production
                .iter()
                .map(|(id, days)| (id.clone(), days[d]))
                .collect();
            let consumed = graph.material_demand(&produced);
            for (id, residual) in residuals.iter_mut() {
                let day = |map: &IndexMap<String, Vec<f64>>, d: usize| {
                    map.get(id).and_then(|days| days.get(d)).copied().unwrap_or(0.)
                };
                let carried = if d > 0 { day(&self.inventory, d - 1) } else { 0. };
                residual[d] = carried + day(&self.production, d)
                    - day(&self.accepted, d)
                    - consumed.get(id).copied().unwrap_or(0.)
                    - day(&self.inventory, d);
            }
        }
        residuals
    }

    /// Largest absolute material balance residual
    pub fn max_balance_residual(&self, graph: &RequirementGraph) -> f64 {
        self.balance_residuals(graph)
            .values()
            .flatten()
            .fold(0., |max: f64, r| max.max(r.abs()))
    }
}
