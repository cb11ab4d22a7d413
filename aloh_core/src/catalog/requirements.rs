//! Bill of materials graph over the products of a catalog
//!
//! Nodes are catalog positions, an edge `q -> p` with weight `w` means every unit of
//! `q` produced consumes `w` units of `p`.
use std::collections::VecDeque;

use indexmap::IndexMap;
use thiserror::Error;

use crate::catalog::catalog::Catalog;

/// Resolved, acyclic requirement graph of a [`Catalog`]
#[derive(Debug, Clone, PartialEq)]
pub struct RequirementGraph {
    /// Product ids, by catalog position
    ids: Vec<String>,
    /// For each product, the products it consumes and how much per unit
    suppliers: Vec<Vec<(usize, f64)>>,
    /// For each product, the products consuming it and how much per unit
    consumers: Vec<Vec<(usize, f64)>>,
    /// Catalog positions, base materials first
    order: Vec<usize>,
}

impl RequirementGraph {
    /// Build the graph for `catalog` and sort it topologically
    ///
    /// Fails if a product transitively requires itself.
    pub fn resolve(catalog: &Catalog) -> Result<Self, CyclicDependencyError> {
        let n = catalog.len();
        let ids: Vec<String> = catalog.ids().map(str::to_string).collect();
        let mut suppliers = vec![Vec::new(); n];
        let mut consumers = vec![Vec::new(); n];
        for (q, product) in catalog.products().enumerate() {
            for (requires, quantity) in &product.requires {
                // Validated catalogs only reference known products
                if let Some(p) = catalog.index_of(requires) {
                    suppliers[q].push((p, *quantity));
                    consumers[p].push((q, *quantity));
                }
            }
        }

        // Kahn's algorithm, a product becomes ready once all of its suppliers are placed
        let mut pending: Vec<usize> = suppliers.iter().map(Vec::len).collect();
        let mut ready: VecDeque<usize> = (0..n).filter(|&i| pending[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(p) = ready.pop_front() {
            order.push(p);
            for &(q, _) in &consumers[p] {
                pending[q] -= 1;
                if pending[q] == 0 {
                    ready.push_back(q);
                }
            }
        }

        if order.len() < n {
            let cycle = Self::find_cycle(&suppliers, &pending)
                .into_iter()
                .map(|i| ids[i].clone())
                .collect();
            return Err(CyclicDependencyError { cycle });
        }

        tracing::debug!(
            "requirement graph resolved, order: {:?}",
            order.iter().map(|&i| ids[i].as_str()).collect::<Vec<_>>()
        );
        Ok(RequirementGraph {
            ids,
            suppliers,
            consumers,
            order,
        })
    }

    /// Walk supplier edges among the products Kahn's algorithm couldn't place
    ///
    /// Every unplaced product still has an unplaced supplier, so the walk has to revisit
    /// a product, and the part of the walk from the first visit on is a cycle.
    fn find_cycle(suppliers: &[Vec<(usize, f64)>], pending: &[usize]) -> Vec<usize> {
        let Some(start) = (0..pending.len()).find(|&i| pending[i] > 0) else {
            return Vec::new();
        };
        let mut position = vec![None; pending.len()];
        let mut walk = Vec::new();
        let mut current = start;
        loop {
            if let Some(first) = position[current] {
                return walk.split_off(first);
            }
            position[current] = Some(walk.len());
            walk.push(current);
            match suppliers[current].iter().find(|(p, _)| pending[*p] > 0) {
                Some(&(next, _)) => current = next,
                None => return walk,
            }
        }
    }

    /// Number of products in the graph
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when the graph holds no products
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Catalog positions in topological order, base materials first
    pub fn topological_indices(&self) -> &[usize] {
        &self.order
    }

    /// Product ids in topological order, base materials first
    pub fn topological_order(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|&i| self.ids[i].as_str())
    }

    /// Products consuming the product at `index`, with the quantity used per unit
    pub fn consumers_of(&self, index: usize) -> &[(usize, f64)] {
        &self.consumers[index]
    }

    /// Products consuming `id`, by id
    pub fn consumers(&self, id: &str) -> Vec<(&str, f64)> {
        self.position(id)
            .map(|p| {
                self.consumers[p]
                    .iter()
                    .map(|&(q, w)| (self.ids[q].as_str(), w))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|other| other == id)
    }

    /// Quantity of every product consumed by the given production quantities
    ///
    /// Only direct consumption is counted, `production` is expected to hold the output of
    /// every product. Products missing from `production` produce nothing.
    pub fn material_demand(&self, production: &IndexMap<String, f64>) -> IndexMap<String, f64> {
        let mut demand: IndexMap<String, f64> =
            self.ids.iter().map(|id| (id.clone(), 0.)).collect();
        for (q, id) in self.ids.iter().enumerate() {
            let Some(&produced) = production.get(id) else {
                continue;
            };
            for &(p, w) in &self.suppliers[q] {
                demand[p] += w * produced;
            }
        }
        demand
    }
}

/// A product directly or transitively requires itself
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Cyclic dependency between products: {}", cycle_path(.cycle))]
pub struct CyclicDependencyError {
    /// Products on the cycle, each requiring the next and the last requiring the first
    pub cycle: Vec<String>,
}

/// `A -> B -> A` style rendering of a cycle
fn cycle_path(cycle: &[String]) -> String {
    let mut path = cycle.join(" -> ");
    if let Some(first) = cycle.first() {
        path.push_str(" -> ");
        path.push_str(first);
    }
    path
}
