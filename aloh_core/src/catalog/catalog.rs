//! This module provides the Catalog struct, the validated set of products of a planning run
use indexmap::IndexMap;

use crate::catalog::product::Product;
use crate::catalog::requirements::{CyclicDependencyError, RequirementGraph};
use crate::catalog::ValidationError;

/// Validated, immutable collection of products keyed by id
///
/// Products keep the order they were given in, which fixes the order of every
/// derived structure (variables, constraints, plan entries).
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    products: IndexMap<String, Product>,
}

impl Catalog {
    /// Validate `products` and collect them into a catalog
    ///
    /// # Examples
    /// ```rust
    /// use aloh_core::catalog::{Catalog, Product};
    /// let mut a = Product::new("A");
    /// a.add_requirement("B", 2.);
    /// let catalog = Catalog::new(vec![a, Product::new("B")]).unwrap();
    /// assert_eq!(catalog.len(), 2);
    ///
    /// let mut c = Product::new("C");
    /// c.add_requirement("D", 1.);
    /// assert!(Catalog::new(vec![c]).is_err());
    /// ```
    pub fn new(products: Vec<Product>) -> Result<Self, ValidationError> {
        let mut map = IndexMap::with_capacity(products.len());
        for product in products {
            if map.contains_key(&product.id) {
                return Err(ValidationError::DuplicateProduct(product.id));
            }
            map.insert(product.id.clone(), product);
        }
        let catalog = Catalog { products: map };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Products in catalog order
    pub fn products(&self) -> impl ExactSizeIterator<Item = &Product> {
        self.products.values()
    }

    /// Product ids in catalog order
    pub fn ids(&self) -> impl ExactSizeIterator<Item = &str> {
        self.products.keys().map(String::as_str)
    }

    /// Product with id `id`
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    /// Product at catalog position `index`
    pub fn get_index(&self, index: usize) -> Option<&Product> {
        self.products.get_index(index).map(|(_, product)| product)
    }

    /// Catalog position of the product with id `id`
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.products.get_index_of(id)
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// True when the catalog holds no products
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Number of planning days implied by the orders, one past the latest order day
    pub fn horizon(&self) -> usize {
        self.products
            .values()
            .filter_map(Product::last_order_day)
            .max()
            .map_or(0, |day| day as usize + 1)
    }

    /// Resolve the bill of materials into a [`RequirementGraph`]
    pub fn requirement_graph(&self) -> Result<RequirementGraph, CyclicDependencyError> {
        RequirementGraph::resolve(self)
    }

    // region Validation Functions
    fn validate(&self) -> Result<(), ValidationError> {
        for product in self.products.values() {
            Self::validate_attributes(product)?;
            self.validate_requirements(product)?;
            Self::validate_orders(product)?;
        }
        Ok(())
    }

    fn validate_attributes(product: &Product) -> Result<(), ValidationError> {
        // capacity may be infinite, unit cost may not
        if !(product.capacity >= 0.) {
            return Err(Self::invalid_quantity(product, "capacity", product.capacity));
        }
        if !(product.unit_cost >= 0.) || product.unit_cost.is_infinite() {
            return Err(Self::invalid_quantity(product, "unit_cost", product.unit_cost));
        }
        Ok(())
    }

    fn validate_requirements(&self, product: &Product) -> Result<(), ValidationError> {
        for (requires, quantity) in &product.requires {
            if *requires == product.id {
                return Err(ValidationError::SelfRequirement(product.id.clone()));
            }
            if !self.products.contains_key(requires) {
                return Err(ValidationError::UnknownRequirement {
                    product: product.id.clone(),
                    requires: requires.clone(),
                });
            }
            if !(*quantity >= 0.) || quantity.is_infinite() {
                return Err(Self::invalid_quantity(product, "requirement", *quantity));
            }
        }
        Ok(())
    }

    fn validate_orders(product: &Product) -> Result<(), ValidationError> {
        for (index, order) in product.orders.iter().enumerate() {
            for (field, value) in [("volume", order.volume), ("price", order.price)] {
                if !(value >= 0.) || value.is_infinite() {
                    return Err(ValidationError::InvalidOrder {
                        product: product.id.clone(),
                        index,
                        field,
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    fn invalid_quantity(product: &Product, field: &'static str, value: f64) -> ValidationError {
        ValidationError::InvalidQuantity {
            product: product.id.clone(),
            field,
            value,
        }
    }
    // endregion Validation Functions
}
