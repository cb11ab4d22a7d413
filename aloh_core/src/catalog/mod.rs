//! Module providing the product catalog a planning run works on

pub mod catalog;
pub mod product;
pub mod requirements;

use thiserror::Error;

pub use catalog::Catalog;
pub use product::{Order, Product, ProductBuilder};
pub use requirements::{CyclicDependencyError, RequirementGraph};

/// Malformed or inconsistent planning input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two products share an id
    #[error("Product `{0}` is defined more than once")]
    DuplicateProduct(String),
    /// A requirement names a product that isn't in the catalog
    #[error("Product `{product}` requires unknown product `{requires}`")]
    UnknownRequirement {
        /// Product holding the requirement
        product: String,
        /// Id that couldn't be resolved
        requires: String,
    },
    /// A product requires itself
    #[error("Product `{0}` requires itself")]
    SelfRequirement(String),
    /// A quantity is negative or NaN
    #[error("Product `{product}` has invalid {field} {value}")]
    InvalidQuantity {
        /// Product holding the value
        product: String,
        /// Which attribute is invalid
        field: &'static str,
        /// The offending value
        value: f64,
    },
    /// An order has a negative or NaN volume or price
    #[error("Order {index} of product `{product}` has invalid {field} {value}")]
    InvalidOrder {
        /// Product the order belongs to
        product: String,
        /// Position of the order in the product's order list
        index: usize,
        /// Which attribute is invalid
        field: &'static str,
        /// The offending value
        value: f64,
    },
    /// A configuration setting is out of range
    #[error("Configuration has invalid {field} {value}")]
    InvalidConfiguration {
        /// Which setting is invalid
        field: &'static str,
        /// The offending value
        value: f64,
    },
}
