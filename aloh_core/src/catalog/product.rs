//! This module provides the Product struct and the orders placed for it
use derive_builder::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// A customer order for a product, placed for a given day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Day the order is due, counted from 0
    pub day: u32,
    /// Requested quantity
    pub volume: f64,
    /// Revenue per accepted unit
    pub price: f64,
}

impl Order {
    /// Create a new order
    pub fn new(day: u32, volume: f64, price: f64) -> Self {
        Self { day, volume, price }
    }
}

/// Represents a product that can be produced and sold
///
/// # Examples
/// ```rust
/// use aloh_core::catalog::product::ProductBuilder;
/// let mut product = ProductBuilder::default()
///     .id("A")
///     .capacity(10.)
///     .unit_cost(0.1)
///     .build()
///     .unwrap();
/// product.add_order(0, 1., 0.2);
/// product.add_requirement("B", 0.8);
/// assert_eq!(product.last_order_day(), Some(0));
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Used to identify the product (must be unique within a catalog)
    #[builder(setter(into))]
    pub id: String,
    /// Maximum units produced per day
    #[builder(default = "f64::INFINITY")]
    #[serde(default = "unbounded", deserialize_with = "capacity_or_unbounded")]
    pub capacity: f64,
    /// Cost of producing one unit
    #[builder(default = "0.")]
    #[serde(default)]
    pub unit_cost: f64,
    /// Days a unit may be held before it has to be used, 0 means same day use only
    #[builder(default = "0")]
    #[serde(default)]
    pub storage_days: u32,
    /// Quantity of other products consumed per unit produced, keyed by product id
    #[builder(default = "IndexMap::new()")]
    #[serde(default)]
    pub requires: IndexMap<String, f64>,
    /// Candidate orders
    #[builder(default = "Vec::new()")]
    #[serde(default)]
    pub orders: Vec<Order>,
}

fn unbounded() -> f64 {
    f64::INFINITY
}

/// JSON has no infinity and writes it as `null`, which reads back as unbounded
fn capacity_or_unbounded<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
}

impl Product {
    /// Create a product with default attributes
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            capacity: f64::INFINITY,
            unit_cost: 0.,
            storage_days: 0,
            requires: IndexMap::new(),
            orders: Vec::new(),
        }
    }

    /// Add a candidate order
    pub fn add_order(&mut self, day: u32, volume: f64, price: f64) {
        self.orders.push(Order::new(day, volume, price));
    }

    /// Require `quantity` units of `product_id` per unit produced, replacing an earlier entry
    pub fn add_requirement(&mut self, product_id: &str, quantity: f64) {
        self.requires.insert(product_id.to_string(), quantity);
    }

    /// Orders due on `day`, with their position in [`Product::orders`]
    pub fn orders_on(&self, day: u32) -> impl Iterator<Item = (usize, &Order)> {
        self.orders
            .iter()
            .enumerate()
            .filter(move |(_, order)| order.day == day)
    }

    /// Latest day any order is due
    pub fn last_order_day(&self) -> Option<u32> {
        self.orders.iter().map(|order| order.day).max()
    }

    /// Total requested volume on `day`
    pub fn requested_volume(&self, day: u32) -> f64 {
        self.orders_on(day).map(|(_, order)| order.volume).sum()
    }

    /// Id of the variable for accepting order `order` on `day`
    pub fn accept_id(&self, day: usize, order: usize) -> String {
        format!("accept[{}][{}][{}]", self.id, day, order)
    }

    /// Id of the variable for production on `day`
    pub fn produce_id(&self, day: usize) -> String {
        format!("produce[{}][{}]", self.id, day)
    }

    /// Id of the variable for usable stock at the end of `day`
    pub fn inventory_id(&self, day: usize) -> String {
        format!("inventory[{}][{}]", self.id, day)
    }
}
