//! Core rust implementation of aloh, an order acceptance and production planning engine.
//!
//! A [`Catalog`] of products, each with a daily capacity, a unit cost, a shelf life, the
//! other products it consumes and the orders placed for it, is turned into a linear program
//! choosing which orders to accept and how much of every product to make each day so net
//! profit is maximal.

pub mod catalog;
pub mod configuration;
pub mod io;
pub mod optimize;
pub mod planning;

pub use catalog::{Catalog, Order, Product, ProductBuilder};
pub use configuration::{Configuration, SolverBackend};
pub use planning::{EvaluationError, OptModel, Plan};
