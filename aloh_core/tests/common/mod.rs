//! Helpers shared by the integration tests
#![allow(dead_code)]

use std::path::PathBuf;

use aloh_core::catalog::{Catalog, Product};
use tracing_subscriber::{fmt, EnvFilter};

/// Absolute tolerance for values coming out of an interior point solve
pub const EPS: f64 = 1e-6;

/// Send solver logs to the test output, `RUST_LOG` picks the level
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_all_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < EPS, "expected {expected:?}, got {actual:?}");
    }
}

pub fn product(id: &str, capacity: f64, unit_cost: f64) -> Product {
    let mut product = Product::new(id);
    product.capacity = capacity;
    product.unit_cost = unit_cost;
    product
}

pub fn catalog(products: Vec<Product>) -> Catalog {
    Catalog::new(products).unwrap()
}

pub fn test_data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join("catalogs")
        .join(name)
}
