//! Module providing JSON IO for catalogs and plans
//!
//! A catalog document looks like
//! ```json
//! {"products": [{"id": "A", "capacity": 10.0, "unit_cost": 0.1, "storage_days": 0,
//!                "requires": {"B": 0.8}, "orders": [{"day": 0, "volume": 1.0, "price": 0.2}]}]}
//! ```
//! where a missing or `null` capacity means unlimited.
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::catalog::Catalog;
use crate::catalog::product::{Order, Product};
use crate::catalog::ValidationError;
use crate::io::IoError;
use crate::planning::plan::Plan;

// region JSON Catalog
/// Represents a JSON serialized catalog
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct JsonCatalog {
    products: Vec<JsonProduct>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct JsonProduct {
    id: String,
    #[serde(default)]
    capacity: Option<f64>,
    #[serde(default)]
    unit_cost: f64,
    #[serde(default)]
    storage_days: i64,
    #[serde(default)]
    requires: IndexMap<String, f64>,
    #[serde(default)]
    orders: Vec<JsonOrder>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
struct JsonOrder {
    day: i64,
    volume: f64,
    price: f64,
}
// endregion JSON Catalog

// region Conversions
impl TryFrom<JsonProduct> for Product {
    type Error = ValidationError;

    fn try_from(p: JsonProduct) -> Result<Self, Self::Error> {
        // days are signed in the document so a negative one is reported, not a parse error
        let storage_days =
            u32::try_from(p.storage_days).map_err(|_| ValidationError::InvalidQuantity {
                product: p.id.clone(),
                field: "storage_days",
                value: p.storage_days as f64,
            })?;
        let orders = p
            .orders
            .iter()
            .enumerate()
            .map(|(index, o)| {
                u32::try_from(o.day)
                    .map(|day| Order::new(day, o.volume, o.price))
                    .map_err(|_| ValidationError::InvalidOrder {
                        product: p.id.clone(),
                        index,
                        field: "day",
                        value: o.day as f64,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Product {
            id: p.id,
            capacity: p.capacity.unwrap_or(f64::INFINITY),
            unit_cost: p.unit_cost,
            storage_days,
            requires: p.requires,
            orders,
        })
    }
}

impl From<&Product> for JsonProduct {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.clone(),
            capacity: p.capacity.is_finite().then_some(p.capacity),
            unit_cost: p.unit_cost,
            storage_days: i64::from(p.storage_days),
            requires: p.requires.clone(),
            orders: p
                .orders
                .iter()
                .map(|o| JsonOrder {
                    day: i64::from(o.day),
                    volume: o.volume,
                    price: o.price,
                })
                .collect(),
        }
    }
}
// endregion Conversions

/// Parse and validate a catalog from a JSON string
pub fn catalog_from_str(data: &str) -> Result<Catalog, IoError> {
    let json_catalog: JsonCatalog = serde_json::from_str(data)?;
    let products = json_catalog
        .products
        .into_iter()
        .map(Product::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Catalog::new(products)?)
}

/// Read and validate a catalog from a JSON file
pub fn read_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, IoError> {
    let data = fs::read_to_string(path)?;
    catalog_from_str(&data)
}

/// Serialize a catalog to a JSON string
pub fn catalog_to_string(catalog: &Catalog) -> Result<String, IoError> {
    let json_catalog = JsonCatalog {
        products: catalog.products().map(JsonProduct::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&json_catalog)?)
}

/// Write a catalog to a JSON file
pub fn write_catalog<P: AsRef<Path>>(catalog: &Catalog, path: P) -> Result<(), IoError> {
    fs::write(path, catalog_to_string(catalog)?)?;
    Ok(())
}

/// Serialize a plan to a JSON string
pub fn plan_to_string(plan: &Plan) -> Result<String, IoError> {
    Ok(serde_json::to_string_pretty(plan)?)
}

/// Write a plan to a JSON file
pub fn write_plan<P: AsRef<Path>>(plan: &Plan, path: P) -> Result<(), IoError> {
    fs::write(path, plan_to_string(plan)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn bakery_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("catalogs")
            .join("bakery.json")
    }

    #[test]
    fn json_product() {
        let data = r#"{
"id": "bread",
"capacity": 10.0,
"unit_cost": 0.1,
"storage_days": 1,
"requires": {"dough": 0.8},
"orders": [{"day": 0, "volume": 1.0, "price": 0.2}]
}"#;
        let json_product: JsonProduct = serde_json::from_str(data).unwrap();
        let product = Product::try_from(json_product).unwrap();
        assert_eq!(product.id, "bread");
        assert_eq!(product.capacity, 10.);
        assert_eq!(product.storage_days, 1);
        assert_eq!(product.requires["dough"], 0.8);
        assert_eq!(product.orders, vec![Order::new(0, 1., 0.2)]);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let json_product: JsonProduct =
            serde_json::from_str(r#"{"id": "A", "capacity": null}"#).unwrap();
        let product = Product::try_from(json_product).unwrap();
        assert!(product.capacity.is_infinite());
        assert_eq!(product.unit_cost, 0.);
        assert_eq!(product.storage_days, 0);
        assert!(product.requires.is_empty());
        assert!(product.orders.is_empty());
    }

    #[test]
    fn negative_day() {
        let data =
            r#"{"products": [{"id": "A", "orders": [{"day": -1, "volume": 1.0, "price": 1.0}]}]}"#;
        assert!(matches!(
            catalog_from_str(data),
            Err(IoError::Catalog(ValidationError::InvalidOrder { field: "day", .. }))
        ));
        let data = r#"{"products": [{"id": "A", "storage_days": -2}]}"#;
        assert!(matches!(
            catalog_from_str(data),
            Err(IoError::Catalog(ValidationError::InvalidQuantity {
                field: "storage_days",
                ..
            }))
        ));
    }

    #[test]
    fn invalid_documents() {
        assert!(matches!(catalog_from_str("{"), Err(IoError::Json(_))));
        let data = r#"{"products": [{"id": "A", "requires": {"B": 1.0}}]}"#;
        assert!(matches!(
            catalog_from_str(data),
            Err(IoError::Catalog(ValidationError::UnknownRequirement { .. }))
        ));
        assert!(matches!(
            read_catalog("does/not/exist.json"),
            Err(IoError::File(_))
        ));
    }

    #[test]
    fn read_bakery() {
        let catalog = read_catalog(bakery_path()).unwrap();
        assert_eq!(
            catalog.ids().collect::<Vec<_>>(),
            vec!["bread", "dough", "flour"]
        );
        assert!(catalog.get("flour").unwrap().capacity.is_infinite());
        assert_eq!(catalog.horizon(), 3);
    }

    #[test]
    fn catalog_survives_writing() {
        let catalog = read_catalog(bakery_path()).unwrap();
        let text = catalog_to_string(&catalog).unwrap();
        // unlimited capacity is written as null
        assert!(text.contains("\"capacity\": null"));
        assert_eq!(catalog_from_str(&text).unwrap(), catalog);
    }

    #[test]
    fn plan_to_json() {
        let catalog = read_catalog(bakery_path()).unwrap();
        let plan = Plan::idle("bakery", &catalog, 2);
        let text = plan_to_string(&plan).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["model_name"], "bakery");
        assert_eq!(value["production"]["bread"], serde_json::json!([0.0, 0.0]));
    }
}
