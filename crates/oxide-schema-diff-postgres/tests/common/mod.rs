#![allow(dead_code)]

use oxide_schema_diff::Schema;
use oxide_schema_diff_postgres::{CatalogRows, PostgresDialect};

/// Catalog rows as a driver would serialize them.
pub const SHOP_ROWS: &str = r#"{
    "tables": [{"table_name": "customers"}, {"table_name": "orders"}, {"table_name": "audit"}],
    "columns": [
        {"table_name": "customers", "column_name": "id", "udt_name": "int4", "character_maximum_length": null},
        {"table_name": "customers", "column_name": "name", "udt_name": "varchar", "character_maximum_length": 100},
        {"table_name": "customers", "column_name": "joined", "udt_name": "timestamptz", "character_maximum_length": null},
        {"table_name": "orders", "column_name": "id", "udt_name": "int8", "character_maximum_length": null},
        {"table_name": "orders", "column_name": "customer_id", "udt_name": "int4", "character_maximum_length": null},
        {"table_name": "orders", "column_name": "total", "udt_name": "numeric", "character_maximum_length": null}
    ],
    "primary_keys": [
        {"table_name": "customers", "key_column": "id"},
        {"table_name": "orders", "key_column": "id"}
    ],
    "foreign_keys": [{
        "constraint_name": "orders_customer_id_fkey",
        "table_name": "orders",
        "column_name": "customer_id",
        "references_table": "customers",
        "references_field": "id"
    }]
}"#;

pub fn load(json: &str) -> Schema {
    let rows: CatalogRows =
        serde_json::from_str(json).unwrap_or_else(|e| panic!("Invalid catalog rows: {e}"));
    rows.into_schema(&PostgresDialect::new())
        .unwrap_or_else(|e| panic!("Invalid catalog: {e}"))
}
