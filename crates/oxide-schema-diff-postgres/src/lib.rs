//! # oxide-schema-diff-postgres
//!
//! PostgreSQL support for `oxide-schema-diff`.
//!
//! - [`PostgresDialect`] maps abstract types to PostgreSQL's internal type
//!   names (`INT4`, `INT8`, `BYTEA`, ...) and accepts the spellings found in
//!   `information_schema`, such as `numeric`, `timestamptz` or
//!   `character varying`.
//! - [`CatalogRows`] assembles a validated [`Schema`](oxide_schema_diff::Schema)
//!   from rows a driver fetched with the provided catalog queries.
//!
//! ## Example
//!
//! ```rust
//! use oxide_schema_diff::prelude::*;
//! use oxide_schema_diff_postgres::{CatalogRows, ColumnRow, PostgresDialect};
//!
//! let dialect = PostgresDialect::new();
//! let current = CatalogRows {
//!     columns: vec![ColumnRow {
//!         table_name: "users".into(),
//!         column_name: "id".into(),
//!         udt_name: "int4".into(),
//!         character_maximum_length: None,
//!     }],
//!     ..CatalogRows::new()
//! }
//! .into_schema(&dialect)?;
//!
//! let target = Schema::builder()
//!     .table(
//!         Table::new("users")
//!             .field(Field::new("id", AbstractType::Integer))
//!             .field(Field::new("name", AbstractType::LimitedText).with_length(80)),
//!     )
//!     .build()?;
//!
//! assert_eq!(
//!     diff(&current, &target).to_sql(&dialect)?,
//!     r#"ALTER TABLE "users" ADD COLUMN "name" VARCHAR(80);"#
//! );
//! # Ok::<(), SchemaDiffError>(())
//! ```

pub mod catalog;
mod dialect;

pub use catalog::{CatalogRows, ColumnRow, ForeignKeyRow, PrimaryKeyRow, TableRow};
pub use dialect::PostgresDialect;
