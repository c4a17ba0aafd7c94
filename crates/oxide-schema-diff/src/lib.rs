//! Schema snapshot diffing and DDL rendering.
//!
//! `oxide-schema-diff` compares two relational schema snapshots and produces
//! the ordered list of changes that turns the current one into the target
//! one. The changes can then be rendered as DDL for a given dialect.
//!
//! # Architecture
//!
//! - **Schema** - Immutable, validated snapshots built with [`SchemaBuilder`]
//! - **Diff** - Compares two snapshots and emits ordered [`Action`]s
//! - **Actions** - Seven closed kinds of change with their payloads
//! - **Convert** - Maps [`AbstractType`] to dialect type names and back
//! - **Dialect** - Type names plus identifier quoting
//! - **Render** - Turns actions into `;`-terminated statements
//! - **Source** - Boundary trait for loading a snapshot from a database
//!
//! # Example
//!
//! ```rust
//! use oxide_schema_diff::prelude::*;
//!
//! let current = Schema::builder()
//!     .table(Table::new("users").field(Field::new("id", AbstractType::Integer).primary_key()))
//!     .build()?;
//!
//! let target = Schema::builder()
//!     .table(
//!         Table::new("users")
//!             .field(Field::new("id", AbstractType::Integer).primary_key())
//!             .field(Field::new("email", AbstractType::LimitedText).with_length(255)),
//!     )
//!     .build()?;
//!
//! let changes = diff(&current, &target);
//! assert_eq!(
//!     changes.to_sql(&GenericDialect::new())?,
//!     r#"ALTER TABLE "users" ADD COLUMN "email" VARCHAR(255);"#
//! );
//! # Ok::<(), oxide_schema_diff::error::SchemaDiffError>(())
//! ```

pub mod actions;
pub mod convert;
pub mod dialect;
pub mod diff;
pub mod error;
pub mod render;
pub mod schema;
pub mod source;
pub mod types;

pub use actions::{Action, ActionKind, FieldChange, RelationshipChange};
pub use convert::{TypeConverter, TypeMap};
pub use dialect::{Dialect, GenericDialect};
pub use diff::{diff, SchemaDiff};
pub use error::{MalformedSchema, Result, SchemaDiffError};
pub use render::{render, RenderOptions, Renderer};
pub use schema::{Field, Relationship, Schema, SchemaBuilder, Table};
pub use source::SchemaSource;
pub use types::AbstractType;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::actions::{Action, ActionKind, FieldChange, RelationshipChange};
    pub use crate::convert::TypeConverter;
    pub use crate::dialect::{Dialect, GenericDialect};
    pub use crate::diff::{diff, SchemaDiff};
    pub use crate::error::{MalformedSchema, Result, SchemaDiffError};
    pub use crate::render::{RenderOptions, Renderer};
    pub use crate::schema::{Field, Relationship, Schema, SchemaBuilder, Table};
    pub use crate::source::SchemaSource;
    pub use crate::types::AbstractType;
}
