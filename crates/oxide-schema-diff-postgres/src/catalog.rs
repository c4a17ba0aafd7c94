//! Snapshot assembly from PostgreSQL catalog rows.
//!
//! A driver runs the queries below against `information_schema`, maps each
//! result row onto the matching row type and hands the lot to
//! [`CatalogRows::into_schema`]. Nothing here talks to a database.

use std::collections::{BTreeMap, BTreeSet};

use oxide_schema_diff::convert::TypeConverter;
use oxide_schema_diff::dialect::Dialect;
use oxide_schema_diff::error::{MalformedSchema, Result, SchemaDiffError};
use oxide_schema_diff::schema::{Field, Relationship, Schema, SchemaBuilder, Table};
use oxide_schema_diff::source::SchemaSource;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dialect::PostgresDialect;

/// Base tables of the user schemas. Yields [`TableRow`]s.
pub const TABLES_QUERY: &str = "\
SELECT table_name
FROM information_schema.tables
WHERE table_type = 'BASE TABLE'
  AND table_schema NOT IN ('pg_catalog', 'information_schema')
ORDER BY table_name";

/// Columns in declaration order. Yields [`ColumnRow`]s.
pub const COLUMNS_QUERY: &str = "\
SELECT c.table_name, c.column_name, c.udt_name, c.character_maximum_length
FROM information_schema.columns c
JOIN information_schema.tables t
  ON t.table_schema = c.table_schema AND t.table_name = c.table_name
WHERE t.table_type = 'BASE TABLE'
  AND c.table_schema NOT IN ('pg_catalog', 'information_schema')
ORDER BY c.table_name, c.ordinal_position";

/// Primary-key columns. Yields [`PrimaryKeyRow`]s.
pub const PRIMARY_KEYS_QUERY: &str = "\
SELECT kcu.table_name, kcu.column_name AS key_column
FROM information_schema.table_constraints tco
JOIN information_schema.key_column_usage kcu
  ON kcu.constraint_name = tco.constraint_name
 AND kcu.constraint_schema = tco.constraint_schema
WHERE tco.constraint_type = 'PRIMARY KEY'
  AND tco.table_schema NOT IN ('pg_catalog', 'information_schema')
ORDER BY kcu.table_name, kcu.ordinal_position";

/// Foreign-key constraints with both endpoints. Yields [`ForeignKeyRow`]s.
pub const FOREIGN_KEYS_QUERY: &str = "\
SELECT tc.constraint_name,
       tc.table_name,
       kcu.column_name,
       ccu.table_name AS references_table,
       ccu.column_name AS references_field
FROM information_schema.table_constraints tc
JOIN information_schema.key_column_usage kcu
  ON tc.constraint_catalog = kcu.constraint_catalog
 AND tc.constraint_schema = kcu.constraint_schema
 AND tc.constraint_name = kcu.constraint_name
JOIN information_schema.referential_constraints rc
  ON tc.constraint_catalog = rc.constraint_catalog
 AND tc.constraint_schema = rc.constraint_schema
 AND tc.constraint_name = rc.constraint_name
JOIN information_schema.constraint_column_usage ccu
  ON rc.unique_constraint_catalog = ccu.constraint_catalog
 AND rc.unique_constraint_schema = ccu.constraint_schema
 AND rc.unique_constraint_name = ccu.constraint_name
WHERE tc.constraint_type = 'FOREIGN KEY'
  AND tc.table_schema NOT IN ('pg_catalog', 'information_schema')
ORDER BY tc.table_name, tc.constraint_name";

/// A row of [`TABLES_QUERY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Unquoted table name.
    pub table_name: String,
}

/// A row of [`COLUMNS_QUERY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRow {
    /// Table the column belongs to.
    pub table_name: String,
    /// Unquoted column name.
    pub column_name: String,
    /// Internal type name, e.g. `int4` or `varchar`.
    pub udt_name: String,
    /// Declared length, `None` for types without one.
    #[serde(default)]
    pub character_maximum_length: Option<u32>,
}

/// A row of [`PRIMARY_KEYS_QUERY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyRow {
    /// Table holding the key.
    pub table_name: String,
    /// One column of the key. Composite keys give one row per column.
    pub key_column: String,
}

/// A row of [`FOREIGN_KEYS_QUERY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRow {
    /// Constraint identifier, unique across the snapshot.
    pub constraint_name: String,
    /// Table holding the foreign key.
    pub table_name: String,
    /// Referencing column of `table_name`.
    pub column_name: String,
    /// Referenced table.
    pub references_table: String,
    /// Referenced column of `references_table`.
    pub references_field: String,
}

/// Everything read from the catalog for one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogRows {
    /// Tables, including ones without columns.
    pub tables: Vec<TableRow>,
    /// Columns in ordinal order per table.
    pub columns: Vec<ColumnRow>,
    /// Primary key columns.
    pub primary_keys: Vec<PrimaryKeyRow>,
    /// Foreign key columns, one row per referencing column.
    pub foreign_keys: Vec<ForeignKeyRow>,
}

#[derive(Debug, Default)]
struct TableParts {
    fields: Vec<Field>,
    relationships: Vec<Relationship>,
}

impl CatalogRows {
    /// Creates an empty row set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Owned form of [`to_schema`](Self::to_schema), for callers that are
    /// done with the rows once the snapshot is built.
    ///
    /// # Errors
    ///
    /// See [`to_schema`](Self::to_schema).
    pub fn into_schema(self, dialect: &PostgresDialect) -> Result<Schema> {
        self.to_schema(dialect)
    }

    /// Converts the rows into a validated snapshot.
    ///
    /// Tables keep the order they are first seen in. A length is kept only
    /// for length-bounded types. A foreign key spanning several columns
    /// keeps its first row only.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDiffError::UnsupportedType`] for an unknown
    /// `udt_name` and [`SchemaDiffError::MalformedSchema`] when a row refers
    /// to a table or column that is not in the row set.
    pub fn to_schema(&self, dialect: &PostgresDialect) -> Result<Schema> {
        let mut order: Vec<&str> = Vec::new();
        let mut parts: BTreeMap<&str, TableParts> = BTreeMap::new();
        let names = self
            .tables
            .iter()
            .map(|r| r.table_name.as_str())
            .chain(self.columns.iter().map(|r| r.table_name.as_str()));
        for name in names {
            if !parts.contains_key(name) {
                order.push(name);
                parts.insert(name, TableParts::default());
            }
        }

        for row in &self.columns {
            let ty = dialect.to_abstract(&row.udt_name)?;
            let field = Field::new(row.column_name.as_str(), ty);
            let field = match row.character_maximum_length {
                Some(len) if ty.is_length_bounded() => field.with_length(len),
                _ => field,
            };
            parts
                .entry(row.table_name.as_str())
                .or_default()
                .fields
                .push(field);
        }

        for row in &self.primary_keys {
            let constraint = dialect.primary_key_constraint_name(&row.table_name);
            let table = parts
                .get_mut(row.table_name.as_str())
                .ok_or_else(|| MalformedSchema::UnknownTable {
                    constraint: constraint.clone(),
                    table: row.table_name.clone(),
                })?;
            let slot = table
                .fields
                .iter_mut()
                .find(|f| f.name() == row.key_column)
                .ok_or_else(|| MalformedSchema::UnknownField {
                    constraint,
                    table: row.table_name.clone(),
                    field: row.key_column.clone(),
                })?;
            *slot = slot.clone().primary_key();
        }

        let mut seen = BTreeSet::new();
        for row in &self.foreign_keys {
            if !seen.insert((row.table_name.as_str(), row.constraint_name.as_str())) {
                warn!(
                    constraint = %row.constraint_name,
                    table = %row.table_name,
                    column = %row.column_name,
                    "Skipping extra column of multi-column foreign key"
                );
                continue;
            }
            let table = parts
                .get_mut(row.table_name.as_str())
                .ok_or_else(|| MalformedSchema::UnknownTable {
                    constraint: row.constraint_name.clone(),
                    table: row.table_name.clone(),
                })?;
            table.relationships.push(Relationship::new(
                row.constraint_name.as_str(),
                row.table_name.as_str(),
                row.column_name.as_str(),
                row.references_table.as_str(),
                row.references_field.as_str(),
            ));
        }

        let mut builder = SchemaBuilder::new();
        for name in order {
            let Some(TableParts {
                fields,
                relationships,
            }) = parts.remove(name)
            else {
                continue;
            };
            let table = fields.into_iter().fold(Table::new(name), Table::field);
            builder.push_table(relationships.into_iter().fold(table, Table::relationship));
        }
        let schema = builder.build()?;

        debug!(
            dialect = dialect.name(),
            tables = schema.len(),
            columns = self.columns.len(),
            foreign_keys = schema.relationships().count(),
            "Assembled schema from catalog rows"
        );
        Ok(schema)
    }
}

impl SchemaSource for CatalogRows {
    type Error = SchemaDiffError;

    fn load_schema(&self) -> Result<Schema> {
        self.to_schema(&PostgresDialect::new())
    }
}
