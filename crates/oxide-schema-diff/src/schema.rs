//! Schema snapshot types.
//!
//! A [`Schema`] is an immutable description of a database's tables, fields
//! and foreign-key relationships at one point in time. Snapshots are
//! assembled with [`SchemaBuilder`], which rejects inconsistent input, so
//! every `Schema` value that exists is well formed. Relationships refer to
//! their endpoints by name and are resolved against the owning snapshot.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{MalformedSchema, Result, SchemaDiffError};
use crate::types::AbstractType;

/// A column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    name: String,
    #[serde(rename = "type")]
    ty: AbstractType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    length: Option<u32>,
    #[serde(default)]
    primary_key: bool,
}

impl Field {
    /// Creates a new field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: AbstractType) -> Self {
        Self {
            name: name.into(),
            ty,
            length: None,
            primary_key: false,
        }
    }

    /// Sets the maximum length. Only valid for length-bounded types.
    #[must_use]
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Marks the field as the table's primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Abstract type.
    #[must_use]
    pub const fn ty(&self) -> AbstractType {
        self.ty
    }

    /// Maximum length, if any.
    #[must_use]
    pub const fn length(&self) -> Option<u32> {
        self.length
    }

    /// Whether the field is a primary key.
    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }
}

/// A foreign-key edge from one field to another.
///
/// The constraint identifier is unique across a snapshot and is the only
/// thing used to match relationships between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    constraint: String,
    table: String,
    field: String,
    referenced_table: String,
    referenced_field: String,
}

impl Relationship {
    /// Creates a relationship `table.field -> referenced_table.referenced_field`.
    #[must_use]
    pub fn new(
        constraint: impl Into<String>,
        table: impl Into<String>,
        field: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_field: impl Into<String>,
    ) -> Self {
        Self {
            constraint: constraint.into(),
            table: table.into(),
            field: field.into(),
            referenced_table: referenced_table.into(),
            referenced_field: referenced_field.into(),
        }
    }

    /// Constraint identifier.
    #[must_use]
    pub fn constraint(&self) -> &str {
        &self.constraint
    }

    /// Owning table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Owning field.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Referenced table.
    #[must_use]
    pub fn referenced_table(&self) -> &str {
        &self.referenced_table
    }

    /// Referenced field.
    #[must_use]
    pub fn referenced_field(&self) -> &str {
        &self.referenced_field
    }
}

/// A table with its fields and outgoing relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    #[serde(default)]
    fields: Vec<Field>,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

impl Table {
    /// Creates a new table with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a foreign key from `field` of this table to
    /// `referenced_table.referenced_field`.
    #[must_use]
    pub fn foreign_key(
        mut self,
        constraint: impl Into<String>,
        field: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_field: impl Into<String>,
    ) -> Self {
        let relationship = Relationship::new(
            constraint,
            self.name.clone(),
            field,
            referenced_table,
            referenced_field,
        );
        self.relationships.push(relationship);
        self
    }

    /// Adds a prebuilt relationship. Its owning table must be this table.
    #[must_use]
    pub fn relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Relationships whose source field belongs to this table.
    #[must_use]
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }
}

/// An immutable, validated schema snapshot.
///
/// Tables are keyed by name and iterate in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Table>", into = "Vec<Table>")]
pub struct Schema {
    tables: BTreeMap<String, Table>,
}

impl Schema {
    /// Starts building a snapshot.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Returns an empty snapshot.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Returns true if a table with this name exists.
    #[must_use]
    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Iterates over tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Iterates over table names in order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Iterates over every relationship of every table.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.tables.values().flat_map(|t| t.relationships.iter())
    }

    /// Number of tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if the snapshot has no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TryFrom<Vec<Table>> for Schema {
    type Error = SchemaDiffError;

    fn try_from(tables: Vec<Table>) -> Result<Self> {
        SchemaBuilder { tables }.build()
    }
}

impl From<Schema> for Vec<Table> {
    fn from(schema: Schema) -> Self {
        schema.tables.into_values().collect()
    }
}

/// Collects tables and validates them into a [`Schema`].
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    tables: Vec<Table>,
}

impl SchemaBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table.
    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Adds a table in place.
    pub fn push_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Validates the collected tables and produces a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDiffError::MalformedSchema`] if a name is repeated, a
    /// length is set on a type without one, or a relationship does not
    /// resolve inside this snapshot.
    pub fn build(self) -> Result<Schema> {
        let mut tables = BTreeMap::new();
        for table in self.tables {
            validate_fields(&table)?;
            if tables.contains_key(&table.name) {
                return Err(MalformedSchema::DuplicateTable(table.name).into());
            }
            tables.insert(table.name.clone(), table);
        }

        let mut constraints = BTreeSet::new();
        for table in tables.values() {
            for rel in &table.relationships {
                if rel.table != table.name {
                    return Err(MalformedSchema::MisplacedRelationship {
                        constraint: rel.constraint.clone(),
                        owner: rel.table.clone(),
                        table: table.name.clone(),
                    }
                    .into());
                }
                if !constraints.insert(rel.constraint.as_str()) {
                    return Err(MalformedSchema::DuplicateConstraint(rel.constraint.clone()).into());
                }
                resolve(&tables, &rel.constraint, &rel.table, &rel.field)?;
                resolve(
                    &tables,
                    &rel.constraint,
                    &rel.referenced_table,
                    &rel.referenced_field,
                )?;
            }
        }

        Ok(Schema { tables })
    }
}

fn validate_fields(table: &Table) -> Result<()> {
    let mut seen = BTreeSet::new();
    for field in &table.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(MalformedSchema::DuplicateField {
                table: table.name.clone(),
                field: field.name.clone(),
            }
            .into());
        }
        if field.length.is_some() && !field.ty.is_length_bounded() {
            return Err(MalformedSchema::UnexpectedLength {
                table: table.name.clone(),
                field: field.name.clone(),
                ty: field.ty,
            }
            .into());
        }
    }
    Ok(())
}

fn resolve(
    tables: &BTreeMap<String, Table>,
    constraint: &str,
    table: &str,
    field: &str,
) -> Result<()> {
    let Some(t) = tables.get(table) else {
        return Err(MalformedSchema::UnknownTable {
            constraint: constraint.to_string(),
            table: table.to_string(),
        }
        .into());
    };
    if t.get_field(field).is_none() {
        return Err(MalformedSchema::UnknownField {
            constraint: constraint.to_string(),
            table: table.to_string(),
            field: field.to_string(),
        }
        .into());
    }
    Ok(())
}
