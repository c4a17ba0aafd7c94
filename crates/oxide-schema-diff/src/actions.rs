//! Schema-change actions.
//!
//! An [`Action`] is one instruction produced by the diff engine. Each
//! variant carries exactly the payload its renderer needs, so consumers
//! match exhaustively instead of inspecting optional fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{Field, Relationship};
use crate::types::AbstractType;

/// The seven kinds of action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Create an empty table.
    CreateTable,
    /// Add a field to a table.
    CreateField,
    /// Change a field's type, length or primary-key flag.
    UpdateType,
    /// Add a foreign key.
    CreateRelationship,
    /// Drop a foreign key.
    DeleteRelationship,
    /// Drop a field.
    DeleteField,
    /// Drop a table.
    DeleteTable,
}

impl ActionKind {
    /// Kinds in the order their actions must be executed.
    pub const EXECUTION_ORDER: [Self; 7] = [
        Self::CreateTable,
        Self::CreateField,
        Self::UpdateType,
        Self::CreateRelationship,
        Self::DeleteRelationship,
        Self::DeleteField,
        Self::DeleteTable,
    ];

    /// Sort key used to order a diff. Lower runs first.
    ///
    /// Tables exist before their fields, fields before the constraints that
    /// reference them, and constraints are dropped before the fields and
    /// tables they point at.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::CreateTable => 0,
            Self::CreateField => 10,
            Self::UpdateType => 20,
            Self::CreateRelationship => 30,
            Self::DeleteRelationship => 40,
            Self::DeleteField => 50,
            Self::DeleteTable => 60,
        }
    }
}

/// Payload of the field actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Owning table.
    pub table: String,
    /// Field name.
    pub field: String,
    /// Type before the change.
    pub before_type: AbstractType,
    /// Type after the change.
    pub after_type: AbstractType,
    /// Length before the change.
    pub before_length: Option<u32>,
    /// Length after the change.
    pub after_length: Option<u32>,
    /// Primary-key flag before the change.
    pub was_primary_key: bool,
    /// Primary-key flag after the change.
    pub is_primary_key: bool,
}

impl FieldChange {
    /// Describes a field that does not change, as used by create and delete.
    #[must_use]
    pub fn unchanged(table: impl Into<String>, field: &Field) -> Self {
        Self {
            table: table.into(),
            field: field.name().to_string(),
            before_type: field.ty(),
            after_type: field.ty(),
            before_length: field.length(),
            after_length: field.length(),
            was_primary_key: field.is_primary_key(),
            is_primary_key: field.is_primary_key(),
        }
    }

    /// Describes the transition from `before` to `after`.
    #[must_use]
    pub fn between(table: impl Into<String>, before: &Field, after: &Field) -> Self {
        Self {
            table: table.into(),
            field: after.name().to_string(),
            before_type: before.ty(),
            after_type: after.ty(),
            before_length: before.length(),
            after_length: after.length(),
            was_primary_key: before.is_primary_key(),
            is_primary_key: after.is_primary_key(),
        }
    }

    /// Returns true if the type or the length differs.
    #[must_use]
    pub fn type_changed(&self) -> bool {
        self.before_type != self.after_type || self.before_length != self.after_length
    }

    /// Returns true if the field becomes a primary key.
    #[must_use]
    pub const fn gains_primary_key(&self) -> bool {
        !self.was_primary_key && self.is_primary_key
    }

    /// Returns true if the field stops being a primary key.
    #[must_use]
    pub const fn loses_primary_key(&self) -> bool {
        self.was_primary_key && !self.is_primary_key
    }
}

/// Payload of the relationship actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipChange {
    /// Constraint identifier.
    pub constraint: String,
    /// Owning table.
    pub table: String,
    /// Owning field.
    pub field: String,
    /// Referenced table.
    pub referenced_table: String,
    /// Referenced field.
    pub referenced_field: String,
}

impl From<&Relationship> for RelationshipChange {
    fn from(rel: &Relationship) -> Self {
        Self {
            constraint: rel.constraint().to_string(),
            table: rel.table().to_string(),
            field: rel.field().to_string(),
            referenced_table: rel.referenced_table().to_string(),
            referenced_field: rel.referenced_field().to_string(),
        }
    }
}

/// A single schema change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Action {
    /// Create an empty table.
    CreateTable {
        /// Table name.
        table: String,
    },
    /// Add a field.
    CreateField(FieldChange),
    /// Alter a field's type or primary-key flag.
    UpdateType(FieldChange),
    /// Add a foreign key.
    CreateRelationship(RelationshipChange),
    /// Drop a foreign key.
    DeleteRelationship(RelationshipChange),
    /// Drop a field.
    DeleteField(FieldChange),
    /// Drop a table.
    DeleteTable {
        /// Table name.
        table: String,
    },
}

impl Action {
    /// Creates a `CreateTable` action.
    #[must_use]
    pub fn create_table(table: impl Into<String>) -> Self {
        Self::CreateTable {
            table: table.into(),
        }
    }

    /// Creates a `DeleteTable` action.
    #[must_use]
    pub fn delete_table(table: impl Into<String>) -> Self {
        Self::DeleteTable {
            table: table.into(),
        }
    }

    /// Returns the action's kind.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::CreateTable { .. } => ActionKind::CreateTable,
            Self::CreateField(_) => ActionKind::CreateField,
            Self::UpdateType(_) => ActionKind::UpdateType,
            Self::CreateRelationship(_) => ActionKind::CreateRelationship,
            Self::DeleteRelationship(_) => ActionKind::DeleteRelationship,
            Self::DeleteField(_) => ActionKind::DeleteField,
            Self::DeleteTable { .. } => ActionKind::DeleteTable,
        }
    }

    /// Returns the name the action is about: a table, field or constraint.
    #[must_use]
    pub fn subject(&self) -> &str {
        match self {
            Self::CreateTable { table } | Self::DeleteTable { table } => table.as_str(),
            Self::CreateField(change) | Self::UpdateType(change) | Self::DeleteField(change) => {
                change.field.as_str()
            }
            Self::CreateRelationship(change) | Self::DeleteRelationship(change) => {
                change.constraint.as_str()
            }
        }
    }

    /// Returns the table the action alters.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::CreateTable { table } | Self::DeleteTable { table } => table.as_str(),
            Self::CreateField(change) | Self::UpdateType(change) | Self::DeleteField(change) => {
                change.table.as_str()
            }
            Self::CreateRelationship(change) | Self::DeleteRelationship(change) => {
                change.table.as_str()
            }
        }
    }

    /// Returns the field payload, if any.
    #[must_use]
    pub const fn field_change(&self) -> Option<&FieldChange> {
        match self {
            Self::CreateField(change) | Self::UpdateType(change) | Self::DeleteField(change) => {
                Some(change)
            }
            _ => None,
        }
    }

    /// Returns the relationship payload, if any.
    #[must_use]
    pub const fn relationship_change(&self) -> Option<&RelationshipChange> {
        match self {
            Self::CreateRelationship(change) | Self::DeleteRelationship(change) => Some(change),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTable { table } => write!(f, "Create table '{table}'"),
            Self::DeleteTable { table } => write!(f, "Drop table '{table}'"),
            Self::CreateField(c) => {
                write!(f, "Add field '{}' to table '{}'", c.field, c.table)
            }
            Self::DeleteField(c) => {
                write!(f, "Drop field '{}' from table '{}'", c.field, c.table)
            }
            Self::UpdateType(c) => {
                write!(f, "Alter field '{}' in table '{}'", c.field, c.table)
            }
            Self::CreateRelationship(c) => write!(
                f,
                "Add foreign key '{}' on '{}.{}' referencing '{}.{}'",
                c.constraint, c.table, c.field, c.referenced_table, c.referenced_field
            ),
            Self::DeleteRelationship(c) => write!(
                f,
                "Drop foreign key '{}' from table '{}'",
                c.constraint, c.table
            ),
        }
    }
}
