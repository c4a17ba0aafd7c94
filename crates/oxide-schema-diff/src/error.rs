//! Error types for schema diffing and rendering.

use crate::types::AbstractType;

/// A violation of the snapshot invariants, detected while building a
/// [`Schema`](crate::schema::Schema).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedSchema {
    /// Two tables share a name.
    #[error("Table '{0}' is defined more than once")]
    DuplicateTable(String),

    /// Two fields of the same table share a name.
    #[error("Field '{field}' is defined more than once in table '{table}'")]
    DuplicateField {
        /// Owning table.
        table: String,
        /// Repeated field name.
        field: String,
    },

    /// A length was given for a type that has no bounded length.
    #[error("Field '{table}.{field}' has a length but type {ty} is not length-bounded")]
    UnexpectedLength {
        /// Owning table.
        table: String,
        /// Field name.
        field: String,
        /// The field's abstract type.
        ty: AbstractType,
    },

    /// Two relationships share a constraint identifier.
    #[error("Constraint '{0}' is defined more than once")]
    DuplicateConstraint(String),

    /// A relationship names a table that is not in the snapshot.
    #[error("Constraint '{constraint}' refers to unknown table '{table}'")]
    UnknownTable {
        /// Constraint identifier.
        constraint: String,
        /// Missing table.
        table: String,
    },

    /// A relationship names a field that is not in its table.
    #[error("Constraint '{constraint}' refers to unknown field '{table}.{field}'")]
    UnknownField {
        /// Constraint identifier.
        constraint: String,
        /// Table that was searched.
        table: String,
        /// Missing field.
        field: String,
    },

    /// A relationship is stored on a table other than the one owning it.
    #[error("Constraint '{constraint}' is owned by '{owner}' but stored on table '{table}'")]
    MisplacedRelationship {
        /// Constraint identifier.
        constraint: String,
        /// Table named by the relationship.
        owner: String,
        /// Table that holds the relationship.
        table: String,
    },
}

/// Errors returned by schema diffing, type conversion and rendering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaDiffError {
    /// A type has no mapping in the dialect.
    #[error("Type '{name}' is not supported by the {dialect} dialect")]
    UnsupportedType {
        /// Dialect that rejected the type.
        dialect: &'static str,
        /// Abstract or dialect type name.
        name: String,
    },

    /// A snapshot violates its structural invariants.
    #[error("Malformed schema: {0}")]
    MalformedSchema(#[from] MalformedSchema),
}

impl SchemaDiffError {
    /// Creates an `UnsupportedType` error.
    #[must_use]
    pub fn unsupported_type(dialect: &'static str, name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            dialect,
            name: name.into(),
        }
    }
}

/// Result type for schema diff operations.
pub type Result<T> = std::result::Result<T, SchemaDiffError>;
