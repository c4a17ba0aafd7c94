//! Database dialects.
//!
//! A dialect combines a [`TypeConverter`] with the identifier quoting rules
//! of one database system. The renderer only talks to dialects through this
//! trait.

mod generic;

pub use generic::GenericDialect;

use crate::convert::TypeConverter;
use crate::error::Result;
use crate::types::AbstractType;

/// Trait for database-specific naming and type rules.
pub trait Dialect: TypeConverter {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn quote_char(&self) -> char {
        '"'
    }

    /// Quotes an identifier (table, field or constraint name).
    ///
    /// Embedded quote characters are doubled.
    fn quote_identifier(&self, name: &str) -> String {
        let q = self.quote_char();
        let escaped = name.replace(q, &format!("{q}{q}"));
        format!("{q}{escaped}{q}")
    }

    /// Returns the type name for a column, with its length when present.
    ///
    /// # Errors
    ///
    /// Propagates [`UnsupportedType`](crate::error::SchemaDiffError::UnsupportedType)
    /// from the type converter.
    fn column_type(&self, ty: AbstractType, length: Option<u32>) -> Result<String> {
        let name = self.to_dialect(ty)?;
        Ok(match length {
            Some(len) => format!("{name}({len})"),
            None => name.to_string(),
        })
    }

    /// Returns the name the database gives a table's primary key constraint.
    fn primary_key_constraint_name(&self, table: &str) -> String {
        format!("{table}_pkey")
    }
}
