//! Mapping between abstract types and dialect type names.

use crate::error::{Result, SchemaDiffError};
use crate::types::AbstractType;

/// Bidirectional mapping between [`AbstractType`] and a dialect's type names.
pub trait TypeConverter {
    /// Returns the dialect type name for an abstract type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDiffError::UnsupportedType`] if the dialect has no
    /// mapping for `ty`.
    fn to_dialect(&self, ty: AbstractType) -> Result<&str>;

    /// Parses a dialect type name, accepting known synonyms and ignoring
    /// ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDiffError::UnsupportedType`] if the name is unknown.
    fn to_abstract(&self, name: &str) -> Result<AbstractType>;
}

/// A static type table shared by the shipped dialects.
///
/// `names` holds the canonical spelling for each abstract type. `synonyms`
/// maps alternative spellings to a canonical name and is consulted before
/// the reverse lookup.
#[derive(Debug, Clone, Copy)]
pub struct TypeMap {
    dialect: &'static str,
    names: &'static [(AbstractType, &'static str)],
    synonyms: &'static [(&'static str, &'static str)],
}

impl TypeMap {
    /// Creates a type table for `dialect`.
    #[must_use]
    pub const fn new(
        dialect: &'static str,
        names: &'static [(AbstractType, &'static str)],
        synonyms: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            dialect,
            names,
            synonyms,
        }
    }

    /// Canonical name for `ty`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDiffError::UnsupportedType`] if `ty` is not in the table.
    pub fn name_of(&self, ty: AbstractType) -> Result<&'static str> {
        self.names
            .iter()
            .find(|(t, _)| *t == ty)
            .map(|(_, name)| *name)
            .ok_or_else(|| SchemaDiffError::unsupported_type(self.dialect, ty.to_string()))
    }

    /// Abstract type for a dialect type name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDiffError::UnsupportedType`] if neither a synonym nor
    /// a canonical name matches.
    pub fn parse(&self, name: &str) -> Result<AbstractType> {
        let trimmed = name.trim();
        let canonical = self
            .synonyms
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
            .map_or(trimmed, |(_, canonical)| *canonical);

        self.names
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(canonical))
            .map(|(ty, _)| *ty)
            .ok_or_else(|| SchemaDiffError::unsupported_type(self.dialect, name))
    }
}
