//! Generic SQL dialect.

use super::Dialect;
use crate::convert::{TypeConverter, TypeMap};
use crate::error::Result;
use crate::types::AbstractType;

const TYPE_NAMES: &[(AbstractType, &str)] = &[
    (AbstractType::Integer, "INTEGER"),
    (AbstractType::SmallInteger, "SMALLINT"),
    (AbstractType::BigInteger, "BIGINT"),
    (AbstractType::Decimal, "DECIMAL"),
    (AbstractType::Real, "REAL"),
    (AbstractType::Double, "DOUBLE PRECISION"),
    (AbstractType::UnlimitedText, "TEXT"),
    (AbstractType::LimitedText, "VARCHAR"),
    (AbstractType::Date, "DATE"),
    (AbstractType::Time, "TIME"),
    (AbstractType::Timestamp, "TIMESTAMP"),
    (AbstractType::Boolean, "BOOLEAN"),
    (AbstractType::Binary, "BLOB"),
    (AbstractType::Uuid, "UUID"),
];

const SYNONYMS: &[(&str, &str)] = &[
    ("INT", "INTEGER"),
    ("NUMERIC", "DECIMAL"),
    ("FLOAT", "DOUBLE PRECISION"),
    ("CHARACTER VARYING", "VARCHAR"),
    ("BINARY LARGE OBJECT", "BLOB"),
];

const TYPES: TypeMap = TypeMap::new("generic", TYPE_NAMES, SYNONYMS);

/// A generic SQL dialect using ANSI type names and double-quoted identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TypeConverter for GenericDialect {
    fn to_dialect(&self, ty: AbstractType) -> Result<&str> {
        TYPES.name_of(ty)
    }

    fn to_abstract(&self, name: &str) -> Result<AbstractType> {
        TYPES.parse(name)
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }
}
