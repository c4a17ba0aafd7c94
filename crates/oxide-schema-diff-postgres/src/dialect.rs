//! PostgreSQL dialect.

use oxide_schema_diff::convert::{TypeConverter, TypeMap};
use oxide_schema_diff::dialect::Dialect;
use oxide_schema_diff::error::Result;
use oxide_schema_diff::types::AbstractType;

const TYPE_NAMES: &[(AbstractType, &str)] = &[
    (AbstractType::Integer, "INT4"),
    (AbstractType::SmallInteger, "INT2"),
    (AbstractType::BigInteger, "INT8"),
    (AbstractType::Decimal, "DECIMAL"),
    (AbstractType::Real, "REAL"),
    (AbstractType::Double, "DOUBLE PRECISION"),
    (AbstractType::UnlimitedText, "TEXT"),
    (AbstractType::LimitedText, "VARCHAR"),
    (AbstractType::Date, "DATE"),
    (AbstractType::Time, "TIME"),
    (AbstractType::Timestamp, "TIMESTAMP"),
    (AbstractType::Boolean, "BOOLEAN"),
    (AbstractType::Binary, "BYTEA"),
    (AbstractType::Uuid, "UUID"),
];

// `udt_name` spellings from information_schema plus the SQL-standard names.
const SYNONYMS: &[(&str, &str)] = &[
    ("NUMERIC", "DECIMAL"),
    ("TIMESTAMPTZ", "TIMESTAMP"),
    ("TIMESTAMP WITHOUT TIME ZONE", "TIMESTAMP"),
    ("TIMESTAMP WITH TIME ZONE", "TIMESTAMP"),
    ("TIME WITHOUT TIME ZONE", "TIME"),
    ("TIMETZ", "TIME"),
    ("TIME WITH TIME ZONE", "TIME"),
    ("INTEGER", "INT4"),
    ("SMALLINT", "INT2"),
    ("BIGINT", "INT8"),
    ("FLOAT4", "REAL"),
    ("FLOAT8", "DOUBLE PRECISION"),
    ("BOOL", "BOOLEAN"),
    ("CHARACTER VARYING", "VARCHAR"),
];

const TYPES: TypeMap = TypeMap::new("postgresql", TYPE_NAMES, SYNONYMS);

/// PostgreSQL type names and identifier quoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TypeConverter for PostgresDialect {
    fn to_dialect(&self, ty: AbstractType) -> Result<&str> {
        TYPES.name_of(ty)
    }

    fn to_abstract(&self, name: &str) -> Result<AbstractType> {
        TYPES.parse(name)
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }
}
