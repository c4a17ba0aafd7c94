//! Portable column types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dialect-independent column type.
///
/// Dialects map each variant to a concrete type name through
/// [`TypeConverter`](crate::convert::TypeConverter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AbstractType {
    /// 32-bit integer.
    Integer,
    /// 16-bit integer.
    SmallInteger,
    /// 64-bit integer.
    BigInteger,
    /// Exact decimal number.
    Decimal,
    /// Single precision floating point.
    Real,
    /// Double precision floating point.
    Double,
    /// Text without a length limit.
    UnlimitedText,
    /// Text with an optional maximum length.
    LimitedText,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp,
    /// Boolean.
    Boolean,
    /// Binary data.
    Binary,
    /// UUID.
    Uuid,
}

impl AbstractType {
    /// Every abstract type, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Integer,
        Self::SmallInteger,
        Self::BigInteger,
        Self::Decimal,
        Self::Real,
        Self::Double,
        Self::UnlimitedText,
        Self::LimitedText,
        Self::Date,
        Self::Time,
        Self::Timestamp,
        Self::Boolean,
        Self::Binary,
        Self::Uuid,
    ];

    /// Returns true if fields of this type may carry a length.
    #[must_use]
    pub const fn is_length_bounded(self) -> bool {
        matches!(self, Self::LimitedText)
    }

    /// Returns a human-readable name.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Integer => "Integer",
            Self::SmallInteger => "Small Integer",
            Self::BigInteger => "Big Integer",
            Self::Decimal => "Decimal",
            Self::Real => "Real",
            Self::Double => "Double",
            Self::UnlimitedText => "Unlimited Text",
            Self::LimitedText => "Limited Text",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Timestamp => "Timestamp",
            Self::Boolean => "Boolean",
            Self::Binary => "Binary",
            Self::Uuid => "UUID",
        }
    }
}

impl fmt::Display for AbstractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
