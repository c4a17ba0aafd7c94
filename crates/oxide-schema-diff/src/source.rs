//! Schema source trait.
//!
//! Database-specific crates implement [`SchemaSource`] to turn whatever they
//! read from a catalog into a validated [`Schema`]. This crate only defines
//! the trait so it stays driver-agnostic.

use crate::schema::Schema;

/// Produces a [`Schema`] snapshot, typically from a live database.
pub trait SchemaSource {
    /// Error type for loading failures.
    type Error: std::error::Error;

    /// Reads the schema and returns a snapshot.
    fn load_schema(&self) -> Result<Schema, Self::Error>;
}

impl SchemaSource for Schema {
    type Error = std::convert::Infallible;

    fn load_schema(&self) -> Result<Schema, Self::Error> {
        Ok(self.clone())
    }
}
