//! DDL rendering.
//!
//! Turns an ordered action list into `;`-terminated statements, one per line,
//! in the same order. Identifiers are quoted by the dialect and type names come
//! from its [`TypeConverter`](crate::convert::TypeConverter).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::actions::{Action, FieldChange, RelationshipChange};
use crate::dialect::Dialect;
use crate::error::Result;

/// Options controlling the rendered DDL.
///
/// The defaults produce the plain statement set; each flag opts into one
/// extra behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Emit `ADD CONSTRAINT <name> FOREIGN KEY` so created foreign keys keep
    /// their identifier.
    ///
    /// A foreign key created under a name that a later action drops from the
    /// same table is rendered as the drop followed by the add, and the later
    /// drop renders nothing.
    pub name_foreign_keys: bool,
    /// Drop the primary key constraint when a field loses its primary-key
    /// flag. Without it that change renders nothing.
    pub drop_primary_keys: bool,
}

impl RenderOptions {
    /// Creates the default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name_foreign_keys: false,
            drop_primary_keys: false,
        }
    }

    /// Sets whether created foreign keys are named.
    #[must_use]
    pub const fn with_named_foreign_keys(mut self, enabled: bool) -> Self {
        self.name_foreign_keys = enabled;
        self
    }

    /// Sets whether a lost primary key drops its constraint.
    #[must_use]
    pub const fn with_drop_primary_keys(mut self, enabled: bool) -> Self {
        self.drop_primary_keys = enabled;
        self
    }
}

/// Renders actions as DDL for one dialect.
#[derive(Debug)]
pub struct Renderer<'a, D: Dialect + ?Sized> {
    dialect: &'a D,
    options: RenderOptions,
}

impl<'a, D: Dialect + ?Sized> Renderer<'a, D> {
    /// Creates a renderer with default options.
    #[must_use]
    pub const fn new(dialect: &'a D) -> Self {
        Self {
            dialect,
            options: RenderOptions::new(),
        }
    }

    /// Replaces the render options.
    #[must_use]
    pub const fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the active options.
    #[must_use]
    pub const fn options(&self) -> RenderOptions {
        self.options
    }

    /// Renders all actions, joining statements with `\n`.
    ///
    /// Actions that produce no statement contribute no line.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedType`](crate::error::SchemaDiffError::UnsupportedType)
    /// if a field type has no name in the dialect.
    pub fn render(&self, actions: &[Action]) -> Result<String> {
        let replaced = if self.options.name_foreign_keys {
            ReplacedForeignKeys::find(actions)
        } else {
            ReplacedForeignKeys::default()
        };

        let mut lines = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter().enumerate() {
            let statements = match action {
                Action::CreateRelationship(change) if replaced.is_replaced(change) => vec![
                    self.drop_constraint(&change.table, &change.constraint),
                    self.add_foreign_key(change),
                ],
                Action::DeleteRelationship(_) if replaced.drops.contains(&index) => Vec::new(),
                _ => self.statements(action)?,
            };
            trace!(
                kind = ?action.kind(),
                subject = action.subject(),
                statements = statements.len(),
                "Rendered action"
            );
            lines.extend(statements);
        }
        debug!(
            dialect = self.dialect.name(),
            actions = actions.len(),
            statements = lines.len(),
            replaced_foreign_keys = replaced.keys.len(),
            "Rendered DDL"
        );
        Ok(lines.join("\n"))
    }

    /// Renders one action into its statements.
    ///
    /// The action is rendered on its own, so a named foreign key that
    /// replaces a dropped one is not detected here; use
    /// [`render`](Self::render) for a whole list.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedType`](crate::error::SchemaDiffError::UnsupportedType)
    /// if a field type has no name in the dialect.
    pub fn statements(&self, action: &Action) -> Result<Vec<String>> {
        Ok(match action {
            Action::CreateTable { table } => {
                vec![format!("CREATE TABLE {}();", self.quote(table))]
            }
            Action::DeleteTable { table } => {
                vec![format!("DROP TABLE {};", self.quote(table))]
            }
            Action::CreateField(change) => self.create_field(change)?,
            Action::UpdateType(change) => self.update_type(change)?,
            Action::CreateRelationship(change) => vec![self.add_foreign_key(change)],
            Action::DeleteRelationship(change) => {
                vec![self.drop_constraint(&change.table, &change.constraint)]
            }
            Action::DeleteField(change) => vec![format!(
                "ALTER TABLE {} DROP COLUMN {};",
                self.quote(&change.table),
                self.quote(&change.field)
            )],
        })
    }

    fn quote(&self, name: &str) -> String {
        self.dialect.quote_identifier(name)
    }

    fn create_field(&self, change: &FieldChange) -> Result<Vec<String>> {
        let column_type = self
            .dialect
            .column_type(change.after_type, change.after_length)?;
        let mut statements = vec![format!(
            "ALTER TABLE {} ADD COLUMN {} {column_type};",
            self.quote(&change.table),
            self.quote(&change.field)
        )];
        if change.is_primary_key {
            statements.push(self.add_primary_key(change));
        }
        Ok(statements)
    }

    fn update_type(&self, change: &FieldChange) -> Result<Vec<String>> {
        let mut statements = Vec::new();
        if change.type_changed() {
            let column_type = self
                .dialect
                .column_type(change.after_type, change.after_length)?;
            statements.push(format!(
                "ALTER TABLE {} ALTER COLUMN {} TYPE {column_type};",
                self.quote(&change.table),
                self.quote(&change.field)
            ));
        }
        if change.gains_primary_key() {
            statements.push(self.add_primary_key(change));
        } else if change.loses_primary_key() && self.options.drop_primary_keys {
            statements.push(format!(
                "ALTER TABLE {} DROP CONSTRAINT {};",
                self.quote(&change.table),
                self.quote(&self.dialect.primary_key_constraint_name(&change.table))
            ));
        }
        Ok(statements)
    }

    fn drop_constraint(&self, table: &str, constraint: &str) -> String {
        format!(
            "ALTER TABLE {} DROP CONSTRAINT {};",
            self.quote(table),
            self.quote(constraint)
        )
    }

    fn add_primary_key(&self, change: &FieldChange) -> String {
        format!(
            "ALTER TABLE {} ADD PRIMARY KEY ({});",
            self.quote(&change.table),
            self.quote(&change.field)
        )
    }

    fn add_foreign_key(&self, change: &RelationshipChange) -> String {
        let constraint = if self.options.name_foreign_keys {
            format!("CONSTRAINT {} ", self.quote(&change.constraint))
        } else {
            String::new()
        };
        format!(
            "ALTER TABLE {} ADD {constraint}FOREIGN KEY ({}) REFERENCES {}({});",
            self.quote(&change.table),
            self.quote(&change.field),
            self.quote(&change.referenced_table),
            self.quote(&change.referenced_field)
        )
    }
}

/// Foreign keys created under a `(table, constraint)` name that a later
/// action in the same list drops.
#[derive(Debug, Default)]
struct ReplacedForeignKeys<'a> {
    keys: BTreeSet<(&'a str, &'a str)>,
    /// Indices of the drops folded into the matching create.
    drops: BTreeSet<usize>,
}

impl<'a> ReplacedForeignKeys<'a> {
    fn find(actions: &'a [Action]) -> Self {
        let mut created = BTreeSet::new();
        let mut replaced = Self::default();
        for (index, action) in actions.iter().enumerate() {
            match action {
                Action::CreateRelationship(change) => {
                    created.insert((change.table.as_str(), change.constraint.as_str()));
                }
                Action::DeleteRelationship(change) => {
                    let key = (change.table.as_str(), change.constraint.as_str());
                    if created.contains(&key) && replaced.keys.insert(key) {
                        replaced.drops.insert(index);
                    }
                }
                _ => {}
            }
        }
        replaced
    }

    fn is_replaced(&self, change: &RelationshipChange) -> bool {
        self.keys
            .contains(&(change.table.as_str(), change.constraint.as_str()))
    }
}

/// Renders `actions` for `dialect` with default options.
///
/// # Errors
///
/// Returns [`UnsupportedType`](crate::error::SchemaDiffError::UnsupportedType)
/// if a field type has no name in the dialect.
pub fn render<D: Dialect + ?Sized>(actions: &[Action], dialect: &D) -> Result<String> {
    Renderer::new(dialect).render(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::TypeConverter;
    use crate::dialect::GenericDialect;
    use crate::error::SchemaDiffError;
    use crate::schema::{Field, Relationship};
    use crate::types::AbstractType;

    fn field(name: &str, ty: AbstractType) -> Field {
        Field::new(name, ty)
    }

    fn fk() -> RelationshipChange {
        RelationshipChange::from(&Relationship::new(
            "fk_orders_user",
            "Orders",
            "user_id",
            "Users",
            "id",
        ))
    }

    fn render_one(action: &Action) -> String {
        render(std::slice::from_ref(action), &GenericDialect::new()).unwrap()
    }

    #[test]
    fn test_create_and_drop_table() {
        assert_eq!(
            render_one(&Action::create_table("Users")),
            "CREATE TABLE \"Users\"();"
        );
        assert_eq!(
            render_one(&Action::delete_table("Users")),
            "DROP TABLE \"Users\";"
        );
    }

    #[test]
    fn test_create_field_with_length() {
        let name = field("name", AbstractType::LimitedText).with_length(10);
        let action = Action::CreateField(FieldChange::unchanged("t", &name));
        assert_eq!(
            render_one(&action),
            "ALTER TABLE \"t\" ADD COLUMN \"name\" VARCHAR(10);"
        );
    }

    #[test]
    fn test_create_primary_key_field() {
        let id = field("id", AbstractType::Integer).primary_key();
        let action = Action::CreateField(FieldChange::unchanged("t", &id));
        assert_eq!(
            render_one(&action),
            "ALTER TABLE \"t\" ADD COLUMN \"id\" INTEGER;\n\
             ALTER TABLE \"t\" ADD PRIMARY KEY (\"id\");"
        );
    }

    #[test]
    fn test_update_type_only_type() {
        let before = field("n", AbstractType::Integer);
        let after = field("n", AbstractType::BigInteger);
        let action = Action::UpdateType(FieldChange::between("t", &before, &after));
        assert_eq!(
            render_one(&action),
            "ALTER TABLE \"t\" ALTER COLUMN \"n\" TYPE BIGINT;"
        );
    }

    #[test]
    fn test_update_type_only_primary_key() {
        let before = field("n", AbstractType::Integer);
        let after = field("n", AbstractType::Integer).primary_key();
        let action = Action::UpdateType(FieldChange::between("t", &before, &after));
        assert_eq!(
            render_one(&action),
            "ALTER TABLE \"t\" ADD PRIMARY KEY (\"n\");"
        );
    }

    #[test]
    fn test_lost_primary_key_renders_nothing_by_default() {
        let before = field("n", AbstractType::Integer).primary_key();
        let after = field("n", AbstractType::Integer);
        let actions = [
            Action::create_table("a"),
            Action::UpdateType(FieldChange::between("t", &before, &after)),
            Action::delete_table("b"),
        ];
        let sql = render(&actions, &GenericDialect::new()).unwrap();
        assert_eq!(sql, "CREATE TABLE \"a\"();\nDROP TABLE \"b\";");
    }

    #[test]
    fn test_lost_primary_key_with_drop_option() {
        let before = field("n", AbstractType::Integer).primary_key();
        let after = field("n", AbstractType::Integer);
        let action = Action::UpdateType(FieldChange::between("t", &before, &after));
        let dialect = GenericDialect::new();
        let renderer = Renderer::new(&dialect)
            .with_options(RenderOptions::new().with_drop_primary_keys(true));
        assert_eq!(
            renderer.render(&[action]).unwrap(),
            "ALTER TABLE \"t\" DROP CONSTRAINT \"t_pkey\";"
        );
    }

    #[test]
    fn test_foreign_keys() {
        assert_eq!(
            render_one(&Action::CreateRelationship(fk())),
            "ALTER TABLE \"Orders\" ADD FOREIGN KEY (\"user_id\") REFERENCES \"Users\"(\"id\");"
        );
        assert_eq!(
            render_one(&Action::DeleteRelationship(fk())),
            "ALTER TABLE \"Orders\" DROP CONSTRAINT \"fk_orders_user\";"
        );
    }

    #[test]
    fn test_named_foreign_key_option() {
        let dialect = GenericDialect::new();
        let renderer = Renderer::new(&dialect)
            .with_options(RenderOptions::new().with_named_foreign_keys(true));
        assert_eq!(
            renderer.render(&[Action::CreateRelationship(fk())]).unwrap(),
            "ALTER TABLE \"Orders\" ADD CONSTRAINT \"fk_orders_user\" FOREIGN KEY (\"user_id\") REFERENCES \"Users\"(\"id\");"
        );
    }

    fn moved_foreign_key() -> [Action; 3] {
        let x = field("x", AbstractType::Integer);
        [
            Action::CreateRelationship(RelationshipChange::from(&Relationship::new(
                "R", "B", "w", "A", "y",
            ))),
            Action::DeleteRelationship(RelationshipChange::from(&Relationship::new(
                "R", "B", "x", "A", "y",
            ))),
            Action::DeleteField(FieldChange::unchanged("B", &x)),
        ]
    }

    #[test]
    fn test_named_foreign_key_replacing_dropped_one() {
        let dialect = GenericDialect::new();
        let renderer = Renderer::new(&dialect)
            .with_options(RenderOptions::new().with_named_foreign_keys(true));
        assert_eq!(
            renderer.render(&moved_foreign_key()).unwrap(),
            "ALTER TABLE \"B\" DROP CONSTRAINT \"R\";\n\
             ALTER TABLE \"B\" ADD CONSTRAINT \"R\" FOREIGN KEY (\"w\") REFERENCES \"A\"(\"y\");\n\
             ALTER TABLE \"B\" DROP COLUMN \"x\";"
        );
    }

    #[test]
    fn test_unnamed_foreign_key_keeps_action_order() {
        assert_eq!(
            render(&moved_foreign_key(), &GenericDialect::new()).unwrap(),
            "ALTER TABLE \"B\" ADD FOREIGN KEY (\"w\") REFERENCES \"A\"(\"y\");\n\
             ALTER TABLE \"B\" DROP CONSTRAINT \"R\";\n\
             ALTER TABLE \"B\" DROP COLUMN \"x\";"
        );
    }

    #[test]
    fn test_named_foreign_key_on_other_table_is_not_replaced() {
        let dialect = GenericDialect::new();
        let renderer = Renderer::new(&dialect)
            .with_options(RenderOptions::new().with_named_foreign_keys(true));
        let actions = [
            Action::CreateRelationship(RelationshipChange::from(&Relationship::new(
                "R", "C", "w", "A", "y",
            ))),
            Action::DeleteRelationship(RelationshipChange::from(&Relationship::new(
                "R", "B", "x", "A", "y",
            ))),
        ];
        assert_eq!(
            renderer.render(&actions).unwrap(),
            "ALTER TABLE \"C\" ADD CONSTRAINT \"R\" FOREIGN KEY (\"w\") REFERENCES \"A\"(\"y\");\n\
             ALTER TABLE \"B\" DROP CONSTRAINT \"R\";"
        );
    }

    #[test]
    fn test_drop_field() {
        let email = field("email", AbstractType::UnlimitedText);
        let action = Action::DeleteField(FieldChange::unchanged("Users", &email));
        assert_eq!(
            render_one(&action),
            "ALTER TABLE \"Users\" DROP COLUMN \"email\";"
        );
    }

    #[test]
    fn test_empty_action_list() {
        assert_eq!(render(&[], &GenericDialect::new()).unwrap(), "");
    }

    #[test]
    fn test_unsupported_type_propagates() {
        struct NoUuid;

        impl TypeConverter for NoUuid {
            fn to_dialect(&self, ty: AbstractType) -> Result<&str> {
                match ty {
                    AbstractType::Uuid => Err(SchemaDiffError::unsupported_type("nouuid", "UUID")),
                    _ => Ok("INTEGER"),
                }
            }

            fn to_abstract(&self, name: &str) -> Result<AbstractType> {
                Err(SchemaDiffError::unsupported_type("nouuid", name))
            }
        }

        impl Dialect for NoUuid {
            fn name(&self) -> &'static str {
                "nouuid"
            }
        }

        let id = field("id", AbstractType::Uuid);
        let action = Action::CreateField(FieldChange::unchanged("t", &id));
        let err = render(&[action], &NoUuid).unwrap_err();
        assert!(matches!(err, SchemaDiffError::UnsupportedType { .. }));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: RenderOptions =
            serde_json::from_str(r#"{"name_foreign_keys": true}"#).unwrap();
        assert!(options.name_foreign_keys);
        assert!(!options.drop_primary_keys);
        assert_eq!(
            serde_json::from_str::<RenderOptions>("{}").unwrap(),
            RenderOptions::default()
        );
    }
}
