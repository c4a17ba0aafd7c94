#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use oxide_schema_diff::{
    AbstractType, Action, Field, FieldChange, Relationship, Schema, SchemaBuilder, Table,
};

pub fn int(name: &str) -> Field {
    Field::new(name, AbstractType::Integer)
}

pub fn pk(name: &str) -> Field {
    int(name).primary_key()
}

pub fn varchar(name: &str, length: u32) -> Field {
    Field::new(name, AbstractType::LimitedText).with_length(length)
}

pub fn schema(tables: impl IntoIterator<Item = Table>) -> Schema {
    tables
        .into_iter()
        .fold(Schema::builder(), SchemaBuilder::table)
        .build()
        .unwrap_or_else(|e| panic!("Invalid test schema: {e}"))
}

/// `{Users(id PK)}`
pub fn users_only() -> Schema {
    schema([Table::new("Users").field(pk("id"))])
}

/// `{Users(id PK), Orders(id PK, user_id, FK user_id -> Users.id)}`
pub fn users_and_orders() -> Schema {
    schema([
        Table::new("Users").field(pk("id")),
        Table::new("Orders")
            .field(pk("id"))
            .field(int("user_id"))
            .foreign_key("fk_orders_user", "user_id", "Users", "id"),
    ])
}

#[derive(Debug, Default)]
struct TableModel {
    fields: Vec<Field>,
    relationships: Vec<Relationship>,
}

fn field_from(change: &FieldChange) -> Field {
    let field = Field::new(change.field.as_str(), change.after_type);
    let field = match change.after_length {
        Some(len) => field.with_length(len),
        None => field,
    };
    if change.is_primary_key {
        field.primary_key()
    } else {
        field
    }
}

/// Applies actions to a snapshot the way a database executes the DDL
/// rendered with named foreign keys.
///
/// Constraint names are unique per table and a drop matches on the name
/// only. A foreign key created under a name that a later action drops from
/// the same table replaces the old key in place, and that later drop is
/// skipped.
pub fn apply(base: &Schema, actions: &[Action]) -> Schema {
    let mut tables: BTreeMap<String, TableModel> = base
        .tables()
        .map(|t| {
            (
                t.name().to_string(),
                TableModel {
                    fields: t.fields().to_vec(),
                    relationships: t.relationships().to_vec(),
                },
            )
        })
        .collect();

    let mut created = BTreeSet::new();
    let mut replaced = BTreeSet::new();
    let mut skipped_drops = BTreeSet::new();
    for (index, action) in actions.iter().enumerate() {
        match action {
            Action::CreateRelationship(change) => {
                created.insert((change.table.as_str(), change.constraint.as_str()));
            }
            Action::DeleteRelationship(change) => {
                let key = (change.table.as_str(), change.constraint.as_str());
                if created.contains(&key) && replaced.insert(key) {
                    skipped_drops.insert(index);
                }
            }
            _ => {}
        }
    }

    for (index, action) in actions.iter().enumerate() {
        match action {
            Action::CreateTable { table } => {
                assert!(
                    tables.insert(table.clone(), TableModel::default()).is_none(),
                    "Table {table} already exists"
                );
            }
            Action::DeleteTable { table } => {
                let model = tables
                    .remove(table)
                    .unwrap_or_else(|| panic!("Missing table {table}"));
                assert!(
                    model.relationships.is_empty(),
                    "Table {table} dropped while it still owns relationships"
                );
            }
            Action::CreateField(change) => {
                table_mut(&mut tables, &change.table)
                    .fields
                    .push(field_from(change));
            }
            Action::UpdateType(change) => {
                let model = table_mut(&mut tables, &change.table);
                let slot = model
                    .fields
                    .iter_mut()
                    .find(|f| f.name() == change.field)
                    .unwrap_or_else(|| panic!("Missing field {}", change.field));
                *slot = field_from(change);
            }
            Action::DeleteField(change) => {
                let model = table_mut(&mut tables, &change.table);
                let before = model.fields.len();
                model.fields.retain(|f| f.name() != change.field);
                assert_eq!(before - 1, model.fields.len(), "Missing field {}", change.field);
            }
            Action::CreateRelationship(change) => {
                let key = (change.table.as_str(), change.constraint.as_str());
                let model = table_mut(&mut tables, &change.table);
                if replaced.contains(&key) {
                    drop_constraint(model, &change.table, &change.constraint);
                }
                assert!(
                    model
                        .relationships
                        .iter()
                        .all(|r| r.constraint() != change.constraint),
                    "Constraint {} already exists on table {}",
                    change.constraint,
                    change.table
                );
                model.relationships.push(Relationship::new(
                    change.constraint.as_str(),
                    change.table.as_str(),
                    change.field.as_str(),
                    change.referenced_table.as_str(),
                    change.referenced_field.as_str(),
                ));
            }
            Action::DeleteRelationship(change) => {
                if !skipped_drops.contains(&index) {
                    let model = table_mut(&mut tables, &change.table);
                    drop_constraint(model, &change.table, &change.constraint);
                }
            }
        }
    }

    schema(tables.into_iter().map(|(name, model)| {
        let table = model.fields.into_iter().fold(Table::new(name), Table::field);
        model
            .relationships
            .into_iter()
            .fold(table, Table::relationship)
    }))
}

fn table_mut<'a>(tables: &'a mut BTreeMap<String, TableModel>, name: &str) -> &'a mut TableModel {
    tables
        .get_mut(name)
        .unwrap_or_else(|| panic!("Missing table {name}"))
}

fn drop_constraint(model: &mut TableModel, table: &str, constraint: &str) {
    let before = model.relationships.len();
    model.relationships.retain(|r| r.constraint() != constraint);
    assert_eq!(
        before,
        model.relationships.len() + 1,
        "Missing constraint {constraint} on table {table}"
    );
}
