//! Schema diff engine.
//!
//! Compares a "current" and a "target" [`Schema`] and produces the ordered
//! list of [`Action`]s that turns the first into the second.
//!
//! Tables and fields are matched by name, relationships by constraint
//! identifier. Renames are never detected: a renamed table or field shows up
//! as an unrelated delete and create. A relationship whose identifier is kept
//! but whose columns change is not reported either.
//!
//! When a table or field disappears, every current relationship touching it
//! is dropped as well, even if a relationship with the same identifier exists
//! in the target. Such a relationship is then created again from its target
//! definition.
//!
//! The result is ordered by [`ActionKind::priority`]:
//! CreateTable < CreateField < UpdateType < CreateRelationship <
//! DeleteRelationship < DeleteField < DeleteTable.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, trace};

use crate::actions::{Action, ActionKind, FieldChange, RelationshipChange};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::render::Renderer;
use crate::schema::{Field, Relationship, Schema, Table};

/// Ordered result of comparing two snapshots.
///
/// The action list is read-only; its order is the execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaDiff {
    actions: Vec<Action>,
}

impl SchemaDiff {
    /// Compares `current` against `target`. Same as [`diff`].
    #[must_use]
    pub fn between(current: &Schema, target: &Schema) -> Self {
        diff(current, target)
    }

    /// Actions in execution order.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Consumes the diff and returns its actions.
    #[must_use]
    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }

    /// Returns true if the snapshots are equivalent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Iterates over the actions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    /// Number of actions of the given kind.
    #[must_use]
    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions.iter().filter(|a| a.kind() == kind).count()
    }

    /// Renders the diff as DDL with default options.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedType`](crate::error::SchemaDiffError::UnsupportedType)
    /// if the dialect cannot name a field type.
    pub fn to_sql<D: Dialect + ?Sized>(&self, dialect: &D) -> Result<String> {
        Renderer::new(dialect).render(&self.actions)
    }
}

impl<'a> IntoIterator for &'a SchemaDiff {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

/// Tables and fields that the diff deletes.
#[derive(Debug, Default)]
struct Sentenced<'a> {
    tables: BTreeSet<&'a str>,
    fields: BTreeSet<(&'a str, &'a str)>,
}

impl Sentenced<'_> {
    fn touches(&self, rel: &Relationship) -> bool {
        self.tables.contains(rel.table())
            || self.tables.contains(rel.referenced_table())
            || self.fields.contains(&(rel.table(), rel.field()))
            || self
                .fields
                .contains(&(rel.referenced_table(), rel.referenced_field()))
    }
}

/// Compares two snapshots and returns the actions needed to transform
/// `current` into `target`.
#[must_use]
pub fn diff(current: &Schema, target: &Schema) -> SchemaDiff {
    let mut actions = Vec::new();
    let mut sentenced = Sentenced::default();

    for table in target.tables() {
        match current.table(table.name()) {
            None => {
                actions.push(Action::create_table(table.name()));
                actions.extend(
                    table
                        .fields()
                        .iter()
                        .map(|f| Action::CreateField(FieldChange::unchanged(table.name(), f))),
                );
            }
            Some(existing) => diff_fields(existing, table, &mut sentenced, &mut actions),
        }
    }

    for table in current.tables() {
        if !target.contains_table(table.name()) {
            sentenced.tables.insert(table.name());
            actions.push(Action::delete_table(table.name()));
        }
    }

    diff_relationships(current, target, &sentenced, &mut actions);

    // Stable: same-kind actions keep the order they were discovered in.
    actions.sort_by_key(|a| a.kind().priority());

    debug!(
        current_tables = current.len(),
        target_tables = target.len(),
        actions = actions.len(),
        deleted_tables = sentenced.tables.len(),
        deleted_fields = sentenced.fields.len(),
        "Computed schema diff"
    );
    for action in &actions {
        trace!(kind = ?action.kind(), table = action.table(), subject = action.subject(), "Diff action");
    }

    SchemaDiff { actions }
}

/// Compares the fields of a table present in both snapshots.
fn diff_fields<'a>(
    current: &'a Table,
    target: &Table,
    sentenced: &mut Sentenced<'a>,
    actions: &mut Vec<Action>,
) {
    let current_fields: BTreeMap<&str, &Field> =
        current.fields().iter().map(|f| (f.name(), f)).collect();
    let target_fields: BTreeMap<&str, &Field> =
        target.fields().iter().map(|f| (f.name(), f)).collect();

    for field in target.fields() {
        match current_fields.get(field.name()) {
            None => actions.push(Action::CreateField(FieldChange::unchanged(
                target.name(),
                field,
            ))),
            Some(before) if fields_differ(before, field) => actions.push(Action::UpdateType(
                FieldChange::between(target.name(), before, field),
            )),
            Some(_) => {}
        }
    }

    for field in current.fields() {
        if !target_fields.contains_key(field.name()) {
            sentenced.fields.insert((current.name(), field.name()));
            actions.push(Action::DeleteField(FieldChange::unchanged(
                current.name(),
                field,
            )));
        }
    }
}

fn fields_differ(a: &Field, b: &Field) -> bool {
    a.ty() != b.ty() || a.length() != b.length() || a.is_primary_key() != b.is_primary_key()
}

/// Compares relationships globally by constraint identifier.
fn diff_relationships(
    current: &Schema,
    target: &Schema,
    sentenced: &Sentenced<'_>,
    actions: &mut Vec<Action>,
) {
    let current_rels: BTreeMap<&str, &Relationship> =
        current.relationships().map(|r| (r.constraint(), r)).collect();
    let target_rels: BTreeMap<&str, &Relationship> =
        target.relationships().map(|r| (r.constraint(), r)).collect();

    // Keyed by constraint, so each constraint is dropped at most once even
    // when it is both missing from the target and touches a deleted part.
    let dropped: BTreeMap<&str, &Relationship> = current_rels
        .iter()
        .filter(|(name, rel)| !target_rels.contains_key(*name) || sentenced.touches(rel))
        .map(|(name, rel)| (*name, *rel))
        .collect();

    for (name, rel) in &target_rels {
        if !current_rels.contains_key(name) || dropped.contains_key(name) {
            actions.push(Action::CreateRelationship(RelationshipChange::from(*rel)));
        }
    }

    actions.extend(
        dropped
            .values()
            .map(|rel| Action::DeleteRelationship(RelationshipChange::from(*rel))),
    );
}
