//! UPDATE statement construction for partial workspace updates.
//!
//! Column names only ever come from [`WorkspaceColumn`]; every value, including
//! the target id, is bound through a named placeholder.

use rusqlite::types::{ToSql, Value};

use crate::models::WorkspaceChanges;

/// Columns a partial update is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceColumn {
    Name,
    EditorId,
}

impl WorkspaceColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkspaceColumn::Name => "name",
            WorkspaceColumn::EditorId => "editor_id",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            WorkspaceColumn::Name => ":name",
            WorkspaceColumn::EditorId => ":editor_id",
        }
    }
}

#[derive(Debug)]
pub struct UpdateStatement {
    sql: String,
    params: Vec<(&'static str, Value)>,
}

impl UpdateStatement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[cfg(test)]
    pub(crate) fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| *name != ":id" && *name != ":updated_at")
            .map(|name| name.trim_start_matches(':'))
    }

    /// Borrowed view in the shape `Connection::execute` accepts for named params.
    pub fn named_params(&self) -> Vec<(&str, &dyn ToSql)> {
        self.params
            .iter()
            .map(|(name, value)| (*name, value as &dyn ToSql))
            .collect()
    }
}

/// Build `UPDATE workspace SET ... WHERE id = :id` for the supplied changes.
///
/// `updated_at` is always refreshed alongside the changed columns. Returns
/// `None` when there is nothing to change.
pub fn build_workspace_update(
    id: &str,
    changes: &WorkspaceChanges,
    updated_at: &str,
) -> Option<UpdateStatement> {
    let mut sets: Vec<(WorkspaceColumn, Value)> = Vec::with_capacity(2);

    if let Some(name) = &changes.name {
        sets.push((WorkspaceColumn::Name, Value::Text(name.clone())));
    }
    if let Some(editor_id) = &changes.editor_id {
        let value = match editor_id {
            Some(editor) => Value::Text(editor.clone()),
            None => Value::Null,
        };
        sets.push((WorkspaceColumn::EditorId, value));
    }

    if sets.is_empty() {
        return None;
    }

    let mut assignments: Vec<String> = sets
        .iter()
        .map(|(col, _)| format!("{} = {}", col.as_str(), col.placeholder()))
        .collect();
    assignments.push("updated_at = :updated_at".to_string());

    let sql = format!(
        "UPDATE workspace SET {} WHERE id = :id",
        assignments.join(", ")
    );

    let mut params: Vec<(&'static str, Value)> = sets
        .into_iter()
        .map(|(col, value)| (col.placeholder(), value))
        .collect();
    params.push((":updated_at", Value::Text(updated_at.to_string())));
    params.push((":id", Value::Text(id.to_string())));

    Some(UpdateStatement { sql, params })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2024-01-01T00:00:00.000Z";

    #[test]
    fn test_empty_changes_build_nothing() {
        assert!(build_workspace_update("w1", &WorkspaceChanges::default(), NOW).is_none());
    }

    #[test]
    fn test_name_only() {
        let changes = WorkspaceChanges {
            name: Some("New".into()),
            editor_id: None,
        };
        let stmt = build_workspace_update("w1", &changes, NOW).unwrap();

        assert_eq!(
            stmt.sql(),
            "UPDATE workspace SET name = :name, updated_at = :updated_at WHERE id = :id"
        );
        assert_eq!(stmt.columns().collect::<Vec<_>>(), vec!["name"]);
        assert_eq!(stmt.named_params().len(), 3);
    }

    #[test]
    fn test_both_columns_in_fixed_order() {
        let changes = WorkspaceChanges {
            name: Some("New".into()),
            editor_id: Some(Some("u9".into())),
        };
        let stmt = build_workspace_update("w1", &changes, NOW).unwrap();

        assert_eq!(
            stmt.sql(),
            "UPDATE workspace SET name = :name, editor_id = :editor_id, \
             updated_at = :updated_at WHERE id = :id"
        );
        assert_eq!(stmt.columns().collect::<Vec<_>>(), vec!["name", "editor_id"]);
    }

    #[test]
    fn test_clearing_editor_binds_null() {
        let changes = WorkspaceChanges {
            name: None,
            editor_id: Some(None),
        };
        let stmt = build_workspace_update("w1", &changes, NOW).unwrap();

        assert_eq!(
            stmt.sql(),
            "UPDATE workspace SET editor_id = :editor_id, updated_at = :updated_at WHERE id = :id"
        );
        assert_eq!(stmt.params[0], (":editor_id", Value::Null));
    }

    #[test]
    fn test_values_never_reach_the_sql_text() {
        let hostile = "x'; DROP TABLE workspace; --";
        let changes = WorkspaceChanges {
            name: Some(hostile.into()),
            editor_id: None,
        };
        let stmt = build_workspace_update(hostile, &changes, NOW).unwrap();

        assert!(!stmt.sql().contains("DROP"));
        assert!(stmt.params.contains(&(":id", Value::Text(hostile.to_string()))));
    }
}
