//! Database row types. These map directly to SQLite rows and stay distinct
//! from the API models in workspace-types.

use rusqlite::Row;
use workspace_types::models::Workspace;

pub const WORKSPACE_COLUMNS: &str = "id, name, editor_id, creator_id, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRow {
    pub id: String,
    pub name: String,
    pub editor_id: Option<String>,
    pub creator_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl WorkspaceRow {
    /// Expects the columns in `WORKSPACE_COLUMNS` order.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            editor_id: row.get(2)?,
            creator_id: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl From<WorkspaceRow> for Workspace {
    fn from(row: WorkspaceRow) -> Self {
        Workspace {
            id: row.id,
            name: row.name,
            editor_id: row.editor_id,
            creator_id: row.creator_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Mutable columns of a workspace. `None` leaves the column untouched;
/// `editor_id: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceChanges {
    pub name: Option<String>,
    pub editor_id: Option<Option<String>>,
}

impl WorkspaceChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.editor_id.is_none()
    }
}
