use crate::Database;
use crate::models::{WORKSPACE_COLUMNS, WorkspaceChanges, WorkspaceRow};
use crate::update::build_workspace_update;
use anyhow::{Result, bail};
use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;
use uuid::Uuid;

impl Database {
    // -- Workspaces --

    /// All workspaces, or only those created by `creator_id`. No ordering guarantee.
    pub fn list_workspaces(&self, creator_id: Option<&str>) -> Result<Vec<WorkspaceRow>> {
        self.with_conn(|conn| query_workspaces(conn, creator_id))
    }

    pub fn get_workspace(&self, id: &str) -> Result<Option<WorkspaceRow>> {
        self.with_conn(|conn| query_workspace_by_id(conn, id))
    }

    /// Insert a workspace and return its freshly assigned id.
    pub fn create_workspace(&self, name: &str, creator_id: Option<&str>) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = timestamp();

        self.with_conn_mut(|conn| {
            let id = conn.query_row(
                "INSERT INTO workspace (id, name, editor_id, creator_id, created_at, updated_at)
                 VALUES (?1, ?2, NULL, ?3, ?4, ?4)
                 RETURNING id",
                rusqlite::params![id, name, creator_id, now],
                |row| row.get::<_, String>(0),
            )?;
            Ok(id)
        })
    }

    /// Apply `changes` to one workspace. Returns `false` when no row has that id.
    pub fn update_workspace(&self, id: &str, changes: &WorkspaceChanges) -> Result<bool> {
        let Some(stmt) = build_workspace_update(id, changes, &timestamp()) else {
            bail!("No fields to update");
        };

        self.with_conn_mut(|conn| {
            let affected = conn.execute(stmt.sql(), stmt.named_params().as_slice())?;
            Ok(affected > 0)
        })
    }

    /// Delete one workspace, returning the id it had, or `None` if it did not exist.
    pub fn delete_workspace(&self, id: &str) -> Result<Option<String>> {
        self.with_conn_mut(|conn| {
            conn.query_row(
                "DELETE FROM workspace WHERE id = ?1 RETURNING id",
                [id],
                |row| row.get::<_, String>(0),
            )
            .optional()
        })
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn query_workspaces(conn: &Connection, creator_id: Option<&str>) -> Result<Vec<WorkspaceRow>> {
    let rows = match creator_id {
        Some(creator_id) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {WORKSPACE_COLUMNS} FROM workspace WHERE creator_id = :creator_id"
            ))?;
            stmt.query_map(&[(":creator_id", &creator_id)], WorkspaceRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare(&format!("SELECT {WORKSPACE_COLUMNS} FROM workspace"))?;
            stmt.query_map([], WorkspaceRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    Ok(rows)
}

fn query_workspace_by_id(conn: &Connection, id: &str) -> Result<Option<WorkspaceRow>> {
    let sql = format!("SELECT {WORKSPACE_COLUMNS} FROM workspace WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;

    stmt.query_row([id], WorkspaceRow::from_row).optional()
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
