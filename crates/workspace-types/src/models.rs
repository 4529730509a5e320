use serde::{Deserialize, Serialize};

/// A workspace as returned by the API.
///
/// Timestamps are RFC 3339 strings exactly as stored; the API never reparses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub editor_id: Option<String>,
    pub creator_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
