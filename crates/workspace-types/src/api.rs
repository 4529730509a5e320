use serde::{Deserialize, Serialize};

use crate::patch::Patch;

// -- Workspaces --

#[derive(Debug, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
    #[serde(default)]
    pub creator_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWorkspaceResponse {
    pub id: String,
}

/// Body of `PATCH /api/v1/workspace/{id}`. Keys outside this struct are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWorkspaceRequest {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub editor_id: Patch<String>,
}

impl UpdateWorkspaceRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_absent() && self.editor_id.is_absent()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteWorkspaceResponse {
    pub deleted_id: String,
}

#[derive(Debug, Default)]
pub struct ListWorkspacesQuery {
    pub creator_id: Option<String>,
}

impl ListWorkspacesQuery {
    /// Build from decoded query pairs. A repeated key keeps its first value;
    /// unrelated keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let creator_id = pairs
            .into_iter()
            .find(|(key, _)| key == "creator_id")
            .map(|(_, value)| value);
        Self { creator_id }
    }

    /// `?creator_id=` with an empty value means no filter.
    pub fn creator_filter(&self) -> Option<&str> {
        self.creator_id.as_deref().filter(|c| !c.is_empty())
    }
}

// -- Service --

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Up,
    Down,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthState,
    pub message: String,
}
