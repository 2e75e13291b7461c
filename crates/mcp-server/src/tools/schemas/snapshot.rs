use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProjectSnapshotRequest {
    #[schemars(description = "Project name (required, non-empty).")]
    pub project: String,
}
