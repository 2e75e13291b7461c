use rmcp::schemars;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct HierarchyDepthRequest {
    #[schemars(description = "Project name (required, non-empty).")]
    pub project: String,

    #[schemars(
        description = "Code hierarchy: {\"rootCodes\": [ids], \"relationships\": {parent: [children]}}."
    )]
    pub hierarchy: Option<serde_json::Value>,

    #[schemars(
        description = "Raw generative-service output containing the hierarchy JSON (used when `hierarchy` is absent)."
    )]
    pub raw_output: Option<String>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyDepthResult {
    pub depth: usize,
    /// Codes that appear in the relationships but cannot be reached from any root
    pub unreachable_codes: Vec<String>,
}
