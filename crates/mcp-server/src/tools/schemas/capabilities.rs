use qualcode_protocol::Capabilities;
use rmcp::schemars;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct CapabilitiesRequest {
    /// Optional project name, used in the suggested start route
    #[schemars(description = "Project name to use in the suggested start route (optional).")]
    pub project: Option<String>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct CapabilitiesResult {
    #[serde(flatten)]
    pub capabilities: Capabilities,
    pub data_dir: String,
}
