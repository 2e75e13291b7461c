use rmcp::schemars;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BuildTheoryRequest {
    #[schemars(description = "Project name (required, non-empty).")]
    pub project: String,

    #[schemars(
        description = "Themes JSON: an array of themes or {\"themes\": [...]}. Defaults to the project's stored themes."
    )]
    pub themes: Option<serde_json::Value>,

    #[schemars(
        description = "Raw generative-service output containing the themes JSON (used when `themes` is absent)."
    )]
    pub raw_output: Option<String>,

    #[schemars(
        description = "Code id -> label map for classification context. Defaults to the project's stored codebook."
    )]
    pub code_labels: Option<HashMap<String, String>>,

    #[schemars(
        description = "Drafted theory text: {\"title\", \"novelty\", \"contribution\", \"practicalImplications\", \"futureResearch\", \"saturationReached\"}. Saturation defaults to the saturation heuristic over the themes."
    )]
    pub draft: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ValidateTheoryRequest {
    #[schemars(description = "Project name (required, non-empty).")]
    pub project: String,

    #[schemars(
        description = "Grounded theory JSON (as returned by build_theory). Defaults to the project's stored theory."
    )]
    pub theory: Option<serde_json::Value>,
}
