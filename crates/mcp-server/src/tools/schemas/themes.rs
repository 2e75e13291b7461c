use qualcode_analysis::{CategoryRelationship, ParadigmModel, RelationshipType};
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ValidateThemesRequest {
    #[schemars(description = "Project name (required, non-empty).")]
    pub project: String,

    #[schemars(description = "Themes JSON: an array of themes or {\"themes\": [...]}.")]
    pub themes: Option<serde_json::Value>,

    #[schemars(
        description = "Raw generative-service output containing the themes JSON (used when `themes` is absent)."
    )]
    pub raw_output: Option<String>,

    #[schemars(description = "Number of coded data points the themes should cover (> 0).")]
    pub expected_data_points: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClassifyParadigmRequest {
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
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyParadigmResult {
    pub paradigm_model: ParadigmModel,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InferRelationshipsRequest {
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
}

/// Unordered theme pair whose two directions got different relationship types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergentPair {
    pub a: String,
    pub b: String,
    pub forward: RelationshipType,
    pub reverse: RelationshipType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InferRelationshipsResult {
    pub relationships: Vec<CategoryRelationship>,
    pub divergent_pairs: Vec<DivergentPair>,
}
