use qualcode_analysis::{CodebookMetrics, QualityAssessment};
use rmcp::schemars;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ValidateCodebookRequest {
    #[schemars(description = "Project name (required, non-empty).")]
    pub project: String,

    #[schemars(
        description = "Codebook JSON: {\"codes\": [...], \"hierarchy\": {\"rootCodes\": [...], \"relationships\": {...}}}."
    )]
    pub codebook: Option<serde_json::Value>,

    #[schemars(
        description = "Raw generative-service output containing the codebook JSON (used when `codebook` is absent)."
    )]
    pub raw_output: Option<String>,

    /// Code count before refinement; feeds the redundancy metric
    #[schemars(
        description = "Number of codes before refinement (defaults to the refined count, i.e. zero redundancy)."
    )]
    pub initial_code_count: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCodebookResult {
    pub metrics: CodebookMetrics,
    pub assessment: QualityAssessment,
}
