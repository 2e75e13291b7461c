use qualcode_protocol::{AnalysisDepth, AnalysisStage, CodingMode, TheoryParadigm};
use rmcp::schemars;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StageGuidanceRequest {
    #[schemars(description = "Project name (required, non-empty).")]
    pub project: String,

    #[schemars(description = "Analysis stage to fetch guidance for.")]
    pub stage: AnalysisStage,

    #[schemars(
        description = "Grounded-theory tradition: 'straussian' (default), 'glaserian' or 'constructivist'."
    )]
    pub paradigm: Option<TheoryParadigm>,

    #[schemars(description = "Analysis depth: 'surface', 'standard' (default) or 'deep'.")]
    pub depth: Option<AnalysisDepth>,

    #[schemars(
        description = "Coding mode: 'inductive' (default), 'deductive' or 'hybrid'."
    )]
    pub mode: Option<CodingMode>,

    #[schemars(
        description = "Prompt to extend with the guidance block (optional)."
    )]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageGuidanceResult {
    pub methodology: String,
    pub stage: AnalysisStage,
    pub guidance: Option<String>,
    /// Extra instructions derived from depth and coding mode
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}
