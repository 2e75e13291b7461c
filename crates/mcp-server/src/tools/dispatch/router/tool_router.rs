use super::super::{CallToolResult, QualcodeService};
use crate::tools::schemas::capabilities::CapabilitiesRequest;
use crate::tools::schemas::codebook::ValidateCodebookRequest;
use crate::tools::schemas::guidance::StageGuidanceRequest;
use crate::tools::schemas::hierarchy::HierarchyDepthRequest;
use crate::tools::schemas::snapshot::ProjectSnapshotRequest;
use crate::tools::schemas::themes::{
    ClassifyParadigmRequest, InferRelationshipsRequest, ValidateThemesRequest,
};
use crate::tools::schemas::theory::{BuildTheoryRequest, ValidateTheoryRequest};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_router, ErrorData as McpError};

pub(super) const TOOL_NAMES: &[&str] = &[
    "capabilities",
    "hierarchy_depth",
    "validate_codebook",
    "validate_themes",
    "classify_paradigm",
    "infer_relationships",
    "build_theory",
    "validate_theory",
    "stage_guidance",
    "project_snapshot",
];

pub(in crate::tools::dispatch) fn build_tool_router() -> ToolRouter<QualcodeService> {
    QualcodeService::tool_router()
}

#[tool_router]
impl QualcodeService {
    /// Tool capabilities handshake (version, tools, thresholds, start route).
    #[tool(
        description = "Return server capabilities: version, tool list, configured methodologies, quality thresholds, and the recommended start route."
    )]
    pub async fn capabilities(
        &self,
        Parameters(request): Parameters<CapabilitiesRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::capabilities::capabilities(self, request).await
    }

    #[tool(
        description = "Compute the maximum depth of a code hierarchy (longest root-to-leaf chain). Fails with 'malformed_hierarchy' on a cycle reachable from a root."
    )]
    pub async fn hierarchy_depth(
        &self,
        Parameters(request): Parameters<HierarchyDepthRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::hierarchy::hierarchy_depth(self, request).await
    }

    #[tool(
        description = "Score a refined codebook on clarity, distinctiveness, completeness, hierarchy and examples. Accepts structured JSON or raw generative-service output. Stores the codebook for the project."
    )]
    pub async fn validate_codebook(
        &self,
        Parameters(request): Parameters<ValidateCodebookRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::codebook::validate_codebook(self, request).await
    }

    #[tool(
        description = "Score a theme set (coherence, distinctiveness, data support, relevance, prevalence, coverage) and report whether theoretical saturation was reached. Stores the themes for the project."
    )]
    pub async fn validate_themes(
        &self,
        Parameters(request): Parameters<ValidateThemesRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::themes::validate_themes(self, request).await
    }

    #[tool(
        description = "Place themes into the paradigm model (phenomenon, causal conditions, context, strategies, consequences, intervening conditions)."
    )]
    pub async fn classify_paradigm(
        &self,
        Parameters(request): Parameters<ClassifyParadigmRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::themes::classify(self, request).await
    }

    #[tool(
        description = "Infer directed relationships between themes that share related codes, with type and strength. Reports pairs whose two directions got different types."
    )]
    pub async fn infer_relationships(
        &self,
        Parameters(request): Parameters<InferRelationshipsRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::themes::infer_relationships(self, request).await
    }

    #[tool(
        description = "Build a grounded theory from themes: core category, paradigm model, storyline, propositions, relationships and quality scores. Stores the theory for the project."
    )]
    pub async fn build_theory(
        &self,
        Parameters(request): Parameters<BuildTheoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::theory::build_theory(self, request).await
    }

    #[tool(
        description = "Score a grounded theory on credibility, originality, resonance and usefulness."
    )]
    pub async fn validate_theory(
        &self,
        Parameters(request): Parameters<ValidateTheoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::theory::validate_theory(self, request).await
    }

    #[tool(
        description = "Return methodology guidance for an analysis stage, optionally appended to a prompt for the generative service."
    )]
    pub async fn stage_guidance(
        &self,
        Parameters(request): Parameters<StageGuidanceRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::guidance::stage_guidance(self, request).await
    }

    #[tool(
        description = "Return the latest stored codebook, themes, theme assessment and theory for a project."
    )]
    pub async fn project_snapshot(
        &self,
        Parameters(request): Parameters<ProjectSnapshotRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::snapshot::project_snapshot(self, request).await
    }
}
