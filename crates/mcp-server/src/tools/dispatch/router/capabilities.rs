use super::super::{CallToolResult, QualcodeService};
use super::error::tool_json;
use super::tool_router::TOOL_NAMES;
use crate::tools::schemas::capabilities::{CapabilitiesRequest, CapabilitiesResult};
use qualcode_protocol::{
    Capabilities, CapabilitiesServer, Thresholds, ToolNextAction, CAPABILITIES_SCHEMA_VERSION,
};
use serde_json::json;

/// Tools, methodologies and thresholds, plus where to start.
pub(in crate::tools::dispatch) async fn capabilities(
    service: &QualcodeService,
    request: CapabilitiesRequest,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let config = service.analysis_config();
    let project = request
        .project
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "<project>".to_string());

    let start_route = ToolNextAction {
        tool: "validate_codebook".to_string(),
        args: json!({ "project": project, "raw_output": "<codebook output>" }),
        reason: "Validate the refined codebook first; later tools reuse its code labels."
            .to_string(),
    };

    let result = CapabilitiesResult {
        capabilities: Capabilities {
            schema_version: CAPABILITIES_SCHEMA_VERSION,
            server: CapabilitiesServer {
                name: "qualcode-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            tools: TOOL_NAMES.iter().map(|t| t.to_string()).collect(),
            methodologies: service.catalog().ids().map(str::to_string).collect(),
            thresholds: Thresholds {
                codebook: config.codebook_threshold,
                themes: config.theme_threshold,
                theory: config.theory_threshold,
            },
            start_route,
        },
        data_dir: service.store().base_dir().display().to_string(),
    };
    tool_json(&result)
}
