use super::super::{CallToolResult, QualcodeService};
use super::error::{analysis_error, invalid_request, tool_success};
use super::input::{require_project, structured_or_raw};
use crate::tools::schemas::hierarchy::{HierarchyDepthRequest, HierarchyDepthResult};
use qualcode_analysis::{CodeHierarchy, HierarchyGraph};

/// Longest root-to-leaf chain, plus codes no root reaches.
pub(in crate::tools::dispatch) async fn hierarchy_depth(
    _service: &QualcodeService,
    request: HierarchyDepthRequest,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let project = try_tool!(require_project(&request.project));
    let hierarchy: CodeHierarchy = match try_tool!(structured_or_raw(
        request.hierarchy,
        request.raw_output.as_deref(),
        "hierarchy"
    )) {
        Some(hierarchy) => hierarchy,
        None => return Ok(invalid_request("provide `hierarchy` or `raw_output`")),
    };

    let graph = HierarchyGraph::from_hierarchy(&hierarchy);
    let depth = try_tool!(graph.max_depth().map_err(|e| analysis_error(&e)));
    let unreachable_codes = graph.unreachable_codes();

    let warnings = if unreachable_codes.is_empty() {
        Vec::new()
    } else {
        vec![format!(
            "{} codes are not reachable from any root code",
            unreachable_codes.len()
        )]
    };
    tool_success(
        &project,
        HierarchyDepthResult {
            depth,
            unreachable_codes,
        },
        warnings,
    )
}
