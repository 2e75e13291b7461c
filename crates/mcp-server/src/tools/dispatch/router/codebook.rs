use super::super::{CallToolResult, QualcodeService};
use super::error::{analysis_error, invalid_request, tool_success};
use super::input::{persist, require_project, structured_or_raw};
use crate::tools::schemas::codebook::{ValidateCodebookRequest, ValidateCodebookResult};
use qualcode_analysis::{Code, CodeHierarchy, Codebook, CodebookValidator};
use serde::Deserialize;

/// Codes plus hierarchy; metrics are always recomputed
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodebookInput {
    codes: Vec<Code>,
    #[serde(default)]
    hierarchy: CodeHierarchy,
}

/// Score a codebook against the rubric and store it for the project.
pub(in crate::tools::dispatch) async fn validate_codebook(
    service: &QualcodeService,
    request: ValidateCodebookRequest,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let project = try_tool!(require_project(&request.project));
    let input: CodebookInput = match try_tool!(structured_or_raw(
        request.codebook,
        request.raw_output.as_deref(),
        "codebook"
    )) {
        Some(input) => input,
        None => return Ok(invalid_request("provide `codebook` or `raw_output`")),
    };

    let initial_code_count = request.initial_code_count.unwrap_or(input.codes.len());
    let codebook = try_tool!(
        Codebook::build(input.codes, input.hierarchy, initial_code_count)
            .map_err(|e| analysis_error(&e))
    );
    let assessment = try_tool!(CodebookValidator::new(service.analysis_config())
        .validate(&codebook)
        .map_err(|e| analysis_error(&e)));

    let warnings = assessment.warnings();
    let metrics = codebook.metrics.clone();
    try_tool!(persist(service, &project, |snapshot| {
        snapshot.codebook = Some(codebook)
    }));

    tool_success(
        &project,
        ValidateCodebookResult {
            metrics,
            assessment,
        },
        warnings,
    )
}
