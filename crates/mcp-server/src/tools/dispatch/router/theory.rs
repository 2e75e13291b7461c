use super::super::{CallToolResult, QualcodeService};
use super::error::{analysis_error, invalid_request, tool_success};
use super::input::{load_snapshot, persist, require_project, resolve_code_labels, resolve_themes};
use crate::tools::schemas::theory::{BuildTheoryRequest, ValidateTheoryRequest};
use qualcode_analysis::{
    saturation_reached, GroundedTheory, Theme, TheoryBuilder, TheoryDraft, TheoryValidator,
};
use serde_json::Value;

const SATURATION_KEY: &str = "saturationReached";

/// Drafted text from the caller; saturation falls back to the heuristic over `themes`
fn parse_draft(
    draft: Option<Value>,
    themes: &[Theme],
) -> Result<TheoryDraft, CallToolResult> {
    let draft = draft.unwrap_or(Value::Null);
    let explicit_saturation = draft.get(SATURATION_KEY).is_some();
    let mut parsed: TheoryDraft = match draft {
        Value::Null => TheoryDraft::default(),
        other => serde_json::from_value(other)
            .map_err(|e| invalid_request(format!("draft: {e}")))?,
    };
    if !explicit_saturation {
        parsed.saturation_reached = saturation_reached(themes);
    }
    Ok(parsed)
}

/// Classify, relate, narrate and score; the theory is stored for the project.
pub(in crate::tools::dispatch) async fn build_theory(
    service: &QualcodeService,
    request: BuildTheoryRequest,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let project = try_tool!(require_project(&request.project));
    let themes = try_tool!(resolve_themes(
        service,
        &project,
        request.themes,
        request.raw_output.as_deref()
    ));
    let labels = try_tool!(resolve_code_labels(service, &project, request.code_labels));
    let draft = try_tool!(parse_draft(request.draft, &themes));

    let theory = try_tool!(TheoryBuilder::new(service.analysis_config())
        .build(&themes, &labels, draft)
        .map_err(|e| analysis_error(&e)));

    let mut warnings = theory
        .quality
        .as_ref()
        .map(|q| q.warnings())
        .unwrap_or_default();
    if !theory.saturation_reached {
        warnings.push("theory built before theoretical saturation".to_string());
    }

    let stored = theory.clone();
    try_tool!(persist(service, &project, |snapshot| {
        snapshot.theory = Some(stored)
    }));
    tool_success(&project, theory, warnings)
}

pub(in crate::tools::dispatch) async fn validate_theory(
    service: &QualcodeService,
    request: ValidateTheoryRequest,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let project = try_tool!(require_project(&request.project));
    let theory: GroundedTheory = match request.theory {
        Some(value) => try_tool!(serde_json::from_value(value)
            .map_err(|e| invalid_request(format!("theory: {e}")))),
        None => match try_tool!(load_snapshot(service, &project)).theory {
            Some(theory) => theory,
            None => {
                return Ok(invalid_request(format!(
                    "provide `theory` (project '{project}' has no stored theory)"
                )))
            }
        },
    };

    let assessment = TheoryValidator::new(service.analysis_config()).validate(&theory);
    let warnings = assessment.warnings();
    tool_success(&project, assessment, warnings)
}
