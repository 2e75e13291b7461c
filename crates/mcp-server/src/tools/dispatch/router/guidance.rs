use super::super::{CallToolResult, QualcodeService};
use super::error::tool_success;
use super::input::require_project;
use crate::tools::schemas::guidance::{StageGuidanceRequest, StageGuidanceResult};
use qualcode_protocol::{AnalysisDepth, CodingMode};

fn depth_note(depth: AnalysisDepth) -> Option<&'static str> {
    match depth {
        AnalysisDepth::Surface => {
            Some("Stay at the semantic level: summarize what participants say explicitly.")
        }
        AnalysisDepth::Standard => None,
        AnalysisDepth::Deep => {
            Some("Look for latent meaning and negative cases, not only explicit statements.")
        }
    }
}

fn mode_note(mode: CodingMode) -> &'static str {
    match mode {
        CodingMode::Inductive => "Derive codes from the data rather than from a prior framework.",
        CodingMode::Deductive => "Apply the framework's codes first; add new codes only when the data cannot fit them.",
        CodingMode::Hybrid => "Start from the framework's codes and add data-driven codes alongside them.",
    }
}

/// Methodology guidance for one stage, optionally appended to a prompt.
pub(in crate::tools::dispatch) async fn stage_guidance(
    service: &QualcodeService,
    request: StageGuidanceRequest,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let project = try_tool!(require_project(&request.project));
    let methodology = request.paradigm.unwrap_or_default().methodology_id();
    let stage = request.stage;

    let catalog = service.catalog();
    let guidance = catalog
        .stage_guidance(methodology, stage.as_str())
        .map(str::to_string);

    let mut notes = Vec::new();
    if let Some(note) = depth_note(request.depth.unwrap_or_default()) {
        notes.push(note.to_string());
    }
    notes.push(mode_note(request.mode.unwrap_or_default()).to_string());

    let prompt = request.prompt.map(|prompt| {
        let mut out = catalog.append_guidance(&prompt, methodology, stage.as_str());
        for note in &notes {
            out.push('\n');
            out.push_str(note);
        }
        out
    });

    let warnings = if guidance.is_none() {
        vec![format!(
            "no guidance configured for {methodology}/{}",
            stage.as_str()
        )]
    } else {
        Vec::new()
    };

    tool_success(
        &project,
        StageGuidanceResult {
            methodology: methodology.to_string(),
            stage,
            guidance,
            notes,
            prompt,
        },
        warnings,
    )
}
