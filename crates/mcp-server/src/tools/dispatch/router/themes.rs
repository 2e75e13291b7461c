use super::super::{CallToolResult, QualcodeService};
use super::error::{analysis_error, invalid_request, tool_success};
use super::input::{persist, require_project, resolve_code_labels, resolve_themes, structured_or_raw};
use crate::tools::schemas::themes::{
    ClassifyParadigmRequest, ClassifyParadigmResult, DivergentPair, InferRelationshipsRequest,
    InferRelationshipsResult, ValidateThemesRequest,
};
use qualcode_analysis::{
    classify_paradigm, divergent_pairs, KeywordClassifier, RelationshipEngine, Theme,
    ThemeValidator,
};

/// Score a theme set, detect saturation, and store both for the project.
pub(in crate::tools::dispatch) async fn validate_themes(
    service: &QualcodeService,
    request: ValidateThemesRequest,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let project = try_tool!(require_project(&request.project));
    let themes: Vec<Theme> = match try_tool!(structured_or_raw(
        request.themes,
        request.raw_output.as_deref(),
        "themes"
    )) {
        Some(themes) => themes,
        None => return Ok(invalid_request("provide `themes` or `raw_output`")),
    };

    let assessment = try_tool!(ThemeValidator::new(service.analysis_config())
        .validate(&themes, request.expected_data_points)
        .map_err(|e| analysis_error(&e)));

    let mut warnings = assessment.quality.warnings();
    if !assessment.saturation_reached {
        warnings.push("theoretical saturation not reached".to_string());
    }

    let stored = assessment.clone();
    try_tool!(persist(service, &project, |snapshot| {
        snapshot.themes = Some(themes);
        snapshot.theme_assessment = Some(stored);
    }));

    tool_success(&project, assessment, warnings)
}

pub(in crate::tools::dispatch) async fn classify(
    service: &QualcodeService,
    request: ClassifyParadigmRequest,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let project = try_tool!(require_project(&request.project));
    let themes = try_tool!(resolve_themes(
        service,
        &project,
        request.themes,
        request.raw_output.as_deref()
    ));
    let labels = try_tool!(resolve_code_labels(service, &project, request.code_labels));

    let paradigm_model = try_tool!(
        classify_paradigm(&themes, &labels, &KeywordClassifier::default())
            .map_err(|e| analysis_error(&e))
    );
    tool_success(&project, ClassifyParadigmResult { paradigm_model }, Vec::new())
}

pub(in crate::tools::dispatch) async fn infer_relationships(
    service: &QualcodeService,
    request: InferRelationshipsRequest,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let project = try_tool!(require_project(&request.project));
    let themes = try_tool!(resolve_themes(
        service,
        &project,
        request.themes,
        request.raw_output.as_deref()
    ));

    let relationships = RelationshipEngine::default().infer(&themes);
    let divergent: Vec<DivergentPair> = divergent_pairs(&relationships)
        .into_iter()
        .map(|(a, b, forward, reverse)| DivergentPair {
            a,
            b,
            forward,
            reverse,
        })
        .collect();

    let warnings = divergent
        .iter()
        .map(|pair| {
            format!(
                "'{}' -> '{}' is {} but the reverse is {}",
                pair.a, pair.b, pair.forward, pair.reverse
            )
        })
        .collect();

    tool_success(
        &project,
        InferRelationshipsResult {
            relationships,
            divergent_pairs: divergent,
        },
        warnings,
    )
}
