use super::super::{CallToolResult, Content};
use qualcode_analysis::AnalysisError;
use qualcode_protocol::{ErrorEnvelope, ToolNextAction, ToolResponse};
use rmcp::ErrorData as McpError;
use serde::Serialize;
use serde_json::json;

fn render_error(error: &ErrorEnvelope) -> String {
    let mut out = format!("error: {}\n{}", error.code, error.message);
    if let Some(hint) = error.hint.as_deref().filter(|h| !h.trim().is_empty()) {
        out.push_str(&format!("\nhint: {hint}"));
    }
    for action in &error.next_actions {
        out.push_str(&format!("\nnext: {} ({})", action.tool, action.reason));
    }
    out
}

pub(in crate::tools::dispatch) fn tool_error_envelope(error: ErrorEnvelope) -> CallToolResult {
    let mut result = CallToolResult::error(vec![Content::text(render_error(&error))]);
    result.structured_content = Some(json!({ "error": error }));
    result
}

pub(in crate::tools::dispatch) fn tool_error(
    code: &'static str,
    message: impl Into<String>,
) -> CallToolResult {
    tool_error_envelope(ErrorEnvelope::new(code, message))
}

pub(in crate::tools::dispatch) fn invalid_request(message: impl Into<String>) -> CallToolResult {
    tool_error("invalid_request", message)
}

pub(in crate::tools::dispatch) fn store_error(err: anyhow::Error) -> CallToolResult {
    log::error!("Project store failure: {err:#}");
    tool_error_envelope(
        ErrorEnvelope::new("store_error", format!("{err:#}"))
            .with_hint("Check that QUALCODE_DATA_DIR is writable."),
    )
}

/// Map a core failure onto the error envelope, with a hint for the caller's next step
pub(in crate::tools::dispatch) fn analysis_error(err: &AnalysisError) -> CallToolResult {
    let envelope = ErrorEnvelope::new(err.code(), err.to_string());
    let envelope = match err {
        AnalysisError::EmptyInput(_) => {
            envelope.with_hint("Provide at least one code or theme.")
        }
        AnalysisError::MalformedHierarchy { parent, child } => envelope
            .with_hint(format!(
                "Remove '{child}' from the children of '{parent}' so the hierarchy is acyclic."
            )),
        AnalysisError::MalformedUpstreamOutput(_) => envelope
            .with_hint("Regenerate the output; it must contain a JSON code block or object.")
            .with_next_action(ToolNextAction {
                tool: "stage_guidance".to_string(),
                args: json!({}),
                reason: "Re-prompt the generative service with stage guidance.".to_string(),
            }),
        _ => envelope,
    };
    log::warn!("Tool call failed: {err}");
    tool_error_envelope(envelope)
}

pub(in crate::tools::dispatch) fn tool_json<T: Serialize>(
    value: &T,
) -> Result<CallToolResult, McpError> {
    let structured = serde_json::to_value(value)
        .map_err(|e| McpError::internal_error(format!("serialize result: {e}"), None))?;
    let text = serde_json::to_string_pretty(&structured)
        .map_err(|e| McpError::internal_error(format!("serialize result: {e}"), None))?;
    let mut result = CallToolResult::success(vec![Content::text(text)]);
    result.structured_content = Some(structured);
    Ok(result)
}

/// `{ project, result, warnings }` success response
pub(in crate::tools::dispatch) fn tool_success<T: Serialize>(
    project: &str,
    result: T,
    warnings: Vec<String>,
) -> Result<CallToolResult, McpError> {
    for warning in &warnings {
        log::warn!("[{project}] {warning}");
    }
    tool_json(&ToolResponse::new(project, result).with_warnings(warnings))
}
