use super::super::{CallToolResult, QualcodeService};
use super::error::{analysis_error, invalid_request, store_error};
use crate::tools::project_store::ProjectSnapshot;
use qualcode_analysis::{code_labels, parse_upstream_field, Theme};
use qualcode_protocol::validate_project_name;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

pub(in crate::tools::dispatch) fn require_project(raw: &str) -> Result<String, CallToolResult> {
    validate_project_name(raw).map_err(|e| invalid_request(format!("project: {e}")))
}

/// Structured argument, or the same shape extracted from raw generative-service output
///
/// `field` names both the structured argument and the optional wrapper key in raw output.
pub(in crate::tools::dispatch) fn structured_or_raw<T: DeserializeOwned>(
    structured: Option<Value>,
    raw_output: Option<&str>,
    field: &str,
) -> Result<Option<T>, CallToolResult> {
    if let Some(value) = structured {
        let value = match value {
            Value::Object(mut map) if map.len() == 1 && map.contains_key(field) => {
                map.remove(field).unwrap_or_default()
            }
            other => other,
        };
        return serde_json::from_value(value)
            .map(Some)
            .map_err(|e| invalid_request(format!("{field}: {e}")));
    }
    match raw_output.filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => parse_upstream_field(raw, field)
            .map(Some)
            .map_err(|e| analysis_error(&e)),
        None => Ok(None),
    }
}

pub(in crate::tools::dispatch) fn load_snapshot(
    service: &QualcodeService,
    project: &str,
) -> Result<ProjectSnapshot, CallToolResult> {
    service.store().load(project).map_err(store_error)
}

pub(in crate::tools::dispatch) fn persist<F>(
    service: &QualcodeService,
    project: &str,
    mutate: F,
) -> Result<(), CallToolResult>
where
    F: FnOnce(&mut ProjectSnapshot),
{
    service
        .store()
        .update(project, mutate)
        .map(|_| ())
        .map_err(store_error)
}

/// Themes from the arguments, falling back to the project's stored themes
pub(in crate::tools::dispatch) fn resolve_themes(
    service: &QualcodeService,
    project: &str,
    themes: Option<Value>,
    raw_output: Option<&str>,
) -> Result<Vec<Theme>, CallToolResult> {
    if let Some(themes) = structured_or_raw::<Vec<Theme>>(themes, raw_output, "themes")? {
        return Ok(themes);
    }
    load_snapshot(service, project)?.themes.ok_or_else(|| {
        invalid_request(format!(
            "provide `themes` or `raw_output` (project '{project}' has no stored themes)"
        ))
    })
}

/// Code labels from the arguments, then the stored codebook; empty when neither exists
pub(in crate::tools::dispatch) fn resolve_code_labels(
    service: &QualcodeService,
    project: &str,
    labels: Option<HashMap<String, String>>,
) -> Result<HashMap<String, String>, CallToolResult> {
    if let Some(labels) = labels {
        return Ok(labels);
    }
    let snapshot = load_snapshot(service, project)?;
    Ok(snapshot
        .codebook
        .as_ref()
        .map(code_labels)
        .unwrap_or_default())
}
