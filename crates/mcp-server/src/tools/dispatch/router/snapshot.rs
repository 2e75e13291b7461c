use super::super::{CallToolResult, QualcodeService};
use super::error::tool_success;
use super::input::{load_snapshot, require_project};
use crate::tools::schemas::snapshot::ProjectSnapshotRequest;

pub(in crate::tools::dispatch) async fn project_snapshot(
    service: &QualcodeService,
    request: ProjectSnapshotRequest,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let project = try_tool!(require_project(&request.project));
    let snapshot = try_tool!(load_snapshot(service, &project));
    let warnings = if snapshot.exists() {
        Vec::new()
    } else {
        vec![format!("project '{project}' has no stored results yet")]
    };
    tool_success(&project, snapshot, warnings)
}
