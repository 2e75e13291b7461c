//! MCP tool dispatch for Qualcode

use super::project_store::ProjectStore;
use crate::runtime_env::RuntimeEnv;
use qualcode_analysis::{AnalysisConfig, MethodologyCatalog, QualcodeConfig};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool_handler, ServerHandler};
use std::sync::Arc;

mod router;

/// Qualcode MCP Service
#[derive(Clone)]
pub struct QualcodeService {
    /// Tool router
    tool_router: ToolRouter<Self>,
    /// Configuration and storage shared by every tool call
    state: Arc<ServiceState>,
}

struct ServiceState {
    config: QualcodeConfig,
    catalog: MethodologyCatalog,
    store: ProjectStore,
}

impl QualcodeService {
    pub fn new(runtime: RuntimeEnv) -> Self {
        let catalog = runtime.config.catalog();
        log::info!(
            "Project data dir: {} ({} methodologies)",
            runtime.data_dir.display(),
            catalog.ids().count()
        );
        Self {
            tool_router: router::build_tool_router(),
            state: Arc::new(ServiceState {
                config: runtime.config,
                catalog,
                store: ProjectStore::new(runtime.data_dir),
            }),
        }
    }

    fn analysis_config(&self) -> &AnalysisConfig {
        &self.state.config.analysis
    }

    fn catalog(&self) -> &MethodologyCatalog {
        &self.state.catalog
    }

    fn store(&self) -> &ProjectStore {
        &self.state.store
    }
}

#[tool_handler]
impl ServerHandler for QualcodeService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Qualcode validates and structures qualitative-analysis output. Start with 'validate_codebook' on your refined codes, then 'validate_themes' on drafted themes, then 'build_theory'. Results are stored per project; 'project_snapshot' returns the latest ones. Use 'stage_guidance' to extend prompts with methodology guidance.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}
