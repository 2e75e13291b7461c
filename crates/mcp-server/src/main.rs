//! Qualcode MCP Server
//!
//! Deterministic validation, classification and theory building over qualitative-analysis
//! output, exposed to agents via MCP.
//!
//! ## Tools
//!
//! - `capabilities` - Server version, tools, methodologies and thresholds
//! - `hierarchy_depth` - Longest root-to-leaf chain of a code hierarchy
//! - `validate_codebook` - Codebook rubric (clarity, distinctiveness, completeness, ...)
//! - `validate_themes` - Theme rubric plus saturation signal
//! - `classify_paradigm` - Place themes into the paradigm model
//! - `infer_relationships` - Directed relationships between themes
//! - `build_theory` - Grounded theory with storyline, propositions and quality
//! - `validate_theory` - Theory rubric
//! - `stage_guidance` - Methodology guidance for an analysis stage
//! - `project_snapshot` - Last persisted results for a project
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "qualcode": {
//!       "command": "qualcode-mcp",
//!       "env": { "QUALCODE_DATA_DIR": "/path/to/projects" }
//!     }
//!   }
//! }
//! ```

use anyhow::Result;
use rmcp::transport::stdio;
use rmcp::ServiceExt;

mod runtime_env;
mod tools;

use tools::QualcodeService;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure logging to stderr only (stdout is for MCP protocol)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    log::info!("Starting Qualcode MCP server");

    let runtime = runtime_env::RuntimeEnv::from_env();
    for warning in &runtime.warnings {
        log::warn!("{warning}");
    }

    let service = QualcodeService::new(runtime);
    let server = service.serve(stdio()).await?;

    // Wait for shutdown
    server.waiting().await?;

    log::info!("Qualcode MCP server stopped");
    Ok(())
}
