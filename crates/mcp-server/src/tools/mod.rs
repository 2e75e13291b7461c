//! Qualcode MCP tool surface.
//!
//! Schemas, dispatch and persistence live in separate submodules; the analysis itself is in
//! `qualcode-analysis`.

mod dispatch;
mod project_store;
mod schemas;

pub use dispatch::QualcodeService;
