//! Request and result shapes for every tool.
//!
//! Requests derive `JsonSchema` so MCP clients see the argument contract; analysis payloads
//! (codebooks, themes, theories) arrive as free JSON and are parsed into core types at dispatch.

pub(crate) mod capabilities;
pub(crate) mod codebook;
pub(crate) mod guidance;
pub(crate) mod hierarchy;
pub(crate) mod snapshot;
pub(crate) mod themes;
pub(crate) mod theory;
