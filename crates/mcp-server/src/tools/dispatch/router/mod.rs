// Per-tool dispatch functions used by the MCP tool router.

/// Unwrap a `Result<T, CallToolResult>`, returning the error result from the tool call
macro_rules! try_tool {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(result) => return Ok(result),
        }
    };
}

pub(super) mod capabilities;
pub(super) mod codebook;
pub(super) mod error;
pub(super) mod guidance;
pub(super) mod hierarchy;
pub(super) mod input;
pub(super) mod snapshot;
pub(super) mod themes;
pub(super) mod theory;
mod tool_router;

pub(super) use tool_router::build_tool_router;
