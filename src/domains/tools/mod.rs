//! Tools domain module.
//!
//! Tools are named, schema-described functions that clients invoke through
//! `tools/call`.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations
//! - `catalog.rs` - Registers the built-in tools
//! - `registry.rs` - Name to tool mapping, read-only once serving starts
//! - `handlers.rs` - The async handler contract and argument helpers
//! - `error.rs` - Tool-specific error types

mod catalog;
pub mod definitions;
mod error;
mod handlers;
mod registry;

pub use catalog::build_tool_registry;
pub use error::ToolError;
pub use handlers::*;
pub use registry::{Tool, ToolInfo, ToolRegistry};
