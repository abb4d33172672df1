//! Remote tool configuration for gitcanvas.
//!
//! The orchestration layer consumes a list of remote MCP server descriptors.
//! This crate derives that list from the current repository selection and
//! auth session: exactly one GitHub descriptor when both are present,
//! nothing otherwise.

mod configurator;
mod types;

pub use configurator::ToolConfigurator;
pub use types::{derive_descriptors, McpServerDescriptor, McpSettings, Transport};
