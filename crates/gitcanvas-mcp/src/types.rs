use gitcanvas_protocol::{AuthSession, RepoSelection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const GITHUB_SERVER_NAME: &str = "github";
const DEFAULT_GITHUB_MCP_URL: &str = "https://api.githubcopilot.com/mcp/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Http,
}

/// Connection descriptor for a remote MCP tool server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerDescriptor {
    pub name: String,
    pub url: String,
    pub transport: Transport,
    /// Serialized as `customHeaders`, the name the orchestration layer expects.
    #[serde(default, rename = "customHeaders")]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpSettings {
    /// Endpoint of the hosted GitHub MCP server.
    pub github_url: String,
}

impl Default for McpSettings {
    fn default() -> Self {
        Self {
            github_url: DEFAULT_GITHUB_MCP_URL.to_string(),
        }
    }
}

/// Derive the remote tool-server list.
///
/// The descriptor exists only while a complete repository selection and a
/// validated token are present simultaneously; flipping either off empties
/// the list.
pub fn derive_descriptors(
    settings: &McpSettings,
    selection: Option<&RepoSelection>,
    session: &AuthSession,
) -> Vec<McpServerDescriptor> {
    let Some(selection) = selection else {
        return Vec::new();
    };
    if selection.owner.is_empty() || selection.repo.is_empty() {
        return Vec::new();
    }
    let Some(token) = session.access_token.as_deref() else {
        return Vec::new();
    };

    vec![McpServerDescriptor {
        name: GITHUB_SERVER_NAME.to_string(),
        url: settings.github_url.clone(),
        transport: Transport::Http,
        headers: HashMap::from([(
            "Authorization".to_string(),
            format!("Bearer {}", token),
        )]),
    }]
}
