use serde::{Deserialize, Serialize};

const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// OAuth app credentials. The initiate endpoint answers 500 while the
    /// client id is missing.
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Public base URL of this app, used to build the OAuth redirect URI.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// GitHub endpoints. Overridable so tests can point at a local stub.
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    format!("http://{}:{}", default_host(), default_port())
}

fn default_authorize_url() -> String {
    GITHUB_AUTHORIZE_URL.to_string()
}

fn default_token_url() -> String {
    GITHUB_TOKEN_URL.to_string()
}

fn default_api_base() -> String {
    GITHUB_API_BASE.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            client_id: None,
            client_secret: None,
            base_url: default_base_url(),
            authorize_url: default_authorize_url(),
            token_url: default_token_url(),
            api_base: default_api_base(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let host = std::env::var("GITCANVAS_HOST").unwrap_or_else(|_| default_host());
        let port = std::env::var("GITCANVAS_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);
        let base_url = std::env::var("GITCANVAS_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", host, port));

        Self {
            host,
            port,
            client_id: std::env::var("GITHUB_CLIENT_ID").ok(),
            client_secret: std::env::var("GITHUB_CLIENT_SECRET").ok(),
            base_url,
            ..Self::default()
        }
    }

    pub fn redirect_uri(&self) -> String {
        format!("{}/api/auth/github/callback", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_github() {
        let config = ServerConfig::default();
        assert!(config.authorize_url.starts_with("https://github.com/"));
        assert!(config.client_id.is_none());
        assert_eq!(
            config.redirect_uri(),
            "http://127.0.0.1:3000/api/auth/github/callback"
        );
    }
}
