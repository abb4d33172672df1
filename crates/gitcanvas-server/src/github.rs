use crate::{Result, ServerConfig, ServerError};
use gitcanvas_protocol::UserProfile;
use serde::{Deserialize, Serialize};

const USER_AGENT: &str = concat!("gitcanvas/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: String,
}

/// GitHub reports exchange failures inside a 200 body, so both fields are
/// optional and checked explicitly.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Server-to-server exchange of the authorization code for an access token.
pub async fn exchange_code(
    http: &reqwest::Client,
    config: &ServerConfig,
    code: &str,
) -> Result<String> {
    let client_id = config
        .client_id
        .as_deref()
        .ok_or(ServerError::OAuthNotConfigured)?;
    let client_secret = config.client_secret.as_deref().unwrap_or_default();

    let response = http
        .post(&config.token_url)
        .header("Accept", "application/json")
        .header("User-Agent", USER_AGENT)
        .json(&TokenRequest {
            client_id,
            client_secret,
            code,
            redirect_uri: config.redirect_uri(),
        })
        .send()
        .await
        .map_err(|e| ServerError::TokenExchange(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(ServerError::TokenExchange(format!("HTTP {}: {}", status, text)));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| ServerError::TokenExchange(e.to_string()))?;

    if let Some(error) = token.error {
        let detail = token.error_description.unwrap_or_default();
        return Err(ServerError::TokenExchange(format!("{}: {}", error, detail)));
    }

    token
        .access_token
        .ok_or_else(|| ServerError::TokenExchange("no access token in response".to_string()))
}

/// Fetch the authenticated user's profile with the freshly issued token.
pub async fn fetch_user(
    http: &reqwest::Client,
    api_base: &str,
    token: &str,
) -> Result<UserProfile> {
    let response = http
        .get(format!("{}/user", api_base))
        .header("Authorization", format!("Bearer {}", token))
        .header("User-Agent", USER_AGENT)
        .send()
        .await
        .map_err(|e| ServerError::ProfileFetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ServerError::ProfileFetch(format!(
            "HTTP {}",
            response.status()
        )));
    }

    response
        .json::<UserProfile>()
        .await
        .map_err(|e| ServerError::ProfileFetch(e.to_string()))
}
