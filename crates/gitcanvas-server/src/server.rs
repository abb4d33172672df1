use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use url::Url;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::github;
use gitcanvas_protocol::UserProfile;

/// Anti-forgery value for the OAuth handshake; lives for ten minutes.
const STATE_COOKIE: &str = "gitcanvas_oauth_state";
/// Raw access token; http-only, thirty days.
const SESSION_COOKIE: &str = "gitcanvas_session";
/// Percent-encoded profile JSON, readable by client code.
const USER_COOKIE: &str = "gitcanvas_user";

const OAUTH_SCOPE: &str = "repo read:user";

struct AppState {
    config: ServerConfig,
    http: reqwest::Client,
    start_time: Instant,
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    authenticated: bool,
    user: Option<UserProfile>,
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    version: &'static str,
}

pub struct AuthServer {
    config: ServerConfig,
}

impl AuthServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn router(&self) -> Router {
        let state = Arc::new(AppState {
            config: self.config.clone(),
            http: reqwest::Client::new(),
            start_time: Instant::now(),
        });
        Router::new()
            .route("/api/auth/github", get(github_login))
            .route("/api/auth/github/callback", get(github_callback))
            .route("/api/auth/status", get(auth_status).delete(logout))
            .route("/health", get(health_handler))
            .with_state(state)
    }

    pub async fn start(&self) -> Result<(), ServerError> {
        let app = self.router();
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        tracing::info!("auth server listening on http://{}", addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        Ok(())
    }
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.start_time.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Step one: stash an anti-forgery value in a short-lived cookie and send
/// the browser to GitHub's authorize page.
async fn github_login(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let Some(client_id) = state.config.client_id.as_deref() else {
        tracing::error!("GITHUB_CLIENT_ID is not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "GitHub OAuth is not configured",
        )
            .into_response();
    };

    let state_value: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();

    let mut authorize_url = match Url::parse(&state.config.authorize_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("invalid authorize URL: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    authorize_url
        .query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", &state.config.redirect_uri())
        .append_pair("scope", OAUTH_SCOPE)
        .append_pair("state", &state_value);

    let cookie = Cookie::build((STATE_COOKIE, state_value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(10));

    (jar.add(cookie), Redirect::temporary(authorize_url.as_str())).into_response()
}

/// Step two: validate the returned state against the cookie, exchange the
/// code, and establish the session cookies.
///
/// Failures redirect back to the UI with an `error` query parameter rather
/// than answering an HTTP error, since the browser is mid-navigation. The
/// state cookie is deleted on every path so a value is never reusable.
async fn github_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let stored_state = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::build((STATE_COOKIE, "")).path("/"));

    if let Some(error) = query.error {
        return error_redirect(jar, &format!("GitHub authorization failed: {}", error));
    }
    let Some(code) = query.code else {
        return error_redirect(jar, "missing authorization code");
    };
    match (stored_state.as_deref(), query.state.as_deref()) {
        (Some(stored), Some(returned)) if stored == returned => {}
        _ => return error_redirect(jar, "OAuth state mismatch"),
    }

    let token = match github::exchange_code(&state.http, &state.config, &code).await {
        Ok(token) => token,
        Err(e) => return error_redirect(jar, &e.to_string()),
    };
    let user = match github::fetch_user(&state.http, &state.config.api_base, &token).await {
        Ok(user) => user,
        Err(e) => return error_redirect(jar, &e.to_string()),
    };

    tracing::info!(login = %user.login, "OAuth exchange complete");

    let session_cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(30));

    let profile_json = serde_json::to_string(&user).unwrap_or_default();
    let user_cookie = Cookie::build((
        USER_COOKIE,
        utf8_percent_encode(&profile_json, NON_ALPHANUMERIC).to_string(),
    ))
    .path("/")
    .same_site(SameSite::Lax)
    .max_age(time::Duration::days(30));

    let jar = jar.add(session_cookie).add(user_cookie);
    (jar, Redirect::temporary("/?auth=success")).into_response()
}

fn error_redirect(jar: CookieJar, message: &str) -> Response {
    tracing::warn!("OAuth callback rejected: {}", message);
    let location = format!("/?error={}", utf8_percent_encode(message, NON_ALPHANUMERIC));
    (jar, Redirect::temporary(&location)).into_response()
}

/// Session cookie readback. Exposing the raw token here is a deliberate
/// trust-boundary relaxation: client code needs it to build the remote
/// tool-server descriptor.
async fn auth_status(jar: CookieJar) -> Json<StatusResponse> {
    let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let user = jar
        .get(USER_COOKIE)
        .and_then(|c| percent_decode_str(c.value()).decode_utf8().ok())
        .and_then(|decoded| serde_json::from_str(&decoded).ok());

    Json(StatusResponse {
        authenticated: token.is_some(),
        user,
        access_token: token,
    })
}

/// Clearing absent cookies is not an error; this endpoint is idempotent.
async fn logout(jar: CookieJar) -> Response {
    let jar = jar
        .remove(Cookie::build((SESSION_COOKIE, "")).path("/"))
        .remove(Cookie::build((USER_COOKIE, "")).path("/"));
    (jar, Json(serde_json::json!({"success": true}))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stub of GitHub's token and user endpoints. The token endpoint mirrors
    /// GitHub's habit of reporting failures inside a 200 body.
    async fn spawn_github_stub() -> String {
        async fn token(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
            if body["code"] == "bad-code" {
                return Json(serde_json::json!({
                    "error": "bad_verification_code",
                    "error_description": "The code passed is incorrect or expired."
                }));
            }
            Json(serde_json::json!({
                "access_token": "gho_testtoken",
                "token_type": "bearer",
                "scope": "repo,read:user"
            }))
        }

        async fn user() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "login": "octocat",
                "avatar_url": "https://example.com/octocat.png",
                "name": "The Octocat"
            }))
        }

        let app = Router::new()
            .route("/token", axum::routing::post(token))
            .route("/user", get(user));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn spawn_app(config: ServerConfig) -> String {
        let app = AuthServer::new(config).router();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn configured_app() -> String {
        let stub = spawn_github_stub().await;
        spawn_app(ServerConfig {
            client_id: Some("cid123".to_string()),
            client_secret: Some("secret".to_string()),
            token_url: format!("{}/token", stub),
            api_base: stub,
            ..ServerConfig::default()
        })
        .await
    }

    fn no_redirect_client() -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }

    fn set_cookies(resp: &reqwest::Response) -> Vec<String> {
        resp.headers()
            .get_all("set-cookie")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(String::from)
            .collect()
    }

    fn location(resp: &reqwest::Response) -> String {
        resp.headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn login_redirects_to_authorize_with_state_cookie() {
        let base = configured_app().await;
        let resp = no_redirect_client()
            .get(format!("{}/api/auth/github", base))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 307);
        let loc = location(&resp);
        assert!(loc.contains("client_id=cid123"));
        assert!(loc.contains("state="));
        assert!(loc.contains("scope=repo+read%3Auser"));

        let cookies = set_cookies(&resp);
        let state_cookie = cookies
            .iter()
            .find(|c| c.starts_with(STATE_COOKIE))
            .expect("state cookie missing");
        assert!(state_cookie.contains("HttpOnly"));
        assert!(state_cookie.contains("Max-Age=600"));
    }

    #[tokio::test]
    async fn login_without_client_id_is_a_server_error() {
        let base = spawn_app(ServerConfig::default()).await;
        let resp = no_redirect_client()
            .get(format!("{}/api/auth/github", base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 500);
    }

    #[tokio::test]
    async fn callback_success_sets_session_cookies() {
        let base = configured_app().await;
        let resp = no_redirect_client()
            .get(format!(
                "{}/api/auth/github/callback?code=good&state=abc123",
                base
            ))
            .header("Cookie", format!("{}=abc123", STATE_COOKIE))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 307);
        assert_eq!(location(&resp), "/?auth=success");

        let cookies = set_cookies(&resp);
        let session = cookies
            .iter()
            .find(|c| c.starts_with(SESSION_COOKIE))
            .expect("session cookie missing");
        assert!(session.contains("gho_testtoken"));
        assert!(session.contains("HttpOnly"));

        let user = cookies
            .iter()
            .find(|c| c.starts_with(USER_COOKIE))
            .expect("user cookie missing");
        assert!(user.contains("octocat"));
        assert!(!user.contains("HttpOnly"));

        // The handshake cookie is consumed.
        assert!(cookies
            .iter()
            .any(|c| c.starts_with(STATE_COOKIE) && c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn callback_state_mismatch_rejects_without_exchanging() {
        let base = configured_app().await;
        let resp = no_redirect_client()
            .get(format!(
                "{}/api/auth/github/callback?code=good&state=evil",
                base
            ))
            .header("Cookie", format!("{}=abc123", STATE_COOKIE))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 307);
        assert!(location(&resp).starts_with("/?error="));
        assert!(location(&resp).contains("state%20mismatch"));

        let cookies = set_cookies(&resp);
        assert!(!cookies.iter().any(|c| c.starts_with(SESSION_COOKIE)));
        assert!(cookies
            .iter()
            .any(|c| c.starts_with(STATE_COOKIE) && c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn callback_without_code_rejects() {
        let base = configured_app().await;
        let resp = no_redirect_client()
            .get(format!("{}/api/auth/github/callback?state=abc", base))
            .header("Cookie", format!("{}=abc", STATE_COOKIE))
            .send()
            .await
            .unwrap();

        assert!(location(&resp).starts_with("/?error="));
    }

    #[tokio::test]
    async fn callback_propagates_provider_error() {
        let base = configured_app().await;
        let resp = no_redirect_client()
            .get(format!(
                "{}/api/auth/github/callback?error=access_denied",
                base
            ))
            .send()
            .await
            .unwrap();

        assert!(location(&resp).contains("access%5Fdenied"));
    }

    #[tokio::test]
    async fn callback_surfaces_exchange_failure() {
        let base = configured_app().await;
        let resp = no_redirect_client()
            .get(format!(
                "{}/api/auth/github/callback?code=bad-code&state=s1",
                base
            ))
            .header("Cookie", format!("{}=s1", STATE_COOKIE))
            .send()
            .await
            .unwrap();

        assert!(location(&resp).starts_with("/?error="));
        let cookies = set_cookies(&resp);
        assert!(!cookies.iter().any(|c| c.starts_with(SESSION_COOKIE)));
    }

    #[tokio::test]
    async fn status_without_session_is_unauthenticated() {
        let base = configured_app().await;
        let body: serde_json::Value = reqwest::get(format!("{}/api/auth/status", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["authenticated"], false);
        assert!(body["user"].is_null());
        assert!(body["accessToken"].is_null());
    }

    #[tokio::test]
    async fn status_reads_session_and_profile_cookies() {
        let base = configured_app().await;
        let profile = utf8_percent_encode(r#"{"login":"octocat","name":"The Octocat"}"#, NON_ALPHANUMERIC);
        let body: serde_json::Value = no_redirect_client()
            .get(format!("{}/api/auth/status", base))
            .header(
                "Cookie",
                format!(
                    "{}=gho_testtoken; {}={}",
                    SESSION_COOKIE, USER_COOKIE, profile
                ),
            )
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["authenticated"], true);
        assert_eq!(body["accessToken"], "gho_testtoken");
        assert_eq!(body["user"]["login"], "octocat");
    }

    #[tokio::test]
    async fn logout_clears_cookies_and_is_idempotent() {
        let base = configured_app().await;
        let client = no_redirect_client();

        for _ in 0..2 {
            let resp = client
                .delete(format!("{}/api/auth/status", base))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), 200);

            let cookies = set_cookies(&resp);
            assert!(cookies
                .iter()
                .any(|c| c.starts_with(SESSION_COOKIE) && c.contains("Max-Age=0")));
            assert!(cookies
                .iter()
                .any(|c| c.starts_with(USER_COOKIE) && c.contains("Max-Age=0")));

            let body: serde_json::Value = resp.json().await.unwrap();
            assert_eq!(body["success"], true);
        }
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let base = configured_app().await;
        let body: serde_json::Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert!(body["version"].is_string());
    }
}
