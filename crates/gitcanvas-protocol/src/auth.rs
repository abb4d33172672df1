use serde::{Deserialize, Serialize};

/// Minimal GitHub profile carried alongside a validated token.
///
/// Field names match GitHub's `/user` payload so the struct deserializes
/// straight from the API response and from the readable profile cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Client-side view of the auth state.
///
/// `is_authenticated` is true iff `access_token` is set and the last
/// validation round-trip against GitHub succeeded. A failed validation
/// leaves the session cleared with `error` describing what went wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: Option<String>,
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
    pub error: Option<String>,
}

impl AuthSession {
    pub fn authenticated(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            access_token: Some(token.into()),
            is_authenticated: true,
            user: Some(user),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            access_token: None,
            is_authenticated: false,
            user: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_deserializes_from_github_user_payload() {
        let user: UserProfile = serde_json::from_str(
            r#"{"login": "octocat", "avatar_url": "https://example.com/a.png", "name": "The Octocat", "id": 1}"#,
        )
        .unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.name.as_deref(), Some("The Octocat"));
    }

    #[test]
    fn failed_session_is_unauthenticated_and_tokenless() {
        let session = AuthSession::failed("token validation failed: HTTP 401");
        assert!(!session.is_authenticated);
        assert!(session.access_token.is_none());
        assert!(session.error.is_some());
    }
}
