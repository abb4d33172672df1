use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("GitHub OAuth is not configured (missing client id)")]
    OAuthNotConfigured,

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Profile fetch failed: {0}")]
    ProfileFetch(String),

    #[error("Server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;
