use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Token validation failed: {0}")]
    TokenValidation(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
