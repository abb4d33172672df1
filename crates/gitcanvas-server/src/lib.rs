//! HTTP surface of gitcanvas.
//!
//! Three auth endpoints implement the GitHub authorization-code exchange:
//! initiate (`GET /api/auth/github`), callback
//! (`GET /api/auth/github/callback`) and status/logout
//! (`GET|DELETE /api/auth/status`). The browser session lives in cookies;
//! nothing is persisted server-side between the steps.

mod config;
mod error;
mod github;
mod server;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use server::AuthServer;
