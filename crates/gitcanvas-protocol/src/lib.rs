//! Shared types for the gitcanvas workspace: repository selection, auth
//! session, chat messages, and the rendered-component payload that rides on
//! assistant messages.

mod auth;
mod message;
mod repo;

pub use auth::*;
pub use message::*;
pub use repo::*;
