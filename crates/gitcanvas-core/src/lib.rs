//! Core state management for gitcanvas.
//!
//! This crate owns the two pieces of state the rest of the workspace derives
//! from: the selected repository and the auth session. Both live in
//! [`WorkspaceStore`], which persists through an injected [`StatePersistence`]
//! port and announces every mutation on the shared event bus.

mod error;
mod repo_url;
mod storage;
mod store;

pub use error::{CoreError, Result};
pub use repo_url::{parse_repo_url, ParsedRepoUrl};
pub use storage::{JsonFileStorage, MemoryStorage, StatePersistence};
pub use store::{WorkspaceStore, AUTH_KEY, REPO_SELECTION_KEY};
