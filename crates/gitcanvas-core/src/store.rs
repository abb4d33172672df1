use crate::repo_url::parse_repo_url;
use crate::storage::StatePersistence;
use gitcanvas_events::{Event, EventBus};
use gitcanvas_protocol::{AuthSession, RepoSelection, UserProfile};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

pub const REPO_SELECTION_KEY: &str = "repo-selection";
pub const AUTH_KEY: &str = "auth";

const GITHUB_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("gitcanvas/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize, Deserialize)]
struct AuthBlob {
    #[serde(rename = "accessToken")]
    access_token: String,
}

#[derive(Default)]
struct StoreState {
    selection: Option<RepoSelection>,
    auth: AuthSession,
    applied_auth_generation: u64,
}

/// The single writer of the persisted repository selection and auth token.
///
/// Every mutation persists through the injected [`StatePersistence`] port and
/// publishes on the injected bus, so UI regions without a store reference can
/// react. Consumers that subscribe late read the snapshot accessors instead
/// of relying on replay.
pub struct WorkspaceStore {
    persistence: Box<dyn StatePersistence>,
    bus: Arc<dyn EventBus>,
    state: RwLock<StoreState>,
    http: reqwest::Client,
    api_base: String,
    auth_generation: AtomicU64,
}

impl WorkspaceStore {
    pub fn new(persistence: Box<dyn StatePersistence>, bus: Arc<dyn EventBus>) -> Self {
        let store = Self {
            persistence,
            bus,
            state: RwLock::new(StoreState::default()),
            http: reqwest::Client::new(),
            api_base: GITHUB_API_BASE.to_string(),
            auth_generation: AtomicU64::new(0),
        };
        store.restore_selection();
        store
    }

    /// Point token validation at a different API base. Test seam.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn repo_selection(&self) -> Option<RepoSelection> {
        self.state.read().selection.clone()
    }

    pub fn auth_session(&self) -> AuthSession {
        self.state.read().auth.clone()
    }

    /// The persisted token, if any. Read on startup to re-run validation;
    /// the token is not trusted until `set_auth` confirms it.
    pub fn persisted_token(&self) -> Option<String> {
        let raw = self.persistence.get(AUTH_KEY)?;
        match serde_json::from_str::<AuthBlob>(&raw) {
            Ok(blob) => Some(blob.access_token),
            Err(e) => {
                tracing::warn!("ignoring corrupt auth blob: {}", e);
                None
            }
        }
    }

    /// Overwrite the current selection. A missing branch keeps the prior
    /// branch; on a first set it falls back to "main". An empty owner or
    /// repo is rejected and the current selection stays as it was.
    pub fn set_repo(&self, owner: &str, repo: &str, branch: Option<&str>) {
        if owner.is_empty() || repo.is_empty() {
            tracing::warn!("rejecting selection with empty owner or repo");
            return;
        }
        let selection = {
            let mut state = self.state.write();
            let prior_branch = state.selection.as_ref().map(|s| s.branch.clone());
            let branch = branch
                .map(String::from)
                .or(prior_branch)
                .unwrap_or_else(|| gitcanvas_protocol::DEFAULT_BRANCH.to_string());
            let selection = RepoSelection::new(owner, repo).with_branch(branch);
            state.selection = Some(selection.clone());
            selection
        };

        self.persist_json(REPO_SELECTION_KEY, &selection);
        self.bus.publish(Event::RepoChanged {
            selection: Some(selection),
        });
    }

    /// Parse free-text input and apply it on a match. Unparseable input
    /// leaves the selection untouched and returns `None`.
    pub fn parse_and_set(&self, raw: &str) -> Option<RepoSelection> {
        let parsed = parse_repo_url(raw)?;
        self.set_repo(&parsed.owner, &parsed.repo, parsed.branch.as_deref());
        self.repo_selection()
    }

    /// Clear the selection and its persisted copy.
    pub fn disconnect(&self) {
        self.state.write().selection = None;
        if let Err(e) = self.persistence.remove(REPO_SELECTION_KEY) {
            tracing::warn!("failed to clear persisted selection: {}", e);
        }
        self.bus.publish(Event::RepoChanged { selection: None });
    }

    /// Subscribe to the bus and disconnect whenever a new thread starts,
    /// until the bus closes. The selection is scoped to a conversation
    /// thread, so starting a fresh one must not carry it over.
    pub fn spawn_thread_reset(self: &Arc<Self>, bus: &dyn EventBus) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        let this = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(Event::StartNewThread) => this.disconnect(),
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("thread reset listener lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Validate `token` against GitHub and apply the outcome.
    ///
    /// Overlapping calls are fenced by a generation counter: only the
    /// response belonging to the most recently issued call lands in state,
    /// so a slow stale validation cannot overwrite a newer result. The
    /// fence check, the state write and the persistence write all happen
    /// under the same lock, so a stale response cannot slip in between.
    pub async fn set_auth(&self, token: impl Into<String>) -> AuthSession {
        let token = token.into();
        let generation = self.auth_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let outcome = self.validate_token(&token).await;

        let event = {
            let mut state = self.state.write();
            let is_latest = self.auth_generation.load(Ordering::SeqCst) == generation;
            if !is_latest || generation <= state.applied_auth_generation {
                tracing::debug!("discarding stale token validation (generation {})", generation);
                return state.auth.clone();
            }
            state.applied_auth_generation = generation;

            match outcome {
                Ok(user) => {
                    state.auth = AuthSession::authenticated(&token, user.clone());
                    self.persist_json(
                        AUTH_KEY,
                        &AuthBlob {
                            access_token: token,
                        },
                    );
                    tracing::info!(login = %user.login, "token validated");
                    Event::AuthChanged {
                        is_authenticated: true,
                        user: Some(user),
                    }
                }
                Err(message) => {
                    state.auth = AuthSession::failed(&message);
                    if let Err(e) = self.persistence.remove(AUTH_KEY) {
                        tracing::warn!("failed to clear persisted token: {}", e);
                    }
                    tracing::warn!("token validation failed: {}", message);
                    Event::AuthChanged {
                        is_authenticated: false,
                        user: None,
                    }
                }
            }
        };

        self.bus.publish(event);
        self.auth_session()
    }

    /// Drop auth state and the persisted token.
    pub fn clear_auth(&self) {
        self.state.write().auth = AuthSession::default();
        if let Err(e) = self.persistence.remove(AUTH_KEY) {
            tracing::warn!("failed to clear persisted token: {}", e);
        }
        self.bus.publish(Event::AuthChanged {
            is_authenticated: false,
            user: None,
        });
    }

    async fn validate_token(&self, token: &str) -> std::result::Result<UserProfile, String> {
        let response = self
            .http
            .get(format!("{}/user", self.api_base))
            .header("Authorization", format!("Bearer {}", token))
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("GitHub returned HTTP {}", response.status()));
        }

        response
            .json::<UserProfile>()
            .await
            .map_err(|e| format!("invalid user payload: {}", e))
    }

    fn restore_selection(&self) {
        let Some(raw) = self.persistence.get(REPO_SELECTION_KEY) else {
            return;
        };
        match serde_json::from_str::<RepoSelection>(&raw) {
            Ok(selection) => self.state.write().selection = Some(selection),
            Err(e) => tracing::warn!("ignoring corrupt repo selection: {}", e),
        }
    }

    fn persist_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => {
                if let Err(e) = self.persistence.set(key, &raw) {
                    tracing::warn!("failed to persist {}: {}", key, e);
                }
            }
            Err(e) => tracing::warn!("failed to encode {}: {}", key, e),
        }
    }
}
