use gitcanvas_protocol::{RepoSelection, UserProfile};
use serde::{Deserialize, Serialize};

/// Page-level notifications.
///
/// These correspond one-to-one to the custom events the UI dispatches:
/// repo-changed, auth-changed, start-new-thread, import-code-message and
/// show-component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The active repository changed; `None` means the selection was cleared.
    RepoChanged {
        selection: Option<RepoSelection>,
    },
    /// Auth state changed, either by a validation result or a disconnect.
    AuthChanged {
        is_authenticated: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        user: Option<UserProfile>,
    },
    /// Reset the conversation, dropping the current thread.
    StartNewThread,
    /// A repository URL was pasted or picked outside the chat input.
    ImportCodeMessage {
        repo_url: String,
    },
    /// Bring the canvas panel to the component of the given message.
    ShowComponent {
        message_id: String,
    },
}

impl Event {
    pub fn event_name(&self) -> &'static str {
        match self {
            Event::RepoChanged { .. } => "repo_changed",
            Event::AuthChanged { .. } => "auth_changed",
            Event::StartNewThread => "start_new_thread",
            Event::ImportCodeMessage { .. } => "import_code_message",
            Event::ShowComponent { .. } => "show_component",
        }
    }
}
