use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// A visual widget the orchestration layer attached to a message.
///
/// Producers are expected to set `type_tag` (a stable machine name such as
/// "commit_timeline"); untagged components fall back to shape sniffing over
/// `props` in `gitcanvas-registry`. A component may wrap a single child, as
/// container elements do, in which case inference recurses into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderedComponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<RenderedComponent>>,
    #[serde(default)]
    pub props: serde_json::Value,
}

impl RenderedComponent {
    pub fn tagged(type_tag: impl Into<String>, props: serde_json::Value) -> Self {
        Self {
            type_tag: Some(type_tag.into()),
            display_name: None,
            child: None,
            props,
        }
    }

    pub fn untagged(props: serde_json::Value) -> Self {
        Self {
            props,
            ..Default::default()
        }
    }

    pub fn with_child(mut self, child: RenderedComponent) -> Self {
        self.child = Some(Box::new(child));
        self
    }
}

/// One entry of the thread, as handed over by the orchestration layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<RenderedComponent>,
}

impl ChatMessage {
    pub fn assistant(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::Assistant,
            cancelled: false,
            component: None,
        }
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::User,
            cancelled: false,
            component: None,
        }
    }

    pub fn with_component(mut self, component: RenderedComponent) -> Self {
        self.component = Some(component);
        self
    }

    pub fn cancelled(mut self) -> Self {
        self.cancelled = true;
        self
    }
}
