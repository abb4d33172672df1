use crate::infer::infer_widget_kind;
use gitcanvas_protocol::{ChatMessage, MessageRole, RenderedComponent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One assistant message that produced a visual widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub message_id: String,
    /// De-duplicated display label, e.g. "Risk Heatmap #2".
    pub label: String,
    /// The plain inferred kind name, without any ordinal.
    pub subtitle: String,
    pub component: RenderedComponent,
}

/// Derive the ordered component list from a message thread.
///
/// Labels are positional: the list is recomputed from scratch on every call,
/// so removing an earlier component of a kind shifts later ordinals of the
/// same kind. Whether assignment-time-frozen numbering is wanted instead is
/// an open product question; this matches the shipped behavior.
pub fn collect_components(messages: &[ChatMessage]) -> Vec<ComponentRecord> {
    let rendered: Vec<(&ChatMessage, &RenderedComponent)> = messages
        .iter()
        .filter(|m| m.role == MessageRole::Assistant && !m.cancelled)
        .filter_map(|m| m.component.as_ref().map(|c| (m, c)))
        .collect();

    let base_names: Vec<&'static str> = rendered
        .iter()
        .map(|(_, c)| infer_widget_kind(c).display_name())
        .collect();

    let mut totals: HashMap<&str, usize> = HashMap::new();
    for name in base_names.iter().copied() {
        *totals.entry(name).or_insert(0) += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    rendered
        .into_iter()
        .zip(base_names)
        .map(|((message, component), base)| {
            let ordinal = *seen.entry(base).and_modify(|n| *n += 1).or_insert(1);
            let label = if totals[base] > 1 {
                format!("{} #{}", base, ordinal)
            } else {
                base.to_string()
            };
            ComponentRecord {
                message_id: message.id.clone(),
                label,
                subtitle: base.to_string(),
                component: component.clone(),
            }
        })
        .collect()
}

/// The component list plus a by-message lookup.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    records: Vec<ComponentRecord>,
    by_message: HashMap<String, usize>,
}

impl ComponentRegistry {
    pub fn from_messages(messages: &[ChatMessage]) -> Self {
        let records = collect_components(messages);
        let by_message = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.message_id.clone(), i))
            .collect();
        Self {
            records,
            by_message,
        }
    }

    pub fn records(&self) -> &[ComponentRecord] {
        &self.records
    }

    pub fn record_for_message(&self, message_id: &str) -> Option<&ComponentRecord> {
        self.by_message
            .get(message_id)
            .map(|&i| &self.records[i])
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
