use crate::registry::ComponentRecord;

/// Which component the canvas panel is showing.
///
/// A newly arrived record becomes the active one; an explicit show signal
/// (the show-component event) overrides that; closing the panel clears the
/// selection but never deletes records. When the active record disappears
/// from the derived list (message cancelled or edited away) the selection
/// falls back to the most recent remaining record.
#[derive(Debug, Default)]
pub struct CanvasState {
    active: Option<String>,
    known: usize,
}

impl CanvasState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile against the freshly derived record list.
    pub fn sync(&mut self, records: &[ComponentRecord]) {
        if records.len() > self.known {
            self.active = records.last().map(|r| r.message_id.clone());
        } else if let Some(active) = &self.active {
            if !records.iter().any(|r| &r.message_id == active) {
                self.active = records.last().map(|r| r.message_id.clone());
            }
        }
        self.known = records.len();
    }

    /// Explicit request to show a specific message's component.
    pub fn show(&mut self, message_id: impl Into<String>) {
        self.active = Some(message_id.into());
    }

    /// Close the panel. Records are untouched.
    pub fn close(&mut self) {
        self.active = None;
    }

    pub fn active_message(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }
}
