use crate::events::Event;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;

const DEFAULT_CHANNEL_CAPACITY: usize = 256;

pub trait EventBus: Send + Sync {
    fn publish(&self, event: Event);
    fn subscribe(&self) -> broadcast::Receiver<Event>;
    fn subscriber_count(&self) -> usize;
}

pub struct BroadcastBus {
    sender: broadcast::Sender<Event>,
    subscriber_count: Arc<RwLock<usize>>,
}

impl BroadcastBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriber_count: Arc::new(RwLock::new(0)),
        }
    }
}

impl Default for BroadcastBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for BroadcastBus {
    fn publish(&self, event: Event) {
        if let Err(e) = self.sender.send(event) {
            tracing::debug!(
                "event dropped (no subscribers): {}",
                e.0.event_name()
            );
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<Event> {
        *self.subscriber_count.write() += 1;
        self.sender.subscribe()
    }

    fn subscriber_count(&self) -> usize {
        *self.subscriber_count.read()
    }
}

impl Clone for BroadcastBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            subscriber_count: self.subscriber_count.clone(),
        }
    }
}
