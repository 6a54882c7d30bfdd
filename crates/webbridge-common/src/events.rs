use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Lifecycle notifications published by the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostLifecycleEvent {
    Resume,
    Pause,
    Destroy,
}

/// Fan-out of host lifecycle notifications to every registered widget.
///
/// Subscribing is registration; dropping the receiver unregisters. Widgets
/// poll their receiver with `try_recv` on the UI thread, so no runtime is
/// required.
pub struct LifecycleBus {
    sender: broadcast::Sender<HostLifecycleEvent>,
}

impl LifecycleBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HostLifecycleEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: HostLifecycleEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LifecycleBus {
    fn default() -> Self {
        Self::new(16)
    }
}
