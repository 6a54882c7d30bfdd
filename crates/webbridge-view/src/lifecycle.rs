//! Ties a widget to the host's pause/resume/destroy notifications.

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};
use webbridge_common::{HostLifecycleEvent, WidgetId};

pub struct LifecycleManager {
    widget_id: WidgetId,
    receiver: Option<broadcast::Receiver<HostLifecycleEvent>>,
    destroyed: bool,
}

impl LifecycleManager {
    /// Registration happens by handing over a subscribed receiver.
    pub fn register(
        widget_id: WidgetId,
        receiver: broadcast::Receiver<HostLifecycleEvent>,
    ) -> Self {
        debug!(widget_id = %widget_id, "registered for host lifecycle");
        Self {
            widget_id,
            receiver: Some(receiver),
            destroyed: false,
        }
    }

    /// A manager not listening to any host. Used for widgets created outside
    /// a registry.
    pub fn detached(widget_id: WidgetId) -> Self {
        Self {
            widget_id,
            receiver: None,
            destroyed: false,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.receiver.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Host notifications received since the last poll, oldest first.
    pub fn poll(&mut self) -> Vec<HostLifecycleEvent> {
        let mut events = Vec::new();
        let Some(receiver) = self.receiver.as_mut() else {
            return events;
        };
        loop {
            match receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(widget_id = %self.widget_id, skipped, "lifecycle notifications lagged");
                }
                Err(TryRecvError::Closed) => {
                    debug!(widget_id = %self.widget_id, "lifecycle bus closed");
                    self.receiver = None;
                    break;
                }
            }
        }
        events
    }

    pub fn unregister(&mut self) {
        if self.receiver.take().is_some() {
            debug!(widget_id = %self.widget_id, "unregistered from host lifecycle");
        }
    }

    /// Marks the widget destroyed and unregisters. Returns `true` only for
    /// the first call; the caller runs teardown exactly then.
    pub fn begin_destroy(&mut self) -> bool {
        if self.destroyed {
            debug!(widget_id = %self.widget_id, "destroy called again, ignored");
            return false;
        }
        self.destroyed = true;
        self.unregister();
        info!(widget_id = %self.widget_id, "widget teardown");
        true
    }
}

#[cfg(test)]
mod tests {
    use webbridge_common::LifecycleBus;

    use super::*;

    #[test]
    fn poll_returns_events_in_order() {
        let bus = LifecycleBus::default();
        let mut lm = LifecycleManager::register(WidgetId(1), bus.subscribe());

        bus.publish(HostLifecycleEvent::Pause);
        bus.publish(HostLifecycleEvent::Resume);
        assert_eq!(
            lm.poll(),
            vec![HostLifecycleEvent::Pause, HostLifecycleEvent::Resume]
        );
        assert!(lm.poll().is_empty());
    }

    #[test]
    fn destroy_is_one_shot_and_unregisters() {
        let bus = LifecycleBus::default();
        let mut lm = LifecycleManager::register(WidgetId(1), bus.subscribe());
        assert_eq!(bus.listener_count(), 1);

        assert!(lm.begin_destroy());
        assert!(!lm.begin_destroy());
        assert!(lm.is_destroyed());
        assert_eq!(bus.listener_count(), 0);
        assert!(lm.poll().is_empty());
    }

    #[test]
    fn lagged_receiver_keeps_latest() {
        let bus = LifecycleBus::new(2);
        let mut lm = LifecycleManager::register(WidgetId(1), bus.subscribe());
        for _ in 0..3 {
            bus.publish(HostLifecycleEvent::Pause);
        }
        bus.publish(HostLifecycleEvent::Destroy);

        let events = lm.poll();
        assert_eq!(events.last(), Some(&HostLifecycleEvent::Destroy));
        assert!(lm.is_registered());
    }

    #[test]
    fn closed_bus_unregisters() {
        let bus = LifecycleBus::default();
        let mut lm = LifecycleManager::register(WidgetId(1), bus.subscribe());
        drop(bus);
        assert!(lm.poll().is_empty());
        assert!(!lm.is_registered());
    }

    #[test]
    fn detached_manager_polls_nothing() {
        let mut lm = LifecycleManager::detached(WidgetId(5));
        assert!(!lm.is_registered());
        assert!(lm.poll().is_empty());
        assert!(lm.begin_destroy());
    }
}
