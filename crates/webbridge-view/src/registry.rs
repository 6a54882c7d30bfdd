//! Every live widget of one host, keyed by id.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};
use webbridge_common::{
    BridgeError, EngineError, HostLifecycleEvent, LifecycleBus, Result, WidgetId,
};

use crate::engine::{BrowserEngine, EngineHooks};
use crate::host::{HostBridge, SharedWindow};
use crate::lifecycle::LifecycleManager;
use crate::widget::WebWidget;

pub struct WidgetRegistry {
    host: Arc<dyn HostBridge>,
    window: SharedWindow,
    bus: LifecycleBus,
    defaults: BTreeMap<String, Value>,
    widgets: HashMap<WidgetId, WebWidget>,
}

impl WidgetRegistry {
    pub fn new(host: Arc<dyn HostBridge>, window: SharedWindow, bus: LifecycleBus) -> Self {
        Self {
            host,
            window,
            bus,
            defaults: BTreeMap::new(),
            widgets: HashMap::new(),
        }
    }

    /// Properties applied to every new widget before host-supplied ones.
    pub fn with_defaults(mut self, defaults: BTreeMap<String, Value>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Create a widget, register it for host lifecycle and apply the
    /// default properties. A default that fails is logged and skipped.
    pub fn create<F>(&mut self, id: WidgetId, factory: F) -> Result<&mut WebWidget>
    where
        F: FnOnce(EngineHooks) -> std::result::Result<Box<dyn BrowserEngine>, EngineError>,
    {
        if self.widgets.contains_key(&id) {
            return Err(BridgeError::DuplicateWidget(id));
        }
        let lifecycle = LifecycleManager::register(id, self.bus.subscribe());
        let mut widget = WebWidget::create(
            id,
            Arc::clone(&self.host),
            Arc::clone(&self.window),
            lifecycle,
            factory,
        )?;
        for (name, value) in &self.defaults {
            if let Err(e) = widget.set_property(name, value) {
                warn!(widget_id = %id, property = %name, error = %e, "default property skipped");
            }
        }
        Ok(self.widgets.entry(id).or_insert(widget))
    }

    pub fn get(&self, id: WidgetId) -> Option<&WebWidget> {
        self.widgets.get(&id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut WebWidget> {
        self.widgets.get_mut(&id)
    }

    fn widget_mut(&mut self, id: WidgetId) -> Result<&mut WebWidget> {
        self.widgets
            .get_mut(&id)
            .ok_or(BridgeError::WidgetNotFound(id))
    }

    pub fn set_property(&mut self, id: WidgetId, name: &str, value: &Value) -> Result<()> {
        self.widget_mut(id)?.set_property(name, value)
    }

    pub fn receive_command(&mut self, id: WidgetId, command: &str, args: &[Value]) -> Result<()> {
        self.widget_mut(id)?.receive_command(command, args)
    }

    /// Pump every widget, then drop the ones torn down along the way.
    /// The first error is returned after all widgets were pumped.
    pub fn pump_all(&mut self) -> Result<usize> {
        let mut handled = 0;
        let mut first_error = None;
        for widget in self.widgets.values_mut() {
            match widget.pump() {
                Ok(n) => handled += n,
                Err(e) => {
                    warn!(widget_id = %widget.id(), error = %e, "widget pump failed");
                    first_error.get_or_insert(e);
                }
            }
        }
        self.widgets.retain(|_, w| !w.is_destroyed());
        match first_error {
            Some(e) => Err(e),
            None => Ok(handled),
        }
    }

    /// Publish a host lifecycle notification. Returns the number of widgets
    /// that will see it on their next pump.
    pub fn publish_lifecycle(&self, event: HostLifecycleEvent) -> usize {
        let listeners = self.bus.publish(event);
        info!(?event, listeners, "host lifecycle published");
        listeners
    }

    pub fn destroy(&mut self, id: WidgetId) -> Result<()> {
        let mut widget = self
            .widgets
            .remove(&id)
            .ok_or(BridgeError::WidgetNotFound(id))?;
        widget.destroy();
        Ok(())
    }

    pub fn destroy_all(&mut self) {
        for (_, mut widget) in self.widgets.drain() {
            widget.destroy();
        }
    }

    pub fn count(&self) -> usize {
        self.widgets.len()
    }

    pub fn ids(&self) -> Vec<WidgetId> {
        let mut ids: Vec<WidgetId> = self.widgets.keys().copied().collect();
        ids.sort_by_key(|id| id.0);
        ids
    }
}

impl Drop for WidgetRegistry {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::engine::{EngineOp, HeadlessEngine, HeadlessHandle, HeadlessProfile};
    use crate::host::{DetachedWindow, QueuedHost};

    fn registry(host: &QueuedHost) -> WidgetRegistry {
        let window: SharedWindow = Arc::new(Mutex::new(DetachedWindow::new()));
        WidgetRegistry::new(Arc::new(host.clone()), window, LifecycleBus::default())
    }

    fn add(reg: &mut WidgetRegistry, id: u32) -> HeadlessHandle {
        let mut handle = None;
        reg.create(WidgetId(id), |hooks| {
            let engine = HeadlessEngine::new(HeadlessProfile::default(), hooks);
            handle = Some(engine.handle());
            Ok(Box::new(engine))
        })
        .unwrap();
        handle.unwrap()
    }

    #[test]
    fn create_applies_defaults_and_skips_unknown() {
        let host = QueuedHost::new();
        let mut reg = registry(&host).with_defaults(BTreeMap::from([
            ("textZoom".to_string(), json!(130)),
            ("noSuchProperty".to_string(), json!(1)),
        ]));
        add(&mut reg, 1);

        let widget = reg.get(WidgetId(1)).unwrap();
        assert_eq!(widget.engine().settings().text_zoom, 130);
        assert_eq!(widget.configuration().len(), 1);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let host = QueuedHost::new();
        let mut reg = registry(&host);
        add(&mut reg, 1);
        let result = reg.create(WidgetId(1), |_| Err(EngineError::Backend("unused".into())));
        assert!(matches!(result, Err(BridgeError::DuplicateWidget(WidgetId(1)))));
    }

    #[test]
    fn factory_failure_propagates() {
        let host = QueuedHost::new();
        let mut reg = registry(&host);
        let result = reg.create(WidgetId(2), |_| Err(EngineError::Backend("no display".into())));
        assert!(matches!(result, Err(BridgeError::Engine(EngineError::Backend(_)))));
        assert_eq!(reg.count(), 0);
    }

    #[test]
    fn unknown_widget_is_reported() {
        let host = QueuedHost::new();
        let mut reg = registry(&host);
        assert!(matches!(
            reg.receive_command(WidgetId(9), "reload", &[]),
            Err(BridgeError::WidgetNotFound(WidgetId(9)))
        ));
    }

    #[test]
    fn lifecycle_destroy_fans_out_and_prunes() {
        let host = QueuedHost::new();
        let mut reg = registry(&host);
        let a = add(&mut reg, 1);
        let b = add(&mut reg, 2);

        assert_eq!(reg.publish_lifecycle(HostLifecycleEvent::Destroy), 2);
        reg.pump_all().unwrap();

        assert_eq!(reg.count(), 0);
        assert!(a.destroyed());
        assert!(b.destroyed());
    }

    #[test]
    fn pump_all_routes_events_per_widget() {
        let host = QueuedHost::new();
        let mut reg = registry(&host);
        add(&mut reg, 1);
        add(&mut reg, 2);

        reg.set_property(WidgetId(2), "source", &json!({ "uri": "https://example.com/" }))
            .unwrap();
        assert_eq!(reg.pump_all().unwrap(), 3);

        let targets: Vec<WidgetId> = host
            .drain()
            .iter()
            .filter_map(|m| match m {
                crate::host::HostMessage::Event { target, .. } => Some(*target),
                _ => None,
            })
            .collect();
        assert_eq!(targets, vec![WidgetId(2); 3]);
    }

    #[test]
    fn destroy_and_destroy_all() {
        let host = QueuedHost::new();
        let mut reg = registry(&host);
        let a = add(&mut reg, 1);
        let b = add(&mut reg, 2);

        reg.destroy(WidgetId(1)).unwrap();
        assert!(a.destroyed());
        assert!(reg.destroy(WidgetId(1)).is_err());

        reg.destroy_all();
        assert!(b.destroyed());
        assert_eq!(b.count_ops(|op| *op == EngineOp::Destroy), 1);
        assert!(reg.ids().is_empty());
    }
}
