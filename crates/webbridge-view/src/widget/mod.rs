//! The web widget: one engine plus the components that drive it.
//!
//! A widget is created with an engine factory, configured one property at a
//! time through the property table, driven by host commands, and pumped on
//! the UI thread to turn queued engine callbacks and page messages into host
//! events.

mod dispatch;
mod props;


use std::collections::BTreeMap;
use std::sync::{mpsc, Arc};

use serde_json::Value;
use tracing::{debug, info, warn};
use webbridge_common::{
    BridgeError, EngineError, HostLifecycleEvent, Rect, Result, WidgetId,
};

use crate::commands::Command;
use crate::download::DownloadMessages;
use crate::emitter::EventEmitter;
use crate::engine::{BrowserEngine, EngineCallback, EngineHooks, Headers, NavigationGate};
use crate::fullscreen::FullscreenVideoCoordinator;
use crate::host::{HostBridge, SharedWindow};
use crate::lifecycle::LifecycleManager;
use crate::navigation::NavigationController;
use crate::script::ScriptBridge;
use crate::settings::EngineSettingsAdapter;

pub use props::{property_names, PropKind};

/// Every declarative property last applied to a widget. Last write wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetConfiguration {
    values: BTreeMap<String, Value>,
}

impl WidgetConfiguration {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn record(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }
}

pub struct WebWidget {
    id: WidgetId,
    host: Arc<dyn HostBridge>,
    window: SharedWindow,
    engine: Box<dyn BrowserEngine>,
    hooks: EngineHooks,
    callbacks: mpsc::Receiver<EngineCallback>,
    config: WidgetConfiguration,
    settings: EngineSettingsAdapter,
    navigation: NavigationController,
    scripts: ScriptBridge,
    emitter: EventEmitter,
    fullscreen: FullscreenVideoCoordinator,
    lifecycle: LifecycleManager,
    downloads: DownloadMessages,
}

impl WebWidget {
    /// Build the engine through `factory` and apply the creation defaults.
    pub fn create<F>(
        id: WidgetId,
        host: Arc<dyn HostBridge>,
        window: SharedWindow,
        lifecycle: LifecycleManager,
        factory: F,
    ) -> Result<Self>
    where
        F: FnOnce(EngineHooks) -> std::result::Result<Box<dyn BrowserEngine>, EngineError>,
    {
        let gate = Arc::new(NavigationGate::new(id, Arc::clone(&host)));
        let (hooks, callbacks) = EngineHooks::channel(Arc::clone(&gate));
        let mut engine = factory(hooks.clone())?;

        let settings = EngineSettingsAdapter::new();
        settings.apply_creation_defaults(engine.as_mut())?;

        info!(widget_id = %id, engine = ?engine.kind(), "widget created");
        Ok(Self {
            id,
            host,
            window,
            engine,
            hooks,
            callbacks,
            config: WidgetConfiguration::default(),
            settings,
            navigation: NavigationController::new(gate),
            scripts: ScriptBridge::new(),
            emitter: EventEmitter::new(id),
            fullscreen: FullscreenVideoCoordinator::new(id),
            lifecycle,
            downloads: DownloadMessages::default(),
        })
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn engine(&self) -> &dyn BrowserEngine {
        self.engine.as_ref()
    }

    pub fn configuration(&self) -> &WidgetConfiguration {
        &self.config
    }

    pub fn emitter(&self) -> &EventEmitter {
        &self.emitter
    }

    pub fn scripts(&self) -> &ScriptBridge {
        &self.scripts
    }

    pub fn fullscreen(&self) -> &FullscreenVideoCoordinator {
        &self.fullscreen
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifecycle.is_destroyed()
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_destroyed() {
            return Err(EngineError::Destroyed.into());
        }
        Ok(())
    }

    /// Apply one declarative property to the live engine.
    pub fn set_property(&mut self, name: &str, value: &Value) -> Result<()> {
        self.ensure_live()?;
        let entry =
            props::lookup(name).ok_or_else(|| BridgeError::UnknownProperty(name.to_string()))?;
        if !entry.kind.accepts(value) {
            return Err(BridgeError::InvalidProperty {
                name: name.to_string(),
                expected: entry.kind.expected(),
            });
        }
        (entry.apply)(self, value)?;
        self.config.record(name, value.clone());
        debug!(widget_id = %self.id, property = name, "property applied");
        Ok(())
    }

    /// Run a host command by name or numeric id.
    pub fn receive_command(&mut self, command: &str, args: &[Value]) -> Result<()> {
        self.ensure_live()?;
        let command = Command::parse(command, args)?;
        self.run_command(command)
    }

    pub fn run_command(&mut self, command: Command) -> Result<()> {
        self.ensure_live()?;
        debug!(widget_id = %self.id, command = command.name(), "command");
        let engine = self.engine.as_mut();
        match command {
            Command::GoBack => self.navigation.go_back(engine),
            Command::GoForward => self.navigation.go_forward(engine),
            Command::Reload => self.navigation.reload(engine),
            Command::StopLoading => self.navigation.stop_loading(engine),
            Command::PostMessage(data) => self.scripts.post_message(engine, &data),
            Command::InjectJavaScript(script) => self.scripts.inject_javascript(engine, &script),
            Command::LoadUrl(url) => {
                self.emitter.command_load_url();
                self.navigation
                    .load_url(engine, &url, &Headers::new())
                    .map(|_| ())
            }
            Command::RequestFocus => Ok(engine.request_focus()?),
            Command::ClearFormData => Ok(engine.clear_form_data()?),
            Command::ClearCache { include_disk_files } => {
                Ok(engine.clear_cache(include_disk_files)?)
            }
            Command::ClearHistory => Ok(engine.clear_history()?),
        }
    }

    pub fn set_bounds(&mut self, bounds: Rect) -> Result<()> {
        self.ensure_live()?;
        Ok(self.engine.set_bounds(bounds)?)
    }

    /// Process everything queued since the last pump: host lifecycle
    /// notifications, engine callbacks, then page messages. Returns the
    /// number of items handled. A failing item is logged and the rest are
    /// still delivered; the first failure is returned afterwards.
    pub fn pump(&mut self) -> Result<usize> {
        if self.is_destroyed() {
            return Ok(0);
        }
        let mut handled = 0;

        for event in self.lifecycle.poll() {
            handled += 1;
            match event {
                HostLifecycleEvent::Pause => self.engine.pause(),
                HostLifecycleEvent::Resume => self.engine.resume(),
                HostLifecycleEvent::Destroy => {
                    self.destroy();
                    return Ok(handled);
                }
            }
        }

        // one failing item must not swallow the ones queued behind it
        let mut first_error = None;
        let callbacks: Vec<EngineCallback> = self.callbacks.try_iter().collect();
        for callback in callbacks {
            handled += 1;
            let name = callback.name();
            if let Err(e) = self.handle_callback(callback) {
                warn!(widget_id = %self.id, callback = name, error = %e, "engine callback failed");
                first_error.get_or_insert(e);
            }
        }

        for data in self.scripts.drain_messages() {
            handled += 1;
            if let Err(e) = self.relay_page_message(data) {
                warn!(widget_id = %self.id, error = %e, "page message not delivered");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(handled),
        }
    }

    /// Tear everything down. Safe to call any number of times; only the
    /// first call does anything.
    pub fn destroy(&mut self) {
        if !self.lifecycle.begin_destroy() {
            return;
        }
        self.hooks.detach();
        let dropped = self.scripts.discard_messages() + self.callbacks.try_iter().count();
        if dropped > 0 {
            debug!(widget_id = %self.id, dropped, "pending messages dropped at teardown");
        }

        match self.window.lock() {
            Ok(mut window) => self.fullscreen.force_exit(&mut *window, self.engine.as_mut()),
            Err(_) => warn!(widget_id = %self.id, "window lock poisoned, overlay left as is"),
        }
        self.engine.destroy();
    }
}

impl Drop for WebWidget {
    fn drop(&mut self) {
        self.destroy();
    }
}
