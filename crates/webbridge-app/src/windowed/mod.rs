//! Windowed host: one widget on the platform web view inside a winit window.

mod host;

pub use host::{LoggingHost, NativeWindow};

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tracing::{error, info, warn};
use webbridge_common::{EngineKind, HostLifecycleEvent, LifecycleBus, Rect, WidgetId};
use webbridge_config::schema::BridgeConfig;
use webbridge_view::{
    BrowserEngine, SharedWindow, SystemEngine, SystemEngineOptions, WidgetRegistry,
};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowAttributes, WindowId};

const POLL_INTERVAL: Duration = Duration::from_millis(8);

/// The widget's tag in the windowed host.
const WIDGET: WidgetId = WidgetId(1);

/// `source` property value for the `open` flags. `None` leaves the widget
/// on its blank page.
pub fn initial_source(url: Option<String>, html: Option<String>) -> Option<Value> {
    match (url, html) {
        (Some(uri), _) => Some(json!({ "uri": uri })),
        (None, Some(html)) => Some(json!({ "html": html })),
        (None, None) => None,
    }
}

fn logical_bounds(size: PhysicalSize<u32>, scale_factor: f64) -> Rect {
    let size: LogicalSize<f64> = size.to_logical(scale_factor);
    Rect {
        x: 0.0,
        y: 0.0,
        width: size.width,
        height: size.height,
    }
}

pub struct WindowedHost {
    config: BridgeConfig,
    source: Option<Value>,
    window: Option<Arc<Window>>,
    registry: Option<WidgetRegistry>,
    last_poll: Instant,
    suspended: bool,
}

impl WindowedHost {
    pub fn new(config: BridgeConfig, source: Option<Value>) -> Self {
        Self {
            config,
            source,
            window: None,
            registry: None,
            last_poll: Instant::now(),
            suspended: false,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let attrs = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                f64::from(self.config.window.width),
                f64::from(self.config.window.height),
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                error!("failed to create window: {e}");
                return false;
            }
        };

        if self.config.engine.kind == EngineKind::Headless {
            warn!("headless engine has no surface, using the system engine (see `webbridge replay`)");
        }

        let shared: SharedWindow = Arc::new(Mutex::new(NativeWindow::new(Arc::clone(&window))));
        let bus = LifecycleBus::new(self.config.host.lifecycle_capacity.max(1) as usize);
        let mut registry = WidgetRegistry::new(
            Arc::new(LoggingHost::new(self.config.host.direct_bridge)),
            shared,
            bus,
        )
        .with_defaults(self.config.defaults_for(EngineKind::System));

        let options = SystemEngineOptions {
            bounds: logical_bounds(window.inner_size(), window.scale_factor()),
            devtools: self.config.engine.devtools,
            transparent: self.config.engine.transparent,
        };
        let created = registry.create(WIDGET, |hooks| {
            let engine = SystemEngine::build_as_child(window.as_ref(), options, hooks)?;
            Ok(Box::new(engine) as Box<dyn BrowserEngine>)
        });
        let widget = match created {
            Ok(widget) => widget,
            Err(e) => {
                error!(error = %e, "failed to create widget");
                return false;
            }
        };

        if let Err(e) = widget.set_property("messagingEnabled", &Value::Bool(true)) {
            warn!(error = %e, "messaging unavailable");
        }
        if let Some(source) = self.source.take() {
            if let Err(e) = widget.set_property("source", &source) {
                warn!(error = %e, "initial source rejected");
            }
        }

        info!(widget_id = %WIDGET, "widget ready");
        self.window = Some(window);
        self.registry = Some(registry);
        true
    }

    fn sync_bounds(&mut self, size: PhysicalSize<u32>) {
        let (Some(window), Some(registry)) = (&self.window, &mut self.registry) else {
            return;
        };
        let bounds = logical_bounds(size, window.scale_factor());
        if let Some(widget) = registry.get_mut(WIDGET) {
            if let Err(e) = widget.set_bounds(bounds) {
                warn!(widget_id = %WIDGET, error = %e, "failed to update widget bounds");
            }
        }
    }

    fn publish(&self, event: HostLifecycleEvent) {
        if let Some(registry) = &self.registry {
            registry.publish_lifecycle(event);
        }
    }

    /// Pump the widget. Returns `false` once it has been torn down.
    fn poll(&mut self) -> bool {
        let Some(registry) = &mut self.registry else {
            return false;
        };
        if let Err(e) = registry.pump_all() {
            warn!(error = %e, "widget pump failed");
        }
        registry.count() > 0
    }

    fn shutdown(&mut self) {
        self.publish(HostLifecycleEvent::Destroy);
        self.poll();
        if let Some(mut registry) = self.registry.take() {
            registry.destroy_all();
        }
        self.window = None;
    }
}

impl ApplicationHandler for WindowedHost {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            if self.suspended {
                self.suspended = false;
                self.publish(HostLifecycleEvent::Resume);
            }
            return;
        }
        if !self.initialize(event_loop) {
            event_loop.exit();
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.suspended = true;
        self.publish(HostLifecycleEvent::Pause);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("window close requested");
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.sync_bounds(size);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if self.registry.is_some() && now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            if !self.poll() {
                info!("widget gone, exiting");
                self.shutdown();
                event_loop.exit();
                return;
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }
}
