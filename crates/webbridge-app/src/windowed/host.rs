//! Host side of the windowed mode: a logging [`HostBridge`] and a winit
//! window standing in for the view hierarchy.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use webbridge_common::{Orientation, WidgetId};
use webbridge_view::engine::OverlayView;
use webbridge_view::{DownloadRequest, HostBridge, HostWindow, NavigationDecision};
use winit::window::{Fullscreen, Window};

/// Logs every event and call the widget sends to the host.
pub struct LoggingHost {
    direct_bridge: bool,
}

impl LoggingHost {
    pub fn new(direct_bridge: bool) -> Self {
        Self { direct_bridge }
    }
}

impl HostBridge for LoggingHost {
    fn dispatch_event(&self, target: WidgetId, name: &str, payload: serde_json::Value) {
        info!(widget_id = %target, event = name, %payload, "widget event");
    }

    fn direct_bridge_available(&self) -> bool {
        self.direct_bridge
    }

    fn call_function(&self, module: &str, method: &str, args: serde_json::Value) {
        info!(module, method, %args, "host function call");
    }

    fn should_start_load(
        &self,
        _target: WidgetId,
        _url: &str,
        _navigation_type: &str,
    ) -> NavigationDecision {
        NavigationDecision::Allow
    }

    fn open_external(&self, target: WidgetId, url: &str) -> bool {
        match platform_open(url) {
            Ok(()) => {
                info!(widget_id = %target, url, "opened with default handler");
                true
            }
            Err(e) => {
                warn!(widget_id = %target, url, error = %e, "failed to open URL");
                false
            }
        }
    }

    fn request_download(&self, target: WidgetId, request: &DownloadRequest) {
        info!(
            widget_id = %target,
            url = %request.url,
            file = %request.file_name,
            "{}",
            request.downloading_message
        );
        if let Err(e) = platform_open(&request.url) {
            warn!(widget_id = %target, error = %e, "download could not be handed off");
        }
    }
}

/// Schemes the desktop hands to the system's default handler.
const EXTERNAL_SCHEMES: &[&str] = &["http", "https", "mailto"];

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("malformed URL: {0}")]
    Malformed(#[from] url::ParseError),
    #[error("scheme {0:?} is not opened externally")]
    Scheme(String),
    #[error("no handler could be launched: {0}")]
    Launch(#[from] std::io::Error),
}

/// Parse `url` and accept it only for the schemes in [`EXTERNAL_SCHEMES`].
pub fn external_target(url: &str) -> Result<url::Url, OpenError> {
    let parsed = url::Url::parse(url)?;
    if !EXTERNAL_SCHEMES.contains(&parsed.scheme()) {
        return Err(OpenError::Scheme(parsed.scheme().to_string()));
    }
    Ok(parsed)
}

/// Launch the default handler without going through a shell.
fn platform_open(url: &str) -> Result<(), OpenError> {
    let target = external_target(url)?;
    open::that_detached(target.as_str())?;
    Ok(())
}

/// What the host window needs from the native window.
pub trait WindowSurface {
    fn set_fullscreen(&self, fullscreen: bool);
    fn set_decorations(&self, decorations: bool);
}

impl WindowSurface for Window {
    fn set_fullscreen(&self, fullscreen: bool) {
        Window::set_fullscreen(self, fullscreen.then_some(Fullscreen::Borderless(None)));
    }

    fn set_decorations(&self, decorations: bool) {
        Window::set_decorations(self, decorations);
    }
}

/// The top-level window. Desktop windows have no layered containers or
/// orientation. Full-screen video grows the web view with the window, so
/// the widget stays visible and the overlay is only bookkeeping.
pub struct NativeWindow<S = Window> {
    surface: Arc<S>,
    orientation: Orientation,
    overlay: Option<(WidgetId, OverlayView)>,
}

impl<S: WindowSurface> NativeWindow<S> {
    pub fn new(surface: Arc<S>) -> Self {
        Self {
            surface,
            orientation: Orientation::Unspecified,
            overlay: None,
        }
    }
}

impl<S: WindowSurface> HostWindow for NativeWindow<S> {
    fn widget_in_layered_container(&self, _widget: WidgetId) -> bool {
        false
    }

    fn renders_overlay_in_place(&self, _widget: WidgetId) -> bool {
        true
    }

    fn add_overlay(&mut self, widget: WidgetId, view: OverlayView) {
        self.surface.set_fullscreen(true);
        self.overlay = Some((widget, view));
        info!(widget_id = %widget, overlay = view.0, "entered full screen");
    }

    fn remove_overlay(&mut self, widget: WidgetId, view: OverlayView) {
        if self.overlay != Some((widget, view)) {
            debug!(widget_id = %widget, overlay = view.0, "overlay not shown, nothing to remove");
            return;
        }
        self.overlay = None;
        self.surface.set_fullscreen(false);
        info!(widget_id = %widget, "left full screen");
    }

    fn set_container_visible(&mut self, widget: WidgetId, visible: bool) {
        debug!(widget_id = %widget, visible, "no layered container");
    }

    fn requested_orientation(&self) -> Orientation {
        self.orientation
    }

    fn set_requested_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    fn set_system_ui_hidden(&mut self, hidden: bool) {
        self.surface.set_decorations(!hidden);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use webbridge_view::engine::{
        CustomViewCallback, EngineHooks, HeadlessEngine, HeadlessProfile, NavigationGate,
    };
    use webbridge_view::{FullscreenVideoCoordinator, QueuedHost};

    use super::*;

    #[derive(Default)]
    struct RecordingSurface {
        calls: Mutex<Vec<(&'static str, bool)>>,
    }

    impl RecordingSurface {
        fn calls(&self) -> Vec<(&'static str, bool)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl WindowSurface for RecordingSurface {
        fn set_fullscreen(&self, fullscreen: bool) {
            self.calls.lock().unwrap().push(("fullscreen", fullscreen));
        }

        fn set_decorations(&self, decorations: bool) {
            self.calls.lock().unwrap().push(("decorations", decorations));
        }
    }

    #[test]
    fn fullscreen_video_keeps_web_view_visible() {
        let widget = WidgetId(1);
        let gate = Arc::new(NavigationGate::new(widget, Arc::new(QueuedHost::new())));
        let (hooks, _rx) = EngineHooks::channel(gate);
        let mut engine = HeadlessEngine::new(HeadlessProfile::default(), hooks);

        let surface = Arc::new(RecordingSurface::default());
        let mut window = NativeWindow::new(Arc::clone(&surface));
        let mut fullscreen = FullscreenVideoCoordinator::new(widget);
        fullscreen.set_allowed(&mut window, &mut engine, true);

        let entered = fullscreen.enter(
            &mut window,
            &mut engine,
            OverlayView(1),
            CustomViewCallback::new(|| {}),
        );
        assert!(entered);
        assert!(engine.is_visible());
        assert_eq!(
            surface.calls(),
            vec![("decorations", false), ("fullscreen", true)]
        );

        assert!(fullscreen.exit(&mut window, &mut engine));
        assert!(engine.is_visible());
        assert_eq!(
            surface.calls()[2..],
            [("decorations", true), ("fullscreen", false)]
        );
    }

    #[test]
    fn only_web_and_mail_links_leave_the_app() {
        assert!(external_target("https://x.test/?a=1&calc").is_ok());
        assert!(external_target("mailto:a@b.test").is_ok());
        assert!(matches!(
            external_target("file:///etc/passwd"),
            Err(OpenError::Scheme(s)) if s == "file"
        ));
        assert!(matches!(
            external_target("ms-settings:privacy"),
            Err(OpenError::Scheme(_))
        ));
        assert!(matches!(external_target("not a url"), Err(OpenError::Malformed(_))));
    }

    #[test]
    fn logging_host_allows_every_navigation() {
        let host = LoggingHost::new(false);
        assert_eq!(
            host.should_start_load(WidgetId(1), "https://example.com/", "click"),
            NavigationDecision::Allow
        );
        assert!(!host.direct_bridge_available());
        assert!(LoggingHost::new(true).direct_bridge_available());
    }
}
