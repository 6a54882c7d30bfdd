//! Interfaces to the host application framework.
//!
//! The host owns the view hierarchy, event dispatch and any module the
//! bridge calls into. The bridge only needs the narrow surface below.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use webbridge_common::{Orientation, WidgetId};

use crate::download::DownloadRequest;
use crate::engine::OverlayView;

/// Host answer to a navigation interception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationDecision {
    Allow,
    Deny,
    /// Cancel for now; the host answers later through the `loadUrl` command.
    #[default]
    Deferred,
}

/// Outbound surface of the host framework.
///
/// Implementations must be `Send + Sync`: the navigation check runs on
/// whatever thread the engine commits navigations from. Everything else is
/// called on the UI thread.
pub trait HostBridge: Send + Sync {
    /// Generic event dispatch: `name` is the wire name (`topLoadingStart`).
    fn dispatch_event(&self, target: WidgetId, name: &str, payload: serde_json::Value);

    /// Whether a named host module can be invoked directly.
    fn direct_bridge_available(&self) -> bool {
        false
    }

    /// Direct invocation of `module.method(args)` on the host.
    fn call_function(&self, module: &str, method: &str, args: serde_json::Value);

    fn should_start_load(
        &self,
        _target: WidgetId,
        _url: &str,
        _navigation_type: &str,
    ) -> NavigationDecision {
        NavigationDecision::Deferred
    }

    /// Hand a URL to the platform's default handler. Returns `false` when no
    /// handler exists.
    fn open_external(&self, target: WidgetId, url: &str) -> bool;

    /// Hand a validated download to the platform download manager.
    fn request_download(&self, target: WidgetId, request: &DownloadRequest);
}

/// The window/view side of full-screen video.
pub trait HostWindow {
    /// Whether the widget sits inside a layered container (a modal). Only
    /// that container is hidden during full-screen.
    fn widget_in_layered_container(&self, widget: WidgetId) -> bool;

    /// Whether the window shows full-screen content by growing the widget
    /// itself rather than a separate overlay view. The widget then stays
    /// visible while the overlay is active.
    fn renders_overlay_in_place(&self, _widget: WidgetId) -> bool {
        false
    }

    /// Reparent the overlay into the nearest suitable root view.
    fn add_overlay(&mut self, widget: WidgetId, view: OverlayView);

    fn remove_overlay(&mut self, widget: WidgetId, view: OverlayView);

    /// Show or hide the layered container holding the widget.
    fn set_container_visible(&mut self, widget: WidgetId, visible: bool);

    fn requested_orientation(&self) -> Orientation;

    fn set_requested_orientation(&mut self, orientation: Orientation);

    /// Hide or restore system chrome (status/navigation bars).
    fn set_system_ui_hidden(&mut self, hidden: bool);
}

/// The window as shared by every widget it hosts.
pub type SharedWindow = Arc<Mutex<dyn HostWindow + Send>>;

/// Everything a [`QueuedHost`] was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostMessage {
    Event {
        target: WidgetId,
        name: String,
        payload: serde_json::Value,
    },
    FunctionCall {
        module: String,
        method: String,
        args: serde_json::Value,
    },
    ExternalOpen {
        target: WidgetId,
        url: String,
    },
    Download {
        target: WidgetId,
        request: DownloadRequest,
    },
}

impl HostMessage {
    /// Wire name for events, function name for calls.
    pub fn label(&self) -> &str {
        match self {
            Self::Event { name, .. } => name,
            Self::FunctionCall { method, .. } => method,
            Self::ExternalOpen { .. } => "externalOpen",
            Self::Download { .. } => "download",
        }
    }
}

/// Host that records every outbound message. Used by the headless replay
/// host and by tests.
#[derive(Debug, Clone, Default)]
pub struct QueuedHost {
    messages: Arc<Mutex<Vec<HostMessage>>>,
    direct_bridge: bool,
    navigation_policy: NavigationDecision,
}

impl QueuedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direct_bridge(mut self, available: bool) -> Self {
        self.direct_bridge = available;
        self
    }

    pub fn with_navigation_policy(mut self, decision: NavigationDecision) -> Self {
        self.navigation_policy = decision;
        self
    }

    /// Drain all recorded messages.
    pub fn drain(&self) -> Vec<HostMessage> {
        self.messages
            .lock()
            .map(|mut m| std::mem::take(&mut *m))
            .unwrap_or_default()
    }

    /// Recorded messages without draining.
    pub fn snapshot(&self) -> Vec<HostMessage> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Wire names of recorded events, in order.
    pub fn event_names(&self) -> Vec<String> {
        self.snapshot()
            .iter()
            .filter_map(|m| match m {
                HostMessage::Event { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, message: HostMessage) {
        if let Ok(mut m) = self.messages.lock() {
            m.push(message);
        }
    }
}

impl HostBridge for QueuedHost {
    fn dispatch_event(&self, target: WidgetId, name: &str, payload: serde_json::Value) {
        self.push(HostMessage::Event {
            target,
            name: name.to_string(),
            payload,
        });
    }

    fn direct_bridge_available(&self) -> bool {
        self.direct_bridge
    }

    fn call_function(&self, module: &str, method: &str, args: serde_json::Value) {
        self.push(HostMessage::FunctionCall {
            module: module.to_string(),
            method: method.to_string(),
            args,
        });
    }

    fn should_start_load(
        &self,
        _target: WidgetId,
        _url: &str,
        _navigation_type: &str,
    ) -> NavigationDecision {
        self.navigation_policy
    }

    fn open_external(&self, target: WidgetId, url: &str) -> bool {
        self.push(HostMessage::ExternalOpen {
            target,
            url: url.to_string(),
        });
        true
    }

    fn request_download(&self, target: WidgetId, request: &DownloadRequest) {
        self.push(HostMessage::Download {
            target,
            request: request.clone(),
        });
    }
}

/// In-memory window used by the headless host and tests. Tracks exactly the
/// state full-screen video touches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetachedWindow {
    pub layered: Vec<WidgetId>,
    pub in_place: bool,
    pub overlays: Vec<(WidgetId, OverlayView)>,
    pub hidden: Vec<WidgetId>,
    pub orientation: Orientation,
    pub system_ui_hidden: bool,
}

impl DetachedWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `widget` as living inside a layered container.
    pub fn with_layered(mut self, widget: WidgetId) -> Self {
        self.layered.push(widget);
        self
    }

    /// Report overlays as rendered in place by the widget.
    pub fn with_in_place_overlays(mut self) -> Self {
        self.in_place = true;
        self
    }
}

impl HostWindow for DetachedWindow {
    fn widget_in_layered_container(&self, widget: WidgetId) -> bool {
        self.layered.contains(&widget)
    }

    fn renders_overlay_in_place(&self, _widget: WidgetId) -> bool {
        self.in_place
    }

    fn add_overlay(&mut self, widget: WidgetId, view: OverlayView) {
        self.overlays.push((widget, view));
    }

    fn remove_overlay(&mut self, widget: WidgetId, view: OverlayView) {
        self.overlays.retain(|entry| *entry != (widget, view));
    }

    fn set_container_visible(&mut self, widget: WidgetId, visible: bool) {
        if visible {
            self.hidden.retain(|w| *w != widget);
        } else if !self.hidden.contains(&widget) {
            self.hidden.push(widget);
        }
    }

    fn requested_orientation(&self) -> Orientation {
        self.orientation
    }

    fn set_requested_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    fn set_system_ui_hidden(&mut self, hidden: bool) {
        self.system_ui_hidden = hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_host_records_in_order() {
        let host = QueuedHost::new();
        host.dispatch_event(WidgetId(1), "topLoadingStart", serde_json::json!({}));
        host.call_function("WebViewMessaging", "onMessage", serde_json::json!([]));
        host.open_external(WidgetId(1), "tel:123");

        let labels: Vec<String> = host.snapshot().iter().map(|m| m.label().to_string()).collect();
        assert_eq!(labels, vec!["topLoadingStart", "onMessage", "externalOpen"]);

        assert_eq!(host.drain().len(), 3);
        assert!(host.drain().is_empty());
    }

    #[test]
    fn clones_share_the_log() {
        let host = QueuedHost::new();
        let other = host.clone();
        other.dispatch_event(WidgetId(2), "topMessage", serde_json::json!({"data": "x"}));
        assert_eq!(host.event_names(), vec!["topMessage"]);
    }

    #[test]
    fn default_policy_is_deferred() {
        let host = QueuedHost::new();
        assert_eq!(
            host.should_start_load(WidgetId(1), "https://example.com", "click"),
            NavigationDecision::Deferred
        );
        assert!(!host.direct_bridge_available());
    }

    #[test]
    fn host_message_json_shape() {
        let msg = HostMessage::ExternalOpen {
            target: WidgetId(4),
            url: "mailto:a@b.c".into(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["kind"], "external_open");
        assert_eq!(json["target"], 4);
    }

    #[test]
    fn detached_window_container_visibility() {
        let mut window = DetachedWindow::new();
        window.set_container_visible(WidgetId(1), false);
        window.set_container_visible(WidgetId(1), false);
        assert_eq!(window.hidden, vec![WidgetId(1)]);
        window.set_container_visible(WidgetId(1), true);
        assert!(window.hidden.is_empty());
    }
}
