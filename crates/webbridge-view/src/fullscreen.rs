//! Native full-screen video overlays.
//!
//! `Normal -> Entering -> FullScreen -> Exiting -> Normal`. The transient
//! phases only exist while an entry or exit is in progress on the UI thread.

use tracing::{debug, info, warn};
use webbridge_common::{Orientation, WidgetId};

use crate::engine::{BrowserEngine, CustomViewCallback, OverlayView};
use crate::host::HostWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FullscreenPhase {
    #[default]
    Normal,
    Entering,
    FullScreen,
    Exiting,
}

/// What was hidden to make room for the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Concealed {
    Widget,
    Container,
    /// The window shows the overlay in the widget itself.
    Nothing,
}

/// Present only while an overlay is showing.
#[derive(Debug)]
struct FullscreenState {
    view: OverlayView,
    callback: CustomViewCallback,
    prior_orientation: Orientation,
    concealed: Concealed,
}

pub struct FullscreenVideoCoordinator {
    widget_id: WidgetId,
    allowed: bool,
    phase: FullscreenPhase,
    state: Option<FullscreenState>,
}

impl FullscreenVideoCoordinator {
    pub fn new(widget_id: WidgetId) -> Self {
        Self {
            widget_id,
            allowed: false,
            phase: FullscreenPhase::Normal,
            state: None,
        }
    }

    pub fn phase(&self) -> FullscreenPhase {
        self.phase
    }

    pub fn is_fullscreen(&self) -> bool {
        self.state.is_some()
    }

    pub fn allowed(&self) -> bool {
        self.allowed
    }

    /// The `allowsFullscreenVideo` property. Turning it off while an overlay
    /// is showing closes the overlay.
    pub fn set_allowed(
        &mut self,
        window: &mut dyn HostWindow,
        engine: &mut dyn BrowserEngine,
        allowed: bool,
    ) {
        self.allowed = allowed;
        if !allowed {
            self.exit(window, engine);
        }
    }

    /// Engine asked to show `view` full-screen. Returns `true` when the
    /// overlay is now showing.
    pub fn enter(
        &mut self,
        window: &mut dyn HostWindow,
        engine: &mut dyn BrowserEngine,
        view: OverlayView,
        callback: CustomViewCallback,
    ) -> bool {
        if !self.allowed {
            debug!(widget_id = %self.widget_id, "full-screen video not allowed");
            callback.on_custom_view_hidden();
            return false;
        }
        if self.phase != FullscreenPhase::Normal {
            debug!(widget_id = %self.widget_id, phase = ?self.phase, "overlay already active");
            callback.on_custom_view_hidden();
            return false;
        }

        self.phase = FullscreenPhase::Entering;
        let prior_orientation = window.requested_orientation();
        window.set_requested_orientation(Orientation::Unspecified);
        window.set_system_ui_hidden(true);
        window.add_overlay(self.widget_id, view);

        let concealed = if window.renders_overlay_in_place(self.widget_id) {
            Concealed::Nothing
        } else if window.widget_in_layered_container(self.widget_id) {
            window.set_container_visible(self.widget_id, false);
            Concealed::Container
        } else {
            if let Err(e) = engine.set_visible(false) {
                warn!(widget_id = %self.widget_id, error = %e, "could not hide widget");
            }
            Concealed::Widget
        };

        self.state = Some(FullscreenState {
            view,
            callback,
            prior_orientation,
            concealed,
        });
        self.phase = FullscreenPhase::FullScreen;
        info!(widget_id = %self.widget_id, view = view.0, "entered full-screen video");
        true
    }

    /// Engine asked to hide the overlay. No-op when not full-screen.
    pub fn exit(&mut self, window: &mut dyn HostWindow, engine: &mut dyn BrowserEngine) -> bool {
        let Some(state) = self.state.take() else {
            return false;
        };
        self.phase = FullscreenPhase::Exiting;

        match state.concealed {
            Concealed::Container => window.set_container_visible(self.widget_id, true),
            Concealed::Widget => {
                if let Err(e) = engine.set_visible(true) {
                    warn!(widget_id = %self.widget_id, error = %e, "could not show widget");
                }
            }
            Concealed::Nothing => {}
        }
        window.set_system_ui_hidden(false);
        window.remove_overlay(self.widget_id, state.view);
        state.callback.on_custom_view_hidden();
        window.set_requested_orientation(state.prior_orientation);

        self.phase = FullscreenPhase::Normal;
        info!(widget_id = %self.widget_id, "left full-screen video");
        true
    }

    /// Teardown path: close any overlay before the engine goes away.
    pub fn force_exit(&mut self, window: &mut dyn HostWindow, engine: &mut dyn BrowserEngine) {
        if self.exit(window, engine) {
            debug!(widget_id = %self.widget_id, "overlay closed for teardown");
        }
    }
}
