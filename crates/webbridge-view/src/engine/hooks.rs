//! Engine → bridge callback plumbing.
//!
//! Engines may invoke their callbacks from internal threads. Everything that
//! touches widget state is therefore pushed onto an mpsc queue and drained on
//! the UI thread by `WebWidget::pump`. The only synchronous path is the
//! navigation gate, because engines need an answer before committing a
//! navigation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use webbridge_common::WidgetId;

use crate::host::{HostBridge, NavigationDecision};
use crate::navigation::BasicAuthCredential;

/// Opaque handle of a native full-screen overlay view supplied by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayView(pub u64);

/// The engine's "custom view hidden" callback. Invoking it tells the engine
/// the overlay has been dismissed. Consumed on use.
pub struct CustomViewCallback(Box<dyn FnOnce() + Send>);

impl CustomViewCallback {
    pub fn new(f: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn on_custom_view_hidden(self) {
        (self.0)()
    }
}

impl std::fmt::Debug for CustomViewCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CustomViewCallback")
    }
}

/// Page-visible bridge object. Page script calls `postMessage(data)`; the
/// call only enqueues, the UI thread drains.
#[derive(Debug, Clone)]
pub struct BridgeObject {
    sender: mpsc::Sender<String>,
}

impl BridgeObject {
    pub(crate) fn new(sender: mpsc::Sender<String>) -> Self {
        Self { sender }
    }

    /// Returns `false` when the receiving widget is gone.
    pub fn post_message(&self, data: impl Into<String>) -> bool {
        self.sender.send(data.into()).is_ok()
    }
}

/// Everything an engine reports back to the bridge.
#[derive(Debug)]
pub enum EngineCallback {
    PageStarted {
        url: String,
    },
    PageFinished {
        url: String,
    },
    ProgressChanged {
        progress: u8,
    },
    ReceivedError {
        url: String,
        code: i32,
        description: String,
    },
    ReceivedHttpError {
        url: String,
        main_frame: bool,
        status_code: u16,
        description: String,
    },
    RenderProcessGone {
        did_crash: bool,
    },
    /// The host deferred a navigation decision; it answers with `loadUrl`.
    NavigationRequested {
        url: String,
        navigation_type: String,
    },
    /// The URL matched a default-intent prefix and was cancelled in-widget.
    ExternalNavigation {
        url: String,
    },
    ScrollChanged {
        x: i32,
        y: i32,
        content_width: i32,
        content_height: i32,
        layout_width: i32,
        layout_height: i32,
    },
    ContentSizeChanged {
        width: i32,
        height: i32,
    },
    DownloadRequested {
        url: String,
        user_agent: String,
        content_disposition: String,
        mime_type: String,
    },
    ShowCustomView {
        view: OverlayView,
        callback: CustomViewCallback,
    },
    HideCustomView,
}

impl EngineCallback {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PageStarted { .. } => "page_started",
            Self::PageFinished { .. } => "page_finished",
            Self::ProgressChanged { .. } => "progress_changed",
            Self::ReceivedError { .. } => "received_error",
            Self::ReceivedHttpError { .. } => "received_http_error",
            Self::RenderProcessGone { .. } => "render_process_gone",
            Self::NavigationRequested { .. } => "navigation_requested",
            Self::ExternalNavigation { .. } => "external_navigation",
            Self::ScrollChanged { .. } => "scroll_changed",
            Self::ContentSizeChanged { .. } => "content_size_changed",
            Self::DownloadRequested { .. } => "download_requested",
            Self::ShowCustomView { .. } => "show_custom_view",
            Self::HideCustomView => "hide_custom_view",
        }
    }
}

/// What to do with a navigation the engine is about to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateVerdict {
    /// A navigation the bridge itself issued.
    Programmatic,
    /// Matches a default-intent prefix.
    External,
    Host(NavigationDecision),
}

/// Synchronous navigation policy shared with the engine.
///
/// Holds the default-intent prefix list, the basic-auth credential and a
/// one-shot pass for navigations issued by the bridge itself, so that a
/// `loadUrl` answering a deferred decision is not intercepted again.
pub struct NavigationGate {
    widget_id: WidgetId,
    host: Arc<dyn HostBridge>,
    prefixes: Mutex<Vec<String>>,
    credential: Mutex<Option<BasicAuthCredential>>,
    pass: Mutex<Option<String>>,
}

impl NavigationGate {
    pub fn new(widget_id: WidgetId, host: Arc<dyn HostBridge>) -> Self {
        Self {
            widget_id,
            host,
            prefixes: Mutex::new(Vec::new()),
            credential: Mutex::new(None),
            pass: Mutex::new(None),
        }
    }

    pub fn set_prefixes(&self, prefixes: Vec<String>) {
        if let Ok(mut p) = self.prefixes.lock() {
            *p = prefixes;
        }
    }

    pub fn prefixes(&self) -> Vec<String> {
        self.prefixes.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn set_credential(&self, credential: Option<BasicAuthCredential>) {
        if let Ok(mut c) = self.credential.lock() {
            *c = credential;
        }
    }

    pub fn credential(&self) -> Option<BasicAuthCredential> {
        self.credential.lock().ok().and_then(|c| c.clone())
    }

    /// Let the next interception of `url` through unconditionally.
    pub fn allow_once(&self, url: &str) {
        if let Ok(mut pass) = self.pass.lock() {
            *pass = Some(url.to_string());
        }
    }

    fn verdict(&self, url: &str, navigation_type: &str) -> GateVerdict {
        if let Ok(mut pass) = self.pass.lock() {
            if pass.as_deref() == Some(url) {
                *pass = None;
                return GateVerdict::Programmatic;
            }
        }

        let external = self
            .prefixes
            .lock()
            .map(|p| p.iter().any(|prefix| url.starts_with(prefix.as_str())))
            .unwrap_or(false);
        if external {
            return GateVerdict::External;
        }

        GateVerdict::Host(
            self.host
                .should_start_load(self.widget_id, url, navigation_type),
        )
    }
}

/// Handle an engine uses to report back. Cheap to clone; every clone feeds
/// the same widget queue.
#[derive(Clone)]
pub struct EngineHooks {
    sender: mpsc::Sender<EngineCallback>,
    gate: Arc<NavigationGate>,
    detached: Arc<AtomicBool>,
}

impl EngineHooks {
    pub fn channel(gate: Arc<NavigationGate>) -> (Self, mpsc::Receiver<EngineCallback>) {
        let (sender, receiver) = mpsc::channel();
        let hooks = Self {
            sender,
            gate,
            detached: Arc::new(AtomicBool::new(false)),
        };
        (hooks, receiver)
    }

    pub fn gate(&self) -> &Arc<NavigationGate> {
        &self.gate
    }

    /// Queue a callback for the UI thread. Callbacks after `detach` (or
    /// after the widget dropped its receiver) are dropped.
    pub fn emit(&self, callback: EngineCallback) -> bool {
        if self.is_detached() {
            debug!(callback = callback.name(), "stale engine callback dropped");
            return false;
        }
        self.sender.send(callback).is_ok()
    }

    /// Engine asks whether to commit a navigation. `true` proceeds.
    pub fn should_start_load(&self, url: &str, navigation_type: &str) -> bool {
        if self.is_detached() {
            return false;
        }
        match self.gate.verdict(url, navigation_type) {
            GateVerdict::Programmatic => true,
            GateVerdict::External => {
                self.emit(EngineCallback::ExternalNavigation {
                    url: url.to_string(),
                });
                false
            }
            GateVerdict::Host(NavigationDecision::Allow) => true,
            GateVerdict::Host(NavigationDecision::Deny) => {
                debug!(url = %url, "navigation denied by host");
                false
            }
            GateVerdict::Host(NavigationDecision::Deferred) => {
                self.emit(EngineCallback::NavigationRequested {
                    url: url.to_string(),
                    navigation_type: navigation_type.to_string(),
                });
                false
            }
        }
    }

    /// Engine hit an HTTP authentication challenge.
    pub fn basic_auth(&self, host: &str, realm: &str) -> Option<BasicAuthCredential> {
        if self.is_detached() {
            return None;
        }
        let credential = self.gate.credential();
        if credential.is_none() {
            debug!(host = %host, realm = %realm, "no credential, default auth handling");
        }
        credential
    }

    /// Stop delivering callbacks. Irreversible.
    pub fn detach(&self) {
        if !self.detached.swap(true, Ordering::SeqCst) {
            debug!(widget_id = %self.gate.widget_id, "engine hooks detached");
        }
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for EngineHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHooks")
            .field("widget_id", &self.gate.widget_id)
            .field("detached", &self.is_detached())
            .finish()
    }
}

/// Logged when a lock guarding engine-shared state was poisoned.
pub(crate) fn poisoned(what: &str) {
    warn!(state = what, "engine state lock poisoned, update skipped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::QueuedHost;

    fn hooks_with(host: QueuedHost) -> (EngineHooks, mpsc::Receiver<EngineCallback>) {
        let gate = Arc::new(NavigationGate::new(WidgetId(1), Arc::new(host)));
        EngineHooks::channel(gate)
    }

    #[test]
    fn emit_reaches_receiver_in_order() {
        let (hooks, rx) = hooks_with(QueuedHost::default());
        hooks.emit(EngineCallback::ProgressChanged { progress: 10 });
        hooks.emit(EngineCallback::ProgressChanged { progress: 20 });

        let got: Vec<u8> = rx
            .try_iter()
            .map(|cb| match cb {
                EngineCallback::ProgressChanged { progress } => progress,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(got, vec![10, 20]);
    }

    #[test]
    fn detached_hooks_drop_callbacks() {
        let (hooks, rx) = hooks_with(QueuedHost::default());
        hooks.detach();
        assert!(!hooks.emit(EngineCallback::HideCustomView));
        assert!(rx.try_recv().is_err());
        assert!(!hooks.should_start_load("https://example.com", "click"));
    }

    #[test]
    fn prefix_match_routes_external() {
        let (hooks, rx) = hooks_with(QueuedHost::default());
        hooks.gate().set_prefixes(vec!["tel:".into(), "mailto:".into()]);

        assert!(!hooks.should_start_load("tel:5551234", "click"));
        match rx.try_recv().unwrap() {
            EngineCallback::ExternalNavigation { url } => assert_eq!(url, "tel:5551234"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn deferred_decision_queues_request() {
        let (hooks, rx) = hooks_with(QueuedHost::default());
        assert!(!hooks.should_start_load("https://example.com/next", "click"));
        assert!(matches!(
            rx.try_recv().unwrap(),
            EngineCallback::NavigationRequested { .. }
        ));
    }

    #[test]
    fn host_allow_and_deny() {
        let (hooks, rx) =
            hooks_with(QueuedHost::default().with_navigation_policy(NavigationDecision::Allow));
        assert!(hooks.should_start_load("https://example.com", "click"));
        assert!(rx.try_recv().is_err());

        let (hooks, _rx) =
            hooks_with(QueuedHost::default().with_navigation_policy(NavigationDecision::Deny));
        assert!(!hooks.should_start_load("https://example.com", "click"));
    }

    #[test]
    fn allow_once_is_consumed() {
        let (hooks, rx) = hooks_with(QueuedHost::default());
        hooks.gate().allow_once("https://example.com/a");

        assert!(hooks.should_start_load("https://example.com/a", "other"));
        assert!(rx.try_recv().is_err());

        // second time goes back to the host
        assert!(!hooks.should_start_load("https://example.com/a", "other"));
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn basic_auth_returns_stored_credential() {
        let (hooks, _rx) = hooks_with(QueuedHost::default());
        assert!(hooks.basic_auth("example.com", "realm").is_none());

        hooks.gate().set_credential(Some(BasicAuthCredential {
            username: "user".into(),
            password: "pass".into(),
        }));
        let cred = hooks.basic_auth("example.com", "realm").unwrap();
        assert_eq!(cred.username, "user");
        assert_eq!(cred.password, "pass");
    }

    #[test]
    fn custom_view_callback_runs_once() {
        let flag = Arc::new(AtomicBool::new(false));
        let f = Arc::clone(&flag);
        let cb = CustomViewCallback::new(move || f.store(true, Ordering::SeqCst));
        cb.on_custom_view_hidden();
        assert!(flag.load(Ordering::SeqCst));
    }
}
