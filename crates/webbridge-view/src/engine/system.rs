//! The platform web view, driven through `wry`.
//!
//! wry fixes most settings at build time, so this engine records every
//! forwarded setting and applies the ones wry exposes at runtime (zoom,
//! visibility, user agent via request headers). History traversal, reload
//! and stop go through page script. Scroll, content size, full-screen and
//! bridge messages arrive over wry's IPC channel as small JSON envelopes
//! posted by the initialization script.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use tracing::{debug, warn};
use webbridge_common::{EngineError, EngineKind, Rect};
use wry::dpi::{LogicalPosition, LogicalSize};
use wry::http::header::{HeaderName, HeaderValue};
use wry::http::HeaderMap;
use wry::raw_window_handle;
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use super::hooks::{BridgeObject, CustomViewCallback, EngineCallback, EngineHooks, OverlayView};
use super::settings::{EngineSetting, NativeSettings};
use super::{BrowserEngine, EngineCapabilities, Headers, ScriptScope, BLANK_URL};

/// Installs the bridge-object factory and the scroll / size / full-screen
/// listeners. No bridge object is defined here: objects are installed only
/// while attached, see [`BridgeSet`].
const INIT_SCRIPT: &str = r#"
(function() {
    var post = function(envelope) {
        window.ipc.postMessage(JSON.stringify(envelope));
    };
    window.__webbridge = {
        install: function(name) {
            window[name] = {
                postMessage: function(data) {
                    post({ channel: "message", interface: name, data: String(data) });
                }
            };
        }
    };
    var lastX = -1, lastY = -1;
    window.addEventListener("scroll", function() {
        var doc = document.documentElement;
        var x = Math.round(window.scrollX), y = Math.round(window.scrollY);
        if (x === lastX && y === lastY) { return; }
        lastX = x; lastY = y;
        post({
            channel: "scroll", x: x, y: y,
            contentWidth: doc.scrollWidth, contentHeight: doc.scrollHeight,
            layoutWidth: window.innerWidth, layoutHeight: window.innerHeight
        });
    }, { passive: true });

    var reportSize = function() {
        var doc = document.documentElement;
        post({ channel: "size", width: doc.scrollWidth, height: doc.scrollHeight });
    };
    window.addEventListener("load", reportSize);
    window.addEventListener("resize", reportSize);

    document.addEventListener("fullscreenchange", function() {
        post({ channel: "fullscreen", active: document.fullscreenElement !== null });
    });
})();
"#;

/// IPC envelope posted by [`INIT_SCRIPT`].
#[derive(Debug, Deserialize)]
#[serde(tag = "channel", rename_all = "lowercase")]
enum Envelope {
    Message {
        interface: String,
        data: String,
    },
    #[serde(rename_all = "camelCase")]
    Scroll {
        x: i32,
        y: i32,
        content_width: i32,
        content_height: i32,
        layout_width: i32,
        layout_height: i32,
    },
    Size {
        width: i32,
        height: i32,
    },
    Fullscreen {
        active: bool,
    },
}

/// Build-time options for the platform web view.
#[derive(Debug, Clone)]
pub struct SystemEngineOptions {
    pub bounds: Rect,
    pub devtools: bool,
    pub transparent: bool,
}

impl Default for SystemEngineOptions {
    fn default() -> Self {
        Self {
            bounds: Rect::default(),
            devtools: cfg!(debug_assertions),
            transparent: false,
        }
    }
}

/// Bridge objects currently attached. A wry document loses its globals on
/// navigation, so the set is re-installed whenever a page starts.
#[derive(Debug, Default, Clone)]
struct BridgeSet {
    objects: HashMap<String, BridgeObject>,
}

impl BridgeSet {
    fn insert(&mut self, name: &str, bridge: BridgeObject) {
        self.objects.insert(name.to_string(), bridge);
    }

    fn remove(&mut self, name: &str) {
        self.objects.remove(name);
    }

    fn get(&self, name: &str) -> Option<BridgeObject> {
        self.objects.get(name).cloned()
    }

    fn clear(&mut self) {
        self.objects.clear();
    }

    /// Script installing every attached object, `None` when nothing is
    /// attached.
    fn install_script(&self) -> Option<String> {
        let mut names: Vec<&str> = self.objects.keys().map(String::as_str).collect();
        if names.is_empty() {
            return None;
        }
        names.sort_unstable();
        let calls: String = names
            .iter()
            .filter_map(|name| serde_json::to_string(name).ok())
            .map(|name| format!("window.__webbridge.install({name});"))
            .collect();
        Some(calls)
    }
}

fn removal_script(name: &str) -> Result<String, EngineError> {
    let name = serde_json::to_string(name).map_err(|e| EngineError::Backend(e.to_string()))?;
    Ok(format!("delete window[{name}];"))
}

/// Page state wry does not expose, reconstructed from load callbacks.
#[derive(Debug, Default)]
struct Tracked {
    history: Vec<String>,
    index: usize,
    pending_traversal: Option<usize>,
    title: String,
    progress: u8,
}

impl Tracked {
    fn current(&self) -> Option<&str> {
        self.history.get(self.index).map(String::as_str)
    }

    fn started(&mut self, url: &str) {
        self.progress = 10;
        if let Some(index) = self.pending_traversal.take() {
            if index < self.history.len() {
                self.index = index;
                self.history[index] = url.to_string();
                return;
            }
        }
        if self.current() == Some(url) {
            return;
        }
        if !self.history.is_empty() {
            self.history.truncate(self.index + 1);
        }
        self.history.push(url.to_string());
        self.index = self.history.len() - 1;
    }
}

fn backend(e: wry::Error) -> EngineError {
    EngineError::Backend(e.to_string())
}

fn to_wry_rect(rect: Rect) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(LogicalPosition::new(rect.x, rect.y)),
        size: wry::dpi::Size::Logical(LogicalSize::new(rect.width, rect.height)),
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn is_form_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"-._~+*!'()$,;:@/?".contains(&b)
}

/// Whether `body` is an `application/x-www-form-urlencoded` payload that
/// survives being resubmitted through an HTML form.
fn is_form_body(body: &[u8]) -> bool {
    if body.is_empty() {
        return true;
    }
    body.split(|&b| b == b'&').all(|pair| {
        let Some(eq) = pair.iter().position(|&b| b == b'=') else {
            return false;
        };
        if eq == 0 {
            return false;
        }
        let mut bytes = pair.iter().enumerate().filter(|&(i, _)| i != eq);
        while let Some((i, &b)) = bytes.next() {
            if b == b'%' {
                let hex = pair.get(i + 1..i + 3);
                if !hex.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
                    return false;
                }
                bytes.next();
                bytes.next();
            } else if !is_form_byte(b) {
                return false;
            }
        }
        true
    })
}

/// Markup that immediately submits `body` to `url` by POST. The body must
/// pass [`is_form_body`].
fn post_form(url: &str, body: &[u8]) -> String {
    let inputs: String = url::form_urlencoded::parse(body)
        .map(|(name, value)| {
            format!(
                r#"<input type="hidden" name="{}" value="{}">"#,
                escape_attr(&name),
                escape_attr(&value)
            )
        })
        .collect();
    format!(
        r#"<html><body><form method="POST" action="{}">{}</form><script>document.forms[0].submit();</script></body></html>"#,
        escape_attr(url),
        inputs
    )
}

pub struct SystemEngine {
    webview: Option<WebView>,
    hooks: EngineHooks,
    settings: NativeSettings,
    tracked: Arc<Mutex<Tracked>>,
    bridges: Arc<Mutex<BridgeSet>>,
    user_agent: Arc<Mutex<Option<String>>>,
}

impl SystemEngine {
    /// Create the web view as a child of `window`, positioned at
    /// `options.bounds`.
    pub fn build_as_child<W: raw_window_handle::HasWindowHandle>(
        window: &W,
        options: SystemEngineOptions,
        hooks: EngineHooks,
    ) -> Result<Self, EngineError> {
        let tracked = Arc::new(Mutex::new(Tracked::default()));
        let bridges: Arc<Mutex<BridgeSet>> = Arc::new(Mutex::new(BridgeSet::default()));
        let user_agent: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

        let mut builder = WebViewBuilder::new()
            .with_bounds(to_wry_rect(options.bounds))
            .with_transparent(options.transparent)
            .with_devtools(options.devtools)
            .with_focused(false)
            .with_initialization_script(INIT_SCRIPT);

        builder = Self::attach_ipc_handler(builder, hooks.clone(), Arc::clone(&bridges));
        builder = Self::attach_page_load_handler(builder, hooks.clone(), Arc::clone(&tracked));
        builder = Self::attach_title_handler(builder, Arc::clone(&tracked));
        builder = Self::attach_navigation_handler(builder, hooks.clone());
        builder = Self::attach_download_handler(builder, hooks.clone(), Arc::clone(&user_agent));

        let webview = builder
            .with_url(BLANK_URL)
            .build_as_child(window)
            .map_err(backend)?;

        debug!("system engine created");

        Ok(Self {
            webview: Some(webview),
            hooks,
            settings: NativeSettings::default(),
            tracked,
            bridges,
            user_agent,
        })
    }

    fn attach_ipc_handler<'a>(
        builder: WebViewBuilder<'a>,
        hooks: EngineHooks,
        bridges: Arc<Mutex<BridgeSet>>,
    ) -> WebViewBuilder<'a> {
        let overlay_ids = AtomicU64::new(1);
        builder.with_ipc_handler(move |request| {
            let body = request.body();
            let envelope: Envelope = match serde_json::from_str(body) {
                Ok(envelope) => envelope,
                Err(e) => {
                    warn!(body_len = body.len(), error = %e, "IPC envelope rejected");
                    return;
                }
            };
            match envelope {
                Envelope::Message { interface, data } => {
                    let bridge = bridges
                        .lock()
                        .ok()
                        .and_then(|b| b.get(&interface));
                    match bridge {
                        Some(bridge) => {
                            bridge.post_message(data);
                        }
                        None => debug!(interface = %interface, "message for detached bridge object dropped"),
                    }
                }
                Envelope::Scroll {
                    x,
                    y,
                    content_width,
                    content_height,
                    layout_width,
                    layout_height,
                } => {
                    hooks.emit(EngineCallback::ScrollChanged {
                        x,
                        y,
                        content_width,
                        content_height,
                        layout_width,
                        layout_height,
                    });
                }
                Envelope::Size { width, height } => {
                    hooks.emit(EngineCallback::ContentSizeChanged { width, height });
                }
                Envelope::Fullscreen { active: true } => {
                    let view = OverlayView(overlay_ids.fetch_add(1, Ordering::Relaxed));
                    hooks.emit(EngineCallback::ShowCustomView {
                        view,
                        // the page leaves full screen on its own; nothing to release natively
                        callback: CustomViewCallback::new(move || {
                            debug!(overlay = view.0, "full-screen overlay released")
                        }),
                    });
                }
                Envelope::Fullscreen { active: false } => {
                    hooks.emit(EngineCallback::HideCustomView);
                }
            }
        })
    }

    fn attach_page_load_handler<'a>(
        builder: WebViewBuilder<'a>,
        hooks: EngineHooks,
        tracked: Arc<Mutex<Tracked>>,
    ) -> WebViewBuilder<'a> {
        builder.with_on_page_load_handler(move |event, url| {
            match event {
                PageLoadEvent::Started => {
                    if let Ok(mut t) = tracked.lock() {
                        t.started(&url);
                    }
                    hooks.emit(EngineCallback::PageStarted { url });
                    hooks.emit(EngineCallback::ProgressChanged { progress: 10 });
                }
                PageLoadEvent::Finished => {
                    if let Ok(mut t) = tracked.lock() {
                        t.progress = 100;
                    }
                    hooks.emit(EngineCallback::ProgressChanged { progress: 100 });
                    hooks.emit(EngineCallback::PageFinished { url });
                }
            }
        })
    }

    fn attach_title_handler<'a>(
        builder: WebViewBuilder<'a>,
        tracked: Arc<Mutex<Tracked>>,
    ) -> WebViewBuilder<'a> {
        builder.with_document_title_changed_handler(move |title| {
            debug!(title = %title, "title changed");
            if let Ok(mut t) = tracked.lock() {
                t.title = title;
            }
        })
    }

    fn attach_navigation_handler<'a>(
        builder: WebViewBuilder<'a>,
        hooks: EngineHooks,
    ) -> WebViewBuilder<'a> {
        builder.with_navigation_handler(move |url| {
            // markup and blank loads are never intercepted
            if url.starts_with("about:") || url.starts_with("data:") {
                return true;
            }
            hooks.should_start_load(&url, "other")
        })
    }

    fn attach_download_handler<'a>(
        builder: WebViewBuilder<'a>,
        hooks: EngineHooks,
        user_agent: Arc<Mutex<Option<String>>>,
    ) -> WebViewBuilder<'a> {
        builder.with_download_started_handler(move |url, _suggested_path| {
            let user_agent = user_agent.lock().ok().and_then(|ua| ua.clone()).unwrap_or_default();
            hooks.emit(EngineCallback::DownloadRequested {
                url,
                user_agent,
                content_disposition: String::new(),
                mime_type: String::new(),
            });
            // the host's download manager takes it from here
            false
        })
    }

    fn webview(&self) -> Result<&WebView, EngineError> {
        self.webview.as_ref().ok_or(EngineError::Destroyed)
    }

    fn header_map(&self, headers: &Headers) -> HeaderMap {
        let mut map = HeaderMap::new();
        let user_agent = self.settings.user_agent.iter().map(|ua| ("User-Agent", ua.as_str()));
        let all = headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(user_agent);
        for (name, value) in all {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    map.insert(name, value);
                }
                _ => warn!(header = %name, "invalid request header skipped"),
            }
        }
        map
    }

    fn run_script(&self, script: &str) -> Result<(), EngineError> {
        self.webview()?.evaluate_script(script).map_err(backend)
    }
}

impl BrowserEngine for SystemEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::System
    }

    fn capabilities(&self) -> EngineCapabilities {
        EngineCapabilities {
            force_dark: false,
            force_dark_strategy: false,
            protected_media: false,
            mixed_content: false,
            third_party_cookies: false,
            default_user_agent: false,
            ..EngineCapabilities::all()
        }
    }

    fn settings(&self) -> &NativeSettings {
        &self.settings
    }

    fn apply_setting(&mut self, setting: EngineSetting) -> Result<(), EngineError> {
        if let Some(capability) = setting.required_capability() {
            if !self.capabilities().supports(capability) {
                return Err(EngineError::Unsupported(setting.name()));
            }
        }
        match &setting {
            EngineSetting::TextZoom(percent) => {
                self.webview()?
                    .zoom(f64::from(*percent) / 100.0)
                    .map_err(backend)?;
            }
            EngineSetting::UserAgent(ua) => {
                if let Ok(mut shared) = self.user_agent.lock() {
                    shared.clone_from(ua);
                }
            }
            _ => debug!(setting = setting.name(), "setting recorded, applied at next build"),
        }
        self.settings.apply(setting);
        Ok(())
    }

    fn default_user_agent(&self) -> Option<String> {
        None
    }

    fn url(&self) -> Option<String> {
        self.tracked
            .lock()
            .ok()
            .and_then(|t| t.current().map(str::to_string))
    }

    fn title(&self) -> String {
        self.tracked
            .lock()
            .map(|t| t.title.clone())
            .unwrap_or_default()
    }

    fn progress(&self) -> u8 {
        self.tracked.lock().map(|t| t.progress).unwrap_or(0)
    }

    fn can_go_back(&self) -> bool {
        self.tracked.lock().map(|t| t.index > 0).unwrap_or(false)
    }

    fn can_go_forward(&self) -> bool {
        self.tracked
            .lock()
            .map(|t| t.index + 1 < t.history.len())
            .unwrap_or(false)
    }

    fn load_data_with_base_url(
        &mut self,
        base_url: &str,
        data: &str,
        _mime_type: &str,
        _encoding: &str,
    ) -> Result<(), EngineError> {
        if !base_url.is_empty() {
            debug!(base_url = %base_url, "base URL not supported for markup loads, ignored");
        }
        self.webview()?.load_html(data).map_err(backend)
    }

    fn load_url(&mut self, url: &str, headers: &Headers) -> Result<(), EngineError> {
        if let Some(script) = url.strip_prefix("javascript:") {
            let script = urlencoding::decode(script)
                .map_err(|e| EngineError::Backend(e.to_string()))?;
            return self.run_script(&script);
        }
        self.hooks.gate().allow_once(url);
        let map = self.header_map(headers);
        let webview = self.webview()?;
        if map.is_empty() {
            webview.load_url(url).map_err(backend)
        } else {
            webview.load_url_with_headers(url, map).map_err(backend)
        }
    }

    fn post_url(&mut self, url: &str, body: &[u8]) -> Result<(), EngineError> {
        if !is_form_body(body) {
            warn!(url = %url, body_len = body.len(), "POST body is not form-encoded, load refused");
            return Err(EngineError::Unsupported("post body"));
        }
        self.hooks.gate().allow_once(url);
        self.webview()?.load_html(&post_form(url, body)).map_err(backend)
    }

    fn evaluate_script(&mut self, script: &str, scope: ScriptScope) -> Result<(), EngineError> {
        if scope == ScriptScope::AllFrames {
            debug!("sub-frame injection unavailable, evaluating in main frame");
        }
        self.run_script(script)
    }

    fn go_back(&mut self) -> Result<(), EngineError> {
        if let Ok(mut t) = self.tracked.lock() {
            if t.index > 0 {
                t.pending_traversal = Some(t.index - 1);
            }
        }
        self.run_script("history.back();")
    }

    fn go_forward(&mut self) -> Result<(), EngineError> {
        if let Ok(mut t) = self.tracked.lock() {
            if t.index + 1 < t.history.len() {
                t.pending_traversal = Some(t.index + 1);
            }
        }
        self.run_script("history.forward();")
    }

    fn reload(&mut self) -> Result<(), EngineError> {
        self.run_script("location.reload();")
    }

    fn stop_loading(&mut self) -> Result<(), EngineError> {
        self.run_script("window.stop();")
    }

    fn request_focus(&mut self) -> Result<(), EngineError> {
        self.webview()?.focus().map_err(backend)
    }

    fn clear_form_data(&mut self) -> Result<(), EngineError> {
        self.run_script("Array.prototype.forEach.call(document.forms, function(f) { f.reset(); });")
    }

    fn clear_cache(&mut self, _include_disk_files: bool) -> Result<(), EngineError> {
        self.webview()?.clear_all_browsing_data().map_err(backend)
    }

    fn clear_history(&mut self) -> Result<(), EngineError> {
        if let Ok(mut t) = self.tracked.lock() {
            let current = t.current().map(str::to_string);
            t.history = current.into_iter().collect();
            t.index = 0;
            t.pending_traversal = None;
        }
        Ok(())
    }

    fn remove_all_cookies(&mut self) -> Result<(), EngineError> {
        self.webview()?.clear_all_browsing_data().map_err(backend)
    }

    fn cookie(&self, _url: &str) -> Option<String> {
        None
    }

    fn add_bridge_object(&mut self, name: &str, bridge: BridgeObject) -> Result<(), EngineError> {
        if let Ok(mut bridges) = self.bridges.lock() {
            bridges.insert(name, bridge);
        }
        self.restore_bridge_objects()
    }

    fn remove_bridge_object(&mut self, name: &str) -> Result<(), EngineError> {
        if let Ok(mut bridges) = self.bridges.lock() {
            bridges.remove(name);
        }
        self.run_script(&removal_script(name)?)
    }

    fn restore_bridge_objects(&mut self) -> Result<(), EngineError> {
        let script = self.bridges.lock().ok().and_then(|b| b.install_script());
        match script {
            Some(script) => self.run_script(&script),
            None => Ok(()),
        }
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), EngineError> {
        self.webview()?.set_visible(visible).map_err(backend)
    }

    fn set_bounds(&mut self, bounds: Rect) -> Result<(), EngineError> {
        self.webview()?
            .set_bounds(to_wry_rect(bounds))
            .map_err(backend)
    }

    fn destroy(&mut self) {
        if let Some(webview) = self.webview.take() {
            if let Ok(mut bridges) = self.bridges.lock() {
                bridges.clear();
            }
            drop(webview);
            debug!("system engine destroyed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::{MessageQueue, BRIDGE_INTERFACE};

    #[test]
    fn envelope_parsing() {
        let env: Envelope =
            serde_json::from_str(r#"{"channel":"message","interface":"ReactNativeWebView","data":"hi"}"#)
                .unwrap();
        assert!(matches!(env, Envelope::Message { ref data, .. } if data == "hi"));

        let env: Envelope = serde_json::from_str(
            r#"{"channel":"scroll","x":0,"y":40,"contentWidth":800,"contentHeight":4000,"layoutWidth":800,"layoutHeight":600}"#,
        )
        .unwrap();
        assert!(matches!(env, Envelope::Scroll { y: 40, content_height: 4000, .. }));

        let env: Envelope = serde_json::from_str(r#"{"channel":"fullscreen","active":true}"#).unwrap();
        assert!(matches!(env, Envelope::Fullscreen { active: true }));

        assert!(serde_json::from_str::<Envelope>(r#"{"channel":"bogus"}"#).is_err());
    }

    #[test]
    fn post_form_carries_fields() {
        let html = post_form("https://example.com/a?x=\"1\"", b"x=1&name=a+b");
        assert!(html.contains(r#"action="https://example.com/a?x=&quot;1&quot;""#));
        assert!(html.contains(r#"name="x" value="1""#));
        assert!(html.contains(r#"name="name" value="a b""#));
        assert!(html.contains("document.forms[0].submit()"));
    }

    #[test]
    fn only_form_bodies_are_posted() {
        assert!(is_form_body(b""));
        assert!(is_form_body(b"x=1&name=a+b"));
        assert!(is_form_body(b"q=caf%C3%A9&empty="));
        assert!(!is_form_body(br#"{"a":1}"#));
        assert!(!is_form_body(b"plain text body"));
        assert!(!is_form_body(b"a=1&&b=2"));
        assert!(!is_form_body(b"=orphan"));
        assert!(!is_form_body(b"a=%G1"));
        assert!(!is_form_body(b"a=%4"));
        assert!(!is_form_body(&[0xff, 0x00, b'=', 0x01]));
    }

    #[test]
    fn tracked_history_follows_loads() {
        let mut t = Tracked::default();
        t.started("https://a.test/");
        t.started("https://b.test/");
        t.started("https://b.test/");
        assert_eq!(t.history.len(), 2);
        assert_eq!(t.index, 1);

        t.pending_traversal = Some(0);
        t.started("https://a.test/");
        assert_eq!(t.index, 0);
        assert_eq!(t.history.len(), 2);

        t.started("https://c.test/");
        assert_eq!(t.history, vec!["https://a.test/", "https://c.test/"]);
    }

    #[test]
    fn init_script_defines_no_bridge_object() {
        assert!(INIT_SCRIPT.contains("window.__webbridge = {"));
        assert!(!INIT_SCRIPT.contains(BRIDGE_INTERFACE));
        assert!(!INIT_SCRIPT.contains(".install("));
    }

    #[test]
    fn bridge_set_follows_messaging_toggles() {
        let queue = MessageQueue::new();
        let mut set = BridgeSet::default();
        assert_eq!(set.install_script(), None);

        set.insert(BRIDGE_INTERFACE, queue.bridge_object());
        assert_eq!(
            set.install_script().as_deref(),
            Some(r#"window.__webbridge.install("ReactNativeWebView");"#)
        );
        // a later page start installs it again
        assert_eq!(set.install_script(), set.install_script());

        set.remove(BRIDGE_INTERFACE);
        assert_eq!(set.install_script(), None);
        assert!(set.get(BRIDGE_INTERFACE).is_none());
        assert_eq!(
            removal_script(BRIDGE_INTERFACE).unwrap(),
            r#"delete window["ReactNativeWebView"];"#
        );
    }
}
