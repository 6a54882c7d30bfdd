//! In-process engine without a native surface.
//!
//! Keeps history, cookies and settings in memory, completes every
//! navigation immediately and records each call it receives. The paired
//! [`HeadlessHandle`] plays the part of the page and the network: it can
//! post bridge messages from any thread, fail loads, crash the renderer,
//! scroll, and request full-screen overlays or downloads.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;
use webbridge_common::{EngineError, EngineKind};

use super::hooks::{poisoned, BridgeObject, CustomViewCallback, EngineCallback, EngineHooks, OverlayView};
use super::settings::{EngineSetting, NativeSettings};
use super::{
    BrowserEngine, EngineCapabilities, Headers, ScriptScope, BLANK_URL,
};
use crate::navigation::BasicAuthCredential;

pub const HEADLESS_USER_AGENT: &str = concat!("webbridge-headless/", env!("CARGO_PKG_VERSION"));

/// Platform the headless engine pretends to run on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessProfile {
    pub api_level: u32,
    pub force_dark_feature: bool,
    pub protected_media_feature: bool,
    pub user_agent: String,
}

impl Default for HeadlessProfile {
    fn default() -> Self {
        Self {
            api_level: 33,
            force_dark_feature: true,
            protected_media_feature: true,
            user_agent: HEADLESS_USER_AGENT.to_string(),
        }
    }
}

impl HeadlessProfile {
    pub fn with_api_level(api_level: u32) -> Self {
        Self {
            api_level,
            ..Default::default()
        }
    }
}

/// One recorded engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOp {
    Setting(EngineSetting),
    LoadData { base_url: String, data: String },
    LoadUrl { url: String, headers: Headers },
    PostUrl { url: String, body: Vec<u8> },
    Evaluate { script: String, scope: ScriptScope },
    GoBack,
    GoForward,
    Reload,
    StopLoading,
    RequestFocus,
    ClearFormData,
    ClearCache { include_disk_files: bool },
    ClearHistory,
    RemoveAllCookies,
    AddBridgeObject(String),
    RemoveBridgeObject(String),
    SetVisible(bool),
    Pause,
    Resume,
    Destroy,
}

#[derive(Debug, Default)]
struct PageState {
    history: Vec<String>,
    index: usize,
    title: String,
    progress: u8,
    cookies: HashMap<String, Vec<String>>,
}

impl PageState {
    fn current(&self) -> Option<&str> {
        self.history.get(self.index).map(String::as_str)
    }

    fn push(&mut self, url: &str) {
        if !self.history.is_empty() {
            self.history.truncate(self.index + 1);
        }
        self.history.push(url.to_string());
        self.index = self.history.len() - 1;
    }
}

fn cookie_key(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

fn extract_title(html: &str) -> String {
    let lower = html.to_ascii_lowercase();
    match (lower.find("<title>"), lower.find("</title>")) {
        (Some(start), Some(end)) if end > start + 7 => html[start + 7..end].trim().to_string(),
        _ => String::new(),
    }
}

/// State shared between the engine and its handle.
#[derive(Clone)]
struct Shared {
    hooks: EngineHooks,
    page: Arc<Mutex<PageState>>,
    bridges: Arc<Mutex<HashMap<String, BridgeObject>>>,
    /// Set while the page refuses script evaluation.
    scripts_rejected: Arc<AtomicBool>,
}

impl Shared {
    /// Complete a navigation synchronously: start, 100%, finish.
    fn complete_load(&self, url: &str, title: String, push: bool) {
        match self.page.lock() {
            Ok(mut page) => {
                if push {
                    page.push(url);
                }
                page.title = title;
                page.progress = 0;
            }
            Err(_) => poisoned("headless page"),
        }
        self.hooks.emit(EngineCallback::PageStarted {
            url: url.to_string(),
        });
        self.set_progress(100);
        self.hooks.emit(EngineCallback::PageFinished {
            url: url.to_string(),
        });
    }

    fn set_progress(&self, progress: u8) {
        if let Ok(mut page) = self.page.lock() {
            page.progress = progress;
        }
        self.hooks.emit(EngineCallback::ProgressChanged { progress });
    }
}

pub struct HeadlessEngine {
    shared: Shared,
    capabilities: EngineCapabilities,
    settings: NativeSettings,
    default_user_agent: String,
    ops: Arc<Mutex<Vec<EngineOp>>>,
    visible: bool,
    destroyed: bool,
}

impl HeadlessEngine {
    pub fn new(profile: HeadlessProfile, hooks: EngineHooks) -> Self {
        let capabilities = EngineCapabilities::for_api_level(
            profile.api_level,
            profile.force_dark_feature,
            profile.protected_media_feature,
        );
        debug!(api_level = profile.api_level, "headless engine created");
        Self {
            shared: Shared {
                hooks,
                page: Arc::new(Mutex::new(PageState::default())),
                bridges: Arc::new(Mutex::new(HashMap::new())),
                scripts_rejected: Arc::new(AtomicBool::new(false)),
            },
            capabilities,
            settings: NativeSettings::default(),
            default_user_agent: profile.user_agent,
            ops: Arc::new(Mutex::new(Vec::new())),
            visible: true,
            destroyed: false,
        }
    }

    /// A handle that drives this engine from the page/network side.
    pub fn handle(&self) -> HeadlessHandle {
        HeadlessHandle {
            shared: self.shared.clone(),
            ops: Arc::clone(&self.ops),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn record(&self, op: EngineOp) {
        if let Ok(mut ops) = self.ops.lock() {
            ops.push(op);
        }
    }

    fn live(&self) -> Result<(), EngineError> {
        if self.destroyed {
            Err(EngineError::Destroyed)
        } else {
            Ok(())
        }
    }

    fn navigate_history(&mut self, delta: isize) -> Result<(), EngineError> {
        let target = {
            let mut page = self
                .shared
                .page
                .lock()
                .map_err(|_| EngineError::Backend("headless page lock poisoned".into()))?;
            let next = page.index as isize + delta;
            if next < 0 || next as usize >= page.history.len() {
                return Ok(());
            }
            page.index = next as usize;
            page.history[page.index].clone()
        };
        self.shared.complete_load(&target, String::new(), false);
        Ok(())
    }
}

impl BrowserEngine for HeadlessEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Headless
    }

    fn capabilities(&self) -> EngineCapabilities {
        self.capabilities
    }

    fn settings(&self) -> &NativeSettings {
        &self.settings
    }

    fn apply_setting(&mut self, setting: EngineSetting) -> Result<(), EngineError> {
        self.live()?;
        if let Some(capability) = setting.required_capability() {
            if !self.capabilities.supports(capability) {
                return Err(EngineError::Unsupported(setting.name()));
            }
        }
        self.record(EngineOp::Setting(setting.clone()));
        self.settings.apply(setting);
        Ok(())
    }

    fn default_user_agent(&self) -> Option<String> {
        self.capabilities
            .default_user_agent
            .then(|| self.default_user_agent.clone())
    }

    fn url(&self) -> Option<String> {
        self.shared
            .page
            .lock()
            .ok()
            .and_then(|p| p.current().map(str::to_string))
    }

    fn title(&self) -> String {
        self.shared
            .page
            .lock()
            .map(|p| p.title.clone())
            .unwrap_or_default()
    }

    fn progress(&self) -> u8 {
        self.shared.page.lock().map(|p| p.progress).unwrap_or(0)
    }

    fn can_go_back(&self) -> bool {
        self.shared.page.lock().map(|p| p.index > 0).unwrap_or(false)
    }

    fn can_go_forward(&self) -> bool {
        self.shared
            .page
            .lock()
            .map(|p| p.index + 1 < p.history.len())
            .unwrap_or(false)
    }

    fn load_data_with_base_url(
        &mut self,
        base_url: &str,
        data: &str,
        _mime_type: &str,
        _encoding: &str,
    ) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::LoadData {
            base_url: base_url.to_string(),
            data: data.to_string(),
        });
        let url = if base_url.is_empty() { BLANK_URL } else { base_url };
        // markup loads replace the current entry instead of adding one
        if let Ok(mut page) = self.shared.page.lock() {
            if page.history.is_empty() {
                page.history.push(url.to_string());
                page.index = 0;
            } else {
                let index = page.index;
                page.history[index] = url.to_string();
            }
        }
        self.shared.complete_load(url, extract_title(data), false);
        Ok(())
    }

    fn load_url(&mut self, url: &str, headers: &Headers) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::LoadUrl {
            url: url.to_string(),
            headers: headers.clone(),
        });
        // script URLs run in the current page
        if url.starts_with("javascript:") {
            return Ok(());
        }
        self.shared.complete_load(url, String::new(), true);
        Ok(())
    }

    fn post_url(&mut self, url: &str, body: &[u8]) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::PostUrl {
            url: url.to_string(),
            body: body.to_vec(),
        });
        self.shared.complete_load(url, String::new(), true);
        Ok(())
    }

    fn evaluate_script(&mut self, script: &str, scope: ScriptScope) -> Result<(), EngineError> {
        self.live()?;
        if !self.capabilities.evaluate_script {
            return Err(EngineError::Unsupported("evaluateJavascript"));
        }
        if self.shared.scripts_rejected.load(Ordering::SeqCst) {
            return Err(EngineError::Backend("script evaluation rejected by page".into()));
        }
        self.record(EngineOp::Evaluate {
            script: script.to_string(),
            scope,
        });
        Ok(())
    }

    fn go_back(&mut self) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::GoBack);
        self.navigate_history(-1)
    }

    fn go_forward(&mut self) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::GoForward);
        self.navigate_history(1)
    }

    fn reload(&mut self) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::Reload);
        if let Some(url) = self.url() {
            let title = self.title();
            self.shared.complete_load(&url, title, false);
        }
        Ok(())
    }

    fn stop_loading(&mut self) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::StopLoading);
        Ok(())
    }

    fn request_focus(&mut self) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::RequestFocus);
        Ok(())
    }

    fn clear_form_data(&mut self) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::ClearFormData);
        Ok(())
    }

    fn clear_cache(&mut self, include_disk_files: bool) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::ClearCache { include_disk_files });
        Ok(())
    }

    fn clear_history(&mut self) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::ClearHistory);
        if let Ok(mut page) = self.shared.page.lock() {
            let current = page.current().map(str::to_string);
            page.history = current.into_iter().collect();
            page.index = 0;
        }
        Ok(())
    }

    fn remove_all_cookies(&mut self) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::RemoveAllCookies);
        if let Ok(mut page) = self.shared.page.lock() {
            page.cookies.clear();
        }
        Ok(())
    }

    fn cookie(&self, url: &str) -> Option<String> {
        let page = self.shared.page.lock().ok()?;
        page.cookies
            .get(&cookie_key(url))
            .filter(|c| !c.is_empty())
            .map(|c| c.join("; "))
    }

    fn add_bridge_object(&mut self, name: &str, bridge: BridgeObject) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::AddBridgeObject(name.to_string()));
        if let Ok(mut bridges) = self.shared.bridges.lock() {
            bridges.insert(name.to_string(), bridge);
        }
        Ok(())
    }

    fn remove_bridge_object(&mut self, name: &str) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::RemoveBridgeObject(name.to_string()));
        if let Ok(mut bridges) = self.shared.bridges.lock() {
            bridges.remove(name);
        }
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), EngineError> {
        self.live()?;
        self.record(EngineOp::SetVisible(visible));
        self.visible = visible;
        Ok(())
    }

    fn pause(&mut self) {
        if !self.destroyed {
            self.record(EngineOp::Pause);
        }
    }

    fn resume(&mut self) {
        if !self.destroyed {
            self.record(EngineOp::Resume);
        }
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.record(EngineOp::Destroy);
        if let Ok(mut bridges) = self.shared.bridges.lock() {
            bridges.clear();
        }
        debug!("headless engine destroyed");
    }
}

/// Page/network side of a [`HeadlessEngine`]. `Send + Clone`, so page
/// messages can originate on any thread.
#[derive(Clone)]
pub struct HeadlessHandle {
    shared: Shared,
    ops: Arc<Mutex<Vec<EngineOp>>>,
}

impl HeadlessHandle {
    /// Every call the engine received so far.
    pub fn ops(&self) -> Vec<EngineOp> {
        self.ops.lock().map(|o| o.clone()).unwrap_or_default()
    }

    pub fn clear_ops(&self) {
        if let Ok(mut ops) = self.ops.lock() {
            ops.clear();
        }
    }

    /// Number of recorded calls matching `pred`.
    pub fn count_ops(&self, pred: impl Fn(&EngineOp) -> bool) -> usize {
        self.ops().iter().filter(|op| pred(op)).count()
    }

    /// Whether the engine was released.
    pub fn destroyed(&self) -> bool {
        self.count_ops(|op| *op == EngineOp::Destroy) > 0
    }

    /// Page script calls `window[interface].postMessage(data)`. Returns
    /// `false` when no such object is installed.
    pub fn post_message(&self, interface: &str, data: impl Into<String>) -> bool {
        let bridge = self
            .shared
            .bridges
            .lock()
            .ok()
            .and_then(|b| b.get(interface).cloned());
        match bridge {
            Some(bridge) => bridge.post_message(data),
            None => false,
        }
    }

    pub fn has_bridge_object(&self, interface: &str) -> bool {
        self.shared
            .bridges
            .lock()
            .map(|b| b.contains_key(interface))
            .unwrap_or(false)
    }

    /// Make the page refuse every script evaluation until cleared.
    pub fn reject_scripts(&self, rejected: bool) {
        self.shared.scripts_rejected.store(rejected, Ordering::SeqCst);
    }

    /// Start a navigation without finishing it.
    pub fn begin_load(&self, url: &str) {
        if let Ok(mut page) = self.shared.page.lock() {
            page.push(url);
            page.progress = 0;
        }
        self.shared.hooks.emit(EngineCallback::PageStarted {
            url: url.to_string(),
        });
    }

    pub fn progress(&self, progress: u8) {
        self.shared.set_progress(progress.min(100));
    }

    pub fn finish_load(&self) {
        let url = self
            .shared
            .page
            .lock()
            .ok()
            .and_then(|p| p.current().map(str::to_string))
            .unwrap_or_else(|| BLANK_URL.to_string());
        self.shared.hooks.emit(EngineCallback::PageFinished { url });
    }

    pub fn fail_load(&self, url: &str, code: i32, description: &str) {
        self.shared.hooks.emit(EngineCallback::ReceivedError {
            url: url.to_string(),
            code,
            description: description.to_string(),
        });
    }

    pub fn http_error(&self, url: &str, status_code: u16, description: &str, main_frame: bool) {
        self.shared.hooks.emit(EngineCallback::ReceivedHttpError {
            url: url.to_string(),
            main_frame,
            status_code,
            description: description.to_string(),
        });
    }

    pub fn crash(&self, did_crash: bool) {
        self.shared
            .hooks
            .emit(EngineCallback::RenderProcessGone { did_crash });
    }

    pub fn scroll(&self, x: i32, y: i32, content: (i32, i32), layout: (i32, i32)) {
        self.shared.hooks.emit(EngineCallback::ScrollChanged {
            x,
            y,
            content_width: content.0,
            content_height: content.1,
            layout_width: layout.0,
            layout_height: layout.1,
        });
    }

    pub fn content_size(&self, width: i32, height: i32) {
        self.shared
            .hooks
            .emit(EngineCallback::ContentSizeChanged { width, height });
    }

    /// The page's media element requests full screen. The returned flag
    /// flips once the bridge invokes the hidden callback.
    pub fn show_custom_view(&self, view: OverlayView) -> Arc<AtomicBool> {
        let hidden = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&hidden);
        self.shared.hooks.emit(EngineCallback::ShowCustomView {
            view,
            callback: CustomViewCallback::new(move || flag.store(true, Ordering::SeqCst)),
        });
        hidden
    }

    pub fn hide_custom_view(&self) {
        self.shared.hooks.emit(EngineCallback::HideCustomView);
    }

    pub fn download(&self, url: &str, content_disposition: &str, mime_type: &str) {
        self.shared.hooks.emit(EngineCallback::DownloadRequested {
            url: url.to_string(),
            user_agent: HEADLESS_USER_AGENT.to_string(),
            content_disposition: content_disposition.to_string(),
            mime_type: mime_type.to_string(),
        });
    }

    /// The user follows a link. Goes through the navigation gate; loads
    /// in-widget only when it lets the navigation proceed.
    pub fn click_link(&self, url: &str) -> bool {
        if !self.shared.hooks.should_start_load(url, "click") {
            return false;
        }
        self.shared.complete_load(url, String::new(), true);
        true
    }

    /// Server answers with an authentication challenge.
    pub fn auth_challenge(&self, host: &str, realm: &str) -> Option<BasicAuthCredential> {
        self.shared.hooks.basic_auth(host, realm)
    }

    /// Cookie set by a response from `url`.
    pub fn set_cookie(&self, url: &str, cookie: &str) {
        if let Ok(mut page) = self.shared.page.lock() {
            page.cookies
                .entry(cookie_key(url))
                .or_default()
                .push(cookie.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use webbridge_common::WidgetId;

    use super::*;
    use crate::engine::NavigationGate;
    use crate::host::QueuedHost;

    fn engine(profile: HeadlessProfile) -> (HeadlessEngine, mpsc::Receiver<EngineCallback>) {
        let gate = Arc::new(NavigationGate::new(WidgetId(1), Arc::new(QueuedHost::new())));
        let (hooks, rx) = EngineHooks::channel(gate);
        (HeadlessEngine::new(profile, hooks), rx)
    }

    fn names(rx: &mpsc::Receiver<EngineCallback>) -> Vec<&'static str> {
        rx.try_iter().map(|cb| cb.name()).collect()
    }

    #[test]
    fn load_url_completes_and_tracks_history() {
        let (mut e, rx) = engine(HeadlessProfile::default());
        e.load_url("https://example.com/a", &Headers::new()).unwrap();
        e.load_url("https://example.com/b", &Headers::new()).unwrap();

        assert_eq!(e.url().as_deref(), Some("https://example.com/b"));
        assert_eq!(e.progress(), 100);
        assert!(e.can_go_back());
        assert!(!e.can_go_forward());
        assert_eq!(
            names(&rx),
            vec![
                "page_started",
                "progress_changed",
                "page_finished",
                "page_started",
                "progress_changed",
                "page_finished"
            ]
        );

        e.go_back().unwrap();
        assert_eq!(e.url().as_deref(), Some("https://example.com/a"));
        assert!(e.can_go_forward());
    }

    #[test]
    fn javascript_url_does_not_navigate() {
        let (mut e, rx) = engine(HeadlessProfile::default());
        e.load_url("javascript:void(0)", &Headers::new()).unwrap();
        assert!(e.url().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn html_load_takes_title() {
        let (mut e, _rx) = engine(HeadlessProfile::default());
        e.load_data_with_base_url("", "<html><title> Hi </title></html>", "text/html", "UTF-8")
            .unwrap();
        assert_eq!(e.url().as_deref(), Some(BLANK_URL));
        assert_eq!(e.title(), "Hi");
        assert!(!e.can_go_back());
    }

    #[test]
    fn legacy_engine_rejects_evaluate() {
        let (mut e, _rx) = engine(HeadlessProfile::with_api_level(18));
        let err = e.evaluate_script("1", ScriptScope::MainFrame).unwrap_err();
        assert!(matches!(err, EngineError::Unsupported(_)));
    }

    #[test]
    fn gated_setting_unsupported() {
        let (mut e, _rx) = engine(HeadlessProfile::with_api_level(28));
        let err = e
            .apply_setting(EngineSetting::ForceDark(crate::engine::ForceDark::On))
            .unwrap_err();
        assert!(matches!(err, EngineError::Unsupported("forceDark")));
    }

    #[test]
    fn cookies_by_host() {
        let (mut e, _rx) = engine(HeadlessProfile::default());
        let handle = e.handle();
        handle.set_cookie("https://example.com/login", "sid=1");
        handle.set_cookie("https://example.com/", "theme=dark");

        assert_eq!(
            e.cookie("https://example.com/files/a.pdf").as_deref(),
            Some("sid=1; theme=dark")
        );
        e.remove_all_cookies().unwrap();
        assert!(e.cookie("https://example.com/").is_none());
    }

    #[test]
    fn bridge_messages_from_another_thread() {
        let (mut e, _rx) = engine(HeadlessProfile::default());
        let (tx, messages) = mpsc::channel();
        e.add_bridge_object("Bridge", BridgeObject::new(tx)).unwrap();

        let handle = e.handle();
        std::thread::spawn(move || {
            assert!(handle.post_message("Bridge", "hello"));
        })
        .join()
        .unwrap();

        assert_eq!(messages.try_recv().unwrap(), "hello");
        assert!(!e.handle().post_message("Other", "x"));
    }

    #[test]
    fn destroy_once_then_calls_fail() {
        let (mut e, _rx) = engine(HeadlessProfile::default());
        let handle = e.handle();
        e.destroy();
        e.destroy();

        assert_eq!(handle.count_ops(|op| *op == EngineOp::Destroy), 1);
        assert!(matches!(e.reload(), Err(EngineError::Destroyed)));
    }

    #[test]
    fn clear_history_keeps_current_entry() {
        let (mut e, _rx) = engine(HeadlessProfile::default());
        e.load_url("https://a.test/", &Headers::new()).unwrap();
        e.load_url("https://b.test/", &Headers::new()).unwrap();
        e.clear_history().unwrap();
        assert!(!e.can_go_back());
        assert_eq!(e.url().as_deref(), Some("https://b.test/"));
    }
}
