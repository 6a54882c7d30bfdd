//! Browser engine abstraction.
//!
//! `BrowserEngine` is the single seam between the bridge core and a concrete
//! engine. Two implementations exist:
//! - [`SystemEngine`]: the platform web view, via `wry`
//! - [`HeadlessEngine`]: an in-process engine without a native surface
//!
//! The engine is chosen once, when a widget is constructed. Nothing above
//! this module branches on which engine is active; differences are expressed
//! through [`EngineCapabilities`].

use std::collections::BTreeMap;

use webbridge_common::{EngineError, EngineKind, Rect};

mod headless;
mod hooks;
mod settings;
mod system;

pub use headless::{EngineOp, HeadlessEngine, HeadlessHandle, HeadlessProfile};
pub use hooks::{
    BridgeObject, CustomViewCallback, EngineCallback, EngineHooks, NavigationGate, OverlayView,
};
pub use settings::{
    CacheMode, EngineSetting, ForceDark, ForceDarkStrategy, LayerType, MixedContentMode,
    NativeSettings, OverScrollMode,
};
pub use system::{SystemEngine, SystemEngineOptions};

/// Request headers, ordered so that logs and tests are deterministic.
pub type Headers = BTreeMap<String, String>;

/// Sentinel page used to reset a widget and release page resources.
pub const BLANK_URL: &str = "about:blank";

pub const HTML_MIME_TYPE: &str = "text/html";
pub const HTML_ENCODING: &str = "UTF-8";

/// Platform API levels at which engine features appeared.
pub mod api_level {
    pub const DEFAULT_USER_AGENT: u32 = 17;
    pub const EVALUATE_SCRIPT: u32 = 19;
    pub const MIXED_CONTENT: u32 = 21;
    pub const PROTECTED_MEDIA: u32 = 26;
    pub const FORCE_DARK: u32 = 29;
}

/// A feature that an engine may or may not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Direct script evaluation (otherwise `javascript:` URL fallback).
    EvaluateScript,
    /// Navigations carrying a request body.
    PostNavigation,
    ForceDark,
    ForceDarkStrategy,
    ProtectedMedia,
    MixedContent,
    ThirdPartyCookies,
    /// The engine can report its built-in user agent string.
    DefaultUserAgent,
    /// Native full-screen video overlays.
    CustomView,
}

/// Feature flags reported by an engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineCapabilities {
    pub evaluate_script: bool,
    pub post_navigation: bool,
    pub force_dark: bool,
    pub force_dark_strategy: bool,
    pub protected_media: bool,
    pub mixed_content: bool,
    pub third_party_cookies: bool,
    pub default_user_agent: bool,
    pub custom_view: bool,
}

impl EngineCapabilities {
    /// Everything available.
    pub fn all() -> Self {
        Self {
            evaluate_script: true,
            post_navigation: true,
            force_dark: true,
            force_dark_strategy: true,
            protected_media: true,
            mixed_content: true,
            third_party_cookies: true,
            default_user_agent: true,
            custom_view: true,
        }
    }

    /// Capabilities of an engine running on the given platform API level.
    /// The dark-mode and protected-media features additionally depend on
    /// the engine build, hence the explicit flags.
    pub fn for_api_level(level: u32, force_dark_feature: bool, protected_media_feature: bool) -> Self {
        Self {
            evaluate_script: level >= api_level::EVALUATE_SCRIPT,
            post_navigation: true,
            force_dark: force_dark_feature && level >= api_level::FORCE_DARK,
            force_dark_strategy: force_dark_feature && level >= api_level::FORCE_DARK,
            protected_media: protected_media_feature && level >= api_level::PROTECTED_MEDIA,
            mixed_content: level >= api_level::MIXED_CONTENT,
            third_party_cookies: level >= api_level::MIXED_CONTENT,
            default_user_agent: level >= api_level::DEFAULT_USER_AGENT,
            custom_view: true,
        }
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::EvaluateScript => self.evaluate_script,
            Capability::PostNavigation => self.post_navigation,
            Capability::ForceDark => self.force_dark,
            Capability::ForceDarkStrategy => self.force_dark_strategy,
            Capability::ProtectedMedia => self.protected_media,
            Capability::MixedContent => self.mixed_content,
            Capability::ThirdPartyCookies => self.third_party_cookies,
            Capability::DefaultUserAgent => self.default_user_agent,
            Capability::CustomView => self.custom_view,
        }
    }
}

/// Where an injected script should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptScope {
    MainFrame,
    AllFrames,
}

impl ScriptScope {
    pub fn main_frame_only(main_only: bool) -> Self {
        if main_only {
            Self::MainFrame
        } else {
            Self::AllFrames
        }
    }
}

/// The capability-set interface every engine backend implements.
///
/// All methods are called on the UI thread. Engines report asynchronous
/// results (page loads, errors, scroll, page messages) through the
/// [`EngineHooks`] they were built with, never by calling back into the
/// widget directly.
pub trait BrowserEngine {
    fn kind(&self) -> EngineKind;

    fn capabilities(&self) -> EngineCapabilities;

    /// Current native settings.
    fn settings(&self) -> &NativeSettings;

    /// Forward one setting to the native settings object.
    fn apply_setting(&mut self, setting: EngineSetting) -> Result<(), EngineError>;

    /// The engine's built-in user agent, if it can report one.
    fn default_user_agent(&self) -> Option<String>;

    fn url(&self) -> Option<String>;
    fn title(&self) -> String;
    /// Load progress of the current page, 0-100.
    fn progress(&self) -> u8;
    fn can_go_back(&self) -> bool;
    fn can_go_forward(&self) -> bool;

    /// Render markup directly, without a network request or history entry.
    fn load_data_with_base_url(
        &mut self,
        base_url: &str,
        data: &str,
        mime_type: &str,
        encoding: &str,
    ) -> Result<(), EngineError>;

    fn load_url(&mut self, url: &str, headers: &Headers) -> Result<(), EngineError>;

    fn post_url(&mut self, url: &str, body: &[u8]) -> Result<(), EngineError>;

    fn evaluate_script(&mut self, script: &str, scope: ScriptScope) -> Result<(), EngineError>;

    fn go_back(&mut self) -> Result<(), EngineError>;
    fn go_forward(&mut self) -> Result<(), EngineError>;
    fn reload(&mut self) -> Result<(), EngineError>;
    fn stop_loading(&mut self) -> Result<(), EngineError>;
    fn request_focus(&mut self) -> Result<(), EngineError>;

    fn clear_form_data(&mut self) -> Result<(), EngineError>;
    fn clear_cache(&mut self, include_disk_files: bool) -> Result<(), EngineError>;
    fn clear_history(&mut self) -> Result<(), EngineError>;
    fn remove_all_cookies(&mut self) -> Result<(), EngineError>;
    /// Cookie header value stored for `url`, if any.
    fn cookie(&self, url: &str) -> Option<String>;

    /// Install the page-visible bridge object under `name`.
    fn add_bridge_object(&mut self, name: &str, bridge: BridgeObject) -> Result<(), EngineError>;
    fn remove_bridge_object(&mut self, name: &str) -> Result<(), EngineError>;

    /// Re-attach installed bridge objects to a freshly started document.
    /// Engines whose objects survive navigation need nothing here.
    fn restore_bridge_objects(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Show or hide the engine's own view.
    fn set_visible(&mut self, visible: bool) -> Result<(), EngineError>;

    /// Position the engine's view inside its parent, in logical pixels.
    fn set_bounds(&mut self, _bounds: Rect) -> Result<(), EngineError> {
        Ok(())
    }

    /// Host application moved to the background.
    fn pause(&mut self) {}
    /// Host application returned to the foreground.
    fn resume(&mut self) {}

    /// Release the native engine. Called at most once per instance.
    fn destroy(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_api_level_lacks_evaluate() {
        let caps = EngineCapabilities::for_api_level(18, true, true);
        assert!(!caps.supports(Capability::EvaluateScript));
        assert!(!caps.supports(Capability::MixedContent));
        assert!(caps.supports(Capability::DefaultUserAgent));
    }

    #[test]
    fn modern_api_level_has_everything() {
        let caps = EngineCapabilities::for_api_level(33, true, true);
        assert_eq!(caps, EngineCapabilities::all());
    }

    #[test]
    fn feature_flags_gate_dark_mode_and_protected_media() {
        let caps = EngineCapabilities::for_api_level(33, false, false);
        assert!(!caps.supports(Capability::ForceDark));
        assert!(!caps.supports(Capability::ForceDarkStrategy));
        assert!(!caps.supports(Capability::ProtectedMedia));
        assert!(caps.supports(Capability::EvaluateScript));
    }

    #[test]
    fn force_dark_needs_api_29() {
        let caps = EngineCapabilities::for_api_level(28, true, true);
        assert!(!caps.supports(Capability::ForceDark));
        assert!(caps.supports(Capability::ProtectedMedia));
    }

    #[test]
    fn script_scope_from_flag() {
        assert_eq!(ScriptScope::main_frame_only(true), ScriptScope::MainFrame);
        assert_eq!(ScriptScope::main_frame_only(false), ScriptScope::AllFrames);
    }
}
