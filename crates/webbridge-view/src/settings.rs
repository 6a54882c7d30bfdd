//! Declarative settings → engine settings.
//!
//! Each setter is a direct forward to the active engine. The only
//! translation is string-to-constant mapping; gated settings are checked
//! against the engine's capabilities and silently skipped when missing.

use tracing::debug;
use webbridge_common::{BridgeError, EngineError, Result};

use crate::engine::{
    BrowserEngine, CacheMode, EngineSetting, ForceDark, ForceDarkStrategy, LayerType,
    MixedContentMode, OverScrollMode,
};

/// Forwards widget configuration to an engine and holds the little state
/// that spans several settings (the user agent pieces).
#[derive(Debug, Clone, Default)]
pub struct EngineSettingsAdapter {
    user_agent: Option<String>,
    application_name: Option<String>,
}

impl EngineSettingsAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward one setting. Unsupported features are a silent no-op.
    pub fn forward(&self, engine: &mut dyn BrowserEngine, setting: EngineSetting) -> Result<()> {
        if let Some(capability) = setting.required_capability() {
            if !engine.capabilities().supports(capability) {
                debug!(setting = setting.name(), "engine lacks feature, setting skipped");
                return Ok(());
            }
        }
        let name = setting.name();
        match engine.apply_setting(setting) {
            Ok(()) => Ok(()),
            Err(EngineError::Unsupported(_)) => {
                debug!(setting = name, "engine rejected unsupported setting");
                Ok(())
            }
            Err(e) => Err(BridgeError::Engine(e)),
        }
    }

    /// Settings every widget starts with, before any host property.
    pub fn apply_creation_defaults(&self, engine: &mut dyn BrowserEngine) -> Result<()> {
        for setting in [
            EngineSetting::BuiltInZoomControls(true),
            EngineSetting::DisplayZoomControls(false),
            EngineSetting::DomStorageEnabled(true),
            EngineSetting::SupportMultipleWindows(true),
            EngineSetting::AllowFileAccess(false),
            EngineSetting::AllowFileAccessFromFileUrls(false),
            EngineSetting::AllowUniversalAccessFromFileUrls(false),
            EngineSetting::MixedContentMode(MixedContentMode::NeverAllow),
        ] {
            self.forward(engine, setting)?;
        }
        Ok(())
    }

    pub fn set_javascript_enabled(&self, engine: &mut dyn BrowserEngine, enabled: bool) -> Result<()> {
        self.forward(engine, EngineSetting::JavaScriptEnabled(enabled))
    }

    pub fn set_dom_storage_enabled(&self, engine: &mut dyn BrowserEngine, enabled: bool) -> Result<()> {
        self.forward(engine, EngineSetting::DomStorageEnabled(enabled))
    }

    pub fn set_cache_enabled(&self, engine: &mut dyn BrowserEngine, enabled: bool) -> Result<()> {
        let mode = if enabled {
            CacheMode::Default
        } else {
            CacheMode::NoCache
        };
        self.forward(engine, EngineSetting::CacheMode(mode))
    }

    pub fn set_cache_mode(&self, engine: &mut dyn BrowserEngine, mode: &str) -> Result<()> {
        self.forward(engine, EngineSetting::CacheMode(CacheMode::from_prop(mode)))
    }

    pub fn set_user_agent(
        &mut self,
        engine: &mut dyn BrowserEngine,
        user_agent: Option<String>,
    ) -> Result<()> {
        self.user_agent = user_agent.filter(|ua| !ua.is_empty());
        self.apply_user_agent(engine)
    }

    pub fn set_application_name_for_user_agent(
        &mut self,
        engine: &mut dyn BrowserEngine,
        name: Option<String>,
    ) -> Result<()> {
        self.application_name = name.filter(|n| !n.is_empty());
        self.apply_user_agent(engine)
    }

    /// Explicit user agent wins; otherwise the engine default with the
    /// application name appended; otherwise the engine default.
    pub fn effective_user_agent(&self, engine: &dyn BrowserEngine) -> Option<String> {
        if let Some(ua) = &self.user_agent {
            return Some(ua.clone());
        }
        match (&self.application_name, engine.default_user_agent()) {
            (Some(app), Some(default)) => Some(format!("{default} {app}")),
            _ => None,
        }
    }

    fn apply_user_agent(&self, engine: &mut dyn BrowserEngine) -> Result<()> {
        let ua = self.effective_user_agent(engine);
        self.forward(engine, EngineSetting::UserAgent(ua))
    }

    pub fn set_mixed_content_mode(&self, engine: &mut dyn BrowserEngine, mode: &str) -> Result<()> {
        self.forward(
            engine,
            EngineSetting::MixedContentMode(MixedContentMode::from_prop(mode)),
        )
    }

    pub fn set_force_dark_on(&self, engine: &mut dyn BrowserEngine, on: bool) -> Result<()> {
        let mode = if on { ForceDark::On } else { ForceDark::Off };
        self.forward(engine, EngineSetting::ForceDark(mode))?;
        if on {
            self.forward(
                engine,
                EngineSetting::ForceDarkStrategy(
                    ForceDarkStrategy::PreferWebThemeOverUserAgentDarkening,
                ),
            )?;
        }
        Ok(())
    }

    pub fn set_allow_file_access(&self, engine: &mut dyn BrowserEngine, allow: bool) -> Result<()> {
        self.forward(engine, EngineSetting::AllowFileAccess(allow))
    }

    pub fn set_allow_file_access_from_file_urls(
        &self,
        engine: &mut dyn BrowserEngine,
        allow: bool,
    ) -> Result<()> {
        self.forward(engine, EngineSetting::AllowFileAccessFromFileUrls(allow))
    }

    pub fn set_allow_universal_access_from_file_urls(
        &self,
        engine: &mut dyn BrowserEngine,
        allow: bool,
    ) -> Result<()> {
        self.forward(engine, EngineSetting::AllowUniversalAccessFromFileUrls(allow))
    }

    pub fn set_geolocation_enabled(&self, engine: &mut dyn BrowserEngine, enabled: bool) -> Result<()> {
        self.forward(engine, EngineSetting::GeolocationEnabled(enabled))
    }

    pub fn set_media_playback_requires_user_action(
        &self,
        engine: &mut dyn BrowserEngine,
        requires: bool,
    ) -> Result<()> {
        self.forward(engine, EngineSetting::MediaPlaybackRequiresUserGesture(requires))
    }

    pub fn set_javascript_can_open_windows_automatically(
        &self,
        engine: &mut dyn BrowserEngine,
        enabled: bool,
    ) -> Result<()> {
        self.forward(engine, EngineSetting::JavaScriptCanOpenWindowsAutomatically(enabled))
    }

    pub fn set_save_form_data_disabled(
        &self,
        engine: &mut dyn BrowserEngine,
        disabled: bool,
    ) -> Result<()> {
        self.forward(engine, EngineSetting::SaveFormData(!disabled))
    }

    pub fn set_minimum_font_size(&self, engine: &mut dyn BrowserEngine, size: u32) -> Result<()> {
        self.forward(engine, EngineSetting::MinimumFontSize(size))
    }

    pub fn set_text_zoom(&self, engine: &mut dyn BrowserEngine, percent: u32) -> Result<()> {
        self.forward(engine, EngineSetting::TextZoom(percent))
    }

    pub fn set_third_party_cookies_enabled(
        &self,
        engine: &mut dyn BrowserEngine,
        enabled: bool,
    ) -> Result<()> {
        self.forward(engine, EngineSetting::ThirdPartyCookies(enabled))
    }

    pub fn set_allows_protected_media(&self, engine: &mut dyn BrowserEngine, allow: bool) -> Result<()> {
        self.forward(engine, EngineSetting::ProtectedMedia(allow))
    }

    pub fn set_scales_page_to_fit(&self, engine: &mut dyn BrowserEngine, enabled: bool) -> Result<()> {
        self.forward(engine, EngineSetting::LoadWithOverviewMode(enabled))?;
        self.forward(engine, EngineSetting::UseWideViewPort(enabled))
    }

    pub fn set_builtin_zoom_controls(&self, engine: &mut dyn BrowserEngine, enabled: bool) -> Result<()> {
        self.forward(engine, EngineSetting::BuiltInZoomControls(enabled))
    }

    pub fn set_display_zoom_controls(&self, engine: &mut dyn BrowserEngine, enabled: bool) -> Result<()> {
        self.forward(engine, EngineSetting::DisplayZoomControls(enabled))
    }

    pub fn set_support_multiple_windows(
        &self,
        engine: &mut dyn BrowserEngine,
        enabled: bool,
    ) -> Result<()> {
        self.forward(engine, EngineSetting::SupportMultipleWindows(enabled))
    }

    pub fn set_nested_scroll_enabled(&self, engine: &mut dyn BrowserEngine, enabled: bool) -> Result<()> {
        self.forward(engine, EngineSetting::NestedScrollEnabled(enabled))
    }

    pub fn set_shows_horizontal_scroll_indicator(
        &self,
        engine: &mut dyn BrowserEngine,
        shown: bool,
    ) -> Result<()> {
        self.forward(engine, EngineSetting::HorizontalScrollIndicator(shown))
    }

    pub fn set_shows_vertical_scroll_indicator(
        &self,
        engine: &mut dyn BrowserEngine,
        shown: bool,
    ) -> Result<()> {
        self.forward(engine, EngineSetting::VerticalScrollIndicator(shown))
    }

    pub fn set_over_scroll_mode(&self, engine: &mut dyn BrowserEngine, mode: &str) -> Result<()> {
        self.forward(
            engine,
            EngineSetting::OverScrollMode(OverScrollMode::from_prop(mode)),
        )
    }

    pub fn set_layer_type(&self, engine: &mut dyn BrowserEngine, layer: &str) -> Result<()> {
        self.forward(engine, EngineSetting::LayerType(LayerType::from_prop(layer)))
    }

    pub fn set_hardware_acceleration_disabled(
        &self,
        engine: &mut dyn BrowserEngine,
        disabled: bool,
    ) -> Result<()> {
        if disabled {
            self.forward(engine, EngineSetting::LayerType(LayerType::Software))?;
        }
        Ok(())
    }

    /// One-shot private-browsing sweep. `false` does nothing.
    pub fn apply_incognito(&self, engine: &mut dyn BrowserEngine, enabled: bool) -> Result<()> {
        if !enabled {
            return Ok(());
        }
        debug!("incognito sweep");
        engine.remove_all_cookies()?;
        self.forward(engine, EngineSetting::CacheMode(CacheMode::NoCache))?;
        engine.clear_history()?;
        engine.clear_cache(true)?;
        engine.clear_form_data()?;
        self.forward(engine, EngineSetting::SavePassword(false))?;
        self.forward(engine, EngineSetting::SaveFormData(false))
    }
}
