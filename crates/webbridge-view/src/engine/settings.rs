use super::Capability;

/// Native HTTP cache policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    #[default]
    Default,
    CacheElseNetwork,
    NoCache,
    CacheOnly,
}

impl CacheMode {
    /// Map a property string onto the native constant. Unrecognized values
    /// select the default mode.
    pub fn from_prop(value: &str) -> Self {
        match value {
            "LOAD_CACHE_ONLY" => Self::CacheOnly,
            "LOAD_CACHE_ELSE_NETWORK" => Self::CacheElseNetwork,
            "LOAD_NO_CACHE" => Self::NoCache,
            _ => Self::Default,
        }
    }
}

/// Whether a secure page may load insecure sub-resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MixedContentMode {
    #[default]
    NeverAllow,
    AlwaysAllow,
    Compatibility,
}

impl MixedContentMode {
    /// `"never"`, `"always"`, `"compatibility"`; anything else falls back to
    /// never.
    pub fn from_prop(value: &str) -> Self {
        match value {
            "always" => Self::AlwaysAllow,
            "compatibility" => Self::Compatibility,
            _ => Self::NeverAllow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForceDark {
    #[default]
    Off,
    On,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForceDarkStrategy {
    UserAgentDarkeningOnly,
    WebThemeDarkeningOnly,
    #[default]
    PreferWebThemeOverUserAgentDarkening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverScrollMode {
    #[default]
    Always,
    IfContentScrolls,
    Never,
}

impl OverScrollMode {
    pub fn from_prop(value: &str) -> Self {
        match value {
            "never" => Self::Never,
            "content" => Self::IfContentScrolls,
            _ => Self::Always,
        }
    }
}

/// Compositing layer backing the engine view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerType {
    #[default]
    None,
    Software,
    Hardware,
}

impl LayerType {
    pub fn from_prop(value: &str) -> Self {
        match value {
            "hardware" => Self::Hardware,
            "software" => Self::Software,
            _ => Self::None,
        }
    }
}

/// One forward to the engine's native settings object (or its view).
#[derive(Debug, Clone, PartialEq)]
pub enum EngineSetting {
    JavaScriptEnabled(bool),
    DomStorageEnabled(bool),
    CacheMode(CacheMode),
    /// `None` restores the engine's built-in user agent.
    UserAgent(Option<String>),
    MixedContentMode(MixedContentMode),
    ForceDark(ForceDark),
    ForceDarkStrategy(ForceDarkStrategy),
    AllowFileAccess(bool),
    AllowFileAccessFromFileUrls(bool),
    AllowUniversalAccessFromFileUrls(bool),
    GeolocationEnabled(bool),
    MediaPlaybackRequiresUserGesture(bool),
    JavaScriptCanOpenWindowsAutomatically(bool),
    SaveFormData(bool),
    SavePassword(bool),
    MinimumFontSize(u32),
    TextZoom(u32),
    ThirdPartyCookies(bool),
    BuiltInZoomControls(bool),
    DisplayZoomControls(bool),
    SupportMultipleWindows(bool),
    LoadWithOverviewMode(bool),
    UseWideViewPort(bool),
    ProtectedMedia(bool),
    NestedScrollEnabled(bool),
    HorizontalScrollIndicator(bool),
    VerticalScrollIndicator(bool),
    OverScrollMode(OverScrollMode),
    LayerType(LayerType),
}

impl EngineSetting {
    /// The capability an engine must report before this setting may be
    /// forwarded.
    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            Self::ForceDark(_) => Some(Capability::ForceDark),
            Self::ForceDarkStrategy(_) => Some(Capability::ForceDarkStrategy),
            Self::ProtectedMedia(_) => Some(Capability::ProtectedMedia),
            Self::MixedContentMode(_) => Some(Capability::MixedContent),
            Self::ThirdPartyCookies(_) => Some(Capability::ThirdPartyCookies),
            _ => None,
        }
    }

    /// Short name used in log fields and engine operation logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JavaScriptEnabled(_) => "javaScriptEnabled",
            Self::DomStorageEnabled(_) => "domStorageEnabled",
            Self::CacheMode(_) => "cacheMode",
            Self::UserAgent(_) => "userAgent",
            Self::MixedContentMode(_) => "mixedContentMode",
            Self::ForceDark(_) => "forceDark",
            Self::ForceDarkStrategy(_) => "forceDarkStrategy",
            Self::AllowFileAccess(_) => "allowFileAccess",
            Self::AllowFileAccessFromFileUrls(_) => "allowFileAccessFromFileURLs",
            Self::AllowUniversalAccessFromFileUrls(_) => "allowUniversalAccessFromFileURLs",
            Self::GeolocationEnabled(_) => "geolocationEnabled",
            Self::MediaPlaybackRequiresUserGesture(_) => "mediaPlaybackRequiresUserGesture",
            Self::JavaScriptCanOpenWindowsAutomatically(_) => {
                "javaScriptCanOpenWindowsAutomatically"
            }
            Self::SaveFormData(_) => "saveFormData",
            Self::SavePassword(_) => "savePassword",
            Self::MinimumFontSize(_) => "minimumFontSize",
            Self::TextZoom(_) => "textZoom",
            Self::ThirdPartyCookies(_) => "thirdPartyCookies",
            Self::BuiltInZoomControls(_) => "builtInZoomControls",
            Self::DisplayZoomControls(_) => "displayZoomControls",
            Self::SupportMultipleWindows(_) => "supportMultipleWindows",
            Self::LoadWithOverviewMode(_) => "loadWithOverviewMode",
            Self::UseWideViewPort(_) => "useWideViewPort",
            Self::ProtectedMedia(_) => "protectedMedia",
            Self::NestedScrollEnabled(_) => "nestedScrollEnabled",
            Self::HorizontalScrollIndicator(_) => "horizontalScrollIndicator",
            Self::VerticalScrollIndicator(_) => "verticalScrollIndicator",
            Self::OverScrollMode(_) => "overScrollMode",
            Self::LayerType(_) => "layerType",
        }
    }
}

/// Snapshot of an engine's native settings. Both engines keep one of these
/// as the source of truth for what has been forwarded.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeSettings {
    pub javascript_enabled: bool,
    pub dom_storage_enabled: bool,
    pub cache_mode: CacheMode,
    pub user_agent: Option<String>,
    pub mixed_content_mode: MixedContentMode,
    pub force_dark: ForceDark,
    pub force_dark_strategy: ForceDarkStrategy,
    pub allow_file_access: bool,
    pub allow_file_access_from_file_urls: bool,
    pub allow_universal_access_from_file_urls: bool,
    pub geolocation_enabled: bool,
    pub media_playback_requires_user_gesture: bool,
    pub javascript_can_open_windows_automatically: bool,
    pub save_form_data: bool,
    pub save_password: bool,
    pub minimum_font_size: u32,
    pub text_zoom: u32,
    pub third_party_cookies: bool,
    pub builtin_zoom_controls: bool,
    pub display_zoom_controls: bool,
    pub support_multiple_windows: bool,
    pub load_with_overview_mode: bool,
    pub use_wide_view_port: bool,
    pub protected_media: bool,
    pub nested_scroll_enabled: bool,
    pub horizontal_scroll_indicator: bool,
    pub vertical_scroll_indicator: bool,
    pub over_scroll_mode: OverScrollMode,
    pub layer_type: LayerType,
}

impl Default for NativeSettings {
    fn default() -> Self {
        Self {
            javascript_enabled: true,
            dom_storage_enabled: false,
            cache_mode: CacheMode::Default,
            user_agent: None,
            mixed_content_mode: MixedContentMode::NeverAllow,
            force_dark: ForceDark::Off,
            force_dark_strategy: ForceDarkStrategy::default(),
            allow_file_access: false,
            allow_file_access_from_file_urls: false,
            allow_universal_access_from_file_urls: false,
            geolocation_enabled: false,
            media_playback_requires_user_gesture: true,
            javascript_can_open_windows_automatically: false,
            save_form_data: true,
            save_password: true,
            minimum_font_size: 8,
            text_zoom: 100,
            third_party_cookies: false,
            builtin_zoom_controls: true,
            display_zoom_controls: false,
            support_multiple_windows: true,
            load_with_overview_mode: true,
            use_wide_view_port: true,
            protected_media: false,
            nested_scroll_enabled: false,
            horizontal_scroll_indicator: true,
            vertical_scroll_indicator: true,
            over_scroll_mode: OverScrollMode::Always,
            layer_type: LayerType::None,
        }
    }
}

impl NativeSettings {
    pub fn apply(&mut self, setting: EngineSetting) {
        match setting {
            EngineSetting::JavaScriptEnabled(v) => self.javascript_enabled = v,
            EngineSetting::DomStorageEnabled(v) => self.dom_storage_enabled = v,
            EngineSetting::CacheMode(v) => self.cache_mode = v,
            EngineSetting::UserAgent(v) => self.user_agent = v,
            EngineSetting::MixedContentMode(v) => self.mixed_content_mode = v,
            EngineSetting::ForceDark(v) => self.force_dark = v,
            EngineSetting::ForceDarkStrategy(v) => self.force_dark_strategy = v,
            EngineSetting::AllowFileAccess(v) => self.allow_file_access = v,
            EngineSetting::AllowFileAccessFromFileUrls(v) => {
                self.allow_file_access_from_file_urls = v
            }
            EngineSetting::AllowUniversalAccessFromFileUrls(v) => {
                self.allow_universal_access_from_file_urls = v
            }
            EngineSetting::GeolocationEnabled(v) => self.geolocation_enabled = v,
            EngineSetting::MediaPlaybackRequiresUserGesture(v) => {
                self.media_playback_requires_user_gesture = v
            }
            EngineSetting::JavaScriptCanOpenWindowsAutomatically(v) => {
                self.javascript_can_open_windows_automatically = v
            }
            EngineSetting::SaveFormData(v) => self.save_form_data = v,
            EngineSetting::SavePassword(v) => self.save_password = v,
            EngineSetting::MinimumFontSize(v) => self.minimum_font_size = v,
            EngineSetting::TextZoom(v) => self.text_zoom = v,
            EngineSetting::ThirdPartyCookies(v) => self.third_party_cookies = v,
            EngineSetting::BuiltInZoomControls(v) => self.builtin_zoom_controls = v,
            EngineSetting::DisplayZoomControls(v) => self.display_zoom_controls = v,
            EngineSetting::SupportMultipleWindows(v) => self.support_multiple_windows = v,
            EngineSetting::LoadWithOverviewMode(v) => self.load_with_overview_mode = v,
            EngineSetting::UseWideViewPort(v) => self.use_wide_view_port = v,
            EngineSetting::ProtectedMedia(v) => self.protected_media = v,
            EngineSetting::NestedScrollEnabled(v) => self.nested_scroll_enabled = v,
            EngineSetting::HorizontalScrollIndicator(v) => self.horizontal_scroll_indicator = v,
            EngineSetting::VerticalScrollIndicator(v) => self.vertical_scroll_indicator = v,
            EngineSetting::OverScrollMode(v) => self.over_scroll_mode = v,
            EngineSetting::LayerType(v) => self.layer_type = v,
        }
    }
}
