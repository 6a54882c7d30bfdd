//! Property name → (validator, apply function), built once.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde_json::Value;
use tracing::warn;
use webbridge_common::Result;

use crate::navigation::{BasicAuthCredential, Source};

use super::WebWidget;

/// Accepted value shape of a property. `null` is always accepted and means
/// "reset to default".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Bool,
    Text,
    Number,
    StringList,
    /// Structured value validated by the apply function itself.
    Object,
}

impl PropKind {
    pub fn accepts(self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            Self::Bool => value.is_boolean(),
            Self::Text => value.is_string(),
            Self::Number => value.as_f64().is_some_and(|n| n >= 0.0),
            Self::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Self::Object => value.is_object(),
        }
    }

    pub fn expected(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Text => "string",
            Self::Number => "non-negative number",
            Self::StringList => "array of strings",
            Self::Object => "object",
        }
    }
}

type Apply = fn(&mut WebWidget, &Value) -> Result<()>;

pub(super) struct PropertySpec {
    pub kind: PropKind,
    pub apply: Apply,
}

fn flag(value: &Value, default: bool) -> bool {
    value.as_bool().unwrap_or(default)
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn number(value: &Value, default: u32) -> u32 {
    value
        .as_f64()
        .map(|n| n.round().min(f64::from(u32::MAX)) as u32)
        .unwrap_or(default)
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn prop(name: &'static str, kind: PropKind, apply: Apply) -> (&'static str, PropertySpec) {
    (name, PropertySpec { kind, apply })
}

static PROPERTIES: LazyLock<HashMap<&'static str, PropertySpec>> = LazyLock::new(|| {
    use PropKind::{Bool, Number, Object, StringList, Text};

    HashMap::from([
        prop("javaScriptEnabled", Bool, |w, v| {
            w.settings.set_javascript_enabled(w.engine.as_mut(), flag(v, true))
        }),
        prop("domStorageEnabled", Bool, |w, v| {
            w.settings.set_dom_storage_enabled(w.engine.as_mut(), flag(v, true))
        }),
        prop("cacheEnabled", Bool, |w, v| {
            w.settings.set_cache_enabled(w.engine.as_mut(), flag(v, true))
        }),
        prop("cacheMode", Text, |w, v| {
            w.settings
                .set_cache_mode(w.engine.as_mut(), v.as_str().unwrap_or_default())
        }),
        prop("userAgent", Text, |w, v| {
            w.settings.set_user_agent(w.engine.as_mut(), text(v))
        }),
        prop("applicationNameForUserAgent", Text, |w, v| {
            w.settings
                .set_application_name_for_user_agent(w.engine.as_mut(), text(v))
        }),
        prop("mediaPlaybackRequiresUserAction", Bool, |w, v| {
            w.settings
                .set_media_playback_requires_user_action(w.engine.as_mut(), flag(v, true))
        }),
        prop("javaScriptCanOpenWindowsAutomatically", Bool, |w, v| {
            w.settings
                .set_javascript_can_open_windows_automatically(w.engine.as_mut(), flag(v, false))
        }),
        prop("allowFileAccess", Bool, |w, v| {
            w.settings.set_allow_file_access(w.engine.as_mut(), flag(v, false))
        }),
        prop("allowFileAccessFromFileURLs", Bool, |w, v| {
            w.settings
                .set_allow_file_access_from_file_urls(w.engine.as_mut(), flag(v, false))
        }),
        prop("allowUniversalAccessFromFileURLs", Bool, |w, v| {
            w.settings
                .set_allow_universal_access_from_file_urls(w.engine.as_mut(), flag(v, false))
        }),
        prop("saveFormDataDisabled", Bool, |w, v| {
            w.settings
                .set_save_form_data_disabled(w.engine.as_mut(), flag(v, false))
        }),
        prop("injectedJavaScript", Text, |w, v| {
            w.scripts.scripts_mut().after_load = text(v);
            Ok(())
        }),
        prop("injectedJavaScriptBeforeContentLoaded", Text, |w, v| {
            w.scripts.scripts_mut().before_content_loaded = text(v);
            Ok(())
        }),
        prop("injectedJavaScriptForMainFrameOnly", Bool, |w, v| {
            w.scripts.scripts_mut().after_load_main_frame_only = flag(v, true);
            Ok(())
        }),
        prop("injectedJavaScriptBeforeContentLoadedForMainFrameOnly", Bool, |w, v| {
            w.scripts.scripts_mut().before_content_loaded_main_frame_only = flag(v, true);
            Ok(())
        }),
        prop("messagingEnabled", Bool, |w, v| {
            w.scripts
                .set_messaging_enabled(w.engine.as_mut(), flag(v, false))
        }),
        prop("messagingModuleName", Text, |w, v| {
            w.scripts.set_messaging_module_name(text(v));
            Ok(())
        }),
        prop("incognito", Bool, |w, v| {
            w.settings.apply_incognito(w.engine.as_mut(), flag(v, false))
        }),
        prop("source", Object, |w, v| {
            let source = Source::from_value(v)?;
            w.navigation
                .load_source(w.engine.as_mut(), &w.settings, source)
                .map(|_| ())
        }),
        prop("basicAuthCredential", Object, |w, v| {
            w.navigation
                .set_basic_auth_credential(BasicAuthCredential::from_value(v));
            Ok(())
        }),
        prop("mixedContentMode", Text, |w, v| {
            w.settings
                .set_mixed_content_mode(w.engine.as_mut(), v.as_str().unwrap_or("never"))
        }),
        prop("urlPrefixesForDefaultIntent", StringList, |w, v| {
            w.navigation.set_url_prefixes_for_default_intent(strings(v));
            Ok(())
        }),
        prop("allowsFullscreenVideo", Bool, |w, v| {
            let allowed = flag(v, false);
            match w.window.lock() {
                Ok(mut window) => {
                    w.fullscreen
                        .set_allowed(&mut *window, w.engine.as_mut(), allowed)
                }
                Err(_) => warn!(widget_id = %w.id, "window lock poisoned"),
            }
            Ok(())
        }),
        prop("allowsProtectedMedia", Bool, |w, v| {
            w.settings
                .set_allows_protected_media(w.engine.as_mut(), flag(v, false))
        }),
        prop("geolocationEnabled", Bool, |w, v| {
            w.settings
                .set_geolocation_enabled(w.engine.as_mut(), flag(v, false))
        }),
        prop("forceDarkOn", Bool, |w, v| {
            w.settings.set_force_dark_on(w.engine.as_mut(), flag(v, false))
        }),
        prop("minimumFontSize", Number, |w, v| {
            w.settings
                .set_minimum_font_size(w.engine.as_mut(), number(v, 8))
        }),
        prop("textZoom", Number, |w, v| {
            w.settings.set_text_zoom(w.engine.as_mut(), number(v, 100))
        }),
        prop("nestedScrollEnabled", Bool, |w, v| {
            w.settings
                .set_nested_scroll_enabled(w.engine.as_mut(), flag(v, false))
        }),
        prop("thirdPartyCookiesEnabled", Bool, |w, v| {
            w.settings
                .set_third_party_cookies_enabled(w.engine.as_mut(), flag(v, true))
        }),
        prop("showsHorizontalScrollIndicator", Bool, |w, v| {
            w.settings
                .set_shows_horizontal_scroll_indicator(w.engine.as_mut(), flag(v, true))
        }),
        prop("showsVerticalScrollIndicator", Bool, |w, v| {
            w.settings
                .set_shows_vertical_scroll_indicator(w.engine.as_mut(), flag(v, true))
        }),
        prop("overScrollMode", Text, |w, v| {
            w.settings
                .set_over_scroll_mode(w.engine.as_mut(), v.as_str().unwrap_or("always"))
        }),
        prop("scalesPageToFit", Bool, |w, v| {
            w.settings
                .set_scales_page_to_fit(w.engine.as_mut(), flag(v, true))
        }),
        prop("setBuiltInZoomControls", Bool, |w, v| {
            w.settings
                .set_builtin_zoom_controls(w.engine.as_mut(), flag(v, true))
        }),
        prop("setDisplayZoomControls", Bool, |w, v| {
            w.settings
                .set_display_zoom_controls(w.engine.as_mut(), flag(v, false))
        }),
        prop("setSupportMultipleWindows", Bool, |w, v| {
            w.settings
                .set_support_multiple_windows(w.engine.as_mut(), flag(v, true))
        }),
        prop("androidLayerType", Text, |w, v| {
            w.settings
                .set_layer_type(w.engine.as_mut(), v.as_str().unwrap_or("none"))
        }),
        prop("androidHardwareAccelerationDisabled", Bool, |w, v| {
            w.settings
                .set_hardware_acceleration_disabled(w.engine.as_mut(), flag(v, false))
        }),
        prop("onContentSizeChange", Bool, |w, v| {
            w.emitter.set_content_size_enabled(flag(v, false));
            Ok(())
        }),
        prop("onScroll", Bool, |w, v| {
            w.emitter.set_scroll_enabled(flag(v, false));
            Ok(())
        }),
        prop("downloadingMessage", Text, |w, v| {
            w.downloads.set_downloading(text(v));
            Ok(())
        }),
        prop("lackPermissionToDownloadMessage", Text, |w, v| {
            w.downloads.set_lack_permission(text(v));
            Ok(())
        }),
    ])
});

pub(super) fn lookup(name: &str) -> Option<&'static PropertySpec> {
    PROPERTIES.get(name)
}

/// Every property a widget understands, sorted.
pub fn property_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = PROPERTIES.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn kinds_validate_shapes() {
        assert!(PropKind::Bool.accepts(&json!(true)));
        assert!(PropKind::Bool.accepts(&Value::Null));
        assert!(!PropKind::Bool.accepts(&json!("yes")));
        assert!(PropKind::Number.accepts(&json!(120)));
        assert!(!PropKind::Number.accepts(&json!(-1)));
        assert!(PropKind::StringList.accepts(&json!(["tel:", "mailto:"])));
        assert!(!PropKind::StringList.accepts(&json!(["tel:", 3])));
        assert!(!PropKind::Object.accepts(&json!("https://example.com")));
    }

    #[test]
    fn table_covers_the_declared_surface() {
        let names = property_names();
        for expected in [
            "source",
            "javaScriptEnabled",
            "messagingEnabled",
            "injectedJavaScriptBeforeContentLoadedForMainFrameOnly",
            "urlPrefixesForDefaultIntent",
            "allowsFullscreenVideo",
            "incognito",
            "lackPermissionToDownloadMessage",
        ] {
            assert!(names.contains(&expected), "{expected} missing");
        }
        assert!(lookup("notAProperty").is_none());
    }

    #[test]
    fn number_rounds_and_defaults() {
        assert_eq!(number(&json!(12.6), 8), 13);
        assert_eq!(number(&Value::Null, 8), 8);
    }
}
