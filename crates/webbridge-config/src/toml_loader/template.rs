//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# webbridge configuration
# schema_version = 1
# Only override what you want to change -- missing fields use defaults.

[engine]
# kind = "system"              # system | headless
# devtools = false
# transparent = false
# api_level = 33               # 1-40, headless engine only; < 19 disables direct script evaluation
# force_dark_supported = true
# protected_media_supported = true

[host]
# direct_bridge = false        # deliver page messages by direct module call
# lifecycle_capacity = 16      # 1-1024

[window]
# title = "webbridge"
# width = 1024                 # 200-8192
# height = 768                 # 200-8192

[logging]
# level = "info"               # trace | debug | info | warn | error

# Widget property defaults, applied to every new widget.
[defaults]
# javaScriptEnabled = true
# domStorageEnabled = true
# mixedContentMode = "never"
# urlPrefixesForDefaultIntent = ["tel:", "mailto:"]

# Values for one engine only, applied over the shared ones.
# [defaults.headless]
# textZoom = 100
"##
    .to_string()
}
