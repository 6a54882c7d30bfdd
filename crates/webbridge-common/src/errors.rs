use std::path::PathBuf;

use crate::types::WidgetId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures reported by a browser engine backend.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine (or the platform it runs on) lacks the feature.
    #[error("unsupported engine feature: {0}")]
    Unsupported(&'static str),

    #[error("engine already destroyed")]
    Destroyed,

    #[error("engine backend error: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown property: {0}")]
    UnknownProperty(String),

    #[error("invalid value for property '{name}': expected {expected}")]
    InvalidProperty { name: String, expected: &'static str },

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("missing argument for command '{0}'")]
    MissingArgument(&'static str),

    #[error("malformed navigation target: {0}")]
    MalformedNavigationTarget(String),

    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no widget registered as {0}")]
    WidgetNotFound(WidgetId),

    #[error("widget {0} is already registered")]
    DuplicateWidget(WidgetId),
}

impl BridgeError {
    /// Whether the error is a silently tolerated capability gap.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Engine(EngineError::Unsupported(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("engine.api_level = 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: engine.api_level = 0"
        );
    }

    #[test]
    fn engine_error_display() {
        let err = EngineError::Unsupported("force dark");
        assert_eq!(err.to_string(), "unsupported engine feature: force dark");

        let err = EngineError::Destroyed;
        assert_eq!(err.to_string(), "engine already destroyed");
    }

    #[test]
    fn bridge_error_from_engine() {
        let bridge_err: BridgeError = EngineError::Backend("webview gone".into()).into();
        assert!(matches!(bridge_err, BridgeError::Engine(_)));
        assert!(bridge_err.to_string().contains("webview gone"));
        assert!(!bridge_err.is_unsupported());
    }

    #[test]
    fn bridge_error_unsupported_is_flagged() {
        let err: BridgeError = EngineError::Unsupported("protected media").into();
        assert!(err.is_unsupported());
    }

    #[test]
    fn bridge_error_from_config() {
        let err: BridgeError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, BridgeError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn bridge_error_other_variants() {
        let err = BridgeError::UnknownProperty("colour".into());
        assert_eq!(err.to_string(), "unknown property: colour");

        let err = BridgeError::InvalidProperty {
            name: "textZoom".into(),
            expected: "integer",
        };
        assert_eq!(
            err.to_string(),
            "invalid value for property 'textZoom': expected integer"
        );

        let err = BridgeError::MissingArgument("loadUrl");
        assert_eq!(err.to_string(), "missing argument for command 'loadUrl'");

        let err = BridgeError::WidgetNotFound(WidgetId(3));
        assert_eq!(err.to_string(), "no widget registered as widget-3");
    }
}
