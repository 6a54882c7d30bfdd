//! Imperative commands sent by the host.

use serde_json::Value;
use webbridge_common::{BridgeError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GoBack,
    GoForward,
    Reload,
    StopLoading,
    PostMessage(String),
    InjectJavaScript(String),
    LoadUrl(String),
    RequestFocus,
    ClearFormData,
    ClearCache { include_disk_files: bool },
    ClearHistory,
}

/// Name and numeric id of every command, as exported to the host.
const COMMANDS: &[(&str, u32)] = &[
    ("goBack", 1),
    ("goForward", 2),
    ("reload", 3),
    ("stopLoading", 4),
    ("postMessage", 5),
    ("injectJavaScript", 6),
    ("loadUrl", 7),
    ("requestFocus", 8),
    ("clearFormData", 1000),
    ("clearCache", 1001),
    ("clearHistory", 1002),
];

pub fn commands_map() -> Vec<(&'static str, u32)> {
    COMMANDS.to_vec()
}

fn string_arg(args: &[Value], name: &'static str) -> Result<String> {
    match args.first() {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(BridgeError::MissingArgument(name)),
        Some(other) => Ok(other.to_string()),
    }
}

impl Command {
    /// Parse a command sent by name (`"goBack"`) or by numeric id (`"1"`).
    pub fn parse(command: &str, args: &[Value]) -> Result<Self> {
        let name = match command.parse::<u32>() {
            Ok(id) => COMMANDS
                .iter()
                .find(|(_, cid)| *cid == id)
                .map(|(name, _)| *name)
                .ok_or_else(|| BridgeError::UnknownCommand(command.to_string()))?,
            Err(_) => command,
        };

        Ok(match name {
            "goBack" => Self::GoBack,
            "goForward" => Self::GoForward,
            "reload" => Self::Reload,
            "stopLoading" => Self::StopLoading,
            "postMessage" => Self::PostMessage(string_arg(args, "data")?),
            "injectJavaScript" => Self::InjectJavaScript(string_arg(args, "script")?),
            "loadUrl" => Self::LoadUrl(string_arg(args, "url")?),
            "requestFocus" => Self::RequestFocus,
            "clearFormData" => Self::ClearFormData,
            "clearCache" => Self::ClearCache {
                include_disk_files: args.first().and_then(Value::as_bool).unwrap_or(false),
            },
            "clearHistory" => Self::ClearHistory,
            other => return Err(BridgeError::UnknownCommand(other.to_string())),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GoBack => "goBack",
            Self::GoForward => "goForward",
            Self::Reload => "reload",
            Self::StopLoading => "stopLoading",
            Self::PostMessage(_) => "postMessage",
            Self::InjectJavaScript(_) => "injectJavaScript",
            Self::LoadUrl(_) => "loadUrl",
            Self::RequestFocus => "requestFocus",
            Self::ClearFormData => "clearFormData",
            Self::ClearCache { .. } => "clearCache",
            Self::ClearHistory => "clearHistory",
        }
    }

    pub fn id(&self) -> u32 {
        let name = self.name();
        COMMANDS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, id)| *id)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_by_name_and_id() {
        assert_eq!(Command::parse("goBack", &[]).unwrap(), Command::GoBack);
        assert_eq!(Command::parse("1002", &[]).unwrap(), Command::ClearHistory);
        assert_eq!(
            Command::parse("7", &[json!("https://example.com")]).unwrap(),
            Command::LoadUrl("https://example.com".into())
        );
    }

    #[test]
    fn ids_match_exported_map() {
        for (name, id) in commands_map() {
            let args = [json!("x")];
            let cmd = Command::parse(name, &args).unwrap();
            assert_eq!(cmd.id(), id);
            assert_eq!(cmd.name(), name);
        }
    }

    #[test]
    fn missing_argument_is_reported() {
        assert!(matches!(
            Command::parse("postMessage", &[]),
            Err(BridgeError::MissingArgument("data"))
        ));
        assert!(matches!(
            Command::parse("loadUrl", &[Value::Null]),
            Err(BridgeError::MissingArgument("url"))
        ));
    }

    #[test]
    fn clear_cache_flag() {
        assert_eq!(
            Command::parse("clearCache", &[json!(true)]).unwrap(),
            Command::ClearCache {
                include_disk_files: true
            }
        );
        assert_eq!(
            Command::parse("clearCache", &[]).unwrap(),
            Command::ClearCache {
                include_disk_files: false
            }
        );
    }

    #[test]
    fn unknown_commands() {
        assert!(matches!(
            Command::parse("explode", &[]),
            Err(BridgeError::UnknownCommand(_))
        ));
        assert!(matches!(
            Command::parse("99", &[]),
            Err(BridgeError::UnknownCommand(_))
        ));
    }
}
