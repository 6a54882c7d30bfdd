use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// webbridge: an embeddable web widget driven by properties, commands and events.
#[derive(Parser, Debug)]
#[command(name = "webbridge", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error) or a full
    /// filter directive such as `webbridge_view=debug`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Mode>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Open a window hosting one widget on the platform web view.
    Open {
        /// Page to load.
        #[arg(long, conflicts_with = "html")]
        url: Option<String>,

        /// Inline markup to load instead of a URL.
        #[arg(long)]
        html: Option<String>,
    },
    /// Drive a headless widget through a JSON session and print every host
    /// message as one JSON line.
    Replay {
        /// Session file (`-` for stdin).
        session: PathBuf,
    },
}

impl Args {
    /// The subcommand, defaulting to an empty `open`.
    pub fn mode(&self) -> Mode {
        self.command.clone().unwrap_or(Mode::Open {
            url: None,
            html: None,
        })
    }
}

/// Turn a bare level (`debug`) into a directive for this workspace's
/// crates; anything else is passed through as-is.
pub fn log_directive(level: &str) -> String {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => format!("webbridge={level}"),
        other => other.to_string(),
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_open() {
        let args = Args::parse_from(["webbridge"]);
        assert_eq!(
            args.mode(),
            Mode::Open {
                url: None,
                html: None
            }
        );
        assert!(args.config.is_none());
    }

    #[test]
    fn replay_takes_a_session_path() {
        let args = Args::parse_from(["webbridge", "--log-level", "debug", "replay", "s.json"]);
        assert_eq!(
            args.mode(),
            Mode::Replay {
                session: PathBuf::from("s.json")
            }
        );
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn url_and_html_conflict() {
        let result = Args::try_parse_from([
            "webbridge",
            "open",
            "--url",
            "https://example.com",
            "--html",
            "<p>hi</p>",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn bare_levels_are_scoped() {
        assert_eq!(log_directive("warn"), "webbridge=warn");
        assert_eq!(log_directive("webbridge_view=trace"), "webbridge_view=trace");
    }
}
