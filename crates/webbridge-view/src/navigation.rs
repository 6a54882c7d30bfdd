//! Source resolution and imperative navigation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use webbridge_common::{BridgeError, Result};

use crate::engine::{
    BrowserEngine, EngineSetting, Headers, NavigationGate, BLANK_URL, HTML_ENCODING,
    HTML_MIME_TYPE,
};
use crate::settings::EngineSettingsAdapter;

const HTTP_METHOD_POST: &str = "POST";

/// What a widget should display.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Html {
        content: String,
        base_url: String,
    },
    Uri {
        url: String,
        method: Option<String>,
        headers: Headers,
        body: Option<String>,
    },
}

impl Source {
    pub fn uri(url: impl Into<String>) -> Self {
        Self::Uri {
            url: url.into(),
            method: None,
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn html(content: impl Into<String>) -> Self {
        Self::Html {
            content: content.into(),
            base_url: String::new(),
        }
    }

    /// Parse the `source` property. `null`, or an object with neither
    /// `html` nor `uri`, means no source.
    pub fn from_value(value: &serde_json::Value) -> Result<Option<Self>> {
        let invalid = || BridgeError::InvalidProperty {
            name: "source".into(),
            expected: "object with `html` or `uri`",
        };
        let map = match value {
            serde_json::Value::Null => return Ok(None),
            serde_json::Value::Object(map) => map,
            _ => return Err(invalid()),
        };
        let string = |key: &str| -> Result<Option<String>> {
            match map.get(key) {
                None | Some(serde_json::Value::Null) => Ok(None),
                Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
                Some(_) => Err(invalid()),
            }
        };

        if let Some(content) = string("html")? {
            return Ok(Some(Self::Html {
                content,
                base_url: string("baseUrl")?.unwrap_or_default(),
            }));
        }
        let Some(url) = string("uri")? else {
            return Ok(None);
        };
        let mut headers = Headers::new();
        if let Some(raw) = map.get("headers").filter(|h| !h.is_null()) {
            let obj = raw.as_object().ok_or_else(invalid)?;
            for (key, value) in obj {
                let value = value.as_str().ok_or_else(invalid)?;
                headers.insert(key.clone(), value.to_string());
            }
        }
        Ok(Some(Self::Uri {
            url,
            method: string("method")?,
            headers,
            body: string("body")?,
        }))
    }
}

/// Credentials answered to the engine's HTTP auth challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuthCredential {
    pub username: String,
    pub password: String,
}

impl BasicAuthCredential {
    /// Both `username` and `password` must be present; anything else
    /// clears the override.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// What `load_source` / `load_url` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Same URL as the current page, or a re-render after a command.
    Skipped,
    Html,
    Get,
    Post,
    Blank,
    /// Target was malformed; logged and dropped.
    Abandoned,
}

/// Encode a POST body. Rust strings are always valid UTF-8, so the
/// platform-default fallback never has to kick in.
fn encode_body(body: Option<&str>) -> Vec<u8> {
    body.map(|b| b.as_bytes().to_vec()).unwrap_or_default()
}

fn is_valid_target(url: &str) -> bool {
    url::Url::parse(url).is_ok()
}

pub struct NavigationController {
    gate: Arc<NavigationGate>,
    last_source: Option<Source>,
    /// Set by imperative navigation; a re-render re-applying the same
    /// source must not undo it.
    command_navigated: bool,
}

impl NavigationController {
    pub fn new(gate: Arc<NavigationGate>) -> Self {
        Self {
            gate,
            last_source: None,
            command_navigated: false,
        }
    }

    pub fn set_basic_auth_credential(&self, credential: Option<BasicAuthCredential>) {
        self.gate.set_credential(credential);
    }

    pub fn basic_auth_credential(&self) -> Option<BasicAuthCredential> {
        self.gate.credential()
    }

    pub fn set_url_prefixes_for_default_intent(&self, prefixes: Vec<String>) {
        self.gate.set_prefixes(prefixes);
    }

    pub fn load_source(
        &mut self,
        engine: &mut dyn BrowserEngine,
        settings: &EngineSettingsAdapter,
        source: Option<Source>,
    ) -> Result<NavigationOutcome> {
        if self.command_navigated && source.is_some() && source == self.last_source {
            debug!("source unchanged since last command navigation, skipped");
            return Ok(NavigationOutcome::Skipped);
        }
        self.command_navigated = false;
        self.last_source = source.clone();

        match source {
            Some(Source::Html { content, base_url }) => {
                engine.load_data_with_base_url(&base_url, &content, HTML_MIME_TYPE, HTML_ENCODING)?;
                Ok(NavigationOutcome::Html)
            }
            Some(Source::Uri {
                url,
                method,
                headers,
                body,
            }) => {
                // URL-only comparison: method, headers and body are ignored
                if engine.url().as_deref() == Some(url.as_str()) {
                    debug!(url = %url, "source already loaded, skipped");
                    return Ok(NavigationOutcome::Skipped);
                }
                if !is_valid_target(&url) {
                    warn!(url = %url, "malformed navigation target, load abandoned");
                    return Ok(NavigationOutcome::Abandoned);
                }
                if method.is_some_and(|m| m.eq_ignore_ascii_case(HTTP_METHOD_POST)) {
                    engine.post_url(&url, &encode_body(body.as_deref()))?;
                    return Ok(NavigationOutcome::Post);
                }
                let mut request_headers = Headers::new();
                for (key, value) in headers {
                    if key.eq_ignore_ascii_case("user-agent") {
                        settings.forward(engine, EngineSetting::UserAgent(Some(value)))?;
                    } else {
                        request_headers.insert(key, value);
                    }
                }
                engine.load_url(&url, &request_headers)?;
                Ok(NavigationOutcome::Get)
            }
            None => {
                engine.load_url(BLANK_URL, &Headers::new())?;
                Ok(NavigationOutcome::Blank)
            }
        }
    }

    /// The `loadUrl` command.
    pub fn load_url(
        &mut self,
        engine: &mut dyn BrowserEngine,
        url: &str,
        headers: &Headers,
    ) -> Result<NavigationOutcome> {
        if !is_valid_target(url) {
            warn!(url = %url, "malformed navigation target, load abandoned");
            return Ok(NavigationOutcome::Abandoned);
        }
        self.command_navigated = true;
        engine.load_url(url, headers)?;
        Ok(NavigationOutcome::Get)
    }

    pub fn go_back(&mut self, engine: &mut dyn BrowserEngine) -> Result<()> {
        self.command_navigated = true;
        Ok(engine.go_back()?)
    }

    pub fn go_forward(&mut self, engine: &mut dyn BrowserEngine) -> Result<()> {
        self.command_navigated = true;
        Ok(engine.go_forward()?)
    }

    pub fn reload(&mut self, engine: &mut dyn BrowserEngine) -> Result<()> {
        Ok(engine.reload()?)
    }

    /// Best effort; the engine may already have committed.
    pub fn stop_loading(&mut self, engine: &mut dyn BrowserEngine) -> Result<()> {
        Ok(engine.stop_loading()?)
    }
}
