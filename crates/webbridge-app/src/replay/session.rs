//! Replay session format.
//!
//! ```json
//! {
//!   "layered": false,
//!   "navigation": "deferred",
//!   "steps": [
//!     { "op": "set", "name": "messagingEnabled", "value": true },
//!     { "op": "set", "name": "source", "value": { "uri": "https://example.com/" } },
//!     { "op": "message", "data": "hello" },
//!     { "op": "command", "name": "goBack" },
//!     { "op": "lifecycle", "event": "destroy" }
//!   ]
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;
use webbridge_common::HostLifecycleEvent;
use webbridge_view::host::NavigationDecision;
use webbridge_view::ipc::BRIDGE_INTERFACE;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Host tag of the replayed widget.
    pub widget: u32,
    /// Place the widget inside a layered container (a modal).
    pub layered: bool,
    /// Host answer to every navigation interception.
    pub navigation: NavigationDecision,
    pub steps: Vec<Step>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            widget: 1,
            layered: false,
            navigation: NavigationDecision::Deferred,
            steps: Vec::new(),
        }
    }
}

fn bridge_interface() -> String {
    BRIDGE_INTERFACE.to_string()
}

fn main_frame() -> bool {
    true
}

/// One scripted action. Host-side steps go through the widget's property
/// and command surface; page-side steps are simulated engine callbacks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    Set {
        name: String,
        #[serde(default)]
        value: Value,
    },
    Command {
        name: String,
        #[serde(default)]
        args: Vec<Value>,
    },
    Lifecycle {
        event: HostLifecycleEvent,
    },
    Message {
        #[serde(default = "bridge_interface")]
        interface: String,
        data: String,
    },
    BeginLoad {
        url: String,
    },
    Progress {
        value: u8,
    },
    FinishLoad,
    #[serde(rename_all = "camelCase")]
    FailLoad {
        url: String,
        code: i32,
        #[serde(default)]
        description: String,
    },
    #[serde(rename_all = "camelCase")]
    HttpError {
        url: String,
        status_code: u16,
        #[serde(default)]
        description: String,
        #[serde(default = "main_frame")]
        main_frame: bool,
    },
    #[serde(rename_all = "camelCase")]
    Crash {
        #[serde(default)]
        did_crash: bool,
    },
    #[serde(rename_all = "camelCase")]
    Scroll {
        x: i32,
        y: i32,
        #[serde(default)]
        content_width: i32,
        #[serde(default)]
        content_height: i32,
        #[serde(default)]
        layout_width: i32,
        #[serde(default)]
        layout_height: i32,
    },
    ContentSize {
        width: i32,
        height: i32,
    },
    ShowCustomView {
        view: u64,
    },
    HideCustomView,
    #[serde(rename_all = "camelCase")]
    Download {
        url: String,
        #[serde(default)]
        content_disposition: String,
        #[serde(default)]
        mime_type: String,
    },
    ClickLink {
        url: String,
    },
    Cookie {
        url: String,
        cookie: String,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Set { .. } => "set",
            Self::Command { .. } => "command",
            Self::Lifecycle { .. } => "lifecycle",
            Self::Message { .. } => "message",
            Self::BeginLoad { .. } => "beginLoad",
            Self::Progress { .. } => "progress",
            Self::FinishLoad => "finishLoad",
            Self::FailLoad { .. } => "failLoad",
            Self::HttpError { .. } => "httpError",
            Self::Crash { .. } => "crash",
            Self::Scroll { .. } => "scroll",
            Self::ContentSize { .. } => "contentSize",
            Self::ShowCustomView { .. } => "showCustomView",
            Self::HideCustomView => "hideCustomView",
            Self::Download { .. } => "download",
            Self::ClickLink { .. } => "clickLink",
            Self::Cookie { .. } => "cookie",
        }
    }
}
