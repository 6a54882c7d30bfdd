//! Outbound widget events.
//!
//! Every event carries the same base attributes (target, url, loading,
//! title, canGoBack, canGoForward) plus event-specific fields. Events are
//! dispatched under their wire name (`topLoadingStart`); the host framework
//! registers them under the `on…` name.

use serde::Serialize;
use webbridge_common::WidgetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    LoadingStart,
    LoadingFinish,
    LoadingProgress,
    LoadingError,
    HttpError,
    Message,
    Scroll,
    ShouldStartLoadWithRequest,
    RenderProcessGone,
    ContentSizeChange,
}

impl EventKind {
    pub const ALL: [EventKind; 10] = [
        Self::LoadingStart,
        Self::LoadingFinish,
        Self::LoadingProgress,
        Self::LoadingError,
        Self::HttpError,
        Self::Message,
        Self::Scroll,
        Self::ShouldStartLoadWithRequest,
        Self::RenderProcessGone,
        Self::ContentSizeChange,
    ];

    /// Name the event travels under.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::LoadingStart => "topLoadingStart",
            Self::LoadingFinish => "topLoadingFinish",
            Self::LoadingProgress => "topLoadingProgress",
            Self::LoadingError => "topLoadingError",
            Self::HttpError => "topHttpError",
            Self::Message => "topMessage",
            Self::Scroll => "topScroll",
            Self::ShouldStartLoadWithRequest => "topShouldStartLoadWithRequest",
            Self::RenderProcessGone => "topRenderProcessGone",
            Self::ContentSizeChange => "topContentSizeChange",
        }
    }

    /// Name the host framework registers a handler under.
    pub fn registration_name(self) -> &'static str {
        match self {
            Self::LoadingStart => "onLoadingStart",
            Self::LoadingFinish => "onLoadingFinish",
            Self::LoadingProgress => "onLoadingProgress",
            Self::LoadingError => "onLoadingError",
            Self::HttpError => "onHttpError",
            Self::Message => "onMessage",
            Self::Scroll => "onScroll",
            Self::ShouldStartLoadWithRequest => "onShouldStartLoadWithRequest",
            Self::RenderProcessGone => "onRenderProcessGone",
            Self::ContentSizeChange => "onContentSizeChange",
        }
    }
}

/// Wire name → registration name, for the host's event registry.
pub fn exported_event_types() -> Vec<(&'static str, &'static str)> {
    EventKind::ALL
        .iter()
        .map(|k| (k.wire_name(), k.registration_name()))
        .collect()
}

/// Attributes shared by every event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBase {
    pub target: WidgetId,
    pub url: String,
    pub loading: bool,
    pub title: String,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Insets {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        top: 0.0,
        bottom: 0.0,
        left: 0.0,
        right: 0.0,
    };
}

/// Event-specific fields, flattened next to the base.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventData {
    Empty {},
    Progress {
        progress: f64,
    },
    LoadingError {
        code: i32,
        description: String,
    },
    #[serde(rename_all = "camelCase")]
    HttpError {
        status_code: u16,
        description: String,
    },
    Message {
        data: String,
    },
    #[serde(rename_all = "camelCase")]
    Scroll {
        content_inset: Insets,
        content_offset: Point,
        content_size: Size,
        layout_measurement: Size,
        velocity: Point,
        zoom_scale: f64,
        responder_ignore_scroll: bool,
    },
    #[serde(rename_all = "camelCase")]
    ShouldStart {
        navigation_type: String,
    },
    #[serde(rename_all = "camelCase")]
    RenderProcessGone {
        did_crash: bool,
    },
    ContentSize {
        width: f64,
        height: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetEvent {
    #[serde(skip)]
    pub kind: EventKind,
    #[serde(flatten)]
    pub base: EventBase,
    #[serde(flatten)]
    pub data: EventData,
}

impl WidgetEvent {
    pub fn new(kind: EventKind, base: EventBase, data: EventData) -> Self {
        Self { kind, base, data }
    }

    pub fn target(&self) -> WidgetId {
        self.base.target
    }

    /// JSON payload handed to the host. A failure here is a bridge contract
    /// violation and propagates.
    pub fn to_payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> EventBase {
        EventBase {
            target: WidgetId(3),
            url: "https://example.com/".into(),
            loading: false,
            title: "Example".into(),
            can_go_back: true,
            can_go_forward: false,
        }
    }

    #[test]
    fn base_fields_are_camel_case() {
        let event = WidgetEvent::new(EventKind::LoadingStart, base(), EventData::Empty {});
        let json = event.to_payload().unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "target": 3,
                "url": "https://example.com/",
                "loading": false,
                "title": "Example",
                "canGoBack": true,
                "canGoForward": false
            })
        );
    }

    #[test]
    fn error_fields_flatten() {
        let event = WidgetEvent::new(
            EventKind::LoadingError,
            base(),
            EventData::LoadingError {
                code: -2,
                description: "net::ERR_NAME_NOT_RESOLVED".into(),
            },
        );
        let json = event.to_payload().unwrap();
        assert_eq!(json["code"], -2);
        assert_eq!(json["description"], "net::ERR_NAME_NOT_RESOLVED");
        assert_eq!(json["target"], 3);
    }

    #[test]
    fn http_error_and_crash_keys() {
        let json = WidgetEvent::new(
            EventKind::HttpError,
            base(),
            EventData::HttpError {
                status_code: 404,
                description: "Not Found".into(),
            },
        )
        .to_payload()
        .unwrap();
        assert_eq!(json["statusCode"], 404);

        let json = WidgetEvent::new(
            EventKind::RenderProcessGone,
            base(),
            EventData::RenderProcessGone { did_crash: true },
        )
        .to_payload()
        .unwrap();
        assert_eq!(json["didCrash"], true);
    }

    #[test]
    fn scroll_payload_shape() {
        let json = WidgetEvent::new(
            EventKind::Scroll,
            base(),
            EventData::Scroll {
                content_inset: Insets::ZERO,
                content_offset: Point { x: 0.0, y: 120.0 },
                content_size: Size {
                    width: 800.0,
                    height: 4000.0,
                },
                layout_measurement: Size {
                    width: 800.0,
                    height: 600.0,
                },
                velocity: Point { x: 0.0, y: 2.5 },
                zoom_scale: 1.0,
                responder_ignore_scroll: true,
            },
        )
        .to_payload()
        .unwrap();
        assert_eq!(json["contentOffset"]["y"], 120.0);
        assert_eq!(json["velocity"]["y"], 2.5);
        assert_eq!(json["layoutMeasurement"]["height"], 600.0);
        assert_eq!(json["zoomScale"], 1.0);
    }

    #[test]
    fn event_registry_names() {
        let exported = exported_event_types();
        assert_eq!(exported.len(), 10);
        assert!(exported.contains(&("topLoadingStart", "onLoadingStart")));
        assert!(exported.contains(&("topShouldStartLoadWithRequest", "onShouldStartLoadWithRequest")));
        assert!(exported.contains(&("topRenderProcessGone", "onRenderProcessGone")));
    }
}
