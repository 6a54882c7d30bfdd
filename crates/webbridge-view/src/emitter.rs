//! Engine callbacks → named widget events.

use std::time::Instant;

use tracing::debug;
use webbridge_common::WidgetId;

use crate::engine::{BrowserEngine, BLANK_URL};
use crate::events::{EventBase, EventData, EventKind, Insets, Point, Size, WidgetEvent};

/// Error code the engine reports for a request it aborted itself.
pub const ERR_FAILED_CODE: i32 = -1;
pub const ERR_FAILED_DESCRIPTION: &str = "net::ERR_FAILED";

/// Where the current navigation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationState {
    #[default]
    Idle,
    Loading,
    Finished,
    Error,
    HttpError,
}

/// Suppresses progress reports while the host is expected to answer a
/// deferred navigation with `loadUrl`. Otherwise a late "100%" from the
/// cancelled navigation races the commanded one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressFilter {
    waiting_for_command_load_url: bool,
}

impl ProgressFilter {
    pub fn set_waiting_for_command_load_url(&mut self, waiting: bool) {
        self.waiting_for_command_load_url = waiting;
    }

    pub fn is_waiting_for_command_load_url(&self) -> bool {
        self.waiting_for_command_load_url
    }
}

/// Scroll de-duplication. A scroll is dispatched only when the offset
/// differs from the last dispatched one; velocity is the offset delta over
/// the elapsed time, in pixels per millisecond.
#[derive(Debug, Clone, Default)]
pub struct ScrollDispatchHelper {
    last: Option<(i32, i32, Instant)>,
    velocity: (f64, f64),
}

impl ScrollDispatchHelper {
    pub fn on_scroll_changed(&mut self, x: i32, y: i32, now: Instant) -> bool {
        let Some((prev_x, prev_y, prev_time)) = self.last else {
            self.last = Some((x, y, now));
            return true;
        };
        if prev_x == x && prev_y == y {
            return false;
        }
        let elapsed_ms = now.saturating_duration_since(prev_time).as_secs_f64() * 1000.0;
        if elapsed_ms > 0.0 {
            self.velocity = (
                f64::from(x - prev_x) / elapsed_ms,
                f64::from(y - prev_y) / elapsed_ms,
            );
        }
        self.last = Some((x, y, now));
        true
    }

    pub fn x_velocity(&self) -> f64 {
        self.velocity.0
    }

    pub fn y_velocity(&self) -> f64 {
        self.velocity.1
    }
}

pub struct EventEmitter {
    target: WidgetId,
    state: NavigationState,
    last_load_failed: bool,
    progress_filter: ProgressFilter,
    scroll: ScrollDispatchHelper,
    scroll_enabled: bool,
    content_size_enabled: bool,
    ignore_err_failed_url: Option<String>,
}

impl EventEmitter {
    pub fn new(target: WidgetId) -> Self {
        Self {
            target,
            state: NavigationState::Idle,
            last_load_failed: false,
            progress_filter: ProgressFilter::default(),
            scroll: ScrollDispatchHelper::default(),
            scroll_enabled: false,
            content_size_enabled: false,
            ignore_err_failed_url: None,
        }
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn last_load_failed(&self) -> bool {
        self.last_load_failed
    }

    pub fn progress_filter(&self) -> &ProgressFilter {
        &self.progress_filter
    }

    pub fn set_scroll_enabled(&mut self, enabled: bool) {
        self.scroll_enabled = enabled;
    }

    pub fn set_content_size_enabled(&mut self, enabled: bool) {
        self.content_size_enabled = enabled;
    }

    /// The next `net::ERR_FAILED` for `url` is swallowed (the engine aborts
    /// the request once a download takes it over).
    pub fn set_ignore_err_failed_for_url(&mut self, url: Option<String>) {
        self.ignore_err_failed_url = url;
    }

    /// A `loadUrl` command arrived.
    pub fn command_load_url(&mut self) {
        self.progress_filter.set_waiting_for_command_load_url(false);
    }

    pub fn base(&self, engine: &dyn BrowserEngine, url: &str) -> EventBase {
        EventBase {
            target: self.target,
            url: url.to_string(),
            loading: !self.last_load_failed && engine.progress() != 100,
            title: engine.title(),
            can_go_back: engine.can_go_back(),
            can_go_forward: engine.can_go_forward(),
        }
    }

    fn current_url(engine: &dyn BrowserEngine) -> String {
        engine.url().unwrap_or_else(|| BLANK_URL.to_string())
    }

    fn event(&self, engine: &dyn BrowserEngine, kind: EventKind, url: &str, data: EventData) -> WidgetEvent {
        WidgetEvent::new(kind, self.base(engine, url), data)
    }

    pub fn on_page_started(&mut self, engine: &dyn BrowserEngine, url: &str) -> WidgetEvent {
        self.last_load_failed = false;
        self.state = NavigationState::Loading;
        self.event(engine, EventKind::LoadingStart, url, EventData::Empty {})
    }

    /// `None` when the load already failed: the error path emitted its own
    /// finish event.
    pub fn on_page_finished(&mut self, engine: &dyn BrowserEngine, url: &str) -> Option<WidgetEvent> {
        if self.last_load_failed {
            return None;
        }
        self.state = NavigationState::Finished;
        Some(self.event(engine, EventKind::LoadingFinish, url, EventData::Empty {}))
    }

    pub fn on_progress_changed(&mut self, engine: &dyn BrowserEngine, progress: u8) -> Option<WidgetEvent> {
        if self.progress_filter.is_waiting_for_command_load_url() {
            debug!(progress, "progress suppressed while waiting for loadUrl");
            return None;
        }
        let url = Self::current_url(engine);
        Some(self.event(
            engine,
            EventKind::LoadingProgress,
            &url,
            EventData::Progress {
                progress: f64::from(progress) / 100.0,
            },
        ))
    }

    /// Finish then error, in that order. Empty when the error is the
    /// engine aborting a request that became a download.
    pub fn on_received_error(
        &mut self,
        engine: &dyn BrowserEngine,
        url: &str,
        code: i32,
        description: &str,
    ) -> Vec<WidgetEvent> {
        if self.ignore_err_failed_url.as_deref() == Some(url)
            && code == ERR_FAILED_CODE
            && description == ERR_FAILED_DESCRIPTION
        {
            self.ignore_err_failed_url = None;
            debug!(url = %url, "ERR_FAILED for download swallowed");
            return Vec::new();
        }
        self.last_load_failed = true;
        self.state = NavigationState::Error;
        vec![
            self.event(engine, EventKind::LoadingFinish, url, EventData::Empty {}),
            self.event(
                engine,
                EventKind::LoadingError,
                url,
                EventData::LoadingError {
                    code,
                    description: description.to_string(),
                },
            ),
        ]
    }

    /// Sub-resource HTTP errors are not reported.
    pub fn on_received_http_error(
        &mut self,
        engine: &dyn BrowserEngine,
        url: &str,
        main_frame: bool,
        status_code: u16,
        description: &str,
    ) -> Option<WidgetEvent> {
        if !main_frame {
            return None;
        }
        self.state = NavigationState::HttpError;
        Some(self.event(
            engine,
            EventKind::HttpError,
            url,
            EventData::HttpError {
                status_code,
                description: description.to_string(),
            },
        ))
    }

    pub fn on_render_process_gone(&mut self, engine: &dyn BrowserEngine, did_crash: bool) -> WidgetEvent {
        let url = Self::current_url(engine);
        self.event(
            engine,
            EventKind::RenderProcessGone,
            &url,
            EventData::RenderProcessGone { did_crash },
        )
    }

    /// The host deferred a navigation. Progress stays quiet until it
    /// answers with `loadUrl`.
    pub fn on_should_start_load(
        &mut self,
        engine: &dyn BrowserEngine,
        url: &str,
        navigation_type: &str,
    ) -> WidgetEvent {
        self.progress_filter.set_waiting_for_command_load_url(true);
        self.event(
            engine,
            EventKind::ShouldStartLoadWithRequest,
            url,
            EventData::ShouldStart {
                navigation_type: navigation_type.to_string(),
            },
        )
    }

    pub fn on_scroll_changed(
        &mut self,
        engine: &dyn BrowserEngine,
        x: i32,
        y: i32,
        content: (i32, i32),
        layout: (i32, i32),
        now: Instant,
    ) -> Option<WidgetEvent> {
        if !self.scroll_enabled || !self.scroll.on_scroll_changed(x, y, now) {
            return None;
        }
        let url = Self::current_url(engine);
        Some(self.event(
            engine,
            EventKind::Scroll,
            &url,
            EventData::Scroll {
                content_inset: Insets::ZERO,
                content_offset: Point {
                    x: f64::from(x),
                    y: f64::from(y),
                },
                content_size: Size {
                    width: f64::from(content.0),
                    height: f64::from(content.1),
                },
                layout_measurement: Size {
                    width: f64::from(layout.0),
                    height: f64::from(layout.1),
                },
                velocity: Point {
                    x: self.scroll.x_velocity(),
                    y: self.scroll.y_velocity(),
                },
                zoom_scale: 1.0,
                responder_ignore_scroll: true,
            },
        ))
    }

    pub fn on_content_size_changed(
        &mut self,
        engine: &dyn BrowserEngine,
        width: i32,
        height: i32,
    ) -> Option<WidgetEvent> {
        if !self.content_size_enabled {
            return None;
        }
        let url = Self::current_url(engine);
        Some(self.event(
            engine,
            EventKind::ContentSizeChange,
            &url,
            EventData::ContentSize {
                width: f64::from(width),
                height: f64::from(height),
            },
        ))
    }

    pub fn message_event(&self, engine: &dyn BrowserEngine, data: String) -> WidgetEvent {
        let url = Self::current_url(engine);
        self.event(engine, EventKind::Message, &url, EventData::Message { data })
    }
}
