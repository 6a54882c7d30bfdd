//! Engine callbacks → component calls → host events.

use std::time::Instant;

use tracing::{debug, warn};
use webbridge_common::Result;

use crate::download::DownloadRequest;
use crate::engine::EngineCallback;
use crate::events::WidgetEvent;
use crate::ipc;

use super::WebWidget;

impl WebWidget {
    fn dispatch(&self, event: WidgetEvent) -> Result<()> {
        let payload = event.to_payload()?;
        self.host
            .dispatch_event(self.id, event.kind.wire_name(), payload);
        Ok(())
    }

    fn dispatch_opt(&self, event: Option<WidgetEvent>) -> Result<()> {
        match event {
            Some(event) => self.dispatch(event),
            None => Ok(()),
        }
    }

    pub(super) fn relay_page_message(&mut self, data: String) -> Result<()> {
        let event = self.emitter.message_event(self.engine.as_ref(), data);
        ipc::relay_message(self.host.as_ref(), self.scripts.module_name(), &event)
    }

    pub(super) fn handle_callback(&mut self, callback: EngineCallback) -> Result<()> {
        let engine = self.engine.as_mut();
        match callback {
            EngineCallback::PageStarted { url } => {
                engine.restore_bridge_objects()?;
                self.scripts.call_injected_before_content_loaded(engine)?;
                let event = self.emitter.on_page_started(engine, &url);
                self.dispatch(event)
            }
            EngineCallback::PageFinished { url } => {
                let Some(event) = self.emitter.on_page_finished(engine, &url) else {
                    return Ok(());
                };
                self.scripts.call_injected_after_load(engine)?;
                self.dispatch(event)
            }
            EngineCallback::ProgressChanged { progress } => {
                let event = self.emitter.on_progress_changed(engine, progress);
                self.dispatch_opt(event)
            }
            EngineCallback::ReceivedError {
                url,
                code,
                description,
            } => {
                for event in self
                    .emitter
                    .on_received_error(engine, &url, code, &description)
                {
                    self.dispatch(event)?;
                }
                Ok(())
            }
            EngineCallback::ReceivedHttpError {
                url,
                main_frame,
                status_code,
                description,
            } => {
                let event = self.emitter.on_received_http_error(
                    engine,
                    &url,
                    main_frame,
                    status_code,
                    &description,
                );
                self.dispatch_opt(event)
            }
            EngineCallback::RenderProcessGone { did_crash } => {
                warn!(widget_id = %self.id, did_crash, "render process gone");
                let event = self.emitter.on_render_process_gone(engine, did_crash);
                self.dispatch(event)
            }
            EngineCallback::NavigationRequested {
                url,
                navigation_type,
            } => {
                let event = self
                    .emitter
                    .on_should_start_load(engine, &url, &navigation_type);
                self.dispatch(event)
            }
            EngineCallback::ExternalNavigation { url } => {
                if !self.host.open_external(self.id, &url) {
                    warn!(widget_id = %self.id, url = %url, "no handler for external URL");
                }
                Ok(())
            }
            EngineCallback::ScrollChanged {
                x,
                y,
                content_width,
                content_height,
                layout_width,
                layout_height,
            } => {
                let event = self.emitter.on_scroll_changed(
                    engine,
                    x,
                    y,
                    (content_width, content_height),
                    (layout_width, layout_height),
                    Instant::now(),
                );
                self.dispatch_opt(event)
            }
            EngineCallback::ContentSizeChanged { width, height } => {
                let event = self.emitter.on_content_size_changed(engine, width, height);
                self.dispatch_opt(event)
            }
            EngineCallback::DownloadRequested {
                url,
                user_agent,
                content_disposition,
                mime_type,
            } => {
                self.emitter.set_ignore_err_failed_for_url(Some(url.clone()));
                let cookie = engine.cookie(&url);
                if let Some(request) = DownloadRequest::build(
                    &url,
                    &user_agent,
                    &content_disposition,
                    &mime_type,
                    cookie,
                    &self.downloads,
                ) {
                    debug!(widget_id = %self.id, file = %request.file_name, "download handed to host");
                    self.host.request_download(self.id, &request);
                }
                Ok(())
            }
            EngineCallback::ShowCustomView { view, callback } => {
                match self.window.lock() {
                    Ok(mut window) => {
                        self.fullscreen.enter(&mut *window, engine, view, callback);
                    }
                    Err(_) => {
                        warn!(widget_id = %self.id, "window lock poisoned, overlay refused");
                        callback.on_custom_view_hidden();
                    }
                }
                Ok(())
            }
            EngineCallback::HideCustomView => {
                match self.window.lock() {
                    Ok(mut window) => {
                        self.fullscreen.exit(&mut *window, engine);
                    }
                    Err(_) => warn!(widget_id = %self.id, "window lock poisoned, overlay left as is"),
                }
                Ok(())
            }
        }
    }
}
