//! Headless replay host.
//!
//! Builds one widget on the headless engine, applies a scripted session to
//! it and writes every message the widget sends to the host as a JSON line.

mod session;

#[cfg(test)]
mod tests;

pub use session::{Session, Step};

use std::io::{Read, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};
use webbridge_common::{BridgeError, EngineKind, LifecycleBus, WidgetId};
use webbridge_config::schema::BridgeConfig;
use webbridge_view::engine::OverlayView;
use webbridge_view::{
    DetachedWindow, HeadlessEngine, HeadlessHandle, HeadlessProfile, QueuedHost, SharedWindow,
    WidgetRegistry,
};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read session: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed session: {0}")]
    Session(#[from] serde_json::Error),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Headless engine profile described by the `[engine]` section.
pub fn profile_from_config(config: &BridgeConfig) -> HeadlessProfile {
    HeadlessProfile {
        api_level: config.engine.api_level,
        force_dark_feature: config.engine.force_dark_supported,
        protected_media_feature: config.engine.protected_media_supported,
        ..HeadlessProfile::default()
    }
}

/// Read a session from `path` (`-` is stdin) and replay it.
pub fn run_file(
    path: &Path,
    config: &BridgeConfig,
    out: &mut impl Write,
) -> Result<usize, ReplayError> {
    let raw = if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        raw
    } else {
        std::fs::read_to_string(path)?
    };
    let session: Session = serde_json::from_str(&raw)?;
    info!(path = %path.display(), steps = session.steps.len(), "replaying session");
    run(&session, config, out)
}

/// Replay `session`. Returns the number of host messages written.
///
/// Property and command failures are logged and the replay continues, the
/// way a host framework would surface them.
pub fn run(
    session: &Session,
    config: &BridgeConfig,
    out: &mut impl Write,
) -> Result<usize, ReplayError> {
    let id = WidgetId(session.widget);
    let host = QueuedHost::new()
        .with_direct_bridge(config.host.direct_bridge)
        .with_navigation_policy(session.navigation);

    let mut window = DetachedWindow::new();
    if session.layered {
        window = window.with_layered(id);
    }
    let window: SharedWindow = Arc::new(Mutex::new(window));

    let bus = LifecycleBus::new(config.host.lifecycle_capacity.max(1) as usize);
    let mut registry = WidgetRegistry::new(Arc::new(host.clone()), window, bus)
        .with_defaults(config.defaults_for(EngineKind::Headless));

    let profile = profile_from_config(config);
    let mut handle = None;
    registry.create(id, |hooks| {
        let engine = HeadlessEngine::new(profile, hooks);
        handle = Some(engine.handle());
        Ok(Box::new(engine))
    })?;
    let Some(handle) = handle else {
        return Ok(0);
    };

    let mut written = flush(&host, out)?;
    for (index, step) in session.steps.iter().enumerate() {
        debug!(index, step = step.name(), "replay step");
        apply(&mut registry, &handle, id, step);
        if let Err(e) = registry.pump_all() {
            warn!(index, step = step.name(), error = %e, "widget failed while handling step");
        }
        written += flush(&host, out)?;
    }

    registry.destroy_all();
    written += flush(&host, out)?;
    Ok(written)
}

fn apply(registry: &mut WidgetRegistry, handle: &HeadlessHandle, id: WidgetId, step: &Step) {
    let result = match step {
        Step::Set { name, value } => registry.set_property(id, name, value),
        Step::Command { name, args } => registry.receive_command(id, name, args),
        Step::Lifecycle { event } => {
            registry.publish_lifecycle(*event);
            Ok(())
        }
        Step::Message { interface, data } => {
            if !handle.post_message(interface, data.as_str()) {
                debug!(interface = %interface, "page has no such bridge object, message dropped");
            }
            Ok(())
        }
        Step::BeginLoad { url } => {
            handle.begin_load(url);
            Ok(())
        }
        Step::Progress { value } => {
            handle.progress(*value);
            Ok(())
        }
        Step::FinishLoad => {
            handle.finish_load();
            Ok(())
        }
        Step::FailLoad {
            url,
            code,
            description,
        } => {
            handle.fail_load(url, *code, description);
            Ok(())
        }
        Step::HttpError {
            url,
            status_code,
            description,
            main_frame,
        } => {
            handle.http_error(url, *status_code, description, *main_frame);
            Ok(())
        }
        Step::Crash { did_crash } => {
            handle.crash(*did_crash);
            Ok(())
        }
        Step::Scroll {
            x,
            y,
            content_width,
            content_height,
            layout_width,
            layout_height,
        } => {
            handle.scroll(
                *x,
                *y,
                (*content_width, *content_height),
                (*layout_width, *layout_height),
            );
            Ok(())
        }
        Step::ContentSize { width, height } => {
            handle.content_size(*width, *height);
            Ok(())
        }
        Step::ShowCustomView { view } => {
            handle.show_custom_view(OverlayView(*view));
            Ok(())
        }
        Step::HideCustomView => {
            handle.hide_custom_view();
            Ok(())
        }
        Step::Download {
            url,
            content_disposition,
            mime_type,
        } => {
            handle.download(url, content_disposition, mime_type);
            Ok(())
        }
        Step::ClickLink { url } => {
            if !handle.click_link(url) {
                debug!(url = %url, "link navigation intercepted");
            }
            Ok(())
        }
        Step::Cookie { url, cookie } => {
            handle.set_cookie(url, cookie);
            Ok(())
        }
    };
    if let Err(e) = result {
        warn!(step = step.name(), error = %e, "replay step rejected");
    }
}

fn flush(host: &QueuedHost, out: &mut impl Write) -> Result<usize, ReplayError> {
    let messages = host.drain();
    for message in &messages {
        serde_json::to_writer(&mut *out, message)?;
        out.write_all(b"\n")?;
    }
    Ok(messages.len())
}
