//! Embeddable web widget bridge.
//!
//! Exposes a browser engine to a host application framework through a
//! property / command / event interface:
//! - One [`BrowserEngine`] trait over the platform web view (`wry`) and an
//!   in-process headless engine
//! - Declarative properties translated into engine settings
//! - Navigation with source resolution and duplicate suppression
//! - Script injection and ordered page messaging
//! - Uniform load, error, scroll and navigation events
//! - Full-screen video overlays and exactly-once teardown

pub mod commands;
pub mod download;
pub mod emitter;
pub mod engine;
pub mod events;
pub mod fullscreen;
pub mod host;
pub mod ipc;
pub mod lifecycle;
pub mod navigation;
pub mod registry;
pub mod script;
pub mod settings;
pub mod widget;

pub use commands::{commands_map, Command};
pub use download::{DownloadMessages, DownloadRequest};
pub use emitter::{EventEmitter, NavigationState};
pub use engine::{
    BrowserEngine, EngineCapabilities, EngineHooks, HeadlessEngine, HeadlessHandle,
    HeadlessProfile, SystemEngine, SystemEngineOptions,
};
pub use events::{exported_event_types, EventKind, WidgetEvent};
pub use fullscreen::{FullscreenPhase, FullscreenVideoCoordinator};
pub use host::{
    DetachedWindow, HostBridge, HostMessage, HostWindow, NavigationDecision, QueuedHost,
    SharedWindow,
};
pub use lifecycle::LifecycleManager;
pub use navigation::{BasicAuthCredential, NavigationController, Source};
pub use registry::WidgetRegistry;
pub use script::ScriptBridge;
pub use settings::EngineSettingsAdapter;
pub use widget::{WebWidget, WidgetConfiguration};
