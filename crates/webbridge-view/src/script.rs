//! Script injection and the page messaging channel.

use tracing::debug;
use webbridge_common::Result;

use crate::engine::{BrowserEngine, Capability, Headers, ScriptScope};
use crate::ipc::{self, MessageQueue, BRIDGE_INTERFACE};

/// The two injection payloads and their frame scopes. Never cleared
/// automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedScriptSet {
    pub before_content_loaded: Option<String>,
    pub after_load: Option<String>,
    pub before_content_loaded_main_frame_only: bool,
    pub after_load_main_frame_only: bool,
}

impl Default for InjectedScriptSet {
    fn default() -> Self {
        Self {
            before_content_loaded: None,
            after_load: None,
            before_content_loaded_main_frame_only: true,
            after_load_main_frame_only: true,
        }
    }
}

/// Wrap a user script so its bindings stay out of the page's global scope.
pub fn wrap_iife(script: &str) -> String {
    format!("(function() {{\n{script};\n}})();")
}

/// Evaluate directly when the engine can; otherwise navigate to a
/// `javascript:` URL carrying the percent-encoded script.
pub fn evaluate_with_fallback(
    engine: &mut dyn BrowserEngine,
    script: &str,
    scope: ScriptScope,
) -> Result<()> {
    if engine.capabilities().supports(Capability::EvaluateScript) {
        engine.evaluate_script(script, scope)?;
    } else {
        let url = format!("javascript:{}", urlencoding::encode(script));
        engine.load_url(&url, &Headers::new())?;
    }
    Ok(())
}

pub struct ScriptBridge {
    scripts: InjectedScriptSet,
    messaging_enabled: bool,
    module_name: Option<String>,
    queue: MessageQueue,
}

impl ScriptBridge {
    pub fn new() -> Self {
        Self {
            scripts: InjectedScriptSet::default(),
            messaging_enabled: false,
            module_name: None,
            queue: MessageQueue::new(),
        }
    }

    pub fn scripts(&self) -> &InjectedScriptSet {
        &self.scripts
    }

    pub fn scripts_mut(&mut self) -> &mut InjectedScriptSet {
        &mut self.scripts
    }

    pub fn messaging_enabled(&self) -> bool {
        self.messaging_enabled
    }

    pub fn module_name(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    pub fn set_messaging_module_name(&mut self, name: Option<String>) {
        self.module_name = name.filter(|n| !n.is_empty());
    }

    /// Attach or detach the page-visible bridge object on the live engine.
    pub fn set_messaging_enabled(
        &mut self,
        engine: &mut dyn BrowserEngine,
        enabled: bool,
    ) -> Result<()> {
        if enabled == self.messaging_enabled {
            return Ok(());
        }
        if enabled {
            engine.add_bridge_object(BRIDGE_INTERFACE, self.queue.bridge_object())?;
        } else {
            engine.remove_bridge_object(BRIDGE_INTERFACE)?;
        }
        self.messaging_enabled = enabled;
        debug!(enabled, "page messaging toggled");
        Ok(())
    }

    /// Runs once content loading begins.
    pub fn call_injected_before_content_loaded(
        &self,
        engine: &mut dyn BrowserEngine,
    ) -> Result<bool> {
        self.inject(
            engine,
            self.scripts.before_content_loaded.as_deref(),
            self.scripts.before_content_loaded_main_frame_only,
        )
    }

    /// Runs once loading completes.
    pub fn call_injected_after_load(&self, engine: &mut dyn BrowserEngine) -> Result<bool> {
        self.inject(
            engine,
            self.scripts.after_load.as_deref(),
            self.scripts.after_load_main_frame_only,
        )
    }

    fn inject(
        &self,
        engine: &mut dyn BrowserEngine,
        script: Option<&str>,
        main_frame_only: bool,
    ) -> Result<bool> {
        let Some(script) = script.filter(|s| !s.is_empty()) else {
            return Ok(false);
        };
        if !engine.settings().javascript_enabled {
            return Ok(false);
        }
        evaluate_with_fallback(
            engine,
            &wrap_iife(script),
            ScriptScope::main_frame_only(main_frame_only),
        )?;
        Ok(true)
    }

    /// The `injectJavaScript` command: evaluated as given.
    pub fn inject_javascript(&self, engine: &mut dyn BrowserEngine, script: &str) -> Result<()> {
        evaluate_with_fallback(engine, script, ScriptScope::MainFrame)
    }

    /// The `postMessage` command.
    pub fn post_message(&self, engine: &mut dyn BrowserEngine, data: &str) -> Result<()> {
        let script = ipc::post_message_script(data)?;
        evaluate_with_fallback(engine, &script, ScriptScope::MainFrame)
    }

    /// Page messages received since the last drain, oldest first.
    pub fn drain_messages(&self) -> Vec<String> {
        self.queue.drain()
    }

    pub fn discard_messages(&self) -> usize {
        self.queue.discard()
    }
}

impl Default for ScriptBridge {
    fn default() -> Self {
        Self::new()
    }
}
