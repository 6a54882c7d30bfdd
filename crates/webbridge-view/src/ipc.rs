//! Message passing between page script and the host.
//!
//! Messages flow in both directions:
//! - **Page -> host**: page script calls
//!   `window.ReactNativeWebView.postMessage(data)`. The bridge object only
//!   enqueues; the widget drains the queue on the UI thread, in arrival
//!   order, and relays each message as an `onMessage` event.
//! - **Host -> page**: the `postMessage` command evaluates a script that
//!   dispatches a `MessageEvent` on `document`.

use std::sync::mpsc;

use serde_json::json;
use webbridge_common::Result;

use crate::engine::BridgeObject;
use crate::events::WidgetEvent;
use crate::host::HostBridge;

/// Name of the bridge object in the page's global scope.
pub const BRIDGE_INTERFACE: &str = "ReactNativeWebView";

/// Host method invoked on the messaging module when a direct bridge exists.
pub const ON_MESSAGE_METHOD: &str = "onMessage";

/// Single-consumer queue of page messages for one widget.
pub struct MessageQueue {
    sender: mpsc::Sender<String>,
    receiver: mpsc::Receiver<String>,
}

impl MessageQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// A new page-side endpoint feeding this queue.
    pub fn bridge_object(&self) -> BridgeObject {
        BridgeObject::new(self.sender.clone())
    }

    /// Everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<String> {
        self.receiver.try_iter().collect()
    }

    /// Discard queued messages without delivering them.
    pub fn discard(&self) -> usize {
        self.receiver.try_iter().count()
    }
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Script that delivers `data` to the page as a `message` event.
pub fn post_message_script(data: &str) -> Result<String> {
    let init = serde_json::to_string(&json!({ "data": data }))?;
    Ok(format!(
        "(function () {{\
var event;\
var data = {init};\
try {{\
event = new MessageEvent('message', data);\
}} catch (e) {{\
event = document.createEvent('MessageEvent');\
event.initMessageEvent('message', true, true, data.data, data.origin, data.lastEventId, data.source);\
}}\
document.dispatchEvent(event);\
}})();"
    ))
}

/// Deliver an `onMessage` event by exactly one path: a direct call into the
/// messaging module when the host has a direct bridge and a module is
/// named, otherwise generic event dispatch.
pub fn relay_message(
    host: &dyn HostBridge,
    module_name: Option<&str>,
    event: &WidgetEvent,
) -> Result<()> {
    let payload = event.to_payload()?;
    match module_name {
        Some(module) if host.direct_bridge_available() => {
            host.call_function(
                module,
                ON_MESSAGE_METHOD,
                json!([{ "nativeEvent": payload }]),
            );
        }
        _ => host.dispatch_event(event.target(), event.kind.wire_name(), payload),
    }
    Ok(())
}
