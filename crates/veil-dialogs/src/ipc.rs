//! IPC envelope between dialog pages and the dialog layer.
//!
//! Messages flow in both directions:
//! - **Page -> Rust**: the page calls `window.veil.ipc.invoke(channel, ...args)`
//!   or `window.veil.ipc.send(channel, ...args)`, which posts a JSON
//!   [`IpcMessage`] to the host.
//! - **Rust -> Page**: the host evaluates [`js_dispatch_message`] in the
//!   page, which calls the listener the page registered for that channel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message posted by a dialog page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcMessage {
    /// Full channel name, `<event>-<surfaceId>`.
    pub channel: String,
    #[serde(default)]
    pub args: Vec<Value>,
    /// Set for request/response calls; the page awaits a reply.
    #[serde(default)]
    pub expects_reply: bool,
}

impl IpcMessage {
    /// Parse an IPC message from a raw JSON string.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// A fire-and-forget message.
    pub fn notify(channel: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            channel: channel.into(),
            args,
            expects_reply: false,
        }
    }

    /// A request that expects a reply.
    pub fn request(channel: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            channel: channel.into(),
            args,
            expects_reply: true,
        }
    }
}

/// JavaScript snippet that sets up the IPC bridge in every dialog page.
pub const IPC_INIT_SCRIPT: &str = r#"
(function() {
    window.veil = window.veil || {};
    var pending = [];
    window.veil.ipc = {
        send: function(channel) {
            var args = Array.prototype.slice.call(arguments, 1);
            window.ipc.postMessage(JSON.stringify({
                channel: channel, args: args, expects_reply: false
            }));
        },
        invoke: function(channel) {
            var args = Array.prototype.slice.call(arguments, 1);
            return new Promise(function(resolve) {
                pending.push({ channel: channel, resolve: resolve });
                window.ipc.postMessage(JSON.stringify({
                    channel: channel, args: args, expects_reply: true
                }));
            });
        },
        _handlers: {},
        on: function(channel, callback) {
            this._handlers[channel] = callback;
        },
        _dispatch: function(channel, args) {
            if (channel === 'ipc-reply') {
                for (var i = 0; i < pending.length; i++) {
                    if (pending[i].channel === args[0]) {
                        pending.splice(i, 1)[0].resolve(args[1]);
                        return;
                    }
                }
                return;
            }
            var handler = this._handlers[channel];
            if (handler) {
                handler.apply(null, args);
            }
        }
    };
})();
"#;

/// Channel the host uses to answer an `invoke`. Arguments are the request
/// channel and the handler's result.
pub const REPLY_CHANNEL: &str = "ipc-reply";

/// Generate a JS snippet that dispatches a message to the page's handler.
pub fn js_dispatch_message(channel: &str, args: &[Value]) -> String {
    let args_json = serde_json::to_string(args).unwrap_or_else(|_| "[]".to_string());
    format!(
        "window.veil.ipc._dispatch({}, {});",
        serde_json::to_string(channel).unwrap_or_else(|_| "\"unknown\"".to_string()),
        args_json,
    )
}
