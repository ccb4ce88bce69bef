use serde_json::Value;
use tracing::{debug, warn};
use veil_common::{DialogError, SurfaceId};

use crate::channels::{channel_name, Emitted};
use crate::ipc::{IpcMessage, REPLY_CHANNEL};

use super::DialogManager;

impl DialogManager {
    /// Register a request handler for `event` in the scope of the dialog on
    /// `surface`. Returns the full channel name. The channel is removed when
    /// the dialog is torn down.
    pub fn handle<F>(&mut self, surface: SurfaceId, event: &str, handler: F) -> Result<String, DialogError>
    where
        F: FnMut(&[Value]) -> Value + 'static,
    {
        let dialog = self
            .dialogs
            .get_mut(&surface)
            .ok_or(DialogError::UnknownDialog(surface))?;
        let channel = channel_name(event, surface);
        self.channels.handle(channel.clone(), handler)?;
        dialog.channels.push(channel.clone());
        Ok(channel)
    }

    /// Register a fire-and-forget listener for `event` in the scope of the
    /// dialog on `surface`.
    pub fn on<F>(&mut self, surface: SurfaceId, event: &str, listener: F) -> Result<String, DialogError>
    where
        F: FnMut(&[Value]) + 'static,
    {
        let dialog = self
            .dialogs
            .get_mut(&surface)
            .ok_or(DialogError::UnknownDialog(surface))?;
        let channel = channel_name(event, surface);
        self.channels.on(channel.clone(), listener)?;
        dialog.channels.push(channel.clone());
        Ok(channel)
    }

    /// Run the request handler on `channel`.
    pub fn invoke(&mut self, channel: &str, args: &[Value]) -> Result<Value, DialogError> {
        Ok(self.channels.invoke(channel, args)?)
    }

    /// Deliver a fire-and-forget message. A dialog's hide trigger hides it
    /// for the selected tab; unrouted messages are dropped.
    pub fn emit(&mut self, channel: &str, args: &[Value]) -> Result<(), DialogError> {
        match self.channels.emit(channel, args) {
            Emitted::Hide(surface) => self.hide(surface, None),
            Emitted::Delivered | Emitted::Dropped => Ok(()),
        }
    }

    /// Route a page message: requests return the handler's reply,
    /// notifications return `None`.
    pub fn route_ipc(&mut self, message: &IpcMessage) -> Result<Option<Value>, DialogError> {
        if message.expects_reply {
            self.invoke(&message.channel, &message.args).map(Some)
        } else {
            self.emit(&message.channel, &message.args).map(|()| None)
        }
    }

    /// Route a raw IPC body posted by the page on `surface` and send any
    /// reply back to that page. Malformed bodies are logged and dropped.
    pub fn dispatch_ipc(&mut self, surface: SurfaceId, body: &str) -> Result<(), DialogError> {
        let Some(message) = IpcMessage::from_json(body) else {
            warn!(surface = %surface, body_len = body.len(), "IPC message rejected: malformed");
            return Ok(());
        };
        debug!(surface = %surface, channel = %message.channel, "IPC message");

        let Some(reply) = self.route_ipc(&message)? else {
            return Ok(());
        };
        let args = [Value::String(message.channel), reply];
        if let Some(host_surface) = self.pool.get_mut(surface) {
            host_surface.send(REPLY_CHANNEL, &args)?;
        } else if let Some(p) = self.persistent.iter_mut().find(|p| p.surface.id() == surface) {
            p.surface.send(REPLY_CHANNEL, &args)?;
        }
        Ok(())
    }
}
