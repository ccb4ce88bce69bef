//! Process-wide channel routing for dialog pages.
//!
//! Channels are named `<event>-<surfaceId>`. A channel carries either one
//! request handler (`invoke`, answers with a value) or one listener
//! (`emit`, fire-and-forget). Every dialog owns a built-in hide channel
//! that the manager resolves itself.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};
use veil_common::{ChannelError, SurfaceId};

/// Event name of the per-dialog hide trigger.
pub const HIDE_EVENT: &str = "hide";
/// Sent to the host window's content: `(name, visible)`.
pub const DIALOG_VISIBILITY_CHANGE: &str = "dialog-visibility-change";
/// Sent to a dialog's page: `(visible, tabId, data)`.
pub const VISIBILITY_CHANGED: &str = "visibility-changed";

type RequestHandler = Box<dyn FnMut(&[Value]) -> Value>;
type Listener = Box<dyn FnMut(&[Value])>;

/// Build the scoped channel name for `event` on `surface`.
pub fn channel_name(event: &str, surface: SurfaceId) -> String {
    format!("{event}-{surface}")
}

enum Route {
    Hide(SurfaceId),
    Handle(RequestHandler),
    Listen(Listener),
}

/// Outcome of a fire-and-forget message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emitted {
    /// A listener ran.
    Delivered,
    /// The hide trigger of the dialog on this surface fired.
    Hide(SurfaceId),
    /// Nothing listens on the channel.
    Dropped,
}

#[derive(Default)]
pub struct ChannelRegistry {
    routes: HashMap<String, Route>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, channel: String, route: Route) -> Result<(), ChannelError> {
        if self.routes.contains_key(&channel) {
            warn!(channel = %channel, "channel registered twice");
            return Err(ChannelError::AlreadyRegistered(channel));
        }
        debug!(channel = %channel, "channel registered");
        self.routes.insert(channel, route);
        Ok(())
    }

    /// Register the hide trigger for `surface`, returning its channel name.
    pub fn register_hide(&mut self, surface: SurfaceId) -> Result<String, ChannelError> {
        let channel = channel_name(HIDE_EVENT, surface);
        self.insert(channel.clone(), Route::Hide(surface))?;
        Ok(channel)
    }

    pub fn handle<F>(&mut self, channel: impl Into<String>, handler: F) -> Result<(), ChannelError>
    where
        F: FnMut(&[Value]) -> Value + 'static,
    {
        self.insert(channel.into(), Route::Handle(Box::new(handler)))
    }

    pub fn on<F>(&mut self, channel: impl Into<String>, listener: F) -> Result<(), ChannelError>
    where
        F: FnMut(&[Value]) + 'static,
    {
        self.insert(channel.into(), Route::Listen(Box::new(listener)))
    }

    /// Remove a channel. Returns whether it was registered.
    pub fn remove(&mut self, channel: &str) -> bool {
        let removed = self.routes.remove(channel).is_some();
        if removed {
            debug!(channel, "channel removed");
        }
        removed
    }

    /// Run the request handler on `channel`.
    pub fn invoke(&mut self, channel: &str, args: &[Value]) -> Result<Value, ChannelError> {
        match self.routes.get_mut(channel) {
            Some(Route::Handle(handler)) => Ok(handler(args)),
            _ => Err(ChannelError::NoHandler(channel.to_string())),
        }
    }

    /// Deliver a fire-and-forget message on `channel`.
    pub fn emit(&mut self, channel: &str, args: &[Value]) -> Emitted {
        match self.routes.get_mut(channel) {
            Some(Route::Listen(listener)) => {
                listener(args);
                Emitted::Delivered
            }
            Some(Route::Hide(surface)) => Emitted::Hide(*surface),
            Some(Route::Handle(_)) | None => {
                debug!(channel, "message dropped: no listener");
                Emitted::Dropped
            }
        }
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.routes.contains_key(channel)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered channel names, sorted.
    pub fn channels(&self) -> Vec<String> {
        let mut names: Vec<String> = self.routes.keys().cloned().collect();
        names.sort();
        names
    }

    /// Channels scoped to `surface`.
    #[cfg(test)]
    pub(crate) fn channels_for(&self, surface: SurfaceId) -> Vec<String> {
        let suffix = format!("-{surface}");
        self.channels()
            .into_iter()
            .filter(|name| name.ends_with(&suffix))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn channel_names_are_scoped_by_surface() {
        assert_eq!(channel_name("hide", SurfaceId(3)), "hide-3");
        assert_eq!(channel_name("get-tabs", SurfaceId(12)), "get-tabs-12");
    }

    #[test]
    fn invoke_returns_handler_result() {
        let mut reg = ChannelRegistry::new();
        reg.handle("sum-1", |args: &[Value]| {
            json!(args.iter().filter_map(Value::as_i64).sum::<i64>())
        })
        .unwrap();

        assert_eq!(reg.invoke("sum-1", &[json!(2), json!(3)]).unwrap(), json!(5));
    }

    #[test]
    fn invoke_without_handler_fails() {
        let mut reg = ChannelRegistry::new();
        reg.on("ping-1", |_: &[Value]| {}).unwrap();
        assert!(matches!(
            reg.invoke("ping-1", &[]),
            Err(ChannelError::NoHandler(_))
        ));
        assert!(matches!(
            reg.invoke("missing-1", &[]),
            Err(ChannelError::NoHandler(_))
        ));
    }

    #[test]
    fn emit_runs_listener() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut reg = ChannelRegistry::new();
        reg.on("navigate-2", move |args: &[Value]| {
            sink.borrow_mut().extend_from_slice(args)
        })
        .unwrap();

        assert_eq!(reg.emit("navigate-2", &[json!("https://example.org")]), Emitted::Delivered);
        assert_eq!(*seen.borrow(), vec![json!("https://example.org")]);
        assert_eq!(reg.emit("navigate-9", &[]), Emitted::Dropped);
    }

    #[test]
    fn hide_route_is_reported_not_run() {
        let mut reg = ChannelRegistry::new();
        let channel = reg.register_hide(SurfaceId(4)).unwrap();
        assert_eq!(channel, "hide-4");
        assert_eq!(reg.emit("hide-4", &[]), Emitted::Hide(SurfaceId(4)));
    }

    #[test]
    fn double_registration_is_rejected() {
        let mut reg = ChannelRegistry::new();
        reg.handle("x-1", |_: &[Value]| Value::Null).unwrap();
        let err = reg.on("x-1", |_: &[Value]| {}).unwrap_err();
        assert!(matches!(err, ChannelError::AlreadyRegistered(ref c) if c == "x-1"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn remove_and_scoped_listing() {
        let mut reg = ChannelRegistry::new();
        reg.register_hide(SurfaceId(1)).unwrap();
        reg.register_hide(SurfaceId(11)).unwrap();
        reg.on("zoom-1", |_: &[Value]| {}).unwrap();

        assert_eq!(reg.channels_for(SurfaceId(1)), vec!["hide-1", "zoom-1"]);
        assert!(reg.remove("hide-1"));
        assert!(!reg.remove("hide-1"));
        assert_eq!(reg.channels(), vec!["hide-11", "zoom-1"]);
    }
}
