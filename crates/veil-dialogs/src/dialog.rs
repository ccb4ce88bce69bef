//! Dynamic dialog records and the options used to open them.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde_json::Value;
use veil_common::{Rect, SubscriptionId, SurfaceId, TabId, WindowId};

/// Called when a dialog becomes visible or hidden for a tab. The returned
/// value is forwarded to the dialog's page with the visibility change.
pub type VisibilityCallback = Box<dyn FnMut(bool, TabId) -> Value>;
/// Called once, after a dialog has been fully torn down.
pub type HideCallback = Box<dyn FnOnce(&Dialog)>;

/// Parameters for `DialogManager::show`.
pub struct ShowOptions {
    pub name: String,
    pub window: WindowId,
    pub bounds: Rect,
    /// Carried for the caller's auto-hide timer; the manager does not act on it.
    pub hide_timeout: Option<Duration>,
    pub devtools: bool,
    /// Tie visibility to tab activation and close on tab removal.
    pub associate_tab: bool,
    pub on_visibility_change: Option<VisibilityCallback>,
    pub on_hide: Option<HideCallback>,
}

impl ShowOptions {
    pub fn new(name: impl Into<String>, window: WindowId, bounds: Rect) -> Self {
        Self {
            name: name.into(),
            window,
            bounds,
            hide_timeout: None,
            devtools: false,
            associate_tab: false,
            on_visibility_change: None,
            on_hide: None,
        }
    }

    pub fn hide_timeout(mut self, timeout: Duration) -> Self {
        self.hide_timeout = Some(timeout);
        self
    }

    pub fn devtools(mut self, devtools: bool) -> Self {
        self.devtools = devtools;
        self
    }

    pub fn associate_tab(mut self, associate: bool) -> Self {
        self.associate_tab = associate;
        self
    }

    pub fn on_visibility_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(bool, TabId) -> Value + 'static,
    {
        self.on_visibility_change = Some(Box::new(callback));
        self
    }

    pub fn on_hide<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&Dialog) + 'static,
    {
        self.on_hide = Some(Box::new(callback));
        self
    }
}

/// Result of a successful `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shown {
    /// A new dialog was opened on this surface.
    Created(SurfaceId),
    /// The dialog was already open; the requesting tab joined it.
    Reused(SurfaceId),
}

impl Shown {
    pub fn surface(&self) -> SurfaceId {
        match self {
            Shown::Created(id) | Shown::Reused(id) => *id,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Shown::Created(_))
    }
}

/// Tab-manager subscriptions held by an `associate_tab` dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabSubscriptions {
    pub activated: SubscriptionId,
    pub removed: SubscriptionId,
}

/// A dynamic dialog: one pooled surface shared by the tabs that opened it.
pub struct Dialog {
    pub(crate) name: String,
    pub(crate) surface: SurfaceId,
    pub(crate) window: WindowId,
    pub(crate) tab_ids: BTreeSet<TabId>,
    /// Channels to remove at teardown, hide trigger first.
    pub(crate) channels: Vec<String>,
    pub(crate) subscriptions: Option<TabSubscriptions>,
    pub(crate) hide_timeout: Option<Duration>,
    pub(crate) on_visibility_change: Option<VisibilityCallback>,
    pub(crate) on_hide: Option<HideCallback>,
}

impl Dialog {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dialog's identity: the id of the surface it owns.
    pub fn id(&self) -> SurfaceId {
        self.surface
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn tab_ids(&self) -> &BTreeSet<TabId> {
        &self.tab_ids
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn associates_tab(&self) -> bool {
        self.subscriptions.is_some()
    }

    pub fn hide_timeout(&self) -> Option<Duration> {
        self.hide_timeout
    }

    /// Run the visibility callback, `Null` when there is none.
    pub(crate) fn visibility_data(&mut self, visible: bool, tab: TabId) -> Value {
        self.on_visibility_change
            .as_mut()
            .map_or(Value::Null, |cb| cb(visible, tab))
    }
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("name", &self.name)
            .field("surface", &self.surface)
            .field("window", &self.window)
            .field("tab_ids", &self.tab_ids)
            .field("channels", &self.channels)
            .field("subscriptions", &self.subscriptions)
            .finish_non_exhaustive()
    }
}
