//! Dialog lifecycle and surface event types.

use veil_common::{SurfaceId, TabId};

/// Lifecycle events recorded by the `DialogManager`, drained by the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// The pool grew by one surface.
    SurfaceCreated { surface: SurfaceId },
    /// A released surface was destroyed because the pool was over its floor.
    SurfaceDestroyed { surface: SurfaceId },
    /// A new dynamic dialog was opened.
    Opened {
        name: String,
        surface: SurfaceId,
        tab: TabId,
    },
    /// An open dialog was shown for another tab.
    Reused {
        name: String,
        surface: SurfaceId,
        tab: TabId,
    },
    /// A tab let go of a dialog that other tabs still hold.
    Hidden {
        name: String,
        surface: SurfaceId,
        tab: TabId,
    },
    /// The last tab let go; the dialog is gone and its surface released.
    Closed { name: String, surface: SurfaceId },
    /// Tab activation flipped a dialog's visibility.
    VisibilityChanged {
        name: String,
        visible: bool,
        tab: TabId,
    },
}

/// Raw events produced by a host surface.
#[derive(Debug, Clone)]
pub enum SurfaceEvent {
    /// A JSON message posted by the page.
    Ipc { surface: SurfaceId, body: String },
}
