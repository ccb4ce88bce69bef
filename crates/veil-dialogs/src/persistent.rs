//! Persistent dialogs and the unified dialog view.

use veil_common::{SurfaceId, WindowId};

use crate::dialog::Dialog;
use crate::host::Surface;

/// An always-resident overlay. Its surface is created once at startup,
/// never pooled, and lives until the manager is destroyed.
pub struct PersistentDialog {
    pub(crate) name: String,
    pub(crate) surface: Box<dyn Surface>,
    pub(crate) visible: bool,
    /// The window it is currently attached to, while visible.
    pub(crate) window: Option<WindowId>,
}

impl PersistentDialog {
    pub(crate) fn new(name: impl Into<String>, surface: Box<dyn Surface>) -> Self {
        Self {
            name: name.into(),
            surface,
            visible: false,
            window: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface.id()
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn window(&self) -> Option<WindowId> {
        self.window
    }
}

/// What every dialog, dynamic or persistent, can answer.
///
/// Hiding needs the pool, the window and the channels, so it lives on the
/// manager: `DialogManager::hide_by_name` dispatches to either kind.
pub trait Overlay {
    fn name(&self) -> &str;
    fn surface_id(&self) -> SurfaceId;
    fn is_visible(&self) -> bool;
}

impl Overlay for Dialog {
    fn name(&self) -> &str {
        &self.name
    }

    fn surface_id(&self) -> SurfaceId {
        self.surface
    }

    /// A dynamic dialog exists only while some tab holds it open.
    fn is_visible(&self) -> bool {
        true
    }
}

impl Overlay for PersistentDialog {
    fn name(&self) -> &str {
        &self.name
    }

    fn surface_id(&self) -> SurfaceId {
        self.surface.id()
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Result of a unified lookup.
#[derive(Clone, Copy)]
pub enum DialogRef<'a> {
    Dynamic(&'a Dialog),
    Persistent(&'a PersistentDialog),
}

impl DialogRef<'_> {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, DialogRef::Dynamic(_))
    }

    fn overlay(&self) -> &dyn Overlay {
        match self {
            DialogRef::Dynamic(d) => *d,
            DialogRef::Persistent(p) => *p,
        }
    }
}

impl Overlay for DialogRef<'_> {
    fn name(&self) -> &str {
        self.overlay().name()
    }

    fn surface_id(&self) -> SurfaceId {
        self.overlay().surface_id()
    }

    fn is_visible(&self) -> bool {
        self.overlay().is_visible()
    }
}

impl std::fmt::Debug for DialogRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialogRef::Dynamic(d) => f.debug_tuple("Dynamic").field(d).finish(),
            DialogRef::Persistent(p) => f
                .debug_tuple("Persistent")
                .field(&p.name)
                .field(&p.visible)
                .finish(),
        }
    }
}
