//! Capability surface of the host windowing layer.
//!
//! The dialog layer never creates windows or talks to a platform API
//! directly. It drives three traits: a factory for new surfaces, the
//! surfaces themselves, and the host windows they get attached to.

use serde_json::Value;
use veil_common::{Bounds, HostError, SubscriptionId, SurfaceId, TabId, WindowId};

pub mod headless;
#[cfg(feature = "wry")]
pub mod wry;

pub type Result<T> = std::result::Result<T, HostError>;

/// Page every pooled surface starts on and is reset to when recycled.
pub const BLANK_URL: &str = "about:blank";

/// Options for creating a new surface.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Whether the surface background should be transparent.
    pub transparent: bool,
    /// Whether to enable dev tools (always on in debug builds).
    pub devtools: bool,
    /// Custom user agent string.
    pub user_agent: Option<String>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            transparent: true,
            devtools: cfg!(debug_assertions),
            user_agent: Some("Veil/0.1".to_string()),
        }
    }
}

/// An embeddable content container bound to one content context.
pub trait Surface {
    fn id(&self) -> SurfaceId;
    fn load_url(&mut self, url: &str) -> Result<()>;
    fn set_bounds(&mut self, bounds: Bounds) -> Result<()>;
    /// Deliver a named message with arguments to the surface's page.
    fn send(&mut self, channel: &str, args: &[Value]) -> Result<()>;
    fn focus(&mut self) -> Result<()>;
    /// Open devtools, where the host has them.
    fn open_devtools(&mut self) {}
    /// Release the underlying host resources. Any later call fails.
    fn destroy(&mut self) -> Result<()>;
}

/// Creates surfaces. New surfaces show [`BLANK_URL`].
pub trait SurfaceFactory {
    fn create(&mut self, config: &SurfaceConfig) -> Result<Box<dyn Surface>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabEventKind {
    Activated,
    Removed,
}

/// Tab-manager notification from a host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabEvent {
    Activated(TabId),
    Removed(TabId),
}

impl TabEvent {
    pub fn kind(&self) -> TabEventKind {
        match self {
            TabEvent::Activated(_) => TabEventKind::Activated,
            TabEvent::Removed(_) => TabEventKind::Removed,
        }
    }

    pub fn tab(&self) -> TabId {
        match self {
            TabEvent::Activated(tab) | TabEvent::Removed(tab) => *tab,
        }
    }
}

/// A top-level browser window that surfaces are layered onto.
pub trait HostWindow {
    fn id(&self) -> WindowId;
    /// The selected tab, if the window has any.
    fn current_tab(&self) -> Option<TabId>;
    /// Attach a surface on top of the window's content.
    fn add_surface(&mut self, surface: SurfaceId) -> Result<()>;
    /// Detach a surface. Detaching a surface that is not attached is a no-op.
    fn remove_surface(&mut self, surface: SurfaceId) -> Result<()>;
    /// Send a named message to the window's own content.
    fn send(&mut self, channel: &str, args: &[Value]) -> Result<()>;
    fn subscribe(&mut self, kind: TabEventKind) -> Result<SubscriptionId>;
    fn unsubscribe(&mut self, subscription: SubscriptionId) -> Result<()>;
}
