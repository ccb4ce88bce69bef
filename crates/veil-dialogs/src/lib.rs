//! Dialog and overlay multiplexing for Veil windows.
//!
//! Auxiliary UI (menus, search, previews) renders into embeddable content
//! surfaces laid over a host window. Instead of one live surface per
//! dialog, `DialogManager` keeps a small pool of warm surfaces and hands
//! them out on demand:
//! - Dynamic dialogs are created on `show`, reference-counted by tab, and
//!   torn down when the last tab lets go
//! - Persistent dialogs are created once at startup and only toggle
//!   visibility
//! - Each dialog gets a channel scope (`<event>-<surfaceId>`) for
//!   request/response and fire-and-forget traffic from its page
//!
//! The host windowing layer is reached only through the traits in
//! [`host`]; [`host::headless`] is an in-memory host for tests and tools.

pub mod channels;
pub mod content;
pub mod dialog;
pub mod events;
pub mod host;
pub mod ipc;
pub mod manager;
pub mod menu;
pub mod persistent;
pub mod pool;

pub use channels::{channel_name, ChannelRegistry};
pub use content::ContentOrigin;
pub use dialog::{Dialog, ShowOptions, Shown};
pub use events::DialogEvent;
pub use host::{HostWindow, Surface, SurfaceConfig, SurfaceFactory, TabEvent, TabEventKind};
pub use ipc::IpcMessage;
pub use manager::DialogManager;
pub use menu::show_menu_dialog;
pub use persistent::{DialogRef, Overlay, PersistentDialog};
pub use pool::SurfacePool;
