//! Dialog lifecycle management.
//!
//! `DialogManager` owns the surface pool, the channel registry, the
//! registered host windows and every dialog record. All dialog operations
//! go through it; callbacks stored on a dialog never reach back into the
//! manager.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};
use veil_common::{DialogError, HostError, SurfaceId, TabId, WindowId};
use veil_config::VeilConfig;

use crate::channels::ChannelRegistry;
use crate::content::ContentOrigin;
use crate::dialog::Dialog;
use crate::events::DialogEvent;
use crate::host::{HostWindow, SurfaceConfig, SurfaceFactory};
use crate::persistent::PersistentDialog;
use crate::pool::SurfacePool;

mod channels;
mod hide;
mod lookup;
mod persistent;
mod show;
mod tabs;


pub struct DialogManager {
    pub(super) pool: SurfacePool,
    pub(super) channels: ChannelRegistry,
    pub(super) windows: HashMap<WindowId, Box<dyn HostWindow>>,
    /// Dynamic dialogs keyed by the surface they own.
    pub(super) dialogs: BTreeMap<SurfaceId, Dialog>,
    pub(super) persistent: Vec<PersistentDialog>,
    pub(super) origin: ContentOrigin,
    /// Lifecycle events. Unbounded; callers must `drain_events` regularly.
    pub(super) events: Vec<DialogEvent>,
    prewarm: usize,
    persistent_names: Vec<String>,
    started: bool,
}

impl DialogManager {
    pub fn new(factory: Box<dyn SurfaceFactory>, config: &VeilConfig) -> Self {
        Self {
            pool: SurfacePool::new(factory, &config.pool),
            channels: ChannelRegistry::new(),
            windows: HashMap::new(),
            dialogs: BTreeMap::new(),
            persistent: Vec::new(),
            origin: ContentOrigin::from_config(&config.content),
            events: Vec::new(),
            prewarm: config.pool.prewarm,
            persistent_names: config.dialogs.persistent.clone(),
            started: false,
        }
    }

    pub fn with_surface_config(mut self, config: SurfaceConfig) -> Self {
        self.pool = self.pool.with_surface_config(config);
        self
    }

    pub fn with_origin(mut self, origin: ContentOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn origin(&self) -> &ContentOrigin {
        &self.origin
    }

    /// Start the manager: warm the pool and create the persistent dialogs.
    /// Calling it again is a no-op.
    pub fn run(&mut self) -> Result<(), DialogError> {
        if self.started {
            return Ok(());
        }

        for surface in self.pool.ensure_warm(self.prewarm.max(1))? {
            self.events.push(DialogEvent::SurfaceCreated { surface });
        }

        for name in self.persistent_names.clone() {
            if self.persistent.iter().any(|p| p.name == name) {
                continue;
            }
            let mut surface = self.pool.create_detached()?;
            surface.load_url(&self.origin.url_for(&name))?;
            debug!(name = %name, surface = %surface.id(), "persistent dialog created");
            self.persistent.push(PersistentDialog::new(name, surface));
        }

        self.started = true;
        info!(
            pool = self.pool.len(),
            persistent = self.persistent.len(),
            "dialog manager started"
        );
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.started
    }

    /// Register a host window. Replaces any window with the same id.
    pub fn add_window(&mut self, window: impl HostWindow + 'static) {
        let id = window.id();
        if self.windows.insert(id, Box::new(window)).is_some() {
            warn!(window = %id, "window registered twice, replacing");
        }
        debug!(window = %id, "window registered");
    }

    /// Unregister a window, closing every dialog it holds.
    pub fn remove_window(&mut self, window: WindowId) -> Result<(), DialogError> {
        if !self.windows.contains_key(&window) {
            return Err(DialogError::UnknownWindow(window));
        }

        let owned: Vec<SurfaceId> = self
            .dialogs
            .values()
            .filter(|d| d.window == window)
            .map(|d| d.surface)
            .collect();

        let mut first_error = None;
        for surface in owned {
            if let Some(host) = self.windows.get_mut(&window) {
                if let Err(e) = host.remove_surface(surface) {
                    warn!(surface = %surface, error = %e, "detach failed while removing window");
                }
            }
            if let Err(e) = self.teardown(surface) {
                warn!(surface = %surface, error = %e, "teardown failed while removing window");
                first_error.get_or_insert(e);
            }
        }

        let shown: Vec<String> = self
            .persistent
            .iter()
            .filter(|p| p.window == Some(window))
            .map(|p| p.name.clone())
            .collect();
        for name in shown {
            if let Err(e) = self.hide_persistent(&name) {
                first_error.get_or_insert(e);
            }
        }

        self.windows.remove(&window);
        debug!(window = %window, "window removed");
        first_error.map_or(Ok(()), Err)
    }

    pub fn has_window(&self, window: WindowId) -> bool {
        self.windows.contains_key(&window)
    }

    /// The selected tab of a registered window.
    pub(super) fn current_tab(&self, window: WindowId) -> Result<TabId, DialogError> {
        let host = self
            .windows
            .get(&window)
            .ok_or(DialogError::UnknownWindow(window))?;
        host.current_tab().ok_or(DialogError::NoActiveTab(window))
    }

    /// Drain all pending lifecycle events. The queue is never trimmed on its
    /// own, so a long-lived manager should be drained every loop turn.
    pub fn drain_events(&mut self) -> Vec<DialogEvent> {
        std::mem::take(&mut self.events)
    }

    /// Send a message to every surface, pooled and persistent. Every
    /// surface is tried; the first failure is returned.
    pub fn send_to_all(&mut self, channel: &str, args: &[serde_json::Value]) -> Result<(), HostError> {
        let mut first_error = None;
        let surfaces = self
            .pool
            .iter_mut()
            .chain(self.persistent.iter_mut().map(|p| &mut p.surface));
        for surface in surfaces {
            if let Err(e) = surface.send(channel, args) {
                warn!(surface = %surface.id(), channel, error = %e, "broadcast failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Destroy every surface, dynamic and persistent. Used at shutdown.
    pub fn destroy(&mut self) {
        for dialog in std::mem::take(&mut self.dialogs).into_values() {
            for channel in &dialog.channels {
                self.channels.remove(channel);
            }
        }

        let mut failures = self.pool.destroy_all();
        for mut p in self.persistent.drain(..) {
            if let Err(e) = p.surface.destroy() {
                failures.push(e);
            }
        }
        for e in &failures {
            warn!(error = %e, "surface destroy failed during shutdown");
        }

        self.started = false;
        info!(failures = failures.len(), "dialog manager destroyed");
    }

    /// Ids of every live surface: the pool in creation order, then the
    /// persistent dialogs.
    pub fn surface_ids(&self) -> Vec<SurfaceId> {
        let mut ids = self.pool.ids();
        ids.extend(self.persistent.iter().map(|p| p.surface.id()));
        ids
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Pooled surfaces currently backing a dialog.
    pub fn pool_busy(&self) -> usize {
        self.pool.in_use_count()
    }

    /// `Some(in_use)` for pooled surfaces, `None` otherwise.
    pub fn pool_in_use(&self, surface: SurfaceId) -> Option<bool> {
        self.pool.is_in_use(surface)
    }

    /// Names of the open dynamic dialogs, sorted.
    pub fn dynamic_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dialogs.values().map(|d| d.name.clone()).collect();
        names.sort();
        names
    }

    /// Every registered channel, sorted.
    pub fn channels(&self) -> Vec<String> {
        self.channels.channels()
    }
}
