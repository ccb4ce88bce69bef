use std::collections::BTreeSet;

use serde_json::json;
use tracing::{debug, info, warn};
use veil_common::{Bounds, DialogError, SurfaceId, TabId};

use crate::channels::{DIALOG_VISIBILITY_CHANGE, VISIBILITY_CHANGED};
use crate::dialog::{Dialog, ShowOptions, Shown, TabSubscriptions};
use crate::events::DialogEvent;
use crate::host::TabEventKind;
use crate::pool::Released;

use super::DialogManager;

impl DialogManager {
    /// Show the dialog `options.name` for the window's selected tab.
    ///
    /// If a dialog with that name is already open, the tab joins it and the
    /// existing surface is re-attached at the new bounds; nothing is
    /// reloaded. Otherwise a pooled surface is claimed and loaded with the
    /// dialog's page.
    pub fn show(&mut self, options: ShowOptions) -> Result<Shown, DialogError> {
        if options.name.is_empty() {
            return Err(DialogError::EmptyName);
        }
        let tab = self.current_tab(options.window)?;

        match self.find_dynamic(&options.name) {
            Some(surface) => self.show_existing(surface, tab, options),
            None => self.show_fresh(tab, options),
        }
    }

    pub(super) fn find_dynamic(&self, name: &str) -> Option<SurfaceId> {
        self.dialogs
            .values()
            .find(|d| d.name == name)
            .map(|d| d.surface)
    }

    fn show_existing(
        &mut self,
        surface: SurfaceId,
        tab: TabId,
        options: ShowOptions,
    ) -> Result<Shown, DialogError> {
        let dialog = self
            .dialogs
            .get_mut(&surface)
            .ok_or(DialogError::UnknownDialog(surface))?;
        if dialog.window != options.window {
            return Err(DialogError::ForeignWindow {
                name: dialog.name.clone(),
                owner: dialog.window,
            });
        }

        dialog.tab_ids.insert(tab);
        if options.on_visibility_change.is_some() {
            dialog.on_visibility_change = options.on_visibility_change;
        }
        if options.on_hide.is_some() {
            dialog.on_hide = options.on_hide;
        }

        let window = self
            .windows
            .get_mut(&dialog.window)
            .ok_or(DialogError::UnknownWindow(dialog.window))?;
        window.send(DIALOG_VISIBILITY_CHANGE, &[json!(dialog.name), json!(true)])?;
        window.add_surface(surface)?;

        let host_surface = self
            .pool
            .get_mut(surface)
            .ok_or(DialogError::UnknownDialog(surface))?;
        host_surface.set_bounds(options.bounds.snapped())?;
        let data = dialog.visibility_data(true, tab);
        host_surface.send(VISIBILITY_CHANGED, &[json!(true), json!(tab), data])?;

        debug!(name = %dialog.name, surface = %surface, tab = %tab, "dialog reused");
        self.events.push(DialogEvent::Reused {
            name: dialog.name.clone(),
            surface,
            tab,
        });
        Ok(Shown::Reused(surface))
    }

    fn show_fresh(&mut self, tab: TabId, options: ShowOptions) -> Result<Shown, DialogError> {
        let claimed = self.pool.claim_free()?;
        let surface = claimed.surface;
        if claimed.created {
            self.events.push(DialogEvent::SurfaceCreated { surface });
        }

        let mut dialog = Dialog {
            name: options.name,
            surface,
            window: options.window,
            tab_ids: BTreeSet::from([tab]),
            channels: Vec::new(),
            subscriptions: None,
            hide_timeout: options.hide_timeout,
            on_visibility_change: options.on_visibility_change,
            on_hide: options.on_hide,
        };

        let opened = self.open(
            &mut dialog,
            options.bounds.snapped(),
            options.devtools,
            options.associate_tab,
        );
        if let Err(e) = opened {
            self.abandon(dialog);
            return Err(e);
        }

        info!(name = %dialog.name, surface = %surface, tab = %tab, "dialog opened");
        self.events.push(DialogEvent::Opened {
            name: dialog.name.clone(),
            surface,
            tab,
        });
        self.dialogs.insert(surface, dialog);
        Ok(Shown::Created(surface))
    }

    /// Host-side setup of a freshly claimed surface.
    fn open(
        &mut self,
        dialog: &mut Dialog,
        bounds: Bounds,
        devtools: bool,
        associate_tab: bool,
    ) -> Result<(), DialogError> {
        let surface = dialog.surface;
        let url = self.origin.url_for(&dialog.name);

        let window = self
            .windows
            .get_mut(&dialog.window)
            .ok_or(DialogError::UnknownWindow(dialog.window))?;
        window.send(DIALOG_VISIBILITY_CHANGE, &[json!(dialog.name), json!(true)])?;
        window.add_surface(surface)?;

        let host_surface = self
            .pool
            .get_mut(surface)
            .ok_or(DialogError::UnknownDialog(surface))?;
        host_surface.set_bounds(bounds)?;
        host_surface.load_url(&url)?;
        host_surface.focus()?;
        if devtools {
            host_surface.open_devtools();
        }

        let hide_channel = self.channels.register_hide(surface)?;
        dialog.channels.push(hide_channel);

        if associate_tab {
            let activated = window.subscribe(TabEventKind::Activated)?;
            let removed = match window.subscribe(TabEventKind::Removed) {
                Ok(id) => id,
                Err(e) => {
                    if let Err(unsub) = window.unsubscribe(activated) {
                        warn!(surface = %surface, error = %unsub, "unsubscribe failed");
                    }
                    return Err(e.into());
                }
            };
            dialog.subscriptions = Some(TabSubscriptions { activated, removed });
        }

        debug!(name = %dialog.name, surface = %surface, url = %url, "dialog content loading");
        Ok(())
    }

    /// Undo a partially opened dialog and return its surface to the pool.
    /// Secondary failures are logged; the caller reports the original one.
    fn abandon(&mut self, dialog: Dialog) {
        let surface = dialog.surface;
        for channel in &dialog.channels {
            self.channels.remove(channel);
        }

        if let Some(window) = self.windows.get_mut(&dialog.window) {
            if let Some(subs) = dialog.subscriptions {
                for id in [subs.activated, subs.removed] {
                    if let Err(e) = window.unsubscribe(id) {
                        warn!(surface = %surface, error = %e, "unsubscribe failed");
                    }
                }
            }
            if let Err(e) = window.remove_surface(surface) {
                warn!(surface = %surface, error = %e, "detach failed");
            }
            if let Err(e) = window.send(DIALOG_VISIBILITY_CHANGE, &[json!(dialog.name), json!(false)]) {
                warn!(surface = %surface, error = %e, "visibility rollback failed");
            }
        }

        match self.pool.release(surface) {
            Ok(Released::Destroyed) => {
                self.events.push(DialogEvent::SurfaceDestroyed { surface });
            }
            Ok(_) => {}
            Err(e) => warn!(surface = %surface, error = %e, "release failed"),
        }
        warn!(name = %dialog.name, surface = %surface, "dialog abandoned after failed show");
    }
}
