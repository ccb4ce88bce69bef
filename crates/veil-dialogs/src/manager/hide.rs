use serde_json::json;
use tracing::{debug, info, warn};
use veil_common::{DialogError, SurfaceId, TabId};

use crate::channels::DIALOG_VISIBILITY_CHANGE;
use crate::events::DialogEvent;
use crate::pool::Released;

use super::DialogManager;

impl DialogManager {
    /// Hide the dialog on `surface` for `tab`, or for the window's selected
    /// tab when `tab` is `None`.
    ///
    /// The surface is detached when the tab being removed is the selected
    /// one, or when no tab holds the dialog any more; the window hears
    /// `(name, false)` whenever it is. An emptied dialog is torn down and
    /// its surface returned to the pool. Hiding a dialog that is already gone
    /// is a no-op.
    pub fn hide(&mut self, surface: SurfaceId, tab: Option<TabId>) -> Result<(), DialogError> {
        let Some(dialog) = self.dialogs.get_mut(&surface) else {
            debug!(surface = %surface, "hide ignored: no such dialog");
            return Ok(());
        };

        let window = self
            .windows
            .get_mut(&dialog.window)
            .ok_or(DialogError::UnknownWindow(dialog.window))?;
        let selected = window.current_tab();
        let Some(target) = tab.or(selected) else {
            return Err(DialogError::NoActiveTab(dialog.window));
        };

        dialog.tab_ids.remove(&target);
        let active = selected == Some(target);

        if active {
            window.send(DIALOG_VISIBILITY_CHANGE, &[json!(dialog.name), json!(false)])?;
            window.remove_surface(surface)?;
        }

        if !dialog.tab_ids.is_empty() {
            debug!(name = %dialog.name, surface = %surface, tab = %target, "dialog hidden for tab");
            self.events.push(DialogEvent::Hidden {
                name: dialog.name.clone(),
                surface,
                tab: target,
            });
            return Ok(());
        }

        if !active {
            // Last holder left from the background; nothing may stay on screen.
            window.send(DIALOG_VISIBILITY_CHANGE, &[json!(dialog.name), json!(false)])?;
            window.remove_surface(surface)?;
        }

        self.teardown(surface)
    }

    /// Hide a dialog by name, dynamic or persistent. Unknown names are a
    /// no-op.
    pub fn hide_by_name(&mut self, name: &str, tab: Option<TabId>) -> Result<(), DialogError> {
        if let Some(surface) = self.find_dynamic(name) {
            return self.hide(surface, tab);
        }
        if self.persistent.iter().any(|p| p.name == name) {
            return self.hide_persistent(name);
        }
        debug!(name, "hide ignored: no such dialog");
        Ok(())
    }

    /// Remove a dialog completely: its channels, its registry entry, its
    /// surface claim, then its tab subscriptions. `on_hide` runs last.
    ///
    /// Every step is attempted; the first failure is returned.
    pub(super) fn teardown(&mut self, surface: SurfaceId) -> Result<(), DialogError> {
        let Some(dialog) = self.dialogs.get(&surface) else {
            return Ok(());
        };
        for channel in &dialog.channels {
            self.channels.remove(channel);
        }
        let Some(mut dialog) = self.dialogs.remove(&surface) else {
            return Ok(());
        };

        let mut first_error: Option<DialogError> = None;

        match self.pool.release(surface) {
            Ok(Released::Destroyed) => {
                self.events.push(DialogEvent::SurfaceDestroyed { surface });
            }
            Ok(_) => {}
            Err(e) => {
                warn!(surface = %surface, error = %e, "release failed");
                first_error.get_or_insert(e.into());
            }
        }

        if let Some(subs) = dialog.subscriptions {
            match self.windows.get_mut(&dialog.window) {
                Some(window) => {
                    for id in [subs.activated, subs.removed] {
                        if let Err(e) = window.unsubscribe(id) {
                            warn!(surface = %surface, error = %e, "unsubscribe failed");
                            first_error.get_or_insert(e.into());
                        }
                    }
                }
                None => {
                    first_error.get_or_insert(DialogError::UnknownWindow(dialog.window));
                }
            }
        }

        info!(name = %dialog.name, surface = %surface, "dialog closed");
        self.events.push(DialogEvent::Closed {
            name: dialog.name.clone(),
            surface,
        });

        if let Some(on_hide) = dialog.on_hide.take() {
            on_hide(&dialog);
        }

        first_error.map_or(Ok(()), Err)
    }
}
