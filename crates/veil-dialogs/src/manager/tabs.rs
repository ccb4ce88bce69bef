use serde_json::json;
use tracing::{debug, warn};
use veil_common::{DialogError, SurfaceId, TabId, WindowId};

use crate::channels::{DIALOG_VISIBILITY_CHANGE, VISIBILITY_CHANGED};
use crate::events::DialogEvent;
use crate::host::TabEvent;

use super::DialogManager;

impl DialogManager {
    /// Deliver a tab-manager notification from `window`.
    ///
    /// Only dialogs opened with `associate_tab` on that window react:
    /// activation re-evaluates their visibility, removal hides them for the
    /// removed tab. Every subscribed dialog is processed; the first failure
    /// is returned.
    pub fn handle_tab_event(&mut self, window: WindowId, event: TabEvent) -> Result<(), DialogError> {
        if !self.windows.contains_key(&window) {
            return Err(DialogError::UnknownWindow(window));
        }

        let subscribed: Vec<SurfaceId> = self
            .dialogs
            .values()
            .filter(|d| d.window == window && d.subscriptions.is_some())
            .map(|d| d.surface)
            .collect();

        let mut first_error = None;
        for surface in subscribed {
            let result = match event {
                TabEvent::Activated(tab) => self.on_tab_activated(surface, tab),
                TabEvent::Removed(tab) => self.hide(surface, Some(tab)),
            };
            if let Err(e) = result {
                warn!(surface = %surface, ?event, error = %e, "tab event handling failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn on_tab_activated(&mut self, surface: SurfaceId, tab: TabId) -> Result<(), DialogError> {
        let Some(dialog) = self.dialogs.get_mut(&surface) else {
            return Ok(());
        };
        let visible = dialog.tab_ids.contains(&tab);

        let window = self
            .windows
            .get_mut(&dialog.window)
            .ok_or(DialogError::UnknownWindow(dialog.window))?;
        window.send(DIALOG_VISIBILITY_CHANGE, &[json!(dialog.name), json!(visible)])?;

        let data = dialog.visibility_data(visible, tab);
        if let Some(host_surface) = self.pool.get_mut(surface) {
            host_surface.send(VISIBILITY_CHANGED, &[json!(visible), json!(tab), data])?;
        }

        // Re-attaching puts the surface back on top.
        window.remove_surface(surface)?;
        if visible {
            window.add_surface(surface)?;
        }

        debug!(name = %dialog.name, surface = %surface, tab = %tab, visible, "dialog visibility changed");
        self.events.push(DialogEvent::VisibilityChanged {
            name: dialog.name.clone(),
            visible,
            tab,
        });
        Ok(())
    }
}
