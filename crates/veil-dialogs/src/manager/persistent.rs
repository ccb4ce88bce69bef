use serde_json::json;
use tracing::debug;
use veil_common::{DialogError, Rect, WindowId};

use crate::channels::DIALOG_VISIBILITY_CHANGE;

use super::DialogManager;

impl DialogManager {
    /// Attach the persistent dialog `name` to `window` at `bounds`. If it is
    /// showing in another window it moves.
    pub fn show_persistent(
        &mut self,
        window: WindowId,
        name: &str,
        bounds: Rect,
    ) -> Result<(), DialogError> {
        if !self.windows.contains_key(&window) {
            return Err(DialogError::UnknownWindow(window));
        }
        let dialog = self
            .persistent
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| DialogError::UnknownPersistent(name.to_string()))?;
        let surface = dialog.surface.id();

        if let Some(previous) = dialog.window.filter(|w| *w != window) {
            if let Some(host) = self.windows.get_mut(&previous) {
                host.send(DIALOG_VISIBILITY_CHANGE, &[json!(name), json!(false)])?;
                host.remove_surface(surface)?;
            }
        }

        let host = self
            .windows
            .get_mut(&window)
            .ok_or(DialogError::UnknownWindow(window))?;
        host.send(DIALOG_VISIBILITY_CHANGE, &[json!(name), json!(true)])?;
        host.add_surface(surface)?;
        dialog.surface.set_bounds(bounds.snapped())?;
        dialog.surface.focus()?;

        dialog.visible = true;
        dialog.window = Some(window);
        debug!(name, surface = %surface, window = %window, "persistent dialog shown");
        Ok(())
    }

    /// Detach the persistent dialog `name`. Hiding a hidden dialog is a
    /// no-op.
    pub fn hide_persistent(&mut self, name: &str) -> Result<(), DialogError> {
        let dialog = self
            .persistent
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| DialogError::UnknownPersistent(name.to_string()))?;
        if !dialog.visible {
            return Ok(());
        }
        let surface = dialog.surface.id();

        // Flip state first so a vanished window cannot leave it stuck visible.
        dialog.visible = false;
        if let Some(host) = dialog.window.take().and_then(|w| self.windows.get_mut(&w)) {
            host.send(DIALOG_VISIBILITY_CHANGE, &[json!(name), json!(false)])?;
            host.remove_surface(surface)?;
        }
        debug!(name, surface = %surface, "persistent dialog hidden");
        Ok(())
    }
}
