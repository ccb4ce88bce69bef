use veil_common::SurfaceId;

use crate::dialog::Dialog;
use crate::persistent::{DialogRef, PersistentDialog};

use super::DialogManager;

impl DialogManager {
    /// The dynamic dialog named `name`, else the persistent one.
    pub fn get(&self, name: &str) -> Option<DialogRef<'_>> {
        self.get_dynamic(name)
            .map(DialogRef::Dynamic)
            .or_else(|| self.get_persistent(name).map(DialogRef::Persistent))
    }

    pub fn get_dynamic(&self, name: &str) -> Option<&Dialog> {
        self.dialogs.values().find(|d| d.name == name)
    }

    pub fn get_persistent(&self, name: &str) -> Option<&PersistentDialog> {
        self.persistent.iter().find(|p| p.name == name)
    }

    /// The dynamic dialog owning `surface`.
    pub fn dialog(&self, surface: SurfaceId) -> Option<&Dialog> {
        self.dialogs.get(&surface)
    }

    /// An open dynamic dialog is always visible; otherwise the persistent
    /// dialog's flag decides. Unknown names are not visible.
    pub fn is_visible(&self, name: &str) -> bool {
        if self.get_dynamic(name).is_some() {
            return true;
        }
        self.get_persistent(name).is_some_and(|p| p.visible)
    }
}
