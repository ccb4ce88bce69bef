//! Dialog catalogue: persistent overlays and per-dialog geometry.

use serde::{Deserialize, Serialize};

/// Geometry of the main menu dialog, anchored to its toolbar button.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuDialogConfig {
    pub width: u32,
    pub height: u32,
    /// Horizontal overhang past the anchor's right edge.
    pub margin: i32,
    /// Vertical offset above the anchor's bottom edge.
    pub margin_top: i32,
}

impl Default for MenuDialogConfig {
    fn default() -> Self {
        Self {
            width: 330,
            height: 470,
            margin: 16,
            margin_top: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogsConfig {
    /// Always-resident dialogs created once at startup.
    pub persistent: Vec<String>,
    pub menu: MenuDialogConfig,
}

impl Default for DialogsConfig {
    fn default() -> Self {
        Self {
            persistent: vec!["search".into(), "preview".into()],
            menu: MenuDialogConfig::default(),
        }
    }
}
