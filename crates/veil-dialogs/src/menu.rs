//! The application menu dialog, anchored below its toolbar button.

use veil_common::{DialogError, Rect, WindowId};
use veil_config::MenuDialogConfig;

use crate::dialog::{ShowOptions, Shown};
use crate::manager::DialogManager;

pub const MENU_DIALOG: &str = "menu";
/// Horizontal overlap between a dialog and the button that opened it.
pub const DIALOG_MARGIN: i32 = 16;
/// Vertical lift of a dialog above its anchor point.
pub const DIALOG_MARGIN_TOP: i32 = 3;

/// Bounds of the menu for a button whose bottom-right corner is `(x, y)`.
/// The menu's right edge overhangs the anchor by `margin`.
pub fn menu_bounds(x: f64, y: f64, config: &MenuDialogConfig) -> Rect {
    let width = f64::from(config.width);
    Rect::new(
        x - width + f64::from(config.margin),
        y - f64::from(config.margin_top),
        width,
        f64::from(config.height),
    )
}

/// Open the menu dialog in `window`, anchored at `(x, y)`.
pub fn show_menu_dialog(
    manager: &mut DialogManager,
    window: WindowId,
    x: f64,
    y: f64,
    config: &MenuDialogConfig,
) -> Result<Shown, DialogError> {
    manager.show(ShowOptions::new(
        MENU_DIALOG,
        window,
        menu_bounds(x, y, config),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_common::Bounds;

    #[test]
    fn default_config_matches_margins() {
        let config = MenuDialogConfig::default();
        assert_eq!(config.margin, DIALOG_MARGIN);
        assert_eq!(config.margin_top, DIALOG_MARGIN_TOP);
    }

    #[test]
    fn menu_hangs_left_of_anchor() {
        let rect = menu_bounds(1200.0, 40.0, &MenuDialogConfig::default());
        assert_eq!(
            rect.snapped(),
            Bounds {
                x: 886,
                y: 37,
                width: 330,
                height: 470
            }
        );
    }

    #[test]
    fn fractional_anchor_is_snapped() {
        let rect = menu_bounds(400.5, 20.4, &MenuDialogConfig::default());
        let bounds = rect.snapped();
        assert_eq!((bounds.x, bounds.y), (87, 17));
    }
}
