//! Scripted dialog session against the in-memory host.
//!
//! Opens the menu from two tabs, talks to it over its channels, hides it
//! again and toggles a persistent dialog, logging every lifecycle event.
//! Useful for checking a config without a windowing system.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;
use veil_common::{Rect, TabId, VeilError, WindowId};
use veil_config::VeilConfig;
use veil_dialogs::host::headless::Headless;
use veil_dialogs::{show_menu_dialog, DialogManager};

const WINDOW: WindowId = WindowId(1);

/// End state of a simulated session.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub pool_size: usize,
    pub surfaces_in_use: usize,
    pub open_dialogs: Vec<String>,
    pub channels: Vec<String>,
    pub live_surfaces: usize,
    pub events: usize,
}

pub fn run(config: &VeilConfig) -> Result<Summary, VeilError> {
    let host = Headless::new();
    let mut manager = DialogManager::new(Box::new(host.factory()), config);
    manager.add_window(host.window(WINDOW, Some(TabId(1))));
    manager.run()?;

    let menu = show_menu_dialog(&mut manager, WINDOW, 1200.0, 40.0, &config.dialogs.menu)?.surface();
    let channel = manager.handle(menu, "get-tabs", |_: &[Value]| json!([1, 2]))?;
    let request = json!({ "channel": channel, "expects_reply": true });
    manager.dispatch_ipc(menu, &request.to_string())?;

    host.set_current_tab(WINDOW, Some(TabId(2)));
    show_menu_dialog(&mut manager, WINDOW, 1200.0, 40.0, &config.dialogs.menu)?;

    manager.hide(menu, Some(TabId(1)))?;
    manager.hide(menu, Some(TabId(2)))?;

    if let Some(name) = config.dialogs.persistent.first() {
        manager.show_persistent(WINDOW, name, Rect::new(0.0, 0.0, 640.0, 42.0))?;
        manager.hide_persistent(name)?;
    }

    let events = manager.drain_events();
    for event in &events {
        info!(?event, "dialog event");
    }

    let summary = Summary {
        pool_size: manager.pool_len(),
        surfaces_in_use: manager.pool_busy(),
        open_dialogs: manager.dynamic_names(),
        channels: manager.channels(),
        live_surfaces: host.live_surfaces().len(),
        events: events.len(),
    };

    manager.destroy();
    Ok(summary)
}
