//! Host backed by `wry` child webviews.
//!
//! Every surface is a child `WebView` of one parent window. Attaching and
//! detaching map to webview visibility, since child webviews always live
//! inside their parent. JS -> Rust messages are validated and queued in a
//! shared sink for the application loop to drain.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, warn};
use veil_common::{Bounds, HostError, SubscriptionId, SurfaceId, TabId, WindowId};
use wry::raw_window_handle;
use wry::{WebView, WebViewBuilder};

use super::{HostWindow, Result, Surface, SurfaceConfig, SurfaceFactory, TabEventKind, BLANK_URL};
use crate::events::SurfaceEvent;
use crate::ipc::{js_dispatch_message, IPC_INIT_SCRIPT};

type WebViewTable = Rc<RefCell<HashMap<SurfaceId, Rc<WebView>>>>;

fn host_err(err: wry::Error) -> HostError {
    HostError::Ipc(err.to_string())
}

/// Convert integer bounds to a logical `wry::Rect`.
pub fn bounds_to_wry(bounds: Bounds) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(
            f64::from(bounds.x),
            f64::from(bounds.y),
        )),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(
            f64::from(bounds.width),
            f64::from(bounds.height),
        )),
    }
}

/// Builds child webviews inside `parent`.
pub struct WrySurfaceFactory<W: raw_window_handle::HasWindowHandle> {
    parent: Rc<W>,
    table: WebViewTable,
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
    next_id: u32,
}

impl<W: raw_window_handle::HasWindowHandle> WrySurfaceFactory<W> {
    pub fn new(parent: Rc<W>) -> Self {
        Self {
            parent,
            table: Rc::new(RefCell::new(HashMap::new())),
            events: Arc::new(Mutex::new(Vec::new())),
            next_id: 0,
        }
    }

    /// A window handle sharing this factory's webviews.
    pub fn window(&self, id: WindowId) -> WryWindow {
        WryWindow {
            id,
            table: Rc::clone(&self.table),
            chrome: None,
            current_tab: None,
            next_subscription: 0,
        }
    }

    /// Drain all pending surface events.
    pub fn drain_events(&self) -> Vec<SurfaceEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => Vec::new(),
        }
    }
}

impl<W: raw_window_handle::HasWindowHandle> SurfaceFactory for WrySurfaceFactory<W> {
    fn create(&mut self, config: &SurfaceConfig) -> Result<Box<dyn Surface>> {
        self.next_id += 1;
        let id = SurfaceId(self.next_id);
        let events = Arc::clone(&self.events);

        let mut builder = WebViewBuilder::new()
            .with_url(BLANK_URL)
            .with_transparent(config.transparent)
            .with_devtools(config.devtools)
            .with_visible(false)
            .with_focused(false)
            .with_initialization_script(IPC_INIT_SCRIPT);

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = builder.with_ipc_handler(move |request| {
            let body = request.body().to_string();
            if serde_json::from_str::<Value>(&body).is_err() {
                warn!(surface = %id, body_len = body.len(), "IPC message rejected: invalid JSON");
                return;
            }
            if let Ok(mut evts) = events.lock() {
                evts.push(SurfaceEvent::Ipc { surface: id, body });
            }
        });

        let webview = builder
            .build_as_child(self.parent.as_ref())
            .map_err(|e| HostError::SurfaceCreation(e.to_string()))?;
        let webview = Rc::new(webview);
        self.table.borrow_mut().insert(id, Rc::clone(&webview));

        debug!(surface = %id, "webview surface created");
        Ok(Box::new(WrySurface {
            id,
            webview: Some(webview),
            table: Rc::clone(&self.table),
        }))
    }
}

pub struct WrySurface {
    id: SurfaceId,
    webview: Option<Rc<WebView>>,
    table: WebViewTable,
}

impl WrySurface {
    fn webview(&self) -> Result<&WebView> {
        self.webview
            .as_deref()
            .ok_or(HostError::SurfaceDestroyed(self.id))
    }
}

impl Surface for WrySurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn load_url(&mut self, url: &str) -> Result<()> {
        self.webview()?
            .load_url(url)
            .map_err(|e| HostError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    fn set_bounds(&mut self, bounds: Bounds) -> Result<()> {
        self.webview()?
            .set_bounds(bounds_to_wry(bounds))
            .map_err(host_err)
    }

    fn send(&mut self, channel: &str, args: &[Value]) -> Result<()> {
        let script = js_dispatch_message(channel, args);
        self.webview()?.evaluate_script(&script).map_err(host_err)
    }

    fn focus(&mut self) -> Result<()> {
        self.webview()?.focus().map_err(host_err)
    }

    #[cfg(debug_assertions)]
    fn open_devtools(&mut self) {
        if let Ok(webview) = self.webview() {
            webview.open_devtools();
        }
    }

    fn destroy(&mut self) -> Result<()> {
        self.table.borrow_mut().remove(&self.id);
        match self.webview.take() {
            Some(_) => Ok(()),
            None => Err(HostError::SurfaceDestroyed(self.id)),
        }
    }
}

/// The parent window. Its own content, when it is a webview too, receives
/// window-level messages.
pub struct WryWindow {
    id: WindowId,
    table: WebViewTable,
    chrome: Option<Rc<WebView>>,
    current_tab: Option<TabId>,
    next_subscription: u64,
}

impl WryWindow {
    pub fn set_chrome(&mut self, chrome: Rc<WebView>) {
        self.chrome = Some(chrome);
    }

    /// Record the selected tab. The caller forwards the matching
    /// `TabEvent` to the dialog manager.
    pub fn set_current_tab(&mut self, tab: Option<TabId>) {
        self.current_tab = tab;
    }

    /// Child webviews cannot be restacked, so attach and detach are
    /// visibility toggles. Showing also takes focus, which is as close to
    /// raising the surface as this backend gets.
    fn set_visible(&self, surface: SurfaceId, visible: bool) -> Result<()> {
        let table = self.table.borrow();
        match table.get(&surface) {
            Some(webview) => {
                webview.set_visible(visible).map_err(host_err)?;
                if visible {
                    webview.focus().map_err(host_err)?;
                }
                Ok(())
            }
            None if visible => Err(HostError::SurfaceDestroyed(surface)),
            None => Ok(()),
        }
    }
}

impl HostWindow for WryWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn current_tab(&self) -> Option<TabId> {
        self.current_tab
    }

    fn add_surface(&mut self, surface: SurfaceId) -> Result<()> {
        self.set_visible(surface, true)
    }

    fn remove_surface(&mut self, surface: SurfaceId) -> Result<()> {
        self.set_visible(surface, false)
    }

    fn send(&mut self, channel: &str, args: &[Value]) -> Result<()> {
        match &self.chrome {
            Some(chrome) => chrome
                .evaluate_script(&js_dispatch_message(channel, args))
                .map_err(host_err),
            None => {
                debug!(window = %self.id, channel, "no chrome webview, message dropped");
                Ok(())
            }
        }
    }

    fn subscribe(&mut self, _kind: TabEventKind) -> Result<SubscriptionId> {
        self.next_subscription += 1;
        Ok(SubscriptionId(self.next_subscription))
    }

    fn unsubscribe(&mut self, _subscription: SubscriptionId) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_convert_to_logical_rect() {
        let rect = bounds_to_wry(Bounds {
            x: 100,
            y: -3,
            width: 330,
            height: 470,
        });
        match rect.position {
            wry::dpi::Position::Logical(pos) => {
                assert!((pos.x - 100.0).abs() < f64::EPSILON);
                assert!((pos.y + 3.0).abs() < f64::EPSILON);
            }
            _ => panic!("Expected logical position"),
        }
        match rect.size {
            wry::dpi::Size::Logical(size) => {
                assert!((size.width - 330.0).abs() < f64::EPSILON);
                assert!((size.height - 470.0).abs() < f64::EPSILON);
            }
            _ => panic!("Expected logical size"),
        }
    }
}
