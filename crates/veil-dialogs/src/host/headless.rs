//! In-memory host.
//!
//! Records every call the dialog layer makes so tests and the `simulate`
//! command can inspect the resulting host state. All handles created from
//! one [`Headless`] share the same state.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;
use tracing::trace;
use veil_common::{Bounds, HostError, SubscriptionId, SurfaceId, TabId, WindowId};

use super::{HostWindow, Result, Surface, SurfaceConfig, SurfaceFactory, TabEventKind, BLANK_URL};

/// A message delivered to a window or surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub channel: String,
    pub args: Vec<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct SurfaceRecord {
    pub url: String,
    /// Every URL ever loaded, in order.
    pub history: Vec<String>,
    pub bounds: Option<Bounds>,
    pub messages: Vec<Message>,
    pub focus_count: u32,
    pub devtools_open: bool,
    pub destroyed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct WindowRecord {
    pub current_tab: Option<TabId>,
    /// Attached surfaces, bottom to top.
    pub attached: Vec<SurfaceId>,
    pub messages: Vec<Message>,
    pub subscriptions: BTreeMap<SubscriptionId, TabEventKind>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    next_surface: u32,
    next_subscription: u64,
    surfaces: BTreeMap<SurfaceId, SurfaceRecord>,
    windows: BTreeMap<WindowId, WindowRecord>,
    fail_next_create: bool,
    fail_next_attach: bool,
}

/// Shared handle to the in-memory host state.
#[derive(Clone, Default)]
pub struct Headless {
    state: Rc<RefCell<HeadlessState>>,
}

impl Headless {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn factory(&self) -> HeadlessSurfaceFactory {
        HeadlessSurfaceFactory {
            state: Rc::clone(&self.state),
        }
    }

    /// Create a window whose selected tab is `tab`.
    pub fn window(&self, id: WindowId, tab: Option<TabId>) -> HeadlessWindow {
        self.state.borrow_mut().windows.insert(
            id,
            WindowRecord {
                current_tab: tab,
                ..Default::default()
            },
        );
        HeadlessWindow {
            id,
            state: Rc::clone(&self.state),
        }
    }

    /// Change a window's selected tab. Does not emit a tab event.
    pub fn set_current_tab(&self, window: WindowId, tab: Option<TabId>) {
        if let Some(record) = self.state.borrow_mut().windows.get_mut(&window) {
            record.current_tab = tab;
        }
    }

    pub fn surface(&self, id: SurfaceId) -> Option<SurfaceRecord> {
        self.state.borrow().surfaces.get(&id).cloned()
    }

    pub fn window_record(&self, id: WindowId) -> Option<WindowRecord> {
        self.state.borrow().windows.get(&id).cloned()
    }

    /// Surfaces created and not yet destroyed.
    pub fn live_surfaces(&self) -> Vec<SurfaceId> {
        self.state
            .borrow()
            .surfaces
            .iter()
            .filter(|(_, s)| !s.destroyed)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn attached(&self, window: WindowId) -> Vec<SurfaceId> {
        self.state
            .borrow()
            .windows
            .get(&window)
            .map(|w| w.attached.clone())
            .unwrap_or_default()
    }

    pub fn live_subscriptions(&self, window: WindowId) -> usize {
        self.state
            .borrow()
            .windows
            .get(&window)
            .map_or(0, |w| w.subscriptions.len())
    }

    /// Make the next surface creation fail.
    pub fn fail_next_create(&self) {
        self.state.borrow_mut().fail_next_create = true;
    }

    /// Make the next `add_surface` on any window fail.
    pub fn fail_next_attach(&self) {
        self.state.borrow_mut().fail_next_attach = true;
    }
}

pub struct HeadlessSurfaceFactory {
    state: Rc<RefCell<HeadlessState>>,
}

impl SurfaceFactory for HeadlessSurfaceFactory {
    fn create(&mut self, _config: &SurfaceConfig) -> Result<Box<dyn Surface>> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_next_create) {
            return Err(HostError::SurfaceCreation("injected failure".into()));
        }
        state.next_surface += 1;
        let id = SurfaceId(state.next_surface);
        state.surfaces.insert(
            id,
            SurfaceRecord {
                url: BLANK_URL.to_string(),
                history: vec![BLANK_URL.to_string()],
                ..Default::default()
            },
        );
        trace!(surface = %id, "headless surface created");
        Ok(Box::new(HeadlessSurface {
            id,
            state: Rc::clone(&self.state),
        }))
    }
}

pub struct HeadlessSurface {
    id: SurfaceId,
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessSurface {
    fn with_record<T>(&self, f: impl FnOnce(&mut SurfaceRecord) -> T) -> Result<T> {
        let mut state = self.state.borrow_mut();
        match state.surfaces.get_mut(&self.id) {
            Some(record) if !record.destroyed => Ok(f(record)),
            _ => Err(HostError::SurfaceDestroyed(self.id)),
        }
    }
}

impl Surface for HeadlessSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn load_url(&mut self, url: &str) -> Result<()> {
        self.with_record(|r| {
            r.url = url.to_string();
            r.history.push(url.to_string());
        })
    }

    fn set_bounds(&mut self, bounds: Bounds) -> Result<()> {
        self.with_record(|r| r.bounds = Some(bounds))
    }

    fn send(&mut self, channel: &str, args: &[Value]) -> Result<()> {
        self.with_record(|r| {
            r.messages.push(Message {
                channel: channel.to_string(),
                args: args.to_vec(),
            })
        })
    }

    fn focus(&mut self) -> Result<()> {
        self.with_record(|r| r.focus_count += 1)
    }

    fn open_devtools(&mut self) {
        let _ = self.with_record(|r| r.devtools_open = true);
    }

    fn destroy(&mut self) -> Result<()> {
        self.with_record(|r| r.destroyed = true)?;
        // A destroyed surface disappears from every window.
        for window in self.state.borrow_mut().windows.values_mut() {
            window.attached.retain(|s| *s != self.id);
        }
        Ok(())
    }
}

pub struct HeadlessWindow {
    id: WindowId,
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessWindow {
    fn with_record<T>(&self, f: impl FnOnce(&mut WindowRecord) -> T) -> Result<T> {
        let mut state = self.state.borrow_mut();
        state
            .windows
            .get_mut(&self.id)
            .map(f)
            .ok_or_else(|| HostError::Window(format!("{} is closed", self.id)))
    }
}

impl HostWindow for HeadlessWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn current_tab(&self) -> Option<TabId> {
        self.state
            .borrow()
            .windows
            .get(&self.id)
            .and_then(|w| w.current_tab)
    }

    fn add_surface(&mut self, surface: SurfaceId) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            if std::mem::take(&mut state.fail_next_attach) {
                return Err(HostError::Window("injected attach failure".into()));
            }
            match state.surfaces.get(&surface) {
                Some(record) if !record.destroyed => {}
                _ => return Err(HostError::SurfaceDestroyed(surface)),
            }
        }
        self.with_record(|w| {
            if !w.attached.contains(&surface) {
                w.attached.push(surface);
            }
        })
    }

    fn remove_surface(&mut self, surface: SurfaceId) -> Result<()> {
        self.with_record(|w| w.attached.retain(|s| *s != surface))
    }

    fn send(&mut self, channel: &str, args: &[Value]) -> Result<()> {
        self.with_record(|w| {
            w.messages.push(Message {
                channel: channel.to_string(),
                args: args.to_vec(),
            })
        })
    }

    fn subscribe(&mut self, kind: TabEventKind) -> Result<SubscriptionId> {
        let id = {
            let mut state = self.state.borrow_mut();
            state.next_subscription += 1;
            SubscriptionId(state.next_subscription)
        };
        self.with_record(|w| {
            w.subscriptions.insert(id, kind);
        })?;
        Ok(id)
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) -> Result<()> {
        self.with_record(|w| {
            w.subscriptions.remove(&subscription);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn surfaces_start_blank_with_increasing_ids() {
        let host = Headless::new();
        let mut factory = host.factory();
        let a = factory.create(&SurfaceConfig::default()).unwrap();
        let b = factory.create(&SurfaceConfig::default()).unwrap();
        assert_eq!(a.id(), SurfaceId(1));
        assert_eq!(b.id(), SurfaceId(2));
        assert_eq!(host.surface(a.id()).unwrap().url, BLANK_URL);
    }

    #[test]
    fn destroyed_surface_rejects_calls_and_detaches() {
        let host = Headless::new();
        let mut window = host.window(WindowId(1), Some(TabId(1)));
        let mut surface = host.factory().create(&SurfaceConfig::default()).unwrap();
        window.add_surface(surface.id()).unwrap();

        surface.destroy().unwrap();
        assert!(host.attached(WindowId(1)).is_empty());
        assert!(matches!(
            surface.load_url("about:blank"),
            Err(HostError::SurfaceDestroyed(_))
        ));
        assert!(window.add_surface(surface.id()).is_err());
        assert!(host.live_surfaces().is_empty());
    }

    #[test]
    fn attach_is_idempotent_and_detach_tolerates_strangers() {
        let host = Headless::new();
        let mut window = host.window(WindowId(1), None);
        let surface = host.factory().create(&SurfaceConfig::default()).unwrap();

        window.add_surface(surface.id()).unwrap();
        window.add_surface(surface.id()).unwrap();
        assert_eq!(host.attached(WindowId(1)), vec![surface.id()]);

        window.remove_surface(SurfaceId(99)).unwrap();
        window.remove_surface(surface.id()).unwrap();
        window.remove_surface(surface.id()).unwrap();
        assert!(host.attached(WindowId(1)).is_empty());
    }

    #[test]
    fn messages_are_recorded() {
        let host = Headless::new();
        let mut window = host.window(WindowId(1), None);
        let mut surface = host.factory().create(&SurfaceConfig::default()).unwrap();

        window.send("dialog-visibility-change", &[json!("menu"), json!(true)]).unwrap();
        surface.send("visibility-changed", &[json!(false)]).unwrap();

        let record = host.window_record(WindowId(1)).unwrap();
        assert_eq!(record.messages[0].channel, "dialog-visibility-change");
        assert_eq!(record.messages[0].args, vec![json!("menu"), json!(true)]);
        assert_eq!(host.surface(surface.id()).unwrap().messages.len(), 1);
    }

    #[test]
    fn subscriptions_are_tracked() {
        let host = Headless::new();
        let mut window = host.window(WindowId(1), None);
        let a = window.subscribe(TabEventKind::Activated).unwrap();
        let r = window.subscribe(TabEventKind::Removed).unwrap();
        assert_ne!(a, r);
        assert_eq!(host.live_subscriptions(WindowId(1)), 2);
        window.unsubscribe(a).unwrap();
        window.unsubscribe(r).unwrap();
        assert_eq!(host.live_subscriptions(WindowId(1)), 0);
    }

    #[test]
    fn injected_failures_fire_once() {
        let host = Headless::new();
        let mut factory = host.factory();
        host.fail_next_create();
        assert!(factory.create(&SurfaceConfig::default()).is_err());
        let surface = factory.create(&SurfaceConfig::default()).unwrap();

        let mut window = host.window(WindowId(1), None);
        host.fail_next_attach();
        assert!(window.add_surface(surface.id()).is_err());
        assert!(window.add_surface(surface.id()).is_ok());
    }
}
