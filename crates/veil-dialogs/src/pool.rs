//! Reusable surface pool.
//!
//! Surfaces are expensive to create, so released ones are reset to a blank
//! page and kept warm. Once the pool holds more than its retention floor,
//! released surfaces are destroyed instead.

use std::collections::HashMap;

use tracing::{debug, info};
use veil_common::{DialogError, HostError, SurfaceId};
use veil_config::PoolConfig;

use crate::host::{Surface, SurfaceConfig, SurfaceFactory, BLANK_URL};

/// What `release` did with a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Released {
    /// Reset to a blank page and kept for reuse.
    Recycled,
    /// Destroyed and removed from the pool.
    Destroyed,
    /// The surface was not in use; nothing happened.
    AlreadyFree,
}

/// A surface handed out by `claim_free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claimed {
    pub surface: SurfaceId,
    /// Whether the pool had to grow to satisfy the claim.
    pub created: bool,
}

pub struct SurfacePool {
    factory: Box<dyn SurfaceFactory>,
    surface_config: SurfaceConfig,
    /// Creation order; the first free surface is reused first.
    surfaces: Vec<Box<dyn Surface>>,
    in_use: HashMap<SurfaceId, bool>,
    retention_floor: usize,
    max_surfaces: Option<usize>,
}

impl SurfacePool {
    pub fn new(factory: Box<dyn SurfaceFactory>, config: &PoolConfig) -> Self {
        Self {
            factory,
            surface_config: SurfaceConfig::default(),
            surfaces: Vec::new(),
            in_use: HashMap::new(),
            retention_floor: config.retention_floor,
            max_surfaces: config.max_surfaces,
        }
    }

    pub fn with_surface_config(mut self, config: SurfaceConfig) -> Self {
        self.surface_config = config;
        self
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn in_use_count(&self) -> usize {
        self.in_use.values().filter(|used| **used).count()
    }

    /// `Some(in_use)` for pooled surfaces, `None` for unknown ids.
    pub fn is_in_use(&self, surface: SurfaceId) -> Option<bool> {
        self.in_use.get(&surface).copied()
    }

    pub fn ids(&self) -> Vec<SurfaceId> {
        self.surfaces.iter().map(|s| s.id()).collect()
    }

    /// Create a fresh surface through the same factory, outside the pool.
    pub fn create_detached(&mut self) -> Result<Box<dyn Surface>, HostError> {
        self.factory.create(&self.surface_config)
    }

    fn grow(&mut self) -> Result<SurfaceId, DialogError> {
        if let Some(limit) = self.max_surfaces {
            if self.surfaces.len() >= limit {
                return Err(DialogError::PoolExhausted { limit });
            }
        }
        let surface = self.factory.create(&self.surface_config)?;
        let id = surface.id();
        self.surfaces.push(surface);
        self.in_use.insert(id, false);
        debug!(surface = %id, pool = self.surfaces.len(), "surface created");
        Ok(id)
    }

    /// Grow the pool until it holds at least `count` surfaces.
    /// Returns the ids created.
    pub fn ensure_warm(&mut self, count: usize) -> Result<Vec<SurfaceId>, DialogError> {
        let mut created = Vec::new();
        while self.surfaces.len() < count {
            created.push(self.grow()?);
        }
        Ok(created)
    }

    /// Mark the first free surface in use, growing the pool if none is free.
    pub fn claim_free(&mut self) -> Result<Claimed, DialogError> {
        let free = self
            .surfaces
            .iter()
            .map(|s| s.id())
            .find(|id| !self.in_use.get(id).copied().unwrap_or(false));

        let (surface, created) = match free {
            Some(id) => (id, false),
            None => (self.grow()?, true),
        };
        self.in_use.insert(surface, true);
        Ok(Claimed { surface, created })
    }

    /// Return a surface to the pool. Releasing a free or unknown surface is
    /// a no-op.
    pub fn release(&mut self, surface: SurfaceId) -> Result<Released, HostError> {
        match self.in_use.get_mut(&surface) {
            Some(used) if *used => *used = false,
            _ => return Ok(Released::AlreadyFree),
        }

        if self.surfaces.len() > self.retention_floor {
            let Some(pos) = self.surfaces.iter().position(|s| s.id() == surface) else {
                return Ok(Released::AlreadyFree);
            };
            let mut removed = self.surfaces.remove(pos);
            self.in_use.remove(&surface);
            removed.destroy()?;
            info!(surface = %surface, pool = self.surfaces.len(), "surface destroyed");
            Ok(Released::Destroyed)
        } else {
            if let Some(s) = self.get_mut(surface) {
                s.load_url(BLANK_URL)?;
            }
            debug!(surface = %surface, "surface recycled");
            Ok(Released::Recycled)
        }
    }

    pub fn get_mut(&mut self, surface: SurfaceId) -> Option<&mut (dyn Surface + 'static)> {
        self.surfaces
            .iter_mut()
            .find(|s| s.id() == surface)
            .map(|s| &mut **s)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Surface>> {
        self.surfaces.iter_mut()
    }

    /// Destroy every pooled surface. Failures are collected, not fatal.
    pub fn destroy_all(&mut self) -> Vec<HostError> {
        let mut errors = Vec::new();
        for mut surface in self.surfaces.drain(..) {
            if let Err(e) = surface.destroy() {
                errors.push(e);
            }
        }
        self.in_use.clear();
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::headless::Headless;

    fn pool(host: &Headless, floor: usize, max: Option<usize>) -> SurfacePool {
        SurfacePool::new(
            Box::new(host.factory()),
            &PoolConfig {
                retention_floor: floor,
                prewarm: 1,
                max_surfaces: max,
            },
        )
    }

    #[test]
    fn claim_reuses_free_surface_before_growing() {
        let host = Headless::new();
        let mut pool = pool(&host, 2, None);
        pool.ensure_warm(1).unwrap();

        let first = pool.claim_free().unwrap();
        assert!(!first.created);
        assert_eq!(first.surface, SurfaceId(1));

        let second = pool.claim_free().unwrap();
        assert!(second.created);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.in_use_count(), 2);
    }

    #[test]
    fn release_recycles_at_or_below_floor() {
        let host = Headless::new();
        let mut pool = pool(&host, 2, None);
        let claimed = pool.claim_free().unwrap();
        pool.get_mut(claimed.surface)
            .unwrap()
            .load_url("http://localhost:4444/menu.html")
            .unwrap();

        assert_eq!(pool.release(claimed.surface).unwrap(), Released::Recycled);
        assert_eq!(pool.is_in_use(claimed.surface), Some(false));
        assert_eq!(host.surface(claimed.surface).unwrap().url, BLANK_URL);
    }

    #[test]
    fn release_destroys_above_floor() {
        let host = Headless::new();
        let mut pool = pool(&host, 2, None);
        let a = pool.claim_free().unwrap().surface;
        let b = pool.claim_free().unwrap().surface;
        let c = pool.claim_free().unwrap().surface;

        // Destroys the released surface itself, not whatever sits at index 2.
        assert_eq!(pool.release(a).unwrap(), Released::Destroyed);
        assert_eq!(pool.ids(), vec![b, c]);
        assert!(host.surface(a).unwrap().destroyed);
        assert_eq!(pool.is_in_use(a), None);

        assert_eq!(pool.release(b).unwrap(), Released::Recycled);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn double_release_is_a_no_op() {
        let host = Headless::new();
        let mut pool = pool(&host, 2, None);
        let id = pool.claim_free().unwrap().surface;
        pool.release(id).unwrap();
        let history = host.surface(id).unwrap().history.len();

        assert_eq!(pool.release(id).unwrap(), Released::AlreadyFree);
        assert_eq!(pool.release(SurfaceId(42)).unwrap(), Released::AlreadyFree);
        assert_eq!(host.surface(id).unwrap().history.len(), history);
    }

    #[test]
    fn growth_respects_cap() {
        let host = Headless::new();
        let mut pool = pool(&host, 2, Some(2));
        pool.claim_free().unwrap();
        pool.claim_free().unwrap();
        assert!(matches!(
            pool.claim_free(),
            Err(DialogError::PoolExhausted { limit: 2 })
        ));
    }

    #[test]
    fn creation_failure_propagates() {
        let host = Headless::new();
        let mut pool = pool(&host, 2, None);
        host.fail_next_create();
        assert!(matches!(pool.claim_free(), Err(DialogError::Host(_))));
        assert!(pool.is_empty());
    }

    #[test]
    fn destroy_all_empties_pool() {
        let host = Headless::new();
        let mut pool = pool(&host, 2, None);
        pool.ensure_warm(2).unwrap();
        assert!(pool.destroy_all().is_empty());
        assert!(pool.is_empty());
        assert!(host.live_surfaces().is_empty());
    }
}
