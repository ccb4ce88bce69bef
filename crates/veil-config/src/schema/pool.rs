//! Surface pool sizing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Released surfaces are destroyed instead of recycled while the pool
    /// holds more than this many.
    pub retention_floor: usize,
    /// Blank surfaces created by `run()` before any dialog opens.
    pub prewarm: usize,
    /// Hard cap on pooled surfaces. `None` grows on demand.
    pub max_surfaces: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            retention_floor: 2,
            prewarm: 1,
            max_surfaces: None,
        }
    }
}
