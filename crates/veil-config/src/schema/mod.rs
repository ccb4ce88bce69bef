//! Configuration schema types for Veil.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod content;
mod dialogs;
mod pool;
mod system;

pub use content::*;
pub use dialogs::*;
pub use pool::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Veil.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VeilConfig {
    pub content: ContentConfig,
    pub pool: PoolConfig,
    pub dialogs: DialogsConfig,
    pub logging: LoggingConfig,
}
