pub mod errors;
pub mod types;

pub use errors::{ChannelError, ConfigError, DialogError, HostError, VeilError};
pub use types::{Bounds, Rect, SubscriptionId, SurfaceId, TabId, WindowId};

pub type Result<T> = std::result::Result<T, VeilError>;
