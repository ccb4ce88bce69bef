use std::path::PathBuf;

use crate::types::{SurfaceId, WindowId};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures reported by the host windowing layer.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("surface creation failed: {0}")]
    SurfaceCreation(String),

    #[error("surface {0} has been destroyed")]
    SurfaceDestroyed(SurfaceId),

    #[error("failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("ipc send failed: {0}")]
    Ipc(String),

    #[error("window error: {0}")]
    Window(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("channel already registered: {0}")]
    AlreadyRegistered(String),

    #[error("no handler registered for channel: {0}")]
    NoHandler(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("dialog name must not be empty")]
    EmptyName,

    #[error("unknown window: {0}")]
    UnknownWindow(WindowId),

    #[error("window {0} has no active tab")]
    NoActiveTab(WindowId),

    #[error("no dialog owns surface {0}")]
    UnknownDialog(SurfaceId),

    #[error("no persistent dialog named '{0}'")]
    UnknownPersistent(String),

    #[error("dialog '{name}' is already open in {owner}")]
    ForeignWindow { name: String, owner: WindowId },

    #[error("surface pool exhausted ({limit} surfaces)")]
    PoolExhausted { limit: usize },

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Host(#[from] HostError),
}

#[derive(Debug, thiserror::Error)]
pub enum VeilError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dialog(#[from] DialogError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<HostError> for VeilError {
    fn from(err: HostError) -> Self {
        Self::Dialog(DialogError::Host(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ValidationError("pool.retention_floor must be >= 1".into());
        assert_eq!(
            err.to_string(),
            "config validation error: pool.retention_floor must be >= 1"
        );
    }

    #[test]
    fn host_error_display() {
        let err = HostError::SurfaceDestroyed(SurfaceId(7));
        assert_eq!(err.to_string(), "surface 7 has been destroyed");

        let err = HostError::Navigation {
            url: "http://localhost:4444/menu.html".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to load http://localhost:4444/menu.html: connection refused"
        );
    }

    #[test]
    fn dialog_error_display() {
        assert_eq!(
            DialogError::UnknownWindow(WindowId(3)).to_string(),
            "unknown window: window-3"
        );
        assert_eq!(
            DialogError::PoolExhausted { limit: 4 }.to_string(),
            "surface pool exhausted (4 surfaces)"
        );
        let err = DialogError::ForeignWindow {
            name: "menu".into(),
            owner: WindowId(1),
        };
        assert_eq!(err.to_string(), "dialog 'menu' is already open in window-1");
    }

    #[test]
    fn dialog_error_from_channel() {
        let err: DialogError = ChannelError::AlreadyRegistered("hide-1".into()).into();
        assert!(matches!(err, DialogError::Channel(_)));
        assert_eq!(err.to_string(), "channel already registered: hide-1");
    }

    #[test]
    fn veil_error_from_host_goes_through_dialog() {
        let err: VeilError = HostError::Ipc("pipe closed".into()).into();
        assert!(matches!(err, VeilError::Dialog(DialogError::Host(_))));
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn veil_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: VeilError = io_err.into();
        assert!(matches!(err, VeilError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }
}
