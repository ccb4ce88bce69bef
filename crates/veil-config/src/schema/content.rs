//! Dialog content origin configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where dialog pages are loaded from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentMode {
    /// `<app_root>/<build_dir>/<name>.html` on disk.
    #[default]
    Packaged,
    /// `http://localhost:<dev_server_port>/<name>.html`.
    DevServer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub mode: ContentMode,
    pub dev_server_port: u16,
    /// Application root. Falls back to the executable's directory.
    pub app_root: Option<PathBuf>,
    pub build_dir: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            mode: ContentMode::Packaged,
            dev_server_port: 4444,
            app_root: None,
            build_dir: "build".into(),
        }
    }
}

impl ContentConfig {
    /// The configured app root, or the directory holding the running binary.
    pub fn resolved_app_root(&self) -> PathBuf {
        if let Some(root) = &self.app_root {
            return root.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_app_root_wins() {
        let config = ContentConfig {
            app_root: Some(PathBuf::from("/opt/veil")),
            ..Default::default()
        };
        assert_eq!(config.resolved_app_root(), PathBuf::from("/opt/veil"));
    }

    #[test]
    fn mode_serializes_snake_case() {
        let json = serde_json::to_string(&ContentMode::DevServer).unwrap();
        assert_eq!(json, "\"dev_server\"");
    }
}
