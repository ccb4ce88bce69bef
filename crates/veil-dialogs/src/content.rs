//! Where dialog pages are loaded from.
//!
//! During development pages come from a local dev server addressed by
//! dialog name; packaged builds load them from the bundled build
//! directory. Exactly one origin is resolved per process run.

use std::path::{Path, PathBuf};

use veil_config::{ContentConfig, ContentMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentOrigin {
    /// `http://localhost:<port>/<name>.html`
    DevServer { port: u16 },
    /// `file://<app_root>/<build_dir>/<name>.html`
    Packaged { app_root: PathBuf, build_dir: String },
}

impl ContentOrigin {
    pub fn from_config(config: &ContentConfig) -> Self {
        match config.mode {
            ContentMode::DevServer => ContentOrigin::DevServer {
                port: config.dev_server_port,
            },
            ContentMode::Packaged => ContentOrigin::Packaged {
                app_root: config.resolved_app_root(),
                build_dir: config.build_dir.clone(),
            },
        }
    }

    /// URL of the page for dialog `name`.
    pub fn url_for(&self, name: &str) -> String {
        match self {
            ContentOrigin::DevServer { port } => format!("http://localhost:{port}/{name}.html"),
            ContentOrigin::Packaged {
                app_root,
                build_dir,
            } => file_url(&app_root.join(build_dir).join(format!("{name}.html"))),
        }
    }
}

fn file_url(path: &Path) -> String {
    let path = path.to_string_lossy().replace('\\', "/");
    if path.starts_with('/') {
        format!("file://{path}")
    } else {
        format!("file:///{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_server_url() {
        let origin = ContentOrigin::DevServer { port: 4444 };
        assert_eq!(origin.url_for("menu"), "http://localhost:4444/menu.html");
    }

    #[test]
    fn packaged_url() {
        let origin = ContentOrigin::Packaged {
            app_root: PathBuf::from("/opt/veil"),
            build_dir: "build".into(),
        };
        assert_eq!(origin.url_for("search"), "file:///opt/veil/build/search.html");
    }

    #[test]
    fn windows_style_root_gets_three_slashes() {
        assert_eq!(
            file_url(Path::new("C:\\veil\\build\\menu.html")),
            "file:///C:/veil/build/menu.html"
        );
    }

    #[test]
    fn from_config_follows_mode() {
        let mut config = ContentConfig {
            app_root: Some(PathBuf::from("/srv/app")),
            ..Default::default()
        };
        assert_eq!(
            ContentOrigin::from_config(&config).url_for("menu"),
            "file:///srv/app/build/menu.html"
        );

        config.mode = ContentMode::DevServer;
        config.dev_server_port = 5173;
        assert_eq!(
            ContentOrigin::from_config(&config),
            ContentOrigin::DevServer { port: 5173 }
        );
    }
}
