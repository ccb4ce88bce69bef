//! Where the config file lives, and writing the commented default there.

use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use veil_common::ConfigError;

use super::template::default_config_toml;

const APP_DIR: &str = "veil";
const FILE_NAME: &str = "config.toml";

/// `<base>/veil/config.toml`.
pub(crate) fn config_path_in(base: &Path) -> PathBuf {
    base.join(APP_DIR).join(FILE_NAME)
}

/// The per-user config file under the platform config directory.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| config_path_in(&base))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Write the commented default config to `path`, creating parent
/// directories as needed. An existing file is left untouched.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.is_file() {
        return Ok(());
    }
    write_template(path).map_err(|e| io_failure("write", path, e))?;
    info!(path = %path.display(), "wrote default config");
    Ok(())
}

fn write_template(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)?,
        _ => {}
    }
    std::fs::write(path, default_config_toml())
}

pub(super) fn io_failure(action: &str, path: &Path, e: io::Error) -> ConfigError {
    ConfigError::ParseError(format!("cannot {action} {}: {e}", path.display()))
}
