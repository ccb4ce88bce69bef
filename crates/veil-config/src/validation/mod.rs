//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator runs them all and
//! collects every problem into a single `ConfigError`.

mod helpers;


use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use veil_common::ConfigError;

use crate::schema::VeilConfig;

use helpers::validate_min;

/// Dialog names double as file stems and channel prefixes.
fn dialog_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("static regex"))
}

/// Whether `name` is usable as a dialog name.
pub fn is_valid_dialog_name(name: &str) -> bool {
    dialog_name_pattern().is_match(name)
}

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &VeilConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_content(&mut errors, config);
    validate_pool(&mut errors, config);
    validate_dialogs(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_content(errors: &mut Vec<String>, config: &VeilConfig) {
    if config.content.dev_server_port == 0 {
        errors.push("content.dev_server_port must be non-zero".into());
    }
    if config.content.build_dir.trim().is_empty() {
        errors.push("content.build_dir must not be empty".into());
    }
}

fn validate_pool(errors: &mut Vec<String>, config: &VeilConfig) {
    let pool = &config.pool;
    validate_min(errors, "pool.retention_floor", pool.retention_floor, 1);
    if pool.prewarm > pool.retention_floor {
        errors.push(format!(
            "pool.prewarm = {} exceeds pool.retention_floor = {}",
            pool.prewarm, pool.retention_floor
        ));
    }
    if let Some(max) = pool.max_surfaces {
        if max < pool.retention_floor {
            errors.push(format!(
                "pool.max_surfaces = {max} is below pool.retention_floor = {}",
                pool.retention_floor
            ));
        }
    }
}

fn validate_dialogs(errors: &mut Vec<String>, config: &VeilConfig) {
    let mut seen = HashSet::new();
    for name in &config.dialogs.persistent {
        if !is_valid_dialog_name(name) {
            errors.push(format!("dialogs.persistent: invalid dialog name '{name}'"));
        }
        if !seen.insert(name.as_str()) {
            errors.push(format!("dialogs.persistent: duplicate dialog '{name}'"));
        }
    }

    let menu = &config.dialogs.menu;
    validate_min(errors, "dialogs.menu.width", menu.width as usize, 1);
    validate_min(errors, "dialogs.menu.height", menu.height as usize, 1);
}
