use std::{collections::HashMap, fs, io::ErrorKind, path::Path};

use anyhow::{Context, Result};

pub const DEFAULT_CONFIG_PATH: &str = "gitted.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_filter: String,
    /// When set, replayed slide indices are clamped to this many slides.
    pub wrapped_slide_count: Option<usize>,
    pub print_changes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            wrapped_slide_count: None,
            print_changes: false,
        }
    }
}

/// Defaults, then `path` if it exists, then the process environment.
///
/// A missing file is fine; an unreadable or malformed one is an error.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw).with_context(|| {
            format!("failed to parse settings file '{}'", path.display())
        })?,
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| {
                format!("failed to read settings file '{}'", path.display())
            })
        }
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)?;

    if let Some(v) = file_cfg.get("log_filter").and_then(value_as_string) {
        settings.log_filter = v;
    }
    if let Some(v) = file_cfg.get("wrapped_slide_count").and_then(value_as_string) {
        apply_slide_count(settings, &v);
    }
    if let Some(v) = file_cfg.get("print_changes").and_then(value_as_string) {
        apply_print_changes(settings, &v);
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("GITTED_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = lookup("APP__WRAPPED_SLIDE_COUNT") {
        apply_slide_count(settings, &v);
    }

    if let Some(v) = lookup("APP__PRINT_CHANGES") {
        apply_print_changes(settings, &v);
    }
}

fn value_as_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

fn apply_slide_count(settings: &mut Settings, raw: &str) {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        settings.wrapped_slide_count = None;
        return;
    }
    if let Ok(parsed) = raw.parse::<usize>() {
        settings.wrapped_slide_count = Some(parsed);
    }
}

fn apply_print_changes(settings: &mut Settings, raw: &str) {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => settings.print_changes = true,
        "0" | "false" | "no" | "off" => settings.print_changes = false,
        _ => {}
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
