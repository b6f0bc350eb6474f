use super::*;

use std::{
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let owned: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| owned.get(key).cloned()
}

#[test]
fn defaults_without_file_or_env() {
    let mut settings = Settings::default();
    apply_env(&mut settings, env_from(&[]));

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.log_filter, "info");
    assert_eq!(settings.wrapped_slide_count, None);
}

#[test]
fn file_accepts_native_toml_values() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        "log_filter = \"app_store=debug\"\nwrapped_slide_count = 10\nprint_changes = true\n",
    )
    .expect("valid settings");

    assert_eq!(settings.log_filter, "app_store=debug");
    assert_eq!(settings.wrapped_slide_count, Some(10));
    assert!(settings.print_changes);
}

#[test]
fn malformed_file_keeps_defaults() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "log_filter = [unterminated").is_err());

    assert_eq!(settings, Settings::default());
}

#[test]
fn env_overrides_file_and_ignores_garbage() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "wrapped_slide_count = \"6\"\n").expect("valid settings");
    apply_env(
        &mut settings,
        env_from(&[
            ("GITTED_LOG", "warn"),
            ("APP__LOG_FILTER", "debug"),
            ("APP__WRAPPED_SLIDE_COUNT", "twelve"),
            ("APP__PRINT_CHANGES", "yes"),
        ]),
    );

    assert_eq!(settings.log_filter, "debug");
    assert_eq!(settings.wrapped_slide_count, Some(6));
    assert!(settings.print_changes);
}

#[test]
fn slide_count_can_be_unset() {
    let mut settings = Settings {
        wrapped_slide_count: Some(4),
        ..Settings::default()
    };
    apply_env(&mut settings, env_from(&[("APP__WRAPPED_SLIDE_COUNT", "none")]));

    assert_eq!(settings.wrapped_slide_count, None);
}

#[test]
fn load_settings_reads_file_from_disk() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();

    let temp_root = env::temp_dir().join(format!("gitted_store_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("gitted.toml");
    fs::write(&path, "wrapped_slide_count = 3\n").expect("write settings");

    let settings = load_settings(&path).expect("settings");
    assert_eq!(settings.wrapped_slide_count, Some(3));

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn load_settings_tolerates_missing_file() {
    let path = env::temp_dir().join("gitted_store_config_test_missing/gitted.toml");
    let settings = load_settings(&path).expect("missing file falls back to defaults");

    assert!(!settings.log_filter.is_empty());
}

#[test]
fn load_settings_reports_malformed_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();

    let temp_root = env::temp_dir().join(format!("gitted_store_bad_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("gitted.toml");
    fs::write(&path, "log_filter = [unterminated\n").expect("write settings");

    let err = load_settings(&path).expect_err("malformed settings must be reported");
    assert!(
        err.to_string().contains("gitted.toml"),
        "unexpected error: {err}"
    );

    fs::remove_dir_all(temp_root).expect("cleanup");
}
