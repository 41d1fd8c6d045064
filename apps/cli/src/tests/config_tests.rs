use super::{apply_env_overrides, apply_file, load_settings, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn temp_config(name: &str, contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("pincode_config_test_{name}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("pincode.toml");
    fs::write(&path, contents).expect("write config");
    path
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn defaults_point_at_public_api_without_timeout() {
    let settings = Settings::default();
    assert_eq!(settings.api_base_url, "https://api.postalpincode.in");
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn file_values_override_defaults() {
    let path = temp_config(
        "file",
        "api_base_url = \"http://127.0.0.1:9000\"\nrequest_timeout_secs = 5\n",
    );

    let mut settings = Settings::default();
    apply_file(&mut settings, &path, true).expect("apply file");

    assert_eq!(settings.api_base_url, "http://127.0.0.1:9000");
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(5)));

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn missing_optional_file_is_ignored() {
    let mut settings = Settings::default();
    let path = env::temp_dir().join("pincode_config_test_missing/pincode.toml");
    apply_file(&mut settings, &path, false).expect("optional file");
    assert_eq!(settings, Settings::default());
}

#[test]
fn missing_explicit_file_is_an_error() {
    let path = env::temp_dir().join("pincode_config_test_missing/explicit.toml");
    let err = load_settings(Some(path.as_path())).expect_err("must fail");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn malformed_file_is_an_error() {
    let path = temp_config("malformed", "request_timeout_secs = \"soon\"\n");

    let mut settings = Settings::default();
    let err = apply_file(&mut settings, &path, true).expect_err("must fail");
    assert!(err.to_string().contains("failed to parse config file"));

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn app_prefixed_env_wins_over_short_name() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env_from(&[
            ("PINCODE_API_URL", "http://short.example"),
            ("APP__API_BASE_URL", "http://app.example"),
        ]),
    );
    assert_eq!(settings.api_base_url, "http://app.example");
}

#[test]
fn invalid_timeout_env_is_ignored() {
    let mut settings = Settings {
        request_timeout_secs: Some(3),
        ..Settings::default()
    };
    apply_env_overrides(
        &mut settings,
        env_from(&[("APP__REQUEST_TIMEOUT_SECS", "later")]),
    );
    assert_eq!(settings.request_timeout_secs, Some(3));

    apply_env_overrides(&mut settings, env_from(&[("APP__REQUEST_TIMEOUT_SECS", "0")]));
    assert_eq!(settings.request_timeout(), None);
}
