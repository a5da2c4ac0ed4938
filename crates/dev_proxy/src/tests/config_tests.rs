use super::{load_settings_from, normalize_prefix, prepare_backend_url, Settings};

use std::fs;

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("proxy.toml");
    fs::write(&path, contents).expect("write config");
    (dir, path)
}

#[test]
fn defaults_mirror_the_frontend_dev_server() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(&dir.path().join("absent.toml"), no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.bind_addr, "127.0.0.1:5173");
    assert_eq!(settings.backend_url, "http://127.0.0.1:8000");
    assert_eq!(settings.strip_prefix, "/api");
    assert!(settings.bind_socket_addr().is_ok());
}

#[test]
fn file_accepts_string_and_integer_values() {
    let (_dir, path) = temp_config(
        "bind_addr = \"0.0.0.0:9000\"\nbackend_url = \"http://gpu:8000\"\nmax_body_bytes = 1024\n",
    );
    let settings = load_settings_from(&path, no_env);
    assert_eq!(settings.bind_addr, "0.0.0.0:9000");
    assert_eq!(settings.backend_url, "http://gpu:8000");
    assert_eq!(settings.max_body_bytes, 1024);
    assert_eq!(settings.strip_prefix, "/api");
}

#[test]
fn app_prefixed_env_wins_over_plain_env_and_file() {
    let (_dir, path) = temp_config("backend_url = \"http://from-file:8000\"\n");
    let settings = load_settings_from(&path, |name| match name {
        "PROXY_BACKEND_URL" => Some("http://plain-env:8000".to_string()),
        "APP__BACKEND_URL" => Some("http://app-env:8000".to_string()),
        "APP__MAX_BODY_BYTES" => Some("not-a-number".to_string()),
        _ => None,
    });
    assert_eq!(settings.backend_url, "http://app-env:8000");
    assert_eq!(settings.max_body_bytes, Settings::default().max_body_bytes);
}

#[test]
fn invalid_bind_address_is_reported() {
    let settings = Settings {
        bind_addr: "localhost".to_string(),
        ..Settings::default()
    };
    let err = settings.bind_socket_addr().expect_err("must fail");
    assert!(err.to_string().contains("localhost"));
}

#[test]
fn backend_url_must_be_absolute_http() {
    assert_eq!(
        prepare_backend_url(" http://127.0.0.1:8000/ ").expect("valid"),
        "http://127.0.0.1:8000"
    );
    assert!(prepare_backend_url("127.0.0.1:8000").is_err());
    assert!(prepare_backend_url("ws://127.0.0.1:8000").is_err());
}

#[test]
fn prefixes_are_normalized() {
    assert_eq!(normalize_prefix("api"), "/api");
    assert_eq!(normalize_prefix("/api/"), "/api");
    assert_eq!(normalize_prefix("/"), "");
    assert_eq!(normalize_prefix(""), "");
}
