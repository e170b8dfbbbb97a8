use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_defaults() {
    let config = ClientConfig::default();
    assert_eq!(config.host, "https://api.scrapfly.io");
    assert_eq!(config.timeout, Duration::from_secs(150));
    assert_eq!(config.concurrency, 5);
    assert!(config.verify_ssl);
    assert!(config.api_key.is_empty());
}

#[test]
fn test_load_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::load_with(Some(dir.path().join("missing.toml").as_path()), no_env).unwrap();
    assert_eq!(config, ClientConfig::default());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[scrapfly]\napi_key = \"from-file\"\ntimeout_secs = 30\nconcurrency = 12\nverify_ssl = false\n",
    )
    .unwrap();

    let config = ClientConfig::load_with(Some(path.as_path()), no_env).unwrap();
    assert_eq!(config.api_key, "from-file");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.concurrency, 12);
    assert!(!config.verify_ssl);
    assert_eq!(config.host, DEFAULT_HOST);
}

#[test]
fn test_env_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[scrapfly]\napi_key = \"from-file\"\n").unwrap();

    let env = |name: &str| match name {
        "SCRAPFLY_KEY" => Some("from-env".to_string()),
        "SCRAPFLY_HOST" => Some("http://localhost:8000".to_string()),
        _ => None,
    };
    let config = ClientConfig::load_with(Some(path.as_path()), env).unwrap();
    assert_eq!(config.api_key, "from-env");
    assert_eq!(config.host, "http://localhost:8000");

    let sources = config_sources_with(Some(path.as_path()), env);
    assert_eq!(sources.api_key, ConfigSource::EnvVar("SCRAPFLY_KEY"));
    assert_eq!(sources.host, ConfigSource::EnvVar("SCRAPFLY_HOST"));
    assert_eq!(sources.timeout, ConfigSource::Default);
}

#[test]
fn test_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[scrapfly\napi_key = ").unwrap();
    let err = ClientConfig::load_with(Some(path.as_path()), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_invalid_host() {
    let env = |name: &str| (name == "SCRAPFLY_HOST").then(|| "api.scrapfly.io".to_string());
    let err = ClientConfig::load_with(None, env).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "host", .. }));
}

#[test]
fn test_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = ClientConfig {
        concurrency: 20,
        ..ClientConfig::new("scp-live-123")
    };
    save_to(&path, &config).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("api_key = \"scp-live-123\""));
    assert!(written.contains("concurrency = 20"));
    assert!(!written.contains("host"));

    let loaded = ClientConfig::load_with(Some(path.as_path()), no_env).unwrap();
    assert_eq!(loaded, config);

    let sources = config_sources_with(Some(path.as_path()), no_env);
    assert_eq!(sources.api_key, ConfigSource::ConfigFile);
    assert_eq!(sources.concurrency, ConfigSource::ConfigFile);
    assert_eq!(sources.host, ConfigSource::Default);
}

#[test]
fn test_missing_key_source() {
    let sources = config_sources_with(None, no_env);
    assert_eq!(sources.api_key, ConfigSource::Missing);
    assert_eq!(sources.api_key.to_string(), "not set");
}

#[test]
fn test_with_overrides() {
    let config = ClientConfig::default().with_overrides(Some("cli-key".into()), None);
    assert_eq!(config.api_key, "cli-key");
    assert_eq!(config.host, DEFAULT_HOST);
}
