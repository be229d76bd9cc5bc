use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "GAPFINDER_ENV"));
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should load");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.youtube_api_key, None);
    assert_eq!(cfg.youtube_base_url, "https://www.googleapis.com/youtube/v3");
    assert_eq!(cfg.elasticsearch_url, "http://localhost:9200");
    assert_eq!(cfg.elasticsearch_index, "youtube_content");
    assert_eq!(cfg.llm_api_key, None);
    assert_eq!(cfg.llm_model, "meta-llama/Llama-3.3-70B-Instruct-Turbo");
    assert_eq!(cfg.http_timeout_secs, 30);
    assert_eq!(cfg.http_max_retries, 3);
    assert_eq!(cfg.http_backoff_base_ms, 1000);
    assert_eq!(cfg.max_videos, 50);
    assert_eq!(cfg.index_concurrency, 4);
    assert_eq!(cfg.tuning_path, None);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("GAPFINDER_ENV", "production");
    map.insert("YOUTUBE_API_KEY", "yt-key");
    map.insert("TOGETHER_API_KEY", "llm-key");
    map.insert("ELASTICSEARCH_URL", "http://es:9200");
    map.insert("GAPFINDER_MAX_VIDEOS", "120");
    map.insert("GAPFINDER_TUNING_PATH", "./config/tuning.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).expect("should load");
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.youtube_api_key.as_deref(), Some("yt-key"));
    assert_eq!(cfg.llm_api_key.as_deref(), Some("llm-key"));
    assert_eq!(cfg.elasticsearch_url, "http://es:9200");
    assert_eq!(cfg.max_videos, 120);
    assert_eq!(
        cfg.tuning_path,
        Some(PathBuf::from("./config/tuning.yaml"))
    );
}

#[test]
fn empty_api_key_counts_as_unset() {
    let mut map = HashMap::new();
    map.insert("TOGETHER_API_KEY", "");
    let cfg = build_app_config(lookup_from_map(&map)).expect("should load");
    assert_eq!(cfg.llm_api_key, None);
}

#[test]
fn build_app_config_fails_with_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("GAPFINDER_HTTP_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GAPFINDER_HTTP_TIMEOUT_SECS"),
        "expected InvalidEnvVar(GAPFINDER_HTTP_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_max_videos() {
    let mut map = HashMap::new();
    map.insert("GAPFINDER_MAX_VIDEOS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GAPFINDER_MAX_VIDEOS"),
        "expected InvalidEnvVar(GAPFINDER_MAX_VIDEOS), got: {result:?}"
    );
}

#[test]
fn debug_redacts_secrets() {
    let mut map = HashMap::new();
    map.insert("YOUTUBE_API_KEY", "super-secret-yt");
    map.insert("TOGETHER_API_KEY", "super-secret-llm");
    let cfg = build_app_config(lookup_from_map(&map)).expect("should load");
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("super-secret"), "secrets leaked: {debug}");
    assert!(debug.contains("[redacted]"));
}
