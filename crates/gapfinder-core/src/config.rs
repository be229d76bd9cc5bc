use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty values (`FOO=` in a .env file) count as unset.
    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        match raw.parse::<usize>() {
            Ok(0) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            }),
            Ok(n) => Ok(n),
            Err(e) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        }
    };

    let env = parse_environment(&or_default("GAPFINDER_ENV", "development"))?;
    let log_level = or_default("GAPFINDER_LOG_LEVEL", "info");

    let youtube_api_key = optional("YOUTUBE_API_KEY");
    let youtube_base_url = or_default(
        "GAPFINDER_YOUTUBE_BASE_URL",
        "https://www.googleapis.com/youtube/v3",
    );

    let elasticsearch_url = or_default("ELASTICSEARCH_URL", "http://localhost:9200");
    let elasticsearch_index = or_default("GAPFINDER_ES_INDEX", "youtube_content");

    let llm_api_key = optional("TOGETHER_API_KEY");
    let llm_base_url = or_default("GAPFINDER_LLM_BASE_URL", "https://api.together.xyz/v1");
    let llm_model = or_default(
        "GAPFINDER_LLM_MODEL",
        "meta-llama/Llama-3.3-70B-Instruct-Turbo",
    );

    let http_timeout_secs = parse_u64("GAPFINDER_HTTP_TIMEOUT_SECS", "30")?;
    let http_max_retries = parse_u32("GAPFINDER_HTTP_MAX_RETRIES", "3")?;
    let http_backoff_base_ms = parse_u64("GAPFINDER_HTTP_BACKOFF_BASE_MS", "1000")?;
    let max_videos = parse_positive_usize("GAPFINDER_MAX_VIDEOS", "50")?;
    let index_concurrency = parse_positive_usize("GAPFINDER_INDEX_CONCURRENCY", "4")?;
    let tuning_path = optional("GAPFINDER_TUNING_PATH").map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        youtube_api_key,
        youtube_base_url,
        elasticsearch_url,
        elasticsearch_index,
        llm_api_key,
        llm_base_url,
        llm_model,
        http_timeout_secs,
        http_max_retries,
        http_backoff_base_ms,
        max_videos,
        index_concurrency,
        tuning_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GAPFINDER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
