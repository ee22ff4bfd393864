//! Configuration loader
//!
//! Loads the sink configuration from the collector's sink URI, environment
//! variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If no cluster id is set there, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Every loader validates the result before returning it.
//!
//! ## Environment Variables
//! - `KUBE_EVENTBRIDGE_CLUSTER_ID`: Kubernetes cluster id (required)
//! - `KUBE_EVENTBRIDGE_BUS_NAME`: Destination bus name
//! - `KUBE_EVENTBRIDGE_REGION`: Region override
//! - `KUBE_EVENTBRIDGE_ACCOUNT_ID`: Account id override
//! - `KUBE_EVENTBRIDGE_CREDENTIALS_PATH`: Token file path
//! - `KUBE_EVENTBRIDGE_METADATA_ENDPOINT`: Metadata service base URL
//! - `KUBE_EVENTBRIDGE_REQUEST_TIMEOUT`: Request timeout in seconds
//! - `KUBE_EVENTBRIDGE_MAX_ATTEMPTS`: Attempts per dispatch
//! - `KUBE_EVENTBRIDGE_AUTO_RETRY`: Whether to retry (true/false)
//!
//! ## Sink URI
//! `eventbridge:?clusterId=c1234&busName=default&region=cn-hangzhou&accountId=1888`
//!
//! ## File Locations
//! The loader probes `kube-eventbridge.{json,toml}` and `config.{json,toml}`
//! in the current working directory, then next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use kube_eventbridge_domain::{BridgeError, Result, SinkConfig};
use url::Url;

const ENV_PREFIX: &str = "KUBE_EVENTBRIDGE_";

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `BridgeError::Configuration` if neither source yields a valid
/// configuration.
pub fn load() -> Result<SinkConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from `KUBE_EVENTBRIDGE_*` environment variables
///
/// # Errors
/// Returns `BridgeError::Configuration` if the cluster id is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<SinkConfig> {
    let mut config = SinkConfig::new(env_var("CLUSTER_ID")?);

    if let Some(bus_name) = env_opt("BUS_NAME") {
        config.bus_name = bus_name;
    }
    config.region = env_opt("REGION");
    config.account_id = env_opt("ACCOUNT_ID");
    config.credentials_path = env_opt("CREDENTIALS_PATH").map(PathBuf::from);
    config.metadata_endpoint = env_opt("METADATA_ENDPOINT");
    if let Some(timeout) = env_opt("REQUEST_TIMEOUT") {
        config.request_timeout_secs = parse_number("request timeout", &timeout)?;
    }
    if let Some(attempts) = env_opt("MAX_ATTEMPTS") {
        config.max_attempts = parse_number("max attempts", &attempts)?;
    }
    config.auto_retry = env_bool("AUTO_RETRY", config.auto_retry);

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `BridgeError::Configuration` if the file is missing, cannot be
/// parsed or fails validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<SinkConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BridgeError::Configuration(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BridgeError::Configuration(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| BridgeError::Configuration(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Build configuration from the collector's sink URI
///
/// Recognised query keys: `clusterId`, `busName`, `region`, `accountId`,
/// `credentialsPath`, `metadataEndpoint`, `timeout`, `maxAttempts`,
/// `autoRetry`. Unknown keys are ignored.
///
/// # Errors
/// Returns `BridgeError::Configuration` if `clusterId` is missing or a value
/// does not parse.
pub fn from_uri(uri: &Url) -> Result<SinkConfig> {
    let mut config = SinkConfig::new("");

    for (key, value) in uri.query_pairs() {
        let value = value.into_owned();
        match key.as_ref() {
            "clusterId" => config.cluster_id = value,
            "busName" => config.bus_name = value,
            "region" => config.region = Some(value),
            "accountId" => config.account_id = Some(value),
            "credentialsPath" => config.credentials_path = Some(PathBuf::from(value)),
            "metadataEndpoint" => config.metadata_endpoint = Some(value),
            "timeout" => config.request_timeout_secs = parse_number("timeout", &value)?,
            "maxAttempts" => config.max_attempts = parse_number("max attempts", &value)?,
            "autoRetry" => config.auto_retry = parse_bool(&value),
            other => tracing::debug!(key = other, "ignoring unknown sink option"),
        }
    }

    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<SinkConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| BridgeError::Configuration(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BridgeError::Configuration(format!("Invalid JSON format: {e}"))),
        _ => Err(BridgeError::Configuration(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] =
        ["kube-eventbridge.json", "kube-eventbridge.toml", "config.json", "config.toml"];

    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir);
    }

    dirs.iter().flat_map(|dir| NAMES.iter().map(move |name| dir.join(name))).find(|p| p.exists())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        BridgeError::Configuration(format!(
            "Missing required environment variable: {ENV_PREFIX}{key}"
        ))
    })
}

/// Non-empty value of `KUBE_EVENTBRIDGE_{key}`.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}")).ok().filter(|v| !v.trim().is_empty())
}

fn env_bool(key: &str, default: bool) -> bool {
    env_opt(key).map_or(default, |s| parse_bool(&s))
}

/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn parse_number<T>(what: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| BridgeError::Configuration(format!("Invalid {what} '{value}': {e}")))
}
