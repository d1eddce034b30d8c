//! Configuration loader
//!
//! Loads the connection configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Whatever the source, the result is validated before it is returned.
//!
//! ## Environment Variables
//! - `ERPLINK_URL`: Backend address with scheme (e.g. `https://erp.example.com`)
//! - `ERPLINK_PORT`: Backend port
//! - `ERPLINK_DATABASE`: Database name
//! - `ERPLINK_USERNAME`: Login
//! - `ERPLINK_PASSWORD`: Password or API key
//! - `ERPLINK_TIMEOUT_SECS`: Optional per-request timeout in seconds
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./erplink.json` or `./erplink.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. The same names next to the executable

use std::path::{Path, PathBuf};

use erplink_domain::{ConnectionConfig, Fault, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["erplink.json", "erplink.toml", "config.json", "config.toml"];

const REQUIRED_ENV_VARS: [&str; 5] =
    ["ERPLINK_URL", "ERPLINK_PORT", "ERPLINK_DATABASE", "ERPLINK_USERNAME", "ERPLINK_PASSWORD"];

/// Load configuration with automatic fallback strategy
///
/// Uses environment variables when all required ones are set. Only when one
/// is missing does it fall back to a config file; invalid values are
/// reported as they are.
///
/// # Errors
/// Returns a `Config` fault if:
/// - An environment variable holds an invalid value
/// - No config file is found, or its format is invalid
/// - Required fields are missing or fail validation
pub fn load() -> Result<ConnectionConfig> {
    if let Some(missing) = missing_env_var() {
        tracing::debug!(missing, "Environment incomplete, trying file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

fn missing_env_var() -> Option<&'static str> {
    REQUIRED_ENV_VARS.into_iter().find(|key| std::env::var_os(key).is_none())
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns a `Config` fault if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<ConnectionConfig> {
    let url = env_var("ERPLINK_URL")?;
    let port = env_var("ERPLINK_PORT").and_then(|s| {
        s.trim().parse::<u16>().map_err(|e| Fault::config(format!("Invalid port: {}", e)))
    })?;
    let database = env_var("ERPLINK_DATABASE")?;
    let username = env_var("ERPLINK_USERNAME")?;
    let password = env_var("ERPLINK_PASSWORD")?;

    let mut config = ConnectionConfig::new(url, port, database, username, password);

    if let Ok(raw) = std::env::var("ERPLINK_TIMEOUT_SECS") {
        config.timeout_secs = raw
            .trim()
            .parse::<u64>()
            .map_err(|e| Fault::config(format!("Invalid timeout: {}", e)))?;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns a `Config` fault if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing or fail validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<ConnectionConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(Fault::config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths()
            .ok_or_else(|| Fault::config("No config file found in any of the standard locations"))?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| Fault::config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<ConnectionConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| Fault::config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| Fault::config(format!("Invalid JSON format: {}", e))),
        _ => Err(Fault::config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory and up to two parents, then the
/// executable's directory and up to two parents.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend(exe_dir.ancestors().take(3).map(Path::to_path_buf));
        }
    }

    candidates_in(&roots).into_iter().find(|path| path.exists())
}

fn candidates_in(roots: &[PathBuf]) -> Vec<PathBuf> {
    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .collect()
}

/// Get required environment variable
///
/// # Errors
/// Returns a `Config` fault if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| Fault::config(format!("Missing required environment variable: {}", key)))
}
