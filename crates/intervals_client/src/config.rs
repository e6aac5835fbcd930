//! Layered credential resolution.
//!
//! Sources are evaluated in order: process environment, env file, JSON config
//! file. The first layer holding a non-empty API key wins outright; its base
//! URL (if any) is used, otherwise the canonical origin. Resolution never
//! mutates the process environment and is safe to call repeatedly.

use crate::IntervalsError;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://intervals.icu";
pub const DEFAULT_ENV_FILE: &str = "/etc/intervals.env";
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

const API_KEY_VAR: &str = "INTERVALS_ICU_API_KEY";
const BASE_URL_VAR: &str = "INTERVALS_ICU_BASE_URL";
const ENV_FILE_VAR: &str = "INTERVALS_ICU_ENV_FILE";
const CONFIG_FILE_VAR: &str = "INTERVALS_ICU_CONFIG";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: SecretString,
    pub base_url: String,
}

/// One named credential source. Empty-string values are treated as unset.
#[derive(Clone, Debug, Default)]
pub struct Layer {
    pub name: &'static str,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl Layer {
    /// Build a layer from a lookup function. Keeps the resolution logic
    /// testable without touching the real process environment.
    pub fn from_lookup<F>(name: &'static str, mut get: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self {
            name,
            api_key: get(API_KEY_VAR).filter(|v| !v.is_empty()),
            base_url: get(BASE_URL_VAR).filter(|v| !v.is_empty()),
        }
    }

    /// Build a layer from a line-oriented `KEY=VALUE` env file. A missing or
    /// unreadable file yields an empty layer, never an error.
    pub fn from_env_file(name: &'static str, path: &Path) -> Self {
        let vars = match std::fs::read_to_string(path) {
            Ok(contents) => parse_env_file(&contents),
            Err(_) => Vec::new(),
        };
        Self::from_lookup(name, |key| {
            vars.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
    }
}

/// Parse `KEY=VALUE` lines, skipping blank lines and `#` comments.
pub fn parse_env_file(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let (key, value) = line.split_once('=')?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

impl Config {
    /// Resolve credentials from the standard layers: environment variables,
    /// then the env file, then the JSON config file.
    pub fn resolve() -> Result<Self, IntervalsError> {
        let env = Layer::from_lookup("environment", |k| std::env::var(k).ok());
        let env_file_path =
            std::env::var(ENV_FILE_VAR).unwrap_or_else(|_| DEFAULT_ENV_FILE.to_string());
        let env_file = Layer::from_env_file("env file", Path::new(&env_file_path));
        let config_path =
            std::env::var(CONFIG_FILE_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        resolve_layers(vec![env, env_file], Path::new(&config_path))
    }
}

/// Return the first layer with a usable API key, falling back to the JSON
/// config file at `config_path`.
pub fn resolve_layers(layers: Vec<Layer>, config_path: &Path) -> Result<Config, IntervalsError> {
    for layer in layers {
        if let Some(key) = layer.api_key {
            tracing::debug!("using credentials from {}", layer.name);
            return Ok(Config {
                api_key: SecretString::new(key.into()),
                base_url: layer
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            });
        }
    }
    load_config_file(config_path)
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    intervals: Option<ConfigSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigSection {
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
    #[serde(rename = "baseUrl")]
    base_url: Option<String>,
}

fn load_config_file(path: &Path) -> Result<Config, IntervalsError> {
    let contents = std::fs::read_to_string(path).map_err(|_| {
        IntervalsError::Config(format!("config file not found at {}", path.display()))
    })?;
    let parsed: ConfigFile = serde_json::from_str(&contents).map_err(|e| {
        IntervalsError::Config(format!("invalid config file {}: {}", path.display(), e))
    })?;
    let section = parsed.intervals.unwrap_or_default();
    match section.api_key.filter(|k| !k.is_empty()) {
        Some(key) => Ok(Config {
            api_key: SecretString::new(key.into()),
            base_url: section
                .base_url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }),
        None => Err(IntervalsError::Config(format!(
            "missing intervals.apiKey in {}",
            path.display()
        ))),
    }
}
