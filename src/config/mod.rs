mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the config directory path (~/.config/dinghy-scorer/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("dinghy-scorer")
}

/// Get the default config file path (~/.config/dinghy-scorer/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Parse configuration YAML; relative paths inside it are taken from `base`.
pub fn parse_config(content: &str, base: &Path) -> Result<Config> {
    let mut config: Config =
        serde_saphyr::from_str(content).context("Failed to parse config: invalid YAML")?;
    config.resolve_paths(base);
    Ok(config)
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/dinghy-scorer/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed or has unknown fields
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Create ~/.config/dinghy-scorer/config.yaml with a handicaps table",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    let config = parse_config(&config_content, base)
        .with_context(|| format!("Invalid config file {}", config_path.display()))?;

    debug!(
        path = %config_path.display(),
        classes = config.handicaps.len(),
        "loaded config"
    );
    Ok(config)
}

/// Validate a loaded configuration.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.handicaps.is_empty() {
        errors.push("handicaps: must list at least one boat class".to_string());
    }
    for class in config.handicaps.classes() {
        if class.py == 0 {
            errors.push(format!(
                "handicaps.{}: handicap must be greater than zero",
                class.label
            ));
        }
    }

    if let Some(place) = config.dnc_place {
        if !place.is_finite() || place < 0.0 {
            errors.push(format!(
                "dnc_place: must be a non-negative number, got {}",
                place
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
