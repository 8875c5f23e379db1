//! YAML configuration: a `defaults` block layered under each entry of `rules`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::rule::{Mode, Rule, SizeBounds};
use crate::utils;

pub const DEFAULT_MODE: &str = "dry-run";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_LOG_FILE: &str = "dirclean.log";

/// A size written either as a plain byte count or as "10MB".
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawSize {
    Bytes(u64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawRule {
    delete_older_than_days: Option<i64>,
    paths: Vec<String>,
    min_file_size: Option<RawSize>,
    max_file_size: Option<RawSize>,
    mode: Option<String>,
    clean_broken_symlinks: Option<bool>,
    log_level: Option<String>,
    log_file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    defaults: RawRule,
    /// Decoded one at a time so a malformed rule only rejects itself.
    rules: Vec<serde_yaml::Value>,
}

/// Run-wide settings taken from the `defaults` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_level: String,
    pub log_file: PathBuf,
}

/// A loaded config. Rules that failed validation are kept apart so the
/// remaining rules can still run.
#[derive(Debug)]
pub struct Config {
    pub settings: Settings,
    pub rules: Vec<Rule>,
    pub rejected: Vec<ConfigError>,
}

/// OS-specific location of the example config shipped with packages.
pub fn example_config_path() -> PathBuf {
    if cfg!(target_os = "linux") {
        PathBuf::from("/usr/share/dirclean/example.config.yaml")
    } else if cfg!(target_os = "macos") {
        PathBuf::from("/usr/local/share/dirclean/example.config.yaml")
    } else if cfg!(windows) {
        let base = std::env::var_os("ProgramData").unwrap_or_default();
        PathBuf::from(base).join("dirclean").join("example.config.yaml")
    } else {
        PathBuf::from("example.config.yaml")
    }
}

/// Load `path`, falling back to the example config if it cannot be read.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let (source, text) = match std::fs::read_to_string(path) {
        Ok(text) => (path.to_path_buf(), text),
        Err(_) => {
            let example = example_config_path();
            let text = std::fs::read_to_string(&example).map_err(|source| ConfigError::Open {
                path: path.to_path_buf(),
                example: example.clone(),
                source,
            })?;
            info!("Using example config from {}", example.display());
            (example, text)
        }
    };
    parse(&text, &source)
}

/// Parse config text. `source` only labels errors.
pub fn parse(text: &str, source: &Path) -> Result<Config, ConfigError> {
    let raw: RawConfig = if text.trim().is_empty() {
        RawConfig::default()
    } else {
        serde_yaml::from_str(text).map_err(|source_err| ConfigError::Yaml {
            path: source.to_path_buf(),
            source: source_err,
        })?
    };

    let defaults = &raw.defaults;
    let settings = Settings {
        log_level: defaults
            .log_level
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        log_file: PathBuf::from(
            defaults
                .log_file
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        ),
    };

    let mut rules = Vec::new();
    let mut rejected = Vec::new();
    for (i, value) in raw.rules.into_iter().enumerate() {
        match merge_rule(i + 1, value, defaults) {
            Ok(rule) => rules.push(rule),
            Err(e) => rejected.push(e),
        }
    }

    debug!(
        "Loaded config from {}: {} rule(s), {} rejected",
        source.display(),
        rules.len(),
        rejected.len()
    );

    Ok(Config {
        settings,
        rules,
        rejected,
    })
}

fn merge_rule(
    index: usize,
    value: serde_yaml::Value,
    defaults: &RawRule,
) -> Result<Rule, ConfigError> {
    let rule: RawRule =
        serde_yaml::from_value(value).map_err(|source| ConfigError::Rule { index, source })?;
    let days = rule
        .delete_older_than_days
        .or(defaults.delete_older_than_days)
        .ok_or(ConfigError::MissingAge { index })?;
    if days < 0 {
        return Err(ConfigError::NegativeAge { index, days });
    }

    if rule.paths.is_empty() {
        return Err(ConfigError::NoPaths { index });
    }
    let paths = rule.paths.iter().map(|p| utils::expand_tilde(p)).collect();

    let min = size_field(
        index,
        "min_file_size",
        rule.min_file_size.as_ref().or(defaults.min_file_size.as_ref()),
    )?;
    let max = size_field(
        index,
        "max_file_size",
        rule.max_file_size.as_ref().or(defaults.max_file_size.as_ref()),
    )?;

    let mode = rule
        .mode
        .as_deref()
        .or(defaults.mode.as_deref())
        .unwrap_or(DEFAULT_MODE);

    Ok(Rule {
        age_days: days,
        paths,
        size: SizeBounds { min, max },
        mode: Mode::parse(mode),
        clean_broken_symlinks: rule
            .clean_broken_symlinks
            .or(defaults.clean_broken_symlinks)
            .unwrap_or(false),
    })
}

fn size_field(
    index: usize,
    field: &'static str,
    value: Option<&RawSize>,
) -> Result<Option<u64>, ConfigError> {
    match value {
        None => Ok(None),
        Some(RawSize::Bytes(n)) => Ok(Some(*n)),
        Some(RawSize::Text(s)) => utils::parse_size(s)
            .map(Some)
            .map_err(|source| ConfigError::Size {
                index,
                field,
                source,
            }),
    }
}
