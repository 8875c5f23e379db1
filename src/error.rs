use std::path::PathBuf;

use thiserror::Error;

/// A size string that could not be turned into a byte count.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SizeParseError {
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),

    #[error("Size cannot be negative: '{0}'")]
    Negative(String),

    #[error("Unknown size unit '{unit}' in '{input}' (expected B, KB, MB, GB or TB)")]
    UnknownUnit { input: String, unit: String },
}

/// Problems with the configuration file or one of its rules.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error opening config file {path} or example config {example}: {source}")]
    Open {
        path: PathBuf,
        example: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error decoding YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Rule {index}: {source}")]
    Rule {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Rule {index}: delete_older_than_days is not set")]
    MissingAge { index: usize },

    #[error("Rule {index}: invalid days value {days}")]
    NegativeAge { index: usize, days: i64 },

    #[error("Rule {index}: no paths configured")]
    NoPaths { index: usize },

    #[error("Rule {index}: invalid {field}: {source}")]
    Size {
        index: usize,
        field: &'static str,
        #[source]
        source: SizeParseError,
    },
}

/// Why a configured path produced no traversal roots.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Wildcard path '{0}' has no base directory before the first '*'")]
    EmptyBase(String),

    #[error("Invalid wildcard pattern '{spec}': {source}")]
    Pattern {
        spec: String,
        #[source]
        source: globset::Error,
    },

    #[error("Directory does not exist or is not accessible: {path}: {source}")]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// A single entry that could not be read during a walk. The walk goes on.
#[derive(Debug, Error)]
pub enum TraversalError {
    #[error("Error walking directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Error accessing {path}: {source}")]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
