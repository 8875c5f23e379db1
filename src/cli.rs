use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "dirclean",
    about = "Clean up old files and broken symlinks from configured directories",
    version
)]
pub struct Cli {
    /// Path to the YAML config file
    #[arg(long, env = "DIRCLEAN_CONFIG", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Only process rules configured with this mode
    /// (analyze, dry-run, interactive, scheduled)
    #[arg(long)]
    pub mode: Option<String>,

    /// Log file, overriding defaults.log_file
    #[arg(long = "log", env = "DIRCLEAN_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level (DEBUG, INFO, WARN, ERROR, FATAL), overriding defaults.log_level
    #[arg(long, env = "DIRCLEAN_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_overrides_parse() {
        let cli = Cli::try_parse_from(["dirclean"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.yaml"));
        assert!(cli.mode.is_none());

        let cli = Cli::try_parse_from([
            "dirclean",
            "--config",
            "/etc/dirclean/config.yaml",
            "--mode",
            "analyze",
            "--log",
            "/tmp/d.log",
            "--log-level",
            "DEBUG",
        ])
        .unwrap();
        assert_eq!(cli.mode.as_deref(), Some("analyze"));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/d.log")));
        assert_eq!(cli.log_level.as_deref(), Some("DEBUG"));
    }
}
