use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use uuid::Uuid;

use dirclean::cli::Cli;
use dirclean::logging::{self, LogTarget};
use dirclean::{config, disk_info, output, summary};
use dirclean::{Mode, Rule, RuleEngine, RunOutcome, RunSettings, TerminalPrompter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());
    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| config.settings.log_file.clone());
    if logging::init(&level, &log_file) == LogTarget::Stderr {
        output::print_warning(&format!(
            "Cannot open log file {}; logging to stderr",
            log_file.display()
        ));
    }

    let run_id = Uuid::new_v4().to_string();
    info!("BEGIN: dirclean: RUN_ID={run_id}");

    for rejected in &config.rejected {
        error!("{rejected}");
        output::print_warning(&rejected.to_string());
    }

    let only = cli.mode.as_deref().map(Mode::parse);
    let rules: Vec<Rule> = config
        .rules
        .into_iter()
        .filter(|rule| only.as_ref().map_or(true, |mode| &rule.mode == mode))
        .collect();
    if rules.is_empty() {
        output::print_info("No rules to process");
    }

    let before = disk_info::get_disk_info(Path::new("/"));
    if before.is_none() {
        error!("Error getting disk usage before run");
    }

    let settings = RunSettings::default();
    let mut engine = RuleEngine::new(settings, TerminalPrompter::stdio(settings.now));
    if engine.run_all(&rules) == RunOutcome::Quit {
        output::print_warning("Run terminated by operator");
    }

    let after = disk_info::get_disk_info(Path::new("/"));
    if after.is_none() {
        error!("Error getting disk usage after run");
    }

    summary::print(engine.ledger(), &run_id, before, after);
    info!("END: dirclean: RUN_ID={run_id}");
    Ok(())
}
