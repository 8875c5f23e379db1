use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use colored::Colorize;

use crate::survey::DirUsage;
use crate::utils::{display_path, format_size};

const RULE: &str = "-------------------------------------------------------------------------------";

pub fn format_date(t: SystemTime) -> String {
    DateTime::<Local>::from(t).format("%Y-%m-%d").to_string()
}

pub fn print_rule_header(mode: &str, days: i64, paths: &[String]) {
    println!(
        "{}",
        format!("=== {mode}: files older than {days} days ===").bold().white()
    );
    for p in paths {
        println!("  {}", p.dimmed());
    }
}

pub fn print_analyze_header() {
    println!();
    println!("{}", "Analyzing directories for old files...".bold().cyan());
    println!("{}", "=====================================".cyan());
}

pub fn print_candidate(path: &Path, size: u64, modified: SystemTime) {
    println!(
        "  {}  {}  {}",
        display_path(path).dimmed(),
        format_size(size).yellow(),
        format_date(modified)
    );
}

pub fn print_broken_link(path: &Path, target: &Path) {
    println!(
        "  {} {} -> {}",
        "Broken".magenta(),
        display_path(path).dimmed(),
        target.display().to_string().red()
    );
}

pub fn print_would_delete(path: &Path, size: u64) {
    println!(
        "  {} {}  {}",
        "Would delete".yellow(),
        display_path(path).dimmed(),
        format_size(size).yellow()
    );
}

pub fn print_deleted(path: &Path, size: u64) {
    println!(
        "  {} {}  {}",
        "Deleted".red(),
        display_path(path).dimmed(),
        format_size(size).yellow()
    );
}

pub fn print_delete_error(path: &Path, err: &str) {
    println!(
        "  {} {} - {}",
        "Failed".red().bold(),
        display_path(path).dimmed(),
        err.red()
    );
}

/// Question shown before deleting an old file.
pub fn file_prompt(path: &Path, size: u64, age_days: u64) -> String {
    format!(
        "{} {} (size: {}, age: {} days) {} ",
        "Delete file".cyan(),
        path.display(),
        format_size(size),
        age_days,
        "[y]es/[n]o/[q]uit:".yellow()
    )
}

/// Question shown before deleting a broken symlink.
pub fn link_prompt(path: &Path, target: &Path) -> String {
    format!(
        "{} {} -> {} {} ",
        "Delete broken symlink".cyan(),
        path.display(),
        target.display(),
        "[y]es/[n]o/[q]uit:".yellow()
    )
}

pub fn print_survey_header() {
    println!();
    println!("{}", "Large directories that may need attention:".bold().white());
    println!("{}", "=========================================".white());
}

pub fn print_survey_dir(rank: usize, dir: &DirUsage) {
    println!();
    println!("{}. Directory: {}", rank, display_path(&dir.path).bold());
    println!("   Total size: {}", format_size(dir.size).green());
    println!("   Last modified: {}", format_date(dir.last_modified));
    println!("   Files: {}", dir.file_count);
    if dir.file_count > 0 {
        let pct_files = dir.old_count as f64 / dir.file_count as f64 * 100.0;
        let pct_size = if dir.size > 0 {
            dir.old_size as f64 / dir.size as f64 * 100.0
        } else {
            0.0
        };
        println!(
            "   Old files: {} ({:.1}% of files, {:.1}% of size)",
            dir.old_count, pct_files, pct_size
        );
    }
}

pub fn print_survey_footer(days: i64) {
    println!();
    println!("To clean these directories:");
    println!("1. Add them to your config file, or");
    println!(
        "2. Add a rule with {} and delete_older_than_days: {days}",
        "mode: interactive".bold()
    );
}

pub struct SummaryView<'a> {
    pub binary: &'a str,
    pub run_id: &'a str,
    pub file_count: usize,
    pub total_bytes: u64,
    pub disk_note: &'a str,
}

pub fn print_summary(view: &SummaryView<'_>) {
    println!();
    println!("{RULE}");
    println!("{}", "SUMMARY".bold().white());
    println!("{RULE}");
    println!("Binary:\t\t\t{}", view.binary);
    println!("Run ID:\t\t\t{}", view.run_id);
    println!("Time:\t\t\t{}", Local::now().format("%Y-%m-%d %H:%M"));
    println!("Total files processed:\t{}", view.file_count);
    println!(
        "Total size of files:\t{}",
        format_size(view.total_bytes).green()
    );
    println!("{}", view.disk_note);
    println!("{RULE}");
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "Warning:".red().bold(), msg.red());
}

pub fn print_info(msg: &str) {
    println!("{} {}", "Info:".cyan().bold(), msg);
}
