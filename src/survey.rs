//! Large, idle directory report shown after an analyze rule.
//!
//! Sizes are aggregated bottom-up in a single walk per root: every file adds
//! its size and mtime to each directory between it and the root. Memory
//! grows with the number of directories below the roots, so a root at the
//! filesystem root (for example from `/**/*.tmp`) is not surveyed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;
use walkdir::WalkDir;

use crate::predicate::cutoff;

/// Minimum aggregate size: 100 MiB
pub const MIN_DIR_SIZE: u64 = 100 * 1024 * 1024;

/// Directories touched more recently than this are left out.
pub const IDLE_DAYS: i64 = 30;

/// Maximum number of directories reported.
pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveySettings {
    pub min_size: u64,
    pub idle_days: i64,
    pub limit: usize,
}

impl Default for SurveySettings {
    fn default() -> Self {
        Self {
            min_size: MIN_DIR_SIZE,
            idle_days: IDLE_DAYS,
            limit: MAX_SUGGESTIONS,
        }
    }
}

/// Aggregate usage of one directory, including everything below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirUsage {
    pub path: PathBuf,
    pub size: u64,
    /// Newest mtime of any file below.
    pub last_modified: SystemTime,
    pub file_count: usize,
    /// Files older than the rule's cutoff.
    pub old_count: usize,
    pub old_size: u64,
}

impl DirUsage {
    fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            size: 0,
            last_modified: SystemTime::UNIX_EPOCH,
            file_count: 0,
            old_count: 0,
            old_size: 0,
        }
    }
}

/// Directories under `roots` that are big and idle, largest first.
/// `old_cutoff` is the owning rule's age cutoff, used for the old-file share.
pub fn largest_idle_dirs(
    roots: &[PathBuf],
    settings: &SurveySettings,
    now: SystemTime,
    old_cutoff: SystemTime,
) -> Vec<DirUsage> {
    let mut usage: HashMap<PathBuf, DirUsage> = HashMap::new();

    for root in outermost(roots) {
        if root.parent().is_none() {
            debug!("Survey skipping filesystem root {}", root.display());
            continue;
        }
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("Survey skipping {}: {e}", root.display());
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                usage
                    .entry(entry.path().to_path_buf())
                    .or_insert_with(|| DirUsage::empty(entry.path()));
                continue;
            }
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            let size = meta.len();
            let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            let old = modified < old_cutoff;

            let mut dir = entry.path().parent();
            while let Some(d) = dir {
                let agg = usage
                    .entry(d.to_path_buf())
                    .or_insert_with(|| DirUsage::empty(d));
                agg.size += size;
                agg.file_count += 1;
                agg.last_modified = agg.last_modified.max(modified);
                if old {
                    agg.old_count += 1;
                    agg.old_size += size;
                }
                if d == root.as_path() {
                    break;
                }
                dir = d.parent();
            }
        }
    }

    let idle_before = cutoff(now, settings.idle_days);
    let mut dirs: Vec<DirUsage> = usage
        .into_values()
        .filter(|d| d.size >= settings.min_size && d.last_modified < idle_before)
        .collect();
    dirs.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
    dirs.truncate(settings.limit);
    dirs
}

/// Roots with duplicates and roots nested inside another root removed, so
/// each file is counted once.
fn outermost(roots: &[PathBuf]) -> Vec<&PathBuf> {
    let mut sorted: Vec<&PathBuf> = roots.iter().collect();
    sorted.sort();
    sorted.dedup();
    let mut kept: Vec<&PathBuf> = Vec::new();
    for root in sorted {
        if !kept.iter().any(|outer| root.starts_with(outer)) {
            kept.push(root);
        }
    }
    kept
}
