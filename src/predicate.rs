use std::time::{Duration, SystemTime};

use crate::entry::CandidateEntry;
use crate::rule::{Rule, SizeBounds};

const SECS_PER_DAY: u64 = 86_400;

/// Why an entry matched a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Older than the cutoff and within the size bounds.
    OldFile,
    /// A symlink whose target does not exist.
    BrokenSymlink,
}

/// The composed filter of one rule, fixed to a single `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateSet {
    cutoff: SystemTime,
    size: SizeBounds,
    broken_symlinks: bool,
}

/// `now` minus whole days; saturates at the epoch.
pub fn cutoff(now: SystemTime, days: i64) -> SystemTime {
    let days = u64::try_from(days).unwrap_or(0);
    now.checked_sub(Duration::from_secs(days.saturating_mul(SECS_PER_DAY)))
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

impl PredicateSet {
    pub fn new(rule: &Rule, now: SystemTime) -> Self {
        Self {
            cutoff: cutoff(now, rule.age_days),
            size: rule.size,
            broken_symlinks: rule.clean_broken_symlinks,
        }
    }

    pub fn cutoff(&self) -> SystemTime {
        self.cutoff
    }

    /// Decide whether `entry` is a candidate. Broken symlinks are checked
    /// first and skip the age and size tests.
    pub fn evaluate(&self, entry: &CandidateEntry) -> Option<MatchKind> {
        if self.broken_symlinks && entry.is_broken_symlink() {
            return Some(MatchKind::BrokenSymlink);
        }
        if !self.size.admits(entry.size) {
            return None;
        }
        if entry.modified < self.cutoff {
            Some(MatchKind::OldFile)
        } else {
            None
        }
    }

    pub fn matches(&self, entry: &CandidateEntry) -> bool {
        self.evaluate(entry).is_some()
    }
}
