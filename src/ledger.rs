use std::path::{Path, PathBuf};

use crate::disposer::Disposition;

/// One deferred or deleted entry. `size` is taken when the entry is
/// dispositioned, so deleted files still count toward the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub path: PathBuf,
    pub size: u64,
    pub disposition: Disposition,
}

/// Append-only record of everything deferred or deleted during a run,
/// across all rules, in visitation order.
#[derive(Debug, Default)]
pub struct RunAccumulator {
    entries: Vec<LedgerEntry>,
}

impl RunAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Only `Deferred` and `Deleted` belong here; other
    /// dispositions are ignored.
    pub fn record(&mut self, path: &Path, size: u64, disposition: Disposition) {
        if matches!(disposition, Disposition::Deferred | Disposition::Deleted) {
            self.entries.push(LedgerEntry {
                path: path.to_path_buf(),
                size,
                disposition,
            });
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| e.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }

    pub fn deleted_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.disposition == Disposition::Deleted)
            .count()
    }
}
