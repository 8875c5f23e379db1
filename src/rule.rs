use std::fmt;

/// How matched entries of a rule are dispositioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Report candidates only.
    Analyze,
    /// Record what would be deleted.
    DryRun,
    /// Ask the operator per entry.
    Interactive,
    /// Delete without asking.
    Scheduled,
    /// Anything else from the config. Handled as `DryRun` with a warning.
    Unrecognized(String),
}

impl Mode {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "analyze" => Mode::Analyze,
            "dry-run" => Mode::DryRun,
            "interactive" => Mode::Interactive,
            "scheduled" => Mode::Scheduled,
            other => Mode::Unrecognized(other.to_string()),
        }
    }

    /// The mode that actually drives disposition.
    pub fn effective(&self) -> Mode {
        match self {
            Mode::Unrecognized(_) => Mode::DryRun,
            other => other.clone(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Mode::Analyze => "analyze",
            Mode::DryRun => "dry-run",
            Mode::Interactive => "interactive",
            Mode::Scheduled => "scheduled",
            Mode::Unrecognized(s) => s,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional size limits in bytes. `min > max` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeBounds {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl SizeBounds {
    pub fn admits(&self, size: u64) -> bool {
        if self.min.is_some_and(|min| size < min) {
            return false;
        }
        if self.max.is_some_and(|max| size > max) {
            return false;
        }
        true
    }
}

/// One cleanup policy, fully merged with the config defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub age_days: i64,
    pub paths: Vec<String>,
    pub size: SizeBounds,
    pub mode: Mode,
    pub clean_broken_symlinks: bool,
}

impl Rule {
    /// A rule over `paths` with no size limits and symlink cleanup off.
    pub fn new(age_days: i64, paths: Vec<String>, mode: Mode) -> Self {
        Self {
            age_days,
            paths,
            size: SizeBounds::default(),
            mode,
            clean_broken_symlinks: false,
        }
    }

    pub fn with_size(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.size = SizeBounds { min, max };
        self
    }

    pub fn with_broken_symlinks(mut self, enabled: bool) -> Self {
        self.clean_broken_symlinks = enabled;
        self
    }
}
