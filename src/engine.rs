//! Per-rule orchestration: resolve paths, walk them, test each entry, and
//! hand matches to the [`Disposer`].
//!
//! Rules run one after another on the calling thread. An operator quit in
//! interactive mode stops the walk at once and no later rule is started.

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::SystemTime;

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::disposer::{Disposer, Disposition, Prompter};
use crate::entry::CandidateEntry;
use crate::error::TraversalError;
use crate::ledger::RunAccumulator;
use crate::output;
use crate::predicate::{MatchKind, PredicateSet};
use crate::resolver::{self, TraversalRoot};
use crate::rule::{Mode, Rule};
use crate::survey::{self, DirUsage, SurveySettings};

/// Fixed inputs of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    /// Reference time for every age cutoff in the run.
    pub now: SystemTime,
    pub survey: SurveySettings,
}

impl RunSettings {
    pub fn at(now: SystemTime) -> Self {
        Self {
            now,
            survey: SurveySettings::default(),
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::at(SystemTime::now())
    }
}

/// One matched entry and what was done with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub kind: MatchKind,
    pub disposition: Disposition,
}

/// Result of applying a single rule.
#[derive(Debug, Default)]
pub struct RuleReport {
    pub entries: Vec<ReportEntry>,
    pub total_bytes: u64,
    pub errors: Vec<String>,
    /// Large idle directories, filled for analyze rules only.
    pub survey: Vec<DirUsage>,
    /// The operator quit while this rule was running.
    pub halted: bool,
}

impl RuleReport {
    fn push(&mut self, entry: &CandidateEntry, kind: MatchKind, disposition: Disposition) {
        self.total_bytes += entry.size;
        self.entries.push(ReportEntry {
            path: entry.path.clone(),
            size_bytes: entry.size,
            kind,
            disposition,
        });
    }

    fn fail(&mut self, msg: String) {
        error!("{msg}");
        self.errors.push(msg);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// Stopped early by the operator.
    Quit,
}

/// Depth-first walk of a root, yielding non-directory entries that pass the
/// root's pattern. Symlinks are not followed. Each call starts a fresh walk.
pub fn entries(
    root: &TraversalRoot,
) -> impl Iterator<Item = Result<CandidateEntry, TraversalError>> + '_ {
    WalkDir::new(&root.dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |item| {
            let dir_entry = match item {
                Ok(e) => e,
                Err(e) => return Some(Err(TraversalError::from(e))),
            };
            if dir_entry.file_type().is_dir() || !root.admits(dir_entry.path()) {
                return None;
            }
            Some(
                CandidateEntry::from_dir_entry(&dir_entry).map_err(|source| {
                    TraversalError::Access {
                        path: dir_entry.path().to_path_buf(),
                        source,
                    }
                }),
            )
        })
}

pub struct RuleEngine<P> {
    settings: RunSettings,
    prompter: P,
    ledger: RunAccumulator,
}

impl<P: Prompter> RuleEngine<P> {
    pub fn new(settings: RunSettings, prompter: P) -> Self {
        Self {
            settings,
            prompter,
            ledger: RunAccumulator::new(),
        }
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn ledger(&self) -> &RunAccumulator {
        &self.ledger
    }

    /// Apply every rule in order, stopping if the operator quits.
    pub fn run_all(&mut self, rules: &[Rule]) -> RunOutcome {
        for rule in rules {
            if self.run(rule).halted {
                warn!("Run terminated by operator; remaining rules skipped");
                return RunOutcome::Quit;
            }
        }
        RunOutcome::Completed
    }

    pub fn run(&mut self, rule: &Rule) -> RuleReport {
        let mut report = RuleReport::default();

        if rule.age_days <= 0 {
            report.fail(format!("Invalid days value: {}", rule.age_days));
            return report;
        }
        if let Mode::Unrecognized(mode) = &rule.mode {
            warn!("Unknown mode: {mode}, defaulting to dry-run");
        }

        info!(
            "Processing rule: mode={} days={} paths={:?}",
            rule.mode, rule.age_days, rule.paths
        );
        output::print_rule_header(rule.mode.as_str(), rule.age_days, &rule.paths);

        let predicates = PredicateSet::new(rule, self.settings.now);
        let roots = resolver::resolve_all(&rule.paths);
        let analyze = rule.mode == Mode::Analyze;
        if analyze {
            output::print_analyze_header();
        }

        let mut disposer = Disposer::new(&rule.mode, &mut self.prompter, &mut self.ledger);
        'roots: for root in &roots {
            debug!("Walking {}", root.dir.display());
            for item in entries(root) {
                let entry = match item {
                    Ok(entry) => entry,
                    Err(e) => {
                        report.fail(e.to_string());
                        continue;
                    }
                };
                let Some(kind) = predicates.evaluate(&entry) else {
                    continue;
                };
                debug!("Matched {:?}: {}", kind, entry.path.display());
                match disposer.dispose(&entry, kind) {
                    ControlFlow::Continue(disposition) => report.push(&entry, kind, disposition),
                    ControlFlow::Break(()) => {
                        report.halted = true;
                        break 'roots;
                    }
                }
            }
        }

        if analyze && !report.halted {
            let dirs: Vec<PathBuf> = roots.iter().map(|r| r.dir.clone()).collect();
            report.survey = survey::largest_idle_dirs(
                &dirs,
                &self.settings.survey,
                self.settings.now,
                predicates.cutoff(),
            );
            if !report.survey.is_empty() {
                output::print_survey_header();
                for (i, dir) in report.survey.iter().enumerate() {
                    output::print_survey_dir(i + 1, dir);
                }
                output::print_survey_footer(rule.age_days);
            }
        }

        info!(
            "Rule finished: {} matched ({} bytes), {} error(s)",
            report.entries.len(),
            report.total_bytes,
            report.errors.len()
        );
        report
    }
}
