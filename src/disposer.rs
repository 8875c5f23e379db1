//! What happens to an entry once it has matched a rule.
//!
//! | mode        | effect                                              |
//! |-------------|-----------------------------------------------------|
//! | analyze     | reported as a candidate, nothing recorded           |
//! | dry-run     | reported, recorded as deferred                      |
//! | interactive | operator decides: delete, skip, or quit the run     |
//! | scheduled   | deleted, recorded on success                        |
//!
//! Failed deletions are logged and never recorded.

use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::time::SystemTime;

use tracing::{error, info};

use crate::entry::CandidateEntry;
use crate::ledger::RunAccumulator;
use crate::output;
use crate::predicate::MatchKind;
use crate::rule::Mode;
use crate::utils::{self, format_size};

/// Outcome for one matched entry under one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Reported only.
    Candidate,
    /// Would be deleted; recorded in the ledger.
    Deferred,
    Deleted,
    /// Declined by the operator, or the delete failed.
    Skipped,
}

/// An operator's answer to a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Delete,
    Skip,
    Quit,
}

impl Response {
    /// `y`, `yes`, `d` and `delete` confirm; `q` and `quit` end the run;
    /// anything else skips. Case is ignored.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "d" | "delete" => Response::Delete,
            "q" | "quit" => Response::Quit,
            _ => Response::Skip,
        }
    }
}

/// Asks the operator what to do with an entry. Blocks until answered.
pub trait Prompter {
    fn ask(&mut self, entry: &CandidateEntry, kind: MatchKind) -> Response;
}

/// Prompter reading answers line by line from a terminal.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
    now: SystemTime,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(now: SystemTime) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), now)
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    /// `now` is only used to show how old a file is.
    pub fn new(input: R, output: W, now: SystemTime) -> Self {
        Self { input, output, now }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, entry: &CandidateEntry, kind: MatchKind) -> Response {
        let question = match (kind, &entry.symlink) {
            (MatchKind::BrokenSymlink, Some(link)) => {
                output::link_prompt(&entry.path, &link.target)
            }
            _ => {
                let age = self
                    .now
                    .duration_since(entry.modified)
                    .map(|d| d.as_secs() / 86_400)
                    .unwrap_or(0);
                output::file_prompt(&entry.path, entry.size, age)
            }
        };
        if let Err(e) = write!(self.output, "{question}").and_then(|_| self.output.flush()) {
            error!("Error writing prompt: {e}");
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            // Input closed: no answer can ever arrive.
            Ok(0) => Response::Quit,
            Ok(_) => Response::parse(&line),
            Err(e) => {
                error!("Error reading response for {}: {e}", entry.path.display());
                Response::Skip
            }
        }
    }
}

/// Applies one rule's mode to its matched entries.
pub struct Disposer<'a> {
    mode: Mode,
    prompter: &'a mut dyn Prompter,
    ledger: &'a mut RunAccumulator,
}

impl<'a> Disposer<'a> {
    /// Unrecognized modes act as dry-run.
    pub fn new(
        mode: &Mode,
        prompter: &'a mut dyn Prompter,
        ledger: &'a mut RunAccumulator,
    ) -> Self {
        Self {
            mode: mode.effective(),
            prompter,
            ledger,
        }
    }

    /// Dispose of a matched entry. `Break` means the operator quit.
    pub fn dispose(
        &mut self,
        entry: &CandidateEntry,
        kind: MatchKind,
    ) -> ControlFlow<(), Disposition> {
        let disposition = match &self.mode {
            Mode::Analyze => {
                self.report(entry, kind);
                Disposition::Candidate
            }
            Mode::Interactive => match self.prompter.ask(entry, kind) {
                Response::Delete => self.delete(entry, kind),
                Response::Skip => {
                    info!("Skipped: {}", entry.path.display());
                    Disposition::Skipped
                }
                Response::Quit => {
                    info!("Operator quit at {}", entry.path.display());
                    return ControlFlow::Break(());
                }
            },
            Mode::Scheduled => self.delete(entry, kind),
            Mode::DryRun | Mode::Unrecognized(_) => {
                info!("Would delete {}: {}", describe(kind), entry.path.display());
                output::print_would_delete(&entry.path, entry.size);
                Disposition::Deferred
            }
        };
        self.ledger.record(&entry.path, entry.size, disposition);
        ControlFlow::Continue(disposition)
    }

    fn report(&self, entry: &CandidateEntry, kind: MatchKind) {
        match (kind, &entry.symlink) {
            (MatchKind::BrokenSymlink, Some(link)) => {
                info!(
                    "Found broken symlink: {} -> {}",
                    entry.path.display(),
                    link.target.display()
                );
                output::print_broken_link(&entry.path, &link.target);
            }
            _ => {
                info!(
                    "Found candidate: {} (size: {}, modified: {})",
                    entry.path.display(),
                    format_size(entry.size),
                    output::format_date(entry.modified)
                );
                output::print_candidate(&entry.path, entry.size, entry.modified);
            }
        }
    }

    fn delete(&self, entry: &CandidateEntry, kind: MatchKind) -> Disposition {
        match utils::remove_entry(&entry.path, entry.size) {
            Ok(freed) => {
                info!("Deleted {}: {}", describe(kind), entry.path.display());
                output::print_deleted(&entry.path, freed);
                Disposition::Deleted
            }
            Err(e) => {
                error!("Error deleting {}: {e}", entry.path.display());
                output::print_delete_error(&entry.path, &e.to_string());
                Disposition::Skipped
            }
        }
    }
}

fn describe(kind: MatchKind) -> &'static str {
    match kind {
        MatchKind::OldFile => "file",
        MatchKind::BrokenSymlink => "broken symlink",
    }
}

/// Prompter that replays fixed answers; quits when they run out.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<Response>,
    pub asked: Vec<std::path::PathBuf>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Response>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, entry: &CandidateEntry, _kind: MatchKind) -> Response {
        self.asked.push(entry.path.clone());
        self.answers.pop_front().unwrap_or(Response::Quit)
    }
}
