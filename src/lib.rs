//! Rule-driven cleanup of old files and broken symlinks.
//!
//! Each [`Rule`] names directories (literal, `*` globs, or `**` globs), an
//! age in days, optional size bounds, and a [`Mode`]. The [`RuleEngine`]
//! walks the directories, tests every file against the rule's
//! [`PredicateSet`], and lets the [`Disposer`] report, defer, prompt for,
//! or delete each match. Deferred and deleted entries accumulate in a
//! [`RunAccumulator`] shared by all rules of a run.

pub mod cli;
pub mod config;
pub mod disk_info;
pub mod disposer;
pub mod engine;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod output;
pub mod predicate;
pub mod resolver;
pub mod rule;
pub mod summary;
pub mod survey;
pub mod utils;

pub use disposer::{Disposer, Disposition, Prompter, Response, ScriptedPrompter, TerminalPrompter};
pub use engine::{RuleEngine, RuleReport, RunOutcome, RunSettings};
pub use entry::CandidateEntry;
pub use ledger::RunAccumulator;
pub use predicate::{MatchKind, PredicateSet};
pub use rule::{Mode, Rule, SizeBounds};
