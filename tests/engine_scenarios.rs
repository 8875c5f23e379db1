use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use filetime::{set_file_mtime, FileTime};
use tempfile::TempDir;

use dirclean::disposer::{Response, ScriptedPrompter};
use dirclean::{
    config, CandidateEntry, Disposition, MatchKind, Mode, PredicateSet, Rule, RuleEngine,
    RunOutcome, RunSettings,
};

const DAY: u64 = 86_400;

struct Tree {
    dir: TempDir,
    now: SystemTime,
}

impl Tree {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
            now: SystemTime::now(),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn spec(&self) -> String {
        self.root().display().to_string()
    }

    /// Write `len` bytes at `rel` and backdate it by `age_days`.
    fn file(&self, rel: &str, len: usize, age_days: u64) -> std::path::PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, vec![b'.'; len]).unwrap();
        let t = self.now - Duration::from_secs(age_days * DAY);
        set_file_mtime(&path, FileTime::from_system_time(t)).unwrap();
        path
    }

    fn engine(&self) -> RuleEngine<ScriptedPrompter> {
        RuleEngine::new(RunSettings::at(self.now), ScriptedPrompter::default())
    }
}

#[test]
fn dry_run_records_old_file_and_keeps_it() {
    let tree = Tree::new();
    let old = tree.file("x/old.log", 100, 10);
    let fresh = tree.file("x/fresh.log", 100, 1);

    let rule = Rule::new(5, vec![tree.root().join("x").display().to_string()], Mode::DryRun);
    let mut engine = tree.engine();
    let report = engine.run(&rule);

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].disposition, Disposition::Deferred);
    let ledger: Vec<_> = engine.ledger().paths().collect();
    assert_eq!(ledger, vec![old.as_path()]);
    assert!(old.exists());
    assert!(fresh.exists());
}

#[test]
fn scheduled_deletes_old_file() {
    let tree = Tree::new();
    let old = tree.file("x/old.log", 100, 10);

    let rule = Rule::new(5, vec![tree.spec()], Mode::Scheduled);
    let mut engine = tree.engine();
    engine.run(&rule);

    assert!(!old.exists());
    assert_eq!(engine.ledger().paths().collect::<Vec<_>>(), vec![old.as_path()]);
    assert_eq!(engine.ledger().total_bytes(), 100);
}

#[test]
fn min_size_excludes_small_old_file() {
    let tree = Tree::new();
    let small = tree.file("small.bin", 1024, 30);

    let rule = Rule::new(5, vec![tree.spec()], Mode::Scheduled)
        .with_size(Some(10 * 1024 * 1024), None);
    let mut engine = tree.engine();
    let report = engine.run(&rule);

    assert!(report.entries.is_empty());
    assert!(engine.ledger().is_empty());
    assert!(small.exists());
}

#[test]
fn inverted_size_bounds_match_nothing() {
    let tree = Tree::new();
    for (i, len) in [1usize, 500, 5000].iter().enumerate() {
        tree.file(&format!("f{i}"), *len, 40);
    }

    let rule = Rule::new(1, vec![tree.spec()], Mode::DryRun).with_size(Some(4000), Some(2));
    let report = tree.engine().run(&rule);
    assert!(report.entries.is_empty());
}

#[test]
fn interactive_quit_ends_the_run() {
    let tree = Tree::new();
    let a = tree.file("a.log", 1, 30);
    let b = tree.file("b.log", 1, 30);
    let c = tree.file("c.log", 1, 30);

    let rules = vec![
        Rule::new(5, vec![tree.spec()], Mode::Interactive),
        Rule::new(5, vec![tree.spec()], Mode::Scheduled),
    ];
    let mut engine = RuleEngine::new(
        RunSettings::at(tree.now),
        ScriptedPrompter::new([Response::Skip, Response::Quit]),
    );

    assert_eq!(engine.run_all(&rules), RunOutcome::Quit);
    assert_eq!(engine.prompter().asked, vec![a.clone(), b.clone()]);
    assert!(a.exists() && b.exists() && c.exists());
    assert!(engine.ledger().is_empty());
}

#[test]
fn analyze_is_repeatable_and_changes_nothing() {
    let tree = Tree::new();
    tree.file("one.txt", 10, 20);
    tree.file("deep/two.txt", 10, 20);
    tree.file("new.txt", 10, 0);

    let rule = Rule::new(7, vec![tree.spec()], Mode::Analyze);
    let mut engine = tree.engine();
    let first = engine.run(&rule);
    let second = engine.run(&rule);

    assert_eq!(first.entries.len(), 2);
    assert_eq!(first.entries, second.entries);
    assert!(first
        .entries
        .iter()
        .all(|e| e.disposition == Disposition::Candidate && e.path.exists()));
    assert!(engine.ledger().is_empty());
}

#[test]
fn dry_run_ledger_entries_still_match_when_rechecked() {
    let tree = Tree::new();
    tree.file("a/1.dat", 2048, 15);
    tree.file("a/2.dat", 10, 15);
    tree.file("b/3.dat", 4096, 90);
    tree.file("b/4.dat", 4096, 2);

    let rule = Rule::new(10, vec![tree.spec()], Mode::DryRun).with_size(Some(1024), Some(8192));
    let mut engine = tree.engine();
    engine.run(&rule);

    let predicates = PredicateSet::new(&rule, tree.now);
    assert_eq!(engine.ledger().len(), 2);
    for path in engine.ledger().paths() {
        let entry = CandidateEntry::from_path(path).unwrap();
        assert!(predicates.matches(&entry), "{} no longer matches", path.display());
    }
}

#[test]
fn single_level_glob_selects_matching_directories() {
    let tree = Tree::new();
    let hit = tree.file("cache-a/old.bin", 5, 30);
    let hit2 = tree.file("cache-b/old.bin", 5, 30);
    let miss = tree.file("keep/old.bin", 5, 30);

    let rule = Rule::new(5, vec![format!("{}/cache*", tree.spec())], Mode::Scheduled);
    tree.engine().run(&rule);

    assert!(!hit.exists());
    assert!(!hit2.exists());
    assert!(miss.exists());
}

#[test]
fn recursive_glob_reaches_nested_files() {
    let tree = Tree::new();
    let nested = tree.file("b/c/d/file.txt", 5, 30);

    let rule = Rule::new(5, vec![format!("{}/b/**", tree.spec())], Mode::DryRun);
    let mut engine = tree.engine();
    engine.run(&rule);
    assert_eq!(engine.ledger().paths().collect::<Vec<_>>(), vec![nested.as_path()]);
}

#[test]
fn bad_paths_do_not_stop_the_rule() {
    let tree = Tree::new();
    let old = tree.file("old.log", 5, 30);

    let rule = Rule::new(
        5,
        vec![
            "**".to_string(),
            tree.root().join("missing").display().to_string(),
            old.display().to_string(),
            tree.spec(),
        ],
        Mode::DryRun,
    );
    let mut engine = tree.engine();
    engine.run(&rule);
    assert_eq!(engine.ledger().len(), 1);
}

#[test]
fn unrecognized_mode_acts_as_dry_run() {
    let tree = Tree::new();
    let old = tree.file("old.log", 5, 30);

    let rule = Rule::new(5, vec![tree.spec()], Mode::parse("obliterate"));
    let report = tree.engine().run(&rule);
    assert_eq!(report.entries[0].disposition, Disposition::Deferred);
    assert!(old.exists());
}

#[cfg(unix)]
#[test]
fn broken_symlinks_are_removed_and_valid_ones_kept() {
    use std::os::unix::fs::symlink;

    let tree = Tree::new();
    let target = tree.file("data/target.txt", 5, 0);
    let valid = tree.root().join("links/valid");
    let broken = tree.root().join("links/broken");
    fs::create_dir_all(valid.parent().unwrap()).unwrap();
    symlink("../data/target.txt", &valid).unwrap();
    symlink("../data/gone.txt", &broken).unwrap();

    let rule = Rule::new(30, vec![tree.root().join("links").display().to_string()], Mode::Scheduled)
        .with_broken_symlinks(true);
    let mut engine = tree.engine();
    let report = engine.run(&rule);

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].kind, MatchKind::BrokenSymlink);
    assert!(fs::symlink_metadata(&broken).is_err());
    assert!(fs::symlink_metadata(&valid).is_ok());
    assert!(target.exists());
}

#[cfg(unix)]
#[test]
fn broken_symlinks_are_ignored_when_disabled() {
    use std::os::unix::fs::symlink;

    let tree = Tree::new();
    let broken = tree.root().join("broken");
    symlink("nowhere", &broken).unwrap();

    let rule = Rule::new(30, vec![tree.spec()], Mode::Scheduled);
    let report = tree.engine().run(&rule);
    assert!(report.entries.is_empty());
    assert!(fs::symlink_metadata(&broken).is_ok());
}

#[test]
fn config_rules_drive_the_engine() {
    let tree = Tree::new();
    let big = tree.file("logs/big.log", 4096, 20);
    let small = tree.file("logs/small.log", 16, 20);
    let tmp = tree.file("tmp/scratch", 16, 20);

    let yaml = format!(
        r#"
defaults:
  mode: scheduled
rules:
  - delete_older_than_days: 10
    paths: ["{logs}"]
    min_file_size: 1KB
  - delete_older_than_days: 10
    paths: ["{tmp}"]
    mode: dry-run
  - delete_older_than_days: 10
    paths: ["{tmp}"]
    max_file_size: 12 parsecs
"#,
        logs = tree.root().join("logs").display(),
        tmp = tree.root().join("tmp").display(),
    );
    let config = config::parse(&yaml, Path::new("inline.yaml")).unwrap();
    assert_eq!(config.rules.len(), 2);
    assert_eq!(config.rejected.len(), 1);

    let mut engine = tree.engine();
    assert_eq!(engine.run_all(&config.rules), RunOutcome::Completed);

    assert!(!big.exists());
    assert!(small.exists());
    assert!(tmp.exists());
    assert_eq!(engine.ledger().len(), 2);
    assert_eq!(engine.ledger().deleted_count(), 1);
}
