//! Expansion of configured path strings into directories to walk.
//!
//! Three forms are accepted:
//! - a literal directory (`/var/tmp/builds`)
//! - a single-level glob (`/var/log/app*`), expanded against the filesystem;
//!   every matching directory becomes its own root
//! - a recursive glob (`/srv/cache/**` or `/srv/cache/**/*.tmp`); the literal
//!   base is walked and the remainder is matched against each entry's path
//!   relative to that base
//!
//! A wildcard spec must have a literal base before its first `*`. `**` or
//! `*.log` on their own are rejected instead of being taken as the root or
//! the working directory.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

use crate::error::ResolveError;
use crate::utils;

/// A configured path, classified by its wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSpec<'a> {
    Literal(&'a str),
    Glob { base: &'a str, pattern: &'a str },
    Recursive { base: &'a str, pattern: &'a str },
}

impl<'a> PathSpec<'a> {
    pub fn classify(spec: &'a str) -> Result<Self, ResolveError> {
        let Some(star) = spec.find('*') else {
            return Ok(PathSpec::Literal(spec));
        };
        if star == 0 {
            return Err(ResolveError::EmptyBase(spec.to_string()));
        }

        let (base, pattern) = match spec[..star].rfind('/') {
            Some(0) => ("/", &spec[1..]),
            Some(i) => (&spec[..i], &spec[i + 1..]),
            None => (".", spec),
        };
        let pattern = pattern.trim_end_matches('/');

        if spec.contains("**") {
            Ok(PathSpec::Recursive { base, pattern })
        } else {
            Ok(PathSpec::Glob { base, pattern })
        }
    }
}

/// A directory to walk. `filter`, when set, must match an entry's path
/// relative to `dir` for the entry to be considered.
#[derive(Debug, Clone)]
pub struct TraversalRoot {
    pub dir: PathBuf,
    pub filter: Option<GlobMatcher>,
}

impl TraversalRoot {
    fn plain(dir: &Path) -> Self {
        Self {
            dir: utils::absolute(dir),
            filter: None,
        }
    }

    /// Whether `path` (somewhere below `dir`) passes the root's pattern.
    pub fn admits(&self, path: &Path) -> bool {
        match &self.filter {
            None => true,
            Some(matcher) => path
                .strip_prefix(&self.dir)
                .map(|rel| matcher.is_match(rel))
                .unwrap_or(false),
        }
    }
}

/// Resolve one spec into zero or more roots.
pub fn resolve(spec: &str) -> Result<Vec<TraversalRoot>, ResolveError> {
    match PathSpec::classify(spec)? {
        PathSpec::Literal(path) => {
            let path = Path::new(path);
            check_dir(path)?;
            Ok(vec![TraversalRoot::plain(path)])
        }
        PathSpec::Glob { base, pattern } => {
            let base = Path::new(base);
            check_dir(base)?;
            expand_glob(spec, base, pattern)
        }
        PathSpec::Recursive { base, pattern } => {
            let base = Path::new(base);
            check_dir(base)?;
            let matcher = compile(spec, pattern)?;
            Ok(vec![TraversalRoot {
                dir: utils::absolute(base),
                filter: Some(matcher),
            }])
        }
    }
}

/// Resolve every spec of a rule. Failures are logged and skipped.
pub fn resolve_all(specs: &[String]) -> Vec<TraversalRoot> {
    let mut roots = Vec::new();
    for spec in specs {
        match resolve(spec) {
            Ok(found) if found.is_empty() => {
                warn!("No directories matched wildcard path: {spec}");
            }
            Ok(found) => {
                for root in &found {
                    debug!("Matched directory: {}", root.dir.display());
                }
                roots.extend(found);
            }
            Err(e) => error!("{e}"),
        }
    }
    roots
}

fn check_dir(path: &Path) -> Result<(), ResolveError> {
    let meta = std::fs::metadata(path).map_err(|source| ResolveError::Inaccessible {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ResolveError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

fn compile(spec: &str, pattern: &str) -> Result<GlobMatcher, ResolveError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| ResolveError::Pattern {
            spec: spec.to_string(),
            source,
        })
}

/// Expand a single-level glob: every directory exactly as deep below `base`
/// as the pattern has segments, whose relative path matches.
fn expand_glob(spec: &str, base: &Path, pattern: &str) -> Result<Vec<TraversalRoot>, ResolveError> {
    let matcher = compile(spec, pattern)?;
    let depth = pattern.split('/').filter(|s| !s.is_empty()).count();

    let mut roots = Vec::new();
    for entry in WalkDir::new(base)
        .min_depth(depth)
        .max_depth(depth)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!("Skipping unreadable path while expanding {spec}: {e}");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let matched = entry
            .path()
            .strip_prefix(base)
            .map(|rel| matcher.is_match(rel))
            .unwrap_or(false);
        if matched {
            roots.push(TraversalRoot::plain(entry.path()));
        }
    }
    Ok(roots)
}
