use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

/// Where a symlink points and whether anything is there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkInfo {
    /// The link's target as stored.
    pub target: PathBuf,
    /// The target resolved against the link's directory.
    pub resolved: PathBuf,
    pub dangling: bool,
}

/// A non-directory entry met during traversal. Size and mtime come from the
/// entry itself, never from a symlink's target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntry {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    pub symlink: Option<SymlinkInfo>,
}

impl CandidateEntry {
    pub fn from_dir_entry(entry: &walkdir::DirEntry) -> io::Result<Self> {
        let meta = entry.metadata().map_err(io::Error::from)?;
        Self::build(entry.path(), &meta)
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        let meta = std::fs::symlink_metadata(path)?;
        Self::build(path, &meta)
    }

    fn build(path: &Path, meta: &std::fs::Metadata) -> io::Result<Self> {
        let symlink = if meta.file_type().is_symlink() {
            Some(inspect_link(path)?)
        } else {
            None
        };
        Ok(Self {
            path: path.to_path_buf(),
            size: meta.len(),
            modified: meta.modified()?,
            symlink,
        })
    }

    pub fn is_broken_symlink(&self) -> bool {
        self.symlink.as_ref().is_some_and(|link| link.dangling)
    }
}

fn inspect_link(path: &Path) -> io::Result<SymlinkInfo> {
    let target = std::fs::read_link(path)?;
    let resolved = if target.is_absolute() {
        target.clone()
    } else {
        path.parent().unwrap_or(Path::new(".")).join(&target)
    };
    // Only a definite "not found" counts as dangling.
    let dangling = match resolved.try_exists() {
        Ok(exists) => !exists,
        Err(e) => {
            debug!("Cannot check symlink target {}: {e}", resolved.display());
            false
        }
    };
    Ok(SymlinkInfo {
        target,
        resolved,
        dangling,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::symlink;

    #[test]
    fn relative_link_to_existing_file_is_not_dangling() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("real.txt"), b"data").unwrap();
        let link = tmp.path().join("sub/link");
        symlink("../real.txt", &link).unwrap();

        let entry = CandidateEntry::from_path(&link).unwrap();
        let info = entry.symlink.as_ref().unwrap();
        assert_eq!(info.target, PathBuf::from("../real.txt"));
        assert_eq!(info.resolved, tmp.path().join("sub/../real.txt"));
        assert!(!entry.is_broken_symlink());
    }

    #[test]
    fn link_to_removed_target_is_dangling() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("gone.txt");
        fs::write(&target, b"data").unwrap();
        let link = tmp.path().join("link");
        symlink(&target, &link).unwrap();
        fs::remove_file(&target).unwrap();

        let entry = CandidateEntry::from_path(&link).unwrap();
        assert!(entry.is_broken_symlink());
    }

    #[test]
    fn regular_file_has_no_link_info() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("f");
        fs::write(&file, b"12345").unwrap();
        let entry = CandidateEntry::from_path(&file).unwrap();
        assert_eq!(entry.size, 5);
        assert!(entry.symlink.is_none());
        assert!(!entry.is_broken_symlink());
    }
}
