use std::path::{Path, PathBuf};

use crate::error::SizeParseError;

/// Size unit suffixes and their binary multipliers.
const SIZE_UNITS: &[(&str, u64)] = &[
    ("B", 1),
    ("KB", 1 << 10),
    ("MB", 1 << 20),
    ("GB", 1 << 30),
    ("TB", 1 << 40),
];

/// Parse human-readable size string ("100MB", "1.5 gb", "512") into bytes.
/// A bare number is taken as bytes.
pub fn parse_size(s: &str) -> Result<u64, SizeParseError> {
    let s = s.trim();
    let split = s
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(s.len());
    let (num_str, unit) = (s[..split].trim(), s[split..].trim().to_ascii_uppercase());

    let multiplier = if unit.is_empty() {
        1
    } else {
        SIZE_UNITS
            .iter()
            .find(|(suffix, _)| *suffix == unit)
            .map(|(_, m)| *m)
            .ok_or_else(|| SizeParseError::UnknownUnit {
                input: s.to_string(),
                unit: unit.clone(),
            })?
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| SizeParseError::InvalidNumber(s.to_string()))?;

    if num < 0.0 {
        return Err(SizeParseError::Negative(s.to_string()));
    }

    Ok((num * multiplier as f64) as u64)
}

/// Format byte count as human-readable string.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1_099_511_627_776 {
        format!("{:.2} TB", bytes as f64 / 1_099_511_627_776.0)
    } else if bytes >= 1_073_741_824 {
        format!("{:.2} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1_024 {
        format!("{:.2} KB", bytes as f64 / 1_024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Expand a leading `~` to the home directory. Other paths are returned as is.
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = dirs::home_dir() else {
        return path.to_string();
    };
    if path == "~" {
        home.display().to_string()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest).display().to_string()
    } else {
        path.to_string()
    }
}

/// Shorten a path for display by replacing home dir with ~.
pub fn display_path(path: &Path) -> String {
    match dirs::home_dir() {
        Some(home) => match path.strip_prefix(&home) {
            Ok(relative) => format!("~/{}", relative.display()),
            Err(_) => path.display().to_string(),
        },
        None => path.display().to_string(),
    }
}

/// Absolute form of `path` without resolving symlinks.
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Remove a non-directory entry (file or symlink). Returns bytes freed.
/// The link itself is removed for symlinks, never its target.
pub fn remove_entry(path: &Path, size: u64) -> Result<u64, std::io::Error> {
    std::fs::remove_file(path)?;
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_size_uses_binary_multiples() {
        assert_eq!(parse_size("1KB"), Ok(1024));
        assert_eq!(parse_size("10MB"), Ok(10 * 1024 * 1024));
        assert_eq!(parse_size("2 GB"), Ok(2 * 1024 * 1024 * 1024));
        assert_eq!(parse_size("1TB"), Ok(1 << 40));
        assert_eq!(parse_size("512"), Ok(512));
        assert_eq!(parse_size("100B"), Ok(100));
    }

    #[test]
    fn parse_size_is_case_insensitive_and_fractional() {
        assert_eq!(parse_size("1.5kb"), Ok(1536));
        assert_eq!(parse_size(" 0.5 Mb "), Ok(512 * 1024));
    }

    #[test]
    fn parse_size_rejects_unknown_unit() {
        assert!(matches!(
            parse_size("10XB"),
            Err(SizeParseError::UnknownUnit { ref unit, .. }) if unit == "XB"
        ));
        assert!(matches!(
            parse_size("10 bytes"),
            Err(SizeParseError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn parse_size_rejects_bad_numbers() {
        assert!(matches!(parse_size("MB"), Err(SizeParseError::InvalidNumber(_))));
        assert!(matches!(parse_size(""), Err(SizeParseError::InvalidNumber(_))));
        assert!(matches!(parse_size("-5MB"), Err(SizeParseError::Negative(_))));
    }

    #[test]
    fn format_size_picks_largest_unit() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(5 * 1_048_576), "5.00 MB");
        assert_eq!(format_size(3 * 1_073_741_824), "3.00 GB");
    }

    #[test]
    fn expand_tilde_leaves_plain_paths_alone() {
        assert_eq!(expand_tilde("/var/log"), "/var/log");
        assert_eq!(expand_tilde("logs/~old"), "logs/~old");
    }
}
