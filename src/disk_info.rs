use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskInfo {
    pub total: u64,
    pub available: u64,
    pub used: u64,
}

/// Space on the filesystem holding `path`.
#[cfg(unix)]
pub fn get_disk_info(path: &Path) -> Option<DiskInfo> {
    use std::ffi::CString;
    use std::mem::MaybeUninit;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes()).ok()?;
    let mut stat = MaybeUninit::<libc::statvfs>::uninit();
    let ret = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
    if ret != 0 {
        return None;
    }
    let stat = unsafe { stat.assume_init() };
    let block_size = stat.f_frsize as u64;
    let total = stat.f_blocks as u64 * block_size;
    let available = stat.f_bavail as u64 * block_size;
    let used = total.saturating_sub(available);
    Some(DiskInfo {
        total,
        available,
        used,
    })
}

#[cfg(not(unix))]
pub fn get_disk_info(_path: &Path) -> Option<DiskInfo> {
    None
}

/// Line for the summary comparing space before and after a run.
pub fn describe_change(before: Option<DiskInfo>, after: Option<DiskInfo>, deleted: usize) -> String {
    use crate::utils::format_size;

    match (before, after) {
        (Some(b), Some(a)) if b.available != a.available => format!(
            "File system differences before and after old files were removed:\n\
             Available space before: {}\n\
             Available space after: {}",
            format_size(b.available),
            format_size(a.available)
        ),
        (None, _) | (_, None) => "Disk usage unavailable".to_string(),
        _ if deleted == 0 => "No files were deleted\nNo changes to file system".to_string(),
        _ => "No changes to file system".to_string(),
    }
}
