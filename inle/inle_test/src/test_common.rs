use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Sets the modification time of `path` to `secs` seconds after the epoch.
/// Tests use explicit timestamps rather than sleeping, since filesystem mtime
/// granularity can be as coarse as a second.
pub fn set_file_mtime(path: &Path, secs: u64) {
    let file = File::options()
        .write(true)
        .open(path)
        .unwrap_or_else(|err| panic!("Failed to open {:?}: {}", path, err));
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap_or_else(|err| panic!("Failed to set mtime of {:?}: {}", path, err));
}
