//! File write helpers

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Create or truncate `path` and write `bytes` to it
pub(crate) fn write_file(path: &Path, bytes: &[u8], sync: bool) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    file.write_all(bytes)?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}

/// Replace `path` with `bytes` via a sibling temp file and a rename
///
/// Readers see either the old contents or the new ones, never a torn file.
pub(crate) fn atomic_write(path: &Path, bytes: &[u8], sync: bool) -> Result<()> {
    let tmp = tmp_path(path);
    write_file(&tmp, bytes, sync)?;
    std::fs::rename(&tmp, path)?;

    if sync {
        if let Some(parent) = path.parent() {
            File::open(parent)?.sync_all()?;
        }
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
