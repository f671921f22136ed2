//! Filesystem helpers.

use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Write `contents` to `path` by way of a temp file in the same directory and
/// a rename, so readers see either the old file or the complete new one.
///
/// An existing file's permissions are carried over; new files get `0644` on
/// Unix instead of the temp file's `0600`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    match std::fs::metadata(path) {
        Ok(meta) => std::fs::set_permissions(tmp.path(), meta.permissions())?,
        Err(_) => {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o644))?;
            }
        }
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
