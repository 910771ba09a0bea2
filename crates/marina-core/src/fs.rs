//! Filesystem utilities for replacing the data file in one step.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Hidden sibling path used while writing `destination`.
///
/// The name carries the process id and a timestamp (`.boats.csv.<pid>.<nanos>.tmp`)
/// so it does not land on a file the user keeps next to the data file.
pub fn temp_path_for(destination: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let mut name = OsString::from(".");
    name.push(
        destination
            .file_name()
            .unwrap_or_else(|| OsStr::new("marina")),
    );
    name.push(format!(".{}.{}.tmp", std::process::id(), nanos));
    destination.with_file_name(name)
}

/// Rename a fully written temp file over the destination.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination already exists.
/// In that case the destination is removed and the rename retried.
/// If the rename ultimately fails, the temp file is cleaned up.
///
/// # Errors
///
/// Returns an error if the rename fails even after the fallback attempt.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        // Only retry when the target is a plain file we are allowed to replace.
        if destination.is_file() {
            let _ = fs::remove_file(destination);
            if fs::rename(temp_path, destination).is_ok() {
                return Ok(());
            }
        }
        let _ = fs::remove_file(temp_path);
        return Err(io::Error::new(
            initial_err.kind(),
            format!(
                "could not move {} into place: {}",
                temp_path.display(),
                initial_err
            ),
        ));
    }
    Ok(())
}
