//! File system utilities.

use std::fs;
use std::io;
use std::path::Path;

/// Writes content to a file atomically using a temp file and rename.
///
/// The temp file lives next to the target so the rename stays on one
/// filesystem. Missing parent directories are created first.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = parent.join(format!(".{file_name}.tmp"));

    fs::write(&temp_path, content)?;

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    Ok(())
}
