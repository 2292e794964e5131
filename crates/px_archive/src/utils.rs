use px_core::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `bytes` to `path` through a temporary file in the same directory, so
/// readers never observe a partially written document.
pub fn write_atomic_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
