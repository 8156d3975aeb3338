//! Scoped temporary files for backends that need a path on disk.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use tracing::{debug, warn};

const TEMP_PREFIX: &str = "doccompare-";

/// A temporary file that lives exactly as long as this guard.
///
/// Names are random (collision-resistant across concurrent calls) and keep
/// the document's extension as suffix, since some converters sniff it.
/// Dropping the guard deletes the file; a failed deletion is logged and
/// otherwise ignored so it never masks the caller's real result.
#[derive(Debug)]
pub(crate) struct ScopedTempFile {
    file: Option<NamedTempFile>,
    path: PathBuf,
}

impl ScopedTempFile {
    pub(crate) fn create(bytes: &[u8], extension: &str, dir: Option<&Path>) -> io::Result<Self> {
        let mut builder = Builder::new();
        builder.prefix(TEMP_PREFIX).suffix(extension);
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(bytes)?;
        file.flush()?;

        let path = file.path().to_path_buf();
        debug!(path = %path.display(), bytes = bytes.len(), "temp_file_created");
        Ok(Self {
            file: Some(file),
            path,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScopedTempFile {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            match file.close() {
                Ok(()) => debug!(path = %self.path.display(), "temp_file_removed"),
                Err(err) => warn!(
                    path = %self.path.display(),
                    error = %err,
                    "temp_file_cleanup_failed"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_holds_bytes_and_disappears_on_drop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scoped = ScopedTempFile::create(b"payload", ".pdf", Some(dir.path())).expect("create");
        let path = scoped.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(std::fs::read(&path).expect("read back"), b"payload");
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(name.starts_with(TEMP_PREFIX));
        assert!(name.ends_with(".pdf"));

        drop(scoped);
        assert!(!path.exists());
    }

    #[test]
    fn concurrent_files_get_distinct_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = ScopedTempFile::create(b"a", ".doc", Some(dir.path())).expect("a");
        let b = ScopedTempFile::create(b"b", ".doc", Some(dir.path())).expect("b");
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn externally_removed_file_does_not_panic_on_drop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scoped = ScopedTempFile::create(b"x", ".odt", Some(dir.path())).expect("create");
        std::fs::remove_file(scoped.path()).expect("remove early");
        drop(scoped);
    }
}
