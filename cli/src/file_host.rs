//! `FileHost` backed by the local filesystem, rooted at a single
//! directory so guest-supplied filenames can't escape it.

use std::fs;
use std::path::{Path, PathBuf};

use phosphor_core::error::FileTransferError;
use phosphor_core::pia::FileHost;

pub struct LocalFileHost {
    root: PathBuf,
}

impl LocalFileHost {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, filename: &str) -> PathBuf {
        let trimmed = filename.trim();
        self.root.join(Path::new(trimmed).file_name().unwrap_or_default())
    }
}

impl FileHost for LocalFileHost {
    fn load(&mut self, filename: &str) -> Result<Vec<u8>, FileTransferError> {
        if filename.trim().is_empty() {
            return Err(FileTransferError::EmptySelection);
        }
        Ok(fs::read(self.resolve(filename))?)
    }

    fn save(&mut self, filename: &str, data: &[u8]) -> Result<(), FileTransferError> {
        if filename.trim().is_empty() {
            return Err(FileTransferError::EmptySelection);
        }
        fs::write(self.resolve(filename), data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_temp_directory() {
        let dir = std::env::temp_dir().join(format!("phosphor-cli-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let mut host = LocalFileHost::new(&dir);
        host.save("OUT.BIN", &[1, 2, 3]).unwrap();
        let data = host.load("OUT.BIN").unwrap();
        assert_eq!(data, vec![1, 2, 3]);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn empty_filename_is_rejected() {
        let mut host = LocalFileHost::new(std::env::temp_dir());
        assert!(matches!(
            host.load(""),
            Err(FileTransferError::EmptySelection)
        ));
    }
}
