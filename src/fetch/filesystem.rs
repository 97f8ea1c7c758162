use std::path::{Path, PathBuf};

use crate::error::{FetchError, Result};

use super::BlobFetcher;

/// Reads `meta` and `{group}.{nr}` directly from a table's root directory.
#[derive(Debug, Clone)]
pub struct FilesystemFetcher {
    root: PathBuf,
}

impl FilesystemFetcher {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.root.join(name);
        std::fs::read(&path).map_err(|e| {
            let err = if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound(path.display().to_string())
            } else {
                FetchError::Io(e)
            };
            err.into()
        })
    }
}

impl BlobFetcher for FilesystemFetcher {
    fn read_meta(&self) -> Result<Vec<u8>> {
        self.read_file("meta")
    }

    fn read(&self, group_name: &str, blob_nr: u64) -> Result<Vec<u8>> {
        self.read_file(&format!("{group_name}.{blob_nr}"))
    }
}
