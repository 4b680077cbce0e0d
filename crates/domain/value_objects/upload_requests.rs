use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub local_path: PathBuf,
    pub display_name: String,
    pub size_bytes: u64,
}

impl UploadRequest {
    pub fn new(
        local_path: impl Into<PathBuf>,
        display_name: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            local_path: local_path.into(),
            display_name: display_name.into(),
            size_bytes,
        }
    }

    /// Builds a request from a file on disk. Falls back to the file name when
    /// no display name is given.
    pub async fn from_path(path: &Path, display_name: Option<String>) -> Result<Self> {
        let metadata = fs::metadata(path)
            .await
            .with_context(|| format!("failed to read metadata for {}", path.display()))?;
        if !metadata.is_file() {
            bail!("not a regular file: {}", path.display());
        }

        let display_name = match display_name.filter(|name| !name.trim().is_empty()) {
            Some(name) => name,
            None => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .with_context(|| format!("path has no file name: {}", path.display()))?,
        };

        Ok(Self {
            local_path: path.to_path_buf(),
            display_name,
            size_bytes: metadata.len(),
        })
    }
}
