use anyhow::Result;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// URL prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Local directory holding uploaded answer videos.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Writes a video under a fresh name and returns its public URL.
    pub async fn save_video(&self, bytes: &[u8]) -> Result<String> {
        self.ensure_dir().await?;
        let file_name = format!("{}.webm", Uuid::new_v4());
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;
        tracing::info!(file = %file_name, size = bytes.len(), "stored answer video");
        Ok(format!("{PUBLIC_PREFIX}/{file_name}"))
    }

    /// Deletes a file previously returned by `save_video`. Failures are only
    /// logged.
    pub async fn remove(&self, url: &str) {
        let Some(file_name) = url
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
        else {
            tracing::warn!(url, "refusing to remove file outside the upload dir");
            return;
        };
        if let Err(e) = tokio::fs::remove_file(self.dir.join(file_name)).await {
            tracing::warn!(file = %file_name, "failed to remove orphaned upload: {}", e);
        }
    }
}
