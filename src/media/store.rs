use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use super::MediaFolder;

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist `data` and return the relative path it can be served from.
    async fn save(&self, folder: MediaFolder, filename: &str, data: Bytes) -> Result<String, String>;

    async fn remove(&self, path: &str) -> Result<(), String>;
}

/// Files written below a root directory that is also served statically.
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save(&self, folder: MediaFolder, filename: &str, data: Bytes) -> Result<String, String> {
        let dir = self.root.join(folder.as_str());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| format!("Failed to create media directory: {e}"))?;

        let name = format!("{}-{}", Uuid::now_v7().simple(), sanitize_filename(filename));
        tokio::fs::write(dir.join(&name), &data)
            .await
            .map_err(|e| format!("Failed to write media file: {e}"))?;

        Ok(format!("{}/{name}", folder.as_str()))
    }

    async fn remove(&self, path: &str) -> Result<(), String> {
        if !super::is_media_path(path) {
            return Err(format!("Refusing to remove {path}: not inside the media root"));
        }
        match tokio::fs::remove_file(self.root.join(path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("Failed to remove media file: {e}")),
        }
    }
}

pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
