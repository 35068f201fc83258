use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::Utc;
use rand::Rng;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::errors::FileStoreError;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A file read back from the store.
#[derive(Debug)]
pub struct StoredFile {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Flat on-disk store for uploaded project images.
///
/// Files are addressed by the generated name returned from [`LocalFileStore::save`];
/// any directory component in a name handed back to the store is discarded, so
/// lookups never leave `root`.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the storage directory (and parents) when missing.
    pub async fn ensure_ready(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.root).await?;
        info!("Upload directory ready at {}", self.root.display());
        Ok(())
    }

    /// Writes `bytes` under a freshly generated name and returns that name.
    pub async fn save(
        &self,
        field_name: &str,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, FileStoreError> {
        let stored_name = generate_stored_name(field_name, original_filename);
        let path = self.root.join(&stored_name);

        fs::write(&path, bytes)
            .await
            .map_err(|e| FileStoreError::Write(stored_name.clone(), e))?;

        debug!("Stored {} ({} bytes)", stored_name, bytes.len());
        Ok(stored_name)
    }

    /// Best-effort removal. Empty or unknown names are ignored and failures are
    /// only logged.
    pub async fn delete(&self, stored_name: &str) {
        let Some(path) = self.resolve(stored_name) else {
            return;
        };

        match fs::remove_file(&path).await {
            Ok(()) => debug!("Deleted stored file {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to delete stored file {}: {}", path.display(), e),
        }
    }

    /// Reads a stored file, `Ok(None)` when it does not exist.
    pub async fn read(&self, stored_name: &str) -> Result<Option<StoredFile>, FileStoreError> {
        let path = self
            .resolve(stored_name)
            .ok_or_else(|| FileStoreError::InvalidName(stored_name.to_string()))?;

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => return Ok(None),
            Err(e) => return Err(FileStoreError::Read(stored_name.to_string(), e)),
        };

        let content_type = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

        Ok(Some(StoredFile {
            content_type,
            bytes,
        }))
    }

    pub async fn exists(&self, stored_name: &str) -> bool {
        match self.resolve(stored_name) {
            Some(path) => fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false),
            None => false,
        }
    }

    /// Maps a stored name to its path inside the store, keeping only the last
    /// path component.
    fn resolve(&self, stored_name: &str) -> Option<PathBuf> {
        let last = stored_name.rsplit(['/', '\\']).next()?;
        if last.is_empty() || last == "." || last == ".." {
            return None;
        }
        Some(self.root.join(last))
    }
}

/// `{field}-{epoch millis}-{9 random digits}{.ext}`
pub fn generate_stored_name(field_name: &str, original_filename: Option<&str>) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(100_000_000..1_000_000_000);

    format!("{}-{}-{}{}", field_name, millis, suffix, original_extension(original_filename))
}

fn original_extension(original_filename: Option<&str>) -> String {
    original_filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}
