use async_trait::async_trait;
use image::ImageFormat;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

/// Directory under the storage root that holds avatars.
pub const AVATAR_DIR: &str = "avatars";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),
}

/// Image formats accepted for avatars, detected from the file contents.
///
/// Returns the file extension to store the image under.
pub fn detect_image_extension(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Png => Some("png"),
        ImageFormat::Jpeg => Some("jpg"),
        ImageFormat::Gif => Some("gif"),
        ImageFormat::Bmp => Some("bmp"),
        ImageFormat::WebP => Some("webp"),
        _ => None,
    }
}

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait AvatarStore: Send + Sync {
    /// Persist the image and return its path relative to the storage root
    async fn store(&self, bytes: &[u8], extension: &str) -> Result<String, StorageError>;
    async fn delete(&self, relative_path: &str) -> Result<(), StorageError>;
}

/// Avatars on the local filesystem under `<root>/avatars`.
pub struct LocalAvatarStore {
    root: PathBuf,
}

impl LocalAvatarStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(relative_path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || relative_path.is_empty() {
            return Err(StorageError::InvalidPath(relative_path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AvatarStore for LocalAvatarStore {
    async fn store(&self, bytes: &[u8], extension: &str) -> Result<String, StorageError> {
        let dir = self.root.join(AVATAR_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), extension);
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        let relative = format!("{}/{}", AVATAR_DIR, file_name);
        tracing::debug!("Stored avatar at {}", relative);
        Ok(relative)
    }

    async fn delete(&self, relative_path: &str) -> Result<(), StorageError> {
        let path = self.resolve(relative_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers;

    #[test]
    fn test_detect_image_extension() {
        let png = test_helpers::sample_png().expect("png encodes");
        assert_eq!(detect_image_extension(&png), Some("png"));
        assert_eq!(detect_image_extension(b"definitely not an image"), None);
        assert_eq!(detect_image_extension(&[]), None);
    }

    #[tokio::test]
    async fn test_store_and_delete() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = LocalAvatarStore::new(dir.path());
        let png = test_helpers::sample_png().expect("png encodes");

        let relative = store.store(&png, "png").await.expect("stored");
        assert!(relative.starts_with("avatars/"));
        assert!(relative.ends_with(".png"));

        let on_disk = dir.path().join(&relative);
        assert_eq!(tokio::fs::read(&on_disk).await.expect("readable"), png);

        store.delete(&relative).await.expect("deleted");
        assert!(!on_disk.exists());

        // Deleting twice is not an error
        store.delete(&relative).await.expect("idempotent delete");
    }

    #[tokio::test]
    async fn test_delete_rejects_paths_outside_root() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = LocalAvatarStore::new(dir.path());

        let result = store.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }
}
