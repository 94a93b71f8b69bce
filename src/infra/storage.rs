//! Local photo storage under the uploads directory.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::{MAX_PHOTO_BYTES, UPLOADS_URL_PREFIX};
use crate::domain::personnel::is_valid_photo_url;
use crate::errors::{AppError, AppResult};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Writes uploaded photos as `<uuid>.<ext>` and serves them back as
/// `/uploads/<file>` references.
#[derive(Debug, Clone)]
pub struct PhotoStorage {
    root: PathBuf,
}

impl PhotoStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the uploads directory if needed.
    pub async fn ensure_dir(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Store an uploaded image and return its public URL.
    pub async fn save(
        &self,
        file_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> AppResult<String> {
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(AppError::PayloadTooLarge(
                "La imagen supera el tamaño máximo de 5MB.".into(),
            ));
        }
        if !content_type.map(|ct| ct.starts_with("image/")).unwrap_or(false) {
            return Err(AppError::validation(
                "Solo se permiten archivos de imagen (jpeg, png, gif, webp)!",
            ));
        }
        let extension = image_extension(file_name, content_type).ok_or_else(|| {
            AppError::validation("Solo se permiten archivos de imagen (jpeg, png, gif, webp)!")
        })?;

        self.ensure_dir().await?;
        let stored = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(self.root.join(&stored), bytes).await?;

        tracing::debug!(file = %stored, size = bytes.len(), "Photo stored");
        Ok(format!("{}/{}", UPLOADS_URL_PREFIX, stored))
    }

    /// Delete the file behind a stored photo URL. Missing files and foreign
    /// URLs are ignored.
    pub async fn remove(&self, url: &str) {
        let Some(path) = self.path_for(url) else {
            return;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Photo removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::error!(path = %path.display(), error = %e, "Failed to remove photo"),
        }
    }

    /// Map a `/uploads/<file>` URL to its path on disk.
    pub fn path_for(&self, url: &str) -> Option<PathBuf> {
        if !is_valid_photo_url(url) {
            return None;
        }
        let file = url.rsplit('/').next()?;
        Some(self.root.join(file))
    }
}

/// Pick the stored extension from the client file name, falling back to the
/// content type.
fn image_extension(file_name: Option<&str>, content_type: Option<&str>) -> Option<String> {
    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let candidate = from_name.or_else(|| {
        content_type
            .and_then(|ct| ct.strip_prefix("image/"))
            .map(|ext| ext.to_ascii_lowercase())
    })?;

    IMAGE_EXTENSIONS
        .contains(&candidate.as_str())
        .then_some(candidate)
}
