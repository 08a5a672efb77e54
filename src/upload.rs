use crate::errors::UploadError;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// A file the user picked, described the way a file input reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub mime: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>, mime: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        Self {
            name: file_name(&path),
            path,
            mime: mime.into(),
            size,
        }
    }

    pub async fn open(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).await.map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self::new(path, mime, metadata.len()))
    }

    pub fn size_mb(&self) -> f64 {
        self.size as f64 / 1024.0 / 1024.0
    }

    pub async fn read(&self) -> Result<Vec<u8>, UploadError> {
        fs::read(&self.path).await.map_err(|source| UploadError::Read {
            path: self.path.clone(),
            source,
        })
    }
}

pub fn check_image(file: &SelectedFile) -> Result<(), UploadError> {
    if file.size > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge {
            size: file.size,
            limit: MAX_IMAGE_BYTES,
        });
    }
    if !file.mime.starts_with("image/") {
        return Err(UploadError::NotAnImage {
            mime: file.mime.clone(),
        });
    }
    Ok(())
}

/// Reads the file and encodes it as `data:<mime>;base64,<payload>`.
pub async fn to_data_url(file: &SelectedFile) -> Result<String, UploadError> {
    let bytes = file.read().await?;
    let mime = file.mime.clone();
    let encoded = tokio::task::spawn_blocking(move || {
        format!("data:{mime};base64,{}", STANDARD.encode(bytes))
    })
    .await?;
    Ok(encoded)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
