//! File-system storage for uploaded base images.
//!
//! Each upload is written once under the upload directory with a unique
//! `{uuid}_{sanitized original name}` file name; the resulting path is what a
//! template stores as its `image_path`.

use log::{debug, warn};
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use uuid::Uuid;

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("filename pattern is valid"));

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("image not found: {0}")]
    NotFound(String),
    #[error("image storage error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct ImageStorage {
    root: PathBuf,
}

impl ImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` to a fresh file and returns its path.
    pub fn save(&self, original_filename: Option<&str>, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        let stem = original_filename
            .map(sanitize_filename)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "image".to_string());
        let path = self.root.join(format!("{}_{}", Uuid::new_v4(), stem));
        fs::write(&path, bytes)?;
        debug!("Stored {} bytes at {:?}", bytes.len(), path);
        Ok(path)
    }

    pub fn read_bytes(&self, reference: &Path) -> Result<Vec<u8>, StorageError> {
        fs::read(reference).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(reference.display().to_string()),
            _ => StorageError::Io(e),
        })
    }

    /// Best-effort delete. A missing or undeletable file is logged and
    /// reported as `false`; callers never abort on it.
    pub fn remove(&self, reference: &Path) -> bool {
        match fs::remove_file(reference) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Image {:?} was already gone", reference);
                false
            }
            Err(e) => {
                warn!("Could not remove image {:?}, leaving it behind: {}", reference, e);
                false
            }
        }
    }
}

/// Keeps only the last path component and replaces anything outside
/// `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(last, "_");
    cleaned.trim_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_filename("card.png"), "card.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\my card (1).png"), "my_card_1_.png");
        assert_eq!(sanitize_filename("feliz cumpleaños.png"), "feliz_cumplea_os.png");
        assert_eq!(sanitize_filename(".."), "");
    }

    #[test]
    fn save_read_remove_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ImageStorage::new(dir.path().join("uploads"));

        let path = storage.save(Some("card.png"), b"pixels").unwrap();
        assert!(path.starts_with(storage.root()));
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("_card.png"));
        assert_eq!(storage.read_bytes(&path).unwrap(), b"pixels");

        assert!(storage.remove(&path));
        assert!(!storage.remove(&path));
        assert!(matches!(storage.read_bytes(&path), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn unnamed_uploads_get_a_placeholder_name() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ImageStorage::new(dir.path());
        let path = storage.save(Some("///"), b"x").unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("_image"));
        let path = storage.save(None, b"x").unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("_image"));
    }
}
