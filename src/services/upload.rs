use std::path::{Path, PathBuf};

/// Result of a successful upload: a display name and a retrievable location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub url: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("A document file is required.")]
    Missing,
    #[error("Only {accepted} files are allowed.")]
    Rejected { accepted: String },
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Turns a local file into a document location.
pub trait UploadTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if no file was given, its type is not accepted, or it
    /// does not exist.
    fn upload(&self, path: &Path) -> Result<Upload, UploadError>;
}

/// Upload transport for files already on this machine.
///
/// Validates the file type by extension and hands back a `file://` URL.
#[derive(Debug, Clone)]
pub struct LocalUpload {
    accept: Vec<String>,
}

impl LocalUpload {
    /// `accept` lists file extensions without the dot; matched case-insensitively.
    pub fn new(accept: Vec<String>) -> Self {
        let accept = accept
            .into_iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { accept }
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.accept.is_empty() {
            return true;
        }
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.accept.iter().any(|a| *a == ext))
    }
}

impl UploadTransport for LocalUpload {
    fn upload(&self, path: &Path) -> Result<Upload, UploadError> {
        if path.as_os_str().is_empty() {
            return Err(UploadError::Missing);
        }
        if !self.accepts(path) {
            return Err(UploadError::Rejected {
                accepted: self.accept.join(", "),
            });
        }
        let resolved = path
            .canonicalize()
            .map_err(|_| UploadError::NotFound(path.to_path_buf()))?;
        if !resolved.is_file() {
            return Err(UploadError::NotFound(path.to_path_buf()));
        }
        let name = resolved
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        tracing::info!(file = %resolved.display(), "uploaded local document");
        Ok(Upload {
            name,
            url: format!("file://{}", resolved.display()),
        })
    }
}
