//! Document handles and session identity.
//!
//! A [`DocumentHandle`] is an opaque reference to the document being viewed.
//! The viewer never mutates it; it only reads a display name and hands it to
//! the rasterizer. Every document change starts a new session, identified by a
//! [`SessionId`] that travels with every asynchronous request so late
//! responses for a superseded document can be recognised and dropped.

use std::fmt;
use std::path::{Path, PathBuf};

const DEFAULT_DISPLAY_NAME: &str = "Document";

/// Reference to a loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentHandle {
    /// A path or URL (`file:///...`, `/tmp/a.pdf`, `https://...`).
    Url(String),
    /// An in-memory file handle with a user-facing name.
    File { name: String, path: PathBuf },
}

impl DocumentHandle {
    /// Name shown in the toolbar.
    ///
    /// The last `/`-separated segment of a URL, or the provided name of a
    /// file handle. Falls back to `"Document"` when either is empty.
    pub fn display_name(&self) -> String {
        let name = match self {
            Self::Url(url) => url.rsplit('/').next().unwrap_or_default(),
            Self::File { name, .. } => name.as_str(),
        };
        if name.trim().is_empty() {
            DEFAULT_DISPLAY_NAME.to_string()
        } else {
            name.to_string()
        }
    }

    /// Local filesystem path for handles that point at one.
    ///
    /// Returns `None` for remote URLs.
    pub fn local_path(&self) -> Option<PathBuf> {
        match self {
            Self::File { path, .. } => Some(path.clone()),
            Self::Url(url) => {
                if let Some(rest) = url.strip_prefix("file://") {
                    return Some(PathBuf::from(rest));
                }
                if url.contains("://") {
                    return None;
                }
                Some(PathBuf::from(url))
            }
        }
    }

    /// Build a handle for a local path, keeping the file name for display.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::File {
            name,
            path: path.to_path_buf(),
        }
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File { path, .. } => write!(f, "{}", path.display()),
        }
    }
}

/// Identity of a document session.
///
/// Monotonic: every document change produces [`SessionId::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_uses_last_url_segment() {
        let handle = DocumentHandle::Url("https://example.com/docs/nda-2025.pdf".to_string());
        assert_eq!(handle.display_name(), "nda-2025.pdf");
    }

    #[test]
    fn test_display_name_for_file_handle_uses_provided_name() {
        let handle = DocumentHandle::File {
            name: "contract.pdf".to_string(),
            path: PathBuf::from("/tmp/upload-1234"),
        };
        assert_eq!(handle.display_name(), "contract.pdf");
    }

    #[test]
    fn test_display_name_defaults_when_empty() {
        let handle = DocumentHandle::File {
            name: String::new(),
            path: PathBuf::from("/tmp/x"),
        };
        assert_eq!(handle.display_name(), "Document");
        assert_eq!(DocumentHandle::Url(String::new()).display_name(), "Document");
    }

    #[test]
    fn test_display_name_for_directory_url_defaults() {
        let handle = DocumentHandle::Url("https://host/dir/".to_string());
        assert_eq!(handle.display_name(), "Document");
    }

    #[test]
    fn test_local_path_strips_file_scheme() {
        let handle = DocumentHandle::Url("file:///tmp/report.txt".to_string());
        assert_eq!(handle.local_path(), Some(PathBuf::from("/tmp/report.txt")));
    }

    #[test]
    fn test_local_path_is_none_for_remote_urls() {
        let handle = DocumentHandle::Url("https://example.com/a.pdf".to_string());
        assert_eq!(handle.local_path(), None);
    }

    #[test]
    fn test_session_ids_are_monotonic() {
        let first = SessionId::default();
        let second = first.next();
        assert!(second > first);
        assert_ne!(first, second);
        assert_eq!(second.get(), 1);
    }
}
