//! Diagnostics appendix entries.

use std::path::{Path, PathBuf};

/// Where a diagnostic image comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticImage {
    /// An image file that must exist when the appendix is added.
    Path(PathBuf),
    /// Image bytes staged into the build's transient directory.
    Inline { file_name: String, bytes: Vec<u8> },
}

/// One appendix figure.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticEntry {
    pub title: String,
    pub image: DiagnosticImage,
    pub explanation: Option<String>,
}

impl DiagnosticEntry {
    pub fn from_path(title: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            image: DiagnosticImage::Path(path.into()),
            explanation: None,
        }
    }

    pub fn inline(title: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            title: title.into(),
            image: DiagnosticImage::Inline {
                file_name: file_name.into(),
                bytes,
            },
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, text: impl Into<String>) -> Self {
        self.explanation = Some(text.into());
        self
    }
}

/// MIME type for an image file, by extension.
pub(crate) fn mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
