//! Packed container store, validator, and file-level reader for MPDF documents.
//!
//! A [`Container`] is an ordered set of named byte blobs persisted as a ZIP
//! archive. [`validate_container`] checks structure, manifest schema and the
//! integrity chain entirely in memory; the [`reader`] module wraps both for
//! callers that start from a path on disk.

pub mod container;
pub mod reader;
pub mod validator;

pub use container::{is_valid_entry_name, Container, EntryIssue};
pub use reader::{
    extract_markdown, get_manifest, list_assets, manifest_of, read_container, read_document,
    validate_file, Document,
};
pub use validator::{validate_container, validate_packed, ValidationInput, ValidationReport};

use mpdf_schema::ManifestError;
use std::path::Path;
use thiserror::Error;

/// Fsync a directory so a preceding `rename()` survives a crash.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("container I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("duplicate entry: {0}")]
    DuplicateEntry(String),
    #[error("invalid entry name: '{0}'")]
    InvalidEntryName(String),
    #[error("invalid .mpdf file: missing {0}")]
    MissingEntry(String),
    #[error("entry '{0}' is not valid UTF-8")]
    NotUtf8(String),
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entry_display_names_file() {
        let e = ContainerError::MissingEntry("content.md".to_owned());
        assert_eq!(e.to_string(), "invalid .mpdf file: missing content.md");
    }

    #[test]
    fn duplicate_entry_display() {
        let e = ContainerError::DuplicateEntry("style/theme.css".to_owned());
        assert!(e.to_string().contains("style/theme.css"));
    }

    #[test]
    fn manifest_error_wraps() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = ContainerError::from(ManifestError::from(inner));
        assert!(e.to_string().starts_with("manifest error:"));
    }
}
