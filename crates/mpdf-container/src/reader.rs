use crate::container::Container;
use crate::validator::{validate_packed, ValidationReport};
use crate::ContainerError;
use mpdf_schema::{parse_manifest_value, Manifest, ManifestError, ASSETS_PREFIX, CONTENT_ENTRY, MANIFEST_ENTRY};
use std::collections::BTreeMap;
use std::path::Path;

/// A fully unpacked document with a schema-checked manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub content: String,
    pub manifest: Manifest,
    /// `assets/*` entries keyed by archive name.
    pub assets: BTreeMap<String, Vec<u8>>,
}

pub fn read_container(path: &Path) -> Result<Container, ContainerError> {
    Container::read_file(path)
}

/// Decode and schema-check the `manifest.json` entry of a container.
pub fn manifest_of(container: &Container) -> Result<Manifest, ContainerError> {
    let bytes = container
        .get(MANIFEST_ENTRY)
        .ok_or_else(|| ContainerError::MissingEntry(MANIFEST_ENTRY.to_owned()))?;
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(ManifestError::from)?;
    Ok(parse_manifest_value(&value)?)
}

pub fn extract_markdown(path: &Path) -> Result<String, ContainerError> {
    let container = read_container(path)?;
    Ok(container.require_str(CONTENT_ENTRY)?.to_owned())
}

pub fn read_document(path: &Path) -> Result<Document, ContainerError> {
    let container = read_container(path)?;
    let content = container.require_str(CONTENT_ENTRY)?.to_owned();
    let manifest = manifest_of(&container)?;
    let assets = container
        .with_prefix(ASSETS_PREFIX)
        .map(|(name, data)| (name.to_owned(), data.to_vec()))
        .collect();
    Ok(Document {
        content,
        manifest,
        assets,
    })
}

pub fn get_manifest(path: &Path) -> Result<Manifest, ContainerError> {
    manifest_of(&read_container(path)?)
}

/// Validate a container on disk. Archive-level failures (unreadable file,
/// not a ZIP) are errors; everything about the contents, including unsafe or
/// repeated entry names, is in the report.
pub fn validate_file(path: &Path) -> Result<ValidationReport, ContainerError> {
    let (container, issues) = Container::scan_file(path)?;
    let mut report = validate_packed(&container);
    for issue in issues {
        report.push_error(issue.to_string());
    }
    Ok(report)
}

pub fn list_assets(path: &Path) -> Result<Vec<String>, ContainerError> {
    let container = read_container(path)?;
    Ok(container
        .with_prefix(ASSETS_PREFIX)
        .map(|(name, _)| name.to_owned())
        .collect())
}
