use crate::format::{COMMONMARK_SPEC, DEFAULT_THEME_ID, FORMAT_VERSION, SUPPORTED_EXTENSIONS};
use crate::page::PageConfig;
use crate::types::LanguageCode;
use crate::validate::{check_manifest, SchemaViolation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("manifest failed schema validation: {}", join_violations(.0))]
    Schema(Vec<SchemaViolation>),
}

fn join_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Canonical metadata record stored as `manifest.json` inside a container.
///
/// Field order here is the canonical serialization order; the manifest
/// checksum is computed over `serde_json::to_string_pretty` of this struct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    pub format_version: String,
    pub title: String,
    pub author: String,
    pub created: String,
    pub modified: String,
    pub language: LanguageCode,
    pub description: String,
    pub tags: Vec<String>,
    pub page: PageConfig,
    pub theme: String,
    pub markdown: MarkdownConfig,
    pub ai: AiMetadata,
    pub checksum: String,
}

/// Markdown dialect the content was written for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkdownConfig {
    pub spec: String,
    pub extensions: Vec<String>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            spec: COMMONMARK_SPEC.to_owned(),
            extensions: SUPPORTED_EXTENSIONS.iter().map(|e| (*e).to_owned()).collect(),
        }
    }
}

/// Derived statistics for machine consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiMetadata {
    /// `sha256:` + hex digest of `content.md`.
    pub content_hash: String,
    pub word_count: u64,
    pub heading_count: u64,
    pub table_count: u64,
    pub code_block_count: u64,
    pub image_count: u64,
    pub language_detected: LanguageCode,
}

impl Manifest {
    /// A manifest with format defaults and empty document fields, checksum unset.
    pub fn skeleton(title: impl Into<String>, ai: AiMetadata, timestamp: &str) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_owned(),
            title: title.into(),
            author: String::new(),
            created: timestamp.to_owned(),
            modified: timestamp.to_owned(),
            language: ai.language_detected.clone(),
            description: String::new(),
            tags: Vec::new(),
            page: PageConfig::default(),
            theme: DEFAULT_THEME_ID.to_owned(),
            markdown: MarkdownConfig::default(),
            ai,
            checksum: String::new(),
        }
    }

    /// Canonical text form: pretty JSON, two-space indent, fixed field order.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Schema-check an untyped JSON value and convert it into a [`Manifest`].
pub fn parse_manifest_value(value: &serde_json::Value) -> Result<Manifest, ManifestError> {
    let violations = check_manifest(value);
    if !violations.is_empty() {
        return Err(ManifestError::Schema(violations));
    }
    Ok(Manifest::deserialize(value)?)
}

pub fn parse_manifest_str(input: &str) -> Result<Manifest, ManifestError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    parse_manifest_value(&value)
}

pub fn parse_manifest_file(path: impl AsRef<Path>) -> Result<Manifest, ManifestError> {
    let content = fs::read_to_string(path)?;
    parse_manifest_str(&content)
}
