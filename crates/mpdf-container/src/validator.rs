//! Container validation: structure, manifest schema, and the integrity chain.
//!
//! Every check runs and contributes to one [`ValidationReport`]; nothing
//! short-circuits. The validator only reads its inputs and needs no file
//! system access, so repeated or concurrent calls over the same inputs
//! produce identical reports.

use crate::container::Container;
use mpdf_schema::{
    check_format_version, content_hash, parse_manifest_value, unknown_fields,
    verify_stored_checksum, HexDigest, Manifest, ManifestError, VersionCompat, CONTENT_ENTRY,
    FONTS_PREFIX, FORMAT_VERSION, MANIFEST_ENTRY, REQUIRED_ENTRIES, SIGNATURE_ENTRY, STYLE_PREFIX,
};
use serde::Serialize;
use serde_json::Value;

/// Outcome of validating one container. `valid` is true exactly when `errors` is empty.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn new() -> Self {
        Self {
            valid: true,
            ..Default::default()
        }
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.valid = false;
    }

    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Everything the validator looks at, fully in memory.
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    /// Entry names present in the container, in archive order.
    pub entries: &'a [&'a str],
    /// The parsed `manifest.json`, or `None` when the entry is absent.
    pub manifest: Option<&'a Value>,
    /// Raw bytes of `content.md`, when available.
    pub content: Option<&'a [u8]>,
    /// Text of `signature.sha256`, when available.
    pub signature: Option<&'a str>,
}

pub fn validate_container(input: &ValidationInput<'_>) -> ValidationReport {
    let mut report = ValidationReport::new();

    for required in REQUIRED_ENTRIES {
        if !input.entries.contains(required) {
            report.push_error(format!("Missing required file: {required}"));
        }
    }

    let manifest = input.manifest.and_then(|value| check_schema(value, &mut report));

    if !input.entries.iter().any(|e| e.starts_with(STYLE_PREFIX)) {
        report.push_warning("No style/ directory found");
    }
    if !input.entries.iter().any(|e| e.starts_with(FONTS_PREFIX)) {
        report.push_warning("No fonts/ directory found");
    }

    let actual = input.content.map(content_hash);

    if let (Some(manifest), Some(actual)) = (&manifest, &actual) {
        let expected = HexDigest::from_prefixed(&manifest.ai.content_hash);
        if !expected.is_some_and(|e| actual.matches(&e)) {
            report.push_error("Content hash mismatch: content.md has been modified");
        }
    }

    if let (Some(signature), Some(actual)) = (input.signature, &actual) {
        if signature.trim() != actual.as_str() {
            report.push_error("Signature mismatch: signature.sha256 does not match content.md");
        }
    }

    // Over the stored value, so keys the typed model drops are still covered.
    if let (Some(_), Some(value)) = (&manifest, input.manifest) {
        if !matches!(verify_stored_checksum(value), Ok(true)) {
            report.push_error("Manifest checksum mismatch: manifest.json has been modified");
        }
    }

    report
}

/// Schema-check the manifest value, recording violations and advisory
/// warnings. Returns the typed manifest only when the schema passed.
fn check_schema(value: &Value, report: &mut ValidationReport) -> Option<Manifest> {
    for key in unknown_fields(value) {
        report.push_warning(format!("Unknown manifest field: {key}"));
    }

    match parse_manifest_value(value) {
        Ok(manifest) => {
            if let Ok(VersionCompat::Newer) = check_format_version(&manifest.format_version) {
                report.push_warning(format!(
                    "Format version {} is newer than supported {FORMAT_VERSION}",
                    manifest.format_version
                ));
            }
            Some(manifest)
        }
        Err(ManifestError::Schema(violations)) => {
            for violation in violations {
                report.push_error(format!("Manifest: {violation}"));
            }
            None
        }
        Err(e) => {
            report.push_error(format!("Manifest: {e}"));
            None
        }
    }
}

/// Validate an already-unpacked container.
///
/// A `manifest.json` that is not JSON at all becomes a single top-level
/// error; the checks that do not need the manifest still run.
pub fn validate_packed(container: &Container) -> ValidationReport {
    let names = container.names();
    let parsed = container
        .get(MANIFEST_ENTRY)
        .map(serde_json::from_slice::<Value>);
    let signature = container
        .get(SIGNATURE_ENTRY)
        .map(String::from_utf8_lossy);

    let (manifest, parse_error) = match &parsed {
        Some(Ok(value)) => (Some(value), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    let mut report = validate_container(&ValidationInput {
        entries: &names,
        manifest,
        content: container.get(CONTENT_ENTRY),
        signature: signature.as_deref(),
    });
    if let Some(e) = parse_error {
        report.push_error(format!("Manifest is not valid JSON: {e}"));
    }
    report
}
