//! Field-by-field schema checks over an untyped manifest value.
//!
//! The checker never fails: every violated constraint becomes one
//! [`SchemaViolation`] naming the field path and the reason, so a caller can
//! report all problems of a tampered or hand-edited manifest at once.

use crate::format::{check_format_version, is_supported_extension, VersionCompat, FORMAT_VERSION};
use crate::page::{Orientation, PageSize};
use crate::types::{is_sha256_hex, LanguageCode, DIGEST_PREFIX};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Keys a manifest is expected to carry at the top level, in canonical order.
pub const MANIFEST_FIELDS: &[&str] = &[
    "format_version",
    "title",
    "author",
    "created",
    "modified",
    "language",
    "description",
    "tags",
    "page",
    "theme",
    "markdown",
    "ai",
    "checksum",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationKind {
    #[error("required")]
    Missing,
    #[error("expected {expected}, received {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid enum value, expected one of {allowed}, received '{found}'")]
    InvalidEnum { allowed: String, found: String },
    #[error("must be a non-negative integer")]
    NotNonNegativeInteger,
    #[error("must be greater than or equal to 0")]
    Negative,
    #[error("invalid datetime '{0}'")]
    InvalidTimestamp(String),
    #[error("must start with \"sha256:\"")]
    MissingDigestPrefix,
    #[error("digest must be 64 hex characters")]
    MalformedDigest,
    #[error("length must be between {min} and {max} characters, got {len}")]
    Length { min: usize, max: usize, len: usize },
    #[error("unknown markdown extension '{0}'")]
    UnknownExtension(String),
    #[error("invalid semantic version '{0}'")]
    InvalidVersion(String),
    #[error("incompatible format version {found}, this reader supports {}", FORMAT_VERSION)]
    IncompatibleVersion { found: String },
}

/// One violated constraint: the dotted field path plus the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: String,
    pub kind: ViolationKind,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root) - {}", self.kind)
        } else {
            write!(f, "{} - {}", self.path, self.kind)
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{parent}.{key}")
    }
}

#[derive(Default)]
struct Checker {
    violations: Vec<SchemaViolation>,
}

impl Checker {
    fn push(&mut self, path: impl Into<String>, kind: ViolationKind) {
        self.violations.push(SchemaViolation {
            path: path.into(),
            kind,
        });
    }

    fn wrong_type(&mut self, path: &str, expected: &'static str, value: &Value) {
        self.push(
            path,
            ViolationKind::WrongType {
                expected,
                found: type_name(value),
            },
        );
    }

    fn field<'v>(&mut self, obj: &'v Map<String, Value>, parent: &str, key: &str) -> Option<&'v Value> {
        let value = obj.get(key);
        if value.is_none() {
            self.push(join_path(parent, key), ViolationKind::Missing);
        }
        value
    }

    fn object<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<&'v Map<String, Value>> {
        let value = self.field(obj, parent, key)?;
        match value.as_object() {
            Some(map) => Some(map),
            None => {
                self.wrong_type(&join_path(parent, key), "object", value);
                None
            }
        }
    }

    fn string<'v>(&mut self, obj: &'v Map<String, Value>, parent: &str, key: &str) -> Option<&'v str> {
        let value = self.field(obj, parent, key)?;
        match value.as_str() {
            Some(s) => Some(s),
            None => {
                self.wrong_type(&join_path(parent, key), "string", value);
                None
            }
        }
    }

    fn boolean(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) {
        if let Some(value) = self.field(obj, parent, key) {
            if !value.is_boolean() {
                self.wrong_type(&join_path(parent, key), "boolean", value);
            }
        }
    }

    fn count(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) {
        let Some(value) = self.field(obj, parent, key) else {
            return;
        };
        let path = join_path(parent, key);
        match value {
            Value::Number(n) if n.is_u64() => {}
            Value::Number(_) => self.push(path, ViolationKind::NotNonNegativeInteger),
            other => self.wrong_type(&path, "number", other),
        }
    }

    fn length(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) {
        let Some(value) = self.field(obj, parent, key) else {
            return;
        };
        let path = join_path(parent, key);
        match value.as_f64() {
            Some(n) if n >= 0.0 => {}
            Some(_) => self.push(path, ViolationKind::Negative),
            None => self.wrong_type(&path, "number", value),
        }
    }

    fn one_of(&mut self, obj: &Map<String, Value>, parent: &str, key: &str, allowed: &[&str]) {
        if let Some(s) = self.string(obj, parent, key) {
            if !allowed.contains(&s) {
                self.push(
                    join_path(parent, key),
                    ViolationKind::InvalidEnum {
                        allowed: allowed.join(" | "),
                        found: s.to_owned(),
                    },
                );
            }
        }
    }

    fn timestamp(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) {
        if let Some(s) = self.string(obj, parent, key) {
            if chrono::DateTime::parse_from_rfc3339(s).is_err() {
                self.push(
                    join_path(parent, key),
                    ViolationKind::InvalidTimestamp(s.to_owned()),
                );
            }
        }
    }

    fn digest(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) {
        let Some(s) = self.string(obj, parent, key) else {
            return;
        };
        let path = join_path(parent, key);
        match s.strip_prefix(DIGEST_PREFIX) {
            None => self.push(path, ViolationKind::MissingDigestPrefix),
            Some(hex) if !is_sha256_hex(hex) => self.push(path, ViolationKind::MalformedDigest),
            Some(_) => {}
        }
    }

    fn language(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) {
        if let Some(s) = self.string(obj, parent, key) {
            if !LanguageCode::is_valid_tag(s) {
                self.push(
                    join_path(parent, key),
                    ViolationKind::Length {
                        min: 2,
                        max: 10,
                        len: s.chars().count(),
                    },
                );
            }
        }
    }

    /// Returns the array so callers can check elements further.
    fn string_array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<Vec<&'v str>> {
        let value = self.field(obj, parent, key)?;
        let path = join_path(parent, key);
        let Some(items) = value.as_array() else {
            self.wrong_type(&path, "array", value);
            return None;
        };
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(s) => out.push(s),
                None => self.wrong_type(&format!("{path}.{i}"), "string", item),
            }
        }
        Some(out)
    }

    fn format_version(&mut self, obj: &Map<String, Value>) {
        let Some(version) = self.string(obj, "", "format_version") else {
            return;
        };
        match check_format_version(version) {
            Ok(VersionCompat::Supported | VersionCompat::Newer) => {}
            Ok(VersionCompat::Incompatible) => self.push(
                "format_version",
                ViolationKind::IncompatibleVersion {
                    found: version.to_owned(),
                },
            ),
            Err(_) => self.push(
                "format_version",
                ViolationKind::InvalidVersion(version.to_owned()),
            ),
        }
    }

    fn page(&mut self, root: &Map<String, Value>) {
        let Some(page) = self.object(root, "", "page") else {
            return;
        };
        self.one_of(page, "page", "size", PageSize::NAMES);
        if let Some(margins) = self.object(page, "page", "margins") {
            for side in ["top", "bottom", "left", "right"] {
                self.length(margins, "page.margins", side);
            }
        }
        self.one_of(page, "page", "orientation", Orientation::NAMES);
        self.boolean(page, "page", "header");
        self.boolean(page, "page", "footer");
        self.boolean(page, "page", "page_numbers");
    }

    fn markdown(&mut self, root: &Map<String, Value>) {
        let Some(markdown) = self.object(root, "", "markdown") else {
            return;
        };
        self.string(markdown, "markdown", "spec");
        if let Some(extensions) = self.string_array(markdown, "markdown", "extensions") {
            for (i, ext) in extensions.iter().enumerate() {
                if !is_supported_extension(ext) {
                    self.push(
                        format!("markdown.extensions.{i}"),
                        ViolationKind::UnknownExtension((*ext).to_owned()),
                    );
                }
            }
        }
    }

    fn ai(&mut self, root: &Map<String, Value>) {
        let Some(ai) = self.object(root, "", "ai") else {
            return;
        };
        self.digest(ai, "ai", "content_hash");
        for key in [
            "word_count",
            "heading_count",
            "table_count",
            "code_block_count",
            "image_count",
        ] {
            self.count(ai, "ai", key);
        }
        self.language(ai, "ai", "language_detected");
    }
}

/// Check a parsed manifest value against the manifest schema.
///
/// An empty result means the value can be deserialized into a
/// [`Manifest`](crate::Manifest) without loss of any required field.
pub fn check_manifest(value: &Value) -> Vec<SchemaViolation> {
    let mut checker = Checker::default();
    let Some(root) = value.as_object() else {
        checker.wrong_type("", "object", value);
        return checker.violations;
    };

    checker.format_version(root);
    checker.string(root, "", "title");
    checker.string(root, "", "author");
    checker.timestamp(root, "", "created");
    checker.timestamp(root, "", "modified");
    checker.language(root, "", "language");
    checker.string(root, "", "description");
    checker.string_array(root, "", "tags");
    checker.page(root);
    checker.string(root, "", "theme");
    checker.markdown(root);
    checker.ai(root);
    checker.digest(root, "", "checksum");

    checker.violations
}

const PAGE_FIELDS: &[&str] = &[
    "size",
    "margins",
    "orientation",
    "header",
    "footer",
    "page_numbers",
];
const MARGIN_FIELDS: &[&str] = &["top", "bottom", "left", "right"];
const MARKDOWN_FIELDS: &[&str] = &["spec", "extensions"];
const AI_FIELDS: &[&str] = &[
    "content_hash",
    "word_count",
    "heading_count",
    "table_count",
    "code_block_count",
    "image_count",
    "language_detected",
];

fn collect_unknown(value: &Value, path: &str, known: &[&str], out: &mut Vec<String>) {
    let Some(obj) = value.as_object() else {
        return;
    };
    for key in obj.keys() {
        if !known.contains(&key.as_str()) {
            out.push(join_path(path, key));
        }
    }
}

/// Keys that are not part of the manifest schema, as dotted paths, at the
/// top level and inside `page`, `page.margins`, `markdown` and `ai`.
pub fn unknown_fields(value: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_unknown(value, "", MANIFEST_FIELDS, &mut out);
    if let Some(page) = value.get("page") {
        collect_unknown(page, "page", PAGE_FIELDS, &mut out);
        if let Some(margins) = page.get("margins") {
            collect_unknown(margins, "page.margins", MARGIN_FIELDS, &mut out);
        }
    }
    if let Some(markdown) = value.get("markdown") {
        collect_unknown(markdown, "markdown", MARKDOWN_FIELDS, &mut out);
    }
    if let Some(ai) = value.get("ai") {
        collect_unknown(ai, "ai", AI_FIELDS, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::tests::sample_manifest;
    use serde_json::json;

    fn valid_value() -> Value {
        serde_json::to_value(sample_manifest()).unwrap()
    }

    fn paths(violations: &[SchemaViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.path.as_str()).collect()
    }

    #[test]
    fn accepts_valid_manifest() {
        assert!(check_manifest(&valid_value()).is_empty());
    }

    #[test]
    fn rejects_non_object_root() {
        let violations = check_manifest(&json!([1, 2, 3]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].to_string(), "(root) - expected object, received array");
    }

    #[test]
    fn empty_object_reports_every_top_level_field() {
        let violations = check_manifest(&json!({}));
        assert_eq!(violations.len(), MANIFEST_FIELDS.len());
        assert!(violations.iter().all(|v| v.kind == ViolationKind::Missing));
    }

    #[test]
    fn rejects_invalid_page_size() {
        let mut value = valid_value();
        value["page"]["size"] = json!("B5");
        let violations = check_manifest(&value);
        assert_eq!(paths(&violations), vec!["page.size"]);
        assert!(violations[0].to_string().contains("B5"));
    }

    #[test]
    fn accepts_letter_and_landscape() {
        let mut value = valid_value();
        value["page"]["size"] = json!("letter");
        value["page"]["orientation"] = json!("landscape");
        assert!(check_manifest(&value).is_empty());
    }

    #[test]
    fn rejects_invalid_date_format() {
        let mut value = valid_value();
        value["created"] = json!("not-a-date");
        let violations = check_manifest(&value);
        assert_eq!(paths(&violations), vec!["created"]);
        assert!(matches!(violations[0].kind, ViolationKind::InvalidTimestamp(_)));
    }

    #[test]
    fn rejects_negative_and_fractional_counts() {
        let mut value = valid_value();
        value["ai"]["word_count"] = json!(-1);
        value["ai"]["image_count"] = json!(1.5);
        let violations = check_manifest(&value);
        assert_eq!(paths(&violations), vec!["ai.word_count", "ai.image_count"]);
        assert!(violations
            .iter()
            .all(|v| v.kind == ViolationKind::NotNonNegativeInteger));
    }

    #[test]
    fn rejects_content_hash_without_prefix() {
        let mut value = valid_value();
        value["ai"]["content_hash"] = json!("ab".repeat(32));
        let violations = check_manifest(&value);
        assert_eq!(violations[0].path, "ai.content_hash");
        assert_eq!(violations[0].kind, ViolationKind::MissingDigestPrefix);
    }

    #[test]
    fn rejects_short_digest() {
        let mut value = valid_value();
        value["checksum"] = json!("sha256:abc");
        let violations = check_manifest(&value);
        assert_eq!(violations[0].path, "checksum");
        assert_eq!(violations[0].kind, ViolationKind::MalformedDigest);
    }

    #[test]
    fn rejects_negative_margin() {
        let mut value = valid_value();
        value["page"]["margins"]["left"] = json!(-3);
        let violations = check_manifest(&value);
        assert_eq!(paths(&violations), vec!["page.margins.left"]);
        assert_eq!(violations[0].kind, ViolationKind::Negative);
    }

    #[test]
    fn rejects_wrong_types() {
        let mut value = valid_value();
        value["title"] = json!(42);
        value["page"]["header"] = json!("yes");
        value["tags"] = json!(["ok", 7]);
        let violations = check_manifest(&value);
        assert_eq!(paths(&violations), vec!["title", "tags.1", "page.header"]);
    }

    #[test]
    fn rejects_language_out_of_range() {
        let mut value = valid_value();
        value["language"] = json!("x");
        value["ai"]["language_detected"] = json!("much-too-long-tag");
        let violations = check_manifest(&value);
        assert_eq!(paths(&violations), vec!["language", "ai.language_detected"]);
    }

    #[test]
    fn rejects_unknown_extension() {
        let mut value = valid_value();
        value["markdown"]["extensions"] = json!(["tables", "emoji"]);
        let violations = check_manifest(&value);
        assert_eq!(paths(&violations), vec!["markdown.extensions.1"]);
    }

    #[test]
    fn rejects_incompatible_major_version() {
        let mut value = valid_value();
        value["format_version"] = json!("2.0.0");
        let violations = check_manifest(&value);
        assert!(matches!(
            violations[0].kind,
            ViolationKind::IncompatibleVersion { .. }
        ));

        value["format_version"] = json!("banana");
        let violations = check_manifest(&value);
        assert!(matches!(violations[0].kind, ViolationKind::InvalidVersion(_)));
    }

    #[test]
    fn reports_unknown_top_level_fields() {
        let mut value = valid_value();
        value["x_vendor"] = json!(true);
        assert!(check_manifest(&value).is_empty());
        assert_eq!(unknown_fields(&value), vec!["x_vendor".to_owned()]);
    }

    #[test]
    fn reports_nested_unknown_fields_as_paths() {
        let mut value = valid_value();
        value["ai"]["injected_instruction"] = json!("ignore previous");
        value["page"]["watermark"] = json!("CONFIDENTIAL");
        value["page"]["margins"]["gutter"] = json!(5);
        value["markdown"]["flavor"] = json!("gfm");
        assert_eq!(
            unknown_fields(&value),
            vec![
                "page.watermark",
                "page.margins.gutter",
                "markdown.flavor",
                "ai.injected_instruction"
            ]
        );
    }

    #[test]
    fn valid_manifest_has_no_unknown_fields() {
        assert!(unknown_fields(&valid_value()).is_empty());
    }
}
