//! Manifest model, format constants, and integrity primitives for MPDF containers.
//!
//! This crate defines the schema layer: the typed `Manifest` record and its
//! canonical JSON form, the declarative schema checker (`check_manifest`) used
//! on untrusted manifests, page-layout defaults and override merging, the
//! built-in themes, and the SHA-256 integrity chain (`content_hash`,
//! `seal_manifest`, `signature_payload`).

pub mod format;
pub mod integrity;
pub mod manifest;
pub mod page;
pub mod theme;
pub mod types;
pub mod validate;

pub use format::{
    check_format_version, VersionCompat, ASSETS_PREFIX, COMMONMARK_SPEC, CONTENT_ENTRY,
    DEFAULT_THEME_ID, FILE_EXTENSION, FONTS_PREFIX, FORMAT_VERSION, MANIFEST_ENTRY,
    REQUIRED_ENTRIES, SIGNATURE_ENTRY, STYLE_PREFIX, SUPPORTED_EXTENSIONS,
};
pub use integrity::{
    compute_manifest_checksum, compute_stored_checksum, content_hash, seal_manifest,
    signature_payload, verify_manifest_checksum, verify_stored_checksum,
};
pub use manifest::{
    parse_manifest_file, parse_manifest_str, parse_manifest_value, AiMetadata, Manifest,
    ManifestError, MarkdownConfig,
};
pub use page::{Margins, Orientation, PageConfig, PageOverrides, PageSize};
pub use theme::{default_theme, get_theme, list_themes, Theme, BUILTIN_THEMES};
pub use types::{HexDigest, LanguageCode, DIGEST_PREFIX};
pub use validate::{check_manifest, unknown_fields, SchemaViolation, ViolationKind};
