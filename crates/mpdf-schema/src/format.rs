//! Container format constants and format-version compatibility.

use semver::Version;

/// Version of the container format written by this implementation.
pub const FORMAT_VERSION: &str = "0.1.0";
pub const FILE_EXTENSION: &str = "mpdf";

pub const COMMONMARK_SPEC: &str = "commonmark-0.31";

/// Closed vocabulary of Markdown extensions a manifest may declare, in canonical order.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "tables",
    "footnotes",
    "strikethrough",
    "task-lists",
    "math-katex",
    "mermaid",
    "syntax-highlight",
    "admonitions",
    "toc",
];

pub const CONTENT_ENTRY: &str = "content.md";
pub const MANIFEST_ENTRY: &str = "manifest.json";
pub const SIGNATURE_ENTRY: &str = "signature.sha256";
pub const REQUIRED_ENTRIES: &[&str] = &[CONTENT_ENTRY, MANIFEST_ENTRY];

pub const STYLE_PREFIX: &str = "style/";
pub const FONTS_PREFIX: &str = "fonts/";
pub const ASSETS_PREFIX: &str = "assets/";

pub const DEFAULT_THEME_ID: &str = "mpdf-standard-v1";

/// How a manifest's `format_version` relates to [`FORMAT_VERSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCompat {
    /// Same major, not newer than ours.
    Supported,
    /// Same major, but a newer minor/patch than ours. Readable, with a warning.
    Newer,
    /// Different major version.
    Incompatible,
}

pub fn check_format_version(version: &str) -> Result<VersionCompat, semver::Error> {
    let theirs = Version::parse(version)?;
    let ours = Version::parse(FORMAT_VERSION)?;
    if theirs.major != ours.major {
        return Ok(VersionCompat::Incompatible);
    }
    if theirs > ours {
        Ok(VersionCompat::Newer)
    } else {
        Ok(VersionCompat::Supported)
    }
}

pub fn is_supported_extension(name: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&name)
}
