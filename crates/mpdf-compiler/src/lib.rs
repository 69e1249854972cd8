//! Markdown to MPDF compiler.
//!
//! This crate turns a Markdown source file into a sealed container: it splits
//! YAML front-matter, tokenizes the body, embeds local images, derives the
//! `ai` statistics and language, seals the manifest, and packages everything
//! in the fixed entry order.

pub mod compiler;
pub mod config;
pub mod fonts;
pub mod frontmatter;
pub mod language;
pub mod metadata;
pub mod packager;
pub mod resolver;
pub mod tokenizer;

pub use compiler::{compile, compile_str, default_output_path, CompileOptions, CompileOutput, Compiled};
pub use config::{ProjectConfig, CONFIG_FILE_NAME};
pub use fonts::{load_fonts, FontFile};
pub use frontmatter::{split_front_matter, FrontMatter};
pub use language::detect_language;
pub use metadata::{count_words, extract_metadata, DocumentStats};
pub use packager::{package, PackageInput};
pub use resolver::{resolve_assets, Asset, ResolvedContent};
pub use tokenizer::{tokenize, Token, Tokenizer};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),
    #[error("output path {} would overwrite the input", .0.display())]
    OutputIsInput(PathBuf),
    #[error("manifest error: {0}")]
    Manifest(#[from] mpdf_schema::ManifestError),
    #[error("container error: {0}")]
    Container(#[from] mpdf_container::ContainerError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CompileError {
    /// True for problems with what the user supplied (missing input, bad
    /// config or option) rather than failures while producing the output.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CompileError::Input { .. }
                | CompileError::Config { .. }
                | CompileError::UnknownTheme(_)
                | CompileError::OutputIsInput(_)
        )
    }
}
