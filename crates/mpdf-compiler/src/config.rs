use crate::CompileError;
use mpdf_schema::PageOverrides;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "mpdf.toml";

/// Optional project defaults read from `mpdf.toml`.
///
/// ```toml
/// theme = "standard"
/// fonts_dir = "fonts"
///
/// [page]
/// size = "letter"
/// margins = { top = 20, bottom = 20, left = 15, right = 15 }
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub theme: Option<String>,
    /// Relative paths are taken relative to the config file.
    #[serde(default)]
    pub fonts_dir: Option<PathBuf>,
    #[serde(default)]
    pub page: PageOverrides,
}

impl ProjectConfig {
    pub fn parse(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    pub fn load(path: &Path) -> Result<Self, CompileError> {
        let content = fs::read_to_string(path).map_err(|source| CompileError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content).map_err(|source| CompileError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        if let (Some(fonts), Some(parent)) = (&config.fonts_dir, path.parent()) {
            if fonts.is_relative() {
                config.fonts_dir = Some(parent.join(fonts));
            }
        }
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` if given, else `<dir>/mpdf.toml` when it exists.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, CompileError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
