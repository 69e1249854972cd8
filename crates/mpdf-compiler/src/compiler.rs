use crate::fonts::{load_fonts, FontFile};
use crate::frontmatter::{iso8601, split_front_matter, FrontMatter};
use crate::language::detect_language;
use crate::metadata::extract_metadata;
use crate::packager::{package, PackageInput};
use crate::resolver::resolve_assets;
use crate::tokenizer::tokenize;
use crate::CompileError;
use chrono::{DateTime, Utc};
use mpdf_container::Container;
use mpdf_schema::{
    check_manifest, content_hash, default_theme, get_theme, seal_manifest, AiMetadata,
    LanguageCode, Manifest, ManifestError, PageConfig, PageOverrides, Theme, FILE_EXTENSION,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Caller-supplied settings. Every `Some` value overrides front-matter.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub input: PathBuf,
    /// Defaults to the input path with its extension replaced by `.mpdf`.
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub tags: Option<Vec<String>>,
    pub page: PageOverrides,
    /// Theme name or id; the built-in default when unset.
    pub theme: Option<String>,
    pub fonts_dir: Option<PathBuf>,
}

/// An in-memory compilation result.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub container: Container,
    pub manifest: Manifest,
}

#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub path: PathBuf,
    pub manifest: Manifest,
    pub entries: Vec<String>,
}

pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(FILE_EXTENSION)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Option, then front-matter `lang`, then `language`, then detection over `body`.
fn resolve_language(explicit: Option<&str>, fm: &FrontMatter, body: &str) -> LanguageCode {
    let candidates = [
        ("option", explicit),
        ("front-matter lang", fm.string("lang")),
        ("front-matter language", fm.string("language")),
    ];
    for (source, value) in candidates {
        let Some(value) = non_empty(value).map(str::trim) else {
            continue;
        };
        if LanguageCode::is_valid_tag(value) {
            return LanguageCode::new(value);
        }
        warn!("ignoring {source} '{value}': language tags are 2 to 10 characters");
    }
    let detected = detect_language(body);
    debug!("detected language: {detected}");
    detected
}

fn select_theme(name: Option<&str>) -> Result<&'static Theme, CompileError> {
    match name {
        Some(name) => get_theme(name).ok_or_else(|| CompileError::UnknownTheme(name.to_owned())),
        None => Ok(default_theme()),
    }
}

fn fallback_title(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Untitled".to_owned())
}

/// Compile Markdown source text in memory.
///
/// Relative image paths resolve against `base_dir`. The title falls back to
/// the file stem of `options.input`.
pub fn compile_str(raw: &str, base_dir: &Path, options: &CompileOptions) -> Result<Compiled, CompileError> {
    compile_at(raw, base_dir, options, Utc::now())
}

fn compile_at(
    raw: &str,
    base_dir: &Path,
    options: &CompileOptions,
    now: DateTime<Utc>,
) -> Result<Compiled, CompileError> {
    let theme = select_theme(options.theme.as_deref())?;
    let fonts: Vec<FontFile> = match &options.fonts_dir {
        Some(dir) => load_fonts(dir).map_err(|source| CompileError::Input {
            path: dir.clone(),
            source,
        })?,
        None => Vec::new(),
    };

    let (body, fm) = split_front_matter(raw);
    debug!("front-matter present: {}", !fm.is_empty());

    let tokens = tokenize(body);
    debug!("tokenized body into {} block tokens", tokens.len());

    let resolved = resolve_assets(body, &tokens, base_dir)?;
    let stats = extract_metadata(&tokens, &resolved.body);
    let hash = content_hash(resolved.body.as_bytes());
    let language = resolve_language(options.language.as_deref(), &fm, &resolved.body);

    let ai = AiMetadata {
        content_hash: hash.prefixed(),
        word_count: stats.word_count,
        heading_count: stats.heading_count,
        table_count: stats.table_count,
        code_block_count: stats.code_block_count,
        image_count: stats.image_count,
        language_detected: language.clone(),
    };

    let title = non_empty(options.title.as_deref())
        .or_else(|| non_empty(fm.title()))
        .map_or_else(|| fallback_title(&options.input), str::to_owned);
    let timestamp = iso8601(&now);

    let mut manifest = Manifest::skeleton(title, ai, &timestamp);
    manifest.language = language;
    manifest.author = non_empty(options.author.as_deref())
        .or_else(|| fm.author())
        .unwrap_or_default()
        .to_owned();
    manifest.description = non_empty(options.description.as_deref())
        .or_else(|| fm.description())
        .unwrap_or_default()
        .to_owned();
    manifest.tags = options
        .tags
        .clone()
        .filter(|t| !t.is_empty())
        .or_else(|| fm.tags())
        .unwrap_or_default();
    manifest.created = fm.date().unwrap_or_else(|| timestamp.clone());
    manifest.page = PageConfig::default().with_overrides(&options.page);
    manifest.theme = theme.id.to_owned();

    seal_manifest(&mut manifest)?;
    let violations = check_manifest(&serde_json::to_value(&manifest)?);
    if !violations.is_empty() {
        return Err(ManifestError::Schema(violations).into());
    }

    let container = package(&PackageInput {
        content: &resolved.body,
        manifest: &manifest,
        content_hash: &hash,
        theme,
        fonts: &fonts,
        assets: &resolved.assets,
    })?;

    Ok(Compiled {
        container,
        manifest,
    })
}

/// Read `options.input`, compile it, and write the container atomically.
pub fn compile(options: &CompileOptions) -> Result<CompileOutput, CompileError> {
    let input = &options.input;
    info!("compiling {}", input.display());

    let raw = fs::read_to_string(input).map_err(|source| CompileError::Input {
        path: input.clone(),
        source,
    })?;
    let output = options
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(input));
    if output == *input {
        return Err(CompileError::OutputIsInput(output));
    }

    let base_dir = input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let compiled = compile_str(&raw, base_dir, options)?;

    compiled.container.write_file(&output)?;
    info!(
        "wrote {} ({} entries, {} words, language {})",
        output.display(),
        compiled.container.len(),
        compiled.manifest.ai.word_count,
        compiled.manifest.language
    );

    Ok(CompileOutput {
        path: output,
        entries: compiled
            .container
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect(),
        manifest: compiled.manifest,
    })
}
