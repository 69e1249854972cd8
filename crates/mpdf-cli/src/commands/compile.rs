use super::{json_pretty, ok_mark, EXIT_SUCCESS};
use mpdf_compiler::{compile, CompileOptions, ProjectConfig};
use mpdf_schema::{Orientation, PageOverrides, PageSize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Flags of `mpdf compile`, before merging with `mpdf.toml`.
#[derive(Debug, Clone, Default)]
pub struct CompileArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub theme: Option<String>,
    pub page: Option<PageSize>,
    pub orientation: Option<Orientation>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub lang: Option<String>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub fonts_dir: Option<PathBuf>,
}

/// Command-line values win over config values.
pub fn merge_options(args: &CompileArgs, config: ProjectConfig) -> CompileOptions {
    let flags = PageOverrides {
        size: args.page,
        orientation: args.orientation,
        ..PageOverrides::default()
    };
    CompileOptions {
        input: args.input.clone(),
        output: args.output.clone(),
        title: args.title.clone(),
        author: args.author.clone(),
        description: args.description.clone(),
        language: args.lang.clone(),
        tags: args.tags.as_ref().map(|tags| {
            tags.iter()
                .map(|t| t.trim().to_owned())
                .filter(|t| !t.is_empty())
                .collect()
        }),
        page: flags.or(&config.page),
        theme: args.theme.clone().or(config.theme),
        fonts_dir: args.fonts_dir.clone().or(config.fonts_dir),
    }
}

pub fn run(args: &CompileArgs, config_path: Option<&Path>, json: bool) -> Result<u8, String> {
    let config = ProjectConfig::discover(config_path, Path::new(".")).map_err(|e| e.to_string())?;
    let options = merge_options(args, config);
    debug!("effective compile options: {options:?}");
    let out = compile(&options).map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "output": out.path.display().to_string(),
            "entries": out.entries,
            "manifest": out.manifest,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        let ai = &out.manifest.ai;
        println!(
            "{} compiled {} -> {}",
            ok_mark(),
            args.input.display(),
            out.path.display()
        );
        println!("  title:     {}", out.manifest.title);
        println!("  language:  {}", out.manifest.language);
        println!(
            "  words:     {} ({} headings, {} tables, {} code blocks, {} images)",
            ai.word_count, ai.heading_count, ai.table_count, ai.code_block_count, ai.image_count
        );
        println!("  entries:   {}", out.entries.len());
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpdf_schema::Margins;

    fn args() -> CompileArgs {
        CompileArgs {
            input: PathBuf::from("doc.md"),
            ..CompileArgs::default()
        }
    }

    #[test]
    fn config_fills_unset_flags() {
        let config = ProjectConfig {
            theme: Some("standard".to_owned()),
            fonts_dir: Some(PathBuf::from("/srv/fonts")),
            page: PageOverrides {
                size: Some(PageSize::Legal),
                header: Some(false),
                ..PageOverrides::default()
            },
        };
        let options = merge_options(&args(), config);
        assert_eq!(options.theme.as_deref(), Some("standard"));
        assert_eq!(options.fonts_dir, Some(PathBuf::from("/srv/fonts")));
        assert_eq!(options.page.size, Some(PageSize::Legal));
        assert_eq!(options.page.header, Some(false));
    }

    #[test]
    fn flags_override_config() {
        let mut a = args();
        a.page = Some(PageSize::Letter);
        a.orientation = Some(Orientation::Landscape);
        a.theme = Some("mpdf-standard-v1".to_owned());
        let config = ProjectConfig {
            theme: Some("standard".to_owned()),
            fonts_dir: None,
            page: PageOverrides {
                size: Some(PageSize::Legal),
                margins: Some(Margins {
                    top: 5.0,
                    bottom: 5.0,
                    left: 5.0,
                    right: 5.0,
                }),
                ..PageOverrides::default()
            },
        };
        let options = merge_options(&a, config);
        assert_eq!(options.theme.as_deref(), Some("mpdf-standard-v1"));
        assert_eq!(options.page.size, Some(PageSize::Letter));
        assert_eq!(options.page.orientation, Some(Orientation::Landscape));
        assert!(options.page.margins.is_some());
    }

    #[test]
    fn tags_are_trimmed_and_blank_ones_dropped() {
        let mut a = args();
        a.tags = Some(vec![" draft".to_owned(), String::new(), "q3 ".to_owned()]);
        let options = merge_options(&a, ProjectConfig::default());
        assert_eq!(options.tags, Some(vec!["draft".to_owned(), "q3".to_owned()]));
    }

    #[test]
    fn document_fields_pass_through() {
        let mut a = args();
        a.title = Some("T".to_owned());
        a.author = Some("A".to_owned());
        a.lang = Some("de".to_owned());
        a.description = Some("D".to_owned());
        let options = merge_options(&a, ProjectConfig::default());
        assert_eq!(options.title.as_deref(), Some("T"));
        assert_eq!(options.author.as_deref(), Some("A"));
        assert_eq!(options.language.as_deref(), Some("de"));
        assert_eq!(options.description.as_deref(), Some("D"));
        assert_eq!(options.output, None);
    }
}
