use crate::tokenizer::Token;
use mpdf_schema::ASSETS_PREFIX;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// A local image copied into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Path as written in the Markdown source.
    pub original: String,
    /// Archive name, `assets/img-NNN<.ext>`.
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    /// Body with every resolved image path replaced by its archive name.
    pub body: String,
    pub assets: Vec<Asset>,
}

fn is_external(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://") || src.starts_with("data:")
}

/// Image sources from the direct children of every token, in document order.
pub fn image_sources(tokens: &[Token]) -> Vec<&str> {
    tokens
        .iter()
        .flat_map(Token::children)
        .filter_map(|child| child.src())
        .filter(|src| !src.is_empty())
        .collect()
}

fn archive_name(counter: usize, src: &str) -> String {
    match Path::new(src).extension() {
        Some(ext) => format!("{ASSETS_PREFIX}img-{counter:03}.{}", ext.to_string_lossy()),
        None => format!("{ASSETS_PREFIX}img-{counter:03}"),
    }
}

/// Copy local images referenced by `tokens` into assets and rewrite `body`.
///
/// Remote and `data:` sources are left alone. Each distinct local path is
/// read once, relative to `base_dir`; files that do not exist are skipped
/// with a warning. Numbering counts only resolved files.
pub fn resolve_assets(body: &str, tokens: &[Token], base_dir: &Path) -> std::io::Result<ResolvedContent> {
    let mut assets: Vec<Asset> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for src in image_sources(tokens) {
        if seen.contains(&src) || is_external(src) {
            continue;
        }
        seen.push(src);

        let path = base_dir.join(src);
        if !path.is_file() {
            warn!("image not found: {src} (resolved to {})", path.display());
            continue;
        }
        let data = fs::read(&path)?;
        let name = archive_name(assets.len() + 1, src);
        debug!("embedding {src} as {name} ({} bytes)", data.len());
        assets.push(Asset {
            original: src.to_owned(),
            name,
            data,
        });
    }

    let mut rewritten = body.to_owned();
    for asset in &assets {
        rewritten = rewritten.replace(&asset.original, &asset.name);
    }

    Ok(ResolvedContent {
        body: rewritten,
        assets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn resolve(body: &str, dir: &Path) -> ResolvedContent {
        resolve_assets(body, &tokenize(body), dir).unwrap()
    }

    #[test]
    fn embeds_local_images_and_rewrites_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("img")).unwrap();
        std::fs::write(dir.path().join("img/chart.png"), b"PNGDATA").unwrap();
        std::fs::write(dir.path().join("photo.JPG"), b"JPEGDATA").unwrap();

        let body = "![c](img/chart.png)\n\n![p](photo.JPG)\n\nAgain ![c](img/chart.png)\n";
        let out = resolve(body, dir.path());

        assert_eq!(out.assets.len(), 2);
        assert_eq!(out.assets[0].name, "assets/img-001.png");
        assert_eq!(out.assets[0].data, b"PNGDATA");
        assert_eq!(out.assets[1].name, "assets/img-002.JPG");
        assert_eq!(
            out.body,
            "![c](assets/img-001.png)\n\n![p](assets/img-002.JPG)\n\nAgain ![c](assets/img-001.png)\n"
        );
    }

    #[test]
    fn skips_remote_and_data_sources() {
        let dir = tempfile::tempdir().unwrap();
        let body = "![a](https://example.com/a.png) ![b](http://x.test/b.gif) ![c](data:image/png;base64,AAAA)";
        let out = resolve(body, dir.path());
        assert!(out.assets.is_empty());
        assert_eq!(out.body, body);
    }

    #[test]
    fn missing_files_are_skipped_without_consuming_numbers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("real.svg"), b"<svg/>").unwrap();
        let body = "![gone](missing.png)\n\n![here](real.svg)\n";
        let out = resolve(body, dir.path());
        assert_eq!(out.assets.len(), 1);
        assert_eq!(out.assets[0].name, "assets/img-001.svg");
        assert!(out.body.contains("missing.png"));
        assert!(out.body.contains("assets/img-001.svg"));
    }

    #[test]
    fn extensionless_file_keeps_no_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("diagram"), b"data").unwrap();
        let out = resolve("![d](diagram)", dir.path());
        assert_eq!(out.assets[0].name, "assets/img-001");
    }

    #[test]
    fn no_images_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let out = resolve("# Plain\n\ntext", dir.path());
        assert!(out.assets.is_empty());
        assert_eq!(out.body, "# Plain\n\ntext");
    }
}
