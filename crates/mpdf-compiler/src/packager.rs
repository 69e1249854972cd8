use crate::fonts::FontFile;
use crate::resolver::Asset;
use crate::CompileError;
use mpdf_container::Container;
use mpdf_schema::{
    signature_payload, HexDigest, Manifest, Theme, CONTENT_ENTRY, FONTS_PREFIX, MANIFEST_ENTRY,
    SIGNATURE_ENTRY,
};

/// Everything that goes into one container. The manifest must already be sealed.
#[derive(Debug, Clone, Copy)]
pub struct PackageInput<'a> {
    pub content: &'a str,
    pub manifest: &'a Manifest,
    pub content_hash: &'a HexDigest,
    pub theme: &'a Theme,
    pub fonts: &'a [FontFile],
    pub assets: &'a [Asset],
}

/// Lay out entries in the fixed order: content, manifest, style, fonts,
/// assets, signature.
pub fn package(input: &PackageInput<'_>) -> Result<Container, CompileError> {
    let mut container = Container::new();

    container.add(CONTENT_ENTRY, input.content)?;
    container.add(MANIFEST_ENTRY, input.manifest.to_canonical_json()?)?;
    for (name, css) in input.theme.stylesheets() {
        container.add(name, css)?;
    }
    for font in input.fonts {
        container.add(format!("{FONTS_PREFIX}{}", font.name), font.data.as_slice())?;
    }
    for asset in input.assets {
        container.add(asset.name.as_str(), asset.data.as_slice())?;
    }
    container.add(SIGNATURE_ENTRY, signature_payload(input.content_hash))?;

    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpdf_schema::{content_hash, default_theme, seal_manifest, AiMetadata, LanguageCode};

    fn manifest_for(body: &str) -> Manifest {
        let ai = AiMetadata {
            content_hash: content_hash(body.as_bytes()).prefixed(),
            word_count: 1,
            heading_count: 0,
            table_count: 0,
            code_block_count: 0,
            image_count: 1,
            language_detected: LanguageCode::undetermined(),
        };
        let mut m = Manifest::skeleton("t", ai, "2026-01-01T00:00:00.000Z");
        seal_manifest(&mut m).unwrap();
        m
    }

    #[test]
    fn entries_follow_fixed_order() {
        let body = "![x](assets/img-001.png)";
        let manifest = manifest_for(body);
        let hash = content_hash(body.as_bytes());
        let fonts = vec![FontFile {
            name: "Inter.woff2".to_owned(),
            data: b"font".to_vec(),
        }];
        let assets = vec![Asset {
            original: "x.png".to_owned(),
            name: "assets/img-001.png".to_owned(),
            data: b"png".to_vec(),
        }];
        let container = package(&PackageInput {
            content: body,
            manifest: &manifest,
            content_hash: &hash,
            theme: default_theme(),
            fonts: &fonts,
            assets: &assets,
        })
        .unwrap();

        assert_eq!(
            container.names(),
            vec![
                "content.md",
                "manifest.json",
                "style/theme.css",
                "style/print.css",
                "fonts/Inter.woff2",
                "assets/img-001.png",
                "signature.sha256"
            ]
        );
        assert_eq!(
            container.get("signature.sha256").unwrap(),
            format!("{hash}\n").as_bytes()
        );
        let stored: Manifest =
            serde_json::from_slice(container.get("manifest.json").unwrap()).unwrap();
        assert_eq!(stored, manifest);
    }

    #[test]
    fn colliding_asset_names_are_rejected() {
        let body = "x";
        let manifest = manifest_for(body);
        let hash = content_hash(body.as_bytes());
        let dup = Asset {
            original: "a.png".to_owned(),
            name: "assets/img-001.png".to_owned(),
            data: Vec::new(),
        };
        let err = package(&PackageInput {
            content: body,
            manifest: &manifest,
            content_hash: &hash,
            theme: default_theme(),
            fonts: &[],
            assets: &[dup.clone(), dup],
        })
        .unwrap_err();
        assert!(matches!(err, CompileError::Container(_)));
    }
}
