use std::fs;
use std::path::Path;

/// File extensions picked up from a fonts directory.
pub const FONT_EXTENSIONS: &[&str] = &["woff2", "woff", "ttf", "otf"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFile {
    /// Bare file name; packaged as `fonts/<name>`.
    pub name: String,
    pub data: Vec<u8>,
}

fn is_font(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| FONT_EXTENSIONS.iter().any(|f| f.eq_ignore_ascii_case(e)))
}

/// Read every font file directly inside `dir`, sorted by file name.
/// Subdirectories and other files are ignored.
pub fn load_fonts(dir: &Path) -> std::io::Result<Vec<FontFile>> {
    let mut fonts = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_font(&path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        fonts.push(FontFile {
            name: name.to_owned(),
            data: fs::read(&path)?,
        });
    }
    fonts.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(fonts)
}
