use crate::format::DEFAULT_THEME_ID;
use serde::Serialize;

/// A built-in stylesheet bundle shipped inside every container as `style/*`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Theme {
    /// Short name accepted on the command line.
    pub name: &'static str,
    /// Identifier recorded in `manifest.theme`.
    pub id: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub theme_css: &'static str,
    #[serde(skip)]
    pub print_css: &'static str,
}

impl Theme {
    /// Stylesheets as `(entry name, contents)` pairs, in packaging order.
    pub fn stylesheets(&self) -> [(&'static str, &'static str); 2] {
        [
            ("style/theme.css", self.theme_css),
            ("style/print.css", self.print_css),
        ]
    }
}

pub const BUILTIN_THEMES: &[Theme] = &[Theme {
    name: "standard",
    id: DEFAULT_THEME_ID,
    description: "Clean sans-serif theme with A4 print rules",
    theme_css: include_str!("../themes/standard/theme.css"),
    print_css: include_str!("../themes/standard/print.css"),
}];

/// Look up a theme by short name or by manifest identifier.
pub fn get_theme(name: &str) -> Option<&'static Theme> {
    BUILTIN_THEMES.iter().find(|t| t.name == name || t.id == name)
}

pub fn default_theme() -> &'static Theme {
    &BUILTIN_THEMES[0]
}

pub fn list_themes() -> &'static [Theme] {
    BUILTIN_THEMES
}
