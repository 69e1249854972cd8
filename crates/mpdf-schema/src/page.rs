use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PageSize {
    #[default]
    #[serde(rename = "A4")]
    A4,
    #[serde(rename = "letter")]
    Letter,
    #[serde(rename = "legal")]
    Legal,
}

impl PageSize {
    pub const NAMES: &'static [&'static str] = &["A4", "letter", "legal"];

    pub fn as_str(self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "letter",
            PageSize::Legal => "legal",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A4" | "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            other => Err(format!(
                "unknown page size '{other}', expected one of: {}",
                Self::NAMES.join(", ")
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub const NAMES: &'static [&'static str] = &["portrait", "landscape"];

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            other => Err(format!(
                "unknown orientation '{other}', expected one of: {}",
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// Page margins in millimetres.
///
/// Integral values serialize as JSON integers so that the canonical manifest
/// text does not depend on how a producer spells `25` versus `25.0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Margins {
    #[serde(serialize_with = "serialize_length")]
    pub top: f64,
    #[serde(serialize_with = "serialize_length")]
    pub bottom: f64,
    #[serde(serialize_with = "serialize_length")]
    pub left: f64,
    #[serde(serialize_with = "serialize_length")]
    pub right: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 25.0,
            bottom: 25.0,
            left: 20.0,
            right: 20.0,
        }
    }
}

#[allow(clippy::float_cmp, clippy::trivially_copy_pass_by_ref)]
fn serialize_length<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.trunc() == *value && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Page-layout block of the manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageConfig {
    pub size: PageSize,
    pub margins: Margins,
    pub orientation: Orientation,
    pub header: bool,
    pub footer: bool,
    pub page_numbers: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margins: Margins::default(),
            orientation: Orientation::Portrait,
            header: true,
            footer: true,
            page_numbers: true,
        }
    }
}

/// Partial page configuration supplied by the caller or a config file.
///
/// Each present field replaces the corresponding field of the base config.
/// `margins` is replaced as a whole, never merged per side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PageOverrides {
    #[serde(default)]
    pub size: Option<PageSize>,
    #[serde(default)]
    pub margins: Option<Margins>,
    #[serde(default)]
    pub orientation: Option<Orientation>,
    #[serde(default)]
    pub header: Option<bool>,
    #[serde(default)]
    pub footer: Option<bool>,
    #[serde(default)]
    pub page_numbers: Option<bool>,
}

impl PageOverrides {
    /// Layer `self` over `fallback`: fields set here win, the rest come from `fallback`.
    #[must_use]
    pub fn or(&self, fallback: &PageOverrides) -> PageOverrides {
        PageOverrides {
            size: self.size.or(fallback.size),
            margins: self.margins.or(fallback.margins),
            orientation: self.orientation.or(fallback.orientation),
            header: self.header.or(fallback.header),
            footer: self.footer.or(fallback.footer),
            page_numbers: self.page_numbers.or(fallback.page_numbers),
        }
    }
}

impl PageConfig {
    #[must_use]
    pub fn with_overrides(&self, overrides: &PageOverrides) -> PageConfig {
        PageConfig {
            size: overrides.size.unwrap_or(self.size),
            margins: overrides.margins.unwrap_or(self.margins),
            orientation: overrides.orientation.unwrap_or(self.orientation),
            header: overrides.header.unwrap_or(self.header),
            footer: overrides.footer.unwrap_or(self.footer),
            page_numbers: overrides.page_numbers.unwrap_or(self.page_numbers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_format() {
        let page = PageConfig::default();
        assert_eq!(page.size, PageSize::A4);
        assert_eq!(page.orientation, Orientation::Portrait);
        assert_eq!(page.margins.top, 25.0);
        assert_eq!(page.margins.left, 20.0);
        assert!(page.header && page.footer && page.page_numbers);
    }

    #[test]
    fn overrides_apply_per_field() {
        let overrides = PageOverrides {
            size: Some(PageSize::Letter),
            footer: Some(false),
            ..Default::default()
        };
        let page = PageConfig::default().with_overrides(&overrides);
        assert_eq!(page.size, PageSize::Letter);
        assert!(!page.footer);
        assert!(page.header);
        assert_eq!(page.margins, Margins::default());
    }

    #[test]
    fn margins_override_replaces_all_sides() {
        let overrides = PageOverrides {
            margins: Some(Margins {
                top: 10.0,
                bottom: 10.0,
                left: 5.0,
                right: 5.0,
            }),
            ..Default::default()
        };
        let page = PageConfig::default().with_overrides(&overrides);
        assert_eq!(page.margins.top, 10.0);
        assert_eq!(page.margins.right, 5.0);
    }

    #[test]
    fn layered_overrides_prefer_front_layer() {
        let cli = PageOverrides {
            size: Some(PageSize::Legal),
            ..Default::default()
        };
        let config = PageOverrides {
            size: Some(PageSize::Letter),
            orientation: Some(Orientation::Landscape),
            ..Default::default()
        };
        let merged = cli.or(&config);
        assert_eq!(merged.size, Some(PageSize::Legal));
        assert_eq!(merged.orientation, Some(Orientation::Landscape));
    }

    #[test]
    fn integral_margins_serialize_as_integers() {
        let json = serde_json::to_string(&Margins::default()).unwrap();
        assert_eq!(json, r#"{"top":25,"bottom":25,"left":20,"right":20}"#);

        let fractional = Margins {
            top: 12.5,
            ..Margins::default()
        };
        let json = serde_json::to_string(&fractional).unwrap();
        assert!(json.contains("\"top\":12.5"));
    }

    #[test]
    fn page_size_serde_names() {
        assert_eq!(serde_json::to_string(&PageSize::A4).unwrap(), "\"A4\"");
        assert_eq!(
            serde_json::to_string(&PageSize::Letter).unwrap(),
            "\"letter\""
        );
        assert!(serde_json::from_str::<PageSize>("\"B5\"").is_err());
    }

    #[test]
    fn parse_from_cli_strings() {
        assert_eq!("legal".parse::<PageSize>().unwrap(), PageSize::Legal);
        assert_eq!(
            "landscape".parse::<Orientation>().unwrap(),
            Orientation::Landscape
        );
        assert!("B5".parse::<PageSize>().is_err());
    }
}
