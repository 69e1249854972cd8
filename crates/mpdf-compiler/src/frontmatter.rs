//! YAML front-matter splitting.
//!
//! A document may open with a `---` line, a YAML mapping, and a closing
//! `---` (or `...`) line. Everything after the closing line is the body.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_yaml::{Mapping, Value};
use tracing::warn;

/// Parsed front-matter: an untyped string-keyed map read through typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    data: Mapping,
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2026-03-01T09:30:00.000Z`.
pub(crate) fn iso8601(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl FrontMatter {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw value for `key`, whatever its type.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// A string value. Missing keys and non-string values yield `None`.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.string("title")
    }

    pub fn author(&self) -> Option<&str> {
        self.string("author")
    }

    pub fn description(&self) -> Option<&str> {
        self.string("description")
    }

    /// `tags` as a list of strings; `None` unless every item is a string.
    pub fn tags(&self) -> Option<Vec<String>> {
        self.get("tags")?
            .as_sequence()?
            .iter()
            .map(|v| v.as_str().map(str::to_owned))
            .collect()
    }

    /// `date` normalized to an RFC 3339 UTC timestamp. Accepts a full
    /// RFC 3339 date-time or a bare `YYYY-MM-DD` (midnight UTC).
    pub fn date(&self) -> Option<String> {
        let raw = self.string("date")?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(iso8601(&dt.with_timezone(&Utc)));
        }
        if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Some(iso8601(&midnight.and_utc()));
        }
        warn!("ignoring unparseable front-matter date '{raw}'");
        None
    }
}

/// Locate the YAML block and the body that follows it.
fn split_raw(raw: &str) -> Option<(&str, &str)> {
    let after_open = raw.strip_prefix("---")?;
    let newline = after_open.find('\n')?;
    if !after_open[..newline].trim().is_empty() {
        return None;
    }
    let rest = &after_open[newline + 1..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let marker = line.trim_end();
        if marker == "---" || marker == "..." {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Split `raw` into body text and front-matter.
///
/// Without a complete front-matter block the whole input is the body. A block
/// that is not a YAML mapping is logged and ignored, and the input is kept whole.
pub fn split_front_matter(raw: &str) -> (&str, FrontMatter) {
    let Some((yaml, body)) = split_raw(raw) else {
        return (raw, FrontMatter::default());
    };
    if yaml.trim().is_empty() {
        return (body, FrontMatter::default());
    }
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(data)) => (body, FrontMatter { data }),
        Ok(Value::Null) => (body, FrontMatter::default()),
        Ok(_) => {
            warn!("front-matter is not a mapping; treating it as body text");
            (raw, FrontMatter::default())
        }
        Err(e) => {
            warn!("malformed front-matter: {e}");
            (raw, FrontMatter::default())
        }
    }
}
