//! Newtype wrappers for string values that travel through the manifest.
//!
//! All newtypes serialize/deserialize as plain strings so the JSON shape stays flat.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Prefix carried by every digest stored inside a manifest.
pub const DIGEST_PREFIX: &str = "sha256:";

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance from a string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Return the inner string as a slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<String> for $name {
            fn eq(&self, other: &String) -> bool {
                self.0 == *other
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_newtype!(
    /// Bare lower-case hex SHA-256 digest (64 characters, no prefix).
    HexDigest
);

string_newtype!(
    /// Short BCP-47-like language tag such as `en` or `pt-BR`, or `und`.
    LanguageCode
);

impl HexDigest {
    /// The digest in manifest form: `sha256:<hex>`.
    pub fn prefixed(&self) -> String {
        format!("{DIGEST_PREFIX}{}", self.0)
    }

    /// Parse a `sha256:<hex>` string, returning `None` when the prefix is absent.
    pub fn from_prefixed(s: &str) -> Option<Self> {
        s.strip_prefix(DIGEST_PREFIX).map(Self::new)
    }

    /// Compare against another hex string, ignoring ASCII case.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

/// Returns true for exactly 64 ASCII hex digits (either case).
pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

impl LanguageCode {
    /// Sentinel for "undetermined".
    pub const UNDETERMINED: &'static str = "und";

    pub fn undetermined() -> Self {
        Self::new(Self::UNDETERMINED)
    }

    /// A usable tag is 2 to 10 characters long.
    pub fn is_valid_tag(s: &str) -> bool {
        (2..=10).contains(&s.chars().count())
    }
}
