//! Content-derived file identity.

use std::fmt;

/// A deterministic, content-addressed identifier.
///
/// For identical byte content the value is always identical; for different
/// bytes it differs with cryptographic probability. Independent of path,
/// mtime, and filesystem metadata — it is purely a function of the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Fingerprint {
    pub value: String,
}

impl Fingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
