//! Row collection references

use std::fmt;

/// A reference to a row collection (or a single row) of the content-query service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentUri(String);

impl ContentUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Row reference for `id` inside this collection
    pub fn with_appended_id(&self, id: u64) -> Self {
        Self(format!("{}/{}", self.0.trim_end_matches('/'), id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentUri {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}
