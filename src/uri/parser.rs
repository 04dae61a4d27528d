//! Identifier parser

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::ResolveError;
use crate::utils::validation::{MAX_IDENTIFIER_LENGTH, is_valid_identifier};

pub const FILE_SCHEME: &str = "file";
pub const CONTENT_SCHEME: &str = "content";

/// A parsed resource identifier.
///
/// Parsed once per resolution call and never mutated. The scheme is stored
/// lowercased; the authority is kept exactly as written because provider
/// dispatch is case-sensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceIdentifier {
    raw: String,
    scheme: String,
    authority: Option<String>,
    path: String,
    segments: Vec<String>,
}

impl ResourceIdentifier {
    /// Parses `raw` into its components.
    ///
    /// Fails with `MalformedIdentifier` for blank or control-character input,
    /// input the URL grammar rejects, content links without an authority, and
    /// paths that do not percent-decode to UTF-8.
    ///
    /// `file` identifiers skip URL normalization: their path is the text after
    /// `file://<authority>`, percent-decoded and otherwise untouched, so
    /// backslashes, tabs and `..` segments survive.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        if !is_valid_identifier(raw) {
            return Err(ResolveError::MalformedIdentifier(format!(
                "empty, over {} bytes, or contains control characters",
                MAX_IDENTIFIER_LENGTH
            )));
        }

        let trimmed = raw.trim();
        if let Some((scheme, rest)) = trimmed.split_once(':') {
            if scheme.eq_ignore_ascii_case(FILE_SCHEME) {
                return Self::parse_file(raw, rest);
            }
        }

        let url = Url::parse(trimmed)
            .map_err(|e| ResolveError::MalformedIdentifier(format!("{}: {}", raw, e)))?;

        let scheme = url.scheme().to_ascii_lowercase();
        let authority = Some(url.authority())
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        if scheme == CONTENT_SCHEME && authority.is_none() {
            return Err(ResolveError::MalformedIdentifier(format!(
                "content identifier without authority: {}",
                raw
            )));
        }

        let path = decode(url.path())?;
        let segments = match url.path_segments() {
            Some(segments) => segments
                .filter(|s| !s.is_empty())
                .map(decode)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            raw: raw.to_string(),
            scheme,
            authority,
            path,
            segments,
        })
    }

    /// `rest` is everything after `file:`
    fn parse_file(raw: &str, rest: &str) -> Result<Self, ResolveError> {
        let rest = rest.split(['?', '#']).next().unwrap_or_default();

        let (authority, encoded_path) = match rest.strip_prefix("//") {
            Some(after) => match after.find('/') {
                Some(i) => after.split_at(i),
                None => (after, ""),
            },
            None => ("", rest),
        };

        if encoded_path.is_empty() {
            return Err(ResolveError::MalformedIdentifier(format!(
                "file identifier without path: {}",
                raw
            )));
        }

        let segments = encoded_path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            scheme: FILE_SCHEME.to_string(),
            authority: Some(authority)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
            path: decode(encoded_path)?,
            segments,
        })
    }

    /// The identifier exactly as the caller supplied it
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The provider identity, `None` for identifiers without one (e.g. `file:///x`)
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// Percent-decoded path component
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Percent-decoded, non-empty path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_file(&self) -> bool {
        self.scheme == FILE_SCHEME
    }

    pub fn is_content(&self) -> bool {
        self.scheme == CONTENT_SCHEME
    }
}

fn decode(encoded: &str) -> Result<String, ResolveError> {
    percent_decode_str(encoded)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| ResolveError::MalformedIdentifier(format!("{}: {}", encoded, e)))
}
