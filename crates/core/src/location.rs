//! Browser-style document locations reduced to a decoded path.

use std::fmt;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LocationError {
    #[error("invalid document url: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid percent-encoding in path")]
    Decode,
}

/// The currently viewed document's location, percent-decoded once at
/// construction so every downstream comparison sees the same spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocation {
    decoded_path: String,
}

impl DocumentLocation {
    /// Parses a full URL or a bare path, whichever the shell hands over.
    ///
    /// # Errors
    ///
    /// Returns `LocationError` when an absolute URL does not parse or the
    /// path carries invalid percent-encoding.
    pub fn parse(href: &str) -> Result<Self, LocationError> {
        if href.contains("://") {
            let url = Url::parse(href)?;
            Self::from_path(url.path())
        } else {
            Self::from_path(href)
        }
    }

    /// Builds a location from a raw (possibly percent-encoded) path.
    ///
    /// # Errors
    ///
    /// Returns `LocationError::Decode` when the encoding is not valid UTF-8.
    pub fn from_path(raw: &str) -> Result<Self, LocationError> {
        let decoded = urlencoding::decode(raw).map_err(|_| LocationError::Decode)?;
        Ok(Self {
            decoded_path: decoded.into_owned(),
        })
    }

    /// The decoded path, as the rest of the system compares it.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.decoded_path
    }
}

impl fmt::Display for DocumentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.decoded_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_url_down_to_decoded_path() {
        let location =
            DocumentLocation::parse("http://localhost:1506/static/manga/Vol%201.html").unwrap();
        assert_eq!(location.path(), "/static/manga/Vol 1.html");
    }

    #[test]
    fn parses_bare_path() {
        let location = DocumentLocation::parse("/manga/Vol1.html").unwrap();
        assert_eq!(location.path(), "/manga/Vol1.html");
    }

    #[test]
    fn decodes_multibyte_segments() {
        let location = DocumentLocation::from_path("/manga/%E3%81%82.html").unwrap();
        assert_eq!(location.path(), "/manga/あ.html");
    }

    #[test]
    fn rejects_malformed_url() {
        let err = DocumentLocation::parse("http://").unwrap_err();
        assert!(matches!(err, LocationError::Url(_)));
    }

    #[test]
    fn rejects_invalid_percent_encoding() {
        let err = DocumentLocation::from_path("/manga/%FF%FE.html").unwrap_err();
        assert_eq!(err, LocationError::Decode);
    }
}
