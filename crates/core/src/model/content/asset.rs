use std::fmt;
use thiserror::Error;
use url::Url;

//
// ─── ERRORS (domain validation) ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset reference cannot be empty")]
    EmptyAssetRef,

    #[error("asset URL could not be parsed: {0}")]
    InvalidUrl(String),
}

//
// ─── ASSET REFERENCE ───────────────────────────────────────────────────────────
//

/// Reference to a hosted asset: a cover image, a lesson image, or a video.
///
/// Anything carrying a scheme must parse as an absolute URL; everything else
/// is kept verbatim as a relative path into the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    Relative(String),
    Url(Url),
}

impl AssetRef {
    /// Parses a raw author-supplied reference.
    ///
    /// # Errors
    ///
    /// Returns `AssetError::EmptyAssetRef` for empty or whitespace-only input,
    /// `AssetError::InvalidUrl` when a scheme is present but the URL is malformed.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, AssetError> {
        let s = raw.as_ref().trim();
        if s.is_empty() {
            return Err(AssetError::EmptyAssetRef);
        }
        if s.contains("://") {
            let url = Url::parse(s).map_err(|_| AssetError::InvalidUrl(s.to_owned()))?;
            return Ok(AssetRef::Url(url));
        }
        Ok(AssetRef::Relative(s.to_owned()))
    }

    #[must_use]
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            AssetRef::Url(u) => Some(u),
            AssetRef::Relative(_) => None,
        }
    }

    #[must_use]
    pub fn as_relative(&self) -> Option<&str> {
        match self {
            AssetRef::Relative(p) => Some(p),
            AssetRef::Url(_) => None,
        }
    }

    /// The reference as it should be persisted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            AssetRef::Relative(p) => p,
            AssetRef::Url(u) => u.as_str(),
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
