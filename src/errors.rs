//! Error handling for the mirror-mover crate.
use std::{error::Error as StdError, fmt};

use crate::platform::PlatformType;

/// Error type for the mirror-mover crate.
#[derive(Debug)]
pub struct MirrorMoverError {
    /// Inner error.
    inner: Box<Inner>,
}

impl MirrorMoverError {
    /// Create a new error.
    pub(crate) fn new(kind: MirrorMoverErrorKind) -> Self {
        Self {
            inner: Box::new(Inner {
                kind,
                source: None,
                platform: None,
            }),
        }
    }

    /// Create a new error of the given kind wrapping a source error.
    pub(crate) fn with_source<E>(kind: MirrorMoverErrorKind, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            inner: Box::new(Inner {
                kind,
                source: Some(source.into()),
                platform: None,
            }),
        }
    }

    /// Create a generic error with a message and a source.
    pub(crate) fn new_with_source<E>(text: &str, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        let source = source.into();
        Self::new(MirrorMoverErrorKind::Io).with_text(&format!("{text}: {source}"))
    }

    /// Attach a text message as the source.
    pub(crate) fn with_text(mut self, text: &str) -> Self {
        self.inner.source = Some(Box::new(std::io::Error::other(text.to_string())));
        self
    }

    /// Attach the platform the error happened on.
    pub(crate) fn with_platform(mut self, platform: PlatformType) -> Self {
        self.inner.platform = Some(platform);
        self
    }

    /// Re-label the error, keeping its source.
    pub(crate) fn with_kind(mut self, kind: MirrorMoverErrorKind) -> Self {
        self.inner.kind = kind;
        self
    }

    /// Kind of the error.
    pub fn kind(&self) -> &MirrorMoverErrorKind {
        &self.inner.kind
    }
}

/// Type alias for a boxed error.
pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Inner error type for the mirror-mover crate.
#[derive(Debug)]
struct Inner {
    /// Error kind.
    kind: MirrorMoverErrorKind,

    /// Platform error
    platform: Option<PlatformType>,

    /// Source error.
    source: Option<BoxError>,
}

/// Kind of a [`MirrorMoverError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorMoverErrorKind {
    /// Listing projects or repositories failed, aborts the run.
    Fetch,

    /// Reading the confirmation from stdin failed, aborts the run.
    Prompt,

    /// Creating the destination repository failed.
    Create,

    /// Cleaning the local clone directory failed.
    Filesystem,

    /// The external git process failed.
    Process,

    /// Invalid or unreadable configuration.
    Config,

    /// Error related to the reqwest crate.
    Reqwest,

    /// Error related to serde.
    Serde,

    /// Generic I/O error.
    Io,
}

impl fmt::Display for MirrorMoverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.inner.kind)?;
        if let Some(platform) = &self.inner.platform {
            write!(f, " ({platform})")?;
        }
        if let Some(source) = &self.inner.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for MirrorMoverError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

impl From<&str> for MirrorMoverError {
    fn from(text: &str) -> Self {
        Self::new(MirrorMoverErrorKind::Io).with_text(text)
    }
}

impl From<String> for MirrorMoverError {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl From<reqwest::Error> for MirrorMoverError {
    fn from(e: reqwest::Error) -> Self {
        Self::with_source(MirrorMoverErrorKind::Reqwest, e)
    }
}

impl From<serde_json::Error> for MirrorMoverError {
    fn from(e: serde_json::Error) -> Self {
        Self::with_source(MirrorMoverErrorKind::Serde, e)
    }
}

impl From<toml::de::Error> for MirrorMoverError {
    fn from(e: toml::de::Error) -> Self {
        Self::with_source(MirrorMoverErrorKind::Config, e)
    }
}

impl From<url::ParseError> for MirrorMoverError {
    fn from(e: url::ParseError) -> Self {
        Self::with_source(MirrorMoverErrorKind::Config, e)
    }
}

impl From<std::io::Error> for MirrorMoverError {
    fn from(e: std::io::Error) -> Self {
        Self::with_source(MirrorMoverErrorKind::Io, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_contains_kind_platform_and_source() {
        let err = MirrorMoverError::new(MirrorMoverErrorKind::Create)
            .with_platform(PlatformType::Github)
            .with_text("name already exists on this account");
        assert_eq!(
            err.to_string(),
            "Create (github): name already exists on this account"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn relabel_keeps_source() {
        let io = std::io::Error::other("permission denied");
        let err = MirrorMoverError::from(io).with_kind(MirrorMoverErrorKind::Filesystem);
        assert_eq!(err.kind(), &MirrorMoverErrorKind::Filesystem);
        assert_eq!(err.to_string(), "Filesystem: permission denied");
    }
}
