//! Error types and result aliases.
//!
//! Defines the core `CaptchaError` enumeration and common `Result` type.

use std::fmt;
use thiserror::Error;

/// Boxed underlying cause carried by generation failures.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Stage of captcha synthesis that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationKind {
    /// Reading font bytes from their source.
    FontLoad,
    /// Parsing font bytes into an outline font.
    FontFormat,
    /// Serializing the pixel buffer into the target image format.
    ImageEncode,
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::FontLoad => "error encountered when reading font",
            Self::FontFormat => "unsupported or malformed font data",
            Self::ImageEncode => "error encountered when generating image bytes",
        };
        f.write_str(msg)
    }
}

/// Captcha-specific errors.
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// Base64 input failed length or alphabet validation.
    #[error("invalid Base64 encoding: {0}")]
    InvalidEncoding(String),

    /// Image synthesis or encoding failed.
    #[error("{kind}")]
    Generation {
        kind: GenerationKind,
        #[source]
        source: BoxedCause,
    },

    /// Internal consistency failure.
    #[error("unreachable state: {0}")]
    UnreachableState(&'static str),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CaptchaError {
    pub(crate) fn generation(kind: GenerationKind, source: impl Into<BoxedCause>) -> Self {
        Self::Generation {
            kind,
            source: source.into(),
        }
    }

    /// Returns the failed stage when this is a generation error.
    #[must_use]
    pub const fn generation_kind(&self) -> Option<GenerationKind> {
        match self {
            Self::Generation { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Result type alias for `CaptchaError`.
pub type Result<T> = std::result::Result<T, CaptchaError>;
