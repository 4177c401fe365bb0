/// Convenience result type used throughout the crate.
pub type QrStyleResult<T> = Result<T, QrStyleError>;

/// Errors produced while validating options or rendering a styled QR code.
#[derive(thiserror::Error, Debug)]
pub enum QrStyleError {
    /// Malformed style input, rejected before any drawing begins.
    #[error("validation error: {0}")]
    Validation(String),

    /// Options that cannot be honored for the given matrix (fatal for the session).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The drawing surface is missing or cannot be addressed.
    #[error("resource error: {0}")]
    Resource(String),

    /// The overlay image could not be fetched or decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// A newer session replaced this one while it was waiting for its overlay image.
    #[error("render session {0} was superseded")]
    Superseded(u64),

    /// Options JSON could not be parsed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Lower-level failure with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QrStyleError {
    /// Build a [`QrStyleError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QrStyleError::Configuration`].
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`QrStyleError::Resource`].
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`QrStyleError::ImageLoad`].
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`QrStyleError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Returns `true` for errors that only affect the overlay image.
    pub fn is_image_load(&self) -> bool {
        matches!(self, Self::ImageLoad(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
