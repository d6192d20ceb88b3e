/// Convenience alias used across the crate.
pub type ReelResult<T> = Result<T, ReelError>;

/// Errors produced by grouping, assembly, encoding and chroma-key scanning.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Bad inputs detected before any rendering work starts.
    #[error("validation error: {0}")]
    Validation(String),

    /// Probing or decoding media failed.
    #[error("media error: {0}")]
    Media(String),

    /// Timeline assembly failed.
    #[error("render error: {0}")]
    Render(String),

    /// The output writer could not be opened, fed or finalized.
    #[error("encode error: {0}")]
    Encode(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("config error: {0}")]
    Config(String),

    /// Any other error, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Media`].
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`ReelError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ReelError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// `true` for errors raised by fail-fast input checks.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
