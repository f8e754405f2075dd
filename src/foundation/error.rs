/// Convenience result type used across the exporter.
pub type ExportResult<T> = Result<T, ExportError>;

/// Top-level error taxonomy used by the compositor and exporters.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// Invalid user-provided configuration. Raised before anything renders.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while resolving geometry or compositing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors raised by a frame sink (encoder process, image writer).
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExportError {
    /// Build an [`ExportError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`ExportError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`ExportError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build an [`ExportError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
