/// Convenience result alias used across the crate.
pub type HitMatrixResult<T> = Result<T, HitMatrixError>;

#[derive(thiserror::Error, Debug)]
/// Crate-level error type.
pub enum HitMatrixError {
    /// Invalid configuration or story input detected at startup.
    #[error("validation error: {0}")]
    Validation(String),

    /// A dataset could not be loaded or parsed.
    #[error("data error: {0}")]
    Data(String),

    /// Chart export or rasterization failure.
    #[error("render error: {0}")]
    Render(String),

    /// JSON encode/decode failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error (IO with context).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HitMatrixError {
    /// Build [`HitMatrixError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build [`HitMatrixError::Data`].
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Build [`HitMatrixError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build [`HitMatrixError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for HitMatrixError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
