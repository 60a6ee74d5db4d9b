use crate::composition::layer::LayerId;

/// Convenience result type used across layercomp.
pub type LayercompResult<T> = Result<T, LayercompError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum LayercompError {
    /// Invalid caller-provided parameters (out-of-range adjustments, bad scale, mismatched buffers).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing or compositing a stack.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors while decoding source images at the collaborator boundary.
    #[error("decode error: {0}")]
    Decode(String),

    /// A stack operation referenced a layer that is not in the stack.
    #[error("unknown layer: {0}")]
    UnknownLayer(LayerId),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayercompError {
    /// Build a [`LayercompError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LayercompError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`LayercompError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
