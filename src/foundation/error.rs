/// Convenience result type used across the crate.
pub type GaugeResult<T> = Result<T, GaugeError>;

/// Top-level error taxonomy used by panel and rendering APIs.
///
/// The gauge core itself (level normalization, fill easing, wave sampling)
/// is infallible; errors only arise at the declarative-model and IO seams.
#[derive(thiserror::Error, Debug)]
pub enum GaugeError {
    /// Invalid user-provided panel or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while evaluating, rendering, or encoding a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GaugeError {
    /// Build a [`GaugeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GaugeError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}
