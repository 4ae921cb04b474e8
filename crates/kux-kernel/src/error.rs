//! Error types for failures outside the verdict.
//!
//! Structural and identity defects never surface here: they are findings in
//! the [`Verdict`](crate::Verdict). These errors cover input that never
//! became a document.

/// Failure classes of [`KuxError`] that describe a defective input rather
/// than a defective document.
pub const INPUT_DEFECT_CLASSES: [&str; 2] = ["invalid_json", "io_error"];

/// Errors raised before verification can run.
#[derive(Debug, thiserror::Error)]
pub enum KuxError {
    /// The input bytes are not a JSON value.
    #[error("invalid_json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The input could not be read.
    #[error("io_error: failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A verdict or hash could not be rendered for output.
    #[error("render_error: {0}")]
    Render(String),
}

impl KuxError {
    /// Machine-readable class, distinct from any verdict finding.
    pub fn failure_class(&self) -> &'static str {
        match self {
            KuxError::InvalidJson(_) => "invalid_json",
            KuxError::Io { .. } => "io_error",
            KuxError::Render(_) => "render_error",
        }
    }
}
