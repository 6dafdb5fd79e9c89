//! Error types for explainer construction and attribution.

use thiserror::Error;

/// Errors surfaced by background construction, model resolution and
/// attribution calls.
#[derive(Error, Debug)]
pub enum ExplainError {
    /// The background distribution parameters are malformed.
    #[error("invalid background distribution: {0}")]
    InvalidDistribution(String),

    /// The coefficient source cannot resolve to a flat linear model.
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),

    /// The background kind is incompatible with the requested dependence mode.
    #[error("unsupported masker: {0}")]
    UnsupportedMasker(String),

    /// A feature-count disagreement between model, background or batch.
    #[error("shape mismatch: expected {expected} features, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = ExplainError::ShapeMismatch {
            expected: 4,
            got: 6,
        };
        assert_eq!(
            err.to_string(),
            "shape mismatch: expected 4 features, got 6"
        );

        let err = ExplainError::UnsupportedMasker("mean-only background".into());
        assert!(err.to_string().starts_with("unsupported masker"));
    }
}
