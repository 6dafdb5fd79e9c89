//! Model adapter boundary.
//!
//! The explainer consumes fitted models only through [`CoefficientSource`]:
//! anything that can resolve itself to a flat [`LinearModel`]. Adapters for
//! third-party model families implement this trait; ones that cannot report
//! linear coefficients return [`ExplainError::UnsupportedModel`].

use ndarray::{Array1, Array2};

use crate::error::ExplainError;
use crate::model::LinearModel;

/// A source of flat linear coefficients.
///
/// Implemented by [`LinearModel`] itself and by bare parameter tuples, so
/// that an explainer can be built from `(beta, intercept)` pairs without an
/// intermediate model object.
pub trait CoefficientSource {
    /// Resolve to a flat linear model.
    ///
    /// # Errors
    ///
    /// [`ExplainError::UnsupportedModel`] if no flat coefficient form exists.
    fn linear_model(&self) -> Result<LinearModel, ExplainError>;
}

impl CoefficientSource for LinearModel {
    fn linear_model(&self) -> Result<LinearModel, ExplainError> {
        Ok(self.clone())
    }
}

/// Multi-output parameters: `(coefficients [n_features, n_outputs], intercept [n_outputs])`.
impl CoefficientSource for (Array2<f64>, Array1<f64>) {
    fn linear_model(&self) -> Result<LinearModel, ExplainError> {
        LinearModel::new(self.0.clone(), self.1.clone())
    }
}

/// Single-output parameters: `(coefficients, intercept)`.
impl CoefficientSource for (Array1<f64>, f64) {
    fn linear_model(&self) -> Result<LinearModel, ExplainError> {
        if self.0.is_empty() {
            return Err(ExplainError::UnsupportedModel(
                "model must have at least one feature".into(),
            ));
        }
        Ok(LinearModel::single_output(self.0.clone(), self.1))
    }
}
