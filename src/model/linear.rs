//! Flat linear model representation.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::data::SamplesView;
use crate::error::ExplainError;

/// Linear model: coefficient matrix plus intercept.
///
/// Coefficients are stored as an `Array2<f64>` with shape
/// `[n_features, n_outputs]`; the intercept is one scalar per output.
/// Immutable after construction.
///
/// # Example
///
/// ```
/// use linshap::LinearModel;
/// use ndarray::{array, Array1};
///
/// // 2 features, 1 output: y = 2*x0 + 3*x1 + 0.5
/// let model = LinearModel::new(array![[2.0], [3.0]], Array1::from_vec(vec![0.5])).unwrap();
/// assert_eq!(model.n_features(), 2);
/// assert_eq!(model.n_outputs(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct LinearModel {
    /// Coefficients: shape `[n_features, n_outputs]`.
    coefficients: Array2<f64>,
    /// Intercepts: length `n_outputs`.
    intercept: Array1<f64>,
}

impl LinearModel {
    /// Create a linear model from a coefficient matrix and intercept vector.
    ///
    /// # Errors
    ///
    /// Returns [`ExplainError::UnsupportedModel`] if the intercept length
    /// does not match the coefficient column count, or if the model has
    /// zero features or zero outputs.
    pub fn new(coefficients: Array2<f64>, intercept: Array1<f64>) -> Result<Self, ExplainError> {
        if coefficients.nrows() == 0 {
            return Err(ExplainError::UnsupportedModel(
                "model must have at least one feature".into(),
            ));
        }
        if coefficients.ncols() == 0 {
            return Err(ExplainError::UnsupportedModel(
                "model must have at least one output".into(),
            ));
        }
        if intercept.len() != coefficients.ncols() {
            return Err(ExplainError::UnsupportedModel(format!(
                "intercept length {} does not match {} model outputs",
                intercept.len(),
                coefficients.ncols()
            )));
        }
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    /// Create a single-output model from a coefficient vector and scalar intercept.
    ///
    /// # Panics
    ///
    /// Panics if `coefficients` is empty.
    pub fn single_output(coefficients: Array1<f64>, intercept: f64) -> Self {
        assert!(
            !coefficients.is_empty(),
            "model must have at least one feature"
        );
        let n = coefficients.len();
        let coefficients = coefficients
            .into_shape_with_order((n, 1))
            .expect("reshape of contiguous vector cannot fail");
        Self {
            coefficients,
            intercept: Array1::from_elem(1, intercept),
        }
    }

    /// Number of input features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.coefficients.nrows()
    }

    /// Number of model outputs.
    #[inline]
    pub fn n_outputs(&self) -> usize {
        self.coefficients.ncols()
    }

    /// Coefficient matrix view, shape `[n_features, n_outputs]`.
    #[inline]
    pub fn coefficients(&self) -> ArrayView2<'_, f64> {
        self.coefficients.view()
    }

    /// Intercept view, length `n_outputs`.
    #[inline]
    pub fn intercept(&self) -> ArrayView1<'_, f64> {
        self.intercept.view()
    }

    /// Coefficient for (feature, output).
    #[inline]
    pub fn coefficient(&self, feature: usize, output: usize) -> f64 {
        self.coefficients[[feature, output]]
    }

    /// Predict raw outputs for a batch: `X · B + b`.
    ///
    /// Returns shape `[n_samples, n_outputs]`.
    ///
    /// # Panics
    ///
    /// Panics if the batch feature count does not match the model.
    pub fn predict(&self, data: SamplesView<'_>) -> Array2<f64> {
        assert_eq!(
            data.n_features(),
            self.n_features(),
            "batch feature count must match model"
        );
        data.view().dot(&self.coefficients) + &self.intercept
    }
}
