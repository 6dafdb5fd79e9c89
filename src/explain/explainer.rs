//! Linear SHAP explainer.
//!
//! SHAP values for linear models have a closed-form solution. Under the
//! independence assumption:
//!
//! ```text
//! shap[i, j, o] = coefficients[j, o] * (x[i, j] - mean[j])
//! ```
//!
//! Correlated-mode attribution centers each row, whitens it through the
//! cached [`DecorrelationTransform`], applies the same formula in the
//! synthetic basis and redistributes the result back onto the original
//! features. That composition collapses to one projected coefficient
//! matrix, computed once at construction, so both modes share the same
//! per-batch arithmetic.

use ndarray::{Array1, Array2, ArrayView1};

use crate::background::{Background, DependenceMode, MaskerKind};
use crate::data::{SamplesView, SparseRowMatrix};
use crate::error::ExplainError;
use crate::explain::decorrelate::DecorrelationTransform;
use crate::explain::values::ShapValues;
use crate::model::{CoefficientSource, LinearModel};
use crate::utils::Parallelism;

/// Closed-form SHAP explainer for linear models.
///
/// Immutable once constructed; concurrent attribution calls against the
/// same explainer are safe without locking.
///
/// # Example
///
/// ```
/// use linshap::{Background, DependenceMode, LinearExplainer, LinearModel, SamplesView};
/// use ndarray::array;
///
/// let model = LinearModel::single_output(array![2.0, 3.0], 0.5);
/// let background = Background::independent(array![1.0, 2.0]);
/// let explainer =
///     LinearExplainer::new(&model, background, DependenceMode::Independent).unwrap();
///
/// let data = array![[3.0, 4.0]];
/// let shap = explainer.shap_values(SamplesView::new(data.view())).unwrap();
///
/// // 2 * (3 - 1) = 4, 3 * (4 - 2) = 6, baseline 2*1 + 3*2 + 0.5 = 8.5
/// assert!((shap.get(0, 0, 0) - 4.0).abs() < 1e-10);
/// assert!((shap.get(0, 1, 0) - 6.0).abs() < 1e-10);
/// assert!((shap.expected_value(0) - 8.5).abs() < 1e-10);
/// ```
#[derive(Debug)]
pub struct LinearExplainer {
    /// The resolved linear model.
    model: LinearModel,
    /// Background distribution supplying the baseline.
    background: Background,
    /// Dependence assumption the attributions are computed under.
    mode: DependenceMode,
    /// Whitening transform, correlated mode only.
    transform: Option<DecorrelationTransform>,
    /// Coefficients the closed form applies elementwise: the model's own in
    /// independent mode, the projected `P · B` in correlated mode.
    effective: Array2<f64>,
    /// Baseline prediction per output.
    expected: Array1<f64>,
}

impl LinearExplainer {
    /// Construct an explainer from a coefficient source and a background.
    ///
    /// Correlated mode builds and caches the decorrelation transform here;
    /// independent mode skips it.
    ///
    /// # Errors
    ///
    /// - [`ExplainError::UnsupportedModel`] if the source cannot resolve to
    ///   a flat linear model.
    /// - [`ExplainError::ShapeMismatch`] if the model feature count does
    ///   not match the background.
    /// - [`ExplainError::UnsupportedMasker`] if correlated mode is
    ///   requested with a mean-only background.
    pub fn new<S: CoefficientSource>(
        source: &S,
        background: Background,
        mode: DependenceMode,
    ) -> Result<Self, ExplainError> {
        let model = source.linear_model()?;

        if model.n_features() != background.n_features() {
            return Err(ExplainError::ShapeMismatch {
                expected: background.n_features(),
                got: model.n_features(),
            });
        }

        let transform = match mode {
            DependenceMode::Independent => None,
            DependenceMode::Correlated => match background.covariance() {
                Some(covariance) => Some(DecorrelationTransform::from_covariance(covariance)?),
                None => {
                    return Err(ExplainError::UnsupportedMasker(format!(
                        "correlated-mode attribution requires a covariance-bearing \
                         background, got {:?}",
                        MaskerKind::Independent
                    )));
                }
            },
        };

        let effective = match &transform {
            Some(t) => t.project_coefficients(model.coefficients()),
            None => model.coefficients().to_owned(),
        };

        let expected = model.coefficients().t().dot(&background.mean()) + &model.intercept();

        Ok(Self {
            model,
            background,
            mode,
            transform,
            effective,
            expected,
        })
    }

    /// The resolved linear model.
    #[inline]
    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    /// The background distribution.
    #[inline]
    pub fn background(&self) -> &Background {
        &self.background
    }

    /// The dependence assumption.
    #[inline]
    pub fn mode(&self) -> DependenceMode {
        self.mode
    }

    /// The cached decorrelation transform (correlated mode only).
    #[inline]
    pub fn transform(&self) -> Option<&DecorrelationTransform> {
        self.transform.as_ref()
    }

    /// Number of features fixed at construction.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.model.n_features()
    }

    /// Number of model outputs.
    #[inline]
    pub fn n_outputs(&self) -> usize {
        self.model.n_outputs()
    }

    /// Expected (baseline) prediction per output:
    /// `coefficients · mean + intercept`.
    ///
    /// Pure function of construction-time state.
    #[inline]
    pub fn expected_values(&self) -> ArrayView1<'_, f64> {
        self.expected.view()
    }

    /// Compute SHAP values for a dense batch.
    ///
    /// Uses the ambient rayon pool for per-sample parallelism; see
    /// [`shap_values_with`](Self::shap_values_with) to control this.
    ///
    /// # Errors
    ///
    /// [`ExplainError::ShapeMismatch`] if the batch column count disagrees
    /// with the feature count fixed at construction.
    pub fn shap_values(&self, data: SamplesView<'_>) -> Result<ShapValues, ExplainError> {
        self.shap_values_with(data, Parallelism::from_threads(0))
    }

    /// Compute SHAP values for a dense batch with explicit parallelism.
    pub fn shap_values_with(
        &self,
        data: SamplesView<'_>,
        parallelism: Parallelism,
    ) -> Result<ShapValues, ExplainError> {
        self.check_features(data.n_features())?;

        let n_features = self.n_features();
        let n_outputs = self.n_outputs();
        let mut shap = ShapValues::zeros(
            data.n_samples(),
            n_features,
            n_outputs,
            self.expected.to_vec(),
        );

        let view = data.view();
        let mean = self.background.mean();
        let effective = &self.effective;

        let stride = n_features * n_outputs;
        parallelism.maybe_par_bridge_for_each(
            shap.values_mut().chunks_mut(stride).enumerate(),
            |(sample_idx, out)| {
                for feature in 0..n_features {
                    let centered = view[[sample_idx, feature]] - mean[feature];
                    for output in 0..n_outputs {
                        out[feature * n_outputs + output] =
                            effective[[feature, output]] * centered;
                    }
                }
            },
        );

        Ok(shap)
    }

    /// Compute SHAP values for a sparse (CSR) batch.
    ///
    /// Runs as sparse-dense arithmetic: every sample starts from the dense
    /// `-effective ∘ mean` baseline, then stored entries add their
    /// `effective ∘ value` term. The batch is never densified.
    ///
    /// # Errors
    ///
    /// [`ExplainError::ShapeMismatch`] if the batch column count disagrees
    /// with the feature count fixed at construction.
    pub fn shap_values_sparse(&self, data: &SparseRowMatrix) -> Result<ShapValues, ExplainError> {
        self.shap_values_sparse_with(data, Parallelism::from_threads(0))
    }

    /// Compute SHAP values for a sparse batch with explicit parallelism.
    pub fn shap_values_sparse_with(
        &self,
        data: &SparseRowMatrix,
        parallelism: Parallelism,
    ) -> Result<ShapValues, ExplainError> {
        self.check_features(data.n_cols())?;

        let n_features = self.n_features();
        let n_outputs = self.n_outputs();
        let mut shap = ShapValues::zeros(
            data.n_rows(),
            n_features,
            n_outputs,
            self.expected.to_vec(),
        );

        let mean = self.background.mean();
        let effective = &self.effective;

        // Per-sample baseline shared by every row: -B_eff[j, o] * mean[j].
        let mut baseline = vec![0.0; n_features * n_outputs];
        for feature in 0..n_features {
            for output in 0..n_outputs {
                baseline[feature * n_outputs + output] =
                    -effective[[feature, output]] * mean[feature];
            }
        }

        let stride = n_features * n_outputs;
        parallelism.maybe_par_bridge_for_each(
            shap.values_mut().chunks_mut(stride).enumerate(),
            |(sample_idx, out)| {
                out.copy_from_slice(&baseline);
                let (indices, values) = data.row(sample_idx);
                for (&feature, &value) in indices.iter().zip(values) {
                    let feature = feature as usize;
                    for output in 0..n_outputs {
                        out[feature * n_outputs + output] +=
                            effective[[feature, output]] * value;
                    }
                }
            },
        );

        Ok(shap)
    }

    fn check_features(&self, got: usize) -> Result<(), ExplainError> {
        if got != self.n_features() {
            return Err(ExplainError::ShapeMismatch {
                expected: self.n_features(),
                got,
            });
        }
        Ok(())
    }
}
