//! linshap: exact SHAP attributions for linear models.
//!
//! Computes closed-form Shapley-value explanations for linear predictive
//! models: per-feature contributions that additively reconstruct the model
//! prediction relative to a baseline expectation over a background
//! distribution. No sampling is involved; both supported dependence modes
//! are exact.
//!
//! # Key Types
//!
//! - [`LinearExplainer`] - The attribution engine
//! - [`LinearModel`] / [`CoefficientSource`] - Flat linear models and the adapter boundary
//! - [`Background`] / [`DependenceMode`] - Background distribution and dependence assumption
//! - [`ShapValues`] - Per-batch attribution result
//! - [`SamplesView`] / [`SparseRowMatrix`] - Dense and sparse query batches
//!
//! # Dependence modes
//!
//! [`DependenceMode::Independent`] treats features as statistically
//! independent: `shap[i, j] = coefficients[j] * (x[i, j] - mean[j])`.
//! [`DependenceMode::Correlated`] accounts for the background covariance by
//! whitening features through an eigen-based [`DecorrelationTransform`];
//! perfectly correlated features then split their joint credit evenly.
//! Singular covariance (duplicate, collinear or constant columns) is
//! handled by eigenvalue flooring, never rejected.
//!
//! # Example
//!
//! ```
//! use linshap::{Background, DependenceMode, LinearExplainer, LinearModel, SamplesView};
//! use ndarray::array;
//!
//! let model = LinearModel::single_output(array![2.0, 3.0], 0.5);
//! let background = Background::independent(array![1.0, 2.0]);
//! let explainer =
//!     LinearExplainer::new(&model, background, DependenceMode::Independent).unwrap();
//!
//! let batch = array![[3.0, 4.0]];
//! let shap = explainer.shap_values(SamplesView::new(batch.view())).unwrap();
//! let preds = explainer.model().predict(SamplesView::new(batch.view()));
//! assert!(shap.verify(preds.as_slice().unwrap(), 1e-10));
//! ```

// Re-export approx traits for users who want to compare attributions
pub use approx;

pub mod background;
pub mod data;
pub mod error;
pub mod explain;
pub mod model;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use background::{Background, DependenceMode, MaskerKind};
pub use data::{SamplesView, SparseRowMatrix};
pub use error::ExplainError;
pub use explain::{DecorrelationTransform, LinearExplainer, ShapValues};
pub use model::{CoefficientSource, LinearModel};
pub use utils::Parallelism;
