//! Attribution engine: closed-form SHAP values for linear models.
//!
//! - [`LinearExplainer`]: the public compute component
//! - [`DecorrelationTransform`]: cached whitening for correlated mode
//! - [`ShapValues`]: per-batch attribution result

mod decorrelate;
mod explainer;
mod values;

pub use decorrelate::DecorrelationTransform;
pub use explainer::LinearExplainer;
pub use values::ShapValues;
