//! Independent-mode attribution tests.
//!
//! Covers the closed-form exactness of independent-mode SHAP values,
//! additivity against model predictions, empirical backgrounds, adapter
//! construction, and multi-output result shapes.

use approx::assert_abs_diff_eq;
use ndarray::{array, Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rstest::rstest;

use linshap::{
    Background, CoefficientSource, DependenceMode, ExplainError, LinearExplainer, LinearModel,
    SamplesView,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn random_matrix(rng: &mut Xoshiro256PlusPlus, rows: usize, cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-3.0..3.0))
}

fn random_model(rng: &mut Xoshiro256PlusPlus, n_features: usize, n_outputs: usize) -> LinearModel {
    let coefficients = random_matrix(rng, n_features, n_outputs);
    let intercept = Array1::from_shape_fn(n_outputs, |_| rng.gen_range(-1.0..1.0));
    LinearModel::new(coefficients, intercept).unwrap()
}

// =============================================================================
// Closed Form
// =============================================================================

#[test]
fn independent_mode_matches_closed_form_exactly() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
    let model = random_model(&mut rng, 5, 1);
    let batch = random_matrix(&mut rng, 20, 5);
    let mean = array![0.5, -1.0, 0.0, 2.0, 0.25];

    let explainer = LinearExplainer::new(
        &model,
        Background::independent(mean.clone()),
        DependenceMode::Independent,
    )
    .unwrap();
    let shap = explainer.shap_values(SamplesView::new(batch.view())).unwrap();

    for sample in 0..20 {
        for feature in 0..5 {
            let expected = model.coefficient(feature, 0) * (batch[[sample, feature]] - mean[feature]);
            assert_eq!(shap.get(sample, feature, 0), expected);
        }
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
fn additivity_reconstructs_predictions(#[case] n_outputs: usize) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    let model = random_model(&mut rng, 6, n_outputs);
    let background_data = random_matrix(&mut rng, 50, 6);
    let batch = random_matrix(&mut rng, 25, 6);

    let background = Background::from_samples(
        SamplesView::new(background_data.view()),
        DependenceMode::Independent,
    )
    .unwrap();
    let explainer =
        LinearExplainer::new(&model, background, DependenceMode::Independent).unwrap();

    let shap = explainer.shap_values(SamplesView::new(batch.view())).unwrap();
    let preds = model.predict(SamplesView::new(batch.view()));
    assert!(shap.verify(preds.as_slice().unwrap(), 1e-6));
}

#[test]
fn expected_value_equals_mean_background_prediction() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
    let model = random_model(&mut rng, 4, 1);
    let background_data = random_matrix(&mut rng, 100, 4);

    let background = Background::from_samples(
        SamplesView::new(background_data.view()),
        DependenceMode::Independent,
    )
    .unwrap();
    let explainer =
        LinearExplainer::new(&model, background, DependenceMode::Independent).unwrap();

    let preds = model.predict(SamplesView::new(background_data.view()));
    let mean_pred = preds.column(0).sum() / 100.0;
    assert_abs_diff_eq!(explainer.expected_values()[0], mean_pred, epsilon = 1e-6);
}

#[test]
fn single_feature_model() {
    let model = LinearModel::single_output(array![2.0], 1.0);
    let background = Background::independent(array![0.5]);
    let explainer =
        LinearExplainer::new(&model, background, DependenceMode::Independent).unwrap();

    let batch = array![[3.0], [-1.0]];
    let shap = explainer.shap_values(SamplesView::new(batch.view())).unwrap();

    assert_abs_diff_eq!(explainer.expected_values()[0], 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(shap.get(0, 0, 0), 5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(shap.get(1, 0, 0), -3.0, epsilon = 1e-12);

    let preds = model.predict(SamplesView::new(batch.view()));
    assert!(shap.verify(preds.as_slice().unwrap(), 1e-10));
}

// =============================================================================
// Result Shapes
// =============================================================================

#[test]
fn multi_output_result_is_three_axis() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
    let model = random_model(&mut rng, 5, 3);
    let batch = random_matrix(&mut rng, 7, 5);

    let explainer = LinearExplainer::new(
        &model,
        Background::independent(Array1::zeros(5)),
        DependenceMode::Independent,
    )
    .unwrap();
    let shap = explainer.shap_values(SamplesView::new(batch.view())).unwrap();

    assert_eq!(shap.shape(), (7, 5, 3));
    assert_eq!(shap.to_array3().dim(), (7, 5, 3));
    assert!(shap.to_array2().is_none());
}

#[test]
fn single_output_axis_collapses() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(12);
    let model = random_model(&mut rng, 5, 1);
    let batch = random_matrix(&mut rng, 7, 5);

    let explainer = LinearExplainer::new(
        &model,
        Background::independent(Array1::zeros(5)),
        DependenceMode::Independent,
    )
    .unwrap();
    let shap = explainer.shap_values(SamplesView::new(batch.view())).unwrap();

    let collapsed = shap.to_array2().unwrap();
    assert_eq!(collapsed.dim(), (7, 5));
    assert_eq!(collapsed[[3, 2]], shap.get(3, 2, 0));
}

// =============================================================================
// Construction Boundary
// =============================================================================

/// An adapter that cannot report linear coefficients.
struct OpaqueModel;

impl CoefficientSource for OpaqueModel {
    fn linear_model(&self) -> Result<LinearModel, ExplainError> {
        Err(ExplainError::UnsupportedModel(
            "opaque model has no flat coefficient form".into(),
        ))
    }
}

#[test]
fn opaque_adapter_is_rejected() {
    let background = Background::independent(array![0.0, 0.0]);
    let err = LinearExplainer::new(&OpaqueModel, background, DependenceMode::Independent)
        .unwrap_err();
    assert!(matches!(err, ExplainError::UnsupportedModel(_)));
}

#[test]
fn tuple_source_construction() {
    // (beta, intercept) pairs work directly, no model object needed.
    let source = (array![1.0, -1.0], 0.0);
    let background = Background::independent(array![0.0, 0.0]);
    let explainer =
        LinearExplainer::new(&source, background, DependenceMode::Independent).unwrap();

    let batch = array![[2.0, 3.0]];
    let shap = explainer.shap_values(SamplesView::new(batch.view())).unwrap();
    assert_abs_diff_eq!(shap.get(0, 0, 0), 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(shap.get(0, 1, 0), -3.0, epsilon = 1e-12);
}

#[test]
fn empty_background_data_is_invalid() {
    let data: Vec<f64> = vec![];
    let view = SamplesView::from_slice(&data, 0, 2).unwrap();
    let err = Background::from_samples(view, DependenceMode::Correlated).unwrap_err();
    assert!(matches!(err, ExplainError::InvalidDistribution(_)));
}
