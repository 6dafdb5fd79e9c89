//! Sparse query batch tests.
//!
//! Attribution over CSR batches must agree with the densified equivalent in
//! both dependence modes, satisfy additivity, and enforce the same shape
//! boundary as the dense path.

use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use linshap::{
    Background, DependenceMode, ExplainError, LinearExplainer, LinearModel, Parallelism,
    SamplesView, SparseRowMatrix,
};

// =============================================================================
// Test Helpers
// =============================================================================

/// Random CSR batch with roughly `density` non-zero entries.
fn random_sparse(
    rng: &mut Xoshiro256PlusPlus,
    n_rows: usize,
    n_cols: usize,
    density: f64,
) -> SparseRowMatrix {
    let mut triplets = Vec::new();
    for r in 0..n_rows {
        for c in 0..n_cols {
            if rng.gen_range(0.0..1.0) < density {
                triplets.push((r, c, rng.gen_range(-5.0..5.0)));
            }
        }
    }
    SparseRowMatrix::from_triplets(n_rows, n_cols, &triplets)
}

fn random_model(rng: &mut Xoshiro256PlusPlus, n_features: usize, n_outputs: usize) -> LinearModel {
    let coefficients = Array2::from_shape_fn((n_features, n_outputs), |_| rng.gen_range(-2.0..2.0));
    let intercept = Array1::from_shape_fn(n_outputs, |_| rng.gen_range(-1.0..1.0));
    LinearModel::new(coefficients, intercept).unwrap()
}

// =============================================================================
// Sparse/Dense Equivalence
// =============================================================================

#[test]
fn sparse_matches_dense_independent_mode() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
    let model = random_model(&mut rng, 8, 2);
    let sparse = random_sparse(&mut rng, 30, 8, 0.3);
    let dense = sparse.to_dense();

    let mean = Array1::from_shape_fn(8, |_| rng.gen_range(-1.0..1.0));
    let explainer = LinearExplainer::new(
        &model,
        Background::independent(mean),
        DependenceMode::Independent,
    )
    .unwrap();

    let from_sparse = explainer.shap_values_sparse(&sparse).unwrap();
    let from_dense = explainer.shap_values(SamplesView::new(dense.view())).unwrap();

    assert_eq!(from_sparse.shape(), from_dense.shape());
    for (a, b) in from_sparse.values().iter().zip(from_dense.values()) {
        assert!((a - b).abs() < 1e-6, "sparse {} vs dense {}", a, b);
    }
}

#[test]
fn sparse_matches_dense_correlated_mode() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(6);
    let n_features = 6;
    let model = random_model(&mut rng, n_features, 1);
    let sparse = random_sparse(&mut rng, 20, n_features, 0.25);
    let dense = sparse.to_dense();

    let a = Array2::from_shape_fn((n_features, n_features), |_| rng.gen_range(-1.0..1.0));
    let sigma = a.dot(&a.t()) + Array2::<f64>::eye(n_features);
    let mu = Array1::zeros(n_features);

    let background = Background::correlated(mu, sigma).unwrap();
    let explainer =
        LinearExplainer::new(&model, background, DependenceMode::Correlated).unwrap();

    let from_sparse = explainer.shap_values_sparse(&sparse).unwrap();
    let from_dense = explainer.shap_values(SamplesView::new(dense.view())).unwrap();

    for (a, b) in from_sparse.values().iter().zip(from_dense.values()) {
        assert!((a - b).abs() < 1e-6, "sparse {} vs dense {}", a, b);
    }
}

// =============================================================================
// Additivity
// =============================================================================

#[test]
fn sparse_additivity() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(13);
    let model = random_model(&mut rng, 10, 1);
    let sparse = random_sparse(&mut rng, 40, 10, 0.2);
    let dense = sparse.to_dense();

    let mean = Array1::from_shape_fn(10, |_| rng.gen_range(-1.0..1.0));
    let explainer = LinearExplainer::new(
        &model,
        Background::independent(mean),
        DependenceMode::Independent,
    )
    .unwrap();

    let shap = explainer.shap_values_sparse(&sparse).unwrap();
    let preds = model.predict(SamplesView::new(dense.view()));
    assert!(shap.verify(preds.as_slice().unwrap(), 1e-6));
}

// =============================================================================
// Boundaries
// =============================================================================

#[test]
fn sparse_shape_mismatch() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
    let model = random_model(&mut rng, 4, 1);
    let explainer = LinearExplainer::new(
        &model,
        Background::independent(Array1::zeros(4)),
        DependenceMode::Independent,
    )
    .unwrap();

    let sparse = random_sparse(&mut rng, 3, 6, 0.5);
    assert!(matches!(
        explainer.shap_values_sparse(&sparse),
        Err(ExplainError::ShapeMismatch {
            expected: 4,
            got: 6
        })
    ));
}

#[test]
fn sparse_sequential_and_parallel_agree() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(17);
    let model = random_model(&mut rng, 8, 3);
    let sparse = random_sparse(&mut rng, 50, 8, 0.3);

    let mean = Array1::from_shape_fn(8, |_| rng.gen_range(-1.0..1.0));
    let explainer = LinearExplainer::new(
        &model,
        Background::independent(mean),
        DependenceMode::Independent,
    )
    .unwrap();

    let seq = explainer
        .shap_values_sparse_with(&sparse, Parallelism::Sequential)
        .unwrap();
    let par = explainer
        .shap_values_sparse_with(&sparse, Parallelism::Parallel)
        .unwrap();
    assert_eq!(seq.values(), par.values());
}
