//! SHAP values container.
//!
//! Stores attributions for a batch of samples with proper indexing and
//! verification utilities.

use ndarray::{Array2, Array3};

/// Container for per-sample, per-feature, per-output SHAP contributions.
///
/// Layout is flat `[samples × features × outputs]`, plus a separate
/// expected-value vector with one baseline scalar per output.
#[derive(Clone, Debug)]
pub struct ShapValues {
    /// Flat storage: `[sample][feature][output]`.
    values: Vec<f64>,
    /// Baseline prediction per output: `coefficients · mean + intercept`.
    expected_values: Vec<f64>,
    /// Number of samples.
    n_samples: usize,
    /// Number of features.
    n_features: usize,
    /// Number of outputs (1 for regression, K for K-output models).
    n_outputs: usize,
}

impl ShapValues {
    /// Create a zero-initialized container.
    ///
    /// # Panics
    ///
    /// Panics if `expected_values.len() != n_outputs`.
    pub fn zeros(
        n_samples: usize,
        n_features: usize,
        n_outputs: usize,
        expected_values: Vec<f64>,
    ) -> Self {
        assert_eq!(
            expected_values.len(),
            n_outputs,
            "one expected value per output"
        );
        let values = vec![0.0; n_samples * n_features * n_outputs];
        Self {
            values,
            expected_values,
            n_samples,
            n_features,
            n_outputs,
        }
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of outputs.
    #[inline]
    pub fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    /// Result shape as (samples, features, outputs).
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.n_samples, self.n_features, self.n_outputs)
    }

    /// Index into the flat array.
    #[inline]
    fn index(&self, sample: usize, feature: usize, output: usize) -> usize {
        (sample * self.n_features + feature) * self.n_outputs + output
    }

    /// SHAP value for (sample, feature, output).
    #[inline]
    pub fn get(&self, sample: usize, feature: usize, output: usize) -> f64 {
        self.values[self.index(sample, feature, output)]
    }

    /// Set SHAP value for (sample, feature, output).
    #[inline]
    pub fn set(&mut self, sample: usize, feature: usize, output: usize, value: f64) {
        let idx = self.index(sample, feature, output);
        self.values[idx] = value;
    }

    /// Expected (baseline) value for an output.
    #[inline]
    pub fn expected_value(&self, output: usize) -> f64 {
        self.expected_values[output]
    }

    /// Expected values for all outputs.
    #[inline]
    pub fn expected_values(&self) -> &[f64] {
        &self.expected_values
    }

    /// All SHAP values for one sample, length `n_features * n_outputs`.
    pub fn sample(&self, sample_idx: usize) -> &[f64] {
        let stride = self.n_features * self.n_outputs;
        &self.values[sample_idx * stride..(sample_idx + 1) * stride]
    }

    /// Feature attributions for a (sample, output) pair.
    ///
    /// Returns a Vec since values are not contiguous for `n_outputs > 1`.
    pub fn feature_attributions(&self, sample_idx: usize, output: usize) -> Vec<f64> {
        (0..self.n_features)
            .map(|f| self.get(sample_idx, f, output))
            .collect()
    }

    /// Raw values slice.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mutable raw values, for batch fills.
    #[inline]
    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Convert to a `[n_samples, n_features, n_outputs]` array.
    pub fn to_array3(&self) -> Array3<f64> {
        Array3::from_shape_vec(
            (self.n_samples, self.n_features, self.n_outputs),
            self.values.clone(),
        )
        .expect("flat storage matches shape")
    }

    /// Convert to a `[n_samples, n_features]` array, collapsing the output
    /// axis. Returns `None` unless the model has exactly one output.
    pub fn to_array2(&self) -> Option<Array2<f64>> {
        if self.n_outputs != 1 {
            return None;
        }
        Some(
            Array2::from_shape_vec((self.n_samples, self.n_features), self.values.clone())
                .expect("flat storage matches shape"),
        )
    }

    /// Verify the additivity property against model predictions.
    ///
    /// For each sample and output:
    /// `sum(shap values) + expected value ≈ prediction`.
    ///
    /// `predictions` is row-major `[n_samples, n_outputs]`. Returns `true`
    /// if every entry is within `tolerance`.
    pub fn verify(&self, predictions: &[f64], tolerance: f64) -> bool {
        if predictions.len() != self.n_samples * self.n_outputs {
            return false;
        }

        for sample in 0..self.n_samples {
            for output in 0..self.n_outputs {
                let mut sum = self.expected_value(output);
                for feature in 0..self.n_features {
                    sum += self.get(sample, feature, output);
                }

                let pred = predictions[sample * self.n_outputs + output];
                if (sum - pred).abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }
}
