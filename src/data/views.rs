//! Semantic array wrappers for query batches.
//!
//! # Terminology
//!
//! - **Samples**: query instances (rows)
//! - **Features**: input variables (columns)
//! - **Outputs**: model output dimensions (1 for regression, K for K-output models)
//!
//! Query batches are sample-major: shape `[n_samples, n_features]` with each
//! sample's features contiguous. Compatible with numpy's default C-order arrays.

use ndarray::ArrayView2;

/// Read-only view over a sample-major query batch.
///
/// Shape: `[n_samples, n_features]`.
///
/// # Example
///
/// ```
/// use linshap::SamplesView;
///
/// // 3 samples, 2 features each
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let view = SamplesView::from_slice(&data, 3, 2).unwrap();
///
/// assert_eq!(view.n_samples(), 3);
/// assert_eq!(view.n_features(), 2);
/// assert_eq!(view.get(0, 1), 2.0); // sample 0, feature 1
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SamplesView<'a>(ArrayView2<'a, f64>);

impl<'a> SamplesView<'a> {
    /// Wrap an existing `[n_samples, n_features]` view.
    pub fn new(view: ArrayView2<'a, f64>) -> Self {
        Self(view)
    }

    /// Create a view from a flat slice in sample-major (row-major) order.
    ///
    /// This is zero-copy. Returns `None` if
    /// `data.len() != n_samples * n_features`.
    pub fn from_slice(data: &'a [f64], n_samples: usize, n_features: usize) -> Option<Self> {
        ArrayView2::from_shape((n_samples, n_features), data)
            .ok()
            .map(Self)
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.0.nrows()
    }

    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.0.ncols()
    }

    /// Get feature value at (sample, feature).
    #[inline]
    pub fn get(&self, sample: usize, feature: usize) -> f64 {
        self.0[[sample, feature]]
    }

    /// The underlying ndarray view.
    #[inline]
    pub fn view(&self) -> ArrayView2<'a, f64> {
        self.0
    }
}

impl<'a> From<ArrayView2<'a, f64>> for SamplesView<'a> {
    fn from(view: ArrayView2<'a, f64>) -> Self {
        Self(view)
    }
}
