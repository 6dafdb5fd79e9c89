//! Eigen-based decorrelation of the background covariance.
//!
//! Correlated-mode attribution needs a change of basis mapping centered
//! feature vectors into synthetic components with zero cross-covariance.
//! [`DecorrelationTransform`] builds that map once from a covariance matrix
//! via a symmetric eigendecomposition: `Σ = Q Λ Qᵀ`, forward operator
//! `W = Λ_r^{-1/2} Q_rᵀ` and pseudo-inverse `W⁺ = Q_r Λ_r^{1/2}`, where the
//! retained subscript `r` drops eigenvalues floored to zero.
//!
//! Flooring small and negative eigenvalues is what makes singular and
//! near-singular covariance (duplicate columns, exact linear combinations,
//! zero-variance columns) well-defined inputs rather than errors. The
//! composed projector `P = W⁺ W = Q_r Q_rᵀ` then splits joint attribution
//! evenly between perfectly correlated features.

use faer::{Mat, Side};
use ndarray::{Array2, ArrayView2};

use crate::error::ExplainError;

/// Eigenvalues below `max_eigenvalue * RELATIVE_EIGEN_FLOOR` are treated as
/// zero and excluded from the retained eigenspace.
const RELATIVE_EIGEN_FLOOR: f64 = 1e-6;

/// Lower bound on the flooring tolerance, for covariance matrices whose
/// spectrum is itself tiny.
const ABSOLUTE_EIGEN_FLOOR: f64 = 1e-12;

/// Cached whitening transform derived from a background covariance matrix.
///
/// Built once at explainer construction, immutable afterwards, and safe to
/// share read-only across concurrent queries.
#[derive(Debug, Clone)]
pub struct DecorrelationTransform {
    /// `W = Λ_r^{-1/2} Q_rᵀ`, shape `[n_features, n_features]`; rows for
    /// floored components are zero.
    forward: Array2<f64>,
    /// `W⁺ = Q_r Λ_r^{1/2}`, shape `[n_features, n_features]`.
    inverse: Array2<f64>,
    /// `P = W⁺ · W = Q_r Q_rᵀ`: projector onto the retained eigenspace.
    projection: Array2<f64>,
    /// Number of retained (non-floored) eigenvalues.
    rank: usize,
}

impl DecorrelationTransform {
    /// Build the transform from a covariance matrix.
    ///
    /// The input is symmetrized before decomposition; eigenvalues below the
    /// flooring tolerance (including all negative ones) are zeroed; features
    /// with zero variance are explicitly decoupled so their attribution is
    /// exactly zero. If the eigensolver fails, a small diagonal ridge is
    /// added and the decomposition retried.
    ///
    /// # Errors
    ///
    /// [`ExplainError::InvalidDistribution`] if the covariance contains
    /// non-finite entries, or if the eigensolver fails after retries.
    pub fn from_covariance(covariance: ArrayView2<'_, f64>) -> Result<Self, ExplainError> {
        let n = covariance.nrows();
        debug_assert_eq!(covariance.ncols(), n, "covariance must be square");

        if covariance.iter().any(|v| !v.is_finite()) {
            return Err(ExplainError::InvalidDistribution(
                "covariance contains non-finite entries".into(),
            ));
        }

        let mut candidate = Mat::from_fn(n, n, |i, j| {
            0.5 * (covariance[[i, j]] + covariance[[j, i]])
        });

        let mut ridge = 0.0_f64;
        for attempt in 0..4 {
            match candidate.as_ref().self_adjoint_eigen(Side::Lower) {
                Ok(eig) => {
                    let diag = eig.S();
                    let mut eigenvalues = Vec::with_capacity(n);
                    for idx in 0..diag.dim() {
                        eigenvalues.push(diag[idx]);
                    }
                    let vectors = eig.U();
                    let eigenvectors = Array2::from_shape_fn((n, n), |(i, j)| vectors[(i, j)]);
                    return Ok(Self::assemble(covariance, &eigenvalues, &eigenvectors));
                }
                Err(_) => {
                    if attempt == 3 {
                        return Err(ExplainError::InvalidDistribution(
                            "eigendecomposition of covariance failed".into(),
                        ));
                    }

                    let mut diag_scale = 0.0_f64;
                    for idx in 0..n {
                        diag_scale = diag_scale.max(candidate[(idx, idx)].abs());
                    }
                    let base = (diag_scale * 1e-8).max(1e-10);
                    ridge = if ridge == 0.0 { base } else { ridge * 10.0 };
                    for idx in 0..n {
                        candidate[(idx, idx)] += ridge;
                    }
                    log::warn!(
                        "covariance eigendecomposition failed on attempt {}; added ridge {:.3e} before retrying",
                        attempt + 1,
                        ridge
                    );
                }
            }
        }
        unreachable!("eigendecomposition loop always returns");
    }

    /// Assemble the operators from raw eigenvalues/eigenvectors.
    fn assemble(
        covariance: ArrayView2<'_, f64>,
        eigenvalues: &[f64],
        eigenvectors: &Array2<f64>,
    ) -> Self {
        let n = eigenvalues.len();

        let scale = eigenvalues
            .iter()
            .filter(|v| v.is_finite())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let tolerance = (scale * RELATIVE_EIGEN_FLOOR).max(ABSOLUTE_EIGEN_FLOOR);

        let mut floored = vec![0.0_f64; n];
        let mut rank = 0;
        for (k, &value) in eigenvalues.iter().enumerate() {
            if !value.is_finite() || value <= tolerance {
                if value.is_finite() && value < -10.0 * tolerance {
                    log::warn!(
                        "covariance produced large negative eigenvalue {:.3e}; flooring to zero",
                        value
                    );
                }
                continue;
            }
            floored[k] = value;
            rank += 1;
        }

        // Zero-variance features cannot carry attribution. Decouple them
        // explicitly so rounding inside the eigensolver cannot leak credit
        // onto a constant column.
        let degenerate: Vec<bool> = (0..n)
            .map(|j| covariance[[j, j]].abs() <= tolerance)
            .collect();

        let mut forward = Array2::zeros((n, n));
        let mut inverse = Array2::zeros((n, n));
        for k in 0..n {
            if floored[k] == 0.0 {
                continue;
            }
            let root = floored[k].sqrt();
            for j in 0..n {
                if degenerate[j] {
                    continue;
                }
                let q = eigenvectors[[j, k]];
                forward[[k, j]] = q / root;
                inverse[[j, k]] = q * root;
            }
        }

        let projection = inverse.dot(&forward);

        Self {
            forward,
            inverse,
            projection,
            rank,
        }
    }

    /// Number of original features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.forward.ncols()
    }

    /// Number of retained eigencomponents.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Forward whitening operator `W`.
    #[inline]
    pub fn forward(&self) -> ArrayView2<'_, f64> {
        self.forward.view()
    }

    /// Pseudo-inverse `W⁺`.
    #[inline]
    pub fn inverse(&self) -> ArrayView2<'_, f64> {
        self.inverse.view()
    }

    /// Projector `P = W⁺ · W` onto the retained eigenspace.
    #[inline]
    pub fn projection(&self) -> ArrayView2<'_, f64> {
        self.projection.view()
    }

    /// Map centered sample rows into synthetic (decorrelated) coordinates.
    ///
    /// `centered` has shape `[n_samples, n_features]`; the result has the
    /// same shape, one synthetic component per retained eigen-direction
    /// (floored directions map to zero).
    pub fn whiten(&self, centered: ArrayView2<'_, f64>) -> Array2<f64> {
        centered.dot(&self.forward.t())
    }

    /// Re-express a coefficient matrix on the original feature axis.
    ///
    /// Composes the forward transform, the synthetic-space attribution and
    /// the back-mapping into the single operator `P · B`: the coefficient
    /// matrix the correlated-mode closed form applies elementwise.
    pub fn project_coefficients(&self, coefficients: ArrayView2<'_, f64>) -> Array2<f64> {
        self.projection.dot(&coefficients)
    }
}
