//! Background distribution descriptors.
//!
//! The background distribution defines the baseline expectation against
//! which attributions are measured. Two kinds are consumable here:
//!
//! - [`Background::Independent`]: feature mean only
//! - [`Background::Correlated`]: feature mean plus covariance
//!
//! Either can be given explicitly or estimated empirically from raw sample
//! rows. Any other masker kind in the wider ecosystem is a collaborator
//! outside this crate and is rejected at the explainer boundary.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::data::SamplesView;
use crate::error::ExplainError;

/// Feature-dependence assumption used by the attribution formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependenceMode {
    /// Features are treated as statistically independent.
    Independent,
    /// Features are treated as jointly correlated; attribution accounts
    /// for the background covariance.
    Correlated,
}

/// Which kind of background data a descriptor carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskerKind {
    /// Mean only.
    Independent,
    /// Mean plus covariance.
    Correlated,
}

/// Background feature distribution: mean, optionally with covariance.
///
/// The covariance of a [`Correlated`](Background::Correlated) descriptor
/// need not be positive-definite. Degenerate structure (duplicated columns,
/// exact linear combinations, zero-variance columns) is expected input and
/// is absorbed downstream by the decorrelation transform.
#[derive(Debug, Clone)]
pub enum Background {
    /// Mean-only descriptor.
    Independent {
        /// Feature means, length = feature count.
        mean: Array1<f64>,
    },
    /// Mean + covariance descriptor.
    Correlated {
        /// Feature means, length = feature count.
        mean: Array1<f64>,
        /// Covariance matrix, `[n_features, n_features]`.
        covariance: Array2<f64>,
    },
}

impl Background {
    /// Mean-only descriptor from explicit parameters.
    pub fn independent(mean: Array1<f64>) -> Self {
        Self::Independent { mean }
    }

    /// Mean + covariance descriptor from explicit parameters.
    ///
    /// # Errors
    ///
    /// [`ExplainError::InvalidDistribution`] if the covariance is not a
    /// square matrix with side length equal to the mean length.
    pub fn correlated(mean: Array1<f64>, covariance: Array2<f64>) -> Result<Self, ExplainError> {
        let n = mean.len();
        if covariance.nrows() != n || covariance.ncols() != n {
            return Err(ExplainError::InvalidDistribution(format!(
                "covariance shape ({}, {}) does not match mean length {}",
                covariance.nrows(),
                covariance.ncols(),
                n
            )));
        }
        Ok(Self::Correlated { mean, covariance })
    }

    /// Estimate a descriptor empirically from raw sample rows.
    ///
    /// Computes the sample mean, and for [`DependenceMode::Correlated`] the
    /// unbiased sample covariance (`n - 1` denominator; zero matrix for a
    /// single row).
    ///
    /// # Errors
    ///
    /// [`ExplainError::InvalidDistribution`] if the data has zero rows.
    pub fn from_samples(data: SamplesView<'_>, mode: DependenceMode) -> Result<Self, ExplainError> {
        let n_samples = data.n_samples();
        if n_samples == 0 {
            return Err(ExplainError::InvalidDistribution(
                "background data must have at least one row".into(),
            ));
        }

        let view = data.view();
        let mean = view
            .mean_axis(Axis(0))
            .expect("non-empty batch has a mean");

        match mode {
            DependenceMode::Independent => Ok(Self::Independent { mean }),
            DependenceMode::Correlated => {
                let n_features = data.n_features();
                let covariance = if n_samples > 1 {
                    let centered = &view - &mean;
                    centered.t().dot(&centered) / (n_samples - 1) as f64
                } else {
                    Array2::zeros((n_features, n_features))
                };
                Ok(Self::Correlated { mean, covariance })
            }
        }
    }

    /// Number of features described.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.mean().len()
    }

    /// Feature mean vector.
    #[inline]
    pub fn mean(&self) -> ArrayView1<'_, f64> {
        match self {
            Self::Independent { mean } | Self::Correlated { mean, .. } => mean.view(),
        }
    }

    /// Covariance matrix, if this descriptor carries one.
    #[inline]
    pub fn covariance(&self) -> Option<ArrayView2<'_, f64>> {
        match self {
            Self::Independent { .. } => None,
            Self::Correlated { covariance, .. } => Some(covariance.view()),
        }
    }

    /// The kind of background data carried.
    #[inline]
    pub fn kind(&self) -> MaskerKind {
        match self {
            Self::Independent { .. } => MaskerKind::Independent,
            Self::Correlated { .. } => MaskerKind::Correlated,
        }
    }
}
