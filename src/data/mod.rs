//! Query batch abstractions.
//!
//! Attribution accepts query batches in two representations:
//!
//! - [`SamplesView`]: dense sample-major view `[n_samples, n_features]`
//! - [`SparseRowMatrix`]: CSR sparse matrix with the same logical shape
//!
//! Both carry `f64` values. Dense batches are zero-copy views over caller
//! data; sparse batches own their index/value buffers.

mod sparse;
mod views;

pub use sparse::SparseRowMatrix;
pub use views::SamplesView;
