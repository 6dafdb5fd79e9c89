//! Sparse query batch storage.
//!
//! [`SparseRowMatrix`] is a CSR (compressed sparse row) matrix: per-row
//! column indices and values, with unspecified entries equal to zero.
//! Attribution over sparse batches runs as sparse-dense arithmetic; the
//! matrix is never densified internally.

use ndarray::Array2;

/// Sparse sample-major matrix in CSR layout.
///
/// Shape: `[n_rows, n_cols]`. Row `i` stores its non-zero entries at
/// `indices[indptr[i]..indptr[i + 1]]` / `values[indptr[i]..indptr[i + 1]]`.
///
/// # Example
///
/// ```
/// use linshap::SparseRowMatrix;
///
/// // [[0, 2, 0], [1, 0, 3]]
/// let m = SparseRowMatrix::new(vec![0, 1, 3], vec![1, 0, 2], vec![2.0, 1.0, 3.0], 3);
/// assert_eq!(m.n_rows(), 2);
/// assert_eq!(m.get(0, 1), 2.0);
/// assert_eq!(m.get(0, 0), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct SparseRowMatrix {
    /// Row boundaries: length `n_rows + 1`, non-decreasing, first 0, last = nnz.
    indptr: Vec<usize>,
    /// Column indices per row (must be sorted within a row, no duplicates).
    indices: Vec<u32>,
    /// Values at those indices.
    values: Vec<f64>,
    /// Number of columns.
    n_cols: usize,
}

impl SparseRowMatrix {
    /// Create a CSR matrix from its raw parts.
    ///
    /// # Panics
    ///
    /// Panics if the layout is structurally invalid: `indptr` empty or
    /// non-monotonic, `indices`/`values` length mismatch, last `indptr`
    /// entry not equal to `values.len()`, or a column index out of bounds.
    pub fn new(indptr: Vec<usize>, indices: Vec<u32>, values: Vec<f64>, n_cols: usize) -> Self {
        assert!(!indptr.is_empty(), "indptr must have at least one entry");
        assert_eq!(
            indices.len(),
            values.len(),
            "indices and values must have same length"
        );
        assert_eq!(
            *indptr.last().unwrap(),
            values.len(),
            "last indptr entry must equal nnz"
        );
        assert!(
            indptr.windows(2).all(|w| w[0] <= w[1]),
            "indptr must be non-decreasing"
        );
        assert!(
            indices.iter().all(|&c| (c as usize) < n_cols),
            "column index out of bounds"
        );
        Self {
            indptr,
            indices,
            values,
            n_cols,
        }
    }

    /// Build from `(row, col, value)` triplets.
    ///
    /// Triplets may be unordered; duplicates are summed.
    ///
    /// # Panics
    ///
    /// Panics if a row or column index is out of bounds.
    pub fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        triplets: &[(usize, usize, f64)],
    ) -> Self {
        let mut rows: Vec<Vec<(u32, f64)>> = vec![Vec::new(); n_rows];
        for &(r, c, v) in triplets {
            assert!(r < n_rows, "row index out of bounds");
            assert!(c < n_cols, "column index out of bounds");
            rows[r].push((c as u32, v));
        }

        let mut indptr = Vec::with_capacity(n_rows + 1);
        let mut indices = Vec::with_capacity(triplets.len());
        let mut values = Vec::with_capacity(triplets.len());
        indptr.push(0);
        for row in rows.iter_mut() {
            row.sort_by_key(|&(c, _)| c);
            for &(c, v) in row.iter() {
                if indices.len() > *indptr.last().unwrap() && *indices.last().unwrap() == c {
                    *values.last_mut().unwrap() += v;
                } else {
                    indices.push(c);
                    values.push(v);
                }
            }
            indptr.push(indices.len());
        }

        Self::new(indptr, indices, values, n_cols)
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.indptr.len() - 1
    }

    /// Number of columns.
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored (non-zero) entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Column indices and values of row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> (&[u32], &[f64]) {
        let start = self.indptr[i];
        let end = self.indptr[i + 1];
        (&self.indices[start..end], &self.values[start..end])
    }

    /// Get value at (row, col). Zero for unstored entries.
    ///
    /// Uses binary search within the row.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let (indices, values) = self.row(row);
        match indices.binary_search(&(col as u32)) {
            Ok(pos) => values[pos],
            Err(_) => 0.0,
        }
    }

    /// Expand to a dense `[n_rows, n_cols]` array.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.n_rows(), self.n_cols));
        for i in 0..self.n_rows() {
            let (indices, values) = self.row(i);
            for (&c, &v) in indices.iter().zip(values) {
                dense[[i, c as usize]] = v;
            }
        }
        dense
    }
}
