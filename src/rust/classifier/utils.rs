use std::collections::BTreeMap;

use ndarray::{ArrayView1, ArrayViewMut1};
use serde::{Deserialize, Serialize};

/// A sparse row of a feature matrix with strictly increasing column indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of stored (non-zero) entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn squared_norm(&self) -> f64 {
        self.values.iter().map(|&x| x * x).sum()
    }

    /// Dot product with a dense vector of the full column dimension.
    pub fn dot(&self, dense: ArrayView1<f64>) -> f64 {
        self.iter().map(|(i, x)| x * dense[i]).sum()
    }

    /// `dense += scale * self`
    pub(crate) fn scaled_add_to(&self, scale: f64, mut dense: ArrayViewMut1<f64>) {
        for (i, x) in self.iter() {
            dense[i] += scale * x;
        }
    }

    /// Scales the row to unit L2 norm; an all-zero row stays zero.
    pub(crate) fn normalize(&mut self) {
        let norm = self.squared_norm().sqrt();
        if norm > 1e-10 {
            for x in &mut self.values {
                *x /= norm;
            }
        }
    }

    /// Dense copy of the row, mostly useful for inspection and tests.
    pub fn to_dense(&self, dim: usize) -> Vec<f64> {
        let mut dense = vec![0.0; dim];
        for (i, x) in self.iter() {
            dense[i] = x;
        }
        dense
    }
}

impl From<BTreeMap<usize, f64>> for SparseVector {
    fn from(entries: BTreeMap<usize, f64>) -> Self {
        let (indices, values) = entries.into_iter().filter(|&(_, x)| x != 0.0).unzip();
        Self { indices, values }
    }
}

/// Rows of sparse feature vectors sharing one column space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    rows: Vec<SparseVector>,
    n_features: usize,
}

impl FeatureMatrix {
    pub fn new(rows: Vec<SparseVector>, n_features: usize) -> Self {
        debug_assert!(rows
            .iter()
            .all(|row| row.indices().iter().all(|&i| i < n_features)));
        Self { rows, n_features }
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
