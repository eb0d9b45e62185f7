//! Correspondence analysis of a contingency table.
//!
//! With P = N/n, row masses r and column masses c, the standardized
//! residuals are
//!
//! ```text
//! S_ij = (P_ij - r_i c_j) / sqrt(r_i c_j)
//! ```
//!
//! and S = U Σ Vᵀ. Principal coordinates put rows and columns in the same
//! factor space:
//!
//! ```text
//! F = D_r^{-1/2} U Σ        G = D_c^{-1/2} V Σ
//! ```
//!
//! The trivial dimension is already removed by centering, so at most
//! min(rows, cols) - 1 dimensions carry inertia. Axis signs are arbitrary
//! in any SVD; each axis is oriented so that its largest-magnitude column
//! coordinate is positive (lowest column index on ties).

use super::ContingencyTable;
use crate::error::{Axis, FollownetError, NumericWarning, Result};
use crate::primitives::Matrix;
use nalgebra::{DMatrix, SymmetricEigen};
use serde::{Deserialize, Serialize};

/// Relative tie window when picking the axis-orienting column.
const SIGN_TIE: f64 = 1e-12;

/// How the singular triplets of S are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SvdMethod {
    /// Full thin SVD of S (Golub–Kahan bidiagonalization).
    #[default]
    Full,
    /// Symmetric eigendecomposition of the smaller Gram matrix (SᵀS or SSᵀ).
    /// Cheaper for very tall or very wide tables; singular values below
    /// about 1e-7 are not resolved.
    Gram,
}

impl SvdMethod {
    /// Singular values at or below this are treated as zero. CA singular
    /// values never exceed 1, so the threshold is absolute.
    #[must_use]
    pub fn rank_tolerance(self) -> f64 {
        match self {
            SvdMethod::Full => 1e-12,
            SvdMethod::Gram => 1e-7,
        }
    }
}

/// Correspondence analysis configuration.
///
/// # Examples
///
/// ```
/// use follownet::decomposition::{ContingencyTable, CorrespondenceAnalysis};
/// use follownet::relation::RelationSet;
///
/// let set = RelationSet::from_pairs(&[("A1", "E1"), ("A2", "E1"), ("A2", "E2"), ("A3", "E2")]);
/// let table = ContingencyTable::from_relations(&set).expect("non-empty input");
/// let ca = CorrespondenceAnalysis::new(100).fit(&table).expect("2x2 or larger");
///
/// assert_eq!(ca.n_dimensions(), 1);
/// assert!((ca.inertia_percent[0] - 100.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrespondenceAnalysis {
    n_components: usize,
    method: SvdMethod,
}

impl Default for CorrespondenceAnalysis {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Output of [`CorrespondenceAnalysis::fit`].
///
/// Rows and columns with zero margin are not part of the result; their
/// labels are listed in `dropped_rows` / `dropped_columns`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaResult {
    /// Actor ids of the retained rows
    pub row_labels: Vec<String>,
    /// Entity ids of the retained columns
    pub column_labels: Vec<String>,
    /// Row masses r_i = row sum / n
    pub row_masses: Vec<f64>,
    /// Column masses c_j = column sum / n
    pub column_masses: Vec<f64>,
    /// Retained singular values, descending
    pub singular_values: Vec<f64>,
    /// Principal inertias σ_k²
    pub eigenvalues: Vec<f64>,
    /// Σ S_ij² (= χ² / n)
    pub total_inertia: f64,
    /// σ_k² / total inertia × 100 per dimension
    pub inertia_percent: Vec<f64>,
    /// Row principal coordinates (rows × dimensions)
    pub row_coordinates: Matrix<f64>,
    /// Column principal coordinates (columns × dimensions)
    pub column_coordinates: Matrix<f64>,
    /// Actors excluded for a zero margin
    pub dropped_rows: Vec<String>,
    /// Entities excluded for a zero margin
    pub dropped_columns: Vec<String>,
    /// Non-fatal conditions met during the fit
    pub warnings: Vec<NumericWarning>,
    #[serde(skip)]
    residuals: Matrix<f64>,
    #[serde(skip)]
    left_vectors: Matrix<f64>,
    #[serde(skip)]
    right_vectors: Matrix<f64>,
}

struct Triplet {
    sigma: f64,
    u: Vec<f64>,
    v: Vec<f64>,
}

impl CorrespondenceAnalysis {
    /// Retains at most `n_components` dimensions.
    #[must_use]
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            method: SvdMethod::Full,
        }
    }

    /// Selects the decomposition backend.
    #[must_use]
    pub fn with_method(mut self, method: SvdMethod) -> Self {
        self.method = method;
        self
    }

    /// Requested dimension count.
    #[must_use]
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// Decomposition backend.
    #[must_use]
    pub fn method(&self) -> SvdMethod {
        self.method
    }

    /// Fits the table.
    ///
    /// # Errors
    ///
    /// - [`FollownetError::Validation`] if `n_components` is 0
    /// - [`FollownetError::EmptyInput`] if fewer than 2 rows or 2 columns
    ///   have a positive margin
    /// - [`FollownetError::Numerical`] if the decomposition fails
    pub fn fit(&self, table: &ContingencyTable) -> Result<CaResult> {
        if self.n_components == 0 {
            return Err(FollownetError::validation("n_components must be at least 1"));
        }

        let (row_idx, col_idx) = table.nonzero_margins();
        let dropped_rows = excluded(table.row_labels(), &row_idx);
        let dropped_columns = excluded(table.column_labels(), &col_idx);

        let mut warnings = Vec::new();
        if !dropped_rows.is_empty() {
            warnings.push(NumericWarning::ZeroMarginDropped {
                axis: Axis::Rows,
                labels: dropped_rows.clone(),
            });
        }
        if !dropped_columns.is_empty() {
            warnings.push(NumericWarning::ZeroMarginDropped {
                axis: Axis::Columns,
                labels: dropped_columns.clone(),
            });
        }

        let (rows, cols) = (row_idx.len(), col_idx.len());
        if rows < 2 || cols < 2 {
            return Err(FollownetError::empty(format!(
                "correspondence analysis needs at least 2 non-empty rows and columns, got {rows}x{cols}"
            )));
        }

        let counts = table.counts().select(&row_idx, &col_idx);
        let n = counts.sum();
        let row_masses: Vec<f64> = counts.row_sums().iter().map(|s| s / n).collect();
        let column_masses: Vec<f64> = counts.col_sums().iter().map(|s| s / n).collect();

        let mut residuals = Matrix::zeros(rows, cols);
        for (i, r) in row_masses.iter().enumerate() {
            for (j, c) in column_masses.iter().enumerate() {
                let expected = r * c;
                residuals.set(i, j, (counts.get(i, j) / n - expected) / expected.sqrt());
            }
        }
        let total_inertia: f64 = residuals.as_slice().iter().map(|s| s * s).sum();

        tracing::debug!(rows, cols, method = ?self.method, "decomposing standardized residuals");

        let dm = residuals.to_dmatrix();
        let triplets = match self.method {
            SvdMethod::Full => full_svd(dm)?,
            SvdMethod::Gram => gram_svd(&dm)?,
        };

        let requested = self.n_components.min(rows.min(cols) - 1);
        let tolerance = self.method.rank_tolerance();
        let mut kept: Vec<Triplet> = triplets
            .into_iter()
            .take(requested)
            .take_while(|t| t.sigma > tolerance)
            .collect();
        if kept.len() < requested {
            warnings.push(NumericWarning::RankDeficient {
                requested,
                retained: kept.len(),
            });
        }
        for triplet in &mut kept {
            orient(triplet);
        }

        let dims = kept.len();
        let mut row_coordinates = Matrix::zeros(rows, dims);
        let mut column_coordinates = Matrix::zeros(cols, dims);
        let mut left_vectors = Matrix::zeros(rows, dims);
        let mut right_vectors = Matrix::zeros(cols, dims);
        for (k, t) in kept.iter().enumerate() {
            for (i, r) in row_masses.iter().enumerate() {
                left_vectors.set(i, k, t.u[i]);
                row_coordinates.set(i, k, t.u[i] * t.sigma / r.sqrt());
            }
            for (j, c) in column_masses.iter().enumerate() {
                right_vectors.set(j, k, t.v[j]);
                column_coordinates.set(j, k, t.v[j] * t.sigma / c.sqrt());
            }
        }

        let singular_values: Vec<f64> = kept.iter().map(|t| t.sigma).collect();
        let eigenvalues: Vec<f64> = singular_values.iter().map(|s| s * s).collect();
        let inertia_percent = eigenvalues
            .iter()
            .map(|e| {
                if total_inertia > 0.0 {
                    e / total_inertia * 100.0
                } else {
                    0.0
                }
            })
            .collect();

        for warning in &warnings {
            tracing::warn!(count = warning.count(), "correspondence analysis: {warning}");
        }
        tracing::info!(dimensions = dims, total_inertia, "correspondence analysis fitted");

        Ok(CaResult {
            row_labels: row_idx.iter().map(|&i| table.row_labels()[i].clone()).collect(),
            column_labels: col_idx
                .iter()
                .map(|&j| table.column_labels()[j].clone())
                .collect(),
            row_masses,
            column_masses,
            singular_values,
            eigenvalues,
            total_inertia,
            inertia_percent,
            row_coordinates,
            column_coordinates,
            dropped_rows,
            dropped_columns,
            warnings,
            residuals,
            left_vectors,
            right_vectors,
        })
    }
}

impl CaResult {
    /// Number of retained dimensions.
    #[must_use]
    pub fn n_dimensions(&self) -> usize {
        self.singular_values.len()
    }

    /// Running sum of `inertia_percent`.
    #[must_use]
    pub fn cumulative_inertia_percent(&self) -> Vec<f64> {
        self.inertia_percent
            .iter()
            .scan(0.0, |acc, p| {
                *acc += p;
                Some(*acc)
            })
            .collect()
    }

    /// Standardized residual matrix S over the retained rows and columns.
    #[must_use]
    pub fn standardized_residuals(&self) -> &Matrix<f64> {
        &self.residuals
    }

    /// Rank-`k` reconstruction Σ_{l<k} σ_l u_l v_lᵀ of S. `k` is capped at
    /// the retained dimension count.
    #[must_use]
    pub fn residual_approximation(&self, k: usize) -> Matrix<f64> {
        let (rows, cols) = self.residuals.shape();
        let mut approx = Matrix::zeros(rows, cols);
        for (l, sigma) in self.singular_values.iter().enumerate().take(k) {
            for i in 0..rows {
                let u = self.left_vectors.get(i, l) * sigma;
                for j in 0..cols {
                    approx.set(i, j, approx.get(i, j) + u * self.right_vectors.get(j, l));
                }
            }
        }
        approx
    }

    /// Principal coordinates of an actor.
    #[must_use]
    pub fn row_coordinates_of(&self, actor: &str) -> Option<&[f64]> {
        let i = self.row_labels.iter().position(|r| r == actor)?;
        Some(self.row_coordinates.row(i))
    }

    /// Principal coordinates of an entity.
    #[must_use]
    pub fn column_coordinates_of(&self, entity: &str) -> Option<&[f64]> {
        let j = self.column_labels.iter().position(|c| c == entity)?;
        Some(self.column_coordinates.row(j))
    }

    /// Rows plus columns excluded for a zero margin.
    #[must_use]
    pub fn dropped_count(&self) -> usize {
        self.dropped_rows.len() + self.dropped_columns.len()
    }
}

fn excluded(labels: &[String], kept: &[usize]) -> Vec<String> {
    let mut keep = vec![false; labels.len()];
    for &i in kept {
        keep[i] = true;
    }
    labels
        .iter()
        .zip(keep)
        .filter(|(_, k)| !k)
        .map(|(l, _)| l.clone())
        .collect()
}

fn full_svd(s: DMatrix<f64>) -> Result<Vec<Triplet>> {
    let svd = s
        .try_svd(true, true, f64::EPSILON, 0)
        .ok_or_else(|| FollownetError::numerical("SVD did not converge"))?;
    let u = svd
        .u
        .ok_or_else(|| FollownetError::numerical("SVD returned no left vectors"))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| FollownetError::numerical("SVD returned no right vectors"))?;

    let triplets = svd
        .singular_values
        .iter()
        .enumerate()
        .map(|(k, &sigma)| Triplet {
            sigma,
            u: u.column(k).iter().copied().collect(),
            v: v_t.row(k).iter().copied().collect(),
        })
        .collect();
    Ok(sorted(triplets))
}

fn gram_svd(s: &DMatrix<f64>) -> Result<Vec<Triplet>> {
    let (rows, cols) = s.shape();
    let by_columns = cols <= rows;
    let gram = if by_columns {
        s.transpose() * s
    } else {
        s * s.transpose()
    };
    let eigen = SymmetricEigen::try_new(gram, f64::EPSILON, 0)
        .ok_or_else(|| FollownetError::numerical("eigendecomposition did not converge"))?;

    let mut triplets = Vec::with_capacity(eigen.eigenvalues.len());
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        let sigma = lambda.max(0.0).sqrt();
        if sigma <= 0.0 {
            continue;
        }
        let basis = eigen.eigenvectors.column(k).into_owned();
        let (u, v) = if by_columns {
            ((s * &basis) / sigma, basis)
        } else {
            let v = (s.transpose() * &basis) / sigma;
            (basis, v)
        };
        triplets.push(Triplet {
            sigma,
            u: u.iter().copied().collect(),
            v: v.iter().copied().collect(),
        });
    }
    Ok(sorted(triplets))
}

fn sorted(mut triplets: Vec<Triplet>) -> Vec<Triplet> {
    triplets.sort_by(|a, b| b.sigma.total_cmp(&a.sigma));
    triplets
}

/// Flips the axis so its largest-magnitude column entry is positive.
fn orient(triplet: &mut Triplet) {
    let max = triplet.v.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    let pivot = triplet
        .v
        .iter()
        .copied()
        .find(|x| x.abs() >= max * (1.0 - SIGN_TIE));
    if pivot.is_some_and(|x| x < 0.0) {
        for x in triplet.u.iter_mut().chain(triplet.v.iter_mut()) {
            *x = -*x;
        }
    }
}

#[cfg(test)]
#[path = "correspondence_tests.rs"]
mod tests;
