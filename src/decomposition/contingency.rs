//! Actor × entity contingency (incidence) table.

use crate::error::{FollownetError, Result};
use crate::graph::BipartiteGraph;
use crate::primitives::Matrix;
use crate::relation::RelationSet;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Count table with actors as rows and entities as columns.
///
/// Built like a crosstab: rows and columns are sorted by id, and repeated
/// relation rows add up. Catalog entities without relations appear as
/// all-zero columns.
///
/// # Examples
///
/// ```
/// use follownet::decomposition::ContingencyTable;
/// use follownet::relation::RelationSet;
///
/// let set = RelationSet::from_pairs(&[("A1", "E1"), ("A2", "E1"), ("A2", "E2")]);
/// let table = ContingencyTable::from_relations(&set).expect("non-empty input");
/// assert_eq!(table.shape(), (2, 2));
/// assert_eq!(table.count("A2", "E1"), Some(1.0));
/// assert_eq!(table.grand_total(), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    row_labels: Vec<String>,
    column_labels: Vec<String>,
    row_index: HashMap<String, usize>,
    column_index: HashMap<String, usize>,
    counts: Matrix<f64>,
}

/// Label → position, first occurrence wins.
fn index_of(labels: &[String]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        index.entry(label.clone()).or_insert(i);
    }
    index
}

impl ContingencyTable {
    /// Wraps an existing count matrix.
    ///
    /// # Errors
    ///
    /// [`FollownetError::DimensionMismatch`] if the label counts do not
    /// match the matrix shape, [`FollownetError::Validation`] for negative
    /// or non-finite counts.
    pub fn new(
        row_labels: Vec<String>,
        column_labels: Vec<String>,
        counts: Matrix<f64>,
    ) -> Result<Self> {
        if counts.shape() != (row_labels.len(), column_labels.len()) {
            return Err(FollownetError::DimensionMismatch {
                expected: format!("{}x{}", row_labels.len(), column_labels.len()),
                actual: format!("{}x{}", counts.n_rows(), counts.n_cols()),
            });
        }
        if let Some(bad) = counts.as_slice().iter().find(|v| !(v.is_finite() && **v >= 0.0)) {
            return Err(FollownetError::validation(format!(
                "contingency counts must be finite and non-negative, found {bad}"
            )));
        }
        Ok(Self::assemble(row_labels, column_labels, counts))
    }

    fn assemble(row_labels: Vec<String>, column_labels: Vec<String>, counts: Matrix<f64>) -> Self {
        Self {
            row_index: index_of(&row_labels),
            column_index: index_of(&column_labels),
            row_labels,
            column_labels,
            counts,
        }
    }

    /// Cross-tabulates relation rows, counting repeats.
    ///
    /// # Errors
    ///
    /// [`FollownetError::EmptyInput`] when there are neither relations nor
    /// catalog entities, [`FollownetError::Validation`] for empty ids.
    pub fn from_relations(relations: &RelationSet) -> Result<Self> {
        if relations.is_empty() && relations.catalog().is_empty() {
            return Err(FollownetError::empty("no relations to tabulate"));
        }

        let mut cells: BTreeMap<(&str, &str), f64> = BTreeMap::new();
        let mut actors = BTreeSet::new();
        let mut entities = BTreeSet::new();
        for (row, record) in relations.records().iter().enumerate() {
            if record.actor.is_empty() || record.entity.is_empty() {
                return Err(FollownetError::validation(format!(
                    "relation {row} has an empty actor or entity id"
                )));
            }
            actors.insert(record.actor.as_str());
            entities.insert(record.entity.as_str());
            *cells
                .entry((record.actor.as_str(), record.entity.as_str()))
                .or_insert(0.0) += 1.0;
        }
        for (entity, _) in relations.catalog() {
            if entity.is_empty() {
                return Err(FollownetError::validation("catalog entity with empty id"));
            }
            entities.insert(entity.as_str());
        }

        let row_labels: Vec<String> = actors.iter().map(|s| (*s).to_string()).collect();
        let column_labels: Vec<String> = entities.iter().map(|s| (*s).to_string()).collect();
        let row_index: BTreeMap<&str, usize> =
            actors.iter().enumerate().map(|(i, a)| (*a, i)).collect();
        let col_index: BTreeMap<&str, usize> =
            entities.iter().enumerate().map(|(j, e)| (*e, j)).collect();

        let mut counts = Matrix::zeros(row_labels.len(), column_labels.len());
        for ((actor, entity), count) in cells {
            counts.set(row_index[actor], col_index[entity], count);
        }

        tracing::debug!(
            rows = row_labels.len(),
            columns = column_labels.len(),
            total = counts.sum(),
            "contingency table built"
        );

        Ok(Self::assemble(row_labels, column_labels, counts))
    }

    /// 0/1 incidence table of a bipartite graph, in graph node order.
    #[must_use]
    pub fn from_bipartite(graph: &BipartiteGraph) -> Self {
        let n_actors = graph.num_actors();
        let mut counts = Matrix::zeros(n_actors, graph.num_entities());
        for actor in 0..n_actors {
            for &node in graph.graph().neighbors(actor) {
                counts.set(actor, node - n_actors, 1.0);
            }
        }
        Self::assemble(graph.actors().to_vec(), graph.entities().to_vec(), counts)
    }

    /// Actor ids, one per row.
    #[must_use]
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Entity ids, one per column.
    #[must_use]
    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    /// Raw counts.
    #[must_use]
    pub fn counts(&self) -> &Matrix<f64> {
        &self.counts
    }

    /// (rows, columns)
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.counts.shape()
    }

    /// Count for an (actor, entity) cell; `None` if either id is unknown.
    #[must_use]
    pub fn count(&self, actor: &str, entity: &str) -> Option<f64> {
        let i = *self.row_index.get(actor)?;
        let j = *self.column_index.get(entity)?;
        Some(self.counts.get(i, j))
    }

    /// Grand total n.
    #[must_use]
    pub fn grand_total(&self) -> f64 {
        self.counts.sum()
    }

    /// Row sums r.
    #[must_use]
    pub fn row_sums(&self) -> Vec<f64> {
        self.counts.row_sums()
    }

    /// Column sums c.
    #[must_use]
    pub fn column_sums(&self) -> Vec<f64> {
        self.counts.col_sums()
    }

    /// Rows divided by their sums. Zero-sum rows stay zero.
    #[must_use]
    pub fn row_profiles(&self) -> Matrix<f64> {
        let sums = self.row_sums();
        let mut profiles = self.counts.clone();
        for (i, &sum) in sums.iter().enumerate() {
            if sum > 0.0 {
                for j in 0..profiles.n_cols() {
                    profiles.set(i, j, profiles.get(i, j) / sum);
                }
            }
        }
        profiles
    }

    /// Columns divided by their sums. Zero-sum columns stay zero.
    #[must_use]
    pub fn column_profiles(&self) -> Matrix<f64> {
        let sums = self.column_sums();
        let mut profiles = self.counts.clone();
        for i in 0..profiles.n_rows() {
            for (j, &sum) in sums.iter().enumerate() {
                if sum > 0.0 {
                    profiles.set(i, j, profiles.get(i, j) / sum);
                }
            }
        }
        profiles
    }

    /// Counts expected under independence, E_ij = r_i c_j / n.
    #[must_use]
    pub fn expected(&self) -> Matrix<f64> {
        let (rows, cols) = self.shape();
        let total = self.grand_total();
        let mut expected = Matrix::zeros(rows, cols);
        if total <= 0.0 {
            return expected;
        }
        let r = self.row_sums();
        let c = self.column_sums();
        for (i, ri) in r.iter().enumerate() {
            for (j, cj) in c.iter().enumerate() {
                expected.set(i, j, ri * cj / total);
            }
        }
        expected
    }

    /// Indices of rows and columns with a positive margin.
    pub(crate) fn nonzero_margins(&self) -> (Vec<usize>, Vec<usize>) {
        let rows = positive(&self.row_sums());
        let cols = positive(&self.column_sums());
        (rows, cols)
    }
}

fn positive(sums: &[f64]) -> Vec<usize> {
    sums.iter()
        .enumerate()
        .filter(|&(_, &s)| s > 0.0)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
#[path = "contingency_tests.rs"]
mod tests;
