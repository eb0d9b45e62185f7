//! Tabular export of correspondence analysis results.
//!
//! Coordinates are written one row per actor or entity, with the first `k`
//! dimensions as columns named `0..k`. Output paths never overwrite an
//! existing file unless asked to: a numeric suffix is appended instead.
//!
//! ```text
//! <save_dir>/<dataset>_coords/<dataset>_row_coordinates.csv
//! <save_dir>/<dataset>_coords/<dataset>_column_coordinates.csv
//! <save_dir>/<dataset>_coords/<dataset>_inertia.csv
//! ```

use crate::decomposition::CaResult;
use crate::error::{FollownetError, Result};
use crate::primitives::Matrix;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Coordinates of one side of a CA result, ready to serialize.
///
/// # Examples
///
/// ```
/// use follownet::decomposition::{ContingencyTable, CorrespondenceAnalysis};
/// use follownet::relation::RelationSet;
/// use follownet::report::CoordinateTable;
///
/// let set = RelationSet::from_pairs(&[("A1", "E1"), ("A2", "E1"), ("A2", "E2"), ("A3", "E2")]);
/// let table = ContingencyTable::from_relations(&set).expect("non-empty input");
/// let ca = CorrespondenceAnalysis::new(4).fit(&table).expect("3x2 table");
///
/// let rows = CoordinateTable::rows(&ca, 4, "follower_id");
/// assert_eq!(rows.headers(), vec!["follower_id", "0"]);
///
/// let mut out = Vec::new();
/// rows.write_csv(&mut out).expect("in-memory write");
/// assert!(String::from_utf8_lossy(&out).starts_with("follower_id,0\nA1,"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateTable {
    id_column: String,
    ids: Vec<String>,
    label_column: Option<String>,
    labels: Vec<Option<String>>,
    values: Matrix<f64>,
}

impl CoordinateTable {
    /// First `dimensions` row (actor) coordinates.
    #[must_use]
    pub fn rows(result: &CaResult, dimensions: usize, id_column: impl Into<String>) -> Self {
        Self::new(
            id_column.into(),
            result.row_labels.clone(),
            leading(&result.row_coordinates, dimensions),
        )
    }

    /// First `dimensions` column (entity) coordinates.
    #[must_use]
    pub fn columns(result: &CaResult, dimensions: usize, id_column: impl Into<String>) -> Self {
        Self::new(
            id_column.into(),
            result.column_labels.clone(),
            leading(&result.column_coordinates, dimensions),
        )
    }

    fn new(id_column: String, ids: Vec<String>, values: Matrix<f64>) -> Self {
        Self {
            id_column,
            labels: vec![None; ids.len()],
            ids,
            label_column: None,
            values,
        }
    }

    /// Joins a label column by id; ids without a label get an empty cell.
    #[must_use]
    pub fn with_labels(
        mut self,
        column: impl Into<String>,
        labels: &BTreeMap<String, String>,
    ) -> Self {
        self.label_column = Some(column.into());
        self.labels = self.ids.iter().map(|id| labels.get(id).cloned()).collect();
        self
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in row order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Exported dimension count.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.values.n_cols()
    }

    /// Coordinate values (rows × dimensions).
    #[must_use]
    pub fn values(&self) -> &Matrix<f64> {
        &self.values
    }

    /// Joined label of a row, if any.
    #[must_use]
    pub fn label(&self, row: usize) -> Option<&str> {
        self.labels.get(row)?.as_deref()
    }

    /// Header row: id column, optional label column, then `0..k`.
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec![self.id_column.clone()];
        headers.extend(self.label_column.clone());
        headers.extend((0..self.dimensions()).map(|k| k.to_string()));
        headers
    }

    /// Writes the table as CSV.
    ///
    /// # Errors
    ///
    /// Returns [`FollownetError::Csv`] or [`FollownetError::Io`] on write
    /// failure.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(self.headers())?;
        for (i, id) in self.ids.iter().enumerate() {
            let mut record = vec![id.clone()];
            if self.label_column.is_some() {
                record.push(self.labels[i].clone().unwrap_or_default());
            }
            record.extend(self.values.row(i).iter().map(f64::to_string));
            out.write_record(&record)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Writes the table to a file, replacing it if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn write_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_csv(fs::File::create(path)?)
    }
}

/// Inertia explained by one dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InertiaRow {
    /// 1-based dimension number
    pub dimension: usize,
    /// Principal inertia σ²
    pub eigenvalue: f64,
    /// Share of total inertia, in percent
    pub percent: f64,
    /// Running share up to this dimension, in percent
    pub cumulative_percent: f64,
}

/// Per-dimension inertia of a CA result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InertiaTable {
    /// One row per retained dimension
    pub rows: Vec<InertiaRow>,
    /// Total inertia of the table
    pub total_inertia: f64,
}

impl InertiaTable {
    /// Collects inertia statistics from a fit.
    #[must_use]
    pub fn from_result(result: &CaResult) -> Self {
        let rows = result
            .eigenvalues
            .iter()
            .zip(&result.inertia_percent)
            .zip(result.cumulative_inertia_percent())
            .enumerate()
            .map(|(k, ((&eigenvalue, &percent), cumulative_percent))| InertiaRow {
                dimension: k + 1,
                eigenvalue,
                percent,
                cumulative_percent,
            })
            .collect();
        Self {
            rows,
            total_inertia: result.total_inertia,
        }
    }

    /// Writes one CSV row per dimension.
    ///
    /// # Errors
    ///
    /// Returns an error on write failure.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        for row in &self.rows {
            out.serialize(row)?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Where [`export`] wrote its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPaths {
    /// `<save_dir>/<dataset>_coords`
    pub directory: PathBuf,
    /// Row coordinate file
    pub rows: PathBuf,
    /// Column coordinate file
    pub columns: PathBuf,
    /// Inertia file
    pub inertia: PathBuf,
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Leading dimensions to write
    pub dimensions: usize,
    /// Replace existing files instead of suffixing
    pub overwrite: bool,
    /// Header of the actor id column
    pub actor_column: String,
    /// Header of the entity id column
    pub entity_column: String,
    /// Header of the joined entity label column; `None` skips the join
    pub label_column: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            dimensions: 4,
            overwrite: false,
            actor_column: "follower_id".to_string(),
            entity_column: "twitter_name".to_string(),
            label_column: Some("type2".to_string()),
        }
    }
}

/// Returns `path` if nothing exists there, else the first free
/// `stem_1.ext`, `stem_2.ext`, ... next to it.
#[must_use]
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    (1..)
        .map(|i| {
            let name = match &extension {
                Some(ext) => format!("{stem}_{i}.{ext}"),
                None => format!("{stem}_{i}"),
            };
            path.with_file_name(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Writes row coordinates, column coordinates (joined with `labels`) and
/// inertia for a named dataset under `save_dir`.
///
/// All three files are first written to hidden `.<name>.partial` files in
/// the target directory and renamed into place once every write succeeded.
///
/// # Errors
///
/// [`FollownetError::Validation`] for an empty dataset name or one that
/// contains a path separator; I/O and CSV errors from writing. A failed
/// write removes the staged files and leaves existing outputs untouched.
/// A failed rename can still leave the earlier files of the set in place.
pub fn export(
    result: &CaResult,
    labels: &BTreeMap<String, String>,
    save_dir: &Path,
    dataset: &str,
    options: &ExportOptions,
) -> Result<ExportPaths> {
    if dataset.is_empty() || dataset.contains(['/', '\\']) {
        return Err(FollownetError::validation(format!(
            "invalid dataset name '{dataset}'"
        )));
    }

    let directory = save_dir.join(format!("{dataset}_coords"));
    fs::create_dir_all(&directory)?;

    let target = |suffix: &str| {
        let path = directory.join(format!("{dataset}_{suffix}.csv"));
        if options.overwrite {
            path
        } else {
            unique_path(&path)
        }
    };
    let paths = ExportPaths {
        rows: target("row_coordinates"),
        columns: target("column_coordinates"),
        inertia: target("inertia"),
        directory: directory.clone(),
    };

    let targets = [&paths.rows, &paths.columns, &paths.inertia];
    let staged = targets.map(|path| staging_path(path));
    if let Err(err) = write_tables(result, labels, options, &staged) {
        for path in &staged {
            let _ = fs::remove_file(path);
        }
        tracing::warn!(directory = %paths.directory.display(), error = %err, "export aborted");
        return Err(err);
    }
    for (from, to) in staged.iter().zip(targets) {
        fs::rename(from, to)?;
    }

    tracing::info!(directory = %paths.directory.display(), "coordinates exported");
    Ok(paths)
}

/// Hidden sibling of `path` used while its contents are being written.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.partial"))
}

/// Writes rows, columns and inertia to `[rows, columns, inertia]`.
fn write_tables(
    result: &CaResult,
    labels: &BTreeMap<String, String>,
    options: &ExportOptions,
    [rows, columns, inertia]: &[PathBuf; 3],
) -> Result<()> {
    CoordinateTable::rows(result, options.dimensions, options.actor_column.as_str())
        .write_path(rows)?;

    let table = CoordinateTable::columns(result, options.dimensions, options.entity_column.as_str());
    let table = match &options.label_column {
        Some(column) => table.with_labels(column.as_str(), labels),
        None => table,
    };
    table.write_path(columns)?;

    InertiaTable::from_result(result).write_csv(fs::File::create(inertia)?)
}

fn leading(values: &Matrix<f64>, dimensions: usize) -> Matrix<f64> {
    let rows: Vec<usize> = (0..values.n_rows()).collect();
    let cols: Vec<usize> = (0..dimensions.min(values.n_cols())).collect();
    values.select(&rows, &cols)
}

#[cfg(test)]
mod tests;
