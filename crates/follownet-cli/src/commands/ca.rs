//! Correspondence analysis and coordinate export

use super::InputArgs;
use crate::error::Result;
use crate::output;
use clap::ValueEnum;
use follownet::config::PipelineConfig;
use follownet::decomposition::SvdMethod;
use follownet::error::NumericWarning;
use follownet::report::{ExportPaths, InertiaRow, InertiaTable};
use serde::Serialize;
use std::path::PathBuf;

/// SVD backend selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy)]
pub(crate) enum MethodArg {
    /// Full thin SVD
    Full,
    /// Eigendecomposition of the Gram matrix
    Gram,
}

impl From<MethodArg> for SvdMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Full => SvdMethod::Full,
            MethodArg::Gram => SvdMethod::Gram,
        }
    }
}

/// CA-specific overrides
#[derive(Debug, Clone, Default)]
pub(crate) struct CaOptions {
    pub(crate) components: Option<usize>,
    pub(crate) dimensions: Option<usize>,
    pub(crate) method: Option<MethodArg>,
    pub(crate) save_dir: Option<PathBuf>,
    pub(crate) overwrite: bool,
    pub(crate) no_export: bool,
}

impl CaOptions {
    pub(crate) fn apply(&self, config: &mut PipelineConfig) {
        if let Some(components) = self.components {
            config.n_components = components;
        }
        if let Some(dimensions) = self.dimensions {
            config.export_dimensions = dimensions;
        }
        if let Some(method) = self.method {
            config.svd_method = method.into();
        }
        if let Some(dir) = &self.save_dir {
            config.save_dir.clone_from(dir);
        }
        if self.overwrite {
            config.overwrite = true;
        }
    }
}

#[derive(Serialize)]
struct CaOutput<'a> {
    dataset: &'a str,
    rows: usize,
    columns: usize,
    dimensions: usize,
    total_inertia: f64,
    inertia: &'a [InertiaRow],
    dropped_rows: &'a [String],
    dropped_columns: &'a [String],
    warnings: &'a [NumericWarning],
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<ExportPaths>,
}

pub(crate) fn run(
    input: &InputArgs,
    mut config: PipelineConfig,
    options: &CaOptions,
    json: bool,
) -> Result<()> {
    options.apply(&mut config);
    let mut pipeline = input.open(config)?;
    pipeline.contingency_table()?;
    pipeline.correspondence()?;

    let files = if options.no_export {
        None
    } else {
        Some(pipeline.export()?)
    };

    let result = pipeline.ca_result()?;
    let inertia = InertiaTable::from_result(result);
    let out = CaOutput {
        dataset: pipeline.dataset(),
        rows: result.row_labels.len(),
        columns: result.column_labels.len(),
        dimensions: result.n_dimensions(),
        total_inertia: result.total_inertia,
        inertia: &inertia.rows,
        dropped_rows: &result.dropped_rows,
        dropped_columns: &result.dropped_columns,
        warnings: &result.warnings,
        files,
    };

    if json {
        return output::json(&out);
    }

    output::section(&format!("Correspondence analysis: {}", out.dataset));
    output::kv("Table", format!("{} x {}", out.rows, out.columns));
    output::kv("Dimensions", out.dimensions);
    output::kv("Total inertia", output::float(out.total_inertia));
    let shown = pipeline.config().export_dimensions;
    output::kv(
        "Inertia",
        output::percents(&result.inertia_percent[..shown.min(out.dimensions)]),
    );
    for warning in out.warnings {
        output::warning(&warning.to_string());
    }
    if let Some(files) = &out.files {
        output::section("Files");
        output::kv("Rows", files.rows.display());
        output::kv("Columns", files.columns.display());
        output::kv("Inertia", files.inertia.display());
    }
    Ok(())
}
