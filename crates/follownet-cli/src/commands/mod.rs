//! Subcommand implementations and shared input handling

pub(crate) mod ca;
pub(crate) mod communities;
pub(crate) mod config;
pub(crate) mod run;
pub(crate) mod stats;

use crate::error::{CliError, Result};
use clap::Args;
use follownet::config::PipelineConfig;
use follownet::pipeline::Pipeline;
use std::path::{Path, PathBuf};

/// Relation file and column mapping shared by every analysis command
#[derive(Args, Debug, Clone)]
pub(crate) struct InputArgs {
    /// Relation file (delimited text with a header row)
    #[arg(value_name = "FILE")]
    pub(crate) file: PathBuf,

    /// Column holding actor (follower) ids
    #[arg(long)]
    pub(crate) actor_column: Option<String>,

    /// Column holding entity ids
    #[arg(long)]
    pub(crate) entity_column: Option<String>,

    /// Column holding entity labels
    #[arg(long, conflicts_with = "no_labels")]
    pub(crate) label_column: Option<String>,

    /// Ignore entity labels
    #[arg(long)]
    pub(crate) no_labels: bool,

    /// Field delimiter
    #[arg(long)]
    pub(crate) delimiter: Option<char>,

    /// Dataset name used in reports and output paths (default: file stem)
    #[arg(long)]
    pub(crate) dataset: Option<String>,
}

impl InputArgs {
    /// Applies column overrides on top of a base configuration
    pub(crate) fn apply(&self, config: &mut PipelineConfig) {
        if let Some(column) = &self.actor_column {
            config.actor_column.clone_from(column);
        }
        if let Some(column) = &self.entity_column {
            config.entity_column.clone_from(column);
        }
        if self.no_labels {
            config.label_column = None;
        } else if let Some(column) = &self.label_column {
            config.label_column = Some(column.clone());
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
    }

    /// Dataset name: explicit, else the file stem
    pub(crate) fn dataset_name(&self) -> String {
        self.dataset
            .clone()
            .unwrap_or_else(|| file_stem(&self.file))
    }

    /// Reads the relation file and wraps it in a pipeline
    pub(crate) fn open(&self, mut config: PipelineConfig) -> Result<Pipeline> {
        self.apply(&mut config);
        config.validate()?;
        if !self.file.is_file() {
            return Err(CliError::FileNotFound(self.file.clone()));
        }
        let relations = config.relation_reader().read_path(&self.file)?;
        Ok(Pipeline::new(self.dataset_name(), relations, config)?)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "dataset".to_string())
}
