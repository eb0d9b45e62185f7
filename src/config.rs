//! Run configuration.
//!
//! Loaded from TOML; every field is optional and falls back to its default.
//!
//! ```toml
//! actor_column = "follower_id"
//! entity_column = "twitter_name"
//! label_column = "type2"
//! delimiter = ","
//! n_components = 100
//! export_dimensions = 4
//! seed = 42
//! resolution = 1.0
//! svd_method = "full"
//! top_k = 5
//! save_dir = "results"
//! overwrite = false
//! ```

use crate::decomposition::{CorrespondenceAnalysis, SvdMethod};
use crate::error::{FollownetError, Result};
use crate::graph::Louvain;
use crate::relation::RelationReader;
use crate::report::ExportOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Input column holding actor ids
    pub actor_column: String,
    /// Input column holding entity ids
    pub entity_column: String,
    /// Input column holding entity labels; `None` disables the label join
    pub label_column: Option<String>,
    /// Input field delimiter
    pub delimiter: char,
    /// Maximum CA dimensions to compute
    pub n_components: usize,
    /// Leading CA dimensions written on export
    pub export_dimensions: usize,
    /// Seed of the Louvain visit order
    pub seed: u64,
    /// Louvain resolution γ
    pub resolution: f64,
    /// SVD backend for CA
    pub svd_method: SvdMethod,
    /// Entities listed by in-degree centrality
    pub top_k: usize,
    /// Parent directory of `<dataset>_coords`
    pub save_dir: PathBuf,
    /// Replace earlier exports instead of suffixing
    pub overwrite: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            actor_column: "follower_id".to_string(),
            entity_column: "twitter_name".to_string(),
            label_column: Some("type2".to_string()),
            delimiter: ',',
            n_components: 100,
            export_dimensions: 4,
            seed: 42,
            resolution: 1.0,
            svd_method: SvdMethod::Full,
            top_k: 5,
            save_dir: PathBuf::from("results"),
            overwrite: false,
        }
    }
}

impl PipelineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`FollownetError::Config`] for malformed TOML, unknown keys or
    /// invalid values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| FollownetError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// I/O errors, plus everything [`PipelineConfig::from_toml_str`] rejects.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading configuration");
        Self::from_toml_str(&content)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// [`FollownetError::Config`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FollownetError::Config(e.to_string()))
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`FollownetError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.actor_column.trim().is_empty() || self.entity_column.trim().is_empty() {
            return Err(FollownetError::Config(
                "actor_column and entity_column must be non-empty".into(),
            ));
        }
        if self.actor_column == self.entity_column {
            return Err(FollownetError::Config(format!(
                "actor_column and entity_column are both '{}'",
                self.actor_column
            )));
        }
        if self
            .label_column
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            return Err(FollownetError::Config(
                "label_column must be non-empty when set".into(),
            ));
        }
        if !self.delimiter.is_ascii() {
            return Err(FollownetError::Config(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )));
        }
        if self.n_components == 0 {
            return Err(FollownetError::Config("n_components must be at least 1".into()));
        }
        if self.export_dimensions == 0 {
            return Err(FollownetError::Config(
                "export_dimensions must be at least 1".into(),
            ));
        }
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(FollownetError::Config(format!(
                "resolution must be positive and finite, got {}",
                self.resolution
            )));
        }
        Ok(())
    }

    /// Reader for the configured input columns.
    #[must_use]
    pub fn relation_reader(&self) -> RelationReader {
        let mut delimiter = [0u8; 4];
        self.delimiter.encode_utf8(&mut delimiter);
        RelationReader::new()
            .actor_column(self.actor_column.as_str())
            .entity_column(self.entity_column.as_str())
            .label_column(self.label_column.clone())
            .delimiter(delimiter[0])
    }

    /// Community detector with the configured seed and resolution.
    #[must_use]
    pub fn louvain(&self) -> Louvain {
        Louvain::new()
            .with_seed(self.seed)
            .with_resolution(self.resolution)
    }

    /// CA engine with the configured dimensions and backend.
    #[must_use]
    pub fn correspondence(&self) -> CorrespondenceAnalysis {
        CorrespondenceAnalysis::new(self.n_components).with_method(self.svd_method)
    }

    /// Export settings mirroring the input column names.
    #[must_use]
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            dimensions: self.export_dimensions,
            overwrite: self.overwrite,
            actor_column: self.actor_column.clone(),
            entity_column: self.entity_column.clone(),
            label_column: self.label_column.clone(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
