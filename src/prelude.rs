//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use follownet::prelude::*;
//! ```

pub use crate::config::PipelineConfig;
pub use crate::decomposition::{CaResult, ContingencyTable, CorrespondenceAnalysis, SvdMethod};
pub use crate::error::{FollownetError, NumericWarning};
pub use crate::graph::{
    project_unweighted, project_weighted, BipartiteGraph, CommunityPartition, ConnectivityAnalyzer,
    Graph, Louvain, Partition, ProjectedGraph,
};
pub use crate::pipeline::{Pipeline, PipelineReport};
pub use crate::primitives::Matrix;
pub use crate::relation::{RelationReader, RelationRecord, RelationSet};
pub use crate::report::{CoordinateTable, ExportOptions, InertiaTable};
