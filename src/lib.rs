//! Follownet: structure and embedding analysis of bipartite
//! follower → entity networks.
//!
//! Relations "actor follows entity" feed two independent branches: a graph
//! branch (bipartite graph, connectivity, entity projection, Louvain
//! communities) and a correspondence analysis branch (contingency table,
//! SVD of standardized residuals, row/column coordinates).
//!
//! # Quick Start
//!
//! ```
//! use follownet::prelude::*;
//!
//! let relations = RelationSet::from_pairs(&[
//!     ("A1", "E1"),
//!     ("A2", "E1"),
//!     ("A2", "E2"),
//!     ("A3", "E2"),
//! ]);
//!
//! // Graph branch
//! let graph = BipartiteGraph::build(&relations).expect("non-empty input");
//! let projected = project_weighted(&graph);
//! assert_eq!(projected.weight("E1", "E2"), Some(1.0));
//! let communities = Louvain::new()
//!     .with_seed(42)
//!     .detect(&projected)
//!     .expect("positive resolution");
//! assert_eq!(communities.n_communities, 1);
//!
//! // Correspondence analysis branch
//! let table = ContingencyTable::from_relations(&relations).expect("non-empty input");
//! let ca = CorrespondenceAnalysis::new(100).fit(&table).expect("3x2 table");
//! assert!((ca.inertia_percent[0] - 100.0).abs() < 1e-9);
//! ```
//!
//! # Modules
//!
//! - [`relation`]: Relation records and delimited-text reader
//! - [`graph`]: CSR graph, bipartite builder, connectivity, projection, communities
//! - [`decomposition`]: Contingency table and correspondence analysis
//! - [`primitives`]: Dense row-major matrix
//! - [`report`]: Coordinate and inertia tables, CSV export
//! - [`pipeline`]: Stage orchestration with precursor checks
//! - [`config`]: TOML run configuration
//! - [`error`]: Error and warning types

pub mod config;
pub mod decomposition;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod prelude;
pub mod primitives;
pub mod relation;
pub mod report;

pub use error::{FollownetError, NumericWarning, Result};
pub use primitives::Matrix;
