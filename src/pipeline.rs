//! Stage orchestration for one dataset.
//!
//! A [`Pipeline`] owns the relation set of one dataset and the artifact of
//! each stage once it has run. Stages consume artifacts of earlier stages
//! and fail with [`FollownetError::PrecursorMissing`] when called out of
//! order:
//!
//! ```text
//! relations ─ build_graph ─┬─ counts / components / degree_distribution / top_entities
//!                          └─ project ─ communities
//! relations ─ contingency_table ─ correspondence ─ export
//! ```
//!
//! Artifacts are read-only once produced; re-running a stage replaces its
//! artifact and the artifacts derived from it.

use crate::config::PipelineConfig;
use crate::decomposition::{CaResult, ContingencyTable};
use crate::error::{FollownetError, NumericWarning, Result};
use crate::graph::{
    project_unweighted, project_weighted, BipartiteGraph, CommunityPartition, ComponentReport,
    ConnectivityAnalyzer, CountReport, DegreeDistribution, EntityCentrality, Partition,
    ProjectedGraph,
};
use crate::relation::RelationSet;
use crate::report::{self, ExportPaths};
use serde::Serialize;

/// Stateful runner over one relation set.
///
/// # Examples
///
/// ```
/// use follownet::config::PipelineConfig;
/// use follownet::pipeline::Pipeline;
/// use follownet::relation::RelationSet;
///
/// let set = RelationSet::from_pairs(&[("A1", "E1"), ("A2", "E1"), ("A2", "E2"), ("A3", "E2")]);
/// let mut pipeline = Pipeline::new("demo", set, PipelineConfig::default()).expect("valid config");
///
/// // Projection needs the graph first
/// assert!(pipeline.project().is_err());
///
/// let report = pipeline.run_all().expect("scenario input");
/// assert_eq!(report.counts.nodes, 5);
/// assert_eq!(report.projection.edges, 1);
/// assert_eq!(report.correspondence.dimensions, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    dataset: String,
    config: PipelineConfig,
    relations: RelationSet,
    graph: Option<BipartiteGraph>,
    weighted: Option<ProjectedGraph>,
    unweighted: Option<ProjectedGraph>,
    partition: Option<CommunityPartition>,
    table: Option<ContingencyTable>,
    ca: Option<CaResult>,
}

/// Projection size summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionSummary {
    /// Entity nodes, isolated ones included
    pub nodes: usize,
    /// Edges of the weighted projection
    pub edges: usize,
    /// Edges of the unweighted projection
    pub unweighted_edges: usize,
    /// Entities sharing no actor with any other entity
    pub isolated: usize,
    /// Largest shared-actor count on any edge
    pub max_weight: u64,
}

/// Community detection summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunitySummary {
    /// Number of communities
    pub count: usize,
    /// Modularity of the final partition
    pub modularity: f64,
    /// Community sizes, largest first
    pub sizes: Vec<usize>,
    /// Modularity before any move and after each level
    pub level_modularity: Vec<f64>,
}

/// Correspondence analysis summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaSummary {
    /// Retained actor rows
    pub rows: usize,
    /// Retained entity columns
    pub columns: usize,
    /// Retained dimensions
    pub dimensions: usize,
    /// Total inertia of the table
    pub total_inertia: f64,
    /// Inertia percentages of the exported dimensions
    pub inertia_percent: Vec<f64>,
    /// Rows and columns excluded for a zero margin
    pub dropped: usize,
    /// Non-fatal numeric conditions
    pub warnings: Vec<NumericWarning>,
}

/// Everything [`Pipeline::run_all`] computes, ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Dataset name
    pub dataset: String,
    /// Node and edge counts with sanity checks
    pub counts: CountReport,
    /// Weak and strong components
    pub components: ComponentReport,
    /// Actor out-degree CCDF
    pub actor_degrees: DegreeDistribution,
    /// Entity in-degree CCDF
    pub entity_degrees: DegreeDistribution,
    /// Most-followed entities
    pub top_entities: Vec<EntityCentrality>,
    /// Entity projection
    pub projection: ProjectionSummary,
    /// Louvain communities
    pub communities: CommunitySummary,
    /// Correspondence analysis
    pub correspondence: CaSummary,
}

impl Pipeline {
    /// Creates a pipeline over a relation set.
    ///
    /// # Errors
    ///
    /// [`FollownetError::Config`] if the configuration is invalid.
    pub fn new(
        dataset: impl Into<String>,
        relations: RelationSet,
        config: PipelineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dataset: dataset.into(),
            config,
            relations,
            graph: None,
            weighted: None,
            unweighted: None,
            partition: None,
            table: None,
            ca: None,
        })
    }

    /// Dataset name.
    #[must_use]
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Input relations.
    #[must_use]
    pub fn relations(&self) -> &RelationSet {
        &self.relations
    }

    /// Builds the bipartite relation graph.
    ///
    /// # Errors
    ///
    /// Whatever [`BipartiteGraph::build`] rejects.
    pub fn build_graph(&mut self) -> Result<&BipartiteGraph> {
        let graph = BipartiteGraph::build(&self.relations)?;
        self.weighted = None;
        self.unweighted = None;
        self.partition = None;
        Ok(self.graph.insert(graph))
    }

    /// The bipartite graph, once built.
    ///
    /// # Errors
    ///
    /// [`FollownetError::PrecursorMissing`] before [`Pipeline::build_graph`].
    pub fn graph(&self) -> Result<&BipartiteGraph> {
        self.require_graph("graph")
    }

    /// Node and edge counts with sanity checks.
    ///
    /// # Errors
    ///
    /// [`FollownetError::PrecursorMissing`] before [`Pipeline::build_graph`].
    pub fn counts(&self) -> Result<CountReport> {
        let graph = self.require_graph("counts")?;
        Ok(ConnectivityAnalyzer::new(graph).node_and_edge_counts())
    }

    /// Weak and strong component statistics.
    ///
    /// # Errors
    ///
    /// [`FollownetError::PrecursorMissing`] before [`Pipeline::build_graph`].
    pub fn components(&self) -> Result<ComponentReport> {
        let graph = self.require_graph("components")?;
        Ok(ConnectivityAnalyzer::new(graph).components())
    }

    /// Degree CCDF of one side.
    ///
    /// # Errors
    ///
    /// [`FollownetError::PrecursorMissing`] before [`Pipeline::build_graph`].
    pub fn degree_distribution(&self, partition: Partition) -> Result<DegreeDistribution> {
        let graph = self.require_graph("degree_distribution")?;
        Ok(ConnectivityAnalyzer::new(graph).degree_distribution(partition))
    }

    /// The `top_k` entities by in-degree centrality.
    ///
    /// # Errors
    ///
    /// [`FollownetError::PrecursorMissing`] before [`Pipeline::build_graph`].
    pub fn top_entities(&self) -> Result<Vec<EntityCentrality>> {
        let graph = self.require_graph("top_entities")?;
        Ok(ConnectivityAnalyzer::new(graph).top_entities_by_in_degree(self.config.top_k))
    }

    /// Builds both entity projections; returns the weighted one.
    ///
    /// # Errors
    ///
    /// [`FollownetError::PrecursorMissing`] before [`Pipeline::build_graph`].
    pub fn project(&mut self) -> Result<&ProjectedGraph> {
        let graph = self.require_graph("project")?;
        let weighted = project_weighted(graph);
        let unweighted = project_unweighted(graph);
        self.unweighted = Some(unweighted);
        self.partition = None;
        Ok(self.weighted.insert(weighted))
    }

    /// A projection variant, once built.
    ///
    /// # Errors
    ///
    /// [`FollownetError::PrecursorMissing`] before [`Pipeline::project`].
    pub fn projection(&self, weighted: bool) -> Result<&ProjectedGraph> {
        let projected = if weighted {
            self.weighted.as_ref()
        } else {
            self.unweighted.as_ref()
        };
        projected.ok_or(FollownetError::PrecursorMissing {
            operation: "projection",
            requires: "project",
        })
    }

    /// Louvain communities of the weighted projection.
    ///
    /// # Errors
    ///
    /// [`FollownetError::PrecursorMissing`] before [`Pipeline::project`].
    pub fn communities(&mut self) -> Result<&CommunityPartition> {
        let projected = self
            .weighted
            .as_ref()
            .ok_or(FollownetError::PrecursorMissing {
                operation: "communities",
                requires: "project",
            })?;
        let partition = self.config.louvain().detect(projected)?;
        Ok(self.partition.insert(partition))
    }

    /// The community partition, once detected.
    ///
    /// # Errors
    ///
    /// [`FollownetError::PrecursorMissing`] before [`Pipeline::communities`].
    pub fn partition(&self) -> Result<&CommunityPartition> {
        self.partition
            .as_ref()
            .ok_or(FollownetError::PrecursorMissing {
                operation: "partition",
                requires: "communities",
            })
    }

    /// Cross-tabulates the relations.
    ///
    /// # Errors
    ///
    /// Whatever [`ContingencyTable::from_relations`] rejects.
    pub fn contingency_table(&mut self) -> Result<&ContingencyTable> {
        let table = ContingencyTable::from_relations(&self.relations)?;
        self.ca = None;
        Ok(self.table.insert(table))
    }

    /// Fits correspondence analysis on the contingency table.
    ///
    /// # Errors
    ///
    /// [`FollownetError::PrecursorMissing`] before
    /// [`Pipeline::contingency_table`], plus whatever the fit rejects.
    pub fn correspondence(&mut self) -> Result<&CaResult> {
        let table = self
            .table
            .as_ref()
            .ok_or(FollownetError::PrecursorMissing {
                operation: "correspondence",
                requires: "contingency_table",
            })?;
        let result = self.config.correspondence().fit(table)?;
        Ok(self.ca.insert(result))
    }

    /// The CA result, once fitted.
    ///
    /// # Errors
    ///
    /// [`FollownetError::PrecursorMissing`] before
    /// [`Pipeline::correspondence`].
    pub fn ca_result(&self) -> Result<&CaResult> {
        self.require_ca("ca_result")
    }

    /// Writes coordinates and inertia under the configured `save_dir`.
    ///
    /// # Errors
    ///
    /// [`FollownetError::PrecursorMissing`] before
    /// [`Pipeline::correspondence`], plus export failures.
    pub fn export(&self) -> Result<ExportPaths> {
        let result = self.require_ca("export")?;
        report::export(
            result,
            &self.relations.entity_labels(),
            &self.config.save_dir,
            &self.dataset,
            &self.config.export_options(),
        )
    }

    /// Runs every analysis stage in order and summarizes the artifacts.
    /// Nothing is written to disk.
    ///
    /// # Errors
    ///
    /// The first stage failure.
    pub fn run_all(&mut self) -> Result<PipelineReport> {
        tracing::info!(dataset = %self.dataset, rows = self.relations.len(), "pipeline started");

        self.build_graph()?;
        let counts = self.counts()?;
        let components = self.components()?;
        let actor_degrees = self.degree_distribution(Partition::Actor)?;
        let entity_degrees = self.degree_distribution(Partition::Entity)?;
        let top_entities = self.top_entities()?;

        let projection = self.project_summary()?;
        let communities = self.community_summary()?;

        self.contingency_table()?;
        let correspondence = self.ca_summary()?;

        tracing::info!(dataset = %self.dataset, "pipeline finished");
        Ok(PipelineReport {
            dataset: self.dataset.clone(),
            counts,
            components,
            actor_degrees,
            entity_degrees,
            top_entities,
            projection,
            communities,
            correspondence,
        })
    }

    fn project_summary(&mut self) -> Result<ProjectionSummary> {
        self.project()?;
        let weighted = self.projection(true)?;
        let unweighted = self.projection(false)?;
        Ok(ProjectionSummary {
            nodes: weighted.num_nodes(),
            edges: weighted.num_edges(),
            unweighted_edges: unweighted.num_edges(),
            isolated: weighted.isolated_entities().len(),
            max_weight: weighted.edges().map(|(_, _, w)| w as u64).max().unwrap_or(0),
        })
    }

    fn community_summary(&mut self) -> Result<CommunitySummary> {
        let partition = self.communities()?;
        let mut sizes = partition.sizes();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        Ok(CommunitySummary {
            count: partition.n_communities,
            modularity: partition.modularity,
            sizes,
            level_modularity: partition.level_modularity.clone(),
        })
    }

    fn ca_summary(&mut self) -> Result<CaSummary> {
        let export_dimensions = self.config.export_dimensions;
        let result = self.correspondence()?;
        Ok(CaSummary {
            rows: result.row_labels.len(),
            columns: result.column_labels.len(),
            dimensions: result.n_dimensions(),
            total_inertia: result.total_inertia,
            inertia_percent: result
                .inertia_percent
                .iter()
                .take(export_dimensions)
                .copied()
                .collect(),
            dropped: result.dropped_count(),
            warnings: result.warnings.clone(),
        })
    }

    fn require_graph(&self, operation: &'static str) -> Result<&BipartiteGraph> {
        self.graph.as_ref().ok_or(FollownetError::PrecursorMissing {
            operation,
            requires: "build_graph",
        })
    }

    fn require_ca(&self, operation: &'static str) -> Result<&CaResult> {
        self.ca.as_ref().ok_or(FollownetError::PrecursorMissing {
            operation,
            requires: "correspondence",
        })
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
