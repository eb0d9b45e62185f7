//! Structural diagnostics of the bipartite relation graph.
//!
//! Counts with a sanity check against the input, weak and strong
//! components, degree CCDFs per partition, and the most-followed entities.
//!
//! Strong connectivity is computed but not meaningful as a gate: every edge
//! runs actor → entity, so no directed cycle exists and each node is its own
//! strongly connected component. A fully fragmented strong-component report
//! is the expected outcome.

use super::{group_stats, BipartiteGraph, Partition};
use serde::Serialize;
use std::collections::BTreeMap;

/// Node and edge counts plus the edge-count sanity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountReport {
    /// All nodes, both partitions
    pub nodes: usize,
    /// Actor nodes
    pub actors: usize,
    /// Entity nodes
    pub entities: usize,
    /// Directed edges
    pub edges: usize,
    /// Distinct (actor, entity) pairs in the input
    pub distinct_relations: usize,
    /// Input rows, duplicates included
    pub input_rows: usize,
    /// Whether `edges == distinct_relations`
    pub edges_match_relations: bool,
    /// Whether `edges == input_rows` (false when the input had duplicates)
    pub edges_match_rows: bool,
}

/// Weak and strong component summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentReport {
    /// Number of weakly connected components
    pub weak_count: usize,
    /// Node count of the largest weak component
    pub largest_weak: usize,
    /// Number of strongly connected components
    pub strong_count: usize,
    /// Node count of the largest strong component
    pub largest_strong: usize,
    /// Whether the graph is connected with edges taken as undirected
    pub is_weakly_connected: bool,
}

/// One point of a complementary cumulative degree distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CcdfPoint {
    /// Degree k
    pub degree: usize,
    /// Fraction of nodes with degree strictly greater than k
    pub fraction_above: f64,
}

/// Degree CCDF of one partition.
///
/// Computed over nodes with degree ≥ 1; zero-degree nodes are only counted
/// in [`DegreeDistribution::zero_degree`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeDistribution {
    /// Partition the distribution describes
    pub partition: Partition,
    /// One point per distinct non-zero degree, ascending
    pub points: Vec<CcdfPoint>,
    /// Nodes of the partition with degree 0
    pub zero_degree: usize,
    /// Nodes of the partition with degree ≥ 1
    pub nonzero_nodes: usize,
    /// Largest degree observed
    pub max_degree: usize,
    /// Mean degree over all nodes of the partition
    pub mean_degree: f64,
}

impl DegreeDistribution {
    /// Points safe for a log-log plot (strictly positive fraction).
    pub fn log_log_points(&self) -> impl Iterator<Item = &CcdfPoint> + '_ {
        self.points.iter().filter(|p| p.fraction_above > 0.0)
    }
}

/// An entity ranked by in-degree centrality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityCentrality {
    /// Entity id
    pub entity: String,
    /// Entity label, if known
    pub label: Option<String>,
    /// Number of distinct actors relating to the entity
    pub in_degree: usize,
    /// `in_degree / (nodes - 1)`
    pub centrality: f64,
}

/// Read-only analyzer over a built [`BipartiteGraph`].
///
/// # Examples
///
/// ```
/// use follownet::graph::{BipartiteGraph, ConnectivityAnalyzer};
/// use follownet::relation::RelationSet;
///
/// let set = RelationSet::from_pairs(&[("A1", "E1"), ("A2", "E1"), ("A2", "E2"), ("A3", "E2")]);
/// let g = BipartiteGraph::build(&set).expect("non-empty input");
/// let analyzer = ConnectivityAnalyzer::new(&g);
///
/// let counts = analyzer.node_and_edge_counts();
/// assert!(counts.edges_match_relations);
///
/// let components = analyzer.components();
/// assert_eq!(components.weak_count, 1);
/// assert_eq!(components.strong_count, 5);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConnectivityAnalyzer<'a> {
    bipartite: &'a BipartiteGraph,
}

impl<'a> ConnectivityAnalyzer<'a> {
    /// Wraps a built graph.
    #[must_use]
    pub fn new(bipartite: &'a BipartiteGraph) -> Self {
        Self { bipartite }
    }

    /// Node/edge counts. A mismatch between edges and distinct relations is
    /// logged, never fatal.
    #[must_use]
    pub fn node_and_edge_counts(&self) -> CountReport {
        let g = self.bipartite.graph();
        let report = CountReport {
            nodes: g.num_nodes(),
            actors: self.bipartite.num_actors(),
            entities: self.bipartite.num_entities(),
            edges: g.num_edges(),
            distinct_relations: self.bipartite.distinct_relations(),
            input_rows: self.bipartite.input_rows(),
            edges_match_relations: g.num_edges() == self.bipartite.distinct_relations(),
            edges_match_rows: g.num_edges() == self.bipartite.input_rows(),
        };

        if !report.edges_match_relations {
            tracing::warn!(
                edges = report.edges,
                distinct_relations = report.distinct_relations,
                "edge count differs from distinct relation count"
            );
        }
        if !report.edges_match_rows {
            tracing::info!(
                edges = report.edges,
                rows = report.input_rows,
                "duplicate relation rows collapsed into single edges"
            );
        }
        report
    }

    /// Weak and strong components.
    #[must_use]
    pub fn components(&self) -> ComponentReport {
        let g = self.bipartite.graph();
        let (weak_count, largest_weak) = group_stats(&g.connected_components());
        let (strong_count, largest_strong) = group_stats(&g.strongly_connected_components());

        tracing::debug!(
            weak_count,
            largest_weak,
            strong_count,
            largest_strong,
            "components computed"
        );

        ComponentReport {
            weak_count,
            largest_weak,
            strong_count,
            largest_strong,
            is_weakly_connected: weak_count == 1,
        }
    }

    /// CCDF of out-degree (actors) or in-degree (entities).
    #[must_use]
    pub fn degree_distribution(&self, partition: Partition) -> DegreeDistribution {
        let g = self.bipartite.graph();
        let all_degrees = match partition {
            Partition::Actor => g.degrees(),
            Partition::Entity => g.in_degrees(),
        };
        let degrees: Vec<usize> = self
            .bipartite
            .nodes(partition)
            .map(|v| all_degrees[v])
            .collect();

        let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
        let mut zero_degree = 0;
        for &d in &degrees {
            if d == 0 {
                zero_degree += 1;
            } else {
                *histogram.entry(d).or_insert(0) += 1;
            }
        }

        let nonzero_nodes = degrees.len() - zero_degree;
        let mut points = Vec::with_capacity(histogram.len());
        let mut at_or_below = 0;
        for (&degree, &count) in &histogram {
            at_or_below += count;
            points.push(CcdfPoint {
                degree,
                fraction_above: (nonzero_nodes - at_or_below) as f64 / nonzero_nodes as f64,
            });
        }

        let mean_degree = if degrees.is_empty() {
            0.0
        } else {
            degrees.iter().sum::<usize>() as f64 / degrees.len() as f64
        };

        DegreeDistribution {
            partition,
            points,
            zero_degree,
            nonzero_nodes,
            max_degree: degrees.iter().copied().max().unwrap_or(0),
            mean_degree,
        }
    }

    /// The `k` entities with the highest in-degree centrality
    /// (`in_degree / (nodes - 1)`), ties broken by entity id.
    #[must_use]
    pub fn top_entities_by_in_degree(&self, k: usize) -> Vec<EntityCentrality> {
        let g = self.bipartite.graph();
        let in_degrees = g.in_degrees();
        let norm = g.num_nodes().saturating_sub(1).max(1) as f64;

        let mut ranked: Vec<EntityCentrality> = (0..self.bipartite.num_entities())
            .map(|e| {
                let in_degree = in_degrees[self.bipartite.entity_node(e)];
                EntityCentrality {
                    entity: self.bipartite.entities()[e].clone(),
                    label: self.bipartite.entity_label(e).map(str::to_string),
                    in_degree,
                    centrality: in_degree as f64 / norm,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.in_degree
                .cmp(&a.in_degree)
                .then_with(|| a.entity.cmp(&b.entity))
        });
        ranked.truncate(k);
        ranked
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
