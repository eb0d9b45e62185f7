//! Entity-only projection of the bipartite relation graph.
//!
//! Two entities are linked when at least one actor relates to both; in the
//! weighted variant the edge weight is the number of such shared actors.
//!
//! Pair counts come from a sparse accumulator keyed by unordered entity
//! pairs, filled per actor neighbor list. Cost is bounded by
//! Σ_a C(deg(a), 2), never |Entities|². With the `parallel` feature the
//! actors are split across rayon workers, each folding into a local map,
//! and the maps are merged at the end. Counts are integers, so the result
//! does not depend on the number of workers.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::HashMap;

use super::{BipartiteGraph, Graph, NodeId};

type PairCounts = HashMap<(usize, usize), u64>;

/// Undirected graph over entities only. Node ids are entity indices of the
/// source [`BipartiteGraph`]; entities without shared actors are kept as
/// isolated nodes.
#[derive(Debug, Clone)]
pub struct ProjectedGraph {
    graph: Graph,
    entities: Vec<String>,
    entity_index: HashMap<String, NodeId>,
    labels: Vec<Option<String>>,
    weighted: bool,
}

impl ProjectedGraph {
    /// Underlying undirected CSR graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Whether edges carry shared-actor counts.
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    /// Number of entity nodes, isolated ones included.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.graph.num_nodes()
    }

    /// Number of entity–entity edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.graph.num_edges()
    }

    /// Entity ids in node order.
    #[must_use]
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Entity label of a node, if known.
    #[must_use]
    pub fn label(&self, node: NodeId) -> Option<&str> {
        self.labels.get(node)?.as_deref()
    }

    /// Node id of an entity.
    #[must_use]
    pub fn node_of(&self, entity: &str) -> Option<NodeId> {
        self.entity_index.get(entity).copied()
    }

    /// Edge weight between two entities by id; `None` if not linked.
    /// Unweighted projections report 1.0 for every edge.
    #[must_use]
    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        self.graph.edge_weight(self.node_of(a)?, self.node_of(b)?)
    }

    /// Each undirected edge once as `(u, v, weight)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        (0..self.graph.num_nodes()).flat_map(move |u| {
            self.graph
                .weighted_neighbors(u)
                .filter(move |&(v, _)| u < v)
                .map(move |(v, w)| (u, v, w))
        })
    }

    /// Entities that share no actor with any other entity.
    #[must_use]
    pub fn isolated_entities(&self) -> Vec<&str> {
        (0..self.graph.num_nodes())
            .filter(|&v| self.graph.neighbors(v).is_empty())
            .map(|v| self.entities[v].as_str())
            .collect()
    }
}

/// Weighted projection: edge weight = |shared actors|.
///
/// # Examples
///
/// ```
/// use follownet::graph::{project_weighted, BipartiteGraph};
/// use follownet::relation::RelationSet;
///
/// let set = RelationSet::from_pairs(&[("A1", "E1"), ("A2", "E1"), ("A2", "E2"), ("A3", "E2")]);
/// let g = BipartiteGraph::build(&set).expect("non-empty input");
/// let p = project_weighted(&g);
/// assert_eq!(p.num_nodes(), 2);
/// assert_eq!(p.weight("E1", "E2"), Some(1.0));
/// ```
#[must_use]
pub fn project_weighted(bipartite: &BipartiteGraph) -> ProjectedGraph {
    project(bipartite, true)
}

/// Unweighted projection: an edge iff at least one shared actor.
#[must_use]
pub fn project_unweighted(bipartite: &BipartiteGraph) -> ProjectedGraph {
    project(bipartite, false)
}

fn project(bipartite: &BipartiteGraph, weighted: bool) -> ProjectedGraph {
    let mut pairs: Vec<((usize, usize), u64)> = pair_counts(bipartite).into_iter().collect();
    pairs.sort_unstable_by_key(|&(pair, _)| pair);

    let n_entities = bipartite.num_entities();
    let graph = if weighted {
        let edges: Vec<(NodeId, NodeId, f64)> = pairs
            .iter()
            .map(|&((a, b), count)| (a, b, count as f64))
            .collect();
        Graph::from_weighted_edges_with_nodes(n_entities, &edges, false)
    } else {
        let edges: Vec<(NodeId, NodeId)> = pairs.iter().map(|&(pair, _)| pair).collect();
        Graph::from_edges_with_nodes(n_entities, &edges, false)
    };

    tracing::debug!(
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        weighted,
        "entity projection built"
    );

    let entities = bipartite.entities().to_vec();
    let entity_index = entities
        .iter()
        .enumerate()
        .map(|(node, id)| (id.clone(), node))
        .collect();

    ProjectedGraph {
        graph,
        entities,
        entity_index,
        labels: (0..n_entities)
            .map(|e| bipartite.entity_label(e).map(str::to_string))
            .collect(),
        weighted,
    }
}

/// Shared-actor count for every entity pair with at least one shared actor.
fn pair_counts(bipartite: &BipartiteGraph) -> PairCounts {
    let n_actors = bipartite.num_actors();

    #[cfg(feature = "parallel")]
    {
        (0..n_actors)
            .into_par_iter()
            .fold(PairCounts::new, |mut acc, actor| {
                accumulate_actor(bipartite, actor, &mut acc);
                acc
            })
            .reduce(PairCounts::new, merge_counts)
    }

    #[cfg(not(feature = "parallel"))]
    {
        let mut acc = PairCounts::new();
        for actor in 0..n_actors {
            accumulate_actor(bipartite, actor, &mut acc);
        }
        acc
    }
}

fn accumulate_actor(bipartite: &BipartiteGraph, actor: NodeId, acc: &mut PairCounts) {
    let offset = bipartite.num_actors();
    // CSR rows are sorted and deduplicated, so (i, j) with i < j is canonical
    let followed = bipartite.graph().neighbors(actor);
    for (i, &a) in followed.iter().enumerate() {
        for &b in &followed[i + 1..] {
            *acc.entry((a - offset, b - offset)).or_insert(0) += 1;
        }
    }
}

#[cfg(feature = "parallel")]
fn merge_counts(mut left: PairCounts, right: PairCounts) -> PairCounts {
    if left.len() < right.len() {
        return merge_counts(right, left);
    }
    for (pair, count) in right {
        *left.entry(pair).or_insert(0) += count;
    }
    left
}

#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;
