//! Community detection on the weighted entity projection.
//!
//! Multi-level Louvain (Blondel et al. 2008):
//!
//! 1. **Local moving**: each node moves to the neighboring community with the
//!    largest modularity gain, or stays if nothing beats its own; passes
//!    repeat until no node moves.
//! 2. **Aggregation**: communities become super-nodes; edge weights between
//!    super-nodes are sums of the original weights, internal weight becomes
//!    a self-loop.
//! 3. Repeat on the contracted graph until local moving changes nothing.
//!
//! Each contraction level is a fresh immutable [`Level`] owned by that step.
//! Reproducibility comes from an explicit seed: node visit order within a
//! level is a seeded shuffle, neighbor communities are scanned in ascending
//! neighbor id, and a move needs a gain strictly above [`MIN_GAIN`].
//! Isolated nodes have zero strength, never move and never attract moves, so
//! each forms a singleton community.

use super::{Graph, ProjectedGraph};
use crate::error::{FollownetError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashMap;

/// Minimum gain for a move; keeps float noise from cycling nodes.
pub const MIN_GAIN: f64 = 1e-12;

/// Local-moving passes allowed per level.
const MAX_PASSES: usize = 1_000;

/// Louvain configuration.
///
/// # Examples
///
/// ```
/// use follownet::graph::{Graph, Louvain};
///
/// // Two triangles joined by one edge
/// let g = Graph::from_edges(
///     &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)],
///     false,
/// );
/// let labels = Louvain::new().with_seed(7).detect_graph(&g).expect("undirected");
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Louvain {
    seed: u64,
    resolution: f64,
}

impl Default for Louvain {
    fn default() -> Self {
        Self {
            seed: 42,
            resolution: 1.0,
        }
    }
}

/// Entity → community assignment produced by [`Louvain::detect`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityPartition {
    /// Entity id → position in `entities`
    #[serde(skip)]
    index: HashMap<String, usize>,
    /// Entity ids in projection node order
    pub entities: Vec<String>,
    /// Community label per entity, contiguous from 0 by first appearance
    pub labels: Vec<usize>,
    /// Number of distinct communities
    pub n_communities: usize,
    /// Modularity of the final partition on the projected graph
    pub modularity: f64,
    /// Modularity before any move, then after each contraction level
    pub level_modularity: Vec<f64>,
    /// Seed that fixed the visit order
    pub seed: u64,
    /// Resolution γ used
    pub resolution: f64,
}

impl CommunityPartition {
    /// Community label of an entity.
    #[must_use]
    pub fn label_of(&self, entity: &str) -> Option<usize> {
        self.index.get(entity).map(|&i| self.labels[i])
    }

    /// Entity ids grouped by community label.
    #[must_use]
    pub fn communities(&self) -> Vec<Vec<&str>> {
        let mut groups = vec![Vec::new(); self.n_communities];
        for (entity, &label) in self.entities.iter().zip(&self.labels) {
            groups[label].push(entity.as_str());
        }
        groups
    }

    /// Community sizes indexed by label.
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        self.communities().iter().map(Vec::len).collect()
    }
}

impl Louvain {
    /// Default configuration: seed 42, resolution 1.0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the seed of the node visit order.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the resolution γ (> 1 favors smaller communities).
    #[must_use]
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Partitions a weighted entity projection.
    ///
    /// # Errors
    ///
    /// [`FollownetError::Validation`] for a non-positive or non-finite
    /// resolution.
    pub fn detect(&self, projected: &ProjectedGraph) -> Result<CommunityPartition> {
        self.check_resolution()?;
        let graph = projected.graph();
        let (labels, level_modularity) = self.run(Level::from_graph(graph));
        let n_communities = labels.iter().max().map_or(0, |&max| max + 1);
        let modularity = graph.modularity(&labels, self.resolution);

        tracing::info!(
            communities = n_communities,
            modularity,
            levels = level_modularity.len().saturating_sub(1),
            "louvain finished"
        );

        let entities = projected.entities().to_vec();
        let index = entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.clone(), i))
            .collect();
        Ok(CommunityPartition {
            index,
            entities,
            labels,
            n_communities,
            modularity,
            level_modularity,
            seed: self.seed,
            resolution: self.resolution,
        })
    }

    /// Partitions any undirected graph; returns one label per node.
    ///
    /// # Errors
    ///
    /// [`FollownetError::Validation`] for directed graphs or a non-positive
    /// resolution.
    pub fn detect_graph(&self, graph: &Graph) -> Result<Vec<usize>> {
        if graph.is_directed() {
            return Err(FollownetError::validation(
                "community detection needs an undirected graph",
            ));
        }
        self.check_resolution()?;
        Ok(self.run(Level::from_graph(graph)).0)
    }

    fn check_resolution(&self) -> Result<()> {
        if self.resolution.is_finite() && self.resolution > 0.0 {
            Ok(())
        } else {
            Err(FollownetError::validation(format!(
                "resolution must be positive, got {}",
                self.resolution
            )))
        }
    }

    fn run(&self, mut level: Level) -> (Vec<usize>, Vec<f64>) {
        let n = level.len();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut membership: Vec<usize> = (0..n).collect();
        let mut level_modularity = vec![level.singleton_modularity(self.resolution)];

        loop {
            let mut order: Vec<usize> = (0..level.len()).collect();
            order.shuffle(&mut rng);

            let Some(assignment) = level.local_moving(&order, self.resolution)
            else {
                break;
            };

            let (labels, n_communities) = renumber(&assignment);
            for m in &mut membership {
                *m = labels[*m];
            }
            level = level.aggregate(&labels, n_communities);
            level_modularity.push(level.singleton_modularity(self.resolution));

            tracing::debug!(
                level = level_modularity.len() - 1,
                communities = n_communities,
                "louvain level contracted"
            );
        }

        (renumber(&membership).0, level_modularity)
    }
}

/// Relabels to contiguous ids by first appearance.
fn renumber(assignment: &[usize]) -> (Vec<usize>, usize) {
    let mut ids: HashMap<usize, usize> = HashMap::new();
    let labels = assignment
        .iter()
        .map(|&c| {
            let next = ids.len();
            *ids.entry(c).or_insert(next)
        })
        .collect();
    (labels, ids.len())
}

/// One contraction level: weighted undirected adjacency without self-loops,
/// self-loop weights kept apart, strength = Σ adjacent weights + 2·loop.
#[derive(Debug, Clone)]
struct Level {
    adj: Vec<Vec<(usize, f64)>>,
    loops: Vec<f64>,
    strength: Vec<f64>,
    two_m: f64,
}

impl Level {
    fn from_graph(graph: &Graph) -> Self {
        let n = graph.num_nodes();
        let mut adj = vec![Vec::new(); n];
        let mut loops = vec![0.0; n];
        for (v, row) in adj.iter_mut().enumerate() {
            for (u, w) in graph.weighted_neighbors(v) {
                if u == v {
                    loops[v] += w;
                } else {
                    row.push((u, w));
                }
            }
        }
        Self::new(adj, loops)
    }

    fn new(adj: Vec<Vec<(usize, f64)>>, loops: Vec<f64>) -> Self {
        let strength: Vec<f64> = adj
            .iter()
            .zip(&loops)
            .map(|(row, l)| row.iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * l)
            .collect();
        let two_m = strength.iter().sum();
        Self {
            adj,
            loops,
            strength,
            two_m,
        }
    }

    fn len(&self) -> usize {
        self.adj.len()
    }

    /// Modularity when every node of this level is its own community.
    fn singleton_modularity(&self, resolution: f64) -> f64 {
        if self.two_m <= 0.0 {
            return 0.0;
        }
        self.loops
            .iter()
            .zip(&self.strength)
            .map(|(l, k)| 2.0 * l / self.two_m - resolution * (k / self.two_m).powi(2))
            .sum()
    }

    /// Repeated passes of greedy moves. Returns the assignment if at least
    /// one node changed community, `None` otherwise.
    fn local_moving(&self, order: &[usize], resolution: f64) -> Option<Vec<usize>> {
        let n = self.len();
        if self.two_m <= 0.0 {
            return None;
        }

        let mut community: Vec<usize> = (0..n).collect();
        let mut total = self.strength.clone();
        let mut link_weight = vec![0.0; n];
        let mut seen = vec![false; n];
        let mut candidates: Vec<usize> = Vec::new();
        let mut any_move = false;

        for _ in 0..MAX_PASSES {
            let mut moved = false;

            for &node in order {
                let k = self.strength[node];
                if k <= 0.0 {
                    continue;
                }

                for &(neighbor, w) in &self.adj[node] {
                    let c = community[neighbor];
                    if !seen[c] {
                        seen[c] = true;
                        candidates.push(c);
                    }
                    link_weight[c] += w;
                }

                let own = community[node];
                total[own] -= k;

                let scale = resolution * k / self.two_m;
                let mut best = own;
                let mut best_gain = link_weight[own] - scale * total[own];
                for &c in &candidates {
                    let gain = link_weight[c] - scale * total[c];
                    if gain > best_gain + MIN_GAIN {
                        best = c;
                        best_gain = gain;
                    }
                }

                total[best] += k;
                if best != own {
                    community[node] = best;
                    moved = true;
                }

                for &c in &candidates {
                    link_weight[c] = 0.0;
                    seen[c] = false;
                }
                candidates.clear();
            }

            if !moved {
                break;
            }
            any_move = true;
        }

        any_move.then_some(community)
    }

    /// Contracts communities into super-nodes.
    fn aggregate(&self, labels: &[usize], n_communities: usize) -> Self {
        let mut loops = vec![0.0; n_communities];
        let mut links: Vec<HashMap<usize, f64>> = vec![HashMap::new(); n_communities];

        for (node, row) in self.adj.iter().enumerate() {
            let c = labels[node];
            loops[c] += self.loops[node];
            for &(neighbor, w) in row {
                let d = labels[neighbor];
                if c == d {
                    // Each internal edge is stored in both rows; count it once
                    if node < neighbor {
                        loops[c] += w;
                    }
                } else {
                    *links[c].entry(d).or_insert(0.0) += w;
                }
            }
        }

        let adj = links
            .into_iter()
            .map(|m| {
                let mut row: Vec<(usize, f64)> = m.into_iter().collect();
                row.sort_unstable_by_key(|&(d, _)| d);
                row
            })
            .collect();
        Self::new(adj, loops)
    }
}

#[cfg(test)]
#[path = "community_tests.rs"]
mod tests;
