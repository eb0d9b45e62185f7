//! Graph construction and analysis with cache-optimized CSR representation.
//!
//! The CSR [`Graph`] is the storage shared by every stage:
//!
//! - [`bipartite`]: directed actor → entity relation graph
//! - [`connectivity`]: counts, weak/strong components, degree CCDFs
//! - [`projection`]: entity-only co-follow graph (sparse pair accumulator)
//! - [`community`]: multi-level Louvain modularity optimization
//!
//! # Examples
//!
//! ```
//! use follownet::graph::Graph;
//!
//! let g = Graph::from_edges(&[(0, 1), (1, 2), (2, 0)], false);
//! assert_eq!(g.num_nodes(), 3);
//! assert_eq!(g.neighbors(1), &[0, 2]);
//! ```

use std::collections::{BTreeMap, HashMap};

pub mod bipartite;
pub mod community;
pub mod connectivity;
pub mod projection;

pub use bipartite::{BipartiteGraph, Partition};
pub use community::{CommunityPartition, Louvain};
pub use connectivity::{
    CcdfPoint, ComponentReport, ConnectivityAnalyzer, CountReport, DegreeDistribution,
    EntityCentrality,
};
pub use projection::{project_unweighted, project_weighted, ProjectedGraph};

/// Graph node identifier (contiguous integers for cache efficiency).
pub type NodeId = usize;

/// Graph structure using CSR (Compressed Sparse Row) for cache efficiency.
///
/// - Adjacency stored as two flat vectors (CSR format)
/// - Weights stored in a parallel vector, empty when unweighted
/// - Neighbor lists sorted and deduplicated
///
/// Undirected graphs store each edge in both endpoint rows; a self-loop is
/// stored once in its node's row.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    row_ptr: Vec<usize>,      // Offset into col_indices (length = n_nodes + 1)
    col_indices: Vec<NodeId>, // Flattened neighbor lists
    edge_weights: Vec<f64>,   // Parallel to col_indices (empty if unweighted)

    is_directed: bool,
    n_nodes: usize,
    n_edges: usize,
}

impl Graph {
    /// Create empty graph.
    ///
    /// # Examples
    /// ```
    /// use follownet::graph::Graph;
    ///
    /// let g = Graph::new(false); // undirected
    /// assert_eq!(g.num_nodes(), 0);
    /// ```
    #[must_use]
    pub fn new(is_directed: bool) -> Self {
        Self {
            row_ptr: vec![0],
            col_indices: Vec::new(),
            edge_weights: Vec::new(),
            is_directed,
            n_nodes: 0,
            n_edges: 0,
        }
    }

    /// Get number of nodes in graph.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Get number of distinct edges in graph.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.n_edges
    }

    /// Check if graph is directed.
    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.is_directed
    }

    /// Get (out-)neighbors of node v in O(degree(v)) time.
    ///
    /// # Examples
    /// ```
    /// use follownet::graph::Graph;
    ///
    /// let g = Graph::from_edges(&[(0, 1), (1, 2)], false);
    /// assert_eq!(g.neighbors(1), &[0, 2]);
    /// ```
    #[must_use]
    pub fn neighbors(&self, v: NodeId) -> &[NodeId] {
        if v >= self.n_nodes {
            return &[];
        }
        &self.col_indices[self.row_ptr[v]..self.row_ptr[v + 1]]
    }

    /// Neighbors of v paired with edge weights (1.0 when unweighted).
    pub fn weighted_neighbors(&self, v: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        let (start, end) = if v < self.n_nodes {
            (self.row_ptr[v], self.row_ptr[v + 1])
        } else {
            (0, 0)
        };
        (start..end).map(move |idx| {
            let w = if self.edge_weights.is_empty() {
                1.0
            } else {
                self.edge_weights[idx]
            };
            (self.col_indices[idx], w)
        })
    }

    /// Build graph from edge list, inferring the node count from the
    /// largest id.
    ///
    /// # Examples
    /// ```
    /// use follownet::graph::Graph;
    ///
    /// let g = Graph::from_edges(&[(0, 1), (1, 2), (2, 0)], true);
    /// assert_eq!(g.num_nodes(), 3);
    /// assert_eq!(g.num_edges(), 3);
    /// ```
    #[must_use]
    pub fn from_edges(edges: &[(NodeId, NodeId)], is_directed: bool) -> Self {
        let n_nodes = edges
            .iter()
            .flat_map(|&(s, t)| [s, t])
            .max()
            .map_or(0, |max| max + 1);
        Self::from_edges_with_nodes(n_nodes, edges, is_directed)
    }

    /// Build graph over exactly `n_nodes` nodes. Nodes without edges stay in
    /// the graph as isolated nodes.
    ///
    /// # Panics
    ///
    /// Panics if an edge endpoint is `>= n_nodes`.
    #[must_use]
    pub fn from_edges_with_nodes(
        n_nodes: usize,
        edges: &[(NodeId, NodeId)],
        is_directed: bool,
    ) -> Self {
        let mut adj_list: Vec<Vec<NodeId>> = vec![Vec::new(); n_nodes];
        for &(source, target) in edges {
            adj_list[source].push(target);
            if !is_directed && source != target {
                adj_list[target].push(source);
            }
        }

        for neighbors in &mut adj_list {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        let mut row_ptr = Vec::with_capacity(n_nodes + 1);
        let mut col_indices = Vec::new();
        row_ptr.push(0);
        for neighbors in &adj_list {
            col_indices.extend_from_slice(neighbors);
            row_ptr.push(col_indices.len());
        }

        let mut graph = Self {
            row_ptr,
            col_indices,
            edge_weights: Vec::new(),
            is_directed,
            n_nodes,
            n_edges: 0,
        };
        graph.n_edges = graph.count_stored_edges();
        graph
    }

    /// Build weighted graph from edge list with weights.
    ///
    /// # Examples
    /// ```
    /// use follownet::graph::Graph;
    ///
    /// let g = Graph::from_weighted_edges(&[(0, 1, 1.0), (1, 2, 2.5)], false);
    /// assert_eq!(g.num_nodes(), 3);
    /// assert_eq!(g.edge_weight(2, 1), Some(2.5));
    /// ```
    #[must_use]
    pub fn from_weighted_edges(edges: &[(NodeId, NodeId, f64)], is_directed: bool) -> Self {
        let n_nodes = edges
            .iter()
            .flat_map(|&(s, t, _)| [s, t])
            .max()
            .map_or(0, |max| max + 1);
        Self::from_weighted_edges_with_nodes(n_nodes, edges, is_directed)
    }

    /// Weighted variant of [`Graph::from_edges_with_nodes`]. Duplicate edges
    /// keep the first weight.
    ///
    /// # Panics
    ///
    /// Panics if an edge endpoint is `>= n_nodes`.
    #[must_use]
    pub fn from_weighted_edges_with_nodes(
        n_nodes: usize,
        edges: &[(NodeId, NodeId, f64)],
        is_directed: bool,
    ) -> Self {
        let mut adj_list: Vec<Vec<(NodeId, f64)>> = vec![Vec::new(); n_nodes];
        for &(source, target, weight) in edges {
            adj_list[source].push((target, weight));
            if !is_directed && source != target {
                adj_list[target].push((source, weight));
            }
        }

        // Stable sort so the first occurrence of a duplicate wins
        for neighbors in &mut adj_list {
            neighbors.sort_by_key(|&(id, _)| id);
            neighbors.dedup_by_key(|&mut (id, _)| id);
        }

        let mut row_ptr = Vec::with_capacity(n_nodes + 1);
        let mut col_indices = Vec::new();
        let mut edge_weights = Vec::new();
        row_ptr.push(0);
        for neighbors in &adj_list {
            for &(neighbor, weight) in neighbors {
                col_indices.push(neighbor);
                edge_weights.push(weight);
            }
            row_ptr.push(col_indices.len());
        }

        let mut graph = Self {
            row_ptr,
            col_indices,
            edge_weights,
            is_directed,
            n_nodes,
            n_edges: 0,
        };
        graph.n_edges = graph.count_stored_edges();
        graph
    }

    fn count_stored_edges(&self) -> usize {
        if self.is_directed {
            return self.col_indices.len();
        }
        let self_loops = (0..self.n_nodes)
            .filter(|&v| self.neighbors(v).binary_search(&v).is_ok())
            .count();
        (self.col_indices.len() + self_loops) / 2
    }

    /// Get edge weight between two nodes.
    ///
    /// # Returns
    /// * `Some(weight)` if edge exists (1.0 for unweighted graphs)
    /// * `None` if no edge exists
    #[must_use]
    pub fn edge_weight(&self, source: NodeId, target: NodeId) -> Option<f64> {
        if source >= self.n_nodes {
            return None;
        }

        let start = self.row_ptr[source];
        let pos = self.neighbors(source).binary_search(&target).ok()?;

        if self.edge_weights.is_empty() {
            Some(1.0)
        } else {
            Some(self.edge_weights[start + pos])
        }
    }

    /// Out-degree (directed) or degree (undirected) of each node, counting
    /// distinct neighbors.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        (0..self.n_nodes).map(|v| self.neighbors(v).len()).collect()
    }

    /// In-degree of each node. Equals [`Graph::degrees`] for undirected
    /// graphs.
    #[must_use]
    pub fn in_degrees(&self) -> Vec<usize> {
        if !self.is_directed {
            return self.degrees();
        }
        let mut in_deg = vec![0; self.n_nodes];
        for &target in &self.col_indices {
            in_deg[target] += 1;
        }
        in_deg
    }

    /// Weighted degree of each node, self-loops counted twice.
    ///
    /// Sums to twice the total edge weight of an undirected graph.
    #[must_use]
    pub fn strengths(&self) -> Vec<f64> {
        (0..self.n_nodes)
            .map(|v| {
                self.weighted_neighbors(v)
                    .map(|(u, w)| if u == v { 2.0 * w } else { w })
                    .sum()
            })
            .collect()
    }

    /// Weighted modularity of a labelling of an undirected graph.
    ///
    /// Formula: Q = (1/2m) Σ[`A_ij` - γ·`k_i`·`k_j`/2m] `δ(c_i, c_j)`
    /// where `k_i` is the weighted degree and m the total edge weight.
    /// A self-loop of weight w contributes `A_ii` = 2w.
    ///
    /// # Arguments
    /// * `labels` - Community label per node (`labels.len() == num_nodes()`)
    /// * `resolution` - γ, 1.0 for standard modularity
    ///
    /// # Returns
    /// Modularity score; 0.0 for graphs without edges
    ///
    /// # Examples
    /// ```
    /// use follownet::graph::Graph;
    ///
    /// let g = Graph::from_edges(&[(0, 1), (2, 3)], false);
    /// let q = g.modularity(&[0, 0, 1, 1], 1.0);
    /// assert!((q - 0.5).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn modularity(&self, labels: &[usize], resolution: f64) -> f64 {
        if self.n_nodes == 0 || labels.len() != self.n_nodes {
            return 0.0;
        }

        let strengths = self.strengths();
        let two_m: f64 = strengths.iter().sum();
        if two_m <= 0.0 {
            return 0.0;
        }

        let mut internal = 0.0;
        let mut totals: BTreeMap<usize, f64> = BTreeMap::new();
        for v in 0..self.n_nodes {
            *totals.entry(labels[v]).or_insert(0.0) += strengths[v];
            for (u, w) in self.weighted_neighbors(v) {
                if labels[u] == labels[v] {
                    internal += if u == v { 2.0 * w } else { w };
                }
            }
        }

        let expected: f64 = totals.values().map(|t| (t / two_m).powi(2)).sum();
        internal / two_m - resolution * expected
    }

    /// Find weakly connected components using Union-Find.
    ///
    /// Returns a vector where each index is a node ID and the value is its
    /// component ID, numbered by first appearance in node order. Edge
    /// direction is ignored.
    ///
    /// # Time Complexity
    /// O(m·α(n)) where α is the inverse Ackermann function
    ///
    /// # Examples
    /// ```
    /// use follownet::graph::Graph;
    ///
    /// let g = Graph::from_edges(&[(0, 1), (2, 3)], true);
    /// let components = g.connected_components();
    ///
    /// assert_eq!(components[0], components[1]);
    /// assert_ne!(components[0], components[2]);
    /// ```
    #[must_use]
    pub fn connected_components(&self) -> Vec<usize> {
        let n = self.n_nodes;
        if n == 0 {
            return Vec::new();
        }

        let mut parent: Vec<usize> = (0..n).collect();
        let mut rank = vec![0; n];

        // Find with path halving
        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                let next = parent[x];
                parent[x] = parent[next];
                x = next;
            }
            x
        }

        fn union(parent: &mut [usize], rank: &mut [usize], x: usize, y: usize) {
            let root_x = find(parent, x);
            let root_y = find(parent, y);

            if root_x == root_y {
                return;
            }

            use std::cmp::Ordering;
            match rank[root_x].cmp(&rank[root_y]) {
                Ordering::Less => parent[root_x] = root_y,
                Ordering::Greater => parent[root_y] = root_x,
                Ordering::Equal => {
                    parent[root_y] = root_x;
                    rank[root_x] += 1;
                }
            }
        }

        for node in 0..n {
            for &neighbor in self.neighbors(node) {
                union(&mut parent, &mut rank, node, neighbor);
            }
        }

        let mut component_map = HashMap::new();
        let mut result = vec![0; n];
        for (node, component) in result.iter_mut().enumerate() {
            let root = find(&mut parent, node);
            let next_id = component_map.len();
            *component = *component_map.entry(root).or_insert(next_id);
        }

        result
    }

    /// Find strongly connected components using Tarjan's algorithm.
    ///
    /// Iterative formulation, so deep graphs cannot exhaust the call stack.
    /// For undirected graphs the result matches [`Graph::connected_components`]
    /// up to renumbering.
    ///
    /// # Returns
    /// Vector mapping each node to its SCC ID (0-indexed, in completion order)
    ///
    /// # Examples
    /// ```
    /// use follownet::graph::Graph;
    ///
    /// // Directed cycle 0 -> 1 -> 2 -> 0 plus a tail 2 -> 3
    /// let g = Graph::from_edges(&[(0, 1), (1, 2), (2, 0), (2, 3)], true);
    /// let sccs = g.strongly_connected_components();
    ///
    /// assert_eq!(sccs[0], sccs[1]);
    /// assert_eq!(sccs[1], sccs[2]);
    /// assert_ne!(sccs[2], sccs[3]);
    /// ```
    #[must_use]
    pub fn strongly_connected_components(&self) -> Vec<usize> {
        const UNVISITED: usize = usize::MAX;

        let n = self.n_nodes;
        let mut index = vec![UNVISITED; n];
        let mut low = vec![0; n];
        let mut on_stack = vec![false; n];
        let mut stack = Vec::new();
        let mut scc_id = vec![0; n];
        let mut scc_counter = 0;
        let mut next_index = 0;

        // (node, position of next neighbor to explore)
        let mut call: Vec<(NodeId, usize)> = Vec::new();

        for root in 0..n {
            if index[root] != UNVISITED {
                continue;
            }
            index[root] = next_index;
            low[root] = next_index;
            next_index += 1;
            stack.push(root);
            on_stack[root] = true;
            call.push((root, 0));

            while let Some(frame) = call.last_mut() {
                let v = frame.0;
                let neighbors = self.neighbors(v);

                if frame.1 < neighbors.len() {
                    let w = neighbors[frame.1];
                    frame.1 += 1;
                    if index[w] == UNVISITED {
                        index[w] = next_index;
                        low[w] = next_index;
                        next_index += 1;
                        stack.push(w);
                        on_stack[w] = true;
                        call.push((w, 0));
                    } else if on_stack[w] {
                        low[v] = low[v].min(index[w]);
                    }
                    continue;
                }

                call.pop();
                if let Some(&(parent, _)) = call.last() {
                    low[parent] = low[parent].min(low[v]);
                }

                if low[v] == index[v] {
                    while let Some(w) = stack.pop() {
                        on_stack[w] = false;
                        scc_id[w] = scc_counter;
                        if w == v {
                            break;
                        }
                    }
                    scc_counter += 1;
                }
            }
        }

        scc_id
    }
}

/// Number of distinct ids and size of the largest group in a labelling.
pub(crate) fn group_stats(labels: &[usize]) -> (usize, usize) {
    let mut sizes: HashMap<usize, usize> = HashMap::new();
    for &label in labels {
        *sizes.entry(label).or_insert(0) += 1;
    }
    (sizes.len(), sizes.values().copied().max().unwrap_or(0))
}
