//! Directed bipartite relation graph (actor → entity).
//!
//! Node ids are contiguous: actors occupy `0..n_actors` in first-appearance
//! order, entities follow in first-appearance order, then catalog-only
//! entities. Nodes are keyed by `(Partition, id)`, so an identifier used as
//! both actor and entity becomes two distinct nodes; such ids are listed in
//! [`BipartiteGraph::shared_ids`] and rendered with an `actor:` / `entity:`
//! prefix by [`BipartiteGraph::display_name`].

use super::{Graph, NodeId};
use crate::error::{FollownetError, Result};
use crate::relation::RelationSet;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Side of the bipartite relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    /// Followers; edges leave this side.
    Actor,
    /// Followed markers; edges arrive on this side.
    Entity,
}

impl Partition {
    fn prefix(self) -> &'static str {
        match self {
            Partition::Actor => "actor:",
            Partition::Entity => "entity:",
        }
    }
}

/// Bipartite graph built once per analysis run from an immutable relation
/// set.
///
/// # Examples
///
/// ```
/// use follownet::graph::BipartiteGraph;
/// use follownet::relation::RelationSet;
///
/// let set = RelationSet::from_pairs(&[("A1", "E1"), ("A2", "E1"), ("A2", "E2"), ("A3", "E2")]);
/// let g = BipartiteGraph::build(&set).expect("non-empty input");
/// assert_eq!(g.graph().num_nodes(), 5);
/// assert_eq!(g.graph().num_edges(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct BipartiteGraph {
    graph: Graph,
    actors: Vec<String>,
    entities: Vec<String>,
    entity_labels: Vec<Option<String>>,
    actor_index: HashMap<String, usize>,
    entity_index: HashMap<String, usize>,
    shared_ids: Vec<String>,
    input_rows: usize,
    distinct_relations: usize,
}

impl BipartiteGraph {
    /// Builds the graph in O(R) over R relation rows.
    ///
    /// Duplicate (actor, entity) rows collapse into one edge.
    ///
    /// # Errors
    ///
    /// [`FollownetError::EmptyInput`] when the set has neither relations nor
    /// catalog entities, [`FollownetError::Validation`] for empty ids.
    pub fn build(relations: &RelationSet) -> Result<Self> {
        if relations.is_empty() && relations.catalog().is_empty() {
            return Err(FollownetError::empty("no relations to build a graph from"));
        }

        let mut actor_ids: HashMap<&str, usize> = HashMap::new();
        let mut entity_ids: HashMap<&str, usize> = HashMap::new();
        let mut actors = Vec::new();
        let mut entities = Vec::new();
        let mut entity_labels: Vec<Option<String>> = Vec::new();
        let mut pairs = Vec::with_capacity(relations.len());

        for (row, record) in relations.records().iter().enumerate() {
            if record.actor.is_empty() || record.entity.is_empty() {
                return Err(FollownetError::validation(format!(
                    "relation {row} has an empty actor or entity id"
                )));
            }
            let a = *actor_ids.entry(record.actor.as_str()).or_insert_with(|| {
                actors.push(record.actor.clone());
                actors.len() - 1
            });
            let e = *entity_ids.entry(record.entity.as_str()).or_insert_with(|| {
                entities.push(record.entity.clone());
                entity_labels.push(None);
                entities.len() - 1
            });
            if entity_labels[e].is_none() {
                entity_labels[e] = record.label.clone();
            }
            pairs.push((a, e));
        }

        for (entity, label) in relations.catalog() {
            if entity.is_empty() {
                return Err(FollownetError::validation("catalog entity with empty id"));
            }
            let e = *entity_ids.entry(entity.as_str()).or_insert_with(|| {
                entities.push(entity.clone());
                entity_labels.push(None);
                entities.len() - 1
            });
            if entity_labels[e].is_none() {
                entity_labels[e] = label.clone();
            }
        }

        let n_actors = actors.len();
        let edges: Vec<(NodeId, NodeId)> =
            pairs.iter().map(|&(a, e)| (a, n_actors + e)).collect();
        let graph = Graph::from_edges_with_nodes(n_actors + entities.len(), &edges, true);

        let mut shared_ids: Vec<String> = actors
            .iter()
            .filter(|a| entity_ids.contains_key(a.as_str()))
            .cloned()
            .collect();
        shared_ids.sort();

        let distinct_relations = pairs.iter().collect::<HashSet<_>>().len();
        tracing::debug!(
            actors = n_actors,
            entities = entities.len(),
            edges = graph.num_edges(),
            rows = relations.len(),
            "bipartite graph built"
        );
        if !shared_ids.is_empty() {
            tracing::warn!(
                count = shared_ids.len(),
                "ids used as both actor and entity; kept as separate namespaced nodes"
            );
        }

        let actor_index = actor_ids
            .into_iter()
            .map(|(id, idx)| (id.to_string(), idx))
            .collect();
        let entity_index = entity_ids
            .into_iter()
            .map(|(id, idx)| (id.to_string(), idx))
            .collect();

        Ok(Self {
            graph,
            actors,
            entities,
            entity_labels,
            actor_index,
            entity_index,
            shared_ids,
            input_rows: relations.len(),
            distinct_relations,
        })
    }

    /// Underlying directed CSR graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Number of actor nodes.
    #[must_use]
    pub fn num_actors(&self) -> usize {
        self.actors.len()
    }

    /// Number of entity nodes.
    #[must_use]
    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }

    /// Input rows the graph was built from, duplicates included.
    #[must_use]
    pub fn input_rows(&self) -> usize {
        self.input_rows
    }

    /// Distinct (actor, entity) pairs in the input, counted independently of
    /// the edge set.
    #[must_use]
    pub fn distinct_relations(&self) -> usize {
        self.distinct_relations
    }

    /// Actor ids in node order.
    #[must_use]
    pub fn actors(&self) -> &[String] {
        &self.actors
    }

    /// Entity ids in entity-index order.
    #[must_use]
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Label of the entity at `entity_idx`, if any.
    #[must_use]
    pub fn entity_label(&self, entity_idx: usize) -> Option<&str> {
        self.entity_labels.get(entity_idx)?.as_deref()
    }

    /// Ids that appear both as actor and as entity.
    #[must_use]
    pub fn shared_ids(&self) -> &[String] {
        &self.shared_ids
    }

    /// Partition a node belongs to.
    #[must_use]
    pub fn partition(&self, node: NodeId) -> Partition {
        if node < self.actors.len() {
            Partition::Actor
        } else {
            Partition::Entity
        }
    }

    /// Node id of an actor or entity identifier.
    #[must_use]
    pub fn node_id(&self, partition: Partition, id: &str) -> Option<NodeId> {
        match partition {
            Partition::Actor => self.actor_index.get(id).copied(),
            Partition::Entity => self
                .entity_index
                .get(id)
                .map(|&e| self.actors.len() + e),
        }
    }

    /// Node id of the entity at `entity_idx`.
    #[must_use]
    pub fn entity_node(&self, entity_idx: usize) -> NodeId {
        self.actors.len() + entity_idx
    }

    /// Raw identifier of a node.
    #[must_use]
    pub fn id(&self, node: NodeId) -> &str {
        match self.partition(node) {
            Partition::Actor => &self.actors[node],
            Partition::Entity => &self.entities[node - self.actors.len()],
        }
    }

    /// Identifier of a node, namespaced when the id is shared by both
    /// partitions.
    #[must_use]
    pub fn display_name(&self, node: NodeId) -> String {
        let id = self.id(node);
        if self.shared_ids.binary_search_by(|s| s.as_str().cmp(id)).is_ok() {
            format!("{}{id}", self.partition(node).prefix())
        } else {
            id.to_string()
        }
    }

    /// Entity indices (not node ids) each actor relates to, indexed by actor.
    pub fn actor_neighborhoods(&self) -> impl Iterator<Item = Vec<usize>> + '_ {
        let offset = self.actors.len();
        (0..offset).map(move |a| {
            self.graph
                .neighbors(a)
                .iter()
                .map(|&node| node - offset)
                .collect()
        })
    }

    /// Node ids belonging to one partition.
    #[must_use]
    pub fn nodes(&self, partition: Partition) -> std::ops::Range<NodeId> {
        match partition {
            Partition::Actor => 0..self.actors.len(),
            Partition::Entity => self.actors.len()..self.graph.num_nodes(),
        }
    }

    /// Verifies that every edge runs from an actor to an entity.
    #[must_use]
    pub fn is_bipartite(&self) -> bool {
        self.nodes(Partition::Actor).all(|a| {
            self.graph
                .neighbors(a)
                .iter()
                .all(|&n| self.partition(n) == Partition::Entity)
        }) && self
            .nodes(Partition::Entity)
            .all(|e| self.graph.neighbors(e).is_empty())
    }
}

#[cfg(test)]
#[path = "bipartite_tests.rs"]
mod tests;
