use super::*;
use crate::relation::RelationRecord;

fn scenario() -> RelationSet {
    RelationSet::from_pairs(&[("A1", "E1"), ("A2", "E1"), ("A2", "E2"), ("A3", "E2")])
}

#[test]
fn test_scenario_counts() {
    let g = BipartiteGraph::build(&scenario()).expect("non-empty input");
    assert_eq!(g.num_actors(), 3);
    assert_eq!(g.num_entities(), 2);
    assert_eq!(g.graph().num_nodes(), 5);
    assert_eq!(g.graph().num_edges(), 4);
    assert_eq!(g.distinct_relations(), 4);
    assert!(g.graph().is_directed());
    assert!(g.is_bipartite());
}

#[test]
fn test_node_layout_first_appearance() {
    let g = BipartiteGraph::build(&scenario()).expect("non-empty input");
    assert_eq!(g.actors(), &["A1", "A2", "A3"]);
    assert_eq!(g.entities(), &["E1", "E2"]);
    assert_eq!(g.node_id(Partition::Actor, "A2"), Some(1));
    assert_eq!(g.node_id(Partition::Entity, "E2"), Some(4));
    assert_eq!(g.node_id(Partition::Entity, "A2"), None);
    assert_eq!(g.partition(2), Partition::Actor);
    assert_eq!(g.partition(3), Partition::Entity);
    assert_eq!(g.id(3), "E1");
    assert_eq!(g.entity_node(1), 4);
    assert_eq!(g.nodes(Partition::Entity), 3..5);
}

#[test]
fn test_edges_point_actor_to_entity() {
    let g = BipartiteGraph::build(&scenario()).expect("non-empty input");
    assert_eq!(g.graph().neighbors(1), &[3, 4]);
    assert!(g.graph().neighbors(3).is_empty());
    let hoods: Vec<_> = g.actor_neighborhoods().collect();
    assert_eq!(hoods, vec![vec![0], vec![0, 1], vec![1]]);
}

#[test]
fn test_duplicates_collapse() {
    let set = RelationSet::from_pairs(&[("A1", "E1"), ("A1", "E1"), ("A2", "E1")]);
    let g = BipartiteGraph::build(&set).expect("non-empty input");
    assert_eq!(g.input_rows(), 3);
    assert_eq!(g.distinct_relations(), 2);
    assert_eq!(g.graph().num_edges(), 2);
}

#[test]
fn test_shared_id_is_namespaced() {
    let set = RelationSet::from_pairs(&[("x", "y"), ("y", "z")]);
    let g = BipartiteGraph::build(&set).expect("non-empty input");
    assert_eq!(g.shared_ids(), &["y"]);
    assert_eq!(g.graph().num_nodes(), 4);

    let actor_y = g.node_id(Partition::Actor, "y").expect("actor y");
    let entity_y = g.node_id(Partition::Entity, "y").expect("entity y");
    assert_ne!(actor_y, entity_y);
    assert_eq!(g.display_name(actor_y), "actor:y");
    assert_eq!(g.display_name(entity_y), "entity:y");
    assert_eq!(g.display_name(0), "x");
    assert!(g.is_bipartite());
}

#[test]
fn test_catalog_entity_is_isolated_node() {
    let set = scenario().with_entity("E3", Some("education".into()));
    let g = BipartiteGraph::build(&set).expect("non-empty input");
    assert_eq!(g.num_entities(), 3);
    assert_eq!(g.entity_label(2), Some("education"));
    assert_eq!(g.graph().in_degrees()[g.entity_node(2)], 0);
}

#[test]
fn test_labels_first_non_empty() {
    let set = RelationSet::from_records(vec![
        RelationRecord::new("A1", "E1"),
        RelationRecord::new("A2", "E1").with_label("information"),
    ]);
    let g = BipartiteGraph::build(&set).expect("non-empty input");
    assert_eq!(g.entity_label(0), Some("information"));
    assert_eq!(g.entity_label(7), None);
}

#[test]
fn test_empty_input_error() {
    let err = BipartiteGraph::build(&RelationSet::new()).expect_err("empty");
    assert!(matches!(err, FollownetError::EmptyInput { .. }));
}

#[test]
fn test_empty_id_validation_error() {
    let set = RelationSet::from_pairs(&[("A1", "")]);
    let err = BipartiteGraph::build(&set).expect_err("empty entity id");
    assert!(matches!(err, FollownetError::Validation { .. }));
}
