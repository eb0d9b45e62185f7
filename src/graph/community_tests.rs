use super::*;
use crate::graph::{project_weighted, BipartiteGraph};
use crate::relation::RelationSet;

fn two_triangles() -> Graph {
    Graph::from_edges(
        &[
            (0, 1),
            (1, 2),
            (2, 0), // Triangle 1
            (3, 4),
            (4, 5),
            (5, 3), // Triangle 2
            (2, 3), // Connection
        ],
        false,
    )
}

#[test]
fn test_louvain_empty_graph() {
    let labels = Louvain::new()
        .detect_graph(&Graph::new(false))
        .expect("undirected");
    assert!(labels.is_empty());
}

#[test]
fn test_louvain_two_nodes() {
    let g = Graph::from_edges(&[(0, 1)], false);
    let labels = Louvain::new().detect_graph(&g).expect("undirected");
    assert_eq!(labels, vec![0, 0]);
}

#[test]
fn test_louvain_two_triangles_connected() {
    let labels = Louvain::new()
        .detect_graph(&two_triangles())
        .expect("undirected");
    assert_eq!(labels[0], labels[1]);
    assert_eq!(labels[1], labels[2]);
    assert_eq!(labels[3], labels[4]);
    assert_eq!(labels[4], labels[5]);
    assert_ne!(labels[0], labels[3]);
}

#[test]
fn test_louvain_disconnected_cliques() {
    let g = Graph::from_edges(&[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)], false);
    let labels = Louvain::new().detect_graph(&g).expect("undirected");
    assert_ne!(labels[0], labels[3]);
    assert_eq!(labels.iter().max(), Some(&1));
}

#[test]
fn test_louvain_isolated_nodes_are_singletons() {
    let g = Graph::from_edges_with_nodes(5, &[(0, 1), (1, 2), (2, 0)], false);
    let labels = Louvain::new().detect_graph(&g).expect("undirected");
    assert_eq!(labels[0], labels[2]);
    assert_ne!(labels[3], labels[4]);
    assert_ne!(labels[3], labels[0]);
    assert_ne!(labels[4], labels[0]);
}

#[test]
fn test_louvain_edgeless_graph() {
    let g = Graph::from_edges_with_nodes(3, &[], false);
    let labels = Louvain::new().detect_graph(&g).expect("undirected");
    assert_eq!(labels, vec![0, 1, 2]);
}

#[test]
fn test_louvain_rejects_directed() {
    let g = Graph::from_edges(&[(0, 1)], true);
    let err = Louvain::new().detect_graph(&g).expect_err("directed");
    assert!(matches!(err, FollownetError::Validation { .. }));
}

#[test]
fn test_louvain_rejects_bad_resolution() {
    let g = Graph::from_edges(&[(0, 1)], false);
    assert!(Louvain::new().with_resolution(0.0).detect_graph(&g).is_err());
    assert!(Louvain::new()
        .with_resolution(f64::NAN)
        .detect_graph(&g)
        .is_err());
}

#[test]
fn test_detect_rejects_bad_resolution() {
    let set = RelationSet::from_pairs(&[("a1", "E1"), ("a1", "E2"), ("a2", "E2")]);
    let projected = project_weighted(&BipartiteGraph::build(&set).expect("non-empty input"));

    for resolution in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
        let err = Louvain::new()
            .with_resolution(resolution)
            .detect(&projected)
            .expect_err("invalid resolution");
        assert!(matches!(err, FollownetError::Validation { .. }));
    }
    assert!(Louvain::new().with_resolution(0.5).detect(&projected).is_ok());
}

#[test]
fn test_louvain_weighted_split() {
    // Heavy pairs (0,1) and (2,3) joined by light edges
    let g = Graph::from_weighted_edges(
        &[(0, 1, 10.0), (2, 3, 10.0), (1, 2, 1.0), (0, 3, 1.0)],
        false,
    );
    let labels = Louvain::new().detect_graph(&g).expect("undirected");
    assert_eq!(labels[0], labels[1]);
    assert_eq!(labels[2], labels[3]);
    assert_ne!(labels[0], labels[2]);
}

#[test]
fn test_louvain_ring_of_cliques_multi_level() {
    // Ring of six 4-cliques: classic multi-level case
    let mut edges = Vec::new();
    for c in 0..6 {
        let base = c * 4;
        for i in 0..4 {
            for j in (i + 1)..4 {
                edges.push((base + i, base + j));
            }
        }
        edges.push((base + 3, ((c + 1) % 6) * 4));
    }
    let g = Graph::from_edges(&edges, false);
    let labels = Louvain::new().detect_graph(&g).expect("undirected");

    for c in 0..6 {
        let base = c * 4;
        assert!((base..base + 4).all(|v| labels[v] == labels[base]));
    }
    let q = g.modularity(&labels, 1.0);
    assert!(q > 0.5, "modularity {q}");
}

#[test]
fn test_detect_on_projection() {
    // Two groups of entities co-followed within, one bridge actor
    let set = RelationSet::from_pairs(&[
        ("a1", "E1"),
        ("a1", "E2"),
        ("a2", "E1"),
        ("a2", "E2"),
        ("a3", "E2"),
        ("a3", "E3"),
        ("a4", "E4"),
        ("a4", "E5"),
        ("a5", "E4"),
        ("a5", "E5"),
        ("a6", "E5"),
        ("a6", "E6"),
        ("a7", "E3"),
        ("a7", "E1"),
        ("a8", "E6"),
        ("a8", "E4"),
        ("bridge", "E3"),
        ("bridge", "E4"),
    ])
    .with_entity("E7", None);
    let g = BipartiteGraph::build(&set).expect("non-empty input");
    let projected = project_weighted(&g);
    let partition = Louvain::new()
        .with_seed(3)
        .detect(&projected)
        .expect("valid resolution");

    assert_eq!(partition.labels.len(), 7);
    assert_eq!(partition.label_of("E1"), partition.label_of("E2"));
    assert_eq!(partition.label_of("E2"), partition.label_of("E3"));
    assert_eq!(partition.label_of("E4"), partition.label_of("E5"));
    assert_ne!(partition.label_of("E1"), partition.label_of("E4"));
    assert_eq!(partition.label_of("missing"), None);

    // Isolated E7 is a singleton community
    let e7 = partition.label_of("E7").expect("E7 labelled");
    assert_eq!(partition.labels.iter().filter(|&&l| l == e7).count(), 1);

    assert_eq!(partition.n_communities, 3);
    assert_eq!(partition.sizes().iter().sum::<usize>(), 7);
    assert_eq!(partition.communities().len(), 3);
}

#[test]
fn test_level_modularity_non_decreasing_and_matches_final() {
    let g = BipartiteGraph::build(&RelationSet::from_pairs(&[
        ("a", "E1"),
        ("a", "E2"),
        ("b", "E2"),
        ("b", "E3"),
        ("c", "E3"),
        ("c", "E1"),
        ("d", "E4"),
        ("d", "E5"),
        ("e", "E5"),
        ("e", "E6"),
        ("f", "E6"),
        ("f", "E4"),
        ("g", "E1"),
        ("g", "E4"),
    ]))
    .expect("non-empty input");
    let partition = Louvain::new()
        .detect(&project_weighted(&g))
        .expect("valid resolution");

    let levels = &partition.level_modularity;
    assert!(levels.len() >= 2);
    assert!(levels.windows(2).all(|w| w[1] >= w[0] - 1e-12));
    let last = levels.last().copied().unwrap_or_default();
    assert!((last - partition.modularity).abs() < 1e-9);
}

#[test]
fn test_same_seed_same_partition() {
    let g = two_triangles();
    let a = Louvain::new().with_seed(11).detect_graph(&g).expect("undirected");
    let b = Louvain::new().with_seed(11).detect_graph(&g).expect("undirected");
    assert_eq!(a, b);
}

#[test]
fn test_labels_contiguous_first_appearance() {
    let g = Graph::from_edges_with_nodes(4, &[(2, 3)], false);
    let labels = Louvain::new().detect_graph(&g).expect("undirected");
    assert_eq!(labels, vec![0, 1, 2, 2]);
}

#[test]
fn test_renumber() {
    assert_eq!(renumber(&[5, 5, 2, 9, 2]), (vec![0, 0, 1, 2, 1], 3));
}

#[test]
fn test_aggregate_preserves_total_weight() {
    let level = Level::from_graph(&two_triangles());
    let merged = level.aggregate(&[0, 0, 0, 1, 1, 1], 2);
    assert!((merged.two_m - level.two_m).abs() < 1e-12);
    assert_eq!(merged.loops, vec![3.0, 3.0]);
    assert_eq!(merged.adj[0], vec![(1, 1.0)]);
    let q_direct = two_triangles().modularity(&[0, 0, 0, 1, 1, 1], 1.0);
    assert!((merged.singleton_modularity(1.0) - q_direct).abs() < 1e-12);
}
