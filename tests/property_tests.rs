//! Property-based tests using proptest.
//!
//! These tests check the structural invariants of graph building,
//! projection, community detection and correspondence analysis on random
//! follower networks.

use follownet::prelude::*;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

// Random relation lists over small id spaces, so repeats and shared actors are common
fn relations_strategy() -> impl Strategy<Value = Vec<(u8, u8)>> {
    proptest::collection::vec((0u8..12, 0u8..8), 1..60)
}

fn to_set(pairs: &[(u8, u8)]) -> RelationSet {
    let named: Vec<(String, String)> = pairs
        .iter()
        .map(|&(a, e)| (format!("a{a}"), format!("e{e}")))
        .collect();
    RelationSet::from_pairs(&named)
}

fn followers(pairs: &[(u8, u8)], entity: u8) -> HashSet<u8> {
    pairs
        .iter()
        .filter(|&&(_, e)| e == entity)
        .map(|&(a, _)| a)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn edge_count_equals_distinct_pairs(pairs in relations_strategy()) {
        let set = to_set(&pairs);
        let graph = BipartiteGraph::build(&set).expect("non-empty input");
        let distinct: HashSet<_> = pairs.iter().collect();
        prop_assert_eq!(graph.graph().num_edges(), distinct.len());
        prop_assert_eq!(graph.distinct_relations(), distinct.len());
        prop_assert!(graph.is_bipartite());
    }

    #[test]
    fn projection_weight_counts_shared_actors(pairs in relations_strategy()) {
        let set = to_set(&pairs);
        let graph = BipartiteGraph::build(&set).expect("non-empty input");
        let weighted = project_weighted(&graph);
        let unweighted = project_unweighted(&graph);

        let entities: BTreeSet<u8> = pairs.iter().map(|&(_, e)| e).collect();
        for &x in &entities {
            for &y in &entities {
                if x == y {
                    continue;
                }
                let (nx, ny) = (format!("e{x}"), format!("e{y}"));
                let shared = followers(&pairs, x).intersection(&followers(&pairs, y)).count();
                let expected = (shared > 0).then_some(shared as f64);
                prop_assert_eq!(weighted.weight(&nx, &ny), expected);
                prop_assert_eq!(weighted.weight(&nx, &ny), weighted.weight(&ny, &nx));
                prop_assert_eq!(unweighted.weight(&nx, &ny).is_some(), shared > 0);
            }
        }
        prop_assert_eq!(weighted.num_edges(), unweighted.num_edges());
    }

    #[test]
    fn every_entity_gets_one_community(pairs in relations_strategy(), seed in 0u64..1000) {
        let set = to_set(&pairs);
        let graph = BipartiteGraph::build(&set).expect("non-empty input");
        let projected = project_weighted(&graph);
        let partition = Louvain::new()
            .with_seed(seed)
            .detect(&projected)
            .expect("valid resolution");

        prop_assert_eq!(partition.labels.len(), projected.num_nodes());
        let used: BTreeSet<usize> = partition.labels.iter().copied().collect();
        prop_assert_eq!(used.len(), partition.n_communities);
        prop_assert!(used.iter().all(|&l| l < partition.n_communities));
        prop_assert_eq!(partition.sizes().iter().sum::<usize>(), projected.num_nodes());
    }

    #[test]
    fn level_modularity_never_decreases(pairs in relations_strategy(), seed in 0u64..1000) {
        let set = to_set(&pairs);
        let graph = BipartiteGraph::build(&set).expect("non-empty input");
        let partition = Louvain::new()
            .with_seed(seed)
            .detect(&project_weighted(&graph))
            .expect("valid resolution");

        for step in partition.level_modularity.windows(2) {
            prop_assert!(step[1] >= step[0] - 1e-9);
        }
        if let Some(&last) = partition.level_modularity.last() {
            prop_assert!((last - partition.modularity).abs() < 1e-9);
        }
    }

    #[test]
    fn inertia_percent_is_bounded_and_sorted(pairs in relations_strategy()) {
        let set = to_set(&pairs);
        let table = ContingencyTable::from_relations(&set).expect("non-empty input");
        let result = match CorrespondenceAnalysis::default().fit(&table) {
            Ok(result) => result,
            // Single row or column after margin filtering
            Err(FollownetError::EmptyInput { .. }) => return Ok(()),
            Err(e) => return Err(TestCaseError::fail(e.to_string())),
        };

        let total: f64 = result.inertia_percent.iter().sum();
        prop_assert!(total <= 100.0 + 1e-6);
        for step in result.inertia_percent.windows(2) {
            prop_assert!(step[1] <= step[0] + 1e-9);
        }
        prop_assert!(result.singular_values.iter().all(|&s| s > 0.0 && s <= 1.0 + 1e-9));
        prop_assert!(result.total_inertia >= 0.0);
    }

    #[test]
    fn gram_backend_matches_full(pairs in relations_strategy()) {
        let set = to_set(&pairs);
        let table = ContingencyTable::from_relations(&set).expect("non-empty input");
        let full = CorrespondenceAnalysis::new(3).fit(&table);
        let gram = CorrespondenceAnalysis::new(3).with_method(SvdMethod::Gram).fit(&table);
        let (Ok(full), Ok(gram)) = (full, gram) else {
            return Ok(());
        };

        // Gram uses a looser rank cut, so compare the shared leading dimensions
        let k = full.n_dimensions().min(gram.n_dimensions());
        for (a, b) in full.singular_values[..k].iter().zip(&gram.singular_values[..k]) {
            prop_assert!((a - b).abs() < 1e-6);
        }
    }
}
