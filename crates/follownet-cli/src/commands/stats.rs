//! Graph statistics: counts, components, degree CCDFs, top entities

use super::InputArgs;
use crate::error::Result;
use crate::output;
use follownet::config::PipelineConfig;
use follownet::graph::{
    ComponentReport, CountReport, DegreeDistribution, EntityCentrality, Partition,
};
use serde::Serialize;

#[derive(Serialize)]
struct StatsResult {
    dataset: String,
    counts: CountReport,
    components: ComponentReport,
    actor_degrees: DegreeDistribution,
    entity_degrees: DegreeDistribution,
    top_entities: Vec<EntityCentrality>,
}

pub(crate) fn run(
    input: &InputArgs,
    mut config: PipelineConfig,
    top_k: Option<usize>,
    json: bool,
) -> Result<()> {
    if let Some(k) = top_k {
        config.top_k = k;
    }
    let mut pipeline = input.open(config)?;
    pipeline.build_graph()?;

    let result = StatsResult {
        dataset: pipeline.dataset().to_string(),
        counts: pipeline.counts()?,
        components: pipeline.components()?,
        actor_degrees: pipeline.degree_distribution(Partition::Actor)?,
        entity_degrees: pipeline.degree_distribution(Partition::Entity)?,
        top_entities: pipeline.top_entities()?,
    };

    if json {
        return output::json(&result);
    }
    print(&result);
    Ok(())
}

fn print(result: &StatsResult) {
    let counts = &result.counts;
    output::section(&format!("Graph: {}", result.dataset));
    output::kv("Nodes", counts.nodes);
    output::kv("Actors", counts.actors);
    output::kv("Entities", counts.entities);
    output::kv("Edges", counts.edges);
    output::kv("Input rows", counts.input_rows);
    output::check(
        counts.edges_match_relations,
        "edge count equals distinct relations",
    );
    output::check(counts.edges_match_rows, "edge count equals input rows");

    let components = &result.components;
    output::section("Components");
    output::kv(
        "Weak",
        format!(
            "{} (largest {})",
            components.weak_count, components.largest_weak
        ),
    );
    output::kv(
        "Strong",
        format!(
            "{} (largest {})",
            components.strong_count, components.largest_strong
        ),
    );
    output::check(components.is_weakly_connected, "graph is weakly connected");

    output::section("Degrees");
    for (name, dist) in [
        ("Actor out-degree", &result.actor_degrees),
        ("Entity in-degree", &result.entity_degrees),
    ] {
        output::kv(
            name,
            format!(
                "mean {} max {} ({} with degree 0)",
                output::float(dist.mean_degree),
                dist.max_degree,
                dist.zero_degree
            ),
        );
    }

    output::section("Top entities by in-degree");
    for (rank, entity) in result.top_entities.iter().enumerate() {
        let label = entity.label.as_deref().unwrap_or("-");
        println!(
            "  {}. {} [{}] in-degree {} centrality {}",
            rank + 1,
            entity.entity,
            label,
            entity.in_degree,
            output::float(entity.centrality)
        );
    }
}
