//! Entity projection and Louvain communities

use super::InputArgs;
use crate::error::Result;
use crate::output;
use follownet::config::PipelineConfig;
use serde::Serialize;

#[derive(Serialize)]
struct CommunityResult<'a> {
    dataset: &'a str,
    entities: usize,
    edges: usize,
    isolated: usize,
    communities: usize,
    modularity: f64,
    level_modularity: &'a [f64],
    seed: u64,
    resolution: f64,
    members: Vec<Vec<&'a str>>,
}

pub(crate) fn run(
    input: &InputArgs,
    mut config: PipelineConfig,
    seed: Option<u64>,
    resolution: Option<f64>,
    show_members: bool,
    json: bool,
) -> Result<()> {
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(resolution) = resolution {
        config.resolution = resolution;
    }
    let mut pipeline = input.open(config)?;
    pipeline.build_graph()?;
    pipeline.project()?;
    pipeline.communities()?;

    let projected = pipeline.projection(true)?;
    let partition = pipeline.partition()?;
    let result = CommunityResult {
        dataset: pipeline.dataset(),
        entities: projected.num_nodes(),
        edges: projected.num_edges(),
        isolated: projected.isolated_entities().len(),
        communities: partition.n_communities,
        modularity: partition.modularity,
        level_modularity: &partition.level_modularity,
        seed: partition.seed,
        resolution: partition.resolution,
        members: partition.communities(),
    };

    if json {
        return output::json(&result);
    }

    output::section(&format!("Communities: {}", result.dataset));
    output::kv("Entities", result.entities);
    output::kv("Projected edges", result.edges);
    output::kv("Isolated entities", result.isolated);
    output::kv("Communities", result.communities);
    output::kv("Modularity", output::float(result.modularity));
    output::kv("Levels", result.level_modularity.len().saturating_sub(1));
    output::kv("Seed", result.seed);

    let mut ordered: Vec<(usize, &Vec<&str>)> = result.members.iter().enumerate().collect();
    ordered.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(&b.0)));
    output::section("Sizes");
    for (label, members) in ordered {
        if show_members {
            println!("  {label}: {} [{}]", members.len(), members.join(", "));
        } else {
            println!("  {label}: {}", members.len());
        }
    }
    Ok(())
}
