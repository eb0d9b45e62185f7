//! Full pipeline: graph checks, communities and correspondence analysis

use super::ca::CaOptions;
use super::InputArgs;
use crate::error::Result;
use crate::output;
use follownet::config::PipelineConfig;
use follownet::pipeline::PipelineReport;
use follownet::report::ExportPaths;
use serde::Serialize;

#[derive(Serialize)]
struct RunOutput {
    #[serde(flatten)]
    report: PipelineReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<ExportPaths>,
}

pub(crate) fn run(
    input: &InputArgs,
    mut config: PipelineConfig,
    seed: Option<u64>,
    options: &CaOptions,
    json: bool,
) -> Result<()> {
    if let Some(seed) = seed {
        config.seed = seed;
    }
    options.apply(&mut config);
    let mut pipeline = input.open(config)?;

    tracing::info!(dataset = pipeline.dataset(), "starting graph checks");
    let report = pipeline.run_all()?;
    let files = if options.no_export {
        None
    } else {
        Some(pipeline.export()?)
    };
    let out = RunOutput { report, files };

    if json {
        return output::json(&out);
    }
    print(&out);
    Ok(())
}

fn print(out: &RunOutput) {
    let report = &out.report;
    output::section(&format!("Pipeline: {}", report.dataset));
    output::kv(
        "Graph",
        format!(
            "{} nodes ({} actors, {} entities), {} edges",
            report.counts.nodes, report.counts.actors, report.counts.entities, report.counts.edges
        ),
    );
    output::check(
        report.counts.edges_match_relations,
        "edge count equals distinct relations",
    );
    output::kv(
        "Weak components",
        format!(
            "{} (largest {})",
            report.components.weak_count, report.components.largest_weak
        ),
    );
    output::kv(
        "Strong components",
        format!(
            "{} (largest {})",
            report.components.strong_count, report.components.largest_strong
        ),
    );

    output::section("Projection");
    output::kv("Entities", report.projection.nodes);
    output::kv("Edges", report.projection.edges);
    output::kv("Isolated", report.projection.isolated);
    output::kv("Max shared actors", report.projection.max_weight);

    output::section("Communities");
    output::kv("Count", report.communities.count);
    output::kv("Modularity", output::float(report.communities.modularity));
    output::kv(
        "Largest",
        report
            .communities
            .sizes
            .iter()
            .take(5)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    );

    let ca = &report.correspondence;
    output::section("Correspondence analysis");
    output::kv("Table", format!("{} x {}", ca.rows, ca.columns));
    output::kv("Dimensions", ca.dimensions);
    output::kv("Inertia", output::percents(&ca.inertia_percent));
    for warning in &ca.warnings {
        output::warning(&warning.to_string());
    }

    if let Some(files) = &out.files {
        output::section("Files");
        output::kv("Rows", files.rows.display());
        output::kv("Columns", files.columns.display());
    }
}
