pub mod classify;
pub mod conflicts;
pub mod plan;
pub mod summary;

use std::path::Path;

use anyhow::Context as _;
use clap::Subcommand;
use tracing::debug;

use relgate_core::config::RelgateConfig;
use relgate_core::context::AnalysisContext;
use relgate_core::ingest;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List components edited by multiple in-flight stories
    Conflicts(conflicts::ConflictsArgs),
    /// Classify each component against the production baseline
    Classify(classify::ClassifyArgs),
    /// Show the rollback plan for one story
    Plan(plan::PlanArgs),
    /// Show rollback plans and recommendations for every story
    Summary(summary::SummaryArgs),
}

pub fn run(cmd: Command, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = RelgateConfig::load_or_default(config_path)?;
    match cmd {
        Command::Conflicts(args) => conflicts::run(&args, &config),
        Command::Classify(args) => classify::run(&args, &config),
        Command::Plan(args) => plan::run(&args, &config),
        Command::Summary(args) => summary::run(&args, &config),
    }
}

/// Read and index an analysis payload file.
pub fn load_context(payload: &Path) -> anyhow::Result<AnalysisContext> {
    let text = std::fs::read_to_string(payload)
        .with_context(|| format!("Cannot read payload: {}", payload.display()))?;
    let stories = ingest::parse_analysis(&text).context("Ingest error")?;
    let context = AnalysisContext::build(stories);
    debug!(
        stories = context.story_count(),
        components = context.component_count(),
        "Indexed analysis payload"
    );
    Ok(context)
}
