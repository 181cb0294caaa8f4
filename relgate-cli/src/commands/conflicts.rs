use std::path::PathBuf;

use chrono::Utc;
use clap::Args;

use relgate_core::analyze;
use relgate_core::config::RelgateConfig;
use relgate_core::render;
use tracing::info;

#[derive(Args, Debug)]
pub struct ConflictsArgs {
    /// Path to the analysis payload (JSON story list)
    pub payload: PathBuf,

    /// Minimum distinct stories for a conflict (overrides config)
    #[arg(long)]
    pub min_stories: Option<usize>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    pub format: String,
}

pub fn run(args: &ConflictsArgs, config: &RelgateConfig) -> anyhow::Result<()> {
    let context = super::load_context(&args.payload)?;
    let min_stories = args.min_stories.unwrap_or(config.conflict.min_stories);
    if min_stories == 0 {
        anyhow::bail!("--min-stories must be at least 1");
    }
    let conflicts = analyze::detect_conflicts(&context, min_stories, Utc::now());
    info!(count = conflicts.len(), min_stories, "Conflict detection complete");

    if args.format == "json" {
        println!("{}", render::to_json(&conflicts)?);
    } else {
        print!("{}", render::render_conflicts(&conflicts));
    }
    Ok(())
}
