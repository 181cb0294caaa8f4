use std::path::PathBuf;

use clap::Args;

use relgate_core::analyze;
use relgate_core::config::RelgateConfig;
use relgate_core::render;
use tracing::info;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the analysis payload (JSON story list)
    pub payload: PathBuf,

    /// Story id to plan a rollback for
    #[arg(long)]
    pub story: String,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    pub format: String,
}

pub fn run(args: &PlanArgs, config: &RelgateConfig) -> anyhow::Result<()> {
    let context = super::load_context(&args.payload)?;
    let story = context
        .story(&args.story)
        .ok_or_else(|| anyhow::anyhow!("Story not found: {}", args.story))?;

    let plan = analyze::plan_story(story, &context, config);
    info!(
        story = %plan.story_id,
        entries = plan.entries.len(),
        "Rollback plan synthesized"
    );

    if args.format == "json" {
        println!("{}", render::to_json(&plan)?);
    } else {
        print!("{}", render::render_plan(&plan));
    }
    Ok(())
}
