use std::path::PathBuf;

use clap::Args;

use relgate_core::analyze;
use relgate_core::config::RelgateConfig;
use relgate_core::render;
use tracing::info;

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Path to the analysis payload (JSON story list)
    pub payload: PathBuf,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    pub format: String,
}

pub fn run(args: &SummaryArgs, config: &RelgateConfig) -> anyhow::Result<()> {
    let context = super::load_context(&args.payload)?;
    let summary = analyze::summarize(&context, config);
    info!(
        stories = summary.plans.len(),
        risky_components = summary.risky_components,
        "Decision summary assembled"
    );

    if args.format == "json" {
        println!("{}", render::to_json(&summary)?);
    } else {
        print!("{}", render::render_summary(&summary));
    }
    Ok(())
}
