use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;

use relgate_core::analyze;
use relgate_core::config::RelgateConfig;
use relgate_core::ingest;
use relgate_core::render;
use tracing::info;

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Path to the analysis payload (JSON story list)
    pub payload: PathBuf,

    /// Path to the production snapshot response (JSON component list)
    #[arg(long)]
    pub production: PathBuf,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    pub format: String,
}

pub fn run(args: &ClassifyArgs, config: &RelgateConfig) -> anyhow::Result<()> {
    let context = super::load_context(&args.payload)?;

    let text = std::fs::read_to_string(&args.production)
        .with_context(|| format!("Cannot read payload: {}", args.production.display()))?;
    let snapshots = ingest::parse_production_snapshots(&text).context("Ingest error")?;
    let snapshots = ingest::snapshot_index(snapshots);

    let classifications = analyze::classify_all(&context, &snapshots, config);
    info!(
        components = classifications.len(),
        "Classified components against production"
    );

    if args.format == "json" {
        println!("{}", render::to_json(&classifications)?);
    } else {
        print!("{}", render::render_classifications(&classifications));
    }
    Ok(())
}
