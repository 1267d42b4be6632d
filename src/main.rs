mod analysis;
mod charts;
mod color;
mod config;
mod data;
mod error;
mod pipeline;
mod report;

use std::path::Path;

use anyhow::{bail, Context};
use env_logger::Env;

use config::{AnalysisConfig, CONFIG_FILE};
use pipeline::AnalysisPipeline;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AnalysisConfig::load_or_default(Path::new(CONFIG_FILE))?;
    let pipeline = AnalysisPipeline::load(config).context("cannot start analysis")?;

    let outcome = pipeline.run();
    if !outcome.is_success() {
        let failed: Vec<String> = outcome
            .failures
            .iter()
            .map(|(stage, e)| format!("{stage}: {e}"))
            .collect();
        bail!(
            "{} of {} stages failed\n  {}",
            failed.len(),
            outcome.completed.len() + failed.len(),
            failed.join("\n  ")
        );
    }

    log::info!("analysis complete, {} stages", outcome.completed.len());
    Ok(())
}
