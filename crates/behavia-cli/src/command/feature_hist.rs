//! Per-feature histogram command
//!
//! Reads a session file and writes one figure per session and feature
//! channel. Channels that could not be rendered are listed at the end and
//! make the command fail after the remaining figures have been written.

use std::path::PathBuf;

use behavia_plot::{
    artifact::FixedClock, canvas::Canvas, feature_hist::FeatureHistogramRenderer,
    session::SessionInput,
};
use clap::Args;

use crate::{command::RunContext, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct FeatureHistArg {
    /// Path to the sessions JSON file (`{"single": {...}}` or `{"multi": [...]}`)
    pub sessions: PathBuf,
}

pub(crate) fn run(context: &RunContext, arg: &FeatureHistArg) -> anyhow::Result<()> {
    let input: SessionInput = util::read_json_file("sessions", &arg.sessions)?;

    let mut renderer = FeatureHistogramRenderer::from_config(&context.config)
        .with_clock(FixedClock(context.timestamp.clone()));
    let mut canvas: Canvas = Canvas::default();
    let summary = renderer.render(&mut canvas, &input)?;

    for artifact in &summary.artifacts {
        eprintln!(
            "{}: {} ({} labels, range {:.3}..{:.3})",
            artifact.base_name,
            artifact.path.display(),
            artifact.panels.len(),
            artifact.range.low,
            artifact.range.high,
        );
    }
    eprintln!("Wrote {} figures", summary.artifacts.len());

    if !summary.is_complete() {
        for err in &summary.channel_errors {
            eprintln!("  {err}");
        }
        anyhow::bail!(
            "{} feature channels could not be rendered",
            summary.channel_errors.len()
        );
    }
    Ok(())
}
