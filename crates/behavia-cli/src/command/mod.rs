use std::path::PathBuf;

use behavia_plot::{
    artifact::{Clock as _, SystemClock, Timestamp},
    config::RenderConfig,
};
use clap::{Args, Parser, Subcommand};

use self::{
    diagnostics::{AccuracyArg, DurationsArg, EmbeddingArg, TransitionMatrixArg},
    feature_hist::FeatureHistArg,
};
use crate::util;

mod diagnostics;
mod feature_hist;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(flatten)]
    global: GlobalArg,
    /// What plot to render
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Args)]
struct GlobalArg {
    /// Path to a JSON render configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory to write artifacts to (overrides the configuration file)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,
    /// Fixed artifact timestamp suffix, e.g. `_20240131_0905` (defaults to the local time)
    #[arg(long, global = true)]
    timestamp: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Per-feature histograms split by cluster label
    FeatureHist(#[clap(flatten)] FeatureHistArg),
    /// 3D scatter of an embedding, colored by label if labels are given
    Embedding(#[clap(flatten)] EmbeddingArg),
    /// Box plot of cross-validated classifier scores
    Accuracy(#[clap(flatten)] AccuracyArg),
    /// Bout duration histogram per behavior group
    Durations(#[clap(flatten)] DurationsArg),
    /// Annotated heatmap of a behavior transition matrix
    TransitionMatrix(#[clap(flatten)] TransitionMatrixArg),
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub(crate) struct RunContext {
    pub config: RenderConfig,
    /// Captured once, so every artifact of a run carries the same suffix.
    pub timestamp: Timestamp,
}

impl RunContext {
    fn new(arg: &GlobalArg) -> anyhow::Result<Self> {
        let mut config = match &arg.config {
            Some(path) => util::read_json_file("render configuration", path)?,
            None => RenderConfig::default(),
        };
        if let Some(output_dir) = &arg.output_dir {
            config.output_dir.clone_from(output_dir);
        }
        util::ensure_dir(&config.output_dir)?;

        let timestamp = match &arg.timestamp {
            Some(suffix) => Timestamp::fixed(suffix.as_str()),
            None => SystemClock.now(),
        };
        log::debug!(
            "writing to {} with timestamp {timestamp}",
            config.output_dir.display()
        );
        Ok(Self { config, timestamp })
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let context = RunContext::new(&args.global)?;
    match args.mode {
        Mode::FeatureHist(arg) => feature_hist::run(&context, &arg)?,
        Mode::Embedding(arg) => diagnostics::run_embedding(&context, &arg)?,
        Mode::Accuracy(arg) => diagnostics::run_accuracy(&context, &arg)?,
        Mode::Durations(arg) => diagnostics::run_durations(&context, &arg)?,
        Mode::TransitionMatrix(arg) => diagnostics::run_transition_matrix(&context, &arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = CommandArgs::try_parse_from([
            "behavia",
            "transition-matrix",
            "tm.json",
            "--fps",
            "60",
            "--output-dir",
            "plots",
            "--timestamp",
            "_X",
        ])
        .unwrap();
        assert_eq!(args.global.output_dir, Some(PathBuf::from("plots")));
        assert_eq!(args.global.timestamp.as_deref(), Some("_X"));
        assert!(matches!(args.mode, Mode::TransitionMatrix(_)));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(CommandArgs::try_parse_from(["behavia"]).is_err());
    }
}
