//! Single-figure diagnostic commands

use std::path::{Path, PathBuf};

use behavia_plot::{
    diagnostics::{Bouts, Diagnostics, Point3},
    session::Label,
};
use clap::Args;

use crate::{command::RunContext, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct EmbeddingArg {
    /// Path to a JSON array of `[x, y, z]` points
    pub points: PathBuf,
    /// Path to a JSON array of cluster labels, one per point
    #[arg(long)]
    pub labels: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct AccuracyArg {
    /// Path to a JSON array of cross-validated accuracy scores
    pub scores: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct DurationsArg {
    /// Path to a JSON object `{"lengths": [...], "groups": [...]}`
    pub bouts: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct TransitionMatrixArg {
    /// Path to a JSON array of matrix rows
    pub matrix: PathBuf,
    /// Camera frame rate the matrix was computed at
    #[arg(long)]
    pub fps: u32,
}

pub(crate) fn run_embedding(context: &RunContext, arg: &EmbeddingArg) -> anyhow::Result<()> {
    let points: Vec<Point3> = util::read_json_file("embedding", &arg.points)?;
    let diagnostics = diagnostics(context);
    let path = match &arg.labels {
        Some(labels) => {
            let labels: Vec<Label> = util::read_json_file("labels", labels)?;
            diagnostics.assignments(&points, &labels)?
        }
        None => diagnostics.embedding(&points)?,
    };
    report(&path);
    Ok(())
}

pub(crate) fn run_accuracy(context: &RunContext, arg: &AccuracyArg) -> anyhow::Result<()> {
    let scores: Vec<f64> = util::read_json_file("scores", &arg.scores)?;
    let path = diagnostics(context).accuracy(&scores)?;
    report(&path);
    Ok(())
}

pub(crate) fn run_durations(context: &RunContext, arg: &DurationsArg) -> anyhow::Result<()> {
    let bouts: Bouts = util::read_json_file("bouts", &arg.bouts)?;
    let path = diagnostics(context).durations(&bouts)?;
    report(&path);
    Ok(())
}

pub(crate) fn run_transition_matrix(
    context: &RunContext,
    arg: &TransitionMatrixArg,
) -> anyhow::Result<()> {
    let matrix: Vec<Vec<f64>> = util::read_json_file("transition matrix", &arg.matrix)?;
    let path = diagnostics(context).transition_matrix(&matrix, arg.fps)?;
    report(&path);
    Ok(())
}

fn diagnostics(context: &RunContext) -> Diagnostics {
    Diagnostics::new(&context.config, context.timestamp.clone())
}

fn report(path: &Path) {
    eprintln!("Saved {}", path.display());
}
