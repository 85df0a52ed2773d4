use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{semantics::FeatureSemantics, writer::SvgWriter};

/// Process-wide plotting configuration.
///
/// Every field has a default, so a configuration file only needs to name the
/// settings it changes:
///
/// ```json
/// { "output_dir": "plots", "holdout_fraction": 0.25 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory all artifacts are written to.
    pub output_dir: PathBuf,
    /// Width of every figure, in pixels.
    pub figure_width: u32,
    /// Height of one row of a stacked figure, in pixels.
    pub subplot_height: u32,
    /// Fraction of data held out when the classifier scores were computed.
    pub holdout_fraction: f64,
    /// Seed for the jitter of the accuracy scatter.
    pub jitter_seed: u64,
    /// Channel semantics of the feature matrices.
    pub semantics: FeatureSemantics,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            figure_width: 800,
            subplot_height: 200,
            holdout_fraction: 0.2,
            jitter_seed: 0,
            semantics: FeatureSemantics::default(),
        }
    }
}

impl RenderConfig {
    #[must_use]
    pub fn svg_writer(&self) -> SvgWriter {
        SvgWriter::new(self.figure_width, self.subplot_height)
    }

    /// Size of a single-panel figure.
    #[must_use]
    pub fn figure_size(&self) -> (u32, u32) {
        let height = u64::from(self.figure_width) * 3 / 4;
        (self.figure_width, u32::try_from(height).unwrap_or(u32::MAX))
    }
}
