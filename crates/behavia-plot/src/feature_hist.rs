//! Per-feature histograms split by cluster label
//!
//! For every session and every feature channel, one figure is produced with
//! one stacked subplot per distinct label of the session:
//!
//! ```text
//! ┌ Distance between points 1 & 5 pixels ┐
//! │ Group 0   ▁▃▇▅▂                      │  <- smallest label on top
//! │ Group 1      ▂▅▇▃▁                   │
//! │ Group 4         ▁▂▆▇▃                │
//! └ 0 ──────────────────────────── high ─┘  <- only the bottom row has x ticks
//! ```
//!
//! The bin range is computed once per channel from all of its observations
//! and reused for every label, so subplots share x bounds and bin edges.
//! Colors are assigned by label rank. Artifacts are named
//! `feat<M>_hist` (single session) or `sess<N>_feat<M>_hist` (multi session),
//! both 1-based, followed by the timestamp captured at the start of the call.

use std::path::{Path, PathBuf};

use behavia_stats::histogram::DensityHistogram;
use plotters::style::RGBColor;

use crate::{
    artifact::{ArtifactNamer, Clock, SystemClock},
    bin_range::{BinRange, RangeError},
    canvas::{Canvas, Viewer},
    config::RenderConfig,
    error::RenderError,
    figure::{Axis, HistogramLayer},
    palette,
    semantics::{FeatureChannel, FeatureSemantics},
    session::{Label, PreparedSession, SessionInput},
    writer::{ArtifactWriter, SvgWriter},
};

/// One rendered (session, channel) figure.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArtifact {
    /// 1-based session number in multi-session mode.
    pub session: Option<usize>,
    /// 0-based feature channel index.
    pub channel: usize,
    pub base_name: String,
    pub path: PathBuf,
    pub title: String,
    pub range: BinRange,
    /// One panel per distinct label, top to bottom.
    pub panels: Vec<LabelPanel>,
}

/// The subplot of one label within a [`RenderedArtifact`].
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPanel {
    pub label: Label,
    pub color: RGBColor,
    pub histogram: DensityHistogram,
    pub shows_x_ticks: bool,
}

/// Outcome of a render call.
///
/// Channels without a usable range (no finite observations, or a
/// zero-anchored channel lying entirely below zero) do not abort the call;
/// they are reported in `channel_errors` while the remaining channels are
/// still rendered.
#[derive(Debug, Default)]
pub struct RenderSummary {
    pub artifacts: Vec<RenderedArtifact>,
    pub channel_errors: Vec<RenderError>,
}

impl RenderSummary {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.channel_errors.is_empty()
    }
}

/// Base file name of the figure for `channel` (0-based) of `session`.
///
/// # Examples
///
/// ```
/// # use behavia_plot::feature_hist::artifact_base_name;
/// assert_eq!(artifact_base_name(None, 0), "feat1_hist");
/// assert_eq!(artifact_base_name(Some(2), 5), "sess2_feat6_hist");
/// ```
#[must_use]
pub fn artifact_base_name(session: Option<usize>, channel: usize) -> String {
    match session {
        Some(session) => format!("sess{session}_feat{}_hist", channel + 1),
        None => format!("feat{}_hist", channel + 1),
    }
}

/// Renders per-feature, per-label density histograms.
#[derive(Debug)]
pub struct FeatureHistogramRenderer<W = SvgWriter, C = SystemClock> {
    semantics: FeatureSemantics,
    output_dir: PathBuf,
    writer: W,
    clock: C,
}

impl FeatureHistogramRenderer {
    #[must_use]
    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(
            config.semantics.clone(),
            config.output_dir.clone(),
            config.svg_writer(),
            SystemClock,
        )
    }
}

impl<W, C> FeatureHistogramRenderer<W, C>
where
    W: ArtifactWriter,
    C: Clock,
{
    #[must_use]
    pub fn new(
        semantics: FeatureSemantics,
        output_dir: impl Into<PathBuf>,
        writer: W,
        clock: C,
    ) -> Self {
        Self {
            semantics,
            output_dir: output_dir.into(),
            writer,
            clock,
        }
    }

    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> FeatureHistogramRenderer<W, C2>
    where
        C2: Clock,
    {
        FeatureHistogramRenderer {
            semantics: self.semantics,
            output_dir: self.output_dir,
            writer: self.writer,
            clock,
        }
    }

    #[must_use]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Renders one figure per (session, channel) and writes each as an artifact.
    ///
    /// All sessions are validated before the first figure is opened.
    ///
    /// # Errors
    ///
    /// * [`RenderError::NoSessions`], [`RenderError::ShapeMismatch`] or
    ///   [`RenderError::SemanticsMismatch`] if the input is invalid; nothing is
    ///   rendered
    /// * [`RenderError::Io`] if writing an artifact fails; the failing figure
    ///   has already been shown and later figures are not rendered
    pub fn render<V>(
        &mut self,
        canvas: &mut Canvas<V>,
        input: &SessionInput,
    ) -> Result<RenderSummary, RenderError>
    where
        V: Viewer,
    {
        let sessions = input.normalize()?;
        for session in &sessions {
            let actual = session.session.features.num_channels();
            if actual != self.semantics.len() {
                return Err(RenderError::SemanticsMismatch {
                    session: session.number(),
                    expected: self.semantics.len(),
                    actual,
                });
            }
        }

        let namer = ArtifactNamer::new(&self.output_dir, self.clock.now());
        let mut summary = RenderSummary::default();
        for session in &sessions {
            let colors = palette::spectral(session.labels.len());
            for (channel, semantics) in self.semantics.channels().iter().enumerate() {
                let samples = session.session.features.channel(channel);
                let range = match BinRange::compute(samples, semantics.anchor) {
                    Ok(range) => range,
                    Err(err) => {
                        log::warn!(
                            "session {}: skipping feature channel {}: {err}",
                            session.number(),
                            channel + 1
                        );
                        summary.channel_errors.push(match err {
                            RangeError::Empty => RenderError::EmptyChannel {
                                session: session.number(),
                                channel,
                            },
                            RangeError::Invalid { low, high } => RenderError::InvalidRange {
                                session: session.number(),
                                channel,
                                low,
                                high,
                            },
                        });
                        continue;
                    }
                };
                let artifact = Self::compose(
                    &mut self.writer,
                    canvas,
                    session,
                    channel,
                    semantics,
                    range,
                    &colors,
                    &namer,
                )?;
                summary.artifacts.push(artifact);
            }
        }
        Ok(summary)
    }

    #[expect(clippy::too_many_arguments)]
    fn compose<V>(
        writer: &mut W,
        canvas: &mut Canvas<V>,
        session: &PreparedSession<'_>,
        channel: usize,
        semantics: &FeatureChannel,
        range: BinRange,
        colors: &[RGBColor],
        namer: &ArtifactNamer,
    ) -> Result<RenderedArtifact, RenderError>
    where
        V: Viewer,
    {
        let rows = session.labels.len();
        let title = semantics.title();
        let base_name = artifact_base_name(session.ordinal, channel);
        log::debug!("{base_name}: {rows} labels, range {:?}", range.span());

        let mut figure = canvas.new_figure();
        figure.set_title(title.clone());
        let mut panels = Vec::with_capacity(rows);
        for (rank, (&label, &color)) in session.labels.iter().zip(colors).enumerate() {
            let axes = figure.add_subplot(rows, rank + 1);
            let histogram = range.histogram(session.samples_for(channel, label));
            figure.draw_histogram(
                axes,
                HistogramLayer::opaque(histogram.clone(), color),
                range.span(),
            );
            figure.set_axis_label(axes, Axis::Y, format!("Group {label}"));
            let shows_x_ticks = rank + 1 == rows;
            if !shows_x_ticks {
                figure.suppress_x_ticks(axes);
            }
            panels.push(LabelPanel {
                label,
                color,
                histogram,
                shows_x_ticks,
            });
        }
        figure.show();

        let path = namer.path(&base_name);
        writer
            .write_artifact(figure.figure(), &path)
            .map_err(|source| RenderError::Io {
                path: path.clone(),
                source,
            })?;

        Ok(RenderedArtifact {
            session: session.ordinal,
            channel,
            base_name,
            path,
            title,
            range,
            panels,
        })
    }
}
