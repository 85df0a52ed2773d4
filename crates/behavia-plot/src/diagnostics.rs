//! Diagnostic plots of the training pipeline
//!
//! Besides the per-feature histograms, a training run produces a handful of
//! single-figure diagnostics:
//!
//! | Plot                | Artifact                   |
//! |---------------------|----------------------------|
//! | embedding           | `embedding`                |
//! | cluster assignments | `train_assignments`        |
//! | classifier accuracy | `clf_scores`               |
//! | bout durations      | `duration_hist_100msbins`  |
//! | transition matrix   | `transition_matrix<fps>`   |
//!
//! All artifacts of one [`Diagnostics`] share its timestamp.

use std::{ops::Range, path::PathBuf};

use behavia_stats::{
    histogram::{DensityHistogram, linspace},
    percentiles::Percentiles,
};
use plotters::{
    prelude::*,
    style::{
        FontTransform,
        full_palette::ORANGE,
        text_anchor::{HPos, Pos, VPos},
    },
};
use rand::SeedableRng as _;
use rand_distr::{Distribution as _, Normal};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    artifact::{ArtifactNamer, Timestamp},
    config::RenderConfig,
    error::RenderError,
    palette,
    session::{Label, distinct_labels},
    writer::{DrawResult, SvgArea, drawable_range, write_svg},
};

/// A point of a three-dimensional embedding.
pub type Point3 = [f64; 3];

/// Bins per group of the duration histogram.
pub const DURATION_BINS: usize = 10;

const JITTER_CENTER: f64 = 1.0;
const JITTER_STD_DEV: f64 = 0.04;
const WHISKER_SPREAD: f64 = 1.5;

/// Bout lengths and the behavior group of each bout.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Bouts {
    pub lengths: Vec<f64>,
    pub groups: Vec<Label>,
}

/// Writes the single-figure diagnostic plots.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    namer: ArtifactNamer,
    size: (u32, u32),
    holdout_fraction: f64,
    jitter_seed: u64,
}

impl Diagnostics {
    #[must_use]
    pub fn new(config: &RenderConfig, timestamp: Timestamp) -> Self {
        Self {
            namer: ArtifactNamer::new(&config.output_dir, timestamp),
            size: config.figure_size(),
            holdout_fraction: config.holdout_fraction,
            jitter_seed: config.jitter_seed,
        }
    }

    #[must_use]
    pub fn namer(&self) -> &ArtifactNamer {
        &self.namer
    }

    /// 3D scatter of an embedding.
    ///
    /// # Errors
    ///
    /// [`RenderError::NoData`] for an empty embedding, [`RenderError::Io`] if
    /// the artifact cannot be written.
    pub fn embedding(&self, points: &[Point3]) -> Result<PathBuf, RenderError> {
        if points.is_empty() {
            return Err(RenderError::NoData { plot: "embedding" });
        }
        let groups = [ScatterGroup {
            points: points.to_vec(),
            color: BLUE,
            label: None,
        }];
        self.write("embedding", |root| {
            draw_scatter_3d(root, "Embedding of the training set by t-SNE", &groups)
        })
    }

    /// 3D scatter of an embedding colored by cluster assignment.
    ///
    /// # Errors
    ///
    /// [`RenderError::ShapeMismatch`] if `labels` and `points` differ in
    /// length, [`RenderError::NoData`] for an empty embedding,
    /// [`RenderError::Io`] if the artifact cannot be written.
    pub fn assignments(&self, points: &[Point3], labels: &[Label]) -> Result<PathBuf, RenderError> {
        if points.len() != labels.len() {
            return Err(RenderError::ShapeMismatch {
                session: 1,
                observations: points.len(),
                labels: labels.len(),
            });
        }
        if points.is_empty() {
            return Err(RenderError::NoData {
                plot: "train_assignments",
            });
        }
        let distinct = distinct_labels(labels);
        let groups = distinct
            .iter()
            .zip(palette::spectral(distinct.len()))
            .map(|(&label, color)| ScatterGroup {
                points: points
                    .iter()
                    .zip(labels)
                    .filter(|(_, l)| **l == label)
                    .map(|(p, _)| *p)
                    .collect(),
                color,
                label: Some(label.to_string()),
            })
            .collect::<Vec<_>>();
        self.write("train_assignments", |root| {
            draw_scatter_3d(root, "Assignments by GMM", &groups)
        })
    }

    /// Box plot of cross-validated classifier scores with the scores overlaid.
    ///
    /// # Errors
    ///
    /// [`RenderError::NoData`] if there are no (non-NaN) scores,
    /// [`RenderError::Io`] if the artifact cannot be written.
    pub fn accuracy(&self, scores: &[f64]) -> Result<PathBuf, RenderError> {
        let stats = BoxStats::new(scores).ok_or(RenderError::NoData { plot: "clf_scores" })?;
        let jitter = jitter(scores.len(), self.jitter_seed);
        let title = accuracy_title(self.holdout_fraction);
        self.write("clf_scores", |root| {
            draw_accuracy(root, &title, &stats, scores, &jitter)
        })
    }

    /// Overlaid duration histograms, one per behavior group.
    ///
    /// # Errors
    ///
    /// [`RenderError::ShapeMismatch`] if lengths and groups differ in length,
    /// [`RenderError::NoData`] if there are no bouts, [`RenderError::Io`] if
    /// the artifact cannot be written.
    pub fn durations(&self, bouts: &Bouts) -> Result<PathBuf, RenderError> {
        if bouts.lengths.len() != bouts.groups.len() {
            return Err(RenderError::ShapeMismatch {
                session: 1,
                observations: bouts.lengths.len(),
                labels: bouts.groups.len(),
            });
        }
        let histograms = duration_histograms(bouts);
        if histograms.is_empty() {
            return Err(RenderError::NoData {
                plot: "duration_hist_100msbins",
            });
        }
        let title = format!("Duration histogram of {} behaviors", histograms.len());
        self.write("duration_hist_100msbins", |root| {
            draw_durations(root, &title, &histograms)
        })
    }

    /// Annotated heatmap of a square transition matrix.
    ///
    /// # Errors
    ///
    /// [`RenderError::NoData`] for an empty matrix, [`RenderError::NotSquare`]
    /// if a row's length differs from the number of rows, [`RenderError::Io`]
    /// if the artifact cannot be written.
    pub fn transition_matrix(&self, matrix: &[Vec<f64>], fps: u32) -> Result<PathBuf, RenderError> {
        if matrix.is_empty() {
            return Err(RenderError::NoData {
                plot: "transition_matrix",
            });
        }
        let rows = matrix.len();
        if let Some((row, columns)) = matrix
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, columns)| *columns != rows)
        {
            return Err(RenderError::NotSquare { rows, row, columns });
        }
        let title = format!("Transition matrix of {rows} behaviors");
        self.write(&format!("transition_matrix{fps}"), |root| {
            draw_heatmap(root, &title, matrix)
        })
    }

    fn write<F>(&self, base_name: &str, draw: F) -> Result<PathBuf, RenderError>
    where
        F: FnOnce(&SvgArea<'_>) -> DrawResult,
    {
        let path = self.namer.path(base_name);
        match write_svg(&path, self.size, draw) {
            Ok(()) => Ok(path),
            Err(source) => Err(RenderError::Io { path, source }),
        }
    }
}

/// Title of the accuracy plot, e.g. `Performance on 20 % data`.
#[must_use]
pub fn accuracy_title(holdout_fraction: f64) -> String {
    let percent = (holdout_fraction * 100.0 * 1e6).round() / 1e6;
    format!("Performance on {percent} % data")
}

/// Box-plot summary: quartiles, whiskers at 1.5 IQR and the points beyond.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value not below `q1 - 1.5 IQR`.
    pub whisker_low: f64,
    /// Largest value not above `q3 + 1.5 IQR`.
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Summarizes `values`, ignoring NaN. Returns `None` if nothing is left.
    #[must_use]
    pub fn new(values: &[f64]) -> Option<Self> {
        let mut sorted = values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let quartiles = Percentiles::from_sorted(&sorted, &[25.0, 50.0, 75.0]);
        let q1 = quartiles.get(25.0)?;
        let median = quartiles.get(50.0)?;
        let q3 = quartiles.get(75.0)?;
        let iqr = q3 - q1;
        let fences = (q1 - WHISKER_SPREAD * iqr)..=(q3 + WHISKER_SPREAD * iqr);

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|v| fences.contains(v))
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| fences.contains(v))
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !fences.contains(v))
            .collect();
        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

/// Horizontal positions for `count` scattered scores, drawn from
/// `Normal(1, 0.04)` with a generator seeded by `seed`.
#[must_use]
pub fn jitter(count: usize, seed: u64) -> Vec<f64> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let normal = Normal::new(JITTER_CENTER, JITTER_STD_DEV).unwrap();
    (0..count).map(|_| normal.sample(&mut rng)).collect()
}

/// Density histogram of one behavior group's bout lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupHistogram {
    pub group: Label,
    pub color: RGBColor,
    pub histogram: DensityHistogram,
}

/// Per-group histograms, ascending by group, each over the group's own range.
#[must_use]
pub fn duration_histograms(bouts: &Bouts) -> Vec<GroupHistogram> {
    let groups = distinct_labels(&bouts.groups);
    let colors = palette::spectral(groups.len());
    groups
        .into_iter()
        .zip(colors)
        .map(|(group, color)| {
            let lengths = bouts
                .lengths
                .iter()
                .zip(&bouts.groups)
                .filter(|(_, g)| **g == group)
                .map(|(l, _)| *l)
                .collect::<Vec<_>>();
            let span = drawable_range(value_range(&lengths));
            let edges = linspace(span.start, span.end, DURATION_BINS + 1);
            GroupHistogram {
                group,
                color,
                histogram: DensityHistogram::from_edges(lengths, &edges),
            }
        })
        .collect()
}

/// Min..max of the finite values, `0..1` if there are none.
fn value_range<'a, I>(values: I) -> Range<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let (low, high) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), v| {
            (low.min(*v), high.max(*v))
        });
    if low <= high { low..high } else { 0.0..1.0 }
}

fn padded(range: Range<f64>) -> Range<f64> {
    let range = drawable_range(range);
    let pad = (range.end - range.start) * 0.05;
    (range.start - pad)..(range.end + pad)
}

struct ScatterGroup {
    points: Vec<Point3>,
    color: RGBColor,
    label: Option<String>,
}

fn draw_scatter_3d(root: &SvgArea<'_>, title: &str, groups: &[ScatterGroup]) -> DrawResult {
    let axis = |i: usize| padded(value_range(groups.iter().flat_map(|g| &g.points).map(|p| &p[i])));

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 20))
        .margin(20)
        .build_cartesian_3d(axis(0), axis(1), axis(2))?;
    chart.with_projection(|mut projection| {
        projection.pitch = 1.2;
        projection.yaw = 2.4;
        projection.scale = 0.8;
        projection.into_matrix()
    });
    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.1))
        .max_light_lines(3)
        .draw()?;

    for group in groups {
        let style = group.color.mix(0.8).filled();
        let series = chart.draw_series(
            group
                .points
                .iter()
                .map(|p| Circle::new((p[0], p[1], p[2]), 2, style)),
        )?;
        if let Some(label) = &group.label {
            let color = group.color;
            series
                .label(label)
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }
    }
    if groups.iter().any(|g| g.label.is_some()) {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

fn draw_accuracy(
    root: &SvgArea<'_>,
    title: &str,
    stats: &BoxStats,
    scores: &[f64],
    jitter: &[f64],
) -> DrawResult {
    let y_range = padded(value_range(scores));
    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.5..1.5, y_range)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(0)
        .x_desc("MLP classifier")
        .y_desc("Accuracy")
        .draw()?;

    let line = BLACK.stroke_width(1);
    let (left, right) = (0.85, 1.15);
    chart.draw_series(std::iter::once(Rectangle::new(
        [(left, stats.q1), (right, stats.q3)],
        line,
    )))?;
    chart.draw_series(
        [
            vec![(1.0, stats.q1), (1.0, stats.whisker_low)],
            vec![(1.0, stats.q3), (1.0, stats.whisker_high)],
            vec![(0.925, stats.whisker_low), (1.075, stats.whisker_low)],
            vec![(0.925, stats.whisker_high), (1.075, stats.whisker_high)],
        ]
        .into_iter()
        .map(|points| PathElement::new(points, line)),
    )?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(left, stats.median), (right, stats.median)],
        ORANGE.stroke_width(2),
    )))?;
    chart.draw_series(
        stats
            .outliers
            .iter()
            .map(|&v| Circle::new((1.0, v), 3, line)),
    )?;

    let points = RED.mix(0.5).filled();
    chart.draw_series(
        jitter
            .iter()
            .zip(scores)
            .filter(|(_, s)| !s.is_nan())
            .map(|(&x, &s)| Circle::new((x, s), 4, points)),
    )?;
    Ok(())
}

fn draw_durations(root: &SvgArea<'_>, title: &str, histograms: &[GroupHistogram]) -> DrawResult {
    let x_range = drawable_range(value_range(
        histograms
            .iter()
            .flat_map(|h| h.histogram.bins.iter())
            .flat_map(|b| [&b.range.start, &b.range.end]),
    ));
    let max_density = histograms
        .iter()
        .map(|h| h.histogram.max_density())
        .fold(0.0, f64::max);
    let y_max = if max_density > 0.0 {
        max_density * 1.05
    } else {
        1.0
    };

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0.0..y_max)?;
    chart.configure_mesh().disable_mesh().draw()?;

    for group in histograms {
        let color = group.color;
        let style = color.mix(0.3).filled();
        chart
            .draw_series(group.histogram.bins.iter().map(|bin| {
                Rectangle::new([(bin.range.start, 0.0), (bin.range.end, bin.density)], style)
            }))?
            .label(format!("Group {}", group.group))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

/// Sequential white-to-red ramp for `t` in `0.0..=1.0`.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn heat_color(t: f64) -> RGBColor {
    const LOW: (f64, f64, f64) = (255.0, 245.0, 240.0);
    const HIGH: (f64, f64, f64) = (103.0, 0.0, 13.0);
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(LOW.0, HIGH.0), lerp(LOW.1, HIGH.1), lerp(LOW.2, HIGH.2))
}

#[expect(clippy::cast_possible_wrap)]
fn center_of(area: &SvgArea<'_>) -> (i32, i32) {
    let (w, h) = area.dim_in_pixel();
    ((w / 2) as i32, (h / 2) as i32)
}

fn draw_heatmap(root: &SvgArea<'_>, title: &str, matrix: &[Vec<f64>]) -> DrawResult {
    let size = matrix.len();
    let values = value_range(matrix.iter().flatten());
    let scale = |v: f64| {
        let width = values.end - values.start;
        if width > 0.0 {
            (v - values.start) / width
        } else {
            0.0
        }
    };
    let center = Pos::new(HPos::Center, VPos::Center);
    let label_style = TextStyle::from(("sans-serif", 14)).pos(center);
    let rotated = ("sans-serif", 14)
        .into_font()
        .transform(FontTransform::Rotate270);

    let body = root.titled(title, ("sans-serif", 20))?;
    let (_, body_height) = body.dim_in_pixel();
    let (top, bottom) = body.split_vertically(body_height.saturating_sub(60));
    let (y_strip, grid) = top.split_horizontally(80);
    let (_, x_strip) = bottom.split_horizontally(80);

    for (area, (row, column)) in grid
        .split_evenly((size, size))
        .iter()
        .zip((0..size).flat_map(|r| (0..size).map(move |c| (r, c))))
    {
        let value = matrix[row][column];
        let t = scale(value);
        area.fill(&heat_color(t))?;
        let ink = if t > 0.5 { WHITE } else { BLACK };
        let style = TextStyle::from(("sans-serif", 14)).pos(center).color(&ink);
        area.draw(&Text::new(format!("{value:.2}"), center_of(area), style))?;
    }

    let (y_desc, y_ticks) = y_strip.split_horizontally(30);
    for (row, area) in y_ticks.split_evenly((size, 1)).iter().enumerate() {
        area.draw(&Text::new(row.to_string(), center_of(area), label_style.clone()))?;
    }
    y_desc.draw(&Text::new(
        "Current frame behavior",
        center_of(&y_desc),
        TextStyle::from(rotated).pos(center),
    ))?;

    let (x_ticks, x_desc) = x_strip.split_vertically(30);
    for (column, area) in x_ticks.split_evenly((1, size)).iter().enumerate() {
        area.draw(&Text::new(column.to_string(), center_of(area), label_style.clone()))?;
    }
    x_desc.draw(&Text::new("Next frame behavior", center_of(&x_desc), label_style))?;
    Ok(())
}
