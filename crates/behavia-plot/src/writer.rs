//! SVG output
//!
//! Figures are drawn with `plotters` into an in-memory SVG document first and
//! written to disk afterwards, so drawing failures and file-system failures
//! surface separately and a failed write never leaves a half-drawn file.

use std::{fmt, fs, io, ops::Range, path::Path};

use plotters::{coord::Shift, drawing::DrawingAreaErrorKind, prelude::*};

use crate::figure::{Figure, Subplot};

/// Result of drawing onto an SVG drawing area.
pub type DrawResult = Result<(), DrawingAreaErrorKind<io::Error>>;

/// Root drawing area of an SVG document.
pub type SvgArea<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const TITLE_HEIGHT: u32 = 40;

/// Persists a finished figure.
pub trait ArtifactWriter {
    fn write_artifact(&mut self, figure: &Figure, path: &Path) -> io::Result<()>;
}

/// Writes figures as SVG files.
#[derive(Debug, Clone, Copy)]
pub struct SvgWriter {
    pub width: u32,
    /// Height of each row of the subplot grid.
    pub subplot_height: u32,
}

impl Default for SvgWriter {
    fn default() -> Self {
        Self {
            width: 800,
            subplot_height: 200,
        }
    }
}

impl SvgWriter {
    #[must_use]
    pub fn new(width: u32, subplot_height: u32) -> Self {
        Self {
            width,
            subplot_height,
        }
    }

    /// Height of a figure with `rows` stacked subplots, saturating at `u32::MAX`.
    #[must_use]
    pub fn figure_height(&self, rows: usize) -> u32 {
        let rows = u32::try_from(rows).unwrap_or(u32::MAX);
        self.subplot_height
            .saturating_mul(rows)
            .saturating_add(TITLE_HEIGHT)
    }

    /// Renders `figure` to an SVG document.
    pub fn render(&self, figure: &Figure) -> io::Result<String> {
        let rows = figure.grid_rows();
        let height = self.figure_height(rows);
        render_svg((self.width, height), |root| draw_figure(root, figure, rows))
    }
}

impl ArtifactWriter for SvgWriter {
    fn write_artifact(&mut self, figure: &Figure, path: &Path) -> io::Result<()> {
        let svg = self.render(figure)?;
        fs::write(path, svg)?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}

/// Draws into a fresh SVG document of `size` and returns the markup.
pub fn render_svg<F>(size: (u32, u32), draw: F) -> io::Result<String>
where
    F: FnOnce(&SvgArea<'_>) -> DrawResult,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;
        draw(&root).map_err(draw_error)?;
        root.present().map_err(draw_error)?;
    }
    Ok(svg)
}

/// Draws into a fresh SVG document and writes it to `path`.
pub fn write_svg<F>(path: &Path, size: (u32, u32), draw: F) -> io::Result<()>
where
    F: FnOnce(&SvgArea<'_>) -> DrawResult,
{
    let svg = render_svg(size, draw)?;
    fs::write(path, svg)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

fn draw_error<E>(err: E) -> io::Error
where
    E: fmt::Display,
{
    io::Error::other(err.to_string())
}

fn draw_figure(root: &SvgArea<'_>, figure: &Figure, rows: usize) -> DrawResult {
    let body = match &figure.title {
        Some(title) => root.titled(title, ("sans-serif", 20))?,
        None => root.clone(),
    };
    let areas = body.split_evenly((rows, 1));
    for subplot in &figure.subplots {
        if let Some(area) = subplot.position.checked_sub(1).and_then(|i| areas.get(i)) {
            draw_subplot(area, subplot)?;
        }
    }
    Ok(())
}

fn draw_subplot(area: &SvgArea<'_>, subplot: &Subplot) -> DrawResult {
    let x_range = drawable_range(subplot.x_limits.clone().unwrap_or(0.0..1.0));
    let max_density = subplot
        .layers
        .iter()
        .map(|layer| layer.histogram.max_density())
        .fold(0.0, f64::max);
    let y_max = if max_density > 0.0 {
        max_density * 1.05
    } else {
        1.0
    };

    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .x_label_area_size(if subplot.show_x_ticks { 30 } else { 0 })
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0.0..y_max)?;

    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh().disable_y_mesh().y_labels(4);
    if !subplot.show_x_ticks {
        mesh.x_labels(0);
    }
    if let Some(label) = &subplot.x_label {
        mesh.x_desc(label);
    }
    if let Some(label) = &subplot.y_label {
        mesh.y_desc(label);
    }
    mesh.draw()?;

    for layer in &subplot.layers {
        let style = layer.color.mix(layer.opacity).filled();
        chart.draw_series(
            layer
                .histogram
                .bins
                .iter()
                .filter(|bin| bin.density > 0.0)
                .map(|bin| {
                    Rectangle::new([(bin.range.start, 0.0), (bin.range.end, bin.density)], style)
                }),
        )?;
    }
    Ok(())
}

/// Widens a zero-width range so it can be mapped onto pixels.
pub(crate) fn drawable_range(range: Range<f64>) -> Range<f64> {
    if range.end > range.start {
        range
    } else {
        (range.start - 0.5)..(range.start + 0.5)
    }
}
