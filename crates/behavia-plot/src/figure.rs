//! In-memory figure model
//!
//! A [`Figure`] is what the canvas accumulates between `new_figure` and
//! `show`: a title and a grid of vertically stacked subplots, each holding one
//! or more histogram layers. Writers turn the model into files.

use std::ops::Range;

use behavia_stats::histogram::DensityHistogram;
use plotters::style::RGBColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Handle to a subplot of the figure currently open on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxesHandle(pub(crate) usize);

/// A histogram drawn into a subplot.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramLayer {
    pub histogram: DensityHistogram,
    pub color: RGBColor,
    pub opacity: f64,
}

impl HistogramLayer {
    #[must_use]
    pub fn opaque(histogram: DensityHistogram, color: RGBColor) -> Self {
        Self {
            histogram,
            color,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subplot {
    /// Number of rows in the subplot grid this subplot was placed in.
    pub rows: usize,
    /// 1-based row, counted from the top.
    pub position: usize,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub x_limits: Option<Range<f64>>,
    pub show_x_ticks: bool,
    pub layers: Vec<HistogramLayer>,
}

impl Subplot {
    pub(crate) fn new(rows: usize, position: usize) -> Self {
        Self {
            rows,
            position,
            x_label: None,
            y_label: None,
            x_limits: None,
            show_x_ticks: true,
            layers: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Figure {
    pub title: Option<String>,
    pub subplots: Vec<Subplot>,
}

impl Figure {
    /// Rows of the subplot grid, at least 1.
    #[must_use]
    pub fn grid_rows(&self) -> usize {
        self.subplots.iter().map(|s| s.rows).max().unwrap_or(1).max(1)
    }

    #[must_use]
    pub fn subplot(&self, axes: AxesHandle) -> Option<&Subplot> {
        self.subplots.get(axes.0)
    }
}
