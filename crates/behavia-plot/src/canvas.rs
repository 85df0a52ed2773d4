//! The rendering surface
//!
//! A [`Canvas`] hands out one figure at a time. [`Canvas::new_figure`] returns
//! a [`FigureScope`] that borrows the canvas mutably, so a second figure
//! cannot be opened while one is in flight, and dropping the scope releases
//! the figure on every exit path, including early returns on error.

use std::ops::Range;

use crate::figure::{Axis, AxesHandle, Figure, HistogramLayer, Subplot};

/// Presents a finished figure to the user.
pub trait Viewer {
    fn show(&mut self, figure: &Figure);
}

/// Viewer that reports shown figures through the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogViewer;

impl Viewer for LogViewer {
    fn show(&mut self, figure: &Figure) {
        log::debug!(
            "figure '{}' ready ({} subplots)",
            figure.title.as_deref().unwrap_or("untitled"),
            figure.subplots.len()
        );
    }
}

#[derive(Debug, Default)]
pub struct Canvas<V = LogViewer> {
    viewer: V,
    figures_opened: usize,
    figures_released: usize,
}

impl<V> Canvas<V>
where
    V: Viewer,
{
    #[must_use]
    pub fn new(viewer: V) -> Self {
        Self {
            viewer,
            figures_opened: 0,
            figures_released: 0,
        }
    }

    /// Opens a blank figure. The canvas is released when the scope is dropped.
    pub fn new_figure(&mut self) -> FigureScope<'_, V> {
        self.figures_opened += 1;
        FigureScope {
            canvas: self,
            figure: Figure::default(),
        }
    }

    /// Number of figures opened over the canvas's lifetime.
    #[must_use]
    pub fn figures_opened(&self) -> usize {
        self.figures_opened
    }

    /// Number of figures released over the canvas's lifetime.
    #[must_use]
    pub fn figures_released(&self) -> usize {
        self.figures_released
    }

    #[must_use]
    pub fn viewer(&self) -> &V {
        &self.viewer
    }
}

/// A figure open on a [`Canvas`].
///
/// Axes handles are only valid for the scope that created them; passing a
/// handle from another figure panics.
#[derive(Debug)]
pub struct FigureScope<'c, V>
where
    V: Viewer,
{
    canvas: &'c mut Canvas<V>,
    figure: Figure,
}

impl<V> FigureScope<'_, V>
where
    V: Viewer,
{
    /// Adds a subplot at 1-based `position` of a `rows` × 1 grid.
    pub fn add_subplot(&mut self, rows: usize, position: usize) -> AxesHandle {
        self.figure.subplots.push(Subplot::new(rows, position));
        AxesHandle(self.figure.subplots.len() - 1)
    }

    /// Draws a histogram layer and clips the subplot's x-axis to `x_limits`.
    pub fn draw_histogram(
        &mut self,
        axes: AxesHandle,
        layer: HistogramLayer,
        x_limits: Range<f64>,
    ) {
        let subplot = &mut self.figure.subplots[axes.0];
        subplot.layers.push(layer);
        subplot.x_limits = Some(x_limits);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.figure.title = Some(title.into());
    }

    pub fn set_axis_label(&mut self, axes: AxesHandle, axis: Axis, label: impl Into<String>) {
        let subplot = &mut self.figure.subplots[axes.0];
        let label = Some(label.into());
        match axis {
            Axis::X => subplot.x_label = label,
            Axis::Y => subplot.y_label = label,
        }
    }

    /// Hides the x tick labels of a subplot.
    pub fn suppress_x_ticks(&mut self, axes: AxesHandle) {
        self.figure.subplots[axes.0].show_x_ticks = false;
    }

    pub fn show(&mut self) {
        self.canvas.viewer.show(&self.figure);
    }

    #[must_use]
    pub fn figure(&self) -> &Figure {
        &self.figure
    }
}

impl<V> Drop for FigureScope<'_, V>
where
    V: Viewer,
{
    fn drop(&mut self) {
        self.canvas.figures_released += 1;
    }
}

#[cfg(test)]
mod tests {
    use behavia_stats::histogram::{DensityHistogram, linspace};
    use plotters::style::RGBColor;

    use super::*;

    #[derive(Debug, Default)]
    struct CountingViewer {
        shown: Vec<Option<String>>,
    }

    impl Viewer for CountingViewer {
        fn show(&mut self, figure: &Figure) {
            self.shown.push(figure.title.clone());
        }
    }

    #[test]
    fn test_scope_builds_figure() {
        let mut canvas = Canvas::new(CountingViewer::default());
        {
            let mut figure = canvas.new_figure();
            figure.set_title("title");
            let top = figure.add_subplot(2, 1);
            let bottom = figure.add_subplot(2, 2);
            let edges = linspace(0.0, 1.0, 3);
            let histogram = DensityHistogram::from_edges([0.2], &edges);
            figure.draw_histogram(
                bottom,
                HistogramLayer::opaque(histogram, RGBColor(1, 2, 3)),
                0.0..1.0,
            );
            figure.suppress_x_ticks(top);
            figure.set_axis_label(bottom, Axis::Y, "Group 3");
            figure.show();

            let model = figure.figure();
            assert_eq!(model.grid_rows(), 2);
            assert!(!model.subplot(top).unwrap().show_x_ticks);
            assert!(model.subplot(bottom).unwrap().show_x_ticks);
            assert_eq!(model.subplot(bottom).unwrap().x_limits, Some(0.0..1.0));
            assert_eq!(
                model.subplot(bottom).unwrap().y_label.as_deref(),
                Some("Group 3")
            );
        }
        assert_eq!(canvas.figures_opened(), 1);
        assert_eq!(canvas.figures_released(), 1);
        assert_eq!(canvas.viewer().shown, [Some("title".to_owned())]);
    }

    #[test]
    fn test_scope_released_on_early_return() {
        fn fails(canvas: &mut Canvas<CountingViewer>) -> Result<(), ()> {
            let mut figure = canvas.new_figure();
            figure.add_subplot(1, 1);
            Err(())
        }

        let mut canvas = Canvas::new(CountingViewer::default());
        assert!(fails(&mut canvas).is_err());
        assert_eq!(canvas.figures_opened(), canvas.figures_released());
        assert!(canvas.viewer().shown.is_empty());
    }
}
