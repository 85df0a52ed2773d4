use std::ops::Range;

/// A density histogram over caller-supplied bin edges.
///
/// The edges are fixed up front rather than derived from the data, so that
/// several histograms (one per cluster label, say) can share one x-axis and be
/// compared bin for bin. Densities are normalized so that the bar areas of the
/// in-range samples sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityHistogram {
    /// The bins comprising the histogram, one fewer than the edges.
    pub bins: Vec<HistogramBin>,
    /// Number of samples that fell inside the edge span.
    pub in_range: u64,
}

/// A single bin in a density histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end;
    /// the last bin of a histogram also includes its end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
    /// `count / (in_range * width)`, or 0 for zero-width bins.
    pub density: f64,
}

impl HistogramBin {
    /// Width of the bin.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.range.end - self.range.start
    }
}

impl DensityHistogram {
    /// Bins `values` into the intervals delimited by `edges`.
    ///
    /// Values below the first edge, above the last edge, or NaN are ignored.
    /// A value equal to the last edge is counted in the last bin.
    ///
    /// # Arguments
    ///
    /// * `values` - The data points to bin
    /// * `edges` - Non-decreasing bin edges; fewer than two edges yields no bins
    ///
    /// # Panics
    ///
    /// Panics if `edges` is not sorted in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use behavia_stats::histogram::{DensityHistogram, linspace};
    /// let edges = linspace(0.0, 4.0, 5);
    /// let histogram = DensityHistogram::from_edges([0.5, 1.5, 1.7, 4.0, 9.0], &edges);
    /// assert_eq!(histogram.in_range, 4);
    /// let counts = histogram.bins.iter().map(|b| b.count).collect::<Vec<_>>();
    /// assert_eq!(counts, [1, 2, 0, 1]);
    /// assert_eq!(histogram.bins[1].density, 0.5);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_edges<I>(values: I, edges: &[f64]) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        assert!(
            edges.is_sorted_by(|a, b| a <= b),
            "edges must be sorted in ascending order"
        );

        let mut bins = edges
            .windows(2)
            .map(|w| HistogramBin {
                range: w[0]..w[1],
                count: 0,
                density: 0.0,
            })
            .collect::<Vec<_>>();
        let (Some(&first), Some(&last)) = (edges.first(), edges.last()) else {
            return Self { bins, in_range: 0 };
        };
        if bins.is_empty() {
            return Self { bins, in_range: 0 };
        }

        let mut in_range = 0;
        for value in values {
            if value.is_nan() || value < first || value > last {
                continue;
            }
            // Index of the last edge <= value; the closing edge folds into the last bin.
            let idx = (edges.partition_point(|edge| *edge <= value) - 1).min(bins.len() - 1);
            bins[idx].count += 1;
            in_range += 1;
        }

        if in_range > 0 {
            let total = in_range as f64;
            for bin in &mut bins {
                let width = bin.width();
                if width > 0.0 {
                    bin.density = bin.count as f64 / (total * width);
                }
            }
        }

        Self { bins, in_range }
    }

    /// Largest bin density, 0 for an empty histogram.
    #[must_use]
    pub fn max_density(&self) -> f64 {
        self.bins.iter().map(|b| b.density).fold(0.0, f64::max)
    }
}

/// Returns `num` evenly spaced points from `start` to `end`, both inclusive.
///
/// The last point is exactly `end` regardless of rounding in the step. A
/// single point yields `[start]`; zero points yield an empty vector.
///
/// # Examples
///
/// ```
/// # use behavia_stats::histogram::linspace;
/// assert_eq!(linspace(0.0, 1.0, 5), [0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(3.0, 3.0, 3), [3.0, 3.0, 3.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            let mut points = (0..num)
                .map(|i| start + i as f64 * step)
                .collect::<Vec<_>>();
            points[num - 1] = end;
            points
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints_are_exact() {
        let points = linspace(-0.1, 0.7, 50);
        assert_eq!(points.len(), 50);
        assert_eq!(points[0], -0.1);
        assert_eq!(points[49], 0.7);
        assert!(points.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_densities_integrate_to_one() {
        let edges = linspace(0.0, 10.0, 11);
        let values = (0..100).map(|i| f64::from(i) * 0.1);
        let histogram = DensityHistogram::from_edges(values, &edges);
        let area = histogram
            .bins
            .iter()
            .map(|b| b.density * b.width())
            .sum::<f64>();
        assert!((area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_and_nan_are_ignored() {
        let edges = linspace(0.0, 1.0, 3);
        let histogram = DensityHistogram::from_edges([-1.0, f64::NAN, 0.25, 2.0], &edges);
        assert_eq!(histogram.in_range, 1);
        assert_eq!(histogram.bins[0].count, 1);
        assert_eq!(histogram.bins[0].density, 2.0);
    }

    #[test]
    fn test_degenerate_edges_have_zero_density() {
        let edges = linspace(5.0, 5.0, 50);
        let histogram = DensityHistogram::from_edges([5.0; 4], &edges);
        assert_eq!(histogram.bins.len(), 49);
        assert_eq!(histogram.in_range, 4);
        assert_eq!(histogram.bins[48].count, 4);
        assert_eq!(histogram.max_density(), 0.0);
    }

    #[test]
    fn test_no_samples() {
        let edges = linspace(0.0, 1.0, 4);
        let histogram = DensityHistogram::from_edges(std::iter::empty(), &edges);
        assert_eq!(histogram.in_range, 0);
        assert!(histogram.bins.iter().all(|b| b.density == 0.0));
    }

    #[test]
    fn test_too_few_edges() {
        let histogram = DensityHistogram::from_edges([1.0], &[1.0]);
        assert!(histogram.bins.is_empty());
        assert_eq!(histogram.in_range, 0);
    }
}
