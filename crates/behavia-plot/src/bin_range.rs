//! Histogram range policy
//!
//! A channel's range is derived once from all of its observations and then
//! shared by every per-label subplot of the channel's figure, so that the
//! clusters are compared on identical axes.
//!
//! - zero-anchored: `[0, mean + 3σ]`
//! - centered: `[mean - 3σ, mean + 3σ]`
//!
//! σ is the population standard deviation over the finite observations; NaN
//! and infinite samples are left out. A constant channel yields a zero-width
//! range; it is kept as-is. A zero-anchored channel whose `mean + 3σ` lies
//! below zero has no ascending range and is rejected.

use std::ops::Range;

use behavia_stats::{
    descriptive,
    histogram::{self, DensityHistogram},
};

use crate::semantics::Anchor;

/// Number of bin edges spanning a range (49 bins).
pub const NUM_EDGES: usize = 50;

/// Spread of the range around the mean, in standard deviations.
pub const SPREAD: f64 = 3.0;

/// A channel's samples do not yield a usable range.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum RangeError {
    #[display("channel has no finite observations")]
    Empty,
    #[display("range [{low}, {high}] is not a finite ascending interval")]
    Invalid { low: f64, high: f64 },
}

/// Histogram bounds and bin edges for one feature channel.
#[derive(Debug, Clone, PartialEq)]
pub struct BinRange {
    pub low: f64,
    pub high: f64,
    /// [`NUM_EDGES`] points from `low` to `high`, both inclusive.
    pub edges: Vec<f64>,
}

impl BinRange {
    /// Computes the range of a channel from all of its samples.
    ///
    /// # Examples
    ///
    /// ```
    /// # use behavia_plot::{bin_range::BinRange, semantics::Anchor};
    /// let samples = [8.0, 12.0, 8.0, 12.0];
    /// let range = BinRange::compute(&samples, Anchor::Zero).unwrap();
    /// assert_eq!((range.low, range.high), (0.0, 16.0));
    ///
    /// let range = BinRange::compute(&samples, Anchor::Centered).unwrap();
    /// assert_eq!((range.low, range.high), (4.0, 16.0));
    /// assert_eq!(range.edges.len(), 50);
    ///
    /// assert!(BinRange::compute(&[-5.0, -4.0, -6.0], Anchor::Zero).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// * [`RangeError::Empty`] if no sample is finite
    /// * [`RangeError::Invalid`] if the bounds are not finite or `high < low`
    pub fn compute(samples: &[f64], anchor: Anchor) -> Result<Self, RangeError> {
        let finite = samples
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        let (mean, std_dev) = descriptive::mean_std_dev(&finite).ok_or(RangeError::Empty)?;
        let high = mean + SPREAD * std_dev;
        let low = match anchor {
            Anchor::Zero => 0.0,
            Anchor::Centered => mean - SPREAD * std_dev,
        };
        if !(low.is_finite() && high.is_finite() && low <= high) {
            return Err(RangeError::Invalid { low, high });
        }
        Ok(Self {
            low,
            high,
            edges: histogram::linspace(low, high, NUM_EDGES),
        })
    }

    #[must_use]
    pub fn span(&self) -> Range<f64> {
        self.low..self.high
    }

    /// Density histogram of `samples` over this range's edges.
    #[must_use]
    pub fn histogram<I>(&self, samples: I) -> DensityHistogram
    where
        I: IntoIterator<Item = f64>,
    {
        DensityHistogram::from_edges(samples, &self.edges)
    }
}
