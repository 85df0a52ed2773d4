//! Statistical utilities for the Behavia diagnostic plots.
//!
//! This crate provides the small numeric toolkit the plotting crate builds on:
//!
//! - **Descriptive statistics**: mean and population standard deviation
//! - **Percentiles**: linear-interpolated percentiles, used for box plots
//! - **Histograms**: linearly spaced edges and density histograms over fixed edges
//!
//! # Modules
//!
//! - [`descriptive`]: Mean and spread of a dataset
//! - [`percentiles`]: Percentile computation and storage
//! - [`histogram`]: Bin edges and density histograms
//!
//! # Examples
//!
//! ## Computing mean and spread
//!
//! ```
//! use behavia_stats::descriptive::mean_std_dev;
//!
//! let (mean, std_dev) = mean_std_dev(&[1.0, 3.0, 5.0, 7.0]).unwrap();
//! assert_eq!(mean, 4.0);
//! assert_eq!(std_dev, 5.0_f64.sqrt());
//! ```
//!
//! ## Building a density histogram
//!
//! ```
//! use behavia_stats::histogram::{DensityHistogram, linspace};
//!
//! let edges = linspace(0.0, 10.0, 50);
//! let histogram = DensityHistogram::from_edges([1.0, 2.0, 2.5, 9.0], &edges);
//! assert_eq!(histogram.bins.len(), 49);
//! assert_eq!(histogram.in_range, 4);
//! ```

pub mod descriptive;
pub mod histogram;
pub mod percentiles;
