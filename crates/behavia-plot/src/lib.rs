//! Diagnostic plots for behavior-classification results
//!
//! This crate turns per-frame pose features and their cluster labels into SVG
//! figures that show how each feature is distributed within each behavior
//! cluster, plus a handful of single-figure diagnostics of the training run.
//!
//! # Overview
//!
//! ## Per-feature histograms
//!
//! 1. **Normalize Sessions** ([`session::SessionInput::normalize`]): Accept one
//!    session or a list of sessions and validate label counts against feature
//!    matrices
//! 2. **Compute Bin Ranges** ([`bin_range::BinRange`]): Derive one shared range
//!    per channel from its [`semantics::Anchor`] and the channel's mean and
//!    standard deviation
//! 3. **Compose Grids** ([`feature_hist::FeatureHistogramRenderer`]): Stack one
//!    density histogram per label, colored by label rank
//!    ([`palette::spectral`]), on a scoped [`canvas::Canvas`] figure
//! 4. **Write Artifacts** ([`writer::SvgWriter`]): Render the figure model with
//!    `plotters` and save it as `<base><timestamp>.svg`
//!    ([`artifact::ArtifactNamer`])
//!
//! ## Training diagnostics
//!
//! [`diagnostics::Diagnostics`] writes the embedding scatter, cluster
//! assignments, classifier accuracy, bout-duration histogram and transition
//! matrix figures.
//!
//! # Examples
//!
//! ```no_run
//! use behavia_plot::{
//!     canvas::Canvas,
//!     config::RenderConfig,
//!     feature_hist::FeatureHistogramRenderer,
//!     session::{FeatureMatrix, Session, SessionInput},
//! };
//!
//! let rows = (0..6).map(|c| vec![c as f64, c as f64 + 1.0]).collect();
//! let session = Session::new(FeatureMatrix::from_rows(rows)?, vec![0, 1]);
//!
//! let config = RenderConfig::default();
//! let mut renderer = FeatureHistogramRenderer::from_config(&config);
//! let mut canvas: Canvas = Canvas::default();
//! let summary = renderer.render(&mut canvas, &SessionInput::Single(session))?;
//! for artifact in &summary.artifacts {
//!     println!("{}", artifact.path.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod artifact;
pub mod bin_range;
pub mod canvas;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod feature_hist;
pub mod figure;
pub mod palette;
pub mod semantics;
pub mod session;
pub mod writer;
