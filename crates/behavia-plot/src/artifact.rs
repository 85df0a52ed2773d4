//! Artifact naming
//!
//! Every artifact is written to `<output_dir>/<base_name><timestamp>.svg`,
//! where the timestamp has the form `_YYYYMMDD_HHMM`. One timestamp is
//! captured per top-level render call and shared by all of its artifacts.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, TimeZone};

/// File-name timestamp suffix, e.g. `_20240131_0905`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct Timestamp(String);

impl Timestamp {
    pub const FORMAT: &'static str = "_%Y%m%d_%H%M";

    #[must_use]
    pub fn from_datetime<Tz>(datetime: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self(datetime.format(Self::FORMAT).to_string())
    }

    /// Uses `suffix` verbatim as the timestamp.
    #[must_use]
    pub fn fixed(suffix: impl Into<String>) -> Self {
        Self(suffix.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Source of render timestamps.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_datetime(&Local::now())
    }
}

/// Clock that always returns the same timestamp.
#[derive(Debug, Clone)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0.clone()
    }
}

/// Builds artifact paths under one output directory with one timestamp.
#[derive(Debug, Clone)]
pub struct ArtifactNamer {
    output_dir: PathBuf,
    timestamp: Timestamp,
}

impl ArtifactNamer {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, timestamp: Timestamp) -> Self {
        Self {
            output_dir: output_dir.into(),
            timestamp,
        }
    }

    /// Path of the SVG artifact named `base_name`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use behavia_plot::artifact::{ArtifactNamer, Timestamp};
    /// # use std::path::Path;
    /// let namer = ArtifactNamer::new("out", Timestamp::fixed("_20240131_0905"));
    /// assert_eq!(
    ///     namer.path("feat1_hist"),
    ///     Path::new("out/feat1_hist_20240131_0905.svg")
    /// );
    /// ```
    #[must_use]
    pub fn path(&self, base_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{base_name}{}.svg", self.timestamp))
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }
}
