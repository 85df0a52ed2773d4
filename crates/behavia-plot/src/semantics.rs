//! Per-channel feature semantics
//!
//! Whether a channel's histogram starts at zero or is centered on its mean is
//! domain knowledge about what the channel measures (a distance cannot be
//! negative, an angle change can), not something inferred from the data. The
//! table is configuration and must describe exactly as many channels as the
//! feature matrices it is used with.

use serde::{Deserialize, Serialize};

/// How a channel's histogram range is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Natural domain starts at 0; the lower bound is fixed at 0.
    Zero,
    /// Signed quantity; both bounds are derived from mean ± spread.
    Centered,
}

/// Description of one feature channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeatureChannel {
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub anchor: Anchor,
}

impl FeatureChannel {
    #[must_use]
    pub fn new(name: impl Into<String>, unit: impl Into<String>, anchor: Anchor) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            anchor,
        }
    }

    /// Figure title for this channel, e.g. `"Point 3 displacement pixels"`.
    #[must_use]
    pub fn title(&self) -> String {
        if self.unit.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.unit)
        }
    }
}

/// Lookup table of channel semantics, indexed by channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FeatureSemantics {
    channels: Vec<FeatureChannel>,
}

impl FeatureSemantics {
    #[must_use]
    pub fn new(channels: Vec<FeatureChannel>) -> Self {
        Self { channels }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    #[must_use]
    pub fn get(&self, channel: usize) -> Option<&FeatureChannel> {
        self.channels.get(channel)
    }

    #[must_use]
    pub fn channels(&self) -> &[FeatureChannel] {
        &self.channels
    }
}

impl Default for FeatureSemantics {
    /// The six pose-derived channels produced by the feature extraction step.
    fn default() -> Self {
        Self::new(vec![
            FeatureChannel::new("Distance between points 1 & 5", "pixels", Anchor::Zero),
            FeatureChannel::new("Distance between points 1 & 8", "pixels", Anchor::Zero),
            FeatureChannel::new(
                "Angle change between points 1 & 2",
                "degrees",
                Anchor::Centered,
            ),
            FeatureChannel::new(
                "Angle change between points 1 & 4",
                "degrees",
                Anchor::Centered,
            ),
            FeatureChannel::new("Point 3 displacement", "pixels", Anchor::Zero),
            FeatureChannel::new("Point 7 displacement", "pixels", Anchor::Zero),
        ])
    }
}
