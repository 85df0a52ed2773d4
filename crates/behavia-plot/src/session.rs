//! Session data and the session normalizer
//!
//! A session is one recording: a feature matrix (channels × frames) and the
//! cluster label assigned to every frame. Callers hand the renderer either one
//! session or an ordered list of them, tagged explicitly:
//!
//! ```json
//! { "single": { "features": [[1.0, 2.0], [0.5, 0.1]], "labels": [0, 1] } }
//! { "multi": [ { "features": [...], "labels": [...] }, ... ] }
//! ```
//!
//! [`SessionInput::normalize`] turns either form into a validated, ordered list
//! of [`PreparedSession`]s. Validation covers every session before anything is
//! rendered, so a shape error never leaves partial artifacts behind.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Cluster or class label of one observation.
pub type Label = u32;

/// Row-length error raised when building a [`FeatureMatrix`] from ragged rows.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("feature matrix row {row} has {actual} observations, expected {expected}")]
pub struct RaggedMatrixError {
    pub row: usize,
    pub expected: usize,
    pub actual: usize,
}

/// Feature values laid out as channels × observations.
///
/// Each row is one feature channel (a named kinematic quantity), each column
/// one frame. Stored row-major so a channel is a contiguous slice.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct FeatureMatrix {
    num_channels: usize,
    num_observations: usize,
    values: Vec<f64>,
}

impl FeatureMatrix {
    /// Builds a matrix from one vector per channel.
    ///
    /// # Examples
    ///
    /// ```
    /// # use behavia_plot::session::FeatureMatrix;
    /// let matrix = FeatureMatrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
    /// assert_eq!(matrix.num_channels(), 2);
    /// assert_eq!(matrix.num_observations(), 3);
    /// assert_eq!(matrix.channel(1), &[4.0, 5.0, 6.0]);
    ///
    /// assert!(FeatureMatrix::from_rows(vec![vec![1.0], vec![]]).is_err());
    /// ```
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, RaggedMatrixError> {
        let num_channels = rows.len();
        let num_observations = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(num_channels * num_observations);
        for (row, channel) in rows.into_iter().enumerate() {
            if channel.len() != num_observations {
                return Err(RaggedMatrixError {
                    row,
                    expected: num_observations,
                    actual: channel.len(),
                });
            }
            values.extend(channel);
        }
        Ok(Self {
            num_channels,
            num_observations,
            values,
        })
    }

    #[must_use]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    #[must_use]
    pub fn num_observations(&self) -> usize {
        self.num_observations
    }

    /// All observations of one channel.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of bounds.
    #[must_use]
    pub fn channel(&self, channel: usize) -> &[f64] {
        assert!(channel < self.num_channels, "channel index out of bounds");
        let start = channel * self.num_observations;
        &self.values[start..start + self.num_observations]
    }

    pub fn channels(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.num_channels).map(|c| self.channel(c))
    }
}

impl TryFrom<Vec<Vec<f64>>> for FeatureMatrix {
    type Error = RaggedMatrixError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<FeatureMatrix> for Vec<Vec<f64>> {
    fn from(matrix: FeatureMatrix) -> Self {
        matrix.channels().map(<[f64]>::to_vec).collect()
    }
}

/// One recording: per-frame features and per-frame labels.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Session {
    pub features: FeatureMatrix,
    pub labels: Vec<Label>,
}

impl Session {
    #[must_use]
    pub fn new(features: FeatureMatrix, labels: Vec<Label>) -> Self {
        Self { features, labels }
    }
}

/// Sessions handed to the renderer, with the single/multi mode made explicit.
///
/// The mode decides artifact naming: single-session artifacts are named
/// `feat<M>_hist`, multi-session ones `sess<N>_feat<M>_hist`, even when the
/// list holds exactly one session.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionInput {
    Single(Session),
    Multi(Vec<Session>),
}

/// A validated session ready for rendering.
#[derive(Debug, Clone)]
pub struct PreparedSession<'a> {
    /// 1-based position in a multi-session input; `None` in single-session mode.
    pub ordinal: Option<usize>,
    pub session: &'a Session,
    /// Distinct labels present in the session, ascending.
    pub labels: Vec<Label>,
}

impl SessionInput {
    /// Validates every session and returns them in input order.
    ///
    /// # Errors
    ///
    /// * [`RenderError::NoSessions`] for an empty multi-session list
    /// * [`RenderError::ShapeMismatch`] if any session's label count differs
    ///   from its observation count
    pub fn normalize(&self) -> Result<Vec<PreparedSession<'_>>, RenderError> {
        let sessions: Vec<(Option<usize>, &Session)> = match self {
            SessionInput::Single(session) => vec![(None, session)],
            SessionInput::Multi(sessions) => sessions
                .iter()
                .enumerate()
                .map(|(i, session)| (Some(i + 1), session))
                .collect(),
        };
        if sessions.is_empty() {
            return Err(RenderError::NoSessions);
        }

        sessions
            .into_iter()
            .map(|(ordinal, session)| {
                let observations = session.features.num_observations();
                if observations != session.labels.len() {
                    return Err(RenderError::ShapeMismatch {
                        session: ordinal.unwrap_or(1),
                        observations,
                        labels: session.labels.len(),
                    });
                }
                Ok(PreparedSession {
                    ordinal,
                    session,
                    labels: distinct_labels(&session.labels),
                })
            })
            .collect()
    }
}

impl PreparedSession<'_> {
    /// 1-based session number used in log and error messages.
    #[must_use]
    pub fn number(&self) -> usize {
        self.ordinal.unwrap_or(1)
    }

    /// Observations of `channel` whose frame carries `label`.
    pub fn samples_for(&self, channel: usize, label: Label) -> impl Iterator<Item = f64> + '_ {
        self.session
            .features
            .channel(channel)
            .iter()
            .zip(&self.session.labels)
            .filter(move |(_, l)| **l == label)
            .map(|(v, _)| *v)
    }
}

/// Distinct labels in ascending order.
#[must_use]
pub fn distinct_labels(labels: &[Label]) -> Vec<Label> {
    labels
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(observations: usize, labels: Vec<Label>) -> Session {
        let row = (0..observations).map(|i| i as f64).collect::<Vec<_>>();
        Session::new(
            FeatureMatrix::from_rows(vec![row.clone(), row]).unwrap(),
            labels,
        )
    }

    #[test]
    fn test_single_session_has_no_ordinal() {
        let input = SessionInput::Single(session(3, vec![2, 0, 2]));
        let prepared = input.normalize().unwrap();
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared[0].ordinal, None);
        assert_eq!(prepared[0].labels, [0, 2]);
    }

    #[test]
    fn test_multi_session_ordinals_follow_input_order() {
        let input = SessionInput::Multi(vec![session(2, vec![0, 1]), session(1, vec![5])]);
        let prepared = input.normalize().unwrap();
        let ordinals = prepared.iter().map(|p| p.ordinal).collect::<Vec<_>>();
        assert_eq!(ordinals, [Some(1), Some(2)]);
        assert_eq!(prepared[1].labels, [5]);
    }

    #[test]
    fn test_empty_multi_session_is_rejected() {
        let input = SessionInput::Multi(vec![]);
        assert!(matches!(input.normalize(), Err(RenderError::NoSessions)));
    }

    #[test]
    fn test_shape_mismatch_in_any_session() {
        let input = SessionInput::Multi(vec![session(2, vec![0, 1]), session(3, vec![0, 1])]);
        let err = input.normalize().unwrap_err();
        assert!(matches!(
            err,
            RenderError::ShapeMismatch {
                session: 2,
                observations: 3,
                labels: 2
            }
        ));
    }

    #[test]
    fn test_samples_for_label() {
        let input = SessionInput::Single(session(4, vec![1, 0, 1, 0]));
        let prepared = input.normalize().unwrap();
        let samples = prepared[0].samples_for(0, 1).collect::<Vec<_>>();
        assert_eq!(samples, [0.0, 2.0]);
    }

    #[test]
    fn test_deserialize_tagged_input() {
        let json = r#"{"multi": [{"features": [[1.0, 2.0]], "labels": [0, 3]}]}"#;
        let input: SessionInput = serde_json::from_str(json).unwrap();
        let SessionInput::Multi(sessions) = &input else {
            panic!("expected multi-session input");
        };
        assert_eq!(sessions[0].features.channel(0), &[1.0, 2.0]);
        assert_eq!(sessions[0].labels, [0, 3]);
    }

    #[test]
    fn test_deserialize_ragged_matrix_fails() {
        let json = r#"{"single": {"features": [[1.0, 2.0], [3.0]], "labels": [0, 1]}}"#;
        let result: Result<SessionInput, _> = serde_json::from_str(json);
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("row 1"));
    }
}
