use std::{io, path::PathBuf};

/// Errors raised while preparing or rendering diagnostic plots.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RenderError {
    #[display(
        "session {session}: feature matrix has {observations} observations but label vector has {labels} labels"
    )]
    ShapeMismatch {
        session: usize,
        observations: usize,
        labels: usize,
    },
    #[display("session {session}: feature channel {channel} has no observations")]
    EmptyChannel { session: usize, channel: usize },
    #[display(
        "session {session}: feature channel {channel} has no usable bin range [{low}, {high}]"
    )]
    InvalidRange {
        session: usize,
        channel: usize,
        low: f64,
        high: f64,
    },
    #[display(
        "session {session}: feature semantics describe {expected} channels but the matrix has {actual}"
    )]
    SemanticsMismatch {
        session: usize,
        expected: usize,
        actual: usize,
    },
    #[display("no sessions to render")]
    NoSessions,
    #[display("{plot}: no data to plot")]
    NoData { plot: &'static str },
    #[display("transition matrix row {row} has {columns} columns, expected {rows}")]
    NotSquare {
        rows: usize,
        row: usize,
        columns: usize,
    },
    #[display("failed to write {}", path.display())]
    Io { path: PathBuf, source: io::Error },
}
