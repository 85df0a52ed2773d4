use std::{
    fs, io,
    path::{Path, PathBuf},
};

use behavia_plot::{
    artifact::{FixedClock, Timestamp},
    canvas::{Canvas, Viewer},
    error::RenderError,
    feature_hist::{FeatureHistogramRenderer, RenderSummary},
    figure::Figure,
    palette,
    semantics::FeatureSemantics,
    session::{FeatureMatrix, Label, Session, SessionInput},
    writer::{ArtifactWriter, SvgWriter},
};

const TIMESTAMP: &str = "_20240131_0905";

#[derive(Debug, Default)]
struct RecordingWriter {
    written: Vec<(PathBuf, Figure)>,
    fail_at: Option<usize>,
}

impl ArtifactWriter for RecordingWriter {
    fn write_artifact(&mut self, figure: &Figure, path: &Path) -> io::Result<()> {
        if self.fail_at == Some(self.written.len()) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.written.push((path.to_owned(), figure.clone()));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct RecordingViewer {
    shown: usize,
}

impl Viewer for RecordingViewer {
    fn show(&mut self, _figure: &Figure) {
        self.shown += 1;
    }
}

fn renderer<W>(writer: W) -> FeatureHistogramRenderer<W, FixedClock>
where
    W: ArtifactWriter,
{
    FeatureHistogramRenderer::new(
        FeatureSemantics::default(),
        "out",
        writer,
        FixedClock(Timestamp::fixed(TIMESTAMP)),
    )
}

/// Six channels of `labels.len()` frames; channel `c` holds `c + 1 + (i % 4)`.
fn session(labels: Vec<Label>) -> Session {
    let n = labels.len();
    let rows = (0..6)
        .map(|c| (0..n).map(|i| (c + 1 + i % 4) as f64).collect())
        .collect();
    Session::new(FeatureMatrix::from_rows(rows).unwrap(), labels)
}

fn base_names(summary: &RenderSummary) -> Vec<&str> {
    summary
        .artifacts
        .iter()
        .map(|a| a.base_name.as_str())
        .collect()
}

#[test]
fn test_two_label_session_end_to_end() {
    let labels = (0..1000).map(|i| i / 500).collect::<Vec<Label>>();
    let mut rows = vec![(0..1000)
        .map(|i| if i % 2 == 0 { 8.0 } else { 12.0 })
        .collect::<Vec<_>>()];
    rows.extend((1..6).map(|c| (0..1000).map(|i| (c + i % 10) as f64).collect::<Vec<_>>()));
    let input = SessionInput::Single(Session::new(FeatureMatrix::from_rows(rows).unwrap(), labels));

    let mut renderer = renderer(RecordingWriter::default());
    let mut canvas = Canvas::new(RecordingViewer::default());
    let summary = renderer.render(&mut canvas, &input).unwrap();

    assert!(summary.is_complete());
    assert_eq!(
        base_names(&summary),
        [
            "feat1_hist",
            "feat2_hist",
            "feat3_hist",
            "feat4_hist",
            "feat5_hist",
            "feat6_hist"
        ]
    );

    let first = &summary.artifacts[0];
    assert_eq!((first.range.low, first.range.high), (0.0, 16.0));
    assert_eq!(first.title, "Distance between points 1 & 5 pixels");
    assert_eq!(first.path, Path::new("out").join(format!("feat1_hist{TIMESTAMP}.svg")));
    assert_eq!(first.panels.len(), 2);
    assert!(!first.panels[0].shows_x_ticks);
    assert!(first.panels[1].shows_x_ticks);
    for panel in &first.panels {
        assert_eq!(panel.histogram.in_range, 500);
        let area = panel
            .histogram
            .bins
            .iter()
            .map(|b| b.density * b.width())
            .sum::<f64>();
        assert!((area - 1.0).abs() < 1e-9);
    }

    let (_, figure) = &renderer.writer().written[0];
    assert_eq!(figure.grid_rows(), 2);
    assert_eq!(figure.subplots[0].y_label.as_deref(), Some("Group 0"));
    assert_eq!(figure.subplots[1].y_label.as_deref(), Some("Group 1"));

    assert_eq!(canvas.viewer().shown, 6);
    assert_eq!(canvas.figures_opened(), 6);
    assert_eq!(canvas.figures_released(), 6);
}

#[test]
fn test_centered_channels_are_not_anchored_at_zero() {
    let input = SessionInput::Single(session((0..40).map(|i| i % 2).collect()));
    let mut renderer = renderer(RecordingWriter::default());
    let summary = renderer.render(&mut Canvas::new(RecordingViewer::default()), &input).unwrap();

    for artifact in &summary.artifacts {
        let centered = matches!(artifact.channel, 2 | 3);
        assert_eq!(artifact.range.low == 0.0, !centered, "channel {}", artifact.channel);
        assert!(artifact.range.high > artifact.range.low);
    }
}

#[test]
fn test_colors_depend_on_rank_only() {
    let mut renderer = renderer(RecordingWriter::default());
    let mut canvas = Canvas::new(RecordingViewer::default());
    let small = renderer
        .render(&mut canvas, &SessionInput::Single(session(vec![0, 1, 2, 0, 1, 2])))
        .unwrap();
    let large = renderer
        .render(&mut canvas, &SessionInput::Single(session(vec![10, 20, 30, 10, 20, 30])))
        .unwrap();

    for (a, b) in small.artifacts.iter().zip(&large.artifacts) {
        let a = a.panels.iter().map(|p| p.color).collect::<Vec<_>>();
        let b = b.panels.iter().map(|p| p.color).collect::<Vec<_>>();
        assert_eq!(a, b);
        assert_eq!(a, palette::spectral(3));
    }
}

#[test]
fn test_multi_session_grids_follow_each_session() {
    let input = SessionInput::Multi(vec![
        session(vec![0, 1, 0, 1]),
        session(vec![0, 1, 2, 3, 3, 2, 1, 0]),
    ]);
    let mut renderer = renderer(RecordingWriter::default());
    let summary = renderer.render(&mut Canvas::new(RecordingViewer::default()), &input).unwrap();

    assert_eq!(summary.artifacts.len(), 12);
    assert_eq!(summary.artifacts[0].base_name, "sess1_feat1_hist");
    assert_eq!(summary.artifacts[11].base_name, "sess2_feat6_hist");
    for artifact in &summary.artifacts {
        let expected = if artifact.session == Some(1) { 2 } else { 4 };
        assert_eq!(artifact.panels.len(), expected);
    }
    let rows = renderer
        .writer()
        .written
        .iter()
        .map(|(_, f)| f.grid_rows())
        .collect::<Vec<_>>();
    assert_eq!(rows, [2, 2, 2, 2, 2, 2, 4, 4, 4, 4, 4, 4]);
}

#[test]
fn test_single_and_one_element_multi_differ_only_in_names() {
    let labels = vec![1, 1, 4, 4, 9, 9, 1];
    let mut single = renderer(RecordingWriter::default());
    let mut multi = renderer(RecordingWriter::default());
    let a = single
        .render(
            &mut Canvas::new(RecordingViewer::default()),
            &SessionInput::Single(session(labels.clone())),
        )
        .unwrap();
    let b = multi
        .render(
            &mut Canvas::new(RecordingViewer::default()),
            &SessionInput::Multi(vec![session(labels)]),
        )
        .unwrap();

    assert_eq!(a.artifacts.len(), b.artifacts.len());
    for (a, b) in a.artifacts.iter().zip(&b.artifacts) {
        assert_eq!(b.base_name, format!("sess1_{}", a.base_name));
        assert_eq!(a.range, b.range);
        assert_eq!(a.panels, b.panels);
        assert_eq!(a.title, b.title);
    }
    for ((_, a), (_, b)) in single.writer().written.iter().zip(&multi.writer().written) {
        assert_eq!(a, b);
    }
}

#[test]
fn test_shape_mismatch_renders_nothing() {
    let mut bad = session(vec![0, 1, 0]);
    bad.labels.pop();
    let input = SessionInput::Multi(vec![session(vec![0, 1]), bad]);

    let mut renderer = renderer(RecordingWriter::default());
    let mut canvas = Canvas::new(RecordingViewer::default());
    let err = renderer.render(&mut canvas, &input).unwrap_err();
    assert!(matches!(
        err,
        RenderError::ShapeMismatch {
            session: 2,
            observations: 3,
            labels: 2
        }
    ));
    assert!(renderer.writer().written.is_empty());
    assert_eq!(canvas.figures_opened(), 0);
}

#[test]
fn test_empty_channel_does_not_stop_other_sessions() {
    let empty = Session::new(FeatureMatrix::from_rows(vec![vec![]; 6]).unwrap(), vec![]);
    let input = SessionInput::Multi(vec![session(vec![0, 1]), empty, session(vec![2, 2])]);

    let mut renderer = renderer(RecordingWriter::default());
    let summary = renderer.render(&mut Canvas::new(RecordingViewer::default()), &input).unwrap();

    assert_eq!(summary.channel_errors.len(), 6);
    assert!(summary.channel_errors.iter().all(|e| matches!(
        e,
        RenderError::EmptyChannel { session: 2, .. }
    )));
    let sessions = summary
        .artifacts
        .iter()
        .map(|a| a.session)
        .collect::<Vec<_>>();
    assert_eq!(sessions.len(), 12);
    assert!(sessions.iter().all(|s| *s != Some(2)));
}

#[test]
fn test_negative_zero_anchored_channel_does_not_stop_render() {
    let labels = vec![0, 1, 0, 1, 0, 1];
    let mut rows = (0..6)
        .map(|c| (0..6).map(|i| (c + 1 + i % 4) as f64).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    rows[0] = vec![-5.0, -4.0, -6.0, -5.0, -4.5, -5.5];
    rows[1][2] = f64::NAN;
    let input = SessionInput::Single(Session::new(FeatureMatrix::from_rows(rows).unwrap(), labels));

    let mut renderer = renderer(RecordingWriter::default());
    let mut canvas = Canvas::new(RecordingViewer::default());
    let summary = renderer.render(&mut canvas, &input).unwrap();

    assert_eq!(summary.channel_errors.len(), 1);
    assert!(matches!(
        summary.channel_errors[0],
        RenderError::InvalidRange {
            session: 1,
            channel: 0,
            ..
        }
    ));
    assert_eq!(
        base_names(&summary),
        ["feat2_hist", "feat3_hist", "feat4_hist", "feat5_hist", "feat6_hist"]
    );
    let with_gap = &summary.artifacts[0];
    assert!(with_gap.range.low < with_gap.range.high);
    let counted = with_gap
        .panels
        .iter()
        .map(|p| p.histogram.in_range)
        .sum::<u64>();
    assert_eq!(counted, 5);
    assert_eq!(canvas.viewer().shown, 5);
    assert_eq!(canvas.figures_opened(), canvas.figures_released());
}

#[test]
fn test_write_failure_aborts_after_show() {
    let writer = RecordingWriter {
        written: vec![],
        fail_at: Some(2),
    };
    let input = SessionInput::Single(session(vec![0, 1, 0, 1]));
    let mut renderer = renderer(writer);
    let mut canvas = Canvas::new(RecordingViewer::default());
    let err = renderer.render(&mut canvas, &input).unwrap_err();

    let RenderError::Io { path, source } = err else {
        panic!("expected an I/O error");
    };
    assert_eq!(path, Path::new("out").join(format!("feat3_hist{TIMESTAMP}.svg")));
    assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
    assert_eq!(renderer.writer().written.len(), 2);
    assert_eq!(canvas.viewer().shown, 3);
    assert_eq!(canvas.figures_opened(), canvas.figures_released());
}

#[test]
fn test_writes_svg_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut renderer = FeatureHistogramRenderer::new(
        FeatureSemantics::default(),
        dir.path(),
        SvgWriter::default(),
        FixedClock(Timestamp::fixed(TIMESTAMP)),
    );
    let input = SessionInput::Single(session(vec![0, 1, 2, 0, 1, 2, 0, 1, 2]));
    let summary = renderer.render(&mut Canvas::new(RecordingViewer::default()), &input).unwrap();

    assert_eq!(summary.artifacts.len(), 6);
    for artifact in &summary.artifacts {
        assert!(artifact.path.starts_with(dir.path()));
        let svg = fs::read_to_string(&artifact.path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Group 2"));
    }
    let names = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(names, 6);
}
