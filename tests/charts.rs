use std::fs;

use pitchside::chart::Axis;
use pitchside::{
    ChartKind, ExploreError, Explorer, HistogramConfig, LineConfig, LineStyle, Marker, Removal,
    ScatterConfig,
};
use tempfile::TempDir;

const MATCHES_CSV: &str = "\
Date,HomeTeam,FTHG,FTAG,HS,AS
11/08/2023,Burnley,0,3,6,17
12/08/2023,Arsenal,2,1,15,6
12/08/2023,Bournemouth,1,1,14,16
12/08/2023,Brighton,4,1,27,9
13/08/2023,Everton,0,1,19,9
";

fn loaded(dir: &TempDir) -> Explorer {
    let path = dir.path().join("matches.csv");
    fs::write(&path, MATCHES_CSV).unwrap();
    let mut explorer = Explorer::new();
    explorer.load_from_csv(&path).unwrap();
    explorer
}

#[test]
fn histogram_defaults() {
    let dir = TempDir::new().unwrap();
    let mut explorer = loaded(&dir);

    let fig = explorer
        .add_histogram("FTHG", "hist_goals", &HistogramConfig::default())
        .unwrap();
    assert_eq!(fig.kind(), ChartKind::Histogram);
    assert_eq!(fig.title(), "Histogram: FTHG");
    assert_eq!(fig.y_label(), "Frequency");

    let bins = fig.bins().unwrap();
    assert_eq!(bins.len(), 15);
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
    assert_eq!(fig.image().dimensions(), (640, 480));
}

#[test]
fn same_name_replaces_figure() {
    let dir = TempDir::new().unwrap();
    let mut explorer = loaded(&dir);

    explorer
        .add_histogram("FTHG", "goals", &HistogramConfig::default())
        .unwrap();
    explorer
        .add_scatter_plot("HS", "AS", "goals", &ScatterConfig::default())
        .unwrap();

    assert_eq!(explorer.figures().len(), 1);
    assert_eq!(explorer.figure("goals").unwrap().kind(), ChartKind::Scatter);
}

#[test]
fn remove_reports_unknown_names() {
    let dir = TempDir::new().unwrap();
    let mut explorer = loaded(&dir);
    explorer
        .add_histogram("FTHG", "hist", &HistogramConfig::default())
        .unwrap();

    assert_eq!(explorer.remove_visualization("hist"), Removal::Removed);
    assert_eq!(explorer.remove_visualization("hist"), Removal::NotFound);
    assert!(explorer.figures().is_empty());
}

#[test]
fn line_plot_over_dates_uses_categories() {
    let dir = TempDir::new().unwrap();
    let mut explorer = loaded(&dir);

    let config = LineConfig {
        color: "#1f77b4".into(),
        marker: Marker::Square,
        line_style: LineStyle::Dashed,
        ..LineConfig::default()
    };
    let fig = explorer
        .add_line_plot("Date", "FTHG", "line_goals", &config)
        .unwrap();

    assert_eq!(fig.title(), "Line plot: Date vs FTHG");
    assert_eq!(
        fig.x_axis(),
        &Axis::Categorical(vec![
            "11/08/2023".into(),
            "12/08/2023".into(),
            "13/08/2023".into()
        ])
    );
    assert_eq!(fig.points().unwrap().len(), 5);
}

#[test]
fn save_all_writes_png_per_figure() {
    let dir = TempDir::new().unwrap();
    let mut explorer = loaded(&dir);
    explorer
        .add_histogram("FTHG", "hist_goals", &HistogramConfig::default())
        .unwrap();
    explorer
        .add_scatter_plot("HS", "AS", "scatter_shots", &ScatterConfig::default())
        .unwrap();

    let out = dir.path().join("figures");
    fs::create_dir(&out).unwrap();
    let written = explorer.save_all_figures(&out, "png").unwrap();

    assert_eq!(
        written,
        vec![out.join("hist_goals.png"), out.join("scatter_shots.png")]
    );
    for path in &written {
        let img = image::open(path).unwrap();
        assert_eq!((img.width(), img.height()), (640, 480));
    }
}

#[test]
fn svg_save_is_vector_output() {
    let dir = TempDir::new().unwrap();
    let mut explorer = loaded(&dir);
    let fig = explorer
        .add_scatter_plot("HS", "AS", "shots", &ScatterConfig::default())
        .unwrap();

    let path = dir.path().join("shots.svg");
    fig.save(&path).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("<svg"));
}

#[test]
fn save_path_writes_immediately() {
    let dir = TempDir::new().unwrap();
    let mut explorer = loaded(&dir);
    let path = dir.path().join("hist.png");

    let config = HistogramConfig {
        bins: 4,
        title: Some("Home goals".into()),
        save_path: Some(path.clone()),
        ..HistogramConfig::default()
    };
    let fig = explorer.add_histogram("FTHG", "hist", &config).unwrap();

    assert_eq!(fig.title(), "Home goals");
    assert!(path.is_file());
}

#[test]
fn chart_errors_leave_collection_untouched() {
    let mut empty = Explorer::new();
    assert!(matches!(
        empty.add_histogram("FTHG", "h", &HistogramConfig::default()),
        Err(ExploreError::NoDataset)
    ));

    let dir = TempDir::new().unwrap();
    let mut explorer = loaded(&dir);
    explorer
        .add_histogram("FTHG", "keep", &HistogramConfig::default())
        .unwrap();

    assert!(matches!(
        explorer.add_histogram("Shots", "keep", &HistogramConfig::default()),
        Err(ExploreError::ColumnNotFound(c)) if c == "Shots"
    ));
    assert!(matches!(
        explorer.add_histogram("HomeTeam", "keep", &HistogramConfig::default()),
        Err(ExploreError::NonNumericColumn(_))
    ));
    let bad_color = ScatterConfig {
        color: "not-a-colour".into(),
        ..ScatterConfig::default()
    };
    assert!(matches!(
        explorer.add_scatter_plot("HS", "AS", "keep", &bad_color),
        Err(ExploreError::InvalidOption { option: "color", .. })
    ));

    assert_eq!(
        explorer.figure("keep").map(|f| f.kind()),
        Some(ChartKind::Histogram)
    );
    assert!(explorer.status_message.is_some());
}

#[test]
fn paired_charts_check_both_columns() {
    let dir = TempDir::new().unwrap();
    let mut explorer = loaded(&dir);
    explorer
        .add_scatter_plot("HS", "AS", "shots", &ScatterConfig::default())
        .unwrap();

    assert!(matches!(
        explorer.add_line_plot("Kickoff", "FTHG", "line", &LineConfig::default()),
        Err(ExploreError::ColumnNotFound(c)) if c == "Kickoff"
    ));
    assert!(matches!(
        explorer.add_scatter_plot("HS", "Corners", "shots", &ScatterConfig::default()),
        Err(ExploreError::ColumnNotFound(c)) if c == "Corners"
    ));

    assert_eq!(explorer.figures().len(), 1);
    assert_eq!(explorer.figure("shots").unwrap().title(), "Scatter plot: HS vs AS");
}

#[test]
fn figures_do_not_follow_later_dataset_edits() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shots.csv");
    fs::write(&path, "HS,AS\n10,2\n3,\n5,6\n").unwrap();
    let mut explorer = Explorer::new();
    explorer.load_from_csv(&path).unwrap();

    explorer
        .add_scatter_plot("HS", "AS", "shots", &ScatterConfig::default())
        .unwrap();
    explorer
        .add_histogram("HS", "hist", &HistogramConfig::default())
        .unwrap();
    let points = explorer.figure("shots").unwrap().points().unwrap().to_vec();
    let bins = explorer.figure("hist").unwrap().bins().unwrap().to_vec();
    let pixels = explorer.figure("shots").unwrap().image().clone();

    explorer
        .fill_missing_values(&"mean".parse().unwrap(), Some(&["AS"]))
        .unwrap();
    explorer.drop_columns(&["HS"]).unwrap();

    let shots = explorer.figure("shots").unwrap();
    assert_eq!(shots.points().unwrap(), &points[..]);
    assert_eq!(points.len(), 2);
    assert!(shots.image() == &pixels);
    assert_eq!(explorer.figure("hist").unwrap().bins().unwrap(), &bins[..]);
}
