use billiard_launcher::{
    infer_mode, render, ModeSource, SimulationMode, TableGeometry, Trajectory,
};
use tempfile::tempdir;

fn path_with_min_y(min_y: f64) -> Trajectory {
    Trajectory::new(vec![(0.0, 1.0), (3.0, min_y), (-2.0, 4.0)])
}

#[test]
fn slightly_negative_minimum_infers_flat_edge() {
    let plot = render(&path_with_min_y(-0.05), &TableGeometry::STANDARD, None);
    assert_eq!(plot.mode, SimulationMode::SemiCircular);
    assert_eq!(plot.mode_source, ModeSource::Inferred);
    assert!(plot.has_flat_edge());
    assert!(plot.to_svg().contains(r#"class="flat-edge""#));
}

#[test]
fn deep_minimum_infers_full_circle() {
    let plot = render(&path_with_min_y(-5.0), &TableGeometry::STANDARD, None);
    assert_eq!(plot.mode, SimulationMode::Circular);
    assert!(!plot.has_flat_edge());
    assert!(!plot.to_svg().contains("flat-edge"));
}

#[test]
fn tolerance_is_exclusive() {
    assert_eq!(infer_mode(&path_with_min_y(-0.1)), SimulationMode::Circular);
}

#[test]
fn empty_trajectory_infers_circular() {
    assert_eq!(infer_mode(&Trajectory::default()), SimulationMode::Circular);
}

#[test]
fn known_mode_overrides_the_heuristic() {
    // A circular run that never went below y = 0 would be misread by inference.
    let upper_only = Trajectory::new(vec![(0.0, 1.0), (5.0, 5.0), (-5.0, 5.0)]);
    let plot = render(
        &upper_only,
        &TableGeometry::STANDARD,
        Some(SimulationMode::Circular),
    );
    assert_eq!(plot.mode_source, ModeSource::Known);
    assert!(!plot.has_flat_edge());
}

#[test]
fn svg_is_square_with_boundary_and_ordered_polyline() {
    let trajectory = Trajectory::new(vec![(0.0, 1.0), (1.0, 1.0), (2.0, 0.5)]);
    let plot = render(
        &trajectory,
        &TableGeometry::STANDARD,
        Some(SimulationMode::Circular),
    );
    let svg = plot.to_svg();

    assert!(svg.contains(r#"width="600" height="600""#));
    assert!(svg.contains(r#"<circle class="boundary" cx="0" cy="0" r="7.5""#));
    assert!(svg.contains(r#"points="0,1 1,1 2,0.5""#));
}

#[test]
fn viewport_grows_to_fit_stray_points() {
    let trajectory = Trajectory::new(vec![(0.0, 0.0), (20.0, 0.0)]);
    let plot = render(
        &trajectory,
        &TableGeometry::STANDARD,
        Some(SimulationMode::Circular),
    );
    assert!(plot.extent() >= 20.0);
}

#[test]
fn empty_trajectory_still_draws_the_table() {
    let plot = render(
        &Trajectory::default(),
        &TableGeometry::STANDARD,
        Some(SimulationMode::SemiCircular),
    );
    let svg = plot.to_svg();
    assert!(svg.contains("boundary"));
    assert!(svg.contains("flat-edge"));
    assert!(!svg.contains("polyline"));
}

#[test]
fn writes_svg_file() {
    let dir = tempdir().expect("temp dir");
    let out = dir.path().join("plot.svg");
    render(
        &path_with_min_y(0.0),
        &TableGeometry::STANDARD,
        Some(SimulationMode::SemiCircular),
    )
    .write_svg(&out)
    .expect("plot should be written");

    let svg = std::fs::read_to_string(&out).expect("read plot");
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
}
