use std::path::PathBuf;

use canvas::doc::{Background, CameraKind, SceneObject};
use canvas::geom::Point;
use clap::Parser;

use super::*;

fn project_with(objects: Vec<SceneObject>) -> Project {
    let mut project = Project::default();
    let floor = project.active_floor_mut().unwrap();
    for obj in objects {
        floor.add_object(obj).unwrap();
    }
    project
}

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("siteplan-{}-{name}.json", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("siteplan").chain(args.iter().copied())).unwrap()
}

// =============================================================================
// Argument parsing
// =============================================================================

#[test]
fn global_options_parse_after_subcommand() {
    let cli = parse(&["coverage", "plan.json", "--floor", "1", "--pretty"]);
    assert_eq!(cli.opts.floor, Some(1));
    assert!(cli.opts.pretty);
    assert!(matches!(cli.command, Command::Coverage(Input { ref path }) if path == "plan.json"));
}

#[test]
fn input_defaults_to_stdin() {
    let cli = parse(&["summary"]);
    assert!(matches!(cli.command, Command::Summary(Input { ref path }) if path == "-"));
}

#[test]
fn log_level_parses_from_flag() {
    let cli = parse(&["--log-level", "debug", "validate", "plan.json"]);
    assert_eq!(cli.log_level, tracing::Level::DEBUG);
}

#[test]
fn unknown_log_level_is_rejected() {
    let result = Cli::try_parse_from(["siteplan", "--log-level", "loud", "validate"]);
    assert!(result.is_err());
}

#[test]
fn new_uses_default_floor_name() {
    let cli = parse(&["new"]);
    assert!(matches!(cli.command, Command::New { ref floor_name } if floor_name == DEFAULT_FLOOR_NAME));
}

// =============================================================================
// Floor selection
// =============================================================================

#[test]
fn select_floor_defaults_to_active() {
    let mut project = Project::default();
    project.add_floor("Upstairs");
    assert_eq!(select_floor(&project, None).unwrap().name, "Upstairs");
    assert_eq!(select_floor(&project, Some(0)).unwrap().name, DEFAULT_FLOOR_NAME);
}

#[test]
fn select_floor_out_of_range() {
    let project = Project::default();
    let err = select_floor(&project, Some(3)).unwrap_err();
    assert!(matches!(err, CliError::FloorIndex { index: 3, len: 1 }));
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn new_project_is_a_loadable_document() {
    let value = new_project("Basement").unwrap();
    let project = Project::from_json(&value.to_string()).unwrap();
    assert_eq!(project.floors.len(), 1);
    assert_eq!(project.floors[0].name, "Basement");
    assert_eq!(project.floors[0].layers.len(), 2);
}

#[test]
fn summary_counts_objects_per_layer() {
    let project = project_with(vec![
        SceneObject::rect(0.0, 0.0, 10.0, 10.0),
        SceneObject::segment(Point::new(0.0, 0.0), Point::new(50.0, 0.0), SegmentKind::Wall),
        SceneObject::segment(Point::new(0.0, 0.0), Point::new(100.0, 0.0), SegmentKind::Wiring),
        SceneObject::camera(Point::new(5.0, 5.0), CameraKind::Dome),
    ]);
    let value = summary(&project).unwrap();
    let floor = &value["floors"][0];
    assert_eq!(floor["active"], true);
    assert_eq!(floor["wiringMeters"], 2.0);

    let active = floor["layers"].as_array().unwrap().iter().find(|l| l["active"] == true).unwrap();
    assert_eq!(active["objects"]["rects"], 1);
    assert_eq!(active["objects"]["walls"], 1);
    assert_eq!(active["objects"]["wiring"], 1);
    assert_eq!(active["objects"]["cameras"], 1);
    assert_eq!(active["objects"]["texts"], 0);
}

#[test]
fn coverage_lists_each_camera_from_its_origin() {
    let project = project_with(vec![
        SceneObject::camera(Point::new(10.0, 20.0), CameraKind::Bullet),
        SceneObject::rect(0.0, 0.0, 5.0, 5.0),
    ]);
    let value = coverage(select_floor(&project, None).unwrap());
    let cameras = value["cameras"].as_array().unwrap();
    assert_eq!(cameras.len(), 1);
    assert_eq!(cameras[0]["outline"][0], json!([10.0, 20.0]));
    assert!(cameras[0]["vertices"].as_u64().unwrap() > 2);
}

#[test]
fn wiring_reports_meters_and_label() {
    let project = project_with(vec![SceneObject::segment(
        Point::new(0.0, 0.0),
        Point::new(250.0, 0.0),
        SegmentKind::Wiring,
    )]);
    let value = wiring(select_floor(&project, None).unwrap());
    assert_eq!(value["meters"], 5.0);
    assert_eq!(value["label"], "5.00 m");
}

#[test]
fn export_bounds_pads_content() {
    let project = project_with(vec![SceneObject::rect(0.0, 0.0, 100.0, 50.0)]);
    let value = export_bounds(select_floor(&project, None).unwrap()).unwrap();
    assert_eq!(value["minX"], -50.0);
    assert_eq!(value["minY"], -50.0);
    assert_eq!(value["width"], 200.0);
    assert_eq!(value["height"], 150.0);
    assert_eq!(value["orientation"], "landscape");
    assert_eq!(value["fileName"], format!("{DEFAULT_FLOOR_NAME}_export.pdf"));
    assert_eq!(value["objects"], 1);
}

#[test]
fn export_bounds_counts_background() {
    let mut project = Project::default();
    project.active_floor_mut().unwrap().background =
        Some(Background { data: "img".into(), width: 100.0, height: 300.0, x: 0.0, y: 0.0 });
    let value = export_bounds(select_floor(&project, None).unwrap()).unwrap();
    assert_eq!(value["background"], true);
    assert_eq!(value["orientation"], "portrait");
}

#[test]
fn export_bounds_on_empty_floor_fails() {
    let project = Project::default();
    let err = export_bounds(select_floor(&project, None).unwrap()).unwrap_err();
    assert!(matches!(err, CliError::Edit(EditError::NothingToExport)));
}

#[test]
fn validate_counts_objects() {
    let project = project_with(vec![SceneObject::rect(0.0, 0.0, 1.0, 1.0)]);
    assert_eq!(validate(&project), json!({ "ok": true, "floors": 1, "objects": 1 }));
}

// =============================================================================
// End to end
// =============================================================================

#[test]
fn run_reads_project_file() {
    let project = project_with(vec![SceneObject::segment(
        Point::new(0.0, 0.0),
        Point::new(50.0, 0.0),
        SegmentKind::Wiring,
    )]);
    let path = write_temp("wiring", &project.to_json(false).unwrap());
    let cli = parse(&["wiring", path.to_str().unwrap()]);
    let output = run(&cli).unwrap();
    fs::remove_file(&path).unwrap();

    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["label"], "1.00 m");
    assert!(!output.contains('\n'));
}

#[test]
fn run_pretty_prints() {
    let cli = parse(&["new", "--pretty"]);
    let output = run(&cli).unwrap();
    assert!(output.contains('\n'));
}

#[test]
fn run_reports_missing_file() {
    let cli = parse(&["summary", "/nonexistent/siteplan/plan.json"]);
    let err = run(&cli).unwrap_err();
    assert!(matches!(err, CliError::Io { ref path, .. } if path == "/nonexistent/siteplan/plan.json"));
}

#[test]
fn run_rejects_invalid_document() {
    let path = write_temp("invalid", r#"{"floors":[],"activeFloorIndex":0}"#);
    let cli = parse(&["validate", path.to_str().unwrap()]);
    let err = run(&cli).unwrap_err();
    fs::remove_file(&path).unwrap();
    assert!(matches!(err, CliError::Edit(EditError::NoFloors)));
}

#[test]
fn run_honours_floor_override() {
    let path = write_temp("floors", &Project::default().to_json(false).unwrap());
    let cli = parse(&["wiring", path.to_str().unwrap(), "--floor", "4"]);
    let err = run(&cli).unwrap_err();
    fs::remove_file(&path).unwrap();
    assert!(matches!(err, CliError::FloorIndex { index: 4, len: 1 }));
}

#[test]
fn run_rejects_camera_outside_property_ranges() {
    let mut project = project_with(vec![SceneObject::camera(Point::new(0.0, 0.0), CameraKind::Bullet)]);
    let floor = project.active_floor_mut().unwrap();
    let active = floor.active_layer_id.clone();
    if let Shape::Camera(cam) = &mut floor.layer_mut(&active).unwrap().objects[0].shape {
        cam.fov = 2_000_000.0;
    }
    let path = write_temp("camera-range", &project.to_json(false).unwrap());
    let cli = parse(&["coverage", path.to_str().unwrap()]);
    let err = run(&cli).unwrap_err();
    fs::remove_file(&path).unwrap();
    assert!(matches!(err, CliError::Edit(EditError::InvalidObject(_))));
}
