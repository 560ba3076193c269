//! `siteplan` subcommands: load a project document and report on one floor.
//!
//! Every command produces a JSON value; `run` renders it compactly or, with
//! `--pretty`, indented. File arguments accept `-` for stdin.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::fs;
use std::io::{self, Read};

use canvas::doc::{DEFAULT_FLOOR_NAME, Floor, Layer, Project, SegmentKind, Shape};
use canvas::error::EditError;
use canvas::export::{Orientation, export_request};
use canvas::measure::{format_budget, wiring_meters};
use canvas::visibility::floor_coverage;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("floor {index} out of range; the project has {len} floor(s)")]
    FloorIndex { index: usize, len: usize },
}

#[derive(Parser, Debug)]
#[command(name = "siteplan", about = "Inspect camera coverage floor plans")]
pub struct Cli {
    /// Maximum log level written to stderr.
    #[arg(long, env = "SITEPLAN_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(flatten)]
    pub opts: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Floor index to report on; defaults to the document's active floor.
    #[arg(long, env = "SITEPLAN_FLOOR", global = true)]
    pub floor: Option<usize>,

    /// Indent JSON output.
    #[arg(long, env = "SITEPLAN_PRETTY", global = true)]
    pub pretty: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print an empty project with one floor and the default layers.
    New {
        #[arg(long, default_value = DEFAULT_FLOOR_NAME)]
        floor_name: String,
    },
    /// Floors, layers, and object counts.
    Summary(Input),
    /// Coverage polygon of every camera on visible layers.
    Coverage(Input),
    /// Total visible wiring length in meters.
    Wiring(Input),
    /// Padded export box and page orientation.
    ExportBounds(Input),
    /// Check the document invariants.
    Validate(Input),
}

#[derive(Args, Debug)]
pub struct Input {
    /// Project file, or `-` for stdin.
    #[arg(default_value = "-")]
    pub path: String,
}

/// Execute the parsed command and render its JSON output.
///
/// # Errors
///
/// Returns [`CliError`] when the input cannot be read or parsed, the floor
/// override is out of range, or the command itself fails.
pub fn run(cli: &Cli) -> Result<String, CliError> {
    let floor = cli.opts.floor;
    let value = match &cli.command {
        Command::New { floor_name } => new_project(floor_name)?,
        Command::Summary(input) => summary(&load(input)?)?,
        Command::Coverage(input) => {
            let project = load(input)?;
            coverage(select_floor(&project, floor)?)
        }
        Command::Wiring(input) => {
            let project = load(input)?;
            wiring(select_floor(&project, floor)?)
        }
        Command::ExportBounds(input) => {
            let project = load(input)?;
            export_bounds(select_floor(&project, floor)?)?
        }
        Command::Validate(input) => validate(&load(input)?),
    };
    render(&value, cli.opts.pretty)
}

fn render(value: &Value, pretty: bool) -> Result<String, CliError> {
    let rendered = if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
    Ok(rendered)
}

fn read_input(path: &str) -> Result<String, CliError> {
    let io_err = |source| CliError::Io { path: path.to_owned(), source };
    if path == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(io_err)?;
        Ok(text)
    } else {
        fs::read_to_string(path).map_err(io_err)
    }
}

/// Read and validate a project document.
pub fn load(input: &Input) -> Result<Project, CliError> {
    let text = read_input(&input.path)?;
    debug!(path = %input.path, bytes = text.len(), "read project");
    let project = Project::from_json(&text)?;
    info!(path = %input.path, floors = project.floors.len(), "loaded project");
    Ok(project)
}

/// The floor named by `--floor`, or the active floor.
pub fn select_floor(project: &Project, index: Option<usize>) -> Result<&Floor, CliError> {
    let index = index.unwrap_or(project.active_floor_index);
    project
        .floors
        .get(index)
        .map(AsRef::as_ref)
        .ok_or(CliError::FloorIndex { index, len: project.floors.len() })
}

// =============================================================================
// Commands
// =============================================================================

pub fn new_project(floor_name: &str) -> Result<Value, CliError> {
    let mut project = Project::default();
    project.rename_floor(0, floor_name)?;
    Ok(serde_json::to_value(&project)?)
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectCounts {
    pub rects: usize,
    pub walls: usize,
    pub wiring: usize,
    pub texts: usize,
    pub cameras: usize,
}

impl ObjectCounts {
    fn of(layer: &Layer) -> Self {
        let mut counts = Self::default();
        for obj in &layer.objects {
            match &obj.shape {
                Shape::Rect(_) => counts.rects += 1,
                Shape::Segment(s) if s.kind == SegmentKind::Wall => counts.walls += 1,
                Shape::Segment(_) => counts.wiring += 1,
                Shape::Text(_) => counts.texts += 1,
                Shape::Camera(_) => counts.cameras += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LayerSummary<'a> {
    id: &'a str,
    name: &'a str,
    visible: bool,
    active: bool,
    objects: ObjectCounts,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FloorSummary<'a> {
    index: usize,
    name: &'a str,
    active: bool,
    background: bool,
    wiring_meters: f64,
    layers: Vec<LayerSummary<'a>>,
}

pub fn summary(project: &Project) -> Result<Value, CliError> {
    let floors: Vec<FloorSummary<'_>> = project
        .floors
        .iter()
        .enumerate()
        .map(|(index, floor)| FloorSummary {
            index,
            name: &floor.name,
            active: index == project.active_floor_index,
            background: floor.background.is_some(),
            wiring_meters: wiring_meters(floor),
            layers: floor
                .layers
                .iter()
                .map(|layer| LayerSummary {
                    id: &layer.id,
                    name: &layer.name,
                    visible: layer.visible,
                    active: layer.id == floor.active_layer_id,
                    objects: ObjectCounts::of(layer),
                })
                .collect(),
        })
        .collect();
    let floors = serde_json::to_value(floors)?;
    Ok(json!({ "activeFloorIndex": project.active_floor_index, "floors": floors }))
}

#[must_use]
pub fn coverage(floor: &Floor) -> Value {
    let cameras: Vec<Value> = floor_coverage(floor)
        .into_iter()
        .map(|(id, poly)| {
            let outline: Vec<[f64; 2]> = poly.outline().map(|p| [p.x, p.y]).collect();
            json!({ "id": id, "vertices": poly.vertices.len(), "outline": outline })
        })
        .collect();
    debug!(floor = %floor.name, cameras = cameras.len(), "computed coverage");
    json!({ "floor": floor.name, "cameras": cameras })
}

#[must_use]
pub fn wiring(floor: &Floor) -> Value {
    let meters = wiring_meters(floor);
    json!({ "floor": floor.name, "meters": meters, "label": format_budget(meters) })
}

pub fn export_bounds(floor: &Floor) -> Result<Value, CliError> {
    let req = export_request(floor)?;
    let orientation = match req.orientation {
        Orientation::Landscape => "landscape",
        Orientation::Portrait => "portrait",
    };
    Ok(json!({
        "fileName": req.file_name,
        "minX": req.bounds.min_x,
        "minY": req.bounds.min_y,
        "width": req.bounds.width(),
        "height": req.bounds.height(),
        "orientation": orientation,
        "background": req.background.is_some(),
        "objects": req.objects.len(),
    }))
}

/// Loading already enforces the invariants; report what was checked.
#[must_use]
pub fn validate(project: &Project) -> Value {
    let objects: usize = project.floors.iter().flat_map(|f| f.layers.iter()).map(|l| l.objects.len()).sum();
    json!({ "ok": true, "floors": project.floors.len(), "objects": objects })
}
