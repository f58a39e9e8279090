use std::time::Duration;

use anyhow::{Context, Result, bail};
use cgmath::{Deg, Point3, Vector3};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pcanno_base::ensure_finite;
use pcanno_cuboid::{CornerRef, Cuboid, DragTarget, PlaneKind, try_drag_move};
use pcanno_geometry::{Corner, Plane, Point2, Vec2};
use pcanno_segment::{
    Buttons, MemoryScene, PerspectiveCamera, PointBuffer, PointerSample, SceneRegistry,
    SegmentConfig, SegmentStore, SelectorKind, Viewport,
};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "pcanno")]
#[command(about = "Headless harness for the cuboid solver and point-cloud selection")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the hover envelope of a cuboid.
    Envelope(CuboidArgs),
    /// Apply a drag to a cuboid and print the result.
    Drag(DragArgs),
    /// Select points of a synthetic grid cloud with a screen gesture.
    Select(SelectArgs),
}

#[derive(Args)]
struct CuboidArgs {
    /// Front plane as `left,top,right,bottom`.
    #[arg(long)]
    front: String,
    /// Back plane as `left,top,right,bottom`.
    #[arg(long)]
    back: String,
}

#[derive(Args)]
struct DragArgs {
    #[command(flatten)]
    cuboid: CuboidArgs,
    #[arg(long, value_enum)]
    target: TargetArg,
    /// Edited corners, e.g. `front:tl,front:tr`.
    #[arg(long, default_value = "")]
    corners: String,
    /// Drag offset as `dx,dy`.
    #[arg(long)]
    offset: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetArg {
    Point,
    Line,
    Cuboid,
}

impl From<TargetArg> for DragTarget {
    fn from(value: TargetArg) -> Self {
        match value {
            TargetArg::Point => DragTarget::Point,
            TargetArg::Line => DragTarget::Line,
            TargetArg::Cuboid => DragTarget::Cuboid,
        }
    }
}

#[derive(Args)]
struct SelectArgs {
    #[arg(long, value_enum, default_value_t = ShapeArg::Rect)]
    shape: ShapeArg,
    /// Gesture start in pixels, `x,y`.
    #[arg(long)]
    from: String,
    /// Gesture end in pixels, `x,y`.
    #[arg(long)]
    to: String,
    /// Points per side of the synthetic grid.
    #[arg(long, default_value_t = 200)]
    grid: usize,
    #[arg(long, default_value_t = 0.1)]
    spacing: f32,
    #[arg(long, default_value_t = 800.0)]
    width: f64,
    #[arg(long, default_value_t = 600.0)]
    height: f64,
    /// Seconds to wait for the filter job.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeArg {
    Rect,
    Circle,
}

impl From<ShapeArg> for SelectorKind {
    fn from(value: ShapeArg) -> Self {
        match value {
            ShapeArg::Rect => SelectorKind::Rect,
            ShapeArg::Circle => SelectorKind::Circle,
        }
    }
}

#[derive(Serialize)]
struct EnvelopeReport {
    envelope: Vec<Point2>,
    contains_center: bool,
}

#[derive(Serialize)]
struct SelectReport {
    generation: u64,
    total: usize,
    selected: usize,
    polygon_points: usize,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Envelope(args) => envelope(args),
        Command::Drag(args) => drag(args),
        Command::Select(args) => select(args),
    }
}

fn envelope(args: CuboidArgs) -> Result<()> {
    let cuboid = parse_cuboid(&args)?;
    let report = EnvelopeReport {
        envelope: cuboid.hover_envelope(),
        contains_center: cuboid.contains(cuboid.front.center()),
    };
    print_json(&report)
}

fn drag(args: DragArgs) -> Result<()> {
    let cuboid = parse_cuboid(&args.cuboid)?;
    let positions = parse_corners(&args.corners)?;
    let (dx, dy) = parse_pair(&args.offset, "--offset")?;
    let moved = try_drag_move(Vec2::new(dx, dy), &cuboid, args.target.into(), &positions)
        .context("drag rejected")?;
    print_json(&moved)
}

fn select(args: SelectArgs) -> Result<()> {
    let (x0, y0) = parse_pair(&args.from, "--from")?;
    let (x1, y1) = parse_pair(&args.to, "--to")?;
    if args.grid == 0 {
        bail!("--grid must be positive");
    }

    let config = SegmentConfig::default();
    let mut scene = MemoryScene::new();
    let cloud = grid_cloud(args.grid, args.spacing)?;
    let total = cloud.len();
    scene.add_object(&config.point_cloud_name, cloud);

    let extent = args.grid as f32 * args.spacing;
    let camera = PerspectiveCamera::look_at(
        Point3::new(0.0, 0.0, extent * 1.5),
        Point3::new(0.0, 0.0, 0.0),
        Vector3::unit_y(),
        Deg(45.0),
        Viewport::new(args.width, args.height),
    );

    let mut store = SegmentStore::new(config.clone());
    store.set_selector(args.shape.into());
    store.pointer_down(PointerSample::new(Point2::new(x0, y0), Buttons::SECONDARY));
    store.pointer_move(PointerSample::new(Point2::new(x1, y1), Buttons::SECONDARY));
    let polygon_points = store.polygon().len();
    let Some(generation) =
        store.pointer_up(PointerSample::new(Point2::new(x1, y1), Buttons::NONE), &scene, &camera)
    else {
        bail!("gesture did not produce a selection polygon");
    };

    let mut redraws = 0usize;
    let applied = store.wait(
        Duration::from_secs(args.timeout),
        &mut scene,
        &mut || redraws += 1,
    );
    if !applied {
        bail!("filter job did not finish within {}s", args.timeout);
    }
    let selected = scene
        .find_object(&config.selection_name)
        .map(PointBuffer::len)
        .unwrap_or_default();
    info!(total, selected, redraws, "selection complete");

    print_json(&SelectReport {
        generation,
        total,
        selected,
        polygon_points,
    })
}

/// Flat `grid x grid` cloud centred on the origin, rising in z from left
/// to right.
fn grid_cloud(grid: usize, spacing: f32) -> Result<PointBuffer> {
    let half = grid as f32 * spacing * 0.5;
    let mut positions = Vec::with_capacity(grid * grid * 3);
    for row in 0..grid {
        for col in 0..grid {
            let x = col as f32 * spacing - half;
            let y = row as f32 * spacing - half;
            let z = col as f32 / grid as f32 * 12.0;
            positions.extend_from_slice(&[x, y, z]);
        }
    }
    PointBuffer::new(positions, Vec::new()).context("failed to build grid cloud")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialise output")?;
    println!("{text}");
    Ok(())
}

fn parse_cuboid(args: &CuboidArgs) -> Result<Cuboid> {
    let front = parse_plane(&args.front).context("invalid --front")?;
    let back = parse_plane(&args.back).context("invalid --back")?;
    Ok(Cuboid::new(front, back))
}

fn parse_plane(text: &str) -> Result<Plane> {
    let values = parse_numbers(text)?;
    let &[left, top, right, bottom] = values.as_slice() else {
        bail!("plane expects four comma-separated numbers, e.g. 0,0,100,80");
    };
    Ok(Plane::from_extents(left, top, right, bottom))
}

fn parse_pair(text: &str, flag: &str) -> Result<(f64, f64)> {
    let values = parse_numbers(text).with_context(|| format!("invalid {flag}"))?;
    let &[x, y] = values.as_slice() else {
        bail!("{flag} expects two comma-separated numbers, e.g. 10,20");
    };
    Ok((x, y))
}

fn parse_numbers(text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .map(|part| {
            let value = part
                .trim()
                .parse::<f64>()
                .with_context(|| format!("invalid number {part:?}"))?;
            ensure_finite(part.trim(), value)?;
            Ok(value)
        })
        .collect()
}

fn parse_corners(text: &str) -> Result<Vec<CornerRef>> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_corner)
        .collect()
}

fn parse_corner(text: &str) -> Result<CornerRef> {
    let Some((plane, corner)) = text.split_once(':') else {
        bail!("corner expects `plane:corner`, e.g. front:tl, got {text:?}");
    };
    let plane = match plane {
        "front" => PlaneKind::Front,
        "back" => PlaneKind::Back,
        other => bail!("unknown plane {other:?}"),
    };
    let corner = match corner {
        "tl" => Corner::TopLeft,
        "tr" => Corner::TopRight,
        "bl" => Corner::BottomLeft,
        "br" => Corner::BottomRight,
        other => bail!("unknown corner {other:?}"),
    };
    Ok(CornerRef::new(plane, corner))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
