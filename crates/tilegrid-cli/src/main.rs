//! tilegrid CLI: command-line interface for acquisition-grid inference.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};

use tilegrid::{
    AxisOrientation, GridCoordinate, GridDimensions, GridSolver, Layout, MajorAxis, StagePosition,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "tilegrid")]
#[command(
    about = "Infer tiling-microscope acquisition grids: dimensions, scan layout, and tile cells"
)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Args)]
struct GlobalArgs {
    /// Path to a GridConfig JSON file. Missing fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to write results (JSON). Defaults to stdout.
    #[arg(long, global = true)]
    out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Guess grid dimensions from a tile count.
    Guess {
        /// Number of tiles.
        #[arg(long)]
        n: usize,

        /// Axis that carries the longer side.
        #[arg(long, value_enum, default_value_t = MajorAxisArg::Vertical)]
        major_axis: MajorAxisArg,
    },

    /// Print the cell visited at each acquisition index for a layout.
    Generate(CliGridArgs),

    /// Detect the scan layout from stage positions in acquisition order.
    Detect(CliDetectArgs),

    /// Assign grid cells to raw stage positions by clustering.
    Cluster(CliClusterArgs),
}

#[derive(Debug, Clone, Args)]
struct CliGridArgs {
    /// Number of grid rows.
    #[arg(long)]
    rows: usize,

    /// Number of grid columns.
    #[arg(long)]
    cols: usize,

    /// Scan layout.
    #[arg(long, value_enum)]
    layout: LayoutArg,
}

#[derive(Debug, Clone, Args)]
struct CliDetectArgs {
    /// Number of grid rows.
    #[arg(long)]
    rows: usize,

    /// Number of grid columns.
    #[arg(long)]
    cols: usize,

    /// JSON array of {"y": .., "x": ..} stage positions in acquisition order.
    #[arg(long)]
    positions: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct CliClusterArgs {
    /// JSON array of {"y": .., "x": ..} stage positions.
    #[arg(long)]
    positions: PathBuf,

    /// Number of distinct stage sites (grid cells).
    #[arg(long)]
    n: usize,

    /// Row index increases with decreasing stage y.
    #[arg(long)]
    reverse_rows: bool,

    /// Column index increases with decreasing stage x.
    #[arg(long)]
    reverse_columns: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MajorAxisArg {
    Vertical,
    Horizontal,
}

impl MajorAxisArg {
    fn to_core(self) -> MajorAxis {
        match self {
            Self::Vertical => MajorAxis::Vertical,
            Self::Horizontal => MajorAxis::Horizontal,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
enum LayoutArg {
    Horizontal,
    ZigzagHorizontal,
    Vertical,
    ZigzagVertical,
}

impl LayoutArg {
    fn to_core(self) -> Layout {
        match self {
            Self::Horizontal => Layout::Horizontal,
            Self::ZigzagHorizontal => Layout::ZigzagHorizontal,
            Self::Vertical => Layout::Vertical,
            Self::ZigzagVertical => Layout::ZigzagVertical,
        }
    }
}

#[derive(Debug, Serialize)]
struct GuessOutput {
    n: usize,
    major_axis: MajorAxis,
    dimensions: GridDimensions,
}

#[derive(Debug, Serialize)]
struct LayoutOutput {
    dimensions: GridDimensions,
    layout: Layout,
    coordinates: Vec<GridCoordinate>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let solver = build_solver(&cli.global)?;

    match cli.command {
        Commands::Guess { n, major_axis } => run_guess(&solver, n, major_axis, &cli.global),
        Commands::Generate(args) => run_generate(&solver, &args, &cli.global),
        Commands::Detect(args) => run_detect(&solver, &args, &cli.global),
        Commands::Cluster(args) => run_cluster(&solver, &args, &cli.global),
    }
}

fn build_solver(global: &GlobalArgs) -> CliResult<GridSolver> {
    match &global.config {
        Some(path) => {
            tracing::info!("Loading config: {}", path.display());
            GridSolver::from_config_file(path)
        }
        None => Ok(GridSolver::new()),
    }
}

fn load_positions(path: &Path) -> CliResult<Vec<StagePosition>> {
    tracing::info!("Loading positions: {}", path.display());
    let data = std::fs::read_to_string(path)?;
    let positions: Vec<StagePosition> = serde_json::from_str(&data)?;
    tracing::info!("Loaded {} stage positions", positions.len());
    Ok(positions)
}

fn write_output<T: Serialize>(value: &T, global: &GlobalArgs) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    match &global.out {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("Results written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

// ── guess ──────────────────────────────────────────────────────────────

fn run_guess(
    solver: &GridSolver,
    n: usize,
    major_axis: MajorAxisArg,
    global: &GlobalArgs,
) -> CliResult<()> {
    let major_axis = major_axis.to_core();
    let dimensions = solver.guess_dimensions(n, major_axis)?;
    tracing::info!("{} tiles -> {} grid", n, dimensions);
    write_output(
        &GuessOutput {
            n,
            major_axis,
            dimensions,
        },
        global,
    )
}

// ── generate ───────────────────────────────────────────────────────────

fn run_generate(solver: &GridSolver, args: &CliGridArgs, global: &GlobalArgs) -> CliResult<()> {
    let dimensions = GridDimensions::new(args.rows, args.cols)?;
    let layout = args.layout.to_core();
    let coordinates = solver.coordinates_from_layout(dimensions, layout);
    write_output(
        &LayoutOutput {
            dimensions,
            layout,
            coordinates,
        },
        global,
    )
}

// ── detect ─────────────────────────────────────────────────────────────

fn run_detect(solver: &GridSolver, args: &CliDetectArgs, global: &GlobalArgs) -> CliResult<()> {
    let dimensions = GridDimensions::new(args.rows, args.cols)?;
    let positions = load_positions(&args.positions)?;
    let layout = solver.detect_layout(dimensions, &positions)?;
    tracing::info!("Detected {} layout for {} grid", layout, dimensions);
    let coordinates = solver.coordinates_from_layout(dimensions, layout);
    write_output(
        &LayoutOutput {
            dimensions,
            layout,
            coordinates,
        },
        global,
    )
}

// ── cluster ────────────────────────────────────────────────────────────

fn run_cluster(solver: &GridSolver, args: &CliClusterArgs, global: &GlobalArgs) -> CliResult<()> {
    let positions = load_positions(&args.positions)?;
    let orientation = AxisOrientation {
        reverse_rows: args.reverse_rows,
        reverse_columns: args.reverse_columns,
    };
    let assignment = solver.assign_from_positions(&positions, args.n, orientation)?;
    tracing::info!(
        "Assigned {} positions to a {} grid",
        assignment.coordinates.len(),
        assignment.dimensions
    );
    write_output(&assignment, global)
}
