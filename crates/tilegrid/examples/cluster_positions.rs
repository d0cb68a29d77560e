use std::error::Error;
use std::path::Path;

use tilegrid::{AxisOrientation, GridConfig, GridSolver, StagePosition};

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} <positions.json> <n_sites> [config.json] [out.json]",
            args[0]
        );
        std::process::exit(2);
    }

    let data = std::fs::read_to_string(Path::new(&args[1]))?;
    let positions: Vec<StagePosition> = serde_json::from_str(&data)?;
    let n: usize = args[2].parse()?;
    let config = match args.get(3) {
        Some(path) => GridConfig::from_json_file(Path::new(path))?,
        None => GridConfig::default(),
    };

    let solver = GridSolver::with_config(config);
    let assignment = solver.assign_from_positions(&positions, n, AxisOrientation::default())?;
    println!(
        "Assigned {} positions to a {} grid.",
        assignment.coordinates.len(),
        assignment.dimensions
    );
    for (cell, centroid) in assignment.centroids.iter().enumerate() {
        let (row, col) = (
            cell / assignment.dimensions.cols(),
            cell % assignment.dimensions.cols(),
        );
        println!("  ({row}, {col}) at y={:.2} x={:.2}", centroid.y, centroid.x);
    }

    if let Some(out_path) = args.get(4) {
        let json = serde_json::to_string_pretty(&assignment)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
