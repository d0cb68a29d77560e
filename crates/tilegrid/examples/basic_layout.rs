use std::error::Error;
use std::path::Path;

use tilegrid::{GridSolver, MajorAxis, StagePosition};

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <positions.json> [vertical|horizontal] [out.json]",
            args[0]
        );
        std::process::exit(2);
    }

    let data = std::fs::read_to_string(Path::new(&args[1]))?;
    let positions: Vec<StagePosition> = serde_json::from_str(&data)?;
    let major_axis: MajorAxis = match args.get(2) {
        Some(s) => s.parse()?,
        None => MajorAxis::Vertical,
    };

    let solver = GridSolver::new();
    let (dims, layout, coords) = solver.coordinates_from_sequence(&positions, major_axis)?;
    println!(
        "{} tiles form a {} grid scanned {}.",
        positions.len(),
        dims,
        layout
    );

    if let Some(out_path) = args.get(3) {
        let json = serde_json::to_string_pretty(&coords)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
