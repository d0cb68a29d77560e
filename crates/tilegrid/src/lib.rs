//! tilegrid: acquisition-grid inference for tiling microscopes.
//!
//! A tiling microscope images a large specimen as a rectangular mosaic of
//! overlapping tiles. This crate recovers the mosaic structure from whatever
//! the acquisition metadata provides:
//!
//! 1. **Dimensions** – guess `(rows, cols)` from a bare tile count.
//! 2. **Layout** – detect the scan pattern (raster or serpentine, row- or
//!    column-major) from stage positions in acquisition order.
//! 3. **Coordinates** – the `(row, col)` cell of every acquisition index for
//!    a known layout.
//! 4. **Clustering** – grid cells directly from raw, jittered stage positions
//!    (several images per site allowed) via seeded k-means.
//!
//! # Public API
//! - [`GridSolver`] and [`GridConfig`] as primary entry points
//! - free functions for each operation, with `_with` variants taking a
//!   component config
//! - value types ([`GridDimensions`], [`Layout`], [`StagePosition`], ...)
//!   and the [`GridError`] type
//!
//! The crate performs no I/O besides [`GridConfig::from_json_file`].

mod cluster;
mod config;
mod dimensions;
mod error;
mod layout;
mod solver;
mod types;

#[cfg(test)]
mod test_utils;

pub use cluster::{assign_grid_from_positions, calc_grid_coordinates_from_positions};
pub use config::{ClusterConfig, DimensionSearchConfig, GridConfig, LayoutDetectConfig};
pub use dimensions::{guess_stitch_dimensions, guess_stitch_dimensions_with};
pub use error::{GridError, Result};
pub use layout::{
    calc_grid_coordinates_from_layout, calc_stitch_layout, calc_stitch_layout_with,
    synthesize_stage_positions,
};
pub use solver::GridSolver;
pub use types::{
    AxisOrientation, GridAssignment, GridCoordinate, GridDimensions, Layout, MajorAxis,
    StagePosition,
};
