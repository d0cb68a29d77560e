//! Scan-layout detection and layout-driven coordinate generation.

pub(crate) mod detect;
pub(crate) mod generate;

pub use detect::{calc_stitch_layout, calc_stitch_layout_with};
pub use generate::{calc_grid_coordinates_from_layout, synthesize_stage_positions};
