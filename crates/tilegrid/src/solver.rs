//! High-level grid-inference API.
//!
//! [`GridSolver`] wraps a [`GridConfig`] and exposes the dimension, layout
//! and clustering operations with that configuration applied. It holds no
//! per-call state, so one solver can serve many acquisitions.

use std::path::Path;

use crate::cluster::assign_grid_from_positions;
use crate::config::GridConfig;
use crate::dimensions::guess_stitch_dimensions_with;
use crate::error::Result;
use crate::layout::{calc_grid_coordinates_from_layout, calc_stitch_layout_with};
use crate::types::{
    AxisOrientation, GridAssignment, GridCoordinate, GridDimensions, Layout, MajorAxis,
    StagePosition,
};

/// Primary grid-inference interface.
///
/// # Examples
///
/// ```
/// use tilegrid::{GridSolver, Layout, MajorAxis, StagePosition};
///
/// let solver = GridSolver::new();
/// let dims = solver.guess_dimensions(6, MajorAxis::Horizontal).unwrap();
/// assert_eq!((dims.rows(), dims.cols()), (2, 3));
///
/// let positions: Vec<StagePosition> = [
///     [0.0, 0.0], [0.0, 5.0], [0.0, 10.0],
///     [10.0, 10.0], [10.0, 5.0], [10.0, 0.0],
/// ]
/// .into_iter()
/// .map(StagePosition::from)
/// .collect();
/// let layout = solver.detect_layout(dims, &positions).unwrap();
/// assert_eq!(layout, Layout::ZigzagHorizontal);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GridSolver {
    config: GridConfig,
}

impl GridSolver {
    /// Create a solver with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with full config control.
    pub fn with_config(config: GridConfig) -> Self {
        Self { config }
    }

    /// Load the configuration from a JSON file.
    pub fn from_config_file(path: &Path) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            config: GridConfig::from_json_file(path)?,
        })
    }

    /// Access the current configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut GridConfig {
        &mut self.config
    }

    /// Guess grid dimensions for `n` tiles.
    pub fn guess_dimensions(&self, n: usize, major_axis: MajorAxis) -> Result<GridDimensions> {
        guess_stitch_dimensions_with(n, major_axis, &self.config.dimensions)
    }

    /// Detect the scan layout from positions in acquisition order.
    pub fn detect_layout(
        &self,
        dims: GridDimensions,
        positions: &[StagePosition],
    ) -> Result<Layout> {
        calc_stitch_layout_with(dims, positions, &self.config.layout)
    }

    /// Cell visited at each acquisition index for a known layout.
    pub fn coordinates_from_layout(
        &self,
        dims: GridDimensions,
        layout: Layout,
    ) -> Vec<GridCoordinate> {
        calc_grid_coordinates_from_layout(dims, layout)
    }

    /// Dimensions, then layout, then cells, for positions in acquisition order.
    ///
    /// Convenience for the common pipeline where only the tile count and the
    /// stage positions are known. Fails if the guessed grid has padding
    /// cells, since layout detection needs one position per cell.
    pub fn coordinates_from_sequence(
        &self,
        positions: &[StagePosition],
        major_axis: MajorAxis,
    ) -> Result<(GridDimensions, Layout, Vec<GridCoordinate>)> {
        let dims = self.guess_dimensions(positions.len(), major_axis)?;
        let layout = self.detect_layout(dims, positions)?;
        Ok((dims, layout, calc_grid_coordinates_from_layout(dims, layout)))
    }

    /// Cells of raw, jittered positions clustered into `n` sites.
    pub fn coordinates_from_positions(
        &self,
        positions: &[StagePosition],
        n: usize,
        orientation: AxisOrientation,
    ) -> Result<Vec<GridCoordinate>> {
        self.assign_from_positions(positions, n, orientation)
            .map(|assignment| assignment.coordinates)
    }

    /// Full clustering result: grid shape, per-position cells, centroids.
    pub fn assign_from_positions(
        &self,
        positions: &[StagePosition],
        n: usize,
        orientation: AxisOrientation,
    ) -> Result<GridAssignment> {
        assign_grid_from_positions(positions, n, orientation, &self.config.cluster)
    }
}
