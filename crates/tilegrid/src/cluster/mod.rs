//! Grid cells directly from raw, jittered stage positions.
//!
//! Images taken at the same site (one per channel, say) share nearly the same
//! stage coordinates while different sites are a full tile pitch apart, so
//! the point cloud falls into one tight cluster per grid cell. The clusterer:
//!
//! 1. negates `y` and/or `x` to bring the stage frame into grid orientation,
//! 2. runs seeded k-means for exactly `n` clusters,
//! 3. sorts the centroids into rows and columns,
//! 4. gives every position the cell of its nearest centroid,
//! 5. checks that exactly `n` distinct cells are occupied.
//!
//! Repeated calls on identical input return identical output: k-means++
//! seeding draws from an RNG seeded per call with `ClusterConfig::seed`.

mod assign;
mod kmeans;

use std::collections::HashSet;

use crate::config::ClusterConfig;
use crate::error::{GridError, Result};
use crate::types::{
    validate_positions, AxisOrientation, GridAssignment, GridCoordinate, StagePosition,
};

use kmeans::Point;

/// Cell of every position for a grid of `n` sites, with default clustering
/// parameters.
///
/// The output is index-aligned with `positions`.
pub fn calc_grid_coordinates_from_positions(
    positions: &[StagePosition],
    n: usize,
    reverse_rows: bool,
    reverse_columns: bool,
) -> Result<Vec<GridCoordinate>> {
    let orientation = AxisOrientation {
        reverse_rows,
        reverse_columns,
    };
    assign_grid_from_positions(positions, n, orientation, &ClusterConfig::default())
        .map(|assignment| assignment.coordinates)
}

/// Full grid assignment for `n` sites: shape, per-position cells, centroids.
pub fn assign_grid_from_positions(
    positions: &[StagePosition],
    n: usize,
    orientation: AxisOrientation,
    config: &ClusterConfig,
) -> Result<GridAssignment> {
    if n == 0 {
        return Err(GridError::invalid("tile count must be >= 1"));
    }
    if positions.len() < n {
        return Err(GridError::invalid(format!(
            "{} positions cannot cover {} grid cells",
            positions.len(),
            n
        )));
    }
    config.validate()?;
    validate_positions(positions)?;

    let points: Vec<Point> = positions
        .iter()
        .map(|&p| {
            let p = orientation.apply(p);
            Point::new(p.y, p.x)
        })
        .collect();

    let fit = kmeans::kmeans(&points, n, config).ok_or_else(|| {
        tracing::warn!(
            "{} stage positions hold fewer than {} distinct locations",
            points.len(),
            n
        );
        GridError::inconsistent(format!(
            "fewer than {n} distinct stage positions among {} tiles",
            points.len()
        ))
    })?;
    tracing::debug!(
        "k-means: {} clusters over {} positions, inertia={:.4}, {} iterations",
        n,
        points.len(),
        fit.inertia,
        fit.iterations
    );

    let (dimensions, cells) =
        assign::index_centroids(&fit.centroids, n, config.axis_gap_fraction).map_err(|e| {
            tracing::warn!("centroid grid rejected: {}", e);
            e
        })?;

    // `labels` holds the nearest centroid of every position after the last
    // Lloyd update.
    let coordinates: Vec<GridCoordinate> =
        fit.labels.iter().map(|&label| cells[label]).collect();
    let occupied: HashSet<GridCoordinate> = coordinates.iter().copied().collect();
    if occupied.len() != n {
        tracing::warn!(
            "{} positions occupy {} of {} cells",
            coordinates.len(),
            occupied.len(),
            n
        );
        return Err(GridError::inconsistent(format!(
            "positions occupy {} distinct grid cells, expected {}",
            occupied.len(),
            n
        )));
    }

    let mut centroids = vec![StagePosition::new(0.0, 0.0); n];
    for (c, cell) in fit.centroids.iter().zip(&cells) {
        // Negation is its own inverse, so this maps back to the stage frame.
        centroids[cell.row * dimensions.cols() + cell.col] =
            orientation.apply(StagePosition::new(c[0], c[1]));
    }

    tracing::debug!("assigned {} positions to a {} grid", positions.len(), dimensions);
    Ok(GridAssignment {
        dimensions,
        coordinates,
        centroids,
    })
}
