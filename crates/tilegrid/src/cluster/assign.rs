//! Canonical `(row, col)` cells for a set of cluster centroids.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::kmeans::Point;
use crate::error::{GridError, Result};
use crate::types::{GridCoordinate, GridDimensions};

/// Sort centroids into a rectangular grid.
///
/// Centroid `y` values (component 0) are sorted and split into rows at every
/// gap wider than `gap_fraction` times the smallest centroid spacing; `x`
/// values (component 1) are split into columns the same way. Row and column
/// groups are numbered in ascending coordinate order.
///
/// Returns the grid shape and the cell of every centroid, index-aligned with
/// `centroids`. Fails when the groups do not form a full `expected`-cell
/// rectangle with one centroid per cell.
pub(crate) fn index_centroids(
    centroids: &[Point],
    expected: usize,
    gap_fraction: f64,
) -> Result<(GridDimensions, Vec<GridCoordinate>)> {
    if centroids.len() != expected {
        return Err(GridError::inconsistent(format!(
            "{} centroids for {} expected cells",
            centroids.len(),
            expected
        )));
    }
    if expected == 1 {
        return Ok((GridDimensions::new(1, 1)?, vec![GridCoordinate::new(0, 0)]));
    }

    let spacing = min_spacing(centroids);
    if spacing <= 0.0 {
        return Err(GridError::inconsistent("two cluster centroids coincide"));
    }
    let tol = gap_fraction * spacing;

    let (n_rows, row_of) = group_axis(centroids, 0, tol);
    let (n_cols, col_of) = group_axis(centroids, 1, tol);
    if n_rows * n_cols != expected {
        return Err(GridError::inconsistent(format!(
            "centroids form {n_rows} rows and {n_cols} columns, which cannot hold {expected} cells"
        )));
    }

    let cells: Vec<GridCoordinate> = row_of
        .into_iter()
        .zip(col_of)
        .map(|(row, col)| GridCoordinate::new(row, col))
        .collect();
    let distinct: HashSet<GridCoordinate> = cells.iter().copied().collect();
    if distinct.len() != expected {
        return Err(GridError::inconsistent(format!(
            "centroids occupy {} of {} grid cells",
            distinct.len(),
            expected
        )));
    }

    Ok((GridDimensions::new(n_rows, n_cols)?, cells))
}

fn min_spacing(centroids: &[Point]) -> f64 {
    let mut best = f64::INFINITY;
    for (i, a) in centroids.iter().enumerate() {
        for b in &centroids[i + 1..] {
            best = best.min((a - b).norm());
        }
    }
    best
}

/// Group centroids along one component; returns `(n_groups, group per centroid)`.
fn group_axis(centroids: &[Point], component: usize, tol: f64) -> (usize, Vec<usize>) {
    let mut order: Vec<usize> = (0..centroids.len()).collect();
    order.sort_by(|&a, &b| {
        centroids[a][component]
            .partial_cmp(&centroids[b][component])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut group_of = vec![0usize; centroids.len()];
    let mut group = 0;
    let mut prev = centroids[order[0]][component];
    for &idx in &order {
        let value = centroids[idx][component];
        if value - prev > tol {
            group += 1;
        }
        group_of[idx] = group;
        prev = value;
    }
    (group + 1, group_of)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice(rows: usize, cols: usize, pitch_y: f64, pitch_x: f64) -> Vec<Point> {
        let mut pts = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                // Small deterministic wobble, well below the pitch.
                let wobble = ((r * 7 + c * 3) % 5) as f64 * 0.01;
                pts.push(Point::new(r as f64 * pitch_y + wobble, c as f64 * pitch_x - wobble));
            }
        }
        pts
    }

    #[test]
    fn row_major_lattice_maps_to_its_cells() {
        let pts = lattice(3, 4, 50.0, 80.0);
        let (dims, cells) = index_centroids(&pts, 12, 0.5).unwrap();
        assert_eq!((dims.rows(), dims.cols()), (3, 4));
        for (i, cell) in cells.iter().enumerate() {
            assert_eq!((cell.row, cell.col), (i / 4, i % 4));
        }
    }

    #[test]
    fn shuffled_centroids_keep_their_cells() {
        let mut pts = lattice(2, 3, 10.0, 10.0);
        pts.reverse();
        let (_, cells) = index_centroids(&pts, 6, 0.5).unwrap();
        assert_eq!(cells[0], GridCoordinate::new(1, 2));
        assert_eq!(cells[5], GridCoordinate::new(0, 0));
    }

    #[test]
    fn single_centroid_is_origin() {
        let (dims, cells) = index_centroids(&[Point::new(5.0, 5.0)], 1, 0.5).unwrap();
        assert_eq!(dims.n_cells(), 1);
        assert_eq!(cells, vec![GridCoordinate::new(0, 0)]);
    }

    #[test]
    fn missing_corner_is_inconsistent() {
        let mut pts = lattice(3, 3, 10.0, 10.0);
        pts.pop();
        pts.push(Point::new(30.0, 30.0));
        let err = index_centroids(&pts, 9, 0.5).unwrap_err();
        assert!(matches!(err, GridError::MetadataInconsistency(_)));
    }

    #[test]
    fn non_rectangular_cloud_is_inconsistent() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 5.0),
        ];
        let err = index_centroids(&pts, 3, 0.5).unwrap_err();
        assert!(matches!(err, GridError::MetadataInconsistency(_)));
    }
}
