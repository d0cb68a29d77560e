//! Layout-driven grid coordinates and synthetic stage positions.

use crate::types::{GridCoordinate, GridDimensions, Layout, StagePosition};

/// Enumerate the cell visited at each acquisition index.
///
/// Row-major layouts walk rows outer and columns inner; column-major layouts
/// are the transpose. Zigzag layouts reverse the inner walk on odd passes.
/// The result has exactly `dims.n_cells()` distinct in-bounds cells.
pub fn calc_grid_coordinates_from_layout(
    dims: GridDimensions,
    layout: Layout,
) -> Vec<GridCoordinate> {
    let row_major = layout.is_row_major();
    let (n_slow, n_fast) = if row_major {
        (dims.rows(), dims.cols())
    } else {
        (dims.cols(), dims.rows())
    };

    let mut coords = Vec::with_capacity(dims.n_cells());
    for slow in 0..n_slow {
        let reversed = layout.is_zigzag() && slow % 2 == 1;
        for step in 0..n_fast {
            let fast = if reversed { n_fast - 1 - step } else { step };
            coords.push(if row_major {
                GridCoordinate::new(slow, fast)
            } else {
                GridCoordinate::new(fast, slow)
            });
        }
    }
    coords
}

/// Ideal stage positions for a grid scanned in `layout`.
///
/// Cell `(r, c)` sits at `(r * pitch_y, c * pitch_x)`; the output is in
/// acquisition order, so it is a valid input for layout detection.
pub fn synthesize_stage_positions(
    dims: GridDimensions,
    layout: Layout,
    pitch_y: f64,
    pitch_x: f64,
) -> Vec<StagePosition> {
    calc_grid_coordinates_from_layout(dims, layout)
        .into_iter()
        .map(|c| StagePosition::new(c.row as f64 * pitch_y, c.col as f64 * pitch_x))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn grid(rows: usize, cols: usize) -> GridDimensions {
        GridDimensions::new(rows, cols).unwrap()
    }

    fn pairs(coords: &[GridCoordinate]) -> Vec<(usize, usize)> {
        coords.iter().map(|c| (c.row, c.col)).collect()
    }

    #[test]
    fn zigzag_horizontal_two_by_three() {
        let coords = calc_grid_coordinates_from_layout(grid(2, 3), Layout::ZigzagHorizontal);
        assert_eq!(
            pairs(&coords),
            vec![(0, 0), (0, 1), (0, 2), (1, 2), (1, 1), (1, 0)]
        );
    }

    #[test]
    fn vertical_layouts_walk_columns() {
        let coords = calc_grid_coordinates_from_layout(grid(3, 2), Layout::Vertical);
        assert_eq!(
            pairs(&coords),
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]
        );
        let coords = calc_grid_coordinates_from_layout(grid(3, 2), Layout::ZigzagVertical);
        assert_eq!(
            pairs(&coords),
            vec![(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1)]
        );
    }

    #[test]
    fn every_layout_covers_each_cell_once() {
        for (rows, cols) in [(1, 1), (1, 7), (7, 1), (4, 5), (6, 6), (9, 3)] {
            let dims = grid(rows, cols);
            for layout in Layout::ALL {
                let coords = calc_grid_coordinates_from_layout(dims, layout);
                assert_eq!(coords.len(), rows * cols);
                assert!(coords.iter().all(|&c| dims.contains(c)));
                let distinct: HashSet<_> = coords.iter().copied().collect();
                assert_eq!(distinct.len(), rows * cols, "{layout} {rows}x{cols}");
            }
        }
    }

    #[test]
    fn zigzag_rows_alternate_direction() {
        let dims = grid(5, 4);
        let coords = calc_grid_coordinates_from_layout(dims, Layout::ZigzagHorizontal);
        for (row, chunk) in coords.chunks(dims.cols()).enumerate() {
            assert!(chunk.iter().all(|c| c.row == row));
            let ascending = chunk.windows(2).all(|w| w[0].col < w[1].col);
            let descending = chunk.windows(2).all(|w| w[0].col > w[1].col);
            if row % 2 == 0 {
                assert!(ascending, "row {row}");
            } else {
                assert!(descending, "row {row}");
            }
        }
    }

    #[test]
    fn synthesized_positions_follow_pitch() {
        let positions = synthesize_stage_positions(grid(2, 3), Layout::ZigzagHorizontal, 10.0, 5.0);
        let ys: Vec<f64> = positions.iter().map(|p| p.y).collect();
        let xs: Vec<f64> = positions.iter().map(|p| p.x).collect();
        assert_eq!(ys, vec![0.0, 0.0, 0.0, 10.0, 10.0, 10.0]);
        assert_eq!(xs, vec![0.0, 5.0, 10.0, 10.0, 5.0, 0.0]);
    }
}
