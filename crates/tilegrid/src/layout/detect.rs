//! Stitch-layout detection from stage positions in acquisition order.

use crate::config::LayoutDetectConfig;
use crate::error::{GridError, Result};
use crate::types::{validate_positions, GridDimensions, Layout, StagePosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Increasing,
    Decreasing,
}

/// Detect the scan layout with default tolerances.
pub fn calc_stitch_layout(dims: GridDimensions, positions: &[StagePosition]) -> Result<Layout> {
    calc_stitch_layout_with(dims, positions, &LayoutDetectConfig::default())
}

/// Detect the scan layout from stage positions in acquisition order.
///
/// Two stages: the fill order is read from which coordinate stays constant
/// over the first pass, then the direction of the first two passes along the
/// fast axis decides between the plain and the zigzag variant.
///
/// Needs `rows * cols` positions and at least two full passes along the
/// slow axis. Ties and contradictory trends are errors, never defaults.
pub fn calc_stitch_layout_with(
    dims: GridDimensions,
    positions: &[StagePosition],
    config: &LayoutDetectConfig,
) -> Result<Layout> {
    let (rows, cols) = (dims.rows(), dims.cols());
    if positions.len() != dims.n_cells() {
        return Err(GridError::invalid(format!(
            "expected {} positions for a {} grid, got {}",
            dims.n_cells(),
            dims,
            positions.len()
        )));
    }
    let min_len = 2 * rows.max(cols);
    if positions.len() < min_len {
        return Err(GridError::invalid(format!(
            "layout detection needs at least {} positions for a {} grid, got {}",
            min_len,
            dims,
            positions.len()
        )));
    }
    config.validate()?;
    validate_positions(positions)?;

    let tol = config.tolerance_fraction * max_extent(positions);
    let first = positions[0];
    let row_major = positions[..cols]
        .iter()
        .all(|p| (p.y - first.y).abs() <= tol);
    let col_major = positions[..rows]
        .iter()
        .all(|p| (p.x - first.x).abs() <= tol);

    let layout = match (row_major, col_major) {
        (true, false) => {
            if pass_directions(positions, cols, |p| p.x, tol)? {
                Layout::ZigzagHorizontal
            } else {
                Layout::Horizontal
            }
        }
        (false, true) => {
            if pass_directions(positions, rows, |p| p.y, tol)? {
                Layout::ZigzagVertical
            } else {
                Layout::Vertical
            }
        }
        (true, true) => {
            return Err(GridError::layout(
                "first pass is constant along both axes; fill order is ambiguous",
            ))
        }
        (false, false) => {
            return Err(GridError::layout(
                "first pass is constant along neither axis; fill order is unknown",
            ))
        }
    };

    tracing::debug!("detected {} layout for {} grid (tol={:.4})", layout, dims, tol);
    Ok(layout)
}

/// Compare the first two passes of length `pass_len` along the fast axis.
///
/// Returns `true` for a serpentine scan (exactly one pass increasing) and
/// `false` for a raster scan (both increasing).
fn pass_directions(
    positions: &[StagePosition],
    pass_len: usize,
    fast: impl Fn(&StagePosition) -> f64,
    tol: f64,
) -> Result<bool> {
    let first = trend(
        fast(&positions[0]),
        fast(&positions[pass_len - 1]),
        tol,
        "first",
    )?;
    let second = trend(
        fast(&positions[pass_len]),
        fast(&positions[2 * pass_len - 1]),
        tol,
        "second",
    )?;

    match (first, second) {
        (Trend::Increasing, Trend::Increasing) => Ok(false),
        (Trend::Increasing, Trend::Decreasing) | (Trend::Decreasing, Trend::Increasing) => {
            Ok(true)
        }
        (Trend::Decreasing, Trend::Decreasing) => Err(GridError::layout(
            "both leading passes run against the fast axis",
        )),
    }
}

fn trend(start: f64, end: f64, tol: f64, pass: &str) -> Result<Trend> {
    let delta = end - start;
    if delta > tol {
        Ok(Trend::Increasing)
    } else if delta < -tol {
        Ok(Trend::Decreasing)
    } else {
        Err(GridError::layout(format!(
            "{pass} pass has no direction along the fast axis ({start} -> {end})"
        )))
    }
}

fn max_extent(positions: &[StagePosition]) -> f64 {
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in positions {
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
    }
    (max_y - min_y).max(max_x - min_x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::synthesize_stage_positions;
    use crate::test_utils::jitter_positions;

    fn grid(rows: usize, cols: usize) -> GridDimensions {
        GridDimensions::new(rows, cols).unwrap()
    }

    fn yx(values: &[(f64, f64)]) -> Vec<StagePosition> {
        values.iter().map(|&(y, x)| StagePosition::new(y, x)).collect()
    }

    #[test]
    fn zigzag_horizontal_scenario() {
        let positions = yx(&[
            (0.0, 0.0),
            (0.0, 5.0),
            (0.0, 10.0),
            (10.0, 10.0),
            (10.0, 5.0),
            (10.0, 0.0),
        ]);
        let layout = calc_stitch_layout(grid(2, 3), &positions).unwrap();
        assert_eq!(layout, Layout::ZigzagHorizontal);
    }

    #[test]
    fn recovers_every_layout_from_ideal_positions() {
        for (rows, cols) in [(2, 2), (2, 3), (3, 2), (4, 4), (5, 7), (7, 5)] {
            let dims = grid(rows, cols);
            for layout in Layout::ALL {
                let positions = synthesize_stage_positions(dims, layout, 900.0, 1200.0);
                let detected = calc_stitch_layout(dims, &positions).unwrap();
                assert_eq!(detected, layout, "{rows}x{cols}");
            }
        }
    }

    #[test]
    fn recovers_layout_from_jittered_positions() {
        let dims = grid(6, 8);
        for (i, layout) in Layout::ALL.into_iter().enumerate() {
            let ideal = synthesize_stage_positions(dims, layout, 650.0, 650.0);
            let positions = jitter_positions(&ideal, 0.8, 100 + i as u64);
            assert_eq!(calc_stitch_layout(dims, &positions).unwrap(), layout);
        }
    }

    #[test]
    fn mismatched_length_is_invalid() {
        let positions = synthesize_stage_positions(grid(2, 3), Layout::Horizontal, 1.0, 1.0);
        let err = calc_stitch_layout(grid(3, 3), &positions).unwrap_err();
        assert!(matches!(err, GridError::InvalidArgument(_)));
    }

    #[test]
    fn single_pass_is_invalid() {
        let positions = synthesize_stage_positions(grid(1, 4), Layout::Horizontal, 1.0, 1.0);
        let err = calc_stitch_layout(grid(1, 4), &positions).unwrap_err();
        assert!(matches!(err, GridError::InvalidArgument(_)));
    }

    #[test]
    fn identical_positions_are_undeterminable() {
        let positions = vec![StagePosition::new(3.0, 3.0); 4];
        let err = calc_stitch_layout(grid(2, 2), &positions).unwrap_err();
        assert!(matches!(err, GridError::LayoutUndeterminable(_)));
    }

    #[test]
    fn both_passes_decreasing_is_undeterminable() {
        let positions = yx(&[
            (0.0, 10.0),
            (0.0, 5.0),
            (0.0, 0.0),
            (10.0, 10.0),
            (10.0, 5.0),
            (10.0, 0.0),
        ]);
        let err = calc_stitch_layout(grid(2, 3), &positions).unwrap_err();
        assert!(matches!(err, GridError::LayoutUndeterminable(_)));
    }

    #[test]
    fn scattered_first_pass_is_undeterminable() {
        let positions = yx(&[
            (0.0, 0.0),
            (4.0, 5.0),
            (9.0, 10.0),
            (10.0, 10.0),
            (10.0, 5.0),
            (10.0, 0.0),
        ]);
        let err = calc_stitch_layout(grid(2, 3), &positions).unwrap_err();
        assert!(matches!(err, GridError::LayoutUndeterminable(_)));
    }

    #[test]
    fn flat_second_pass_is_undeterminable() {
        let positions = yx(&[
            (0.0, 0.0),
            (0.0, 5.0),
            (0.0, 10.0),
            (10.0, 5.0),
            (10.0, 5.0),
            (10.0, 5.0),
        ]);
        let err = calc_stitch_layout(grid(2, 3), &positions).unwrap_err();
        assert!(matches!(err, GridError::LayoutUndeterminable(_)));
    }
}
