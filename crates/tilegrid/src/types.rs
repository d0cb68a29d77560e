//! Value types exchanged with callers: dimensions, positions, layouts, cells.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

// ── Grid dimensions ────────────────────────────────────────────────────────

/// Shape of a rectangular acquisition grid, `rows x cols`, both `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GridDimensionsSpec", into = "GridDimensionsSpec")]
pub struct GridDimensions {
    rows: usize,
    cols: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridDimensionsSpec {
    rows: usize,
    cols: usize,
}

impl GridDimensions {
    /// Validated constructor; zero on either axis is rejected, as is a cell
    /// count that does not fit in `usize`.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GridError::invalid(format!(
                "grid dimensions must be positive, got {rows}x{cols}"
            )));
        }
        if rows.checked_mul(cols).is_none() {
            return Err(GridError::invalid(format!(
                "grid {rows}x{cols} has more cells than fit in usize"
            )));
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells, `rows * cols`.
    pub fn n_cells(&self) -> usize {
        self.rows * self.cols
    }

    /// True if `coord` lies inside the grid.
    pub fn contains(&self, coord: GridCoordinate) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }
}

impl TryFrom<GridDimensionsSpec> for GridDimensions {
    type Error = GridError;

    fn try_from(spec: GridDimensionsSpec) -> Result<Self> {
        Self::new(spec.rows, spec.cols)
    }
}

impl From<GridDimensions> for GridDimensionsSpec {
    fn from(dims: GridDimensions) -> Self {
        Self {
            rows: dims.rows,
            cols: dims.cols,
        }
    }
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

// ── Major axis ─────────────────────────────────────────────────────────────

/// Axis that should carry the longer side of a guessed grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MajorAxis {
    /// More rows than columns.
    #[default]
    Vertical,
    /// More columns than rows.
    Horizontal,
}

impl MajorAxis {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

impl FromStr for MajorAxis {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            other => Err(GridError::invalid(format!(
                "unsupported major axis '{other}' (expected 'vertical' or 'horizontal')"
            ))),
        }
    }
}

impl fmt::Display for MajorAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Layout ─────────────────────────────────────────────────────────────────

/// Order in which the stage visited the grid cells.
///
/// `Horizontal*` layouts fill row by row (columns vary fastest),
/// `Vertical*` layouts fill column by column (rows vary fastest).
/// `Zigzag*` variants reverse the fast axis on every other pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Horizontal,
    ZigzagHorizontal,
    Vertical,
    ZigzagVertical,
}

impl Layout {
    /// All layouts, in declaration order.
    pub const ALL: [Layout; 4] = [
        Layout::Horizontal,
        Layout::ZigzagHorizontal,
        Layout::Vertical,
        Layout::ZigzagVertical,
    ];

    /// True for layouts that fill the grid row by row.
    pub fn is_row_major(self) -> bool {
        matches!(self, Self::Horizontal | Self::ZigzagHorizontal)
    }

    /// True for serpentine layouts.
    pub fn is_zigzag(self) -> bool {
        matches!(self, Self::ZigzagHorizontal | Self::ZigzagVertical)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::ZigzagHorizontal => "zigzag_horizontal",
            Self::Vertical => "vertical",
            Self::ZigzagVertical => "zigzag_vertical",
        }
    }
}

impl FromStr for Layout {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.as_str() == s)
            .ok_or_else(|| GridError::invalid(format!("unsupported layout '{s}'")))
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Positions and cells ────────────────────────────────────────────────────

/// Absolute stage position of one tile, in stage units (e.g. µm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StagePosition {
    pub y: f64,
    pub x: f64,
}

impl StagePosition {
    pub fn new(y: f64, x: f64) -> Self {
        Self { y, x }
    }

    pub fn is_finite(&self) -> bool {
        self.y.is_finite() && self.x.is_finite()
    }
}

impl From<[f64; 2]> for StagePosition {
    /// Interprets the array as `[y, x]`.
    fn from(yx: [f64; 2]) -> Self {
        Self { y: yx[0], x: yx[1] }
    }
}

/// Zero-based `(row, col)` cell of a tile in its acquisition grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoordinate {
    pub row: usize,
    pub col: usize,
}

impl GridCoordinate {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for GridCoordinate {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Stage axis orientation relative to the grid.
///
/// Flags negate the matching coordinate before clustering so that increasing
/// row index moves down and increasing column index moves right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisOrientation {
    pub reverse_rows: bool,
    pub reverse_columns: bool,
}

impl AxisOrientation {
    pub(crate) fn apply(&self, p: StagePosition) -> StagePosition {
        StagePosition {
            y: if self.reverse_rows { -p.y } else { p.y },
            x: if self.reverse_columns { -p.x } else { p.x },
        }
    }
}

/// Full result of grid assignment from raw stage positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAssignment {
    /// Inferred grid shape.
    pub dimensions: GridDimensions,
    /// One cell per input position, index-aligned with the input.
    pub coordinates: Vec<GridCoordinate>,
    /// Cluster centroid of every cell in row-major order, in the caller's
    /// (un-negated) stage frame.
    pub centroids: Vec<StagePosition>,
}

/// Reject non-finite coordinates with the offending index in the message.
pub(crate) fn validate_positions(positions: &[StagePosition]) -> Result<()> {
    match positions.iter().position(|p| !p.is_finite()) {
        Some(i) => Err(GridError::invalid(format!(
            "stage position {i} is not finite: {:?}",
            positions[i]
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_reject_zero_axes() {
        assert!(GridDimensions::new(0, 3).is_err());
        assert!(GridDimensions::new(3, 0).is_err());
        let dims = GridDimensions::new(2, 3).unwrap();
        assert_eq!(dims.n_cells(), 6);
        assert!(dims.contains(GridCoordinate::new(1, 2)));
        assert!(!dims.contains(GridCoordinate::new(2, 0)));
    }

    #[test]
    fn dimensions_reject_cell_count_overflow() {
        let err = GridDimensions::new(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, GridError::InvalidArgument(_)));
        let side = 1usize << (usize::BITS / 2);
        assert!(GridDimensions::new(side, side).is_err());
        let dims = GridDimensions::new(usize::MAX, 1).unwrap();
        assert_eq!(dims.n_cells(), usize::MAX);
    }

    #[test]
    fn dimensions_deserialize_through_validation() {
        let dims: GridDimensions = serde_json::from_str(r#"{"rows":4,"cols":5}"#).unwrap();
        assert_eq!((dims.rows(), dims.cols()), (4, 5));
        assert!(serde_json::from_str::<GridDimensions>(r#"{"rows":0,"cols":5}"#).is_err());
        assert_eq!(
            serde_json::to_string(&dims).unwrap(),
            r#"{"rows":4,"cols":5}"#
        );
    }

    #[test]
    fn layout_literals_parse_and_print() {
        for layout in Layout::ALL {
            assert_eq!(layout.as_str().parse::<Layout>().unwrap(), layout);
            let json = serde_json::to_string(&layout).unwrap();
            assert_eq!(json, format!("\"{}\"", layout));
        }
        let err = "diagonal".parse::<Layout>().unwrap_err();
        assert!(matches!(err, GridError::InvalidArgument(_)));
    }

    #[test]
    fn major_axis_rejects_unknown_literal() {
        assert_eq!("vertical".parse::<MajorAxis>().unwrap(), MajorAxis::Vertical);
        assert_eq!(
            "horizontal".parse::<MajorAxis>().unwrap(),
            MajorAxis::Horizontal
        );
        assert!("Vertical".parse::<MajorAxis>().is_err());
    }

    #[test]
    fn orientation_negates_selected_axes() {
        let p = StagePosition::new(3.0, -4.0);
        let flip = AxisOrientation {
            reverse_rows: true,
            reverse_columns: false,
        };
        assert_eq!(flip.apply(p), StagePosition::new(-3.0, -4.0));
        assert_eq!(AxisOrientation::default().apply(p), p);
    }

    #[test]
    fn non_finite_positions_are_rejected() {
        let good = [StagePosition::new(0.0, 1.0)];
        assert!(validate_positions(&good).is_ok());
        let bad = [StagePosition::new(0.0, 1.0), StagePosition::new(f64::NAN, 0.0)];
        let err = validate_positions(&bad).unwrap_err();
        assert!(err.to_string().contains("stage position 1"));
    }
}
