//! Tuning parameters for the grid-inference components.
//!
//! Every struct has a `Default` with the documented values and
//! deserializes with `#[serde(default)]`, so JSON overrides may be partial.

use std::path::Path;

use crate::error::{GridError, Result};

/// Search parameters for guessing grid dimensions from a tile count.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DimensionSearchConfig {
    /// Half-width of the short-side window around `round(sqrt(n))` for small counts.
    pub window_half_width: usize,
    /// Half-width used once the tile count exceeds `large_count_threshold`.
    pub large_window_half_width: usize,
    /// Tile counts strictly above this use `large_window_half_width`.
    pub large_count_threshold: usize,
    /// Maximum accepted `long / short` side ratio.
    pub max_aspect_ratio: usize,
    /// Accept grids with more cells than tiles when no exact factorization fits.
    pub allow_padding: bool,
}

impl Default for DimensionSearchConfig {
    fn default() -> Self {
        Self {
            window_half_width: 5,
            large_window_half_width: 10,
            large_count_threshold: 100,
            max_aspect_ratio: 3,
            allow_padding: true,
        }
    }
}

impl DimensionSearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_aspect_ratio == 0 {
            return Err(GridError::invalid("dimensions.max_aspect_ratio must be >= 1"));
        }
        Ok(())
    }

    /// Window half-width that applies to `n` tiles.
    pub fn half_width_for(&self, n: usize) -> usize {
        if n > self.large_count_threshold {
            self.large_window_half_width
        } else {
            self.window_half_width
        }
    }
}

/// Tolerances for stitch-layout detection.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutDetectConfig {
    /// Coordinates closer than this fraction of the largest stage extent are
    /// treated as equal.
    pub tolerance_fraction: f64,
}

impl Default for LayoutDetectConfig {
    fn default() -> Self {
        Self {
            tolerance_fraction: 0.01,
        }
    }
}

impl LayoutDetectConfig {
    pub fn validate(&self) -> Result<()> {
        let tol = self.tolerance_fraction;
        if !tol.is_finite() || !(0.0..0.5).contains(&tol) {
            return Err(GridError::invalid(
                "layout.tolerance_fraction must be finite and in [0, 0.5)",
            ));
        }
        Ok(())
    }
}

/// Parameters of the k-means clustering and centroid-to-cell assignment.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// RNG seed for k-means++ seeding. Fixed so repeated calls agree.
    pub seed: u64,
    /// Number of independent k-means++ restarts; the lowest inertia wins.
    pub n_init: usize,
    /// Maximum Lloyd iterations per restart.
    pub max_iters: usize,
    /// Row/column grouping gap, as a fraction of the smallest
    /// centroid-to-centroid distance.
    pub axis_gap_fraction: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            n_init: 4,
            max_iters: 100,
            axis_gap_fraction: 0.5,
        }
    }
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_init == 0 {
            return Err(GridError::invalid("cluster.n_init must be >= 1"));
        }
        if self.max_iters == 0 {
            return Err(GridError::invalid("cluster.max_iters must be >= 1"));
        }
        let gap = self.axis_gap_fraction;
        if !gap.is_finite() || gap <= 0.0 || gap >= 1.0 {
            return Err(GridError::invalid(
                "cluster.axis_gap_fraction must be finite and in (0, 1)",
            ));
        }
        Ok(())
    }
}

/// Complete configuration consumed by [`GridSolver`](crate::GridSolver).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub dimensions: DimensionSearchConfig,
    pub layout: LayoutDetectConfig,
    pub cluster: ClusterConfig,
}

impl GridConfig {
    /// Load a configuration from a JSON file. Missing fields keep defaults.
    pub fn from_json_file(path: &Path) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every parameter is in its admissible range.
    pub fn validate(&self) -> Result<()> {
        self.dimensions.validate()?;
        self.layout.validate()?;
        self.cluster.validate()
    }
}
