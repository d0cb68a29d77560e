//! Grid dimensions from a bare tile count.
//!
//! The search looks for the short side `a` in a window around `round(sqrt(n))`
//! and the long side `b = m / a` for the smallest cell count `m >= n` that
//! has such a factorization with `b <= max_aspect_ratio * a`. An exact count
//! (`m == n`) takes the admissible pair closest to a square; a padded count
//! takes the first admissible `a` in ascending order.
//!
//! This is an explicit integer search; no floating-point products are
//! compared for equality.

use crate::config::DimensionSearchConfig;
use crate::error::{GridError, Result};
use crate::types::{GridDimensions, MajorAxis};

/// Guess `(rows, cols)` for `n` tiles with the default search parameters.
pub fn guess_stitch_dimensions(n: usize, major_axis: MajorAxis) -> Result<GridDimensions> {
    guess_stitch_dimensions_with(n, major_axis, &DimensionSearchConfig::default())
}

/// Guess `(rows, cols)` for `n` tiles.
///
/// Square grids are returned as-is. Otherwise the longer side becomes the
/// row count for [`MajorAxis::Vertical`] and the column count for
/// [`MajorAxis::Horizontal`].
pub fn guess_stitch_dimensions_with(
    n: usize,
    major_axis: MajorAxis,
    config: &DimensionSearchConfig,
) -> Result<GridDimensions> {
    if n == 0 {
        return Err(GridError::invalid("tile count must be >= 1"));
    }
    config.validate()?;

    let (short, long) = search_factors(n, config).ok_or_else(|| {
        tracing::debug!("no admissible factorization for {} tiles", n);
        GridError::DimensionsUndeterminable { n }
    })?;

    let (rows, cols) = match major_axis {
        MajorAxis::Vertical => (long, short),
        MajorAxis::Horizontal => (short, long),
    };
    tracing::debug!(
        "guessed {}x{} grid for {} tiles ({} padding cells, {} major)",
        rows,
        cols,
        n,
        rows * cols - n,
        major_axis
    );
    GridDimensions::new(rows, cols)
}

/// Return `(short, long)` for the first admissible cell count `m >= n`.
fn search_factors(n: usize, config: &DimensionSearchConfig) -> Option<(usize, usize)> {
    let center = round_sqrt(n);
    let half_width = config.half_width_for(n);
    let lo = center.saturating_sub(half_width).max(1);
    let hi = center.saturating_add(half_width);

    if let Some(exact) = closest_factors(n, lo, hi, config.max_aspect_ratio) {
        return Some(exact);
    }
    if !config.allow_padding {
        return None;
    }

    // For every short side `a`, the next multiple of `a` is below `n + a`;
    // the enclosing square covers windows that do not reach `sqrt(n)`.
    let side = ceil_sqrt(n);
    let last = n.saturating_add(hi).max(side.saturating_mul(side));
    (n.saturating_add(1)..=last).find_map(|m| first_factors(m, lo, hi, config.max_aspect_ratio))
}

/// Admissible factorization of `m` closest to a square (largest short side).
fn closest_factors(m: usize, lo: usize, hi: usize, max_aspect: usize) -> Option<(usize, usize)> {
    let upper = hi.min(floor_sqrt(m));
    (lo..=upper)
        .rev()
        .find_map(|a| admissible(m, a, max_aspect))
}

/// Admissible factorization of a padded count `m` with the smallest short side.
fn first_factors(m: usize, lo: usize, hi: usize, max_aspect: usize) -> Option<(usize, usize)> {
    let upper = hi.min(floor_sqrt(m));
    (lo..=upper).find_map(|a| admissible(m, a, max_aspect))
}

fn admissible(m: usize, a: usize, max_aspect: usize) -> Option<(usize, usize)> {
    if m % a != 0 {
        return None;
    }
    let b = m / a;
    (b <= a.saturating_mul(max_aspect)).then_some((a, b))
}

fn floor_sqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r.checked_mul(r).map_or(true, |sq| sq > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).is_some_and(|sq| sq <= n) {
        r += 1;
    }
    r
}

fn ceil_sqrt(n: usize) -> usize {
    let r = floor_sqrt(n);
    if r * r == n {
        r
    } else {
        r + 1
    }
}

fn round_sqrt(n: usize) -> usize {
    // round(sqrt(n)) == r + 1 exactly when n > r^2 + r (n is an integer).
    let r = floor_sqrt(n);
    if n > r * r + r {
        r + 1
    } else {
        r
    }
}
