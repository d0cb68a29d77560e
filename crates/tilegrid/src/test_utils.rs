//! Shared synthetic stage-position generators for unit tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::StagePosition;

/// Add uniform jitter in `[-amplitude, amplitude)` to both coordinates.
pub(crate) fn jitter_positions(
    positions: &[StagePosition],
    amplitude: f64,
    seed: u64,
) -> Vec<StagePosition> {
    let mut rng = StdRng::seed_from_u64(seed);
    positions
        .iter()
        .map(|p| {
            StagePosition::new(
                p.y + rng.gen_range(-amplitude..amplitude),
                p.x + rng.gen_range(-amplitude..amplitude),
            )
        })
        .collect()
}

/// Repeat every position `channels` times, site-major, with independent
/// jitter per copy. Mimics one image per channel at each stage site.
pub(crate) fn per_channel_positions(
    sites: &[StagePosition],
    channels: usize,
    amplitude: f64,
    seed: u64,
) -> Vec<StagePosition> {
    let repeated: Vec<StagePosition> = sites
        .iter()
        .flat_map(|&p| std::iter::repeat(p).take(channels))
        .collect();
    jitter_positions(&repeated, amplitude, seed)
}
