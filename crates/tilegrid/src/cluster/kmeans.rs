//! Seeded k-means (Lloyd iterations with k-means++ seeding).
//!
//! Points are `[y, x]` vectors. The RNG is created per call from
//! `ClusterConfig::seed`, so identical inputs always give identical clusters
//! and concurrent calls never share state.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ClusterConfig;

pub(crate) type Point = Vector2<f64>;

#[derive(Debug, Clone)]
pub(crate) struct KMeansFit {
    pub centroids: Vec<Point>,
    pub labels: Vec<usize>,
    /// Sum of squared distances of every point to its centroid.
    pub inertia: f64,
    pub iterations: usize,
}

/// Cluster `points` into exactly `k` groups.
///
/// Runs `config.n_init` seeded restarts and keeps the lowest-inertia fit.
/// Returns `None` when `k == 0`, when there are fewer points than `k`, or when
/// the points occupy fewer than `k` distinct locations.
pub(crate) fn kmeans(points: &[Point], k: usize, config: &ClusterConfig) -> Option<KMeansFit> {
    if k == 0 || points.len() < k {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut best: Option<KMeansFit> = None;
    for _ in 0..config.n_init.max(1) {
        let seeds = kmeans_plus_plus(points, k, &mut rng)?;
        let fit = lloyd(points, seeds, config.max_iters.max(1));
        if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
            best = Some(fit);
        }
    }
    best
}

/// Index of the nearest centroid (squared Euclidean); ties go to the lower index.
pub(crate) fn nearest_centroid(centroids: &[Point], p: &Point) -> usize {
    let mut best = 0;
    let mut best_d2 = f64::INFINITY;
    for (j, c) in centroids.iter().enumerate() {
        let d2 = (p - c).norm_squared();
        if d2 < best_d2 {
            best_d2 = d2;
            best = j;
        }
    }
    best
}

fn kmeans_plus_plus(points: &[Point], k: usize, rng: &mut StdRng) -> Option<Vec<Point>> {
    let first = points[rng.gen_range(0..points.len())];
    let mut centers = Vec::with_capacity(k);
    centers.push(first);
    let mut d2: Vec<f64> = points.iter().map(|p| (p - first).norm_squared()).collect();

    while centers.len() < k {
        let total: f64 = d2.iter().sum();
        if total <= 0.0 {
            // Every point coincides with an existing center.
            return None;
        }

        // D^2 sampling; falls back to the last eligible point on rounding.
        let mut target = rng.gen::<f64>() * total;
        let mut chosen = None;
        for (i, &d) in d2.iter().enumerate() {
            if d <= 0.0 {
                continue;
            }
            chosen = Some(i);
            if target < d {
                break;
            }
            target -= d;
        }
        let center = points[chosen?];
        centers.push(center);

        for (p, d) in points.iter().zip(d2.iter_mut()) {
            *d = d.min((p - center).norm_squared());
        }
    }
    Some(centers)
}

fn lloyd(points: &[Point], mut centroids: Vec<Point>, max_iters: usize) -> KMeansFit {
    let k = centroids.len();
    let mut labels = vec![usize::MAX; points.len()];
    let mut iterations = 0;

    for _ in 0..max_iters {
        iterations += 1;
        let mut changed = false;
        for (label, p) in labels.iter_mut().zip(points) {
            let nearest = nearest_centroid(&centroids, p);
            if *label != nearest {
                *label = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![Point::zeros(); k];
        let mut counts = vec![0usize; k];
        for (p, &label) in points.iter().zip(&labels) {
            sums[label] += p;
            counts[label] += 1;
        }

        let mut spread: Vec<f64> = points
            .iter()
            .zip(&labels)
            .map(|(p, &label)| (p - centroids[label]).norm_squared())
            .collect();
        for j in 0..k {
            if counts[j] > 0 {
                centroids[j] = sums[j] / counts[j] as f64;
            } else {
                // Re-seed an empty cluster at the worst-fitting point.
                let (far, _) = spread
                    .iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |acc, (i, &d)| {
                        if d > acc.1 {
                            (i, d)
                        } else {
                            acc
                        }
                    });
                centroids[j] = points[far];
                spread[far] = 0.0;
            }
        }
    }

    let mut inertia = 0.0;
    for (label, p) in labels.iter_mut().zip(points) {
        *label = nearest_centroid(&centroids, p);
        inertia += (p - centroids[*label]).norm_squared();
    }

    KMeansFit {
        centroids,
        labels,
        inertia,
        iterations,
    }
}
