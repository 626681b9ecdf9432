//! K-means clustering over written vector files.
//!
//! Lloyd's algorithm with k-means++ initialization. This consumes the
//! trainer's *output* (a vector file re-read through [`WordVectors`]), so it
//! sits outside the engine's bit-exactness contract; it uses the ecosystem
//! RNG seeded for repeatability, and rayon for the assignment step.

use crate::error::{Error, Result};
use crate::vectors::WordVectors;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use rayon::prelude::*;
use std::io::Write;

/// Clustering knobs.
#[derive(Debug, Clone, Copy)]
pub struct KMeansConfig {
    /// Number of clusters.
    pub clusters: usize,
    /// Iteration cap for Lloyd's loop.
    pub max_iterations: usize,
    /// Stop once no centroid moves farther than this.
    pub tolerance: f32,
    /// Seed for centroid initialization.
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            clusters: 8,
            max_iterations: 100,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

/// A fitted clustering.
#[derive(Debug, Clone)]
pub struct Clustering {
    /// Cluster index per vector, in file order.
    pub assignments: Vec<usize>,
    /// Final centroids.
    pub centroids: Vec<Vec<f32>>,
    /// Lloyd iterations actually run.
    pub iterations: usize,
}

fn distance_sq(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn nearest(point: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best = 0;
    let mut best_d = f32::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let d = distance_sq(point, centroid);
        if d < best_d {
            best_d = d;
            best = c;
        }
    }
    best
}

/// K-means++ seeding: the first centroid uniform, each next one drawn with
/// probability proportional to its squared distance from the chosen set.
fn seed_centroids(points: &[&[f32]], k: usize, rng: &mut XorShiftRng) -> Vec<Vec<f32>> {
    let mut centroids: Vec<Vec<f32>> = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..points.len())].to_vec());

    let mut dist = vec![0.0f32; points.len()];
    while centroids.len() < k {
        let newest = centroids.last().expect("at least one centroid");
        for (i, point) in points.iter().enumerate() {
            let d = distance_sq(point, newest);
            if centroids.len() == 1 || d < dist[i] {
                dist[i] = d;
            }
        }
        let total: f32 = dist.iter().sum();
        let chosen = if total > 0.0 {
            let mut r = rng.random::<f32>() * total;
            let mut pick = points.len() - 1;
            for (i, &d) in dist.iter().enumerate() {
                if r <= d {
                    pick = i;
                    break;
                }
                r -= d;
            }
            pick
        } else {
            // All remaining mass is zero (duplicate points); fall back to
            // a uniform pick.
            rng.random_range(0..points.len())
        };
        centroids.push(points[chosen].to_vec());
    }
    centroids
}

/// Cluster a vector file's rows.
pub fn cluster(vectors: &WordVectors, config: &KMeansConfig) -> Result<Clustering> {
    let points: Vec<&[f32]> = vectors.iter().map(|(_, v)| v).collect();
    if config.clusters == 0 || config.clusters > points.len() {
        return Err(Error::TooFewVectors {
            k: config.clusters,
            n: points.len(),
        });
    }

    let mut rng = XorShiftRng::seed_from_u64(config.seed);
    let mut centroids = seed_centroids(&points, config.clusters, &mut rng);
    let dim = vectors.dim();

    let mut assignments = vec![0usize; points.len()];
    let mut iterations = 0;
    for _ in 0..config.max_iterations {
        iterations += 1;

        assignments = points
            .par_iter()
            .map(|point| nearest(point, &centroids))
            .collect();

        // Recompute centroids; an emptied cluster keeps its old position.
        let mut sums = vec![vec![0.0f32; dim]; config.clusters];
        let mut counts = vec![0usize; config.clusters];
        for (point, &cluster) in points.iter().zip(&assignments) {
            counts[cluster] += 1;
            for (slot, value) in sums[cluster].iter_mut().zip(*point) {
                *slot += value;
            }
        }

        let mut shift = 0.0f32;
        for c in 0..config.clusters {
            if counts[c] == 0 {
                continue;
            }
            let mean: Vec<f32> = sums[c].iter().map(|s| s / counts[c] as f32).collect();
            shift = shift.max(distance_sq(&mean, &centroids[c]).sqrt());
            centroids[c] = mean;
        }
        if shift <= config.tolerance {
            break;
        }
    }

    Ok(Clustering {
        assignments,
        centroids,
        iterations,
    })
}

/// Write one line per cluster: the member keys, space-separated, in file
/// order. Empty clusters produce empty lines so line index == cluster id.
pub fn write_clusters<W: Write>(
    vectors: &WordVectors,
    clustering: &Clustering,
    mut out: W,
) -> Result<()> {
    for c in 0..clustering.centroids.len() {
        let mut first = true;
        for (i, (key, _)) in vectors.iter().enumerate() {
            if clustering.assignments[i] == c {
                if !first {
                    write!(out, " ")?;
                }
                write!(out, "{key}")?;
                first = false;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}
