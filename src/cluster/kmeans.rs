use anyhow::{Result, bail};
use rand::Rng;
use rand::seq::{IndexedRandom, index};

use crate::cluster::dataset::Point;

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub center: Point,
    pub members: Vec<Point>,
}

/// Lloyd's k-means with a convergence threshold and an iteration cap.
#[derive(Debug, Clone, Copy)]
pub struct KMeans {
    threshold: f64,
    max_iterations: usize,
}

impl KMeans {
    pub fn new(threshold: f64, max_iterations: usize) -> Result<Self> {
        if !(threshold > 0.0 && threshold < 1.0) {
            bail!("threshold must lie strictly between 0 and 1, got {}", threshold);
        }
        if max_iterations == 0 {
            bail!("at least one iteration is required");
        }
        Ok(Self { threshold, max_iterations })
    }

    /// Splits `points` into `k` clusters. `on_iteration` sees the clusters after every
    /// iteration together with its zero-based index; an error from it aborts the run.
    pub fn partition<R, F>(
        &self,
        points: &[Point],
        k: usize,
        rng: &mut R,
        mut on_iteration: F,
    ) -> Result<Vec<Cluster>>
    where
        R: Rng,
        F: FnMut(&[Cluster], usize) -> Result<()>,
    {
        if k == 0 {
            bail!("k must be at least 1");
        }
        if k > points.len() {
            bail!("cannot form {} clusters from {} points", k, points.len());
        }

        let mut clusters: Vec<Cluster> = index::sample(rng, points.len(), k)
            .iter()
            .map(|i| Cluster { center: points[i], members: Vec::new() })
            .collect();
        let mut assignment = vec![usize::MAX; points.len()];
        // Converged once fewer than this many points move in one iteration
        let settle = (points.len() as f64 * self.threshold) as usize;

        for iteration in 0..self.max_iterations {
            let mut changes = 0;
            for (slot, point) in assignment.iter_mut().zip(points) {
                let nearest = nearest(&clusters, point);
                if *slot != nearest {
                    *slot = nearest;
                    changes += 1;
                }
            }

            // An empty cluster takes a random point from a cluster that can spare one
            let mut sizes = vec![0usize; k];
            for &c in &assignment {
                sizes[c] += 1;
            }
            for empty in 0..k {
                if sizes[empty] > 0 {
                    continue;
                }
                let donors: Vec<usize> =
                    (0..points.len()).filter(|&p| sizes[assignment[p]] > 1).collect();
                if let Some(&moved) = donors.choose(rng) {
                    sizes[assignment[moved]] -= 1;
                    assignment[moved] = empty;
                    sizes[empty] += 1;
                    changes = points.len();
                }
            }

            for cluster in &mut clusters {
                cluster.members.clear();
            }
            for (&c, point) in assignment.iter().zip(points) {
                clusters[c].members.push(*point);
            }
            for cluster in &mut clusters {
                cluster.center = centroid(&cluster.members).unwrap_or(cluster.center);
            }

            on_iteration(&clusters, iteration)?;

            if changes == 0 || changes < settle {
                break;
            }
        }

        Ok(clusters)
    }
}

fn nearest(clusters: &[Cluster], point: &Point) -> usize {
    clusters
        .iter()
        .map(|c| distance_squared(&c.center, point))
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(0, |(i, _)| i)
}

fn distance_squared(a: &Point, b: &Point) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
    Some([sx / n, sy / n])
}
