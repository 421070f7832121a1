/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::ReconError;
use crate::kmeans::KMeansParams;
use crate::rand_util::{shuffle, StdRng};
use crate::types::{InitMethod, LightconeMatrix};

/// Lloyd's-algorithm k-means over lightcone matrices.
///
/// Split into two passes on purpose: [`KMeansAssigner::fit`] produces
/// centroids, and [`KMeansAssigner::predict`] assigns labels against an
/// already-known centroid set. A distributed caller runs `fit` locally
/// per shard, all-reduces the centroids (or the sufficient statistics
/// that derive them) between ranks, then calls `predict` once on the
/// agreed centroids -- `predict` never needs a `Collective` handle.
pub struct KMeansAssigner;

impl KMeansAssigner {
    /// Runs Lloyd's algorithm to (at most `params.max_iter` iterations
    /// of) convergence, returning the final centroids and the labels
    /// assigned to `matrix` under them.
    pub fn fit(
        matrix: &LightconeMatrix,
        params: KMeansParams,
    ) -> Result<(LightconeMatrix, Vec<usize>), ReconError> {
        let rows = matrix.rows();
        if rows == 0 {
            return Err(ReconError::EmptyInput);
        }
        if params.k == 0 || params.k > rows {
            return Err(ReconError::BadK(format!(
                "k={} must be in 1..={rows}",
                params.k
            )));
        }

        let mut centroids = init_centroids(matrix, params.k, params.init, params.seed)?;
        let mut labels = assign(matrix, &centroids)?;

        for _ in 0..params.max_iter {
            let next_centroids = update_centroids(matrix, &labels, &centroids)?;
            let next_labels = assign(matrix, &next_centroids)?;
            centroids = next_centroids;
            let converged = next_labels == labels;
            labels = next_labels;
            if converged {
                break;
            }
        }

        Ok((centroids, labels))
    }

    /// Assigns `matrix` rows to the nearest of `centroids`, with no
    /// iteration and no RNG use. This is the half of k-means a
    /// distributed run can replay identically on every rank once
    /// centroids have been agreed on.
    pub fn predict(
        matrix: &LightconeMatrix,
        centroids: &LightconeMatrix,
    ) -> Result<Vec<usize>, ReconError> {
        assign(matrix, centroids)
    }
}

fn init_centroids(
    matrix: &LightconeMatrix,
    k: usize,
    method: InitMethod,
    seed: u64,
) -> Result<LightconeMatrix, ReconError> {
    let cols = matrix.cols();
    let rows = matrix.rows();
    let mut centroids = LightconeMatrix::zeros(k, cols);

    match method {
        InitMethod::Default => {
            for i in 0..k {
                centroids.row_mut(i).copy_from_slice(matrix.row(i));
            }
        }
        InitMethod::Random => {
            let mut rng = StdRng::from_seed(seed);
            let mut indices: Vec<usize> = (0..rows).collect();
            shuffle(&mut indices, &mut rng);
            for i in 0..k {
                centroids.row_mut(i).copy_from_slice(matrix.row(indices[i]));
            }
        }
        InitMethod::PlusPlus => {
            let mut rng = StdRng::from_seed(seed);
            let first = rng.gen_range(rows);
            centroids.row_mut(0).copy_from_slice(matrix.row(first));

            let mut sq_dist: Vec<f64> = (0..rows)
                .map(|r| squared_distance(matrix.row(r), centroids.row(0)))
                .collect();

            for c in 1..k {
                let total: f64 = sq_dist.iter().sum();
                if total <= 0.0 {
                    // every remaining row coincides with an already-chosen
                    // centroid: plus-plus has run out of diversity to sample
                    // from and cannot place a k'th distinct centroid.
                    return Err(ReconError::NumericFailure(format!(
                        "k-means++ init exhausted distinct rows at centroid {} of {k}",
                        c + 1
                    )));
                }
                let target = rng.gen_f64() * total;
                let mut cumulative = 0.0;
                let mut chosen = rows - 1;
                for (r, &d) in sq_dist.iter().enumerate() {
                    cumulative += d;
                    if cumulative >= target {
                        chosen = r;
                        break;
                    }
                }
                centroids.row_mut(c).copy_from_slice(matrix.row(chosen));
                for r in 0..rows {
                    let d = squared_distance(matrix.row(r), centroids.row(c));
                    if d < sq_dist[r] {
                        sq_dist[r] = d;
                    }
                }
            }
        }
    }

    Ok(centroids)
}

fn assign(matrix: &LightconeMatrix, centroids: &LightconeMatrix) -> Result<Vec<usize>, ReconError> {
    if centroids.cols() != matrix.cols() {
        return Err(ReconError::InvalidShape(format!(
            "centroid width {} does not match matrix width {}",
            centroids.cols(),
            matrix.cols()
        )));
    }
    let k = centroids.rows();
    if k == 0 {
        return Err(ReconError::BadK("zero centroids".to_string()));
    }

    let mut labels = Vec::with_capacity(matrix.rows());
    for r in 0..matrix.rows() {
        let row = matrix.row(r);
        let mut best = 0;
        let mut best_dist = squared_distance(row, centroids.row(0));
        for c in 1..k {
            let d = squared_distance(row, centroids.row(c));
            if d < best_dist {
                best_dist = d;
                best = c;
            }
        }
        labels.push(best);
    }
    Ok(labels)
}

fn update_centroids(
    matrix: &LightconeMatrix,
    labels: &[usize],
    previous: &LightconeMatrix,
) -> Result<LightconeMatrix, ReconError> {
    let k = previous.rows();
    let cols = matrix.cols();
    let mut sums = vec![0.0; k * cols];
    let mut counts = vec![0usize; k];

    for (r, &label) in labels.iter().enumerate() {
        counts[label] += 1;
        let row = matrix.row(r);
        let sum_row = &mut sums[label * cols..(label + 1) * cols];
        for (s, v) in sum_row.iter_mut().zip(row) {
            *s += v;
        }
    }

    let mut centroids = LightconeMatrix::zeros(k, cols);
    for c in 0..k {
        if counts[c] == 0 {
            // empty cluster: keep the previous centroid rather than
            // collapsing to the origin.
            centroids.row_mut(c).copy_from_slice(previous.row(c));
            continue;
        }
        let n = counts[c] as f64;
        let sum_row = &sums[c * cols..(c + 1) * cols];
        let dst = centroids.row_mut(c);
        for (d, s) in dst.iter_mut().zip(sum_row) {
            *d = s / n;
        }
    }
    Ok(centroids)
}

#[inline]
fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
