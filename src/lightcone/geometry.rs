/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! Pure functions of `(depth, c)`: lightcone cell counts and the
//! exponential spacetime decay weight vectors used to scale lightcone
//! matrix columns before k-means clustering.
//!
//! Cell enumeration order inside a depth slice is `a` in `[-c*d, c*d]`
//! outer, `b` inner, identical to [`crate::extractor::Extractor`]'s
//! traversal -- the weight vectors produced here are meant to multiply
//! `plcs`/`flcs` columnwise, so the two orderings must never drift
//! apart.

use crate::types::DecayMode;

/// Number of cells in a past lightcone of the given `depth` and
/// propagation speed `c`: `sum_{d=0..=depth} (2*c*d+1)^2`.
pub fn past_lightcone_size(depth: usize, c: usize) -> usize {
    (0..=depth).map(|d| slice_len(d, c).pow(2)).sum()
}

/// Number of cells in a future lightcone of the given `depth`: the past
/// formula evaluated at `depth`, minus the present cell (which belongs
/// to the past lightcone, not the future).
pub fn future_lightcone_size(depth: usize, c: usize) -> usize {
    past_lightcone_size(depth, c).saturating_sub(1)
}

#[inline(always)]
fn slice_len(d: usize, c: usize) -> usize {
    2 * c * d + 1
}

/// Decay weight vector `w_i = exp(-rate * distance_i)` for a past
/// lightcone of the given `depth`, `c`, and exponential `rate`,
/// enumerated in the same `(d, a, b)` order the Extractor uses to fill
/// `plcs` rows.
///
/// This returns the raw weight `w_i`, *not* `sqrt(w_i)`. §4.C requires
/// lightcone matrix columns be scaled by `sqrt(w_i)` so that squared
/// Euclidean distance in the scaled space equals the decayed distance
/// `sum_i w_i*(x_i-y_i)^2`; callers (see
/// [`crate::pipeline::Pipeline::extract`]) must take the elementwise
/// square root of this vector before calling
/// [`crate::types::LightconeMatrix::scale_columns`].
///
/// `DecayMode::None` yields an all-ones vector (the caller should treat
/// `none` as "skip scaling entirely", but an all-ones vector is still a
/// faithful, harmless weight vector for tests that want to exercise the
/// scaling code path unconditionally).
pub fn past_decay_weights(depth: usize, c: usize, rate: f64, mode: DecayMode) -> Vec<f64> {
    let mut weights = Vec::with_capacity(past_lightcone_size(depth, c));
    for d in 0..=depth {
        push_depth_slice(&mut weights, d, c, rate, mode);
    }
    weights
}

/// Decay weight vector for a future lightcone of the given `depth`; same
/// raw-`w_i` (not `sqrt(w_i)`) contract as [`past_decay_weights`]. Depth
/// `0` is excluded (the present cell has no future-lightcone
/// representation); the temporal depth `d` enumerated ranges over
/// `1..=depth`.
pub fn future_decay_weights(depth: usize, c: usize, rate: f64, mode: DecayMode) -> Vec<f64> {
    let mut weights = Vec::with_capacity(future_lightcone_size(depth, c));
    for d in 1..=depth {
        push_depth_slice(&mut weights, d, c, rate, mode);
    }
    weights
}

fn push_depth_slice(weights: &mut Vec<f64>, d: usize, c: usize, rate: f64, mode: DecayMode) {
    let span = c as isize * d as isize;
    for a in -span..=span {
        for b in -span..=span {
            let distance = match mode {
                DecayMode::None => 0.0,
                DecayMode::Space => ((a * a + b * b) as f64).sqrt(),
                DecayMode::Time => d as f64,
                DecayMode::Spacetime => {
                    ((a * a + b * b) as f64 + (d * d) as f64).sqrt()
                }
            };
            weights.push((-rate * distance).exp());
        }
    }
}
