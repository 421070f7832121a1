/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::ReconError;
use crate::extractor::LightconeParams;
use crate::lightcone::{future_lightcone_size, past_lightcone_size};
use crate::types::{AdjustedShape, Boundary, Field, LightconeMatrix};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Stencils a padded field into past/future lightcone matrices for every
/// interior spacetime point.
///
/// Row order is lexicographic over `(t, y, x)` with `x` fastest; this
/// ordering is a contract downstream stages rely on (label vectors index
/// into these rows, and [`crate::filter::CausalFilter`] reshapes label
/// vectors back using the same [`AdjustedShape`]).
pub struct Extractor;

impl Extractor {
    /// Extracts `(plcs, flcs, adjusted_shape)` from `field` under the
    /// given lightcone geometry and boundary condition.
    pub fn extract(
        field: &Field,
        params: LightconeParams,
        boundary: Boundary,
    ) -> Result<(LightconeMatrix, LightconeMatrix, AdjustedShape), ReconError> {
        let (t, y, x) = field.dims();
        let margin = params.margin();

        if t <= params.past_depth + params.future_depth {
            return Err(ReconError::InvalidShape(format!(
                "temporal extent {t} is too small for past_depth={} + future_depth={}",
                params.past_depth, params.future_depth
            )));
        }
        let adjusted_t = t - params.past_depth - params.future_depth;

        let (padded, adjusted_y, adjusted_x) = match boundary {
            Boundary::Periodic => (field.pad_periodic(margin), y, x),
            Boundary::Open => {
                if y <= 2 * margin || x <= 2 * margin {
                    return Err(ReconError::InvalidShape(format!(
                        "spatial extent ({y},{x}) is too small for open-boundary margin {margin}"
                    )));
                }
                (field.clone(), y - 2 * margin, x - 2 * margin)
            }
        };

        if adjusted_t == 0 || adjusted_y == 0 || adjusted_x == 0 {
            return Err(ReconError::InvalidShape(
                "interior region has a zero-length axis".to_string(),
            ));
        }

        let adjusted_shape = AdjustedShape::new(adjusted_t, adjusted_y, adjusted_x);
        let n = adjusted_shape.len();
        let size_p = past_lightcone_size(params.past_depth, params.c);
        let size_f = future_lightcone_size(params.future_depth, params.c);

        let base_t = params.past_depth;
        let base_y = margin;
        let base_x = margin;

        let mut plcs = LightconeMatrix::zeros(n, size_p);
        let mut flcs = LightconeMatrix::zeros(n, size_f);

        fill_rows(
            &padded,
            params,
            adjusted_shape,
            (base_t, base_y, base_x),
            &mut plcs,
            &mut flcs,
        );

        Ok((plcs, flcs, adjusted_shape))
    }
}

#[cfg(not(feature = "parallel"))]
fn fill_rows(
    padded: &Field,
    params: LightconeParams,
    shape: AdjustedShape,
    base: (usize, usize, usize),
    plcs: &mut LightconeMatrix,
    flcs: &mut LightconeMatrix,
) {
    for i in 0..shape.len() {
        let (t, y, x) = unflatten(i, shape);
        fill_row(padded, params, base, t, y, x, plcs.row_mut(i), flcs.row_mut(i));
    }
}

#[cfg(feature = "parallel")]
fn fill_rows(
    padded: &Field,
    params: LightconeParams,
    shape: AdjustedShape,
    base: (usize, usize, usize),
    plcs: &mut LightconeMatrix,
    flcs: &mut LightconeMatrix,
) {
    let size_p = plcs.cols();
    let size_f = flcs.cols();
    let n = shape.len();
    let mut plc_rows = vec![0.0; n * size_p];
    let mut flc_rows = vec![0.0; n * size_f];
    plc_rows
        .par_chunks_mut(size_p)
        .zip(flc_rows.par_chunks_mut(size_f))
        .enumerate()
        .for_each(|(i, (p_row, f_row))| {
            let (t, y, x) = unflatten(i, shape);
            fill_row(padded, params, base, t, y, x, p_row, f_row);
        });
    for i in 0..n {
        plcs.row_mut(i).copy_from_slice(&plc_rows[i * size_p..(i + 1) * size_p]);
        flcs.row_mut(i).copy_from_slice(&flc_rows[i * size_f..(i + 1) * size_f]);
    }
}

#[inline(always)]
fn unflatten(i: usize, shape: AdjustedShape) -> (usize, usize, usize) {
    let x = i % shape.x;
    let rem = i / shape.x;
    let y = rem % shape.y;
    let t = rem / shape.y;
    (t, y, x)
}

/// Fills the past and future lightcone rows for one interior point
/// `(t, y, x)`, enumerating cells in the same `(d, a, b)` order as
/// [`crate::lightcone::geometry`]'s decay weight builders.
#[inline]
fn fill_row(
    padded: &Field,
    params: LightconeParams,
    base: (usize, usize, usize),
    t: usize,
    y: usize,
    x: usize,
    p_row: &mut [f64],
    f_row: &mut [f64],
) {
    let (base_t, base_y, base_x) = base;
    let c = params.c as isize;

    let mut p = 0;
    for d in 0..=params.past_depth {
        let span = c * d as isize;
        for a in -span..=span {
            for b in -span..=span {
                let pt = (base_t + t) as isize - d as isize;
                let py = (base_y + y) as isize + a;
                let px = (base_x + x) as isize + b;
                p_row[p] = padded.get(pt as usize, py as usize, px as usize);
                p += 1;
            }
        }
    }

    let mut f = 0;
    for d in 1..=params.future_depth {
        let span = c * d as isize;
        for a in -span..=span {
            for b in -span..=span {
                let pt = (base_t + t) as isize + d as isize;
                let py = (base_y + y) as isize + a;
                let px = (base_x + x) as isize + b;
                f_row[f] = padded.get(pt as usize, py as usize, px as usize);
                f += 1;
            }
        }
    }
}
