/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::ReconError;

/// A 3D spatiotemporal scalar field `F(t, y, x)`, stored row-major with
/// `x` fastest, `t` slowest. This is the crate's analogue of the grid
/// storage used elsewhere in the causality toolchain, specialized to a
/// single dynamically-sized `f64` lattice rather than a const-generic
/// array: lightcone fields are only known at runtime, so the fixed-size
/// `[[[T; W]; H]; D]` backing used for small compile-time grids doesn't
/// apply here.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    data: Vec<f64>,
    t: usize,
    y: usize,
    x: usize,
}

/// The spacetime shape of the interior region once lightcone margins
/// have been accounted for. Threaded explicitly through the pipeline so
/// the Extractor and CausalFilter never have to re-derive it from
/// scratch, and so the lexicographic `(t, y, x)` row order they both
/// depend on stays anchored to one shared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustedShape {
    pub t: usize,
    pub y: usize,
    pub x: usize,
}

impl AdjustedShape {
    pub fn new(t: usize, y: usize, x: usize) -> Self {
        Self { t, y, x }
    }

    pub fn len(&self) -> usize {
        self.t * self.y * self.x
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Field {
    /// Builds a field from row-major data. Fails with
    /// [`ReconError::InvalidShape`] if `data.len() != t*y*x`.
    pub fn new(data: Vec<f64>, t: usize, y: usize, x: usize) -> Result<Self, ReconError> {
        if data.len() != t * y * x {
            return Err(ReconError::InvalidShape(format!(
                "field data has {} elements, expected {}*{}*{}={}",
                data.len(),
                t,
                y,
                x,
                t * y * x
            )));
        }
        Ok(Self { data, t, y, x })
    }

    pub fn dims(&self) -> (usize, usize, usize) {
        (self.t, self.y, self.x)
    }

    #[inline(always)]
    fn offset(&self, t: usize, y: usize, x: usize) -> usize {
        (t * self.y + y) * self.x + x
    }

    /// Reads the field at `(t, y, x)`. Panics on out-of-bounds indices;
    /// callers in this crate only ever index positions they derived from
    /// `dims()`, so this mirrors the panic-on-misuse convention used by
    /// the rest of the corpus's index-based accessors.
    #[inline(always)]
    pub fn get(&self, t: usize, y: usize, x: usize) -> f64 {
        self.data[self.offset(t, y, x)]
    }

    /// Wrap-pads the spatial axes (`y`, `x`) by `margin` on each side.
    /// The temporal axis is left untouched, matching the spec's
    /// requirement that time is never wrapped.
    pub fn pad_periodic(&self, margin: usize) -> Field {
        if margin == 0 {
            return self.clone();
        }
        let new_y = self.y + 2 * margin;
        let new_x = self.x + 2 * margin;
        let mut data = vec![0.0; self.t * new_y * new_x];
        for t in 0..self.t {
            for y in 0..new_y {
                let src_y = wrap_index(y as isize - margin as isize, self.y);
                for x in 0..new_x {
                    let src_x = wrap_index(x as isize - margin as isize, self.x);
                    let dst = (t * new_y + y) * new_x + x;
                    data[dst] = self.get(t, src_y, src_x);
                }
            }
        }
        Field {
            data,
            t: self.t,
            y: new_y,
            x: new_x,
        }
    }
    /// Zero-pads the spatial axes (`y`, `x`) by `margin` on each side,
    /// leaving the temporal axis untouched. The inverse of the spatial
    /// shrinkage an open-boundary extraction applies, used by
    /// [`crate::filter::CausalFilter`] to restore a label field to the
    /// original field's spatial extent.
    pub fn zero_pad_spatial(&self, margin: usize) -> Field {
        if margin == 0 {
            return self.clone();
        }
        let new_y = self.y + 2 * margin;
        let new_x = self.x + 2 * margin;
        let mut data = vec![0.0; self.t * new_y * new_x];
        for t in 0..self.t {
            for y in 0..self.y {
                for x in 0..self.x {
                    let dst = (t * new_y + (y + margin)) * new_x + (x + margin);
                    data[dst] = self.get(t, y, x);
                }
            }
        }
        Field {
            data,
            t: self.t,
            y: new_y,
            x: new_x,
        }
    }

    /// Zero-pads the temporal axis with `before` frames at the start and
    /// `after` frames at the end, restoring the original `T` extent that
    /// the past/future lightcone depths consumed.
    pub fn zero_pad_temporal(&self, before: usize, after: usize) -> Field {
        if before == 0 && after == 0 {
            return self.clone();
        }
        let new_t = self.t + before + after;
        let plane = self.y * self.x;
        let mut data = vec![0.0; new_t * plane];
        data[before * plane..(before * plane + self.t * plane)].copy_from_slice(&self.data);
        Field {
            data,
            t: new_t,
            y: self.y,
            x: self.x,
        }
    }
}

/// Wraps `idx` into `[0, len)`, supporting the negative offsets produced
/// when padding margins extend before the start of an axis.
fn wrap_index(idx: isize, len: usize) -> usize {
    let len = len as isize;
    (((idx % len) + len) % len) as usize
}
