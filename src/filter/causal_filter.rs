/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::ReconError;
use crate::extractor::LightconeParams;
use crate::types::{AdjustedShape, Boundary, Field};

/// Projects a per-past-cluster label vector, through the past-cluster ->
/// causal-state map `M`, back onto the spacetime lattice.
///
/// This undoes exactly what [`crate::extractor::Extractor`] did: where
/// extraction shrank the interior (open boundary) or left it full width
/// but excluded spatial padding from state assignment (periodic
/// boundary), `CausalFilter` restores the original spatial extent with
/// zero-valued margins, and optionally restores the original temporal
/// extent the same way.
pub struct CausalFilter;

impl CausalFilter {
    /// `past_labels[i]` is the past-cluster index assigned to interior
    /// row `i` (in the same lexicographic `(t, y, x)` order
    /// [`crate::extractor::Extractor`] produced); `state_map[p]` is the
    /// one-based causal-state index past cluster `p` was agglomerated
    /// into, as produced by [`crate::morph::MorphAgglomerator`].
    ///
    /// Output values are one-based (`1..=|states|`) inside the interior
    /// region and exactly `0` in any re-padded margin, so a state label
    /// is never confused with "no state assigned".
    pub fn apply(
        past_labels: &[usize],
        state_map: &[usize],
        shape: AdjustedShape,
        params: LightconeParams,
        boundary: Boundary,
        pad_temporal: bool,
    ) -> Result<Field, ReconError> {
        if past_labels.len() != shape.len() {
            return Err(ReconError::InvalidShape(format!(
                "{} past labels does not match interior size {}",
                past_labels.len(),
                shape.len()
            )));
        }

        let mut values = Vec::with_capacity(past_labels.len());
        for &p in past_labels {
            let state = state_map.get(p).ok_or_else(|| {
                ReconError::InvalidShape(format!(
                    "past cluster {p} has no entry in the {}-state map",
                    state_map.len()
                ))
            })?;
            values.push(*state as f64);
        }

        let interior = Field::new(values, shape.t, shape.y, shape.x)?;

        let spatially_restored = match boundary {
            Boundary::Periodic => interior,
            Boundary::Open => interior.zero_pad_spatial(params.margin()),
        };

        let restored = if pad_temporal {
            spatially_restored.zero_pad_temporal(params.past_depth, params.future_depth)
        } else {
            spatially_restored
        };

        Ok(restored)
    }
}
