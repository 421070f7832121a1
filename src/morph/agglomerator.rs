/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::ReconError;
use crate::joint::ContingencyTable;
use crate::morph::{CausalState, MorphComparator, MorphParams};
use crate::rand_util::{shuffle, StdRng};

/// Greedy single-pass agglomeration of past clusters into causal states.
///
/// Past clusters are visited in order (optionally pre-shuffled by a
/// fixed seed) and each one joins the *first* existing state whose morph
/// it's statistically indistinguishable from, per `comparator`. No
/// backtracking and no best-fit search: a past cluster is compared
/// against states in the order they were created, and the first match
/// wins. This makes the output depend on visitation order, which is why
/// `permute_seed` is an explicit, fixed part of the pipeline's
/// reproducibility contract rather than left to iteration order.
///
/// State indices are one-based (`0` means "unassigned"), matching the
/// reserved margin label [`crate::filter::CausalFilter`] writes outside
/// the interior region.
pub struct MorphAgglomerator;

impl MorphAgglomerator {
    pub fn agglomerate<C: MorphComparator>(
        table: &ContingencyTable,
        comparator: &C,
        params: MorphParams,
    ) -> Result<(Vec<CausalState>, Vec<usize>), ReconError> {
        let k_p = table.k_p();
        if k_p == 0 {
            return Err(ReconError::EmptyTable);
        }

        let mut order: Vec<usize> = (0..k_p).collect();
        if let Some(seed) = params.permute_seed {
            let mut rng = StdRng::from_seed(seed);
            shuffle(&mut order, &mut rng);
        }

        let mut states: Vec<CausalState> = Vec::new();
        let mut past_to_state = vec![0usize; k_p];

        for &p in &order {
            let row = table.row(p);
            let row_f64: Vec<f64> = row.iter().map(|&c| c as f64).collect();

            let mut joined = None;
            for (pos, state) in states.iter().enumerate() {
                if comparator.are_equivalent(&state.morph, &row_f64)? {
                    joined = Some(pos);
                    break;
                }
            }

            match joined {
                Some(pos) => {
                    states[pos].absorb(p, row);
                    past_to_state[p] = states[pos].index;
                }
                None => {
                    let new_index = states.len() + 1;
                    states.push(CausalState::new(new_index, p, row));
                    past_to_state[p] = new_index;
                }
            }
        }

        Ok((states, past_to_state))
    }
}
