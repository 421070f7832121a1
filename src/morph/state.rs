/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

/// A causal state produced by agglomerating one or more past clusters
/// that share a statistically indistinguishable future.
///
/// Stored as a flat record rather than a tree of back-pointers: nothing
/// downstream ever needs to walk from a state to its member past
/// clusters except to build the final past-cluster -> state map `M`, and
/// `pasts` already gives that directly.
///
/// `index` is one-based: `0` is reserved to mean "no state assigned",
/// which doubles as the label [`crate::filter::CausalFilter`] writes
/// into any re-padded margin.
#[derive(Debug, Clone, PartialEq)]
pub struct CausalState {
    pub index: usize,
    pub pasts: Vec<usize>,
    /// Elementwise sum, over every member past cluster, of its row in the
    /// contingency table.
    pub counts: Vec<u64>,
    /// `counts` divided by `pasts.len()` -- the distribution this state
    /// is compared against when deciding whether another past cluster
    /// joins it.
    pub morph: Vec<f64>,
}

impl CausalState {
    pub fn new(index: usize, first_past: usize, counts: &[u64]) -> Self {
        let morph = counts.iter().map(|&c| c as f64).collect();
        Self {
            index,
            pasts: vec![first_past],
            counts: counts.to_vec(),
            morph,
        }
    }

    /// Folds another past cluster's row into this state's counts and
    /// recomputes the mean morph.
    pub fn absorb(&mut self, past: usize, row: &[u64]) {
        self.pasts.push(past);
        for (c, r) in self.counts.iter_mut().zip(row) {
            *c += r;
        }
        let n = self.pasts.len() as f64;
        for (m, c) in self.morph.iter_mut().zip(&self.counts) {
            *m = *c as f64 / n;
        }
    }
}
