/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::ReconError;

/// A `K_P x K_F` non-negative integer contingency table, counting how
/// often past cluster `p` co-occurs (at the same spacetime row) with
/// future cluster `f`.
///
/// Stored row-major over past clusters so [`ContingencyTable::merge`]
/// (the allreduce-sum step of a distributed run) is a flat elementwise
/// addition regardless of how a rank's local shard was built.
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    counts: Vec<u64>,
    k_p: usize,
    k_f: usize,
}

impl ContingencyTable {
    pub fn zeros(k_p: usize, k_f: usize) -> Self {
        Self {
            counts: vec![0; k_p * k_f],
            k_p,
            k_f,
        }
    }

    pub fn k_p(&self) -> usize {
        self.k_p
    }

    pub fn k_f(&self) -> usize {
        self.k_f
    }

    #[inline(always)]
    pub fn get(&self, p: usize, f: usize) -> u64 {
        self.counts[p * self.k_f + f]
    }

    #[inline(always)]
    fn increment(&mut self, p: usize, f: usize) {
        self.counts[p * self.k_f + f] += 1;
    }

    /// Entries `counts[p][0..k_f]` for past cluster `p`, in future-cluster
    /// order -- the row the chi-square comparator treats as one sample.
    pub fn row(&self, p: usize) -> &[u64] {
        &self.counts[p * self.k_f..(p + 1) * self.k_f]
    }

    pub fn row_sum(&self, p: usize) -> u64 {
        self.row(p).iter().sum()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Adds `other`'s counts into `self` in place. Both tables must share
    /// the same `(k_p, k_f)` shape; this is the primitive
    /// `Collective::allreduce_sum_u64` builds on.
    pub fn merge(&mut self, other: &ContingencyTable) -> Result<(), ReconError> {
        if self.k_p != other.k_p || self.k_f != other.k_f {
            return Err(ReconError::InvalidShape(format!(
                "cannot merge {}x{} table into {}x{}",
                other.k_p, other.k_f, self.k_p, self.k_f
            )));
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        Ok(())
    }
}

/// Builds a [`ContingencyTable`] from parallel past/future label vectors.
pub(crate) fn build(
    past_labels: &[usize],
    future_labels: &[usize],
    k_p: usize,
    k_f: usize,
) -> Result<ContingencyTable, ReconError> {
    if past_labels.len() != future_labels.len() {
        return Err(ReconError::InvalidShape(format!(
            "past label count {} does not match future label count {}",
            past_labels.len(),
            future_labels.len()
        )));
    }
    let mut table = ContingencyTable::zeros(k_p, k_f);
    for (&p, &f) in past_labels.iter().zip(future_labels) {
        if p >= k_p || f >= k_f {
            return Err(ReconError::InvalidShape(format!(
                "label pair ({p}, {f}) out of range for a {k_p}x{k_f} table"
            )));
        }
        table.increment(p, f);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_counts_co_occurrences() {
        let past = vec![0, 0, 1, 1];
        let future = vec![0, 1, 1, 1];
        let table = build(&past, &future, 2, 2).unwrap();
        assert_eq!(table.get(0, 0), 1);
        assert_eq!(table.get(0, 1), 1);
        assert_eq!(table.get(1, 0), 0);
        assert_eq!(table.get(1, 1), 2);
        assert_eq!(table.total(), 4);
    }

    #[test]
    fn build_rejects_mismatched_lengths() {
        let err = build(&[0, 1], &[0], 2, 2).unwrap_err();
        assert!(matches!(err, ReconError::InvalidShape(_)));
    }

    #[test]
    fn build_rejects_out_of_range_labels() {
        let err = build(&[0], &[5], 1, 2).unwrap_err();
        assert!(matches!(err, ReconError::InvalidShape(_)));
    }

    #[test]
    fn merge_sums_elementwise() {
        let mut a = build(&[0, 1], &[0, 1], 2, 2).unwrap();
        let b = build(&[0, 0], &[0, 1], 2, 2).unwrap();
        a.merge(&b).unwrap();
        assert_eq!(a.get(0, 0), 2);
        assert_eq!(a.get(0, 1), 1);
        assert_eq!(a.get(1, 1), 1);
        assert_eq!(a.total(), 4);
    }

    #[test]
    fn merge_rejects_shape_mismatch() {
        let mut a = ContingencyTable::zeros(2, 2);
        let b = ContingencyTable::zeros(3, 2);
        let err = a.merge(&b).unwrap_err();
        assert!(matches!(err, ReconError::InvalidShape(_)));
    }

    #[test]
    fn row_sum_matches_manual_sum() {
        let table = build(&[0, 0, 0], &[0, 1, 1], 1, 2).unwrap();
        assert_eq!(table.row_sum(0), 3);
        assert_eq!(table.row(0), &[1, 2]);
    }
}
