/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::ReconError;
use crate::joint::table;
use crate::joint::ContingencyTable;

/// Builds the past/future contingency table from clustering labels.
///
/// A distributed run calls [`JointCounter::count`] once per rank (on
/// that rank's local rows) and combines the resulting local tables with
/// `Collective::allreduce_sum_u64` (== repeated [`ContingencyTable::merge`])
/// to get the global table used by agglomeration.
pub struct JointCounter;

impl JointCounter {
    pub fn count(
        past_labels: &[usize],
        future_labels: &[usize],
        k_p: usize,
        k_f: usize,
    ) -> Result<ContingencyTable, ReconError> {
        table::build(past_labels, future_labels, k_p, k_f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_matches_direct_table_build() {
        let past = vec![0, 1, 1, 0];
        let future = vec![1, 1, 0, 0];
        let table = JointCounter::count(&past, &future, 2, 2).unwrap();
        assert_eq!(table.total(), 4);
        assert_eq!(table.get(0, 1), 1);
        assert_eq!(table.get(1, 0), 1);
    }
}
