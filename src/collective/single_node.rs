/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::collective::Collective;
use crate::errors::ReconError;
use crate::joint::ContingencyTable;

/// The single-rank `Collective`: every call is already globally
/// consistent, so `barrier` is a no-op and `allreduce_sum_u64` leaves
/// `table` unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleNodeCollective;

impl Collective for SingleNodeCollective {
    fn barrier(&self) -> Result<(), ReconError> {
        Ok(())
    }

    fn allreduce_sum_u64(&self, _table: &mut ContingencyTable) -> Result<(), ReconError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_node_allreduce_is_a_no_op() {
        let mut table = ContingencyTable::zeros(2, 2);
        let collective = SingleNodeCollective;
        collective.barrier().unwrap();
        let before = table.clone();
        collective.allreduce_sum_u64(&mut table).unwrap();
        assert_eq!(table, before);
    }
}
