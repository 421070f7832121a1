/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::collective::Collective;
use crate::errors::ReconError;
use crate::extractor::Extractor;
use crate::joint::{ContingencyTable, JointCounter};
use crate::kmeans::KMeansAssigner;
use crate::lightcone::{future_decay_weights, past_decay_weights};
use crate::morph::{CausalState, MorphAgglomerator, MorphComparator};
use crate::pipeline::PipelineConfig;
use crate::types::{AdjustedShape, Field, LightconeMatrix};

/// Strict-order orchestrator over the six reconstruction stages:
/// extract -> cluster lightcones -> count the joint distribution ->
/// (allreduce, if distributed) -> agglomerate causal states -> filter
/// back onto the lattice.
///
/// Each method validates that its predecessors have already run,
/// returning [`ReconError::OrderViolation`] otherwise, and releases
/// buffers its own stage no longer needs once it has consumed them --
/// a `Pipeline` is meant to be driven once, start to finish, not reused
/// as a cache of intermediate results.
#[derive(Default)]
pub struct Pipeline {
    config: Option<PipelineConfig>,
    shape: Option<AdjustedShape>,
    plcs: Option<LightconeMatrix>,
    flcs: Option<LightconeMatrix>,
    past_labels: Option<Vec<usize>>,
    future_labels: Option<Vec<usize>>,
    contingency: Option<ContingencyTable>,
    states: Option<Vec<CausalState>>,
    state_map: Option<Vec<usize>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage A+B: builds lightcone geometry, stencils the field into
    /// past/future lightcone matrices, and scales their columns by the
    /// configured decay weights.
    pub fn extract(&mut self, field: &Field, config: PipelineConfig) -> Result<(), ReconError> {
        let (mut plcs, mut flcs, shape) =
            Extractor::extract(field, config.lightcone, config.boundary)?;

        // §4.C: clustering scales columns by sqrt(w), not w itself, so
        // that squared Euclidean distance in the scaled space equals
        // sum_i w_i*(x_i-y_i)^2 in the original space. Skipping the
        // sqrt here would square the decay instead of applying it once.
        let past_weights: Vec<f64> = past_decay_weights(
            config.lightcone.past_depth,
            config.lightcone.c,
            config.past_decay,
            config.decay_mode,
        )
        .into_iter()
        .map(f64::sqrt)
        .collect();
        let future_weights: Vec<f64> = future_decay_weights(
            config.lightcone.future_depth,
            config.lightcone.c,
            config.future_decay,
            config.decay_mode,
        )
        .into_iter()
        .map(f64::sqrt)
        .collect();
        plcs.scale_columns(&past_weights)?;
        if flcs.cols() > 0 {
            flcs.scale_columns(&future_weights)?;
        }

        self.config = Some(config);
        self.shape = Some(shape);
        self.plcs = Some(plcs);
        self.flcs = Some(flcs);
        Ok(())
    }

    /// Stage C: clusters the past and future lightcone matrices
    /// independently. Releases `plcs`/`flcs` once clustering has
    /// consumed them.
    pub fn kmeans_lightcones<C: Collective>(&mut self, collective: &C) -> Result<(), ReconError> {
        let config = self.require_config()?;
        let plcs = self.plcs.take().ok_or_else(|| {
            ReconError::OrderViolation("extract must run before kmeans_lightcones".to_string())
        })?;
        let flcs = self.flcs.take().ok_or_else(|| {
            ReconError::OrderViolation("extract must run before kmeans_lightcones".to_string())
        })?;

        let (_, past_labels) = KMeansAssigner::fit(&plcs, config.past_kmeans)?;
        collective.barrier()?;
        let (_, future_labels) = KMeansAssigner::fit(&flcs, config.future_kmeans)?;
        collective.barrier()?;

        self.past_labels = Some(past_labels);
        self.future_labels = Some(future_labels);
        Ok(())
    }

    /// Stage D: builds the local (past, future) contingency table.
    /// Releases `future_labels`, which no later stage needs.
    pub fn joint_count(&mut self) -> Result<(), ReconError> {
        let config = self.require_config()?;
        let past_labels = self.past_labels.as_ref().ok_or_else(|| {
            ReconError::OrderViolation("kmeans_lightcones must run before joint_count".to_string())
        })?;
        let future_labels = self.future_labels.take().ok_or_else(|| {
            ReconError::OrderViolation("kmeans_lightcones must run before joint_count".to_string())
        })?;

        let table = JointCounter::count(
            past_labels,
            &future_labels,
            config.past_kmeans.k,
            config.future_kmeans.k,
        )?;
        self.contingency = Some(table);
        Ok(())
    }

    /// Distributed collective step: sum-reduces the local contingency
    /// table across every rank. A single-node run may call this too --
    /// [`crate::collective::SingleNodeCollective`] makes it a no-op.
    pub fn allreduce<C: Collective>(&mut self, collective: &C) -> Result<(), ReconError> {
        let table = self.contingency.as_mut().ok_or_else(|| {
            ReconError::OrderViolation("joint_count must run before allreduce".to_string())
        })?;
        collective.allreduce_sum_u64(table)
    }

    /// Stage E: agglomerates past clusters into causal states from the
    /// (possibly allreduced) contingency table. Consumes `contingency`
    /// by moving it out, so it can't be reused by a later call.
    pub fn reconstruct_states<M: MorphComparator>(
        &mut self,
        comparator: &M,
    ) -> Result<(), ReconError> {
        let config = self.require_config()?;
        let table = self.contingency.take().ok_or_else(|| {
            ReconError::OrderViolation("joint_count must run before reconstruct_states".to_string())
        })?;

        let (states, state_map) = MorphAgglomerator::agglomerate(&table, comparator, config.morph)?;
        self.states = Some(states);
        self.state_map = Some(state_map);
        Ok(())
    }

    /// Stage F: projects the past-cluster labels, through the
    /// agglomerated state map, back onto the spacetime lattice.
    pub fn causal_filter(&mut self) -> Result<Field, ReconError> {
        let config = self.require_config()?;
        let shape = self.shape.ok_or_else(|| {
            ReconError::OrderViolation("extract must run before causal_filter".to_string())
        })?;
        let past_labels = self.past_labels.as_ref().ok_or_else(|| {
            ReconError::OrderViolation("kmeans_lightcones must run before causal_filter".to_string())
        })?;
        let state_map = self.state_map.as_ref().ok_or_else(|| {
            ReconError::OrderViolation(
                "reconstruct_states must run before causal_filter".to_string(),
            )
        })?;

        crate::filter::CausalFilter::apply(
            past_labels,
            state_map,
            shape,
            config.lightcone,
            config.boundary,
            config.pad_temporal,
        )
    }

    /// The causal states produced by [`Pipeline::reconstruct_states`],
    /// once it has run.
    pub fn states(&self) -> Option<&[CausalState]> {
        self.states.as_deref()
    }

    /// The past-cluster -> causal-state map `M` produced by
    /// [`Pipeline::reconstruct_states`], once it has run -- the other
    /// diagnostic side output §6 External Interfaces lists alongside
    /// [`Pipeline::states`].
    pub fn state_map(&self) -> Option<&[usize]> {
        self.state_map.as_deref()
    }

    fn require_config(&self) -> Result<PipelineConfig, ReconError> {
        self.config
            .ok_or_else(|| ReconError::OrderViolation("extract must run first".to_string()))
    }
}
