/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! Convenience re-export of the crate's public surface, for callers who
//! don't want to spell out every submodule path.

pub use crate::collective::{Collective, SingleNodeCollective};
pub use crate::errors::ReconError;
pub use crate::extractor::{Extractor, LightconeParams};
pub use crate::filter::CausalFilter;
pub use crate::joint::{ContingencyTable, JointCounter};
pub use crate::kmeans::{KMeansAssigner, KMeansParams};
pub use crate::lightcone::{
    future_decay_weights, future_lightcone_size, past_decay_weights, past_lightcone_size,
};
pub use crate::morph::{CausalState, ChiSquareComparator, MorphAgglomerator, MorphComparator, MorphParams};
pub use crate::pipeline::{Pipeline, PipelineConfig};
pub use crate::types::{AdjustedShape, Boundary, DecayMode, Field, InitMethod, LightconeMatrix};
