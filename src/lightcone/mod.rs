/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

mod geometry;

pub use geometry::{
    future_decay_weights, future_lightcone_size, past_decay_weights, past_lightcone_size,
};
