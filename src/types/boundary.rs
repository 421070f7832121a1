/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

/// Spatial boundary handling for the Extractor and CausalFilter.
///
/// The temporal axis is never wrapped, regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// No spatial wrap-around. The extractor leaves a spatial margin of
    /// `max(P,F)*c` on each side where lightcones would overrun the
    /// field; those cells receive no lightcone rows.
    Open,
    /// Spatial axes wrap. The field is wrap-padded by `max(P,F)*c` on
    /// each spatial side before extraction, so every original spatial
    /// cell is interior.
    Periodic,
}
