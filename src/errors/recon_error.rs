/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use std::error::Error;
use std::fmt;

/// Single error type for the whole reconstruction pipeline.
///
/// Every stage (geometry, extraction, clustering, joint counting,
/// agglomeration, filtering, and the pipeline facade itself) reports its
/// failures through this enum. There is no retry logic anywhere in the
/// core: any `ReconError` is fatal to the current pipeline invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconError {
    /// Field is not rank-3, or the interior region implied by the
    /// lightcone depths and boundary mode is non-positive.
    InvalidShape(String),
    /// Unknown boundary condition string/value.
    InvalidBoundary(String),
    /// Unknown decay mode string/value.
    InvalidDecayMode(String),
    /// `K < 1` or `K > N` for a clustering call.
    BadK(String),
    /// A pipeline stage was invoked before its predecessor populated the
    /// buffer it depends on.
    OrderViolation(String),
    /// K-means initialization could not produce distinct centroids, or a
    /// statistical comparator hit an unrecoverable numeric failure.
    NumericFailure(String),
    /// The collective (barrier / allreduce) backend reported an error.
    CollectiveFailure(String),
    /// Zero rows were given to a clustering call.
    EmptyInput,
    /// Zero past clusters were given to the agglomerator.
    EmptyTable,
}

impl Error for ReconError {}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconError::InvalidShape(msg) => write!(f, "ReconError: invalid shape: {msg}"),
            ReconError::InvalidBoundary(msg) => write!(f, "ReconError: invalid boundary: {msg}"),
            ReconError::InvalidDecayMode(msg) => {
                write!(f, "ReconError: invalid decay mode: {msg}")
            }
            ReconError::BadK(msg) => write!(f, "ReconError: invalid K: {msg}"),
            ReconError::OrderViolation(msg) => write!(f, "ReconError: order violation: {msg}"),
            ReconError::NumericFailure(msg) => write!(f, "ReconError: numeric failure: {msg}"),
            ReconError::CollectiveFailure(msg) => {
                write!(f, "ReconError: collective failure: {msg}")
            }
            ReconError::EmptyInput => write!(f, "ReconError: empty input: zero rows"),
            ReconError::EmptyTable => write!(f, "ReconError: empty table: zero past clusters"),
        }
    }
}
