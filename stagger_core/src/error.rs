// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.
//!
//! Runtime conditions (missing hardware hints, an unavailable intersection
//! primitive, an unbound container) are degraded modes and never surface as
//! errors. Only malformed configuration is rejected.

use alloc::string::String;

/// Errors raised while parsing or validating configuration.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The animation kind name is not one of `fade-in`, `slide-in`, `scale-in`.
    #[error("unknown animation kind: {0}")]
    UnknownAnimationKind(String),

    /// The easing identifier is not a known named curve or `cubic-bezier(...)`.
    #[error("unknown easing curve: {0}")]
    UnknownEasing(String),

    /// A `cubic-bezier(...)` easing has the wrong arity or non-numeric points.
    #[error("malformed cubic-bezier easing: {0}")]
    MalformedCubicBezier(String),

    /// Cubic-bezier x control points must lie in `0..=1`.
    #[error("cubic-bezier x control point {0} outside 0..=1")]
    CubicBezierOutOfRange(f64),

    /// Intersection thresholds must lie in `0..=1`.
    #[error("intersection threshold {0} outside 0..=1")]
    ThresholdOutOfRange(f64),

    /// An explicit batch size override of zero.
    #[error("batch size must be at least 1")]
    ZeroBatchSize,

    /// A `max_concurrent` cap of zero.
    #[error("max_concurrent must be at least 1")]
    ZeroMaxConcurrent,

    /// The pinch distance threshold must be finite and non-negative.
    #[error("pinch threshold must be a finite, non-negative distance, got {0}")]
    InvalidPinchThreshold(f64),

    /// A zoom frame-time sample window of zero.
    #[error("zoom sample window must hold at least 1 frame")]
    ZeroSampleWindow,
}
