// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Spektral.

use thiserror::Error;

/// Top-level error type for all Spektral operations.
#[derive(Debug, Error)]
pub enum SpektralError {
    // -- Pipeline errors --
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("invalid filter parameter: {0}")]
    InvalidFilterParameter(String),

    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    // -- Codec errors --
    #[error("image codec failed: {0}")]
    Image(String),

    #[error("animation encoding failed: {0}")]
    Animation(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SpektralError {
    /// Shorthand for building an [`SpektralError::InvalidFilterParameter`].
    pub fn invalid_parameter(detail: impl Into<String>) -> Self {
        Self::InvalidFilterParameter(detail.into())
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SpektralError>;

/// Non-fatal report from the inverse transform.
///
/// The inverse of a real channel's spectrum should be real; when the largest
/// imaginary residual exceeds `tolerance` the real part is still used, and
/// this value is handed back so callers can surface it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecisionWarning {
    pub max_residual: f64,
    pub tolerance: f64,
}

impl std::fmt::Display for PrecisionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "inverse transform imaginary residual {:.3e} exceeds tolerance {:.3e}",
            self.max_residual, self.tolerance
        )
    }
}
