// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine and animation configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpektralError};

/// Settings for the filter engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Histogram-equalize results before quantizing them to frames (default true).
    pub equalize: bool,
    /// Largest tolerated imaginary residual after the inverse transform
    /// before a precision warning is raised (default 1e-6).
    pub precision_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            equalize: true,
            precision_tolerance: 1e-6,
        }
    }
}

/// Settings handed to the animation encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    /// Playback rate in frames per second (default 10).
    pub fps: u32,
}

impl AnimationOptions {
    pub fn with_fps(fps: u32) -> Self {
        Self { fps }
    }

    /// Reject a zero frame rate.
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(SpektralError::invalid_parameter("fps must be at least 1"));
        }
        Ok(())
    }

    /// Delay between consecutive frames in milliseconds, as a fraction.
    pub fn frame_delay_ms(&self) -> (u32, u32) {
        (1000, self.fps.max(1))
    }
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self { fps: 10 }
    }
}
