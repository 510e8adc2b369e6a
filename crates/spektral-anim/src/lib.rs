// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// spektral-anim — Parameter sweeps and their output.
//
// Drives the filter engine over an ordered sequence of parameter values,
// loads and saves still images, and streams sweep frames into animated GIFs.

pub mod codec;
pub mod gif;
pub mod sweep;

pub use codec::{load, save};
pub use gif::{AnimationEncoder, GifAnimationWriter, encode_animation};
pub use sweep::{frames, sweep, sweep_parallel, sweep_to_file};
