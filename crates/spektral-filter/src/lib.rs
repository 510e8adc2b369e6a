// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// spektral-filter — Frequency-domain Butterworth filtering for RGB images.
//
// Splits an image into channels, transforms each channel to a centered
// spectrum, multiplies it by a radial Butterworth mask, transforms back and
// recomposes the image, optionally histogram-equalizing the result.

pub mod channels;
pub mod display;
pub mod engine;
pub mod equalize;
pub mod mask;
pub mod spectrum;

use ndarray::Array2;
use num_complex::Complex64;

/// One real-valued color plane, shape (rows, columns).
pub type Channel = Array2<f64>;

/// Zero-frequency-centered 2D Fourier transform of a [`Channel`].
pub type Spectrum = Array2<Complex64>;

/// Radially symmetric real mask with values in [0, 1].
pub type FilterMask = Array2<f64>;

// Re-export the primary items so callers can use `spektral_filter::FilterEngine` etc.
pub use channels::{Channels, join, split};
pub use display::{DisplaySink, NullSink, PngDumpSink, Stage};
pub use engine::{FilterEngine, FilteredImage};
pub use equalize::equalize;
pub use mask::lowpass_mask;
pub use spectrum::{forward, inverse};
