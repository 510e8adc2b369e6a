// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Forward and inverse 2D DFT with the zero-frequency bin moved to the array
// center.

use ndarray::Array2;
use num_complex::Complex64;
use rustfft::FftPlanner;
use spektral_core::error::{PrecisionWarning, Result, SpektralError};
use tracing::{debug, warn};

use crate::{Channel, Spectrum};

/// Transform a channel and center its DC component at `(rows / 2, cols / 2)`.
pub fn forward(channel: &Channel) -> Result<Spectrum> {
    let (rows, cols) = channel.dim();
    let mut work: Vec<Complex64> = channel.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    fft2_in_place(&mut work, cols, rows, false)?;
    let spectrum = into_array(work, rows, cols)?;
    Ok(fftshift(&spectrum))
}

/// Undo the centering, inverse-transform, and keep the real part.
///
/// A residual imaginary part above `tolerance` is logged as a precision
/// warning; the real part is returned either way.
pub fn inverse(spectrum: &Spectrum, tolerance: f64) -> Result<Channel> {
    inverse_checked(spectrum, tolerance).map(|(channel, _)| channel)
}

/// Like [`inverse`], but also hands back the precision warning, if any.
pub fn inverse_checked(
    spectrum: &Spectrum,
    tolerance: f64,
) -> Result<(Channel, Option<PrecisionWarning>)> {
    let (rows, cols) = spectrum.dim();
    let mut work: Vec<Complex64> = ifftshift(spectrum).iter().copied().collect();
    fft2_in_place(&mut work, cols, rows, true)?;

    let max_residual = work.iter().fold(0.0f64, |acc, z| acc.max(z.im.abs()));
    let warning = if max_residual > tolerance {
        let warning = PrecisionWarning {
            max_residual,
            tolerance,
        };
        warn!(max_residual, tolerance, "{warning}");
        Some(warning)
    } else {
        debug!(max_residual, "inverse transform residual within tolerance");
        None
    };

    let real = work.into_iter().map(|z| z.re).collect();
    Ok((into_array(real, rows, cols)?, warning))
}

/// Cyclically shift so index 0 lands at `n / 2` on both axes.
pub fn fftshift<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (rows, cols) = data.dim();
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        data[[(i + rows - rows / 2) % rows, (j + cols - cols / 2) % cols]].clone()
    })
}

/// Inverse of [`fftshift`], also for odd sizes.
pub fn ifftshift<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (rows, cols) = data.dim();
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        data[[(i + rows / 2) % rows, (j + cols / 2) % cols]].clone()
    })
}

/// Log-magnitude of a spectrum, for display.
pub fn log_magnitude(spectrum: &Spectrum) -> Array2<f64> {
    spectrum.mapv(|z| z.norm().ln_1p())
}

fn into_array<T>(data: Vec<T>, rows: usize, cols: usize) -> Result<Array2<T>> {
    Array2::from_shape_vec((rows, cols), data)
        .map_err(|err| SpektralError::InvalidDimensions(format!("bad spectrum shape: {err}")))
}

/// Row-major 2D FFT: all rows, then all columns. The inverse is normalized
/// by `1 / (width * height)`.
fn fft2_in_place(data: &mut [Complex64], width: usize, height: usize, inverse: bool) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(SpektralError::InvalidDimensions(format!(
            "cannot transform a {height}x{width} channel"
        )));
    }
    let expected = width
        .checked_mul(height)
        .ok_or_else(|| SpektralError::InvalidDimensions("image size overflow".into()))?;
    if data.len() != expected {
        return Err(SpektralError::InvalidDimensions(format!(
            "working buffer holds {} samples, expected {expected}",
            data.len()
        )));
    }

    let mut planner = FftPlanner::<f64>::new();
    let (fft_w, fft_h) = if inverse {
        (planner.plan_fft_inverse(width), planner.plan_fft_inverse(height))
    } else {
        (planner.plan_fft_forward(width), planner.plan_fft_forward(height))
    };

    for row in data.chunks_exact_mut(width) {
        fft_w.process(row);
    }

    let mut column = vec![Complex64::new(0.0, 0.0); height];
    for x in 0..width {
        for (y, slot) in column.iter_mut().enumerate() {
            *slot = data[y * width + x];
        }
        fft_h.process(&mut column);
        for (y, value) in column.iter().enumerate() {
            data[y * width + x] = *value;
        }
    }

    if inverse {
        let norm = expected as f64;
        for v in data.iter_mut() {
            *v /= norm;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured(rows: usize, cols: usize) -> Channel {
        Channel::from_shape_fn((rows, cols), |(i, j)| {
            ((i * 37 + j * 11) % 256) as f64 + (i as f64 * 0.3).sin() * 20.0
        })
    }

    fn max_abs_diff(a: &Channel, b: &Channel) -> f64 {
        a.iter()
            .zip(b.iter())
            .fold(0.0, |acc, (x, y)| acc.max((x - y).abs()))
    }

    #[test]
    fn round_trip_even_and_odd_sizes() {
        for (rows, cols) in [(8, 8), (9, 7), (16, 5), (1, 12)] {
            let channel = textured(rows, cols);
            let spectrum = forward(&channel).unwrap();
            let (back, warning) = inverse_checked(&spectrum, 1e-6).unwrap();
            assert!(warning.is_none(), "{rows}x{cols}: {warning:?}");
            let diff = max_abs_diff(&channel, &back);
            assert!(diff < 1e-6 * 255.0, "{rows}x{cols}: diff {diff}");
        }
    }

    #[test]
    fn dc_component_sits_at_center() {
        let channel = Channel::from_elem((6, 5), 4.0);
        let spectrum = forward(&channel).unwrap();
        let dc = spectrum[[3, 2]];
        assert!((dc.re - 4.0 * 30.0).abs() < 1e-9);
        for ((i, j), z) in spectrum.indexed_iter() {
            if (i, j) != (3, 2) {
                assert!(z.norm() < 1e-9, "unexpected energy at ({i}, {j})");
            }
        }
    }

    #[test]
    fn shifts_are_inverse_of_each_other() {
        let data = Array2::from_shape_fn((5, 4), |(i, j)| i * 10 + j);
        assert_eq!(ifftshift(&fftshift(&data)), data);
        // Index 0 lands at n / 2.
        assert_eq!(fftshift(&data)[[2, 2]], 0);
    }

    #[test]
    fn residual_above_tolerance_is_reported() {
        // A purely imaginary DC term cannot come from a real channel.
        let mut spectrum = Spectrum::zeros((4, 4));
        spectrum[[2, 2]] = Complex64::new(0.0, 16.0);
        let (channel, warning) = inverse_checked(&spectrum, 1e-6).unwrap();
        let warning = warning.expect("warning expected");
        assert!((warning.max_residual - 1.0).abs() < 1e-12);
        assert!(channel.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn empty_channel_is_rejected() {
        let channel = Channel::zeros((0, 4));
        assert!(matches!(
            forward(&channel),
            Err(SpektralError::InvalidDimensions(_))
        ));
    }
}
