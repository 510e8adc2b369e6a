// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Radial Butterworth masks over a centered spectrum.

use ndarray::Array2;
use spektral_core::error::{Result, SpektralError};
use spektral_core::types::FilterSpec;

use crate::FilterMask;

/// Distance of every bin from the centered DC bin.
///
/// Coordinates are `i - rows / 2` and `j - cols / 2`, spanning
/// `[-0.5, 0.5) * dimension`, so `r == 0` exactly where [`crate::forward`]
/// puts the zero frequency.
pub fn radius_grid(rows: usize, cols: usize) -> Array2<f64> {
    let (cy, cx) = ((rows / 2) as f64, (cols / 2) as f64);
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        let y = i as f64 - cy;
        let x = j as f64 - cx;
        (x * x + y * y).sqrt()
    })
}

/// Butterworth lowpass response `1 / (1 + (r/f)^(2n))` at radius `r`.
///
/// The DC bin always passes. With `cutoff == 0` every other bin is
/// rejected. The sign of `cutoff` is irrelevant.
pub fn butterworth(radius: f64, cutoff: f64, order: u32) -> f64 {
    if radius == 0.0 {
        return 1.0;
    }
    let cutoff = cutoff.abs();
    if cutoff == 0.0 {
        return 0.0;
    }
    1.0 / (1.0 + (radius / cutoff).powf(2.0 * f64::from(order)))
}

/// Lowpass mask of the given shape.
pub fn lowpass_mask(rows: usize, cols: usize, cutoff: f64, order: u32) -> Result<FilterMask> {
    check_lowpass(cutoff, order)?;
    Ok(radius_grid(rows, cols).mapv(|r| butterworth(r, cutoff, order)))
}

/// `1 - lowpass`. Highpass filtering itself subtracts in the image domain;
/// this mask is only used to show the equivalent response.
pub fn highpass_mask(rows: usize, cols: usize, cutoff: f64, order: u32) -> Result<FilterMask> {
    Ok(lowpass_mask(rows, cols, cutoff, order)?.mapv(|m| 1.0 - m))
}

/// Frequency response equivalent to the composed filter, for display.
pub fn response_mask(spec: &FilterSpec, rows: usize, cols: usize) -> Result<FilterMask> {
    spec.validate()?;
    let mask = match *spec {
        FilterSpec::Lowpass { cutoff, order } => lowpass_mask(rows, cols, cutoff, order)?,
        FilterSpec::Highpass { cutoff, order } => highpass_mask(rows, cols, cutoff, order)?,
        FilterSpec::Bandpass {
            cutin,
            cutoff,
            order,
        } => lowpass_mask(rows, cols, cutoff, order)? - lowpass_mask(rows, cols, cutin, order)?,
        FilterSpec::Notch {
            center,
            band,
            order,
        } => {
            let below = lowpass_mask(rows, cols, center - band / 2.0, order)?;
            let above = highpass_mask(rows, cols, center + band / 2.0, order)?;
            below + above
        }
    };
    Ok(mask)
}

fn check_lowpass(cutoff: f64, order: u32) -> Result<()> {
    if order == 0 {
        return Err(SpektralError::invalid_parameter(
            "Butterworth order must be at least 1",
        ));
    }
    if !cutoff.is_finite() {
        return Err(SpektralError::invalid_parameter(format!(
            "cutoff must be finite, got {cutoff}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_zero_at_center() {
        let grid = radius_grid(6, 7);
        assert_eq!(grid[[3, 3]], 0.0);
        assert_eq!(grid[[3, 4]], 1.0);
        assert_eq!(grid[[0, 3]], 3.0);
    }

    #[test]
    fn lowpass_is_monotone_in_radius() {
        let rows = 32;
        let cols = 24;
        let mask = lowpass_mask(rows, cols, 6.0, 3).unwrap();
        let radii = radius_grid(rows, cols);
        let mut samples: Vec<(f64, f64)> = radii.iter().copied().zip(mask.iter().copied()).collect();
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in samples.windows(2) {
            assert!(pair[1].1 <= pair[0].1, "mask rises between r={} and r={}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn values_stay_in_unit_interval() {
        let mask = lowpass_mask(16, 16, 4.0, 2).unwrap();
        assert!(mask.iter().all(|&m| (0.0..=1.0).contains(&m)));
        assert!((butterworth(4.0, 4.0, 2) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_cutoff_keeps_only_center() {
        let mask = lowpass_mask(5, 5, 0.0, 1).unwrap();
        for ((i, j), &m) in mask.indexed_iter() {
            let expected = if (i, j) == (2, 2) { 1.0 } else { 0.0 };
            assert_eq!(m, expected);
        }
    }

    #[test]
    fn higher_order_is_steeper() {
        let gentle = butterworth(8.0, 5.0, 1);
        let steep = butterworth(8.0, 5.0, 6);
        assert!(steep < gentle);
        let gentle = butterworth(3.0, 5.0, 1);
        let steep = butterworth(3.0, 5.0, 6);
        assert!(steep > gentle);
    }

    #[test]
    fn negative_cutoff_acts_like_its_magnitude() {
        assert_eq!(butterworth(3.0, -2.0, 2), butterworth(3.0, 2.0, 2));
    }

    #[test]
    fn zero_order_is_rejected() {
        assert!(lowpass_mask(4, 4, 2.0, 0).is_err());
    }

    #[test]
    fn bandpass_response_peaks_inside_band() {
        let mask = response_mask(&FilterSpec::bandpass(3.0, 12.0, 4), 32, 32).unwrap();
        let center = mask[[16, 16]];
        let inside = mask[[16, 16 + 7]];
        let outside = mask[[16, 16 + 15]];
        assert!(center.abs() < 1e-12);
        assert!(inside > 0.9);
        assert!(outside < 0.2);
    }

    #[test]
    fn notch_response_dips_inside_band() {
        let mask = response_mask(&FilterSpec::notch(8.0, 4.0, 8), 32, 32).unwrap();
        assert!(mask[[16, 16 + 8]] < 0.1);
        assert!(mask[[16, 16]] > 0.99);
        assert!(mask[[16, 16 + 15]] > 0.9);
    }
}
