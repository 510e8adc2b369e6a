// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Histogram equalization of real-valued sample arrays.

use ndarray::{Array, Dimension};

/// Number of histogram bins used by [`equalize`].
pub const DEFAULT_BINS: usize = 256;

/// Equalize with [`DEFAULT_BINS`] bins. See [`equalize_with_bins`].
pub fn equalize<D: Dimension>(values: &Array<f64, D>) -> Array<f64, D> {
    equalize_with_bins(values, DEFAULT_BINS)
}

/// Map every sample through the normalized cumulative histogram.
///
/// The histogram spans `[min, max]` of the finite samples with `bins` equal
/// bins. Each value is looked up by linear interpolation between bin
/// centers, so the output lies in [0, 1] and preserves sample ordering. A
/// constant input maps to 0.5 everywhere.
pub fn equalize_with_bins<D: Dimension>(values: &Array<f64, D>, bins: usize) -> Array<f64, D> {
    let bins = bins.max(1);
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if min >= max {
        return values.mapv(|_| 0.5);
    }

    let width = (max - min) / bins as f64;
    let bin_of = |v: f64| (((v - min) / width) as usize).min(bins - 1);

    let mut histogram = vec![0u64; bins];
    for &v in values.iter().filter(|v| v.is_finite()) {
        histogram[bin_of(v)] += 1;
    }

    let total: u64 = histogram.iter().sum();
    let mut running = 0u64;
    let cdf: Vec<f64> = histogram
        .iter()
        .map(|&count| {
            running += count;
            running as f64 / total as f64
        })
        .collect();

    let first_center = min + width / 2.0;
    values.mapv(|v| {
        if !v.is_finite() {
            return v;
        }
        let position = (v - first_center) / width;
        if position <= 0.0 {
            return cdf[0];
        }
        let lower = position.floor() as usize;
        if lower >= bins - 1 {
            return cdf[bins - 1];
        }
        let t = position - lower as f64;
        cdf[lower] + t * (cdf[lower + 1] - cdf[lower])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array3};

    #[test]
    fn output_spans_unit_interval() {
        let values = Array1::from_iter((0..1000).map(|i| (i * 7919 % 1000) as f64 * 0.1 - 7.0));
        let eq = equalize(&values);
        let lo = eq.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = eq.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(lo >= 0.0 && lo < 0.01, "min {lo}");
        assert_eq!(hi, 1.0);
    }

    #[test]
    fn ordering_is_preserved() {
        let values = Array1::from(vec![5.0, -2.0, 100.0, 7.5, 7.5, 0.0]);
        let eq = equalize(&values);
        for i in 0..values.len() {
            for j in 0..values.len() {
                if values[i] < values[j] {
                    assert!(eq[i] <= eq[j]);
                }
            }
        }
        assert_eq!(eq[3], eq[4]);
    }

    #[test]
    fn skewed_distribution_is_spread_out() {
        // 90% of samples crowd the bottom of the range.
        let values = Array1::from_iter((0..100).map(|i| if i < 90 { i as f64 * 0.01 } else { 100.0 }));
        let eq = equalize(&values);
        // The crowded samples now occupy most of [0, 1].
        assert!(eq[89] > 0.85, "got {}", eq[89]);
    }

    #[test]
    fn constant_input_maps_to_half() {
        let values = Array3::<f64>::from_elem((2, 3, 3), 42.0);
        let eq = equalize(&values);
        assert!(eq.iter().all(|&v| v == 0.5));
        assert_eq!(eq.dim(), (2, 3, 3));
    }
}
