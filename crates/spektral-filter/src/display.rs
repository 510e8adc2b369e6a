// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Optional inspection sinks for intermediate arrays. The pipeline never
// depends on what a sink does with the data.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{DynamicImage, GrayImage, Luma};
use ndarray::{ArrayView2, ArrayView3, Axis};
use spektral_core::error::{Result, SpektralError};
use tracing::{debug, warn};

use crate::channels::quantize;

/// Pipeline stage an inspected array comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The frequency response of the filter being applied.
    Mask,
    /// Log-magnitude of one channel's centered spectrum (plane 0..3 = R, G, B).
    Spectrum(usize),
    /// Log-magnitude of that spectrum after masking.
    MaskedSpectrum(usize),
    /// The filtered image.
    Result,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Mask => f.write_str("mask"),
            Stage::Spectrum(plane) => write!(f, "spectrum_{}", plane_name(*plane)),
            Stage::MaskedSpectrum(plane) => write!(f, "masked_{}", plane_name(*plane)),
            Stage::Result => f.write_str("result"),
        }
    }
}

fn plane_name(plane: usize) -> &'static str {
    match plane {
        0 => "red",
        1 => "green",
        2 => "blue",
        _ => "plane",
    }
}

/// Receives intermediate arrays for inspection.
///
/// Sinks must not fail the pipeline: errors are theirs to log.
pub trait DisplaySink: Send + Sync {
    /// Whether the engine should bother computing arrays for this sink.
    fn enabled(&self) -> bool {
        true
    }

    /// Inspect a single-plane array.
    fn show(&self, stage: Stage, data: ArrayView2<'_, f64>);

    /// Inspect a (rows, columns, 3) array. Defaults to the plane average.
    fn show_planes(&self, stage: Stage, data: ArrayView3<'_, f64>) {
        if let Some(mean) = data.mean_axis(Axis(2)) {
            self.show(stage, mean.view());
        }
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn enabled(&self) -> bool {
        false
    }

    fn show(&self, _stage: Stage, _data: ArrayView2<'_, f64>) {}
}

/// Writes every array as a min/max-normalized PNG into a directory.
///
/// Files are named `NNNN_<stage>.png` with a running counter, so the
/// directory listing follows pipeline order.
#[derive(Debug)]
pub struct PngDumpSink {
    dir: PathBuf,
    counter: AtomicUsize,
}

impl PngDumpSink {
    /// Create the sink, creating `dir` if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        std::fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            counter: AtomicUsize::new(0),
        })
    }

    fn next_path(&self, stage: Stage) -> PathBuf {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!("{n:04}_{stage}.png"))
    }

    fn save(&self, stage: Stage, image: Result<DynamicImage>) {
        let path = self.next_path(stage);
        let outcome = image.and_then(|img| {
            img.save(&path)
                .map_err(|err| SpektralError::Image(format!("{}: {err}", path.display())))
        });
        match outcome {
            Ok(()) => debug!(path = %path.display(), %stage, "Debug image written"),
            Err(err) => warn!(error = %err, %stage, "Failed to write debug image"),
        }
    }
}

impl DisplaySink for PngDumpSink {
    fn show(&self, stage: Stage, data: ArrayView2<'_, f64>) {
        let (lo, scale) = normalization(data.iter().copied());
        let (rows, cols) = data.dim();
        let image = match (u32::try_from(cols), u32::try_from(rows)) {
            (Ok(width), Ok(height)) => Ok(GrayImage::from_fn(width, height, |x, y| {
                let v = (data[[y as usize, x as usize]] - lo) * scale;
                Luma([v.round().clamp(0.0, 255.0) as u8])
            })),
            _ => Err(SpektralError::InvalidDimensions(format!("{rows}x{cols}"))),
        };
        self.save(stage, image.map(DynamicImage::from));
    }

    fn show_planes(&self, stage: Stage, data: ArrayView3<'_, f64>) {
        let (lo, scale) = normalization(data.iter().copied());
        let shifted = data.mapv(|v| (v - lo) * scale);
        let image = quantize(shifted.view(), 1.0);
        self.save(stage, image.map(DynamicImage::from));
    }
}

/// Offset and factor mapping the finite range of `values` onto [0, 255].
fn normalization(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo < hi {
        (lo, 255.0 / (hi - lo))
    } else if lo.is_finite() {
        (lo, 0.0)
    } else {
        (0.0, 0.0)
    }
}
