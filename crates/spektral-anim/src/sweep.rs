// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sweep driver — renders one frame per parameter value, in the order the
// values were given.

use std::path::Path;

use image::RgbImage;
use rayon::prelude::*;
use spektral_core::config::AnimationOptions;
use spektral_core::error::Result;
use spektral_core::types::SweepSpec;
use spektral_filter::FilterEngine;
use tracing::{debug, info, instrument};

use crate::gif::encode_animation;

/// Lazily render the frames of `sweep`.
///
/// Every parameter value is validated before the first frame is rendered,
/// so an invalid value anywhere in the list fails here rather than halfway
/// through an animation.
pub fn frames<'a>(
    engine: &'a FilterEngine,
    image: &'a RgbImage,
    sweep: &SweepSpec,
) -> Result<impl Iterator<Item = Result<RgbImage>> + 'a> {
    let specs = sweep.specs()?;
    let total = specs.len();
    Ok(specs.into_iter().enumerate().map(move |(index, spec)| {
        debug!(frame = index + 1, total, %spec, "Rendering frame");
        engine.render(image, &spec)
    }))
}

/// Render every frame of `sweep` sequentially.
#[instrument(skip(engine, image), fields(vary = %sweep.vary, frames = sweep.values.len()))]
pub fn sweep(engine: &FilterEngine, image: &RgbImage, sweep: &SweepSpec) -> Result<Vec<RgbImage>> {
    frames(engine, image, sweep)?.collect()
}

/// Render every frame of `sweep` on the rayon pool.
///
/// Frames are independent, so they may be computed in any order; the
/// returned vector is still in value order.
#[instrument(skip(engine, image), fields(vary = %sweep.vary, frames = sweep.values.len()))]
pub fn sweep_parallel(
    engine: &FilterEngine,
    image: &RgbImage,
    sweep: &SweepSpec,
) -> Result<Vec<RgbImage>> {
    let specs = sweep.specs()?;
    let rendered: Result<Vec<RgbImage>> = specs
        .par_iter()
        .map(|spec| engine.render(image, spec))
        .collect();
    let rendered = rendered?;
    info!(frames = rendered.len(), "Parallel sweep complete");
    Ok(rendered)
}

/// Render `sweep` and write it as a looping GIF at `path`.
///
/// The sequential path streams frames straight into the encoder. The
/// parallel path renders all frames first and then encodes them.
#[instrument(skip(engine, image, sweep, path), fields(path = %path.as_ref().display()))]
pub fn sweep_to_file(
    engine: &FilterEngine,
    image: &RgbImage,
    sweep: &SweepSpec,
    path: impl AsRef<Path>,
    options: &AnimationOptions,
    parallel: bool,
) -> Result<usize> {
    options.validate()?;
    if parallel {
        let rendered = sweep_parallel(engine, image, sweep)?;
        encode_animation(rendered.into_iter().map(Ok), path, options)
    } else {
        encode_animation(frames(engine, image, sweep)?, path, options)
    }
}
