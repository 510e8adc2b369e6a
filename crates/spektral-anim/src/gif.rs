// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Animated GIF output. Frames are streamed into the encoder one at a time
// so a long sweep never has to sit in memory as a whole.

use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, RgbImage};
use spektral_core::config::AnimationOptions;
use spektral_core::error::{Result, SpektralError};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

/// NeuQuant sampling factor handed to the GIF encoder (1 = best, 30 = fastest).
const QUANTIZER_SPEED: i32 = 10;

/// Consumes an ordered frame sequence and produces an animation.
pub trait AnimationEncoder {
    /// Encode every frame in order. Returns the number of frames written.
    ///
    /// The first `Err` in `frames` aborts encoding and is returned as-is.
    fn encode<I>(&mut self, frames: I, options: &AnimationOptions) -> Result<usize>
    where
        I: IntoIterator<Item = Result<RgbImage>>;
}

/// Writes infinitely looping GIFs with a uniform frame delay.
pub struct GifAnimationWriter<W: Write> {
    writer: W,
}

impl GifAnimationWriter<BufWriter<NamedTempFile>> {
    /// Write into a temporary file in the directory of `path`.
    ///
    /// Nothing appears at `path` until [`Self::persist`] is called; dropping
    /// the writer removes the temporary file.
    pub fn staged(path: &Path) -> Result<Self> {
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        Ok(Self::new(BufWriter::new(NamedTempFile::new_in(dir)?)))
    }

    /// Move the finished animation to `path`, replacing any existing file.
    pub fn persist(self, path: &Path) -> Result<()> {
        let staged = self.writer.into_inner().map_err(|err| err.into_error())?;
        staged.persist(path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl<W: Write> GifAnimationWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> AnimationEncoder for GifAnimationWriter<W> {
    #[instrument(skip_all, fields(fps = options.fps))]
    fn encode<I>(&mut self, frames: I, options: &AnimationOptions) -> Result<usize>
    where
        I: IntoIterator<Item = Result<RgbImage>>,
    {
        options.validate()?;
        let (numer, denom) = options.frame_delay_ms();
        let delay = Delay::from_numer_denom_ms(numer, denom);

        let written = {
            let mut encoder = GifEncoder::new_with_speed(&mut self.writer, QUANTIZER_SPEED);
            encoder.set_repeat(Repeat::Infinite).map_err(gif_error)?;

            let mut written = 0usize;
            for frame in frames {
                let rgba = DynamicImage::ImageRgb8(frame?).into_rgba8();
                encoder
                    .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
                    .map_err(gif_error)?;
                written += 1;
                debug!(frame = written, "Frame encoded");
            }
            written
        };

        if written == 0 {
            return Err(SpektralError::Animation(
                "an animation needs at least one frame".into(),
            ));
        }
        self.writer.flush()?;
        info!(frames = written, "Animation written");
        Ok(written)
    }
}

/// Encode `frames` into a looping GIF at `path`.
///
/// `path` is only written once every frame has been encoded. On failure it
/// is left as it was.
#[instrument(skip(frames, path), fields(path = %path.as_ref().display()))]
pub fn encode_animation<I>(frames: I, path: impl AsRef<Path>, options: &AnimationOptions) -> Result<usize>
where
    I: IntoIterator<Item = Result<RgbImage>>,
{
    let path = path.as_ref();
    let mut writer = GifAnimationWriter::staged(path)?;
    let written = writer.encode(frames, options)?;
    writer.persist(path)?;
    Ok(written)
}

fn gif_error(err: image::ImageError) -> SpektralError {
    SpektralError::Animation(err.to_string())
}
