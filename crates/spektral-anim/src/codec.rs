// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Still-image codec — decodes any format the `image` crate supports into
// 8-bit RGB and writes RGB images back out.

use std::path::Path;

use image::{DynamicImage, RgbImage};
use spektral_core::error::{Result, SpektralError};
use tracing::{debug, info, instrument};

/// Load an image file as 8-bit RGB.
///
/// Alpha is dropped. Floating-point sources are scaled from [0, 1] to
/// [0, 255]; 16-bit sources are reduced to 8 bits.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<RgbImage> {
    let img = image::open(path.as_ref()).map_err(|err| {
        SpektralError::Image(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    info!(
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "Image loaded"
    );
    Ok(to_rgb8(&img))
}

/// Decode an in-memory encoded image (JPEG, PNG, etc.) as 8-bit RGB.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn load_from_memory(data: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(data)
        .map_err(|err| SpektralError::Image(format!("failed to decode image: {}", err)))?;
    debug!(
        width = img.width(),
        height = img.height(),
        "Image decoded from bytes"
    );
    Ok(to_rgb8(&img))
}

/// Convert any decoded layout to 8-bit RGB.
///
/// Float samples in [0, 1] map to [0, 255] and are clamped outside it;
/// 16-bit samples keep their high byte; alpha is dropped.
pub fn to_rgb8(image: &DynamicImage) -> RgbImage {
    image.to_rgb8()
}

/// Write an image. The format is inferred from the file extension.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn save(image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    image.save(path.as_ref()).map_err(|err| {
        SpektralError::Image(format!(
            "failed to save image to {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    debug!("Image saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgb32FImage, Rgba, RgbaImage};

    #[test]
    fn png_round_trip_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("still.png");
        let image = RgbImage::from_fn(5, 3, |x, y| Rgb([x as u8 * 40, y as u8 * 80, 7]));
        save(&image, &path).unwrap();
        assert_eq!(load(&path).unwrap(), image);
    }

    #[test]
    fn alpha_is_dropped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.png");
        RgbaImage::from_pixel(2, 2, Rgba([9, 8, 7, 10])).save(&path).unwrap();
        let image = load(&path).unwrap();
        assert_eq!(image.get_pixel(1, 1), &Rgb([9, 8, 7]));
    }

    #[test]
    fn float_sources_are_scaled_to_bytes() {
        let float = Rgb32FImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb([1.0, 0.0, 0.5]) } else { Rgb([1.5, -0.25, 0.25]) }
        });
        let image = to_rgb8(&DynamicImage::ImageRgb32F(float));
        let px = image.get_pixel(0, 0);
        assert_eq!(px[0], 255);
        assert_eq!(px[1], 0);
        assert!((127..=128).contains(&px[2]), "got {}", px[2]);
        assert_eq!(image.get_pixel(1, 0)[0], 255);
        assert_eq!(image.get_pixel(1, 0)[1], 0);
    }

    #[test]
    fn float_exr_file_loads_scaled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("float.exr");
        DynamicImage::ImageRgb32F(Rgb32FImage::from_pixel(3, 2, Rgb([1.0, 0.0, 1.0])))
            .save(&path)
            .unwrap();
        let image = load(&path).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1), &Rgb([255, 0, 255]));
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let err = load("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, SpektralError::Image(_)));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(load_from_memory(b"not an image").is_err());
    }
}
