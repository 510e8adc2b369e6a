// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Channel splitting and recomposition. Channel order is R, G, B everywhere.

use image::{DynamicImage, Rgb, RgbImage};
use ndarray::{Array3, ArrayView3, Axis, Zip};
use spektral_core::error::{Result, SpektralError};

use crate::Channel;

/// The three color planes of an RGB image as real-valued arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct Channels {
    pub red: Channel,
    pub green: Channel,
    pub blue: Channel,
}

impl Channels {
    /// Shape shared by the three planes, as (rows, columns).
    pub fn dim(&self) -> (usize, usize) {
        self.red.dim()
    }

    /// Planes in R, G, B order.
    pub fn planes(&self) -> [&Channel; 3] {
        [&self.red, &self.green, &self.blue]
    }
}

/// Split an RGB image into its red, green and blue planes.
pub fn split(image: &RgbImage) -> Result<Channels> {
    let planes = to_array(image)?;
    Ok(Channels {
        red: planes.index_axis(Axis(2), 0).to_owned(),
        green: planes.index_axis(Axis(2), 1).to_owned(),
        blue: planes.index_axis(Axis(2), 2).to_owned(),
    })
}

/// Split any decoded image. Alpha is dropped and other layouts are
/// converted to 8-bit RGB first.
pub fn split_dynamic(image: &DynamicImage) -> Result<Channels> {
    split(&image.to_rgb8())
}

/// Recompose three planes into an RGB image.
///
/// Samples are rounded to the nearest integer and clamped to [0, 255], so
/// `join` of an unmodified `split` reproduces the image exactly.
pub fn join(red: &Channel, green: &Channel, blue: &Channel) -> Result<RgbImage> {
    let planes = stack(red, green, blue)?;
    quantize(planes.view(), 1.0)
}

/// Recompose three planes into one (rows, columns, 3) real array.
pub fn stack(red: &Channel, green: &Channel, blue: &Channel) -> Result<Array3<f64>> {
    let expected = red.dim();
    for plane in [green, blue] {
        if plane.dim() != expected {
            return Err(SpektralError::ShapeMismatch {
                expected,
                actual: plane.dim(),
            });
        }
    }
    ndarray::stack(Axis(2), &[red.view(), green.view(), blue.view()]).map_err(|err| {
        SpektralError::InvalidDimensions(format!("failed to stack channels: {err}"))
    })
}

/// The whole image as a (rows, columns, 3) real array.
pub fn to_array(image: &RgbImage) -> Result<Array3<f64>> {
    let (width, height) = image.dimensions();
    let samples = image.as_raw().iter().map(|&v| f64::from(v)).collect();
    Array3::from_shape_vec((height as usize, width as usize, 3), samples).map_err(|err| {
        SpektralError::InvalidDimensions(format!("{width}x{height} RGB buffer: {err}"))
    })
}

/// Quantize a (rows, columns, 3) array into an RGB image.
///
/// Each sample is multiplied by `scale`, rounded, and clamped to [0, 255].
/// Use a scale of 255 for data normalized to [0, 1].
pub fn quantize(planes: ArrayView3<'_, f64>, scale: f64) -> Result<RgbImage> {
    let (rows, cols, depth) = planes.dim();
    if depth != 3 {
        return Err(SpektralError::InvalidDimensions(format!(
            "expected 3 planes, got {depth}"
        )));
    }
    let width = u32::try_from(cols)
        .map_err(|_| SpektralError::InvalidDimensions(format!("{cols} columns exceed u32")))?;
    let height = u32::try_from(rows)
        .map_err(|_| SpektralError::InvalidDimensions(format!("{rows} rows exceed u32")))?;

    let to_sample = |value: f64| (value * scale).round().clamp(0.0, 255.0) as u8;
    Ok(RgbImage::from_fn(width, height, |x, y| {
        let (row, col) = (y as usize, x as usize);
        Rgb([
            to_sample(planes[[row, col, 0]]),
            to_sample(planes[[row, col, 1]]),
            to_sample(planes[[row, col, 2]]),
        ])
    }))
}

/// Luma of an RGB image, in sample units (0..=255).
pub fn grayscale(image: &RgbImage) -> Result<Channel> {
    let Channels { red, green, blue } = split(image)?;
    let mut gray = Channel::zeros(red.dim());
    Zip::from(&mut gray)
        .and(&red)
        .and(&green)
        .and(&blue)
        .for_each(|g, &r, &gr, &b| *g = 0.2989 * r + 0.5870 * gr + 0.1140 * b);
    Ok(gray)
}

/// Replicate one plane into all three channels of an RGB image.
pub fn gray_to_rgb(channel: &Channel) -> Result<RgbImage> {
    join(channel, channel, channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 13 % 256) as u8, (y * 29 % 256) as u8, ((x * y) % 256) as u8])
        })
    }

    #[test]
    fn split_then_join_is_bit_identical() {
        let image = gradient(17, 11);
        let channels = split(&image).unwrap();
        let joined = join(&channels.red, &channels.green, &channels.blue).unwrap();
        assert_eq!(joined, image);
    }

    #[test]
    fn to_array_is_row_major_with_planes_last() {
        let image = RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8, y as u8, (10 * x + y) as u8]));
        let planes = to_array(&image).unwrap();
        assert_eq!(planes.dim(), (2, 3, 3));
        assert_eq!(planes[[1, 2, 0]], 2.0);
        assert_eq!(planes[[1, 2, 1]], 1.0);
        assert_eq!(planes[[1, 2, 2]], 21.0);
        assert_eq!(planes[[0, 1, 2]], 10.0);
    }

    #[test]
    fn split_keeps_rgb_order() {
        let image = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        let channels = split(&image).unwrap();
        assert_eq!(channels.dim(), (2, 3));
        assert!(channels.red.iter().all(|&v| v == 10.0));
        assert!(channels.green.iter().all(|&v| v == 20.0));
        assert!(channels.blue.iter().all(|&v| v == 30.0));
    }

    #[test]
    fn split_dynamic_drops_alpha() {
        let rgba = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 0]));
        let channels = split_dynamic(&DynamicImage::ImageRgba8(rgba)).unwrap();
        assert_eq!(channels.red[[0, 0]], 1.0);
        assert_eq!(channels.green[[0, 0]], 2.0);
        assert_eq!(channels.blue[[0, 0]], 3.0);
    }

    #[test]
    fn join_rejects_mismatched_planes() {
        let a = Channel::zeros((4, 5));
        let b = Channel::zeros((4, 6));
        let err = join(&a, &a, &b).unwrap_err();
        match err {
            SpektralError::ShapeMismatch { expected, actual } => {
                assert_eq!(expected, (4, 5));
                assert_eq!(actual, (4, 6));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn quantize_rounds_and_clamps() {
        let mut planes = Array3::<f64>::zeros((1, 2, 3));
        planes[[0, 0, 0]] = -12.0;
        planes[[0, 0, 1]] = 300.0;
        planes[[0, 0, 2]] = 127.6;
        planes[[0, 1, 0]] = 0.5;
        let image = quantize(planes.view(), 1.0).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgb([0, 255, 128]));

        let normalized = Array3::<f64>::from_elem((1, 1, 3), 1.0);
        let image = quantize(normalized.view(), 255.0).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn grayscale_uses_luma_weights() {
        let image = RgbImage::from_pixel(2, 2, Rgb([100, 200, 50]));
        let gray = grayscale(&image).unwrap();
        let expected = 0.2989 * 100.0 + 0.5870 * 200.0 + 0.1140 * 50.0;
        assert!((gray[[1, 1]] - expected).abs() < 1e-9);

        let back = gray_to_rgb(&gray).unwrap();
        let level = expected.round() as u8;
        assert_eq!(back.get_pixel(0, 0), &Rgb([level, level, level]));
    }
}
