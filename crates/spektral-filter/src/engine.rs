// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filter engine — composes the four Butterworth variants from one lowpass
// primitive: split, transform, mask, inverse transform, rejoin, equalize.

use std::sync::Arc;

use image::RgbImage;
use ndarray::{Array3, Zip};
use spektral_core::config::EngineConfig;
use spektral_core::error::Result;
use spektral_core::types::FilterSpec;
use tracing::{debug, info, instrument};

use crate::channels::{self, Channels, quantize};
use crate::display::{DisplaySink, NullSink, Stage};
use crate::equalize::equalize;
use crate::mask::{lowpass_mask, response_mask};
use crate::spectrum::{self, log_magnitude};
use crate::{Channel, FilterMask};

/// Real-valued result of one filter application.
///
/// When `equalized` is set the samples lie in [0, 1]; otherwise they are in
/// sample units and may fall outside [0, 255] (highpass-style results are
/// centered on zero).
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredImage {
    pub planes: Array3<f64>,
    pub equalized: bool,
}

impl FilteredImage {
    /// (rows, columns) of the result.
    pub fn dim(&self) -> (usize, usize) {
        let (rows, cols, _) = self.planes.dim();
        (rows, cols)
    }

    /// Quantize to an 8-bit frame: equalized data is scaled by 255, other
    /// data is rounded and clamped to [0, 255].
    pub fn to_rgb8(&self) -> Result<RgbImage> {
        let scale = if self.equalized { 255.0 } else { 1.0 };
        quantize(self.planes.view(), scale)
    }
}

/// Applies Butterworth filters to RGB images.
///
/// The engine holds no array state between calls; every method is a pure
/// function of its inputs. An optional [`DisplaySink`] receives intermediate
/// arrays.
///
/// ```ignore
/// let engine = FilterEngine::default();
/// let smooth = engine.lowpass(&image, 20.0, 2, true)?.to_rgb8()?;
/// ```
#[derive(Clone)]
pub struct FilterEngine {
    config: EngineConfig,
    sink: Arc<dyn DisplaySink>,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for FilterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEngine")
            .field("config", &self.config)
            .field("sink_enabled", &self.sink.enabled())
            .finish()
    }
}

impl FilterEngine {
    // -- Construction ---------------------------------------------------------

    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            sink: Arc::new(NullSink),
        }
    }

    /// Install a display sink for intermediate arrays.
    pub fn with_sink(mut self, sink: Arc<dyn DisplaySink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -- Filters --------------------------------------------------------------

    /// Butterworth lowpass with cutoff `cutoff` and order `order`.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn lowpass(
        &self,
        image: &RgbImage,
        cutoff: f64,
        order: u32,
        equalize: bool,
    ) -> Result<FilteredImage> {
        self.apply(image, &FilterSpec::lowpass(cutoff, order), equalize)
    }

    /// Highpass as `image - lowpass(image)`.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn highpass(
        &self,
        image: &RgbImage,
        cutoff: f64,
        order: u32,
        equalize: bool,
    ) -> Result<FilteredImage> {
        self.apply(image, &FilterSpec::highpass(cutoff, order), equalize)
    }

    /// Bandpass as `image - (lowpass(cutin) + highpass(cutoff))`.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn bandpass(
        &self,
        image: &RgbImage,
        cutin: f64,
        cutoff: f64,
        order: u32,
        equalize: bool,
    ) -> Result<FilteredImage> {
        self.apply(image, &FilterSpec::bandpass(cutin, cutoff, order), equalize)
    }

    /// Notch as `lowpass(center - band/2) + highpass(center + band/2)`.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn notch(
        &self,
        image: &RgbImage,
        center: f64,
        band: f64,
        order: u32,
        equalize: bool,
    ) -> Result<FilteredImage> {
        self.apply(image, &FilterSpec::notch(center, band, order), equalize)
    }

    /// Apply any filter. Parameters are validated before any transform runs.
    pub fn apply(&self, image: &RgbImage, spec: &FilterSpec, equalize: bool) -> Result<FilteredImage> {
        spec.validate()?;
        info!(%spec, equalize, "Applying filter");

        let source = channels::split(image)?;
        let (rows, cols) = source.dim();
        if self.sink.enabled() {
            self.sink.show(Stage::Mask, response_mask(spec, rows, cols)?.view());
        }

        let planes = match *spec {
            FilterSpec::Lowpass { cutoff, order } => self.lowpass_planes(&source, cutoff, order)?,
            FilterSpec::Highpass { cutoff, order } => {
                let low = self.lowpass_planes(&source, cutoff, order)?;
                channels::to_array(image)? - low
            }
            FilterSpec::Bandpass {
                cutin,
                cutoff,
                order,
            } => {
                let original = channels::to_array(image)?;
                let below = self.lowpass_planes(&source, cutin, order)?;
                let above = &original - &self.lowpass_planes(&source, cutoff, order)?;
                original - (below + above)
            }
            FilterSpec::Notch {
                center,
                band,
                order,
            } => {
                let below = self.lowpass_planes(&source, center - band / 2.0, order)?;
                let above = channels::to_array(image)?
                    - self.lowpass_planes(&source, center + band / 2.0, order)?;
                below + above
            }
        };

        let result = self.finish(planes, equalize);
        if self.sink.enabled() {
            self.sink.show_planes(Stage::Result, result.planes.view());
        }
        Ok(result)
    }

    /// Apply `spec` with the configured equalization and quantize to a frame.
    pub fn render(&self, image: &RgbImage, spec: &FilterSpec) -> Result<RgbImage> {
        self.apply(image, spec, self.config.equalize)?.to_rgb8()
    }

    // -- Pipeline -------------------------------------------------------------

    /// Lowpass all three planes with one shared mask.
    fn lowpass_planes(&self, source: &Channels, cutoff: f64, order: u32) -> Result<Array3<f64>> {
        let (rows, cols) = source.dim();
        let mask = lowpass_mask(rows, cols, cutoff, order)?;
        debug!(rows, cols, cutoff, order, "Mask built");

        let [red, green, blue] = source.planes();
        let filtered = [
            self.filter_plane(0, red, &mask)?,
            self.filter_plane(1, green, &mask)?,
            self.filter_plane(2, blue, &mask)?,
        ];
        channels::stack(&filtered[0], &filtered[1], &filtered[2])
    }

    /// Forward transform, mask multiply, inverse transform.
    fn filter_plane(&self, plane: usize, channel: &Channel, mask: &FilterMask) -> Result<Channel> {
        let mut spectrum = spectrum::forward(channel)?;
        if self.sink.enabled() {
            self.sink
                .show(Stage::Spectrum(plane), log_magnitude(&spectrum).view());
        }

        Zip::from(&mut spectrum).and(mask).for_each(|z, &m| *z *= m);
        if self.sink.enabled() {
            self.sink
                .show(Stage::MaskedSpectrum(plane), log_magnitude(&spectrum).view());
        }

        spectrum::inverse(&spectrum, self.config.precision_tolerance)
    }

    fn finish(&self, planes: Array3<f64>, equalize_result: bool) -> FilteredImage {
        if equalize_result {
            FilteredImage {
                planes: equalize(&planes),
                equalized: true,
            }
        } else {
            FilteredImage {
                planes,
                equalized: false,
            }
        }
    }
}
