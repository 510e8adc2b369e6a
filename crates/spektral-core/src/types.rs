// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: filter kinds, filter parameters, and sweep descriptions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, SpektralError};

/// The four Butterworth filter variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Lowpass,
    Highpass,
    Bandpass,
    Notch,
}

impl FilterKind {
    /// Parameters a sweep over this kind may vary.
    pub fn sweepable(&self) -> &'static [SweepParam] {
        match self {
            FilterKind::Lowpass | FilterKind::Highpass => &[SweepParam::Cutoff, SweepParam::Order],
            FilterKind::Bandpass => &[SweepParam::Cutin, SweepParam::Cutoff, SweepParam::Order],
            FilterKind::Notch => &[SweepParam::Center, SweepParam::Band, SweepParam::Order],
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FilterKind::Lowpass => "lowpass",
            FilterKind::Highpass => "highpass",
            FilterKind::Bandpass => "bandpass",
            FilterKind::Notch => "notch",
        };
        f.write_str(name)
    }
}

impl FromStr for FilterKind {
    type Err = SpektralError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lowpass" | "low" => Ok(FilterKind::Lowpass),
            "highpass" | "high" => Ok(FilterKind::Highpass),
            "bandpass" | "band" => Ok(FilterKind::Bandpass),
            "notch" => Ok(FilterKind::Notch),
            other => Err(SpektralError::invalid_parameter(format!(
                "unknown filter kind {other:?}"
            ))),
        }
    }
}

/// Immutable parameters of one filter application.
///
/// Frequencies are radial distances in frequency bins from the centered DC
/// component. `order` is the Butterworth order `n`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FilterSpec {
    Lowpass { cutoff: f64, order: u32 },
    Highpass { cutoff: f64, order: u32 },
    /// Edges act by magnitude, so `|cutin|` must be below `|cutoff|`.
    Bandpass { cutin: f64, cutoff: f64, order: u32 },
    Notch { center: f64, band: f64, order: u32 },
}

impl FilterSpec {
    pub fn lowpass(cutoff: f64, order: u32) -> Self {
        FilterSpec::Lowpass { cutoff, order }
    }

    pub fn highpass(cutoff: f64, order: u32) -> Self {
        FilterSpec::Highpass { cutoff, order }
    }

    pub fn bandpass(cutin: f64, cutoff: f64, order: u32) -> Self {
        FilterSpec::Bandpass {
            cutin,
            cutoff,
            order,
        }
    }

    pub fn notch(center: f64, band: f64, order: u32) -> Self {
        FilterSpec::Notch {
            center,
            band,
            order,
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            FilterSpec::Lowpass { .. } => FilterKind::Lowpass,
            FilterSpec::Highpass { .. } => FilterKind::Highpass,
            FilterSpec::Bandpass { .. } => FilterKind::Bandpass,
            FilterSpec::Notch { .. } => FilterKind::Notch,
        }
    }

    pub fn order(&self) -> u32 {
        match *self {
            FilterSpec::Lowpass { order, .. }
            | FilterSpec::Highpass { order, .. }
            | FilterSpec::Bandpass { order, .. }
            | FilterSpec::Notch { order, .. } => order,
        }
    }

    /// Check the parameters before any transform work is done.
    ///
    /// Negative cutoffs are accepted: the Butterworth response depends on
    /// `(r/f)^(2n)` only, so they act like their absolute value.
    pub fn validate(&self) -> Result<()> {
        validate_order(self.order())?;
        match *self {
            FilterSpec::Lowpass { cutoff, .. } | FilterSpec::Highpass { cutoff, .. } => {
                require_finite("cutoff", cutoff)
            }
            FilterSpec::Bandpass { cutin, cutoff, .. } => {
                require_finite("cutin", cutin)?;
                require_finite("cutoff", cutoff)?;
                if cutin.abs() >= cutoff.abs() {
                    return Err(SpektralError::invalid_parameter(format!(
                        "bandpass |cutin| ({cutin}) must be below |cutoff| ({cutoff})"
                    )));
                }
                Ok(())
            }
            FilterSpec::Notch { center, band, .. } => {
                require_finite("center", center)?;
                require_finite("band", band)?;
                if band < 0.0 {
                    return Err(SpektralError::invalid_parameter(format!(
                        "notch band must not be negative, got {band}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Return a copy with `param` bound to `value`.
    ///
    /// Fails when the parameter does not belong to this filter kind or when
    /// an order value is not a positive integer. The result is not validated
    /// as a whole; call [`FilterSpec::validate`] on it.
    pub fn with_param(&self, param: SweepParam, value: f64) -> Result<Self> {
        let mut spec = *self;
        match (&mut spec, param) {
            (FilterSpec::Lowpass { order, .. }, SweepParam::Order)
            | (FilterSpec::Highpass { order, .. }, SweepParam::Order)
            | (FilterSpec::Bandpass { order, .. }, SweepParam::Order)
            | (FilterSpec::Notch { order, .. }, SweepParam::Order) => {
                *order = order_from_value(value)?;
            }
            (FilterSpec::Lowpass { cutoff, .. }, SweepParam::Cutoff)
            | (FilterSpec::Highpass { cutoff, .. }, SweepParam::Cutoff)
            | (FilterSpec::Bandpass { cutoff, .. }, SweepParam::Cutoff) => *cutoff = value,
            (FilterSpec::Bandpass { cutin, .. }, SweepParam::Cutin) => *cutin = value,
            (FilterSpec::Notch { center, .. }, SweepParam::Center) => *center = value,
            (FilterSpec::Notch { band, .. }, SweepParam::Band) => *band = value,
            (_, param) => {
                return Err(SpektralError::invalid_parameter(format!(
                    "{} filters have no {param} parameter",
                    self.kind()
                )));
            }
        }
        Ok(spec)
    }
}

impl std::fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            FilterSpec::Lowpass { cutoff, order } => write!(f, "lowpass(f={cutoff}, n={order})"),
            FilterSpec::Highpass { cutoff, order } => {
                write!(f, "highpass(f={cutoff}, n={order})")
            }
            FilterSpec::Bandpass {
                cutin,
                cutoff,
                order,
            } => write!(f, "bandpass(cutin={cutin}, cutoff={cutoff}, n={order})"),
            FilterSpec::Notch {
                center,
                band,
                order,
            } => write!(f, "notch(f={center}, band={band}, n={order})"),
        }
    }
}

fn validate_order(order: u32) -> Result<()> {
    if order == 0 {
        return Err(SpektralError::invalid_parameter(
            "Butterworth order must be at least 1",
        ));
    }
    Ok(())
}

fn require_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(SpektralError::invalid_parameter(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(())
}

fn order_from_value(value: f64) -> Result<u32> {
    if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > u32::MAX as f64 {
        return Err(SpektralError::invalid_parameter(format!(
            "Butterworth order must be a positive integer, got {value}"
        )));
    }
    Ok(value as u32)
}

/// The single parameter a sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepParam {
    /// Cutoff frequency of lowpass/highpass, upper edge of bandpass.
    Cutoff,
    /// Butterworth order.
    Order,
    /// Lower edge of bandpass.
    Cutin,
    /// Notch center frequency.
    Center,
    /// Notch bandwidth.
    Band,
}

impl std::fmt::Display for SweepParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SweepParam::Cutoff => "cutoff",
            SweepParam::Order => "order",
            SweepParam::Cutin => "cutin",
            SweepParam::Center => "center",
            SweepParam::Band => "band",
        };
        f.write_str(name)
    }
}

impl FromStr for SweepParam {
    type Err = SpektralError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cutoff" | "f" => Ok(SweepParam::Cutoff),
            "order" | "n" => Ok(SweepParam::Order),
            "cutin" => Ok(SweepParam::Cutin),
            "center" | "centre" => Ok(SweepParam::Center),
            "band" | "bandwidth" => Ok(SweepParam::Band),
            other => Err(SpektralError::invalid_parameter(format!(
                "unknown sweep parameter {other:?}"
            ))),
        }
    }
}

/// A filter template, the parameter to vary, and the values it takes.
///
/// Produces one frame per value, in the order of `values`. Values may repeat
/// and need not be monotonic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    pub template: FilterSpec,
    pub vary: SweepParam,
    pub values: Vec<f64>,
}

impl SweepSpec {
    pub fn new(template: FilterSpec, vary: SweepParam, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            template,
            vary,
            values: values.into_iter().collect(),
        }
    }

    /// Replace the value sequence.
    pub fn with_values(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.values = values.into_iter().collect();
        self
    }

    /// Bind every value into a validated [`FilterSpec`], in order.
    ///
    /// Any invalid value rejects the whole sweep before work starts.
    pub fn specs(&self) -> Result<Vec<FilterSpec>> {
        if !self.template.kind().sweepable().contains(&self.vary) {
            return Err(SpektralError::invalid_parameter(format!(
                "cannot sweep {} of a {} filter",
                self.vary,
                self.template.kind()
            )));
        }
        self.values
            .iter()
            .map(|&value| {
                let spec = self.template.with_param(self.vary, value)?;
                spec.validate()?;
                Ok(spec)
            })
            .collect()
    }

    // -- Named sweeps ---------------------------------------------------------

    /// Highpass, sweeping the cutoff frequency at a fixed order.
    pub fn highpass_fsweep(order: u32) -> Self {
        Self::new(FilterSpec::highpass(1.0, order), SweepParam::Cutoff, default_variation())
    }

    /// Highpass, sweeping the order at a fixed cutoff.
    pub fn highpass_nsweep(cutoff: f64) -> Self {
        Self::new(FilterSpec::highpass(cutoff, 1), SweepParam::Order, default_variation())
    }

    /// Lowpass, sweeping the cutoff frequency at a fixed order.
    pub fn lowpass_fsweep(order: u32) -> Self {
        Self::new(FilterSpec::lowpass(1.0, order), SweepParam::Cutoff, default_variation())
    }

    /// Lowpass, sweeping the order at a fixed cutoff.
    pub fn lowpass_nsweep(cutoff: f64) -> Self {
        Self::new(FilterSpec::lowpass(cutoff, 1), SweepParam::Order, default_variation())
    }

    /// Bandpass, sweeping the cut-in frequency.
    pub fn bandpass_insweep(cutoff: f64, order: u32) -> Self {
        Self::new(
            FilterSpec::bandpass(0.0, cutoff, order),
            SweepParam::Cutin,
            default_variation(),
        )
    }

    /// Bandpass, sweeping the cutoff frequency.
    pub fn bandpass_offsweep(cutin: f64, order: u32) -> Self {
        Self::new(
            FilterSpec::bandpass(cutin, cutin + 1.0, order),
            SweepParam::Cutoff,
            default_variation(),
        )
    }

    /// Notch, sweeping the center frequency.
    pub fn notch_fsweep(band: f64, order: u32) -> Self {
        Self::new(FilterSpec::notch(0.0, band, order), SweepParam::Center, default_variation())
    }

    /// Notch, sweeping the bandwidth.
    pub fn notch_bsweep(center: f64, order: u32) -> Self {
        Self::new(FilterSpec::notch(center, 0.0, order), SweepParam::Band, default_variation())
    }
}

/// The variation used by the named sweeps: 1, 2, ..., 10.
pub fn default_variation() -> Vec<f64> {
    (1..=10).map(f64::from).collect()
}

/// Largest number of values [`value_range`] will produce.
pub const MAX_SWEEP_VALUES: usize = 100_000;

/// Values `start, start + step, ...` stopping before `stop`.
///
/// Works in both directions: a negative `step` counts down. A zero step is
/// rejected; a step pointing away from `stop` yields an empty sequence.
/// Ranges longer than [`MAX_SWEEP_VALUES`] are rejected.
pub fn value_range(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    if step == 0.0 || !step.is_finite() || !start.is_finite() || !stop.is_finite() {
        return Err(SpektralError::invalid_parameter(format!(
            "invalid range {start}..{stop} step {step}"
        )));
    }
    let count = ((stop - start) / step).ceil();
    if count <= 0.0 {
        return Ok(Vec::new());
    }
    if count > MAX_SWEEP_VALUES as f64 {
        return Err(SpektralError::invalid_parameter(format!(
            "range {start}..{stop} step {step} has more than {MAX_SWEEP_VALUES} values"
        )));
    }
    Ok((0..count as usize).map(|i| start + step * i as f64).collect())
}
