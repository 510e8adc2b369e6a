// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use spektral_core::error::{Result, SpektralError};
use spektral_core::types::{FilterKind, FilterSpec, SweepParam, SweepSpec, value_range};

#[derive(Debug, Parser)]
#[command(
    name = "spektral",
    version,
    about = "Frequency-domain Butterworth image filters and parameter-sweep animations"
)]
pub struct Cli {
    /// Dump masks, spectra and results as PNGs into this directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub debug_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply one filter and save the result as a still image.
    Filter(FilterArgs),
    /// Sweep one filter parameter over a range and save a looping GIF.
    Sweep(SweepArgs),
    /// Run every sweep of a JSON job file over every image it lists.
    Run {
        /// Path to the job file.
        job: PathBuf,
    },
}

/// Filter kind plus whichever parameters it needs.
#[derive(Debug, Clone, Args)]
pub struct FilterParams {
    /// lowpass, highpass, bandpass or notch.
    #[arg(long)]
    pub kind: FilterKind,

    /// Cutoff frequency (lowpass, highpass) or upper band edge (bandpass).
    #[arg(long, allow_negative_numbers = true)]
    pub cutoff: Option<f64>,

    /// Lower band edge (bandpass).
    #[arg(long, allow_negative_numbers = true)]
    pub cutin: Option<f64>,

    /// Center frequency (notch).
    #[arg(long, allow_negative_numbers = true)]
    pub center: Option<f64>,

    /// Rejected bandwidth (notch).
    #[arg(long)]
    pub band: Option<f64>,

    /// Butterworth order.
    #[arg(long, default_value_t = 2)]
    pub order: u32,
}

impl FilterParams {
    /// Build the filter. A parameter named by `vary` may be omitted; it gets
    /// a placeholder that the sweep overwrites.
    pub fn spec(&self, vary: Option<SweepParam>) -> Result<FilterSpec> {
        let required = |param: SweepParam, value: Option<f64>| -> Result<f64> {
            match value {
                Some(value) => Ok(value),
                None if vary == Some(param) => Ok(0.0),
                None => Err(SpektralError::invalid_parameter(format!(
                    "--{param} is required for a {} filter",
                    self.kind
                ))),
            }
        };
        let spec = match self.kind {
            FilterKind::Lowpass => {
                FilterSpec::lowpass(required(SweepParam::Cutoff, self.cutoff)?, self.order)
            }
            FilterKind::Highpass => {
                FilterSpec::highpass(required(SweepParam::Cutoff, self.cutoff)?, self.order)
            }
            FilterKind::Bandpass => FilterSpec::bandpass(
                required(SweepParam::Cutin, self.cutin)?,
                required(SweepParam::Cutoff, self.cutoff)?,
                self.order,
            ),
            FilterKind::Notch => FilterSpec::notch(
                required(SweepParam::Center, self.center)?,
                required(SweepParam::Band, self.band)?,
                self.order,
            ),
        };
        Ok(spec)
    }
}

#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Input image.
    pub input: PathBuf,
    /// Output image; the format follows the extension.
    pub output: PathBuf,

    #[command(flatten)]
    pub params: FilterParams,

    /// Skip histogram equalization and clamp raw values instead.
    #[arg(long)]
    pub no_equalize: bool,

    /// Convert the input to grayscale before filtering.
    #[arg(long)]
    pub gray: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SweepArgs {
    /// Input image.
    pub input: PathBuf,
    /// Output GIF.
    pub output: PathBuf,

    #[command(flatten)]
    pub params: FilterParams,

    /// Parameter to vary: cutoff, order, cutin, center or band.
    #[arg(long)]
    pub vary: SweepParam,

    /// First value of the sweep.
    #[arg(long, allow_negative_numbers = true)]
    pub from: f64,

    /// End of the sweep, excluded.
    #[arg(long, allow_negative_numbers = true)]
    pub to: f64,

    /// Increment between values. Defaults to 1, or -1 when counting down.
    #[arg(long, allow_negative_numbers = true)]
    pub step: Option<f64>,

    /// Frames per second.
    #[arg(long, default_value_t = 10)]
    pub fps: u32,

    /// Render frames on all cores.
    #[arg(long)]
    pub parallel: bool,

    /// Skip histogram equalization and clamp raw values instead.
    #[arg(long)]
    pub no_equalize: bool,

    /// Convert the input to grayscale before filtering.
    #[arg(long)]
    pub gray: bool,
}

impl SweepArgs {
    pub fn sweep_spec(&self) -> Result<SweepSpec> {
        let step = self
            .step
            .unwrap_or(if self.to < self.from { -1.0 } else { 1.0 });
        let values = value_range(self.from, self.to, step)?;
        Ok(SweepSpec::new(self.params.spec(Some(self.vary))?, self.vary, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn filter_command_builds_spec() {
        let cli = parse(&[
            "spektral", "filter", "in.jpg", "out.png", "--kind", "bandpass", "--cutin", "5",
            "--cutoff", "20", "--order", "3",
        ]);
        let Command::Filter(args) = cli.command else {
            panic!("expected filter command");
        };
        assert_eq!(args.params.spec(None).unwrap(), FilterSpec::bandpass(5.0, 20.0, 3));
        assert!(!args.no_equalize);
        assert!(!args.gray);
    }

    #[test]
    fn missing_fixed_parameter_is_reported() {
        let cli = parse(&["spektral", "filter", "a.png", "b.png", "--kind", "notch", "--center", "4"]);
        let Command::Filter(args) = cli.command else {
            panic!("expected filter command");
        };
        let err = args.params.spec(None).unwrap_err();
        assert!(err.to_string().contains("--band"));
    }

    #[test]
    fn sweep_counts_down_by_default_when_descending() {
        let cli = parse(&[
            "spektral", "sweep", "in.jpg", "out.gif", "--kind", "lowpass", "--vary", "cutoff",
            "--from", "5", "--to", "0",
        ]);
        let Command::Sweep(args) = cli.command else {
            panic!("expected sweep command");
        };
        let spec = args.sweep_spec().unwrap();
        assert_eq!(spec.values, vec![5.0, 4.0, 3.0, 2.0, 1.0]);
        assert_eq!(spec.template.order(), 2);
        assert_eq!(args.fps, 10);
    }

    #[test]
    fn sweep_with_explicit_step() {
        let cli = parse(&[
            "spektral", "sweep", "in.jpg", "out.gif", "--kind", "notch", "--vary", "band",
            "--center", "50", "--from", "10", "--to", "20", "--step", "4", "--parallel",
            "--debug-dir", "dbg",
        ]);
        assert_eq!(cli.debug_dir, Some(PathBuf::from("dbg")));
        let Command::Sweep(args) = cli.command else {
            panic!("expected sweep command");
        };
        assert!(args.parallel);
        assert!(!args.gray);
        let spec = args.sweep_spec().unwrap();
        assert_eq!(spec.values, vec![10.0, 14.0, 18.0]);
        assert_eq!(spec.specs().unwrap()[1], FilterSpec::notch(50.0, 14.0, 2));
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        assert!(Cli::try_parse_from(["spektral", "filter", "a", "b", "--kind", "comb"]).is_err());
    }
}
