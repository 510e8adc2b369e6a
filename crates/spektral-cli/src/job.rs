// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch job files: a set of images and a list of sweeps to render for each.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use spektral_anim::{codec, sweep_to_file};
use spektral_core::config::{AnimationOptions, EngineConfig};
use spektral_core::error::Result;
use spektral_core::types::{FilterSpec, SweepParam, SweepSpec, default_variation, value_range};
use spektral_filter::FilterEngine;
use tracing::{info, instrument};

/// A JSON job file.
///
/// ```json
/// {
///   "output_dir": "gifs",
///   "images": { "muse": "src/muse.jpg" },
///   "sweeps": [
///     { "name": "high_fsweep",
///       "template": { "kind": "highpass", "cutoff": 1, "order": 2 },
///       "vary": "cutoff",
///       "values": { "start": 1, "stop": 50 } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFile {
    /// Where the GIFs go (default `gifs`). Relative paths resolve against
    /// the working directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub engine: EngineConfig,
    /// Render each sweep's frames on all cores.
    #[serde(default)]
    pub parallel: bool,
    /// Output prefix to image path.
    pub images: BTreeMap<String, PathBuf>,
    pub sweeps: Vec<SweepJob>,
}

/// One named sweep in a job file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepJob {
    /// Output files are `<prefix>_<name>.gif`.
    pub name: String,
    pub template: FilterSpec,
    pub vary: SweepParam,
    #[serde(default)]
    pub values: ValueSource,
    #[serde(default)]
    pub animation: AnimationOptions,
}

/// Either an explicit list of values or a half-open range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueSource {
    List(Vec<f64>),
    Range {
        start: f64,
        stop: f64,
        #[serde(default = "default_step")]
        step: f64,
    },
}

impl Default for ValueSource {
    fn default() -> Self {
        ValueSource::List(default_variation())
    }
}

impl ValueSource {
    pub fn values(&self) -> Result<Vec<f64>> {
        match *self {
            ValueSource::List(ref values) => Ok(values.clone()),
            ValueSource::Range { start, stop, step } => value_range(start, stop, step),
        }
    }
}

impl SweepJob {
    pub fn sweep_spec(&self) -> Result<SweepSpec> {
        Ok(SweepSpec::new(self.template, self.vary, self.values.values()?))
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("gifs")
}

fn default_step() -> f64 {
    1.0
}

impl JobFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Check every sweep before any image is decoded.
    pub fn validate(&self) -> Result<()> {
        for job in &self.sweeps {
            job.sweep_spec()?.specs()?;
            job.animation.validate()?;
        }
        Ok(())
    }

    /// Run every sweep over every image. Returns the written paths in
    /// image-then-sweep order.
    #[instrument(skip_all, fields(images = self.images.len(), sweeps = self.sweeps.len()))]
    pub fn run(&self, engine: &FilterEngine) -> Result<Vec<PathBuf>> {
        self.validate()?;
        std::fs::create_dir_all(&self.output_dir)?;

        let mut written = Vec::with_capacity(self.images.len() * self.sweeps.len());
        for (prefix, source) in &self.images {
            let image = codec::load(source)?;
            for job in &self.sweeps {
                let path = self.output_dir.join(format!("{prefix}_{}.gif", job.name));
                let frames = sweep_to_file(
                    engine,
                    &image,
                    &job.sweep_spec()?,
                    &path,
                    &job.animation,
                    self.parallel,
                )?;
                info!(path = %path.display(), frames, "Sweep written");
                written.push(path);
            }
        }
        Ok(written)
    }
}
