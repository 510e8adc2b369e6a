// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spektral — frequency-domain Butterworth image filters
//
// Entry point. Initialises logging, parses the command line and dispatches
// to the filter, sweep or job runner.

mod args;
mod job;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use image::RgbImage;
use spektral_anim::{codec, sweep_to_file};
use spektral_core::config::{AnimationOptions, EngineConfig};
use spektral_core::error::Result;
use spektral_filter::channels::{gray_to_rgb, grayscale};
use spektral_filter::{FilterEngine, PngDumpSink};

use args::{Cli, Command, FilterArgs, SweepArgs};
use job::JobFile;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!("Spektral starting");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Spektral failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let debug_dir = cli.debug_dir.as_deref();
    match cli.command {
        Command::Filter(args) => filter(&args, debug_dir),
        Command::Sweep(args) => sweep(&args, debug_dir),
        Command::Run { job } => {
            let job = JobFile::load(&job)?;
            let engine = build_engine(job.engine, debug_dir)?;
            let written = job.run(&engine)?;
            tracing::info!(files = written.len(), "Job complete");
            Ok(())
        }
    }
}

fn build_engine(config: EngineConfig, debug_dir: Option<&Path>) -> Result<FilterEngine> {
    let engine = FilterEngine::new(config);
    Ok(match debug_dir {
        Some(dir) => engine.with_sink(Arc::new(PngDumpSink::new(dir)?)),
        None => engine,
    })
}

fn load_input(path: &Path, gray: bool) -> Result<RgbImage> {
    let image = codec::load(path)?;
    if gray {
        gray_to_rgb(&grayscale(&image)?)
    } else {
        Ok(image)
    }
}

fn filter(args: &FilterArgs, debug_dir: Option<&Path>) -> Result<()> {
    let spec = args.params.spec(None)?;
    let engine = build_engine(EngineConfig::default(), debug_dir)?;
    let image = load_input(&args.input, args.gray)?;
    let result = engine.apply(&image, &spec, !args.no_equalize)?;
    codec::save(&result.to_rgb8()?, &args.output)?;
    tracing::info!(%spec, output = %args.output.display(), "Filter applied");
    Ok(())
}

fn sweep(args: &SweepArgs, debug_dir: Option<&Path>) -> Result<()> {
    let spec = args.sweep_spec()?;
    let options = AnimationOptions::with_fps(args.fps);
    options.validate()?;
    let config = EngineConfig {
        equalize: !args.no_equalize,
        ..EngineConfig::default()
    };
    let engine = build_engine(config, debug_dir)?;
    let image = load_input(&args.input, args.gray)?;
    let frames = sweep_to_file(&engine, &image, &spec, &args.output, &options, args.parallel)?;
    tracing::info!(frames, output = %args.output.display(), "Sweep written");
    Ok(())
}
