// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the sweep driver: sequential versus rayon.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage};

use spektral_anim::{sweep, sweep_parallel};
use spektral_core::types::SweepSpec;
use spektral_filter::FilterEngine;

fn synthetic_image() -> RgbImage {
    RgbImage::from_fn(96, 64, |x, y| {
        let check = if (x / 6 + y / 6) % 2 == 0 { 200 } else { 40 };
        Rgb([check, ((x * 3) % 256) as u8, ((y * 4) % 256) as u8])
    })
}

fn bench_sweeps(c: &mut Criterion) {
    let engine = FilterEngine::default();
    let image = synthetic_image();
    let spec = SweepSpec::lowpass_fsweep(2);

    c.bench_function("lowpass fsweep sequential (10 frames)", |b| {
        b.iter(|| black_box(sweep(&engine, black_box(&image), &spec).ok()));
    });
    c.bench_function("lowpass fsweep parallel (10 frames)", |b| {
        b.iter(|| black_box(sweep_parallel(&engine, black_box(&image), &spec).ok()));
    });
}

criterion_group!(benches, bench_sweeps);
criterion_main!(benches);
