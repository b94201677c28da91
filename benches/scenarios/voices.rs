//! Benchmarks for the bundled voice patches.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polysynth::graph::node::{GraphNode, RenderCtx};
use polysynth::voices;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    // A2 with some vibrato, typical held bass note
    let ctx = RenderCtx::channel(SAMPLE_RATE, 0.0, 0.5).with_note(45, 100);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut chip = voices::chip();
        chip.note_on(&ctx);
        group.bench_with_input(BenchmarkId::new("chip", size), &size, |b, _| {
            b.iter(|| {
                chip.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });

        let mut soft = voices::soft();
        soft.note_on(&ctx);
        group.bench_with_input(BenchmarkId::new("soft", size), &size, |b, _| {
            b.iter(|| {
                soft.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
