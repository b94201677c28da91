//! Benchmarks for channel mixing and the full synthesizer.
//!
//! Worst case is every slot of every channel sounding: 16 x 32 = 512 voices.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polysynth::{
    synth::{channel::Channel, synthesizer::Synthesizer},
    voices::{self, DefaultVoice},
    CHANNEL_COUNT, VOICE_COUNT,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn full_channel(id: u8) -> Channel<DefaultVoice> {
    let mut channel = Channel::new(id, &voices::chip);
    channel.set_pan(id * 8);
    channel.set_modulation_wheel(64);
    for slot in 0..VOICE_COUNT as u8 {
        channel.note_on(36 + slot, 100);
    }
    channel
}

pub fn bench_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/synth");

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // === ONE CHANNEL, FULL POOL ===
        let mut channel = full_channel(0);
        group.bench_with_input(BenchmarkId::new("channel_full", size), &size, |b, _| {
            b.iter(|| {
                left.fill(0.0);
                right.fill(0.0);
                channel.render(black_box(&mut left), black_box(&mut right), SAMPLE_RATE);
            })
        });

        // === IDLE ENGINE ===
        // cost of walking 512 free slots
        let mut idle = Synthesizer::with_default_voices();
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| {
                idle.render(black_box(&mut left), black_box(&mut right), SAMPLE_RATE);
            })
        });

        // === FULL POLYPHONY ===
        let mut synth = Synthesizer::with_default_voices();
        for id in 0..CHANNEL_COUNT {
            if let Some(channel) = synth.channel_mut(id) {
                *channel = full_channel(id as u8);
            }
        }
        group.bench_with_input(BenchmarkId::new("full_polyphony", size), &size, |b, _| {
            b.iter(|| {
                synth.render(black_box(&mut left), black_box(&mut right), SAMPLE_RATE);
            })
        });

        // === INTERLEAVED DEVICE BUFFER ===
        let mut device = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("interleaved_stereo", size), &size, |b, _| {
            b.iter(|| {
                synth.render_interleaved(black_box(&mut device), 2, SAMPLE_RATE);
            })
        });
    }

    group.finish();
}
