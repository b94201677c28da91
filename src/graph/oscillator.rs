use std::f32::consts::TAU;

use crate::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Pitched Oscillator Node
=======================

Tracks the note pitch carried in RenderCtx (which already includes the
channel's pitch bend) and adds vibrato from the modulation wheel.

Vibrato
-------

  rate     Fixed at VIBRATO_RATE_HZ, in the 2-7 Hz vibrato sweet spot.

  depth    ctx.modulation (0.0-1.0) scaled to at most VIBRATO_DEPTH_SEMITONES.
           At modulation 0 the pitch is exactly the note frequency and the
           vibrato LFO is not evaluated at all.

Per sample:

    offset    = depth * VIBRATO_DEPTH_SEMITONES * sin(2π·lfo_phase)
    frequency = ctx.frequency * 2^(offset / 12)
*/

const VIBRATO_RATE_HZ: f32 = 5.5;
const VIBRATO_DEPTH_SEMITONES: f32 = 0.5;

pub struct OscNode {
    osc: OscillatorBlock,
    vibrato_phase: f32,
}

impl OscNode {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
            vibrato_phase: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn square() -> Self {
        Self::new(OscillatorWaveform::Square)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Saw)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if ctx.modulation <= 0.0 {
            self.osc.render(out, ctx.frequency, ctx.sample_rate);
            return;
        }

        let depth = ctx.modulation.min(1.0) * VIBRATO_DEPTH_SEMITONES;
        let lfo_step = VIBRATO_RATE_HZ / ctx.sample_rate;

        for sample in out.iter_mut() {
            let offset = depth * (TAU * self.vibrato_phase).sin();
            let frequency = ctx.frequency * 2.0_f32.powf(offset / 12.0);
            *sample = self.osc.next_sample(frequency, ctx.sample_rate);

            self.vibrato_phase += lfo_step;
            self.vibrato_phase -= self.vibrato_phase.floor();
        }
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.reset();
    }

    fn reset(&mut self) {
        self.osc.reset();
        self.vibrato_phase = 0.0;
    }
}
