use crate::{
    dsp::envelope::{Envelope, EnvelopeState},
    graph::node::{GraphNode, RenderCtx},
};

/// ADSR envelope as a graph node. Outputs the envelope level (0.0-1.0).
pub struct EnvNode {
    env: Envelope,
}

impl EnvNode {
    /// Times in seconds, sustain as a level in 0.0-1.0.
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            env: Envelope::adsr(attack, decay, sustain, release),
        }
    }

    pub fn level(&self) -> f32 {
        self.env.level()
    }

    pub fn state(&self) -> EnvelopeState {
        self.env.state()
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.env.render(out, ctx.sample_rate);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.env.note_on();
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.env.note_off(ctx.sample_rate);
    }

    fn reset(&mut self) {
        self.env.reset();
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}
