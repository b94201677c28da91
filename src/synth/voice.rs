use crate::graph::node::{GraphNode, RenderCtx};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Key held (or sustained), envelope in attack/decay/sustain
    Releasing, // Stopped, envelope in release phase
}

/// One slot of a channel's voice pool, playing any GraphNode patch.
///
/// `play` and `stop` only record the transition. The patch sees the matching
/// `note_on`/`note_off` at the start of the next `render`, where the sample
/// rate and channel controllers are known. A releasing voice frees itself once
/// the patch reports it is no longer active.
pub struct Voice<T: GraphNode> {
    note: u8,
    velocity: u8,
    state: VoiceState,
    pending_note_on: bool,
    pending_note_off: bool,
    graph: T,
}

impl<T: GraphNode> Voice<T> {
    pub fn new(graph: T) -> Self {
        Self {
            note: 0,
            velocity: 0,
            state: VoiceState::Free,
            pending_note_on: false,
            pending_note_off: false,
            graph,
        }
    }

    pub fn play(&mut self, note: u8, velocity: u8) {
        self.note = note;
        self.velocity = velocity;
        self.state = VoiceState::Active;
        self.pending_note_on = true;
        self.pending_note_off = false;
    }

    /// Start the release. No-op unless the voice is Active.
    pub fn stop(&mut self) {
        if self.state == VoiceState::Active {
            self.state = VoiceState::Releasing;
            self.pending_note_off = true;
        }
    }

    /// Add this voice's block into `out`. `scratch` must be at least as long
    /// as `out`; idle voices touch neither.
    pub fn render(&mut self, out: &mut [f32], scratch: &mut [f32], channel_ctx: &RenderCtx) {
        if self.state == VoiceState::Free {
            return;
        }

        let ctx = channel_ctx.with_note(self.note, self.velocity);

        if std::mem::take(&mut self.pending_note_on) {
            self.graph.note_on(&ctx);
        }
        if std::mem::take(&mut self.pending_note_off) {
            self.graph.note_off(&ctx);
        }

        let frames = &mut scratch[..out.len()];
        frames.fill(0.0);
        self.graph.render_block(frames, &ctx);

        let amplitude = self.velocity as f32 / 127.0;
        for (o, s) in out.iter_mut().zip(frames.iter()) {
            *o += s * amplitude;
        }

        if self.state == VoiceState::Releasing && !self.graph.is_active() {
            self.free();
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    /// Note this voice is bound to, if it is sounding.
    pub fn bound_note(&self) -> Option<u8> {
        self.is_playing().then_some(self.note)
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.note = 0;
        self.velocity = 0;
        self.pending_note_on = false;
        self.pending_note_off = false;
    }

    /// Free the slot and return the patch to its initial state.
    pub fn reset(&mut self) {
        self.free();
        self.graph.reset();
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn graph(&self) -> &T {
        &self.graph
    }
}
