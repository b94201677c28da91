use crate::dsp::math::midi_note_to_freq;

/// Context passed to graph nodes during rendering
///
/// Contains information about what to render:
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - note: MIDI note the voice is bound to
/// - frequency: Pitch to render (Hz), already including pitch bend
/// - velocity: Intensity/loudness (0.0-127.0, MIDI-style)
/// - pitch_bend: Channel pitch bend in semitones
/// - modulation: Channel modulation wheel (0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub note: u8,
    pub frequency: f32,
    pub velocity: f32,
    pub pitch_bend: f32,
    pub modulation: f32,
}

impl RenderCtx {
    /// Create context from MIDI note (keyboard/sequencer use case)
    pub fn from_note(sample_rate: f32, note: u8, velocity: f32) -> Self {
        Self {
            sample_rate,
            note,
            frequency: midi_note_to_freq(note as f32),
            velocity,
            pitch_bend: 0.0,
            modulation: 0.0,
        }
    }

    /// Create context from direct frequency (tests, benches, drones)
    pub fn from_freq(sample_rate: f32, frequency: f32, velocity: f32) -> Self {
        Self {
            sample_rate,
            note: 0,
            frequency,
            velocity,
            pitch_bend: 0.0,
            modulation: 0.0,
        }
    }

    /// Channel-wide context: performance controllers, no note yet.
    pub fn channel(sample_rate: f32, pitch_bend: f32, modulation: f32) -> Self {
        Self {
            sample_rate,
            note: 0,
            frequency: 0.0,
            velocity: 0.0,
            pitch_bend,
            modulation,
        }
    }

    /// Bind this context to a note, keeping the channel controllers.
    pub fn with_note(self, note: u8, velocity: u8) -> Self {
        Self {
            note,
            frequency: midi_note_to_freq(note as f32 + self.pitch_bend),
            velocity: velocity as f32,
            ..self
        }
    }
}

/// Core trait for audio processing graph nodes
///
/// Nodes can render audio and respond to musical events
pub trait GraphNode: Send {
    /// Overwrite `out` with this node's signal.
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Triggered when a note starts
    fn note_on(&mut self, _ctx: &RenderCtx) {}

    /// Triggered when a note is released
    fn note_off(&mut self, _ctx: &RenderCtx) {}

    /// Return to the freshly-constructed state.
    fn reset(&mut self) {}

    /// Check if this node is still producing sound
    ///
    /// Used by voice management to know when a voice can be freed.
    fn is_active(&self) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        (**self).note_on(ctx)
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        (**self).note_off(ctx)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
