use crate::{
    graph::node::{GraphNode, RenderCtx},
    synth::{
        factory::VoiceFactory,
        voice::{Voice, VoiceState},
    },
    VOICE_COUNT,
};

/*
Voice Pool
==========

A fixed array of VOICE_COUNT slots, built once and reused for the life of
the engine.

Allocation is linear first-fit: scan slots in ascending index order and take
the first one that is not playing. Slot 0 is always preferred when idle.
There is no voice stealing. When every slot is playing (held or still
releasing), a new note is simply not played.

    slot   0    1    2    3   ...  31
         [C4] [E4] [ -- ] [G4] ... [ -- ]
                     ↑
                     next note_on lands here

The fixed order makes allocation, and therefore rendered output, fully
reproducible for a given event sequence.
*/

pub struct VoicePool<T: GraphNode> {
    voices: [Voice<T>; VOICE_COUNT],
}

impl<T: GraphNode> VoicePool<T> {
    pub fn new<F: VoiceFactory<Voice = T>>(factory: &F) -> Self {
        Self {
            voices: std::array::from_fn(|_| Voice::new(factory.create_voice())),
        }
    }

    /// Start `note` on the first idle slot. Returns the slot index, or `None`
    /// when the pool is full.
    pub fn allocate(&mut self, note: u8, velocity: u8) -> Option<usize> {
        let index = self.voices.iter().position(|v| !v.is_playing())?;
        self.voices[index].play(note, velocity);
        Some(index)
    }

    /// Stop every playing voice bound to `note`.
    pub fn release_note(&mut self, note: u8) {
        self.release_where(|bound| bound == note);
    }

    /// Stop every playing voice whose bound note matches `predicate`.
    pub fn release_where(&mut self, mut predicate: impl FnMut(u8) -> bool) {
        for voice in self.voices.iter_mut() {
            if let Some(note) = voice.bound_note() {
                if predicate(note) {
                    voice.stop();
                }
            }
        }
    }

    /// Stop every playing voice.
    pub fn release_all(&mut self) {
        for voice in self.voices.iter_mut() {
            voice.stop();
        }
    }

    /// Render every slot additively into `out`, in slot order.
    pub fn render(&mut self, out: &mut [f32], scratch: &mut [f32], ctx: &RenderCtx) {
        for voice in self.voices.iter_mut() {
            voice.render(out, scratch, ctx);
        }
    }

    pub fn reset(&mut self) {
        for voice in self.voices.iter_mut() {
            voice.reset();
        }
    }

    /// Voices that are held or releasing.
    pub fn playing_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_playing()).count()
    }

    /// Voices currently held (not yet released) on `note`.
    pub fn held_count(&self, note: u8) -> usize {
        self.voices
            .iter()
            .filter(|v| v.state() == VoiceState::Active && v.note() == note)
            .count()
    }

    pub fn voices(&self) -> &[Voice<T>] {
        &self.voices
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}
