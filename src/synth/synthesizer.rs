#[cfg(feature = "rtrb")]
use rtrb::Producer;

use crate::{
    graph::node::GraphNode,
    io::{
        dispatch::EventSink,
        midi::{Controller, MidiEvent},
    },
    synth::{
        channel::Channel,
        factory::VoiceFactory,
        message::{MessageReceiver, SynthMessage},
    },
    voices, CHANNEL_COUNT, MAX_BLOCK_SIZE,
};

/*
Render Orchestrator
===================

Owns the 16 channels for its whole lifetime and is the only thing the audio
callback talks to.

Two contexts touch the engine:

  event context    MIDI arrives at arbitrary times (driver thread, UI, test).
                   It only ever pushes SynthMessages into a wait-free queue.

  render context   The audio callback, once per block, on a realtime thread.
                   It drains the queue, applies every message to the
                   channels, then renders. Nothing here allocates or locks.

    MIDI bytes ─→ MidiDispatcher ─→ rtrb queue ─→ Synthesizer::render
                                                    │  drain + apply
                                                    │  zero master L/R
                                                    └→ channel 0, 1, ..., 15

Every message pushed before a render call starts is applied by that call,
before any audio is produced.

Channels are mixed in ascending id order. Floating-point addition is not
associative, so a fixed order is what makes output bit-identical across runs
for the same event sequence.

When the queue is not needed (single thread, offline rendering, tests), the
synthesizer is itself an EventSink and can be driven directly.
*/

pub struct Synthesizer<T: GraphNode> {
    channels: [Channel<T>; CHANNEL_COUNT],
    receiver: Option<Box<dyn MessageReceiver + Send>>,
    stage_l: Vec<f32>,
    stage_r: Vec<f32>,
}

impl Synthesizer<voices::DefaultVoice> {
    /// All channels play [`voices::chip`].
    pub fn with_default_voices() -> Self {
        Self::new(&voices::chip)
    }
}

impl<T: GraphNode> Synthesizer<T> {
    pub fn new<F: VoiceFactory<Voice = T>>(factory: &F) -> Self {
        Self {
            channels: std::array::from_fn(|id| Channel::new(id as u8, factory)),
            receiver: None,
            stage_l: vec![0.0; MAX_BLOCK_SIZE],
            stage_r: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Build a synthesizer fed by a fresh message queue. The producer goes to
    /// the event context (usually wrapped in a `MidiDispatcher`).
    #[cfg(feature = "rtrb")]
    pub fn with_queue<F: VoiceFactory<Voice = T>>(
        factory: &F,
        capacity: usize,
    ) -> (Self, Producer<SynthMessage>) {
        let (tx, rx) = crate::synth::message::message_queue(capacity);
        let mut synth = Self::new(factory);
        synth.attach_receiver(rx);
        (synth, tx)
    }

    /// Messages from `receiver` are applied at the start of every render.
    pub fn attach_receiver(&mut self, receiver: impl MessageReceiver + Send + 'static) {
        self.receiver = Some(Box::new(receiver));
    }

    pub fn detach_receiver(&mut self) -> Option<Box<dyn MessageReceiver + Send>> {
        self.receiver.take()
    }

    /// Reinitialize every channel and voice in place.
    pub fn reset(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.reset();
        }
    }

    pub fn handle_message(&mut self, message: SynthMessage) {
        match message {
            SynthMessage::Midi(event) => self.handle_event(event),
            SynthMessage::Reset => self.reset(),
        }
    }

    pub fn handle_event(&mut self, event: MidiEvent) {
        let channel = &mut self.channels[(event.channel() & 0x0F) as usize];

        match event {
            MidiEvent::NoteOn { note, velocity, .. } => channel.note_on(note, velocity),
            MidiEvent::NoteOff { note, velocity, .. } => channel.note_off(note, velocity),
            MidiEvent::ProgramChange { program, .. } => channel.program_change(program),
            MidiEvent::PitchBend { value, .. } => channel.set_pitch_bend(value),
            MidiEvent::ControlChange {
                controller, value, ..
            } => match Controller::from_number(controller) {
                Some(Controller::ModulationWheel) => channel.set_modulation_wheel(value),
                Some(Controller::Volume) => channel.set_volume(value),
                Some(Controller::Pan) => channel.set_pan(value),
                Some(Controller::Expression) => channel.set_expression(value),
                Some(Controller::DamperPedal) if value >= 64 => channel.damper_pedal_on(),
                Some(Controller::DamperPedal) => channel.damper_pedal_off(),
                Some(Controller::AllNotesOff) if value == 0 => channel.all_notes_off(),
                Some(Controller::AllNotesOff) | None => {}
            },
        }
    }

    /// Apply every queued message without rendering.
    pub fn drain_messages(&mut self) {
        if let Some(mut receiver) = self.receiver.take() {
            while let Some(message) = receiver.pop() {
                self.handle_message(message);
            }
            self.receiver = Some(receiver);
        }
    }

    /// Overwrite `left` and `right` with the next block.
    ///
    /// Requests longer than [`MAX_BLOCK_SIZE`] are rendered in consecutive
    /// chunks. If the buffers differ in length, only the common prefix gets
    /// audio; the tail of the longer one is zeroed.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32], sample_rate: f32) {
        self.drain_messages();
        Self::render_channels(&mut self.channels, left, right, sample_rate);
    }

    /// Render into an interleaved device buffer with `channels` samples per frame.
    ///
    /// Left and right go to the first two device channels; a mono device gets
    /// their average and any further channels are zeroed.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize, sample_rate: f32) {
        self.drain_messages();

        if channels == 0 {
            out.fill(0.0);
            return;
        }

        let total_frames = out.len() / channels;
        out[total_frames * channels..].fill(0.0);

        let mut frames_written = 0;
        while frames_written < total_frames {
            let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            let left = &mut self.stage_l[..frames];
            let right = &mut self.stage_r[..frames];
            Self::render_channels(&mut self.channels, left, right, sample_rate);

            let start = frames_written * channels;
            let block = &mut out[start..start + frames * channels];
            for ((frame, &l), &r) in block
                .chunks_exact_mut(channels)
                .zip(left.iter())
                .zip(right.iter())
            {
                if channels == 1 {
                    frame[0] = (l + r) * 0.5;
                } else {
                    frame[0] = l;
                    frame[1] = r;
                    frame[2..].fill(0.0);
                }
            }

            frames_written += frames;
        }
    }

    fn render_channels(
        channels: &mut [Channel<T>],
        left: &mut [f32],
        right: &mut [f32],
        sample_rate: f32,
    ) {
        left.fill(0.0);
        right.fill(0.0);

        let frames = left.len().min(right.len());
        let chunks_l = left[..frames].chunks_mut(MAX_BLOCK_SIZE);
        let chunks_r = right[..frames].chunks_mut(MAX_BLOCK_SIZE);

        for (chunk_l, chunk_r) in chunks_l.zip(chunks_r) {
            for channel in channels.iter_mut() {
                channel.render(chunk_l, chunk_r, sample_rate);
            }
        }
    }

    pub fn channel(&self, id: usize) -> Option<&Channel<T>> {
        self.channels.get(id)
    }

    pub fn channel_mut(&mut self, id: usize) -> Option<&mut Channel<T>> {
        self.channels.get_mut(id)
    }

    pub fn channels(&self) -> &[Channel<T>] {
        &self.channels
    }

    /// Voices held or releasing across all channels.
    pub fn active_voice_count(&self) -> usize {
        self.channels.iter().map(Channel::active_voice_count).sum()
    }
}

impl<T: GraphNode> EventSink for Synthesizer<T> {
    fn send(&mut self, message: SynthMessage) {
        self.handle_message(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44_100.0;

    fn note_on(channel: u8, note: u8, velocity: u8) -> MidiEvent {
        MidiEvent::NoteOn {
            channel,
            note,
            velocity,
        }
    }

    fn cc(channel: u8, controller: u8, value: u8) -> MidiEvent {
        MidiEvent::ControlChange {
            channel,
            controller,
            value,
        }
    }

    #[test]
    fn builds_sixteen_channels_in_order() {
        let synth = Synthesizer::with_default_voices();
        assert_eq!(synth.channels().len(), CHANNEL_COUNT);
        for (id, channel) in synth.channels().iter().enumerate() {
            assert_eq!(channel.id() as usize, id);
        }
    }

    #[test]
    fn events_reach_the_addressed_channel() {
        let mut synth = Synthesizer::with_default_voices();
        synth.handle_event(note_on(5, 60, 100));

        assert_eq!(synth.channel(5).unwrap().held_voice_count(60), 1);
        assert_eq!(synth.channel(0).unwrap().active_voice_count(), 0);
    }

    #[test]
    fn control_changes_are_routed() {
        let mut synth = Synthesizer::with_default_voices();
        synth.handle_event(cc(2, 1, 127));
        synth.handle_event(cc(2, 7, 90));
        synth.handle_event(cc(2, 10, 0));
        synth.handle_event(cc(2, 11, 64));
        synth.handle_event(cc(2, 64, 64));

        let ch = synth.channel(2).unwrap();
        assert_eq!(ch.modulation_wheel(), 1.0);
        assert_eq!(ch.volume(), 90);
        assert_eq!(ch.pan(), 0);
        assert_eq!(ch.expression(), 64);
        assert!(ch.damper_pedal());

        synth.handle_event(cc(2, 64, 63));
        assert!(!synth.channel(2).unwrap().damper_pedal());
    }

    #[test]
    fn all_notes_off_controller_requires_zero_value() {
        let mut synth = Synthesizer::with_default_voices();
        synth.handle_event(note_on(0, 60, 100));

        synth.handle_event(cc(0, 123, 1));
        assert_eq!(synth.channel(0).unwrap().held_voice_count(60), 1);

        synth.handle_event(cc(0, 123, 0));
        assert_eq!(synth.channel(0).unwrap().held_voice_count(60), 0);
    }

    #[test]
    fn unknown_controllers_are_ignored() {
        let mut synth = Synthesizer::with_default_voices();
        synth.handle_event(cc(0, 74, 10));
        synth.handle_event(cc(0, 121, 0));

        let ch = synth.channel(0).unwrap();
        assert_eq!(ch.volume(), 100);
        assert_eq!(ch.pan(), 64);
        assert_eq!(ch.expression(), 127);
    }

    #[test]
    fn pitch_bend_is_routed() {
        let mut synth = Synthesizer::with_default_voices();
        synth.handle_event(MidiEvent::PitchBend {
            channel: 3,
            value: 4096,
        });
        assert_eq!(synth.channel(3).unwrap().pitch_bend(), 1.0);
    }

    #[test]
    fn render_overwrites_master_buffers() {
        let mut synth = Synthesizer::with_default_voices();
        let mut left = vec![3.0; 256];
        let mut right = vec![3.0; 256];
        synth.render(&mut left, &mut right, SAMPLE_RATE);

        assert!(left.iter().chain(&right).all(|&s| s == 0.0));
    }

    #[test]
    fn long_requests_are_chunked() {
        let mut synth = Synthesizer::with_default_voices();
        synth.handle_event(note_on(0, 60, 100));

        let frames = MAX_BLOCK_SIZE * 2 + 100;
        let mut left = vec![0.0; frames];
        let mut right = vec![0.0; frames];
        synth.render(&mut left, &mut right, SAMPLE_RATE);

        // note still sustaining in the last chunk
        assert!(left[MAX_BLOCK_SIZE * 2..].iter().any(|&s| s.abs() > 0.0));
    }

    #[test]
    fn mismatched_buffers_zero_the_tail() {
        let mut synth = Synthesizer::with_default_voices();
        synth.handle_event(note_on(0, 60, 100));

        let mut left = vec![9.0; 64];
        let mut right = vec![9.0; 96];
        synth.render(&mut left, &mut right, SAMPLE_RATE);

        assert!(right[64..].iter().all(|&s| s == 0.0));
        assert!(left.iter().any(|&s| s.abs() > 0.0));
    }

    #[test]
    fn interleaved_stereo_matches_planar() {
        let events = [note_on(0, 60, 100), cc(0, 10, 20), note_on(1, 67, 90)];

        let mut planar = Synthesizer::with_default_voices();
        let mut interleaved = Synthesizer::with_default_voices();
        for event in events {
            planar.handle_event(event);
            interleaved.handle_event(event);
        }

        let mut left = vec![0.0; 128];
        let mut right = vec![0.0; 128];
        planar.render(&mut left, &mut right, SAMPLE_RATE);

        let mut out = vec![0.0; 128 * 2];
        interleaved.render_interleaved(&mut out, 2, SAMPLE_RATE);

        for (i, frame) in out.chunks_exact(2).enumerate() {
            assert_eq!(frame[0], left[i]);
            assert_eq!(frame[1], right[i]);
        }
    }

    #[test]
    fn interleaved_zeroes_extra_device_channels() {
        let mut synth = Synthesizer::with_default_voices();
        synth.handle_event(note_on(0, 60, 127));

        let mut out = vec![5.0; 64 * 4 + 1];
        synth.render_interleaved(&mut out, 4, SAMPLE_RATE);

        for frame in out[..256].chunks_exact(4) {
            assert_eq!(frame[2], 0.0);
            assert_eq!(frame[3], 0.0);
        }
        assert_eq!(out[256], 0.0);
    }

    #[test]
    fn reset_message_silences_everything() {
        let mut synth = Synthesizer::with_default_voices();
        synth.handle_event(note_on(0, 60, 100));
        synth.handle_event(note_on(9, 36, 100));
        synth.handle_event(cc(0, 7, 1));

        synth.send(SynthMessage::Reset);

        assert_eq!(synth.active_voice_count(), 0);
        assert_eq!(synth.channel(0).unwrap().volume(), 100);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn queued_messages_apply_before_the_next_block() {
        let (mut synth, mut tx) = Synthesizer::with_queue(&voices::chip, 16);
        tx.push(SynthMessage::Midi(note_on(0, 60, 100))).unwrap();

        assert_eq!(synth.active_voice_count(), 0);

        let mut left = vec![0.0; 128];
        let mut right = vec![0.0; 128];
        synth.render(&mut left, &mut right, SAMPLE_RATE);

        assert_eq!(synth.active_voice_count(), 1);
        assert!(left.iter().any(|&s| s.abs() > 0.0));
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn detached_receiver_is_no_longer_drained() {
        let (mut synth, mut tx) = Synthesizer::with_queue(&voices::chip, 16);
        let receiver = synth.detach_receiver();
        assert!(receiver.is_some());

        tx.push(SynthMessage::Midi(note_on(0, 60, 100))).unwrap();
        let mut left = vec![0.0; 64];
        let mut right = vec![0.0; 64];
        synth.render(&mut left, &mut right, SAMPLE_RATE);
        assert_eq!(synth.active_voice_count(), 0);

        if let Some(receiver) = receiver {
            synth.receiver = Some(receiver);
        }
        synth.render(&mut left, &mut right, SAMPLE_RATE);
        assert_eq!(synth.active_voice_count(), 1);
    }
}
