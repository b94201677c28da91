use crate::{
    dsp::math::{channel_gain, pan_gains},
    graph::node::{GraphNode, RenderCtx},
    synth::{factory::VoiceFactory, pool::VoicePool, voice::Voice},
    MAX_BLOCK_SIZE,
};

/// General MIDI controller defaults.
pub const DEFAULT_VOLUME: u8 = 100;
pub const DEFAULT_PAN: u8 = 64;
pub const DEFAULT_EXPRESSION: u8 = 127;

/// Semitones of pitch bend at full deflection.
pub const PITCH_BEND_RANGE: f32 = 2.0;

const NOTE_COUNT: usize = 128;

/// One MIDI channel: performance controllers, key state, and a voice pool.
///
/// Every operation is O(pool size) at most and never allocates. Notes above
/// 127 are ignored.
pub struct Channel<T: GraphNode> {
    id: u8,

    volume: u8,
    pan: u8,
    expression: u8,
    damper_pedal: bool,
    pitch_bend: f32,
    modulation_wheel: f32,

    /// Last explicit on/off per note. `None` = never touched since reset.
    key_state: [Option<bool>; NOTE_COUNT],

    pool: VoicePool<T>,

    channel_buffer: Vec<f32>,
    voice_buffer: Vec<f32>,
}

impl<T: GraphNode> Channel<T> {
    pub fn new<F: VoiceFactory<Voice = T>>(id: u8, factory: &F) -> Self {
        Self {
            id,
            volume: DEFAULT_VOLUME,
            pan: DEFAULT_PAN,
            expression: DEFAULT_EXPRESSION,
            damper_pedal: false,
            pitch_bend: 0.0,
            modulation_wheel: 0.0,
            key_state: [None; NOTE_COUNT],
            pool: VoicePool::new(factory),
            channel_buffer: vec![0.0; MAX_BLOCK_SIZE],
            voice_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Reinitialize controllers, key state and voices in place.
    pub fn reset(&mut self) {
        self.volume = DEFAULT_VOLUME;
        self.pan = DEFAULT_PAN;
        self.expression = DEFAULT_EXPRESSION;
        self.damper_pedal = false;
        self.pitch_bend = 0.0;
        self.modulation_wheel = 0.0;
        self.key_state = [None; NOTE_COUNT];
        self.pool.reset();
        self.channel_buffer.fill(0.0);
        self.voice_buffer.fill(0.0);
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) {
        let Some(key) = self.key_state.get_mut(note as usize) else {
            return;
        };
        *key = Some(true);

        // one sounding voice per pitch
        self.pool.release_note(note);
        // a full pool drops the note
        let _ = self.pool.allocate(note, velocity);
    }

    pub fn note_off(&mut self, note: u8, _velocity: u8) {
        let Some(key) = self.key_state.get_mut(note as usize) else {
            return;
        };
        *key = Some(false);

        if self.damper_pedal {
            return;
        }

        self.pool.release_note(note);
    }

    pub fn all_notes_off(&mut self) {
        self.pool.release_all();
    }

    pub fn damper_pedal_on(&mut self) {
        self.damper_pedal = true;
    }

    /// Releases voices whose key is recorded as up. Voices on notes with no
    /// key state entry keep sounding.
    pub fn damper_pedal_off(&mut self) {
        self.damper_pedal = false;

        let key_state = &self.key_state;
        self.pool
            .release_where(|note| key_state.get(note as usize).copied().flatten() == Some(false));
    }

    /// Reserved. Every channel plays the patch it was built with.
    pub fn program_change(&mut self, _program: u8) {}

    /// `bend` is the centered 14-bit value (-8192..=8191).
    pub fn set_pitch_bend(&mut self, bend: i16) {
        self.pitch_bend = bend as f32 * PITCH_BEND_RANGE / 8192.0;
    }

    pub fn set_modulation_wheel(&mut self, wheel: u8) {
        self.modulation_wheel = wheel as f32 / 127.0;
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume;
    }

    pub fn set_pan(&mut self, pan: u8) {
        self.pan = pan;
    }

    pub fn set_expression(&mut self, expression: u8) {
        self.expression = expression;
    }

    /// Mix this channel into `left`/`right`, adding to what is already there.
    ///
    /// At most [`MAX_BLOCK_SIZE`] frames are rendered per call; frames past
    /// that (or past the shorter buffer) are left untouched.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32], sample_rate: f32) {
        let frames = left.len().min(right.len()).min(MAX_BLOCK_SIZE);

        let mix = &mut self.channel_buffer[..frames];
        mix.fill(0.0);

        let ctx = RenderCtx::channel(sample_rate, self.pitch_bend, self.modulation_wheel);
        self.pool
            .render(mix, &mut self.voice_buffer[..frames], &ctx);

        let gain = channel_gain(self.volume, self.expression);
        let (gain_l, gain_r) = pan_gains(gain, self.pan);

        for ((l, r), s) in left.iter_mut().zip(right.iter_mut()).zip(mix.iter()) {
            *l += s * gain_l;
            *r += s * gain_r;
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn pan(&self) -> u8 {
        self.pan
    }

    pub fn expression(&self) -> u8 {
        self.expression
    }

    pub fn damper_pedal(&self) -> bool {
        self.damper_pedal
    }

    /// Pitch bend in semitones.
    pub fn pitch_bend(&self) -> f32 {
        self.pitch_bend
    }

    pub fn modulation_wheel(&self) -> f32 {
        self.modulation_wheel
    }

    /// Last explicit on (`true`) / off (`false`) for `note`, if any.
    pub fn key_state(&self, note: u8) -> Option<bool> {
        self.key_state.get(note as usize).copied().flatten()
    }

    pub fn voices(&self) -> &[Voice<T>] {
        self.pool.voices()
    }

    /// Voices held or releasing.
    pub fn active_voice_count(&self) -> usize {
        self.pool.playing_count()
    }

    /// Voices held on `note` (not yet released).
    pub fn held_voice_count(&self, note: u8) -> usize {
        self.pool.held_count(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{voices, VOICE_COUNT};

    const SAMPLE_RATE: f32 = 44_100.0;

    fn channel() -> Channel<voices::DefaultVoice> {
        Channel::new(0, &voices::chip)
    }

    fn render(channel: &mut Channel<voices::DefaultVoice>, frames: usize) -> (Vec<f32>, Vec<f32>) {
        let mut left = vec![0.0; frames];
        let mut right = vec![0.0; frames];
        channel.render(&mut left, &mut right, SAMPLE_RATE);
        (left, right)
    }

    #[test]
    fn general_midi_defaults() {
        let ch = channel();
        assert_eq!(ch.volume(), 100);
        assert_eq!(ch.pan(), 64);
        assert_eq!(ch.expression(), 127);
        assert!(!ch.damper_pedal());
        assert_eq!(ch.pitch_bend(), 0.0);
        assert_eq!(ch.modulation_wheel(), 0.0);
        assert_eq!(ch.key_state(60), None);
    }

    #[test]
    fn retrigger_leaves_one_held_voice_for_every_note() {
        let mut ch = channel();
        for note in 0..=127u8 {
            ch.note_on(note, 90);
            ch.note_on(note, 40);
            assert_eq!(ch.held_voice_count(note), 1, "note {note}");
            ch.all_notes_off();
            ch.reset();
        }
    }

    #[test]
    fn thirty_third_note_is_dropped() {
        let mut ch = channel();
        for note in 40..40 + VOICE_COUNT as u8 {
            ch.note_on(note, 100);
        }
        assert_eq!(ch.active_voice_count(), VOICE_COUNT);

        ch.note_on(100, 100);
        assert_eq!(ch.active_voice_count(), VOICE_COUNT);
        assert_eq!(ch.held_voice_count(100), 0);
        // key state still records the press
        assert_eq!(ch.key_state(100), Some(true));
    }

    #[test]
    fn note_off_releases_bound_voices() {
        let mut ch = channel();
        ch.note_on(60, 100);
        ch.note_off(60, 0);

        assert_eq!(ch.key_state(60), Some(false));
        assert_eq!(ch.held_voice_count(60), 0);
    }

    #[test]
    fn damper_pedal_sustains_until_released() {
        let mut ch = channel();
        ch.damper_pedal_on();
        ch.note_on(60, 100);
        ch.note_on(64, 100);
        ch.note_off(60, 0);

        assert_eq!(ch.held_voice_count(60), 1, "pedal holds the released key");
        let (left, _) = render(&mut ch, 256);
        assert!(left.iter().any(|&s| s.abs() > 0.0));

        ch.damper_pedal_off();
        assert_eq!(ch.held_voice_count(60), 0);
        assert_eq!(ch.held_voice_count(64), 1, "key still down keeps sounding");
    }

    #[test]
    fn damper_pedal_off_spares_notes_without_key_state() {
        let mut ch = channel();
        ch.note_on(60, 100);
        // Simulate a voice that was started without a recorded key press
        ch.key_state[60] = None;
        ch.damper_pedal_on();
        ch.damper_pedal_off();

        assert_eq!(ch.held_voice_count(60), 1);
    }

    #[test]
    fn all_notes_off_ignores_pedal() {
        let mut ch = channel();
        ch.damper_pedal_on();
        ch.note_on(60, 100);
        ch.note_on(67, 100);

        ch.all_notes_off();

        assert_eq!(ch.held_voice_count(60), 0);
        assert_eq!(ch.held_voice_count(67), 0);
        assert!(ch.damper_pedal());
    }

    #[test]
    fn controller_setters_scale_like_midi() {
        let mut ch = channel();
        ch.set_pitch_bend(8191);
        assert!((ch.pitch_bend() - 2.0 * 8191.0 / 8192.0).abs() < 1e-6);
        ch.set_pitch_bend(-8192);
        assert_eq!(ch.pitch_bend(), -2.0);
        ch.set_modulation_wheel(127);
        assert_eq!(ch.modulation_wheel(), 1.0);
        ch.set_volume(10);
        ch.set_pan(0);
        ch.set_expression(50);
        assert_eq!((ch.volume(), ch.pan(), ch.expression()), (10, 0, 50));
    }

    #[test]
    fn program_change_is_a_no_op() {
        let mut ch = channel();
        ch.note_on(60, 100);
        ch.program_change(42);
        assert_eq!(ch.held_voice_count(60), 1);
    }

    #[test]
    fn hard_left_pan_silences_right() {
        let mut ch = channel();
        ch.set_pan(0);
        ch.note_on(60, 100);
        let (left, right) = render(&mut ch, 128);

        assert!(left.iter().any(|&s| s.abs() > 0.0));
        assert!(right.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn hard_right_pan_silences_left() {
        let mut ch = channel();
        ch.set_pan(127);
        ch.note_on(60, 100);
        let (left, right) = render(&mut ch, 128);

        assert!(left.iter().all(|&s| s == 0.0));
        assert!(right.iter().any(|&s| s.abs() > 0.0));
    }

    #[test]
    fn centered_channel_is_identical_on_both_sides() {
        let mut ch = channel();
        ch.note_on(60, 100);
        let (left, right) = render(&mut ch, 128);
        assert_eq!(left, right);
    }

    #[test]
    fn render_adds_to_existing_content() {
        let mut silent = channel();
        let mut left = vec![0.5; 64];
        let mut right = vec![-0.5; 64];
        silent.render(&mut left, &mut right, SAMPLE_RATE);

        assert!(left.iter().all(|&s| s == 0.5));
        assert!(right.iter().all(|&s| s == -0.5));
    }

    #[test]
    fn zero_volume_is_silent() {
        let mut ch = channel();
        ch.set_volume(0);
        ch.note_on(60, 100);
        let (left, right) = render(&mut ch, 128);
        assert!(left.iter().chain(&right).all(|&s| s == 0.0));
    }

    #[test]
    fn oversized_request_is_clamped_to_scratch_capacity() {
        let mut ch = channel();
        ch.note_on(60, 127);
        let mut left = vec![7.0; MAX_BLOCK_SIZE + 10];
        let mut right = vec![7.0; MAX_BLOCK_SIZE + 10];
        ch.render(&mut left, &mut right, SAMPLE_RATE);

        assert!(left[MAX_BLOCK_SIZE..].iter().all(|&s| s == 7.0));
        assert!(left[..MAX_BLOCK_SIZE].iter().any(|&s| s != 7.0));
    }

    #[test]
    fn reset_restores_defaults_and_frees_voices() {
        let mut ch = channel();
        ch.set_volume(3);
        ch.set_pan(0);
        ch.damper_pedal_on();
        ch.set_pitch_bend(4000);
        ch.note_on(60, 100);

        ch.reset();

        assert_eq!(ch.volume(), DEFAULT_VOLUME);
        assert_eq!(ch.pan(), DEFAULT_PAN);
        assert!(!ch.damper_pedal());
        assert_eq!(ch.pitch_bend(), 0.0);
        assert_eq!(ch.active_voice_count(), 0);
        assert_eq!(ch.key_state(60), None);
    }
}
