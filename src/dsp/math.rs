//! Gain, pan and pitch helpers shared by channels and voices.

/*
Channel Gain and the Pan Law
============================

Every channel scales its voice mix by two MIDI controllers and then splits
it into left and right with a third.

Vocabulary
----------

  volume        CC 7, 0..=127. Channel fader. General MIDI default: 100.

  expression    CC 11, 0..=127. A second fader performers ride for dynamics.
                General MIDI default: 127.

  pan           CC 10, 0..=127. Stereo position. 0 = hard left,
                64 = center, 127 = hard right.

  gain          Linear amplitude multiplier applied to the mix:

                    gain = (volume / 127) * (expression / 127)


The Pan Law
-----------

Each side is a clamped straight line over one half of the pan range:

    gain_l = gain * clamped_linear_map(pan, 64, 127, 1, 0)
    gain_r = gain * clamped_linear_map(pan,  0,  64, 0, 1)

    factor
      1.0 ┤━━━━━━━━━━━━━━━━━━━┓  left
          │                    ╲
          │          right      ╲
          │        ╱━━━━━━━━━━━━━━━━━━
          │      ╱
      0.0 ┼────╱────────────────────────→ pan
          0        64             127

  pan =   0  →  (gain, 0)
  pan =  64  →  (gain, gain)     both lines sit at their top
  pan = 127  →  (0, gain)

The left factor only starts falling once pan passes center, and the right
factor is already at full scale by center. A centered channel therefore
reaches both speakers at full gain. This is NOT an equal-power law: there is
no sin/cos curve and no -3 dB dip. Output must match this shape exactly, so
keep the arithmetic in this order.


clamped_linear_map
------------------

    x' = clamp(x, min(x0, x1), max(x0, x1))
    y  = y0 + (x' - x0) * (y1 - y0) / (x1 - x0)

The input is clamped first, so out-of-range controller values pin to the
endpoints instead of extrapolating.
*/

/// Clamp `x` into `[x0, x1]`, then map it linearly onto `[y0, y1]`.
///
/// `x0` and `x1` may be given in either order. A degenerate input range
/// (`x0 == x1`) returns `y0`.
#[inline]
pub fn clamped_linear_map(x: f32, x0: f32, x1: f32, y0: f32, y1: f32) -> f32 {
    if x0 == x1 {
        return y0;
    }
    let x = x.clamp(x0.min(x1), x0.max(x1));
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

/// Combined channel gain from the volume and expression controllers.
#[inline]
pub fn channel_gain(volume: u8, expression: u8) -> f32 {
    (volume as f32 / 127.0) * (expression as f32 / 127.0)
}

/// Left and right gain for a channel, `(gain_l, gain_r)`.
#[inline]
pub fn pan_gains(gain: f32, pan: u8) -> (f32, f32) {
    let pan = pan as f32;
    let gain_l = gain * clamped_linear_map(pan, 64.0, 127.0, 1.0, 0.0);
    let gain_r = gain * clamped_linear_map(pan, 0.0, 64.0, 0.0, 1.0);
    (gain_l, gain_r)
}

/// Convert a (possibly fractional) MIDI note number to Hz. A4 = note 69 = 440 Hz.
#[inline]
pub fn midi_note_to_freq(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}
