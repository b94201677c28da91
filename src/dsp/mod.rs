//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Gain, pan law and pitch conversions shared by channels and voices.
pub mod math;
/// Phase-accumulator oscillator waveforms.
pub mod oscillator;

pub use envelope::EnvelopeState;
