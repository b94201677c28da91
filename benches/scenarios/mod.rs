//! Real-world scenario benchmarks.
//!
//! These model the engine under load: single patches, a channel with a full
//! voice pool, and all 16 channels at full polyphony.

mod synth;
mod voices;

pub use synth::bench_synth;
pub use voices::bench_voices;
