//! Realtime 16-channel polyphonic MIDI synthesizer engine.
//!
//! MIDI bytes go in through [`io::dispatch::MidiDispatcher`], stereo audio
//! comes out of [`synth::synthesizer::Synthesizer::render`]. The two sides can
//! live on different threads and talk through a wait-free ring buffer (the
//! default `rtrb` feature), or share one thread and call the synthesizer
//! directly.
//!
//! ```
//! use polysynth::{io::dispatch::MidiDispatcher, synth::synthesizer::Synthesizer};
//!
//! let mut synth = Synthesizer::with_default_voices();
//! MidiDispatcher::new(&mut synth).process_message(&[0x90, 60, 100]);
//!
//! let mut left = vec![0.0; 128];
//! let mut right = vec![0.0; 128];
//! synth.render(&mut left, &mut right, 44_100.0);
//! assert!(left.iter().any(|s| s.abs() > 0.0));
//! ```

pub mod config;
pub mod dsp;
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod io;
pub mod synth; // Voice management, channels, mixing
pub mod voices;

#[cfg(feature = "cpal")]
pub mod audio;

pub use config::SynthConfig;
pub use error::{Error, Result};

/// Capacity of every engine-private scratch buffer, in samples.
///
/// One `render` call on a channel may request at most this many frames.
pub const MAX_BLOCK_SIZE: usize = 4096;

/// Number of MIDI channels owned by a synthesizer.
pub const CHANNEL_COUNT: usize = 16;

/// Number of voice slots per channel.
pub const VOICE_COUNT: usize = 32;

pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
