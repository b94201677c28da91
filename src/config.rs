//! Engine and session configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default capacity of the event → render message queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Default number of frames the audio session asks the device for per callback.
pub const DEFAULT_SESSION_BLOCK_SIZE: u32 = 1024;

/// Settings shared by the dispatcher, the synthesizer and the audio session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Log every recognized MIDI message at `debug` level.
    pub verbose: bool,
    /// Capacity of the message queue between event and render contexts.
    pub queue_capacity: usize,
    /// Preferred device buffer size in frames. `None` lets the host decide.
    pub block_size: Option<u32>,
}

impl SynthConfig {
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn block_size(mut self, frames: Option<u32>) -> Self {
        self.block_size = frames;
        self
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            block_size: Some(DEFAULT_SESSION_BLOCK_SIZE),
        }
    }
}
