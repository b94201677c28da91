#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::io::midi::MidiEvent;

/// What the event context hands to the render context.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SynthMessage {
    Midi(MidiEvent),
    /// Reinitialize every channel and voice in place.
    Reset,
}

impl From<MidiEvent> for SynthMessage {
    fn from(event: MidiEvent) -> Self {
        Self::Midi(event)
    }
}

/// Render-side end of the event queue. `pop` must never block or allocate.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Wait-free single-producer/single-consumer queue between the two contexts.
#[cfg(feature = "rtrb")]
pub fn message_queue(capacity: usize) -> (Producer<SynthMessage>, Consumer<SynthMessage>) {
    RingBuffer::<SynthMessage>::new(capacity.max(1))
}
