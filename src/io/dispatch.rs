//! Event-context entry point: raw MIDI bytes in, engine messages out.
//!
//! [`MidiDispatcher`] runs wherever MIDI arrives (a driver callback, a UI
//! thread, a test). It decodes each message, optionally logs it, and forwards
//! it to an [`EventSink`]. The first message also brings up the audio session
//! through [`SessionHook`], for hosts that only allow audio output to start
//! after some user interaction.

#[cfg(feature = "rtrb")]
use rtrb::Producer;

use crate::{config::SynthConfig, io::midi::MidiEvent, synth::message::SynthMessage};

/// Deferred audio-session bring-up. Called at most once per dispatcher.
pub trait SessionHook {
    fn bring_up(&mut self);
}

/// For engines whose audio output is driven by someone else (tests, offline
/// rendering, a host that already owns the device).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSession;

impl SessionHook for NoSession {
    fn bring_up(&mut self) {}
}

/// Where decoded messages go.
pub trait EventSink {
    fn send(&mut self, message: SynthMessage);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn send(&mut self, message: SynthMessage) {
        (**self).send(message)
    }
}

#[cfg(feature = "rtrb")]
impl EventSink for Producer<SynthMessage> {
    fn send(&mut self, message: SynthMessage) {
        if let Err(err) = self.push(message) {
            log::warn!("message queue full, dropping {:?}", err);
        }
    }
}

pub struct MidiDispatcher<S, H = NoSession> {
    sink: S,
    session: H,
    session_started: bool,
    verbose: bool,
}

impl<S: EventSink> MidiDispatcher<S, NoSession> {
    pub fn new(sink: S) -> Self {
        Self::with_session(sink, NoSession)
    }
}

impl<S: EventSink, H: SessionHook> MidiDispatcher<S, H> {
    pub fn with_session(sink: S, session: H) -> Self {
        Self {
            sink,
            session,
            session_started: false,
            verbose: false,
        }
    }

    pub fn from_config(config: &SynthConfig, sink: S, session: H) -> Self {
        Self::with_session(sink, session).verbose(config.verbose)
    }

    /// Log every recognized message at `debug` level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Decode and forward one message. Never fails: anything the engine does
    /// not understand is dropped.
    pub fn process_message(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }

        self.start_session();

        let Some(event) = MidiEvent::decode(data) else {
            return;
        };

        if self.verbose {
            log::debug!("{event}");
        }

        self.sink.send(SynthMessage::Midi(event));
    }

    /// Forward an already-decoded event, skipping the byte decoder.
    pub fn dispatch(&mut self, event: MidiEvent) {
        self.start_session();
        if self.verbose {
            log::debug!("{event}");
        }
        self.sink.send(SynthMessage::Midi(event));
    }

    /// Ask the render context to reinitialize every channel.
    pub fn reset(&mut self) {
        log::debug!("resetting synthesizer");
        self.sink.send(SynthMessage::Reset);
    }

    /// Bring the audio session up now instead of waiting for the first
    /// message. Idempotent.
    pub fn start_session(&mut self) {
        if !self.session_started {
            self.session_started = true;
            log::debug!("initializing audio session");
            self.session.bring_up();
        }
    }

    pub fn session_started(&self) -> bool {
        self.session_started
    }

    pub fn session(&self) -> &H {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut H {
        &mut self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_parts(self) -> (S, H) {
        (self.sink, self.session)
    }
}
