// Purpose - external interfaces: MIDI decoding and dispatch

pub mod dispatch;
pub mod midi;
