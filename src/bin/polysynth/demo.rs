//! Built-in sequence for trying the engine without a keyboard.

use std::{thread, time::Duration};

use color_eyre::eyre::Result as EyreResult;

use polysynth::io::{
    dispatch::{EventSink, MidiDispatcher, SessionHook},
    midi::{Controller, MidiEvent},
};

const STEP: Duration = Duration::from_millis(250);

fn send<S: EventSink, H: SessionHook>(dispatcher: &mut MidiDispatcher<S, H>, event: MidiEvent) {
    let (bytes, len) = event.to_bytes();
    dispatcher.process_message(&bytes[..len]);
}

fn cc(channel: u8, controller: Controller, value: u8) -> MidiEvent {
    MidiEvent::ControlChange {
        channel,
        controller: controller.number(),
        value,
    }
}

/// Arpeggio on channel 0 swept across the stereo field, a held bass note on
/// channel 1, and a pedal-sustained chord to finish.
pub fn play<S: EventSink, H: SessionHook>(dispatcher: &mut MidiDispatcher<S, H>) -> EyreResult<()> {
    let arpeggio = [60u8, 64, 67, 72, 76, 72, 67, 64];

    send(dispatcher, cc(1, Controller::Volume, 80));
    send(dispatcher, MidiEvent::NoteOn { channel: 1, note: 36, velocity: 100 });

    for (step, &note) in arpeggio.iter().cycle().take(16).enumerate() {
        let pan = (step as u32 * 127 / 15) as u8;
        send(dispatcher, cc(0, Controller::Pan, pan));
        send(dispatcher, MidiEvent::NoteOn { channel: 0, note, velocity: 96 });
        thread::sleep(STEP);
        send(dispatcher, MidiEvent::NoteOff { channel: 0, note, velocity: 0 });
    }

    send(dispatcher, MidiEvent::NoteOff { channel: 1, note: 36, velocity: 0 });

    send(dispatcher, cc(0, Controller::Pan, 64));
    send(dispatcher, cc(0, Controller::DamperPedal, 127));
    for note in [60u8, 64, 67, 71] {
        send(dispatcher, MidiEvent::NoteOn { channel: 0, note, velocity: 90 });
        send(dispatcher, MidiEvent::NoteOff { channel: 0, note, velocity: 0 });
    }
    send(dispatcher, cc(0, Controller::ModulationWheel, 100));
    thread::sleep(STEP * 8);
    send(dispatcher, cc(0, Controller::DamperPedal, 0));
    thread::sleep(STEP * 2);

    Ok(())
}
