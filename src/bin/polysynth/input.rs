//! Live MIDI input through midir.

use std::sync::mpsc;

use color_eyre::eyre::{eyre, Result as EyreResult};
use midir::MidiInput;

use polysynth::io::dispatch::{EventSink, MidiDispatcher, SessionHook};

const CLIENT_NAME: &str = "polysynth";

pub fn list_ports() -> EyreResult<()> {
    let midi_in = MidiInput::new(CLIENT_NAME)?;
    let ports = midi_in.ports();

    if ports.is_empty() {
        println!("No MIDI input ports found");
        return Ok(());
    }

    for (index, port) in ports.iter().enumerate() {
        let name = midi_in
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());
        println!("  [{index}] {name}");
    }
    Ok(())
}

/// Connect to a MIDI port and feed every message to the dispatcher until the
/// port goes away.
///
/// midir calls back on its own thread; messages are forwarded to this thread
/// so the dispatcher (and the audio stream it may create) stay here.
pub fn run<S: EventSink, H: SessionHook>(
    port_index: Option<usize>,
    dispatcher: &mut MidiDispatcher<S, H>,
) -> EyreResult<()> {
    let midi_in = MidiInput::new(CLIENT_NAME)?;
    let ports = midi_in.ports();

    let port_index = port_index.unwrap_or(0);
    let port = ports
        .get(port_index)
        .ok_or_else(|| eyre!("no MIDI input port at index {port_index} (try --list)"))?;
    let port_name = midi_in
        .port_name(port)
        .unwrap_or_else(|_| "Unknown".to_string());

    let (tx, rx) = mpsc::channel::<Vec<u8>>();
    let _connection = midi_in
        .connect(
            port,
            "polysynth-input",
            move |_timestamp, message, _| {
                let _ = tx.send(message.to_vec());
            },
            (),
        )
        .map_err(|err| eyre!("failed to connect to {port_name}: {err}"))?;

    log::info!("listening on {port_name}, press Ctrl+C to stop");

    for message in rx {
        dispatcher.process_message(&message);
    }

    Ok(())
}
