use std::fmt;

/// Center of the 14-bit pitch bend range.
pub const PITCH_BEND_CENTER: i16 = 8192;

/// A decoded channel-voice message.
///
/// Channels are 0-based (`0..=15`); the Display impl prints them 1-based the
/// way performers read them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    /// Signed bend, -8192 (full down) to +8191 (full up), 0 = center.
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

/// Controllers the engine responds to. Everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controller {
    ModulationWheel,
    Volume,
    Pan,
    Expression,
    DamperPedal,
    AllNotesOff,
}

impl Controller {
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::ModulationWheel),
            7 => Some(Self::Volume),
            10 => Some(Self::Pan),
            11 => Some(Self::Expression),
            64 => Some(Self::DamperPedal),
            123 => Some(Self::AllNotesOff),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Self::ModulationWheel => 1,
            Self::Volume => 7,
            Self::Pan => 10,
            Self::Expression => 11,
            Self::DamperPedal => 64,
            Self::AllNotesOff => 123,
        }
    }
}

impl MidiEvent {
    /// Decode one message: a status byte followed by its data bytes.
    ///
    /// Returns `None` for anything the engine does not handle: empty input, a
    /// zero or non-status first byte, system messages, kinds other than note
    /// on/off, control change, program change and pitch bend, too few data
    /// bytes, or data bytes with the high bit set. Trailing bytes are ignored.
    pub fn decode(data: &[u8]) -> Option<Self> {
        let (&status, data) = data.split_first()?;
        if status & 0x80 == 0 {
            return None;
        }

        let channel = status & 0x0F;
        let byte = |index: usize| data.get(index).copied().filter(|b| b & 0x80 == 0);

        match status >> 4 {
            0x9 => Some(Self::NoteOn {
                channel,
                note: byte(0)?,
                velocity: byte(1)?,
            }),
            0x8 => Some(Self::NoteOff {
                channel,
                note: byte(0)?,
                velocity: byte(1)?,
            }),
            0xB => Some(Self::ControlChange {
                channel,
                controller: byte(0)?,
                value: byte(1)?,
            }),
            0xC => Some(Self::ProgramChange {
                channel,
                program: byte(0)?,
            }),
            0xE => {
                let lsb = byte(0)? as i16;
                let msb = byte(1)? as i16;
                Some(Self::PitchBend {
                    channel,
                    value: ((msb << 7) | lsb) - PITCH_BEND_CENTER,
                })
            }
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            Self::NoteOn { channel, .. }
            | Self::NoteOff { channel, .. }
            | Self::ControlChange { channel, .. }
            | Self::PitchBend { channel, .. }
            | Self::ProgramChange { channel, .. } => channel,
        }
    }

    /// Encode back to wire bytes. Returns the buffer and how many bytes are used.
    pub fn to_bytes(&self) -> ([u8; 3], usize) {
        match *self {
            Self::NoteOn {
                channel,
                note,
                velocity,
            } => ([0x90 | channel, note, velocity], 3),
            Self::NoteOff {
                channel,
                note,
                velocity,
            } => ([0x80 | channel, note, velocity], 3),
            Self::ControlChange {
                channel,
                controller,
                value,
            } => ([0xB0 | channel, controller, value], 3),
            Self::ProgramChange { channel, program } => ([0xC0 | channel, program, 0], 2),
            Self::PitchBend { channel, value } => {
                let raw = (i32::from(value) + i32::from(PITCH_BEND_CENTER)).clamp(0, 0x3FFF) as u16;
                ([0xE0 | channel, (raw & 0x7F) as u8, (raw >> 7) as u8], 3)
            }
        }
    }
}

impl fmt::Display for MidiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = self.channel() + 1;
        match *self {
            Self::NoteOn { note, velocity, .. } => {
                write!(f, "Ch. {ch} Note On  note: {note} velocity: {velocity}")
            }
            Self::NoteOff { note, velocity, .. } => {
                write!(f, "Ch. {ch} Note Off note: {note} velocity: {velocity}")
            }
            Self::ProgramChange { program, .. } => write!(f, "Ch. {ch} Program Change: {program}"),
            Self::PitchBend { value, .. } => write!(f, "Ch. {ch} Pitch bend: {value}"),
            Self::ControlChange {
                controller, value, ..
            } => match Controller::from_number(controller) {
                Some(Controller::ModulationWheel) => {
                    write!(f, "Ch. {ch} Modulation Wheel: {value}")
                }
                Some(Controller::Volume) => write!(f, "Ch. {ch} Channel Volume: {value}"),
                Some(Controller::Pan) => write!(f, "Ch. {ch} Pan: {value}"),
                Some(Controller::Expression) => {
                    write!(f, "Ch. {ch} Expression Controller: {value}")
                }
                Some(Controller::DamperPedal) if value >= 64 => {
                    write!(f, "Ch. {ch} Damper Pedal On")
                }
                Some(Controller::DamperPedal) => write!(f, "Ch. {ch} Damper Pedal Off"),
                Some(Controller::AllNotesOff) => write!(f, "Ch. {ch} All Notes Off"),
                None => write!(f, "Ch. {ch} Control Change {controller}: {value}"),
            },
        }
    }
}
