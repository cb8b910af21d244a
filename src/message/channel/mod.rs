#![doc = r#"
Channel voice messages

A channel voice message is a status byte in `0x80..=0xEF` followed by one or two
data bytes. The high nibble of the status selects the [`VoiceEvent`] kind and the
low nibble the [`Channel`].

```text
| status | kind                 | data bytes          |
|--------|----------------------|---------------------|
| 0x8n   | note off             | note, velocity      |
| 0x9n   | note on              | note, velocity      |
| 0xAn   | polyphonic pressure  | note, pressure      |
| 0xBn   | control change       | controller, value   |
| 0xCn   | program change       | program             |
| 0xDn   | channel pressure     | pressure            |
| 0xEn   | pitch bend           | lsb, msb            |
```
"#]

mod pitch_bend;
pub use pitch_bend::*;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// One of the sixteen MIDI channels.
///
/// `Channel::One` is encoded as `0` in the low nibble of the status byte.
#[allow(missing_docs)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, IntoPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Channel {
    One = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
}

impl Channel {
    /// Channel from the low nibble of a status byte.
    pub fn from_status(status: u8) -> Self {
        // four bits always fit
        Channel::try_from(status & 0x0F).unwrap_or(Channel::One)
    }

    /// The zero-based channel number.
    pub fn index(self) -> u8 {
        self.into()
    }
}

/// The payload of a channel voice message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoiceEvent {
    /// Release a note
    NoteOff {
        /// Key number
        note: u8,
        /// Release velocity
        velocity: u8,
    },
    /// Press a note. A velocity of zero is conventionally a note off.
    NoteOn {
        /// Key number
        note: u8,
        /// Attack velocity
        velocity: u8,
    },
    /// Aftertouch for a single key
    PolyphonicPressure {
        /// Key number
        note: u8,
        /// Pressure amount
        pressure: u8,
    },
    /// Controller change
    ControlChange {
        /// Controller number
        controller: u8,
        /// New controller value
        value: u8,
    },
    /// Select an instrument
    ProgramChange {
        /// Program number
        program: u8,
    },
    /// Aftertouch for the whole channel
    ChannelPressure {
        /// Pressure amount
        pressure: u8,
    },
    /// Pitch wheel position
    PitchBend(PitchBend),
}

impl VoiceEvent {
    /// Number of data bytes following a status byte with this high nibble.
    ///
    /// Returns `None` for anything outside `0x8..=0xE`.
    pub const fn data_len(status: u8) -> Option<usize> {
        match status >> 4 {
            0x8 | 0x9 | 0xA | 0xB | 0xE => Some(2),
            0xC | 0xD => Some(1),
            _ => None,
        }
    }

    /// Build an event from a status byte and its data bytes.
    ///
    /// `data` must contain at least [`VoiceEvent::data_len`] bytes. Returns
    /// `None` if the status is not a channel voice status.
    pub fn from_status_and_data(status: u8, data: &[u8]) -> Option<Self> {
        let first = *data.first()? & 0x7F;
        let second = || data.get(1).map(|b| b & 0x7F);
        let event = match status >> 4 {
            0x8 => Self::NoteOff {
                note: first,
                velocity: second()?,
            },
            0x9 => Self::NoteOn {
                note: first,
                velocity: second()?,
            },
            0xA => Self::PolyphonicPressure {
                note: first,
                pressure: second()?,
            },
            0xB => Self::ControlChange {
                controller: first,
                value: second()?,
            },
            0xC => Self::ProgramChange { program: first },
            0xD => Self::ChannelPressure { pressure: first },
            0xE => Self::PitchBend(PitchBend::from_lsb_msb(first, second()?)),
            _ => return None,
        };
        Some(event)
    }

    /// The high nibble of the status byte, shifted into place (`0x80..=0xE0`).
    pub const fn status_nibble(&self) -> u8 {
        match self {
            Self::NoteOff { .. } => 0x80,
            Self::NoteOn { .. } => 0x90,
            Self::PolyphonicPressure { .. } => 0xA0,
            Self::ControlChange { .. } => 0xB0,
            Self::ProgramChange { .. } => 0xC0,
            Self::ChannelPressure { .. } => 0xD0,
            Self::PitchBend(_) => 0xE0,
        }
    }
}

#[doc = r#"
A fully decoded channel voice message

Running status is a property of the byte stream, not of the message: every
decoded event carries its own channel and kind.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelVoiceEvent {
    channel: Channel,
    event: VoiceEvent,
}

impl ChannelVoiceEvent {
    /// Create a new channel voice event
    pub const fn new(channel: Channel, event: VoiceEvent) -> Self {
        Self { channel, event }
    }

    /// Shorthand for a note on
    pub const fn note_on(channel: Channel, note: u8, velocity: u8) -> Self {
        Self::new(channel, VoiceEvent::NoteOn { note, velocity })
    }

    /// Shorthand for a note off
    pub const fn note_off(channel: Channel, note: u8, velocity: u8) -> Self {
        Self::new(channel, VoiceEvent::NoteOff { note, velocity })
    }

    /// The channel this event is addressed to
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// The kind and payload of the event
    pub const fn event(&self) -> &VoiceEvent {
        &self.event
    }

    /// The status byte that encodes this event
    pub fn status(&self) -> u8 {
        self.event.status_nibble() | self.channel.index()
    }
}

#[test]
fn decode_every_kind() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        VoiceEvent::from_status_and_data(0x83, &[0x3C, 0x10]),
        Some(VoiceEvent::NoteOff {
            note: 0x3C,
            velocity: 0x10
        })
    );
    assert_eq!(
        VoiceEvent::from_status_and_data(0xB0, &[7, 100]),
        Some(VoiceEvent::ControlChange {
            controller: 7,
            value: 100
        })
    );
    assert_eq!(
        VoiceEvent::from_status_and_data(0xC5, &[12]),
        Some(VoiceEvent::ProgramChange { program: 12 })
    );
    assert_eq!(
        VoiceEvent::from_status_and_data(0xD0, &[64]),
        Some(VoiceEvent::ChannelPressure { pressure: 64 })
    );
    assert_eq!(VoiceEvent::from_status_and_data(0x90, &[0x3C]), None);
    assert_eq!(VoiceEvent::from_status_and_data(0xF0, &[0, 0]), None);
}

#[test]
fn status_round_trips_channel() {
    let event = ChannelVoiceEvent::note_on(Channel::Ten, 36, 127);
    assert_eq!(event.status(), 0x99);
    assert_eq!(Channel::from_status(0x99), Channel::Ten);
    assert_eq!(VoiceEvent::data_len(0xC9), Some(1));
    assert_eq!(VoiceEvent::data_len(0x70), None);
}
