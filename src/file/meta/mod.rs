#![doc = r#"
Meta events (`FF type len data`)

```text
| type | event               | payload          |
|------|---------------------|------------------|
| 0x00 | sequence number     | u16              |
| 0x01 | text ..= 0x09       | bytes            |
| 0x20 | channel prefix      | u8               |
| 0x21 | midi port           | u8               |
| 0x2F | end of track        | -                |
| 0x51 | tempo               | u24 µs / quarter |
| 0x54 | smpte offset        | 5 bytes          |
| 0x58 | time signature      | 4 bytes          |
| 0x59 | key signature       | 2 bytes          |
| 0x7F | sequencer specific  | bytes            |
```

Any other type is kept as [`MetaEvent::Unknown`].
"#]

mod smpte_offset;
pub use smpte_offset::*;

mod signature;
pub use signature::*;

use alloc::{borrow::Cow, vec::Vec};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::file::DiagnosticKind;

/// Tempo assumed until the first tempo event: 120 beats per minute.
pub const DEFAULT_TEMPO: u32 = 500_000;

/// The nine text-carrying meta event kinds
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TextKind {
    Text = 0x01,
    Copyright = 0x02,
    TrackName = 0x03,
    InstrumentName = 0x04,
    Lyric = 0x05,
    Marker = 0x06,
    CuePoint = 0x07,
    ProgramName = 0x08,
    DeviceName = 0x09,
}

/// A decoded meta event.
///
/// Byte payloads borrow the input buffer until [`MetaEvent::into_owned`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaEvent<'a> {
    /// `0x00`
    SequenceNumber(u16),
    /// `0x01..=0x09`. Text is not guaranteed to be valid UTF-8.
    Text {
        /// Which text event
        kind: TextKind,
        /// Raw text bytes
        data: Cow<'a, [u8]>,
    },
    /// `0x20`
    ChannelPrefix(u8),
    /// `0x21`
    MidiPort(u8),
    /// `0x2F`
    EndOfTrack,
    /// `0x51`, microseconds per quarter note
    Tempo(u32),
    /// `0x54`
    SmpteOffset(SmpteOffset),
    /// `0x58`
    TimeSignature(TimeSignature),
    /// `0x59`
    KeySignature(KeySignature),
    /// `0x7F`
    SequencerSpecific(Cow<'a, [u8]>),
    /// Any type not listed above, or a known type with an unusable payload
    Unknown {
        /// The type byte
        kind: u8,
        /// Raw payload
        data: Cow<'a, [u8]>,
    },
}

impl<'a> MetaEvent<'a> {
    /// Decode the payload of a meta event of type `kind`.
    ///
    /// Never fails: unrecognised or malformed payloads become [`MetaEvent::Unknown`],
    /// together with the anomaly to report.
    pub fn decode(kind: u8, data: &'a [u8]) -> (Self, Option<DiagnosticKind>) {
        let invalid = || {
            (
                MetaEvent::Unknown {
                    kind,
                    data: Cow::Borrowed(data),
                },
                Some(DiagnosticKind::InvalidMetaPayload {
                    kind,
                    len: data.len(),
                }),
            )
        };
        let event = match (kind, data) {
            (0x00, &[msb, lsb]) => Self::SequenceNumber(u16::from_be_bytes([msb, lsb])),
            (0x00, _) => return invalid(),
            (0x01..=0x09, _) => match TextKind::try_from(kind) {
                Ok(kind) => Self::Text {
                    kind,
                    data: Cow::Borrowed(data),
                },
                Err(_) => return invalid(),
            },
            (0x20, &[channel]) => Self::ChannelPrefix(channel),
            (0x21, &[port]) => Self::MidiPort(port),
            (0x2F, &[]) => Self::EndOfTrack,
            (0x51, &[a, b, c]) => Self::Tempo(u32::from_be_bytes([0, a, b, c])),
            (0x54, _) => match SmpteOffset::parse(data) {
                Ok(offset) => Self::SmpteOffset(offset),
                Err(_) => return invalid(),
            },
            (0x58, &[numerator, denominator, clocks_per_click, thirty_seconds_per_quarter]) => {
                Self::TimeSignature(TimeSignature {
                    numerator,
                    denominator,
                    clocks_per_click,
                    thirty_seconds_per_quarter,
                })
            }
            (0x59, &[sharps_flats, mode]) => Self::KeySignature(KeySignature {
                sharps_flats: sharps_flats as i8,
                minor: mode != 0,
            }),
            (0x7F, _) => Self::SequencerSpecific(Cow::Borrowed(data)),
            (0x20 | 0x21 | 0x2F | 0x51 | 0x58 | 0x59, _) => return invalid(),
            _ => {
                return (
                    Self::Unknown {
                        kind,
                        data: Cow::Borrowed(data),
                    },
                    Some(DiagnosticKind::UnknownMetaType(kind)),
                );
            }
        };
        (event, None)
    }

    /// The type byte of this event
    pub fn kind(&self) -> u8 {
        match self {
            Self::SequenceNumber(_) => 0x00,
            Self::Text { kind, .. } => (*kind).into(),
            Self::ChannelPrefix(_) => 0x20,
            Self::MidiPort(_) => 0x21,
            Self::EndOfTrack => 0x2F,
            Self::Tempo(_) => 0x51,
            Self::SmpteOffset(_) => 0x54,
            Self::TimeSignature(_) => 0x58,
            Self::KeySignature(_) => 0x59,
            Self::SequencerSpecific(_) => 0x7F,
            Self::Unknown { kind, .. } => *kind,
        }
    }

    /// The payload bytes as they appear in a file
    pub fn payload(&self) -> Cow<'_, [u8]> {
        match self {
            Self::SequenceNumber(n) => Cow::Owned(n.to_be_bytes().to_vec()),
            Self::Text { data, .. }
            | Self::SequencerSpecific(data)
            | Self::Unknown { data, .. } => Cow::Borrowed(&**data),
            Self::ChannelPrefix(b) | Self::MidiPort(b) => Cow::Owned(alloc::vec![*b]),
            Self::EndOfTrack => Cow::Borrowed(&[]),
            Self::Tempo(t) => Cow::Owned(t.to_be_bytes()[1..].to_vec()),
            Self::SmpteOffset(o) => Cow::Owned(o.encode().to_vec()),
            Self::TimeSignature(t) => Cow::Owned(t.encode().to_vec()),
            Self::KeySignature(k) => Cow::Owned(k.encode().to_vec()),
        }
    }

    /// Copies any borrowed bytes so the event no longer borrows the input.
    pub fn into_owned(self) -> MetaEvent<'static> {
        fn owned(data: Cow<'_, [u8]>) -> Cow<'static, [u8]> {
            Cow::Owned(Vec::from(data))
        }
        match self {
            Self::SequenceNumber(n) => MetaEvent::SequenceNumber(n),
            Self::Text { kind, data } => MetaEvent::Text {
                kind,
                data: owned(data),
            },
            Self::ChannelPrefix(c) => MetaEvent::ChannelPrefix(c),
            Self::MidiPort(p) => MetaEvent::MidiPort(p),
            Self::EndOfTrack => MetaEvent::EndOfTrack,
            Self::Tempo(t) => MetaEvent::Tempo(t),
            Self::SmpteOffset(o) => MetaEvent::SmpteOffset(o),
            Self::TimeSignature(t) => MetaEvent::TimeSignature(t),
            Self::KeySignature(k) => MetaEvent::KeySignature(k),
            Self::SequencerSpecific(data) => MetaEvent::SequencerSpecific(owned(data)),
            Self::Unknown { kind, data } => MetaEvent::Unknown {
                kind,
                data: owned(data),
            },
        }
    }
}

#[test]
fn decode_known_meta() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        MetaEvent::decode(0x51, &[0x07, 0xA1, 0x20]),
        (MetaEvent::Tempo(500_000), None)
    );
    assert_eq!(
        MetaEvent::decode(0x03, b"Piano"),
        (
            MetaEvent::Text {
                kind: TextKind::TrackName,
                data: Cow::Borrowed(b"Piano".as_slice())
            },
            None
        )
    );
    assert_eq!(
        MetaEvent::decode(0x21, &[0x02]),
        (MetaEvent::MidiPort(2), None)
    );
    assert_eq!(
        MetaEvent::decode(0x20, &[0x09]),
        (MetaEvent::ChannelPrefix(9), None)
    );
    assert_eq!(
        MetaEvent::decode(0x59, &[0xFD, 0x01]),
        (
            MetaEvent::KeySignature(KeySignature {
                sharps_flats: -3,
                minor: true
            }),
            None
        )
    );
}

#[test]
fn unknown_and_invalid_meta_are_kept() {
    use pretty_assertions::assert_eq;
    let (event, issue) = MetaEvent::decode(0x60, &[1, 2, 3]);
    assert_eq!(event.kind(), 0x60);
    assert_eq!(event.payload().as_ref(), &[1, 2, 3]);
    assert_eq!(issue, Some(DiagnosticKind::UnknownMetaType(0x60)));

    let (event, issue) = MetaEvent::decode(0x51, &[0x07, 0xA1]);
    assert!(matches!(event, MetaEvent::Unknown { kind: 0x51, .. }));
    assert_eq!(
        issue,
        Some(DiagnosticKind::InvalidMetaPayload { kind: 0x51, len: 2 })
    );
}

#[test]
fn payload_matches_decoded_bytes() {
    for (kind, data) in [
        (0x00u8, &[0x00, 0x07][..]),
        (0x2F, &[][..]),
        (0x51, &[0x0F, 0x42, 0x40][..]),
        (0x54, &[0x60, 0x00, 0x00, 0x00, 0x00][..]),
        (0x58, &[6, 3, 24, 8][..]),
        (0x7F, &[0x43, 0x7B, 0x00][..]),
    ] {
        let (event, issue) = MetaEvent::decode(kind, data);
        assert_eq!(issue, None);
        assert_eq!(event.kind(), kind);
        assert_eq!(event.payload().as_ref(), data);
        assert_eq!(event.clone().into_owned(), event);
    }
}
