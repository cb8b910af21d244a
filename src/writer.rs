#![doc = r#"
Encoding of Standard MIDI Files

The reverse of [`MidiFile::parse`](crate::file::MidiFile::parse): a
[`TrackWriter`] builds one `MTrk` payload from delta times and messages, and a
[`FileWriter`] wraps a header and a set of track payloads into a file.

# Example
```rust
# use smfplay::prelude::*;
let mut track = TrackWriter::new().running_status(true);
track.push(0, &ChannelVoiceEvent::note_on(Channel::Two, 64, 90).into()).unwrap();
track.push(96, &ChannelVoiceEvent::note_on(Channel::Two, 64, 0).into()).unwrap();
track.end_of_track(0).unwrap();
// the second event reuses the status byte
assert_eq!(
    track.finish(),
    [0x00, 0x91, 64, 90, 0x60, 64, 0, 0x00, 0xFF, 0x2F, 0x00]
);
```
"#]

use alloc::vec::Vec;
use thiserror::Error;

use crate::{
    file::{
        FileHeader, Format, MetaEvent, TimeDivision,
        builder::chunk::{HEADER_TAG, TRACK_TAG},
    },
    message::{TrackMessage, VoiceEvent},
    reader::MAX_VARIABLE_LENGTH,
};

/// A value that cannot be represented in a file
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WriteError {
    /// Delta times and lengths are limited to 28 bits
    #[error("{0} does not fit in a variable-length quantity")]
    VariableLengthOverflow(usize),
    /// A chunk payload over 4 GiB
    #[error("Chunk of {0} bytes exceeds the 32 bit length field")]
    ChunkTooLarge(usize),
    /// More than 65535 tracks
    #[error("{0} tracks exceed the 16 bit track count")]
    TooManyTracks(usize),
}

/// Append `value` as a variable-length quantity.
pub fn write_variable_length(value: usize, out: &mut Vec<u8>) -> Result<(), WriteError> {
    if value > MAX_VARIABLE_LENGTH as usize {
        return Err(WriteError::VariableLengthOverflow(value));
    }
    let mut shift = 21;
    while shift > 0 && value >> shift == 0 {
        shift -= 7;
    }
    while shift > 0 {
        out.push(((value >> shift) & 0x7F) as u8 | 0x80);
        shift -= 7;
    }
    out.push((value & 0x7F) as u8);
    Ok(())
}

/// Encodes the events of one track chunk.
#[derive(Debug, Clone, Default)]
pub struct TrackWriter {
    bytes: Vec<u8>,
    use_running_status: bool,
    running_status: Option<u8>,
}

impl TrackWriter {
    /// An empty track that writes every status byte
    pub fn new() -> Self {
        Self::default()
    }

    /// Omit repeated channel status bytes
    pub fn running_status(mut self, enabled: bool) -> Self {
        self.use_running_status = enabled;
        self
    }

    /// Append a message `delta` ticks after the previous one.
    pub fn push(&mut self, delta: u32, message: &TrackMessage<'_>) -> Result<(), WriteError> {
        write_variable_length(delta as usize, &mut self.bytes)?;
        match message {
            TrackMessage::ChannelVoice(event) => {
                let status = event.status();
                if !(self.use_running_status && self.running_status == Some(status)) {
                    self.bytes.push(status);
                }
                self.running_status = Some(status);
                match *event.event() {
                    VoiceEvent::NoteOff { note, velocity } | VoiceEvent::NoteOn { note, velocity } => {
                        self.bytes.extend([note & 0x7F, velocity & 0x7F]);
                    }
                    VoiceEvent::PolyphonicPressure { note, pressure } => {
                        self.bytes.extend([note & 0x7F, pressure & 0x7F]);
                    }
                    VoiceEvent::ControlChange { controller, value } => {
                        self.bytes.extend([controller & 0x7F, value & 0x7F]);
                    }
                    VoiceEvent::ProgramChange { program } => self.bytes.push(program & 0x7F),
                    VoiceEvent::ChannelPressure { pressure } => self.bytes.push(pressure & 0x7F),
                    VoiceEvent::PitchBend(bend) => self.bytes.extend([bend.lsb(), bend.msb()]),
                }
            }
            TrackMessage::SystemExclusive(sysex) => {
                // strict readers cancel running status here
                self.running_status = None;
                self.bytes.push(sysex.status());
                write_variable_length(sysex.data().len(), &mut self.bytes)?;
                self.bytes.extend_from_slice(sysex.data());
            }
            TrackMessage::Meta(meta) => {
                self.running_status = None;
                let payload = meta.payload();
                self.bytes.extend([0xFF, meta.kind()]);
                write_variable_length(payload.len(), &mut self.bytes)?;
                self.bytes.extend_from_slice(&payload);
            }
        }
        Ok(())
    }

    /// Append the end-of-track marker
    pub fn end_of_track(&mut self, delta: u32) -> Result<(), WriteError> {
        self.push(delta, &TrackMessage::Meta(MetaEvent::EndOfTrack))
    }

    /// The encoded payload, without the chunk header
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Assembles a header and track payloads into a file.
#[derive(Debug, Clone)]
pub struct FileWriter {
    format: Format,
    division: TimeDivision,
    tracks: Vec<Vec<u8>>,
}

impl FileWriter {
    /// A file with no tracks yet
    pub fn new(format: Format, division: TimeDivision) -> Self {
        Self {
            format,
            division,
            tracks: Vec::new(),
        }
    }

    /// Add a track payload, as returned by [`TrackWriter::finish`]
    pub fn track(mut self, payload: Vec<u8>) -> Self {
        self.tracks.push(payload);
        self
    }

    /// Encode the file
    pub fn finish(self) -> Result<Vec<u8>, WriteError> {
        let count = self.tracks.len();
        let track_count = u16::try_from(count).map_err(|_| WriteError::TooManyTracks(count))?;
        let header = FileHeader::new(self.format, track_count, self.division);

        let mut out = Vec::with_capacity(
            14 + self.tracks.iter().map(|t| t.len() + 8).sum::<usize>(),
        );
        write_chunk(HEADER_TAG, &header.encode(), &mut out)?;
        for track in &self.tracks {
            write_chunk(TRACK_TAG, track, &mut out)?;
        }
        Ok(out)
    }
}

fn write_chunk(tag: [u8; 4], payload: &[u8], out: &mut Vec<u8>) -> Result<(), WriteError> {
    let len = u32::try_from(payload.len()).map_err(|_| WriteError::ChunkTooLarge(payload.len()))?;
    out.extend_from_slice(&tag);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(payload);
    Ok(())
}

#[cfg(test)]
fn vlq(value: usize) -> Vec<u8> {
    let mut out = Vec::new();
    write_variable_length(value, &mut out).unwrap();
    out
}

#[test]
fn variable_length_reference_encodings() {
    use pretty_assertions::assert_eq;
    assert_eq!(vlq(0), [0x00]);
    assert_eq!(vlq(127), [0x7F]);
    assert_eq!(vlq(128), [0x81, 0x00]);
    assert_eq!(vlq(16_383), [0xFF, 0x7F]);
    assert_eq!(vlq(2_097_151), [0xFF, 0xFF, 0x7F]);
    assert_eq!(vlq(0x0FFF_FFFF), [0xFF, 0xFF, 0xFF, 0x7F]);
    assert_eq!(
        write_variable_length(0x1000_0000, &mut Vec::new()),
        Err(WriteError::VariableLengthOverflow(0x1000_0000))
    );
}

#[test]
fn meta_and_sysex_reset_running_status() {
    use crate::message::{Channel, ChannelVoiceEvent, SysexEvent};
    use pretty_assertions::assert_eq;
    let mut track = TrackWriter::new().running_status(true);
    let note = ChannelVoiceEvent::note_on(Channel::One, 60, 1).into();
    track.push(0, &note).unwrap();
    track
        .push(0, &TrackMessage::SystemExclusive(SysexEvent::new(&[0x7E, 0xF7][..])))
        .unwrap();
    track.push(0, &note).unwrap();
    track.push(0, &TrackMessage::Meta(MetaEvent::Tempo(500_000))).unwrap();
    assert_eq!(
        track.finish(),
        [
            0x00, 0x90, 60, 1, //
            0x00, 0xF0, 0x02, 0x7E, 0xF7, //
            0x00, 0x90, 60, 1, //
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20,
        ]
    );
}

#[test]
fn file_layout() {
    use pretty_assertions::assert_eq;
    let bytes = FileWriter::new(Format::MultiSimultaneous, TimeDivision::ticks_per_quarter_note(96))
        .track(alloc::vec![0x00, 0xFF, 0x2F, 0x00])
        .track(Vec::new())
        .finish()
        .unwrap();
    assert_eq!(
        bytes,
        [
            b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 2, 0, 96, //
            b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00, //
            b'M', b'T', b'r', b'k', 0, 0, 0, 0,
        ]
    );
}
