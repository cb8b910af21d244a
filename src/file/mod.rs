#![doc = r#"
Rusty representation of a [`MidiFile`]
"#]

/// Contains the [`MidiFileBuilder`] and chunk handling
///
/// used while decoding a file.
pub mod builder;

mod diagnostic;
pub use diagnostic::*;

mod error;
pub use error::*;

mod format;
pub use format::*;

mod header;
pub use header::*;

mod meta;
pub use meta::*;

mod tempo_map;
pub use tempo_map::*;

mod timeline;
pub use timeline::*;

mod timing;
pub use timing::*;

mod track;
pub use track::*;

use crate::{
    UMicros,
    file::builder::{
        MidiFileBuilder,
        chunk::{ChunkError, ChunkIter},
    },
};
use alloc::vec::Vec;

/// Options for [`MidiFile::parse_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeOptions {
    /// Treat a duplicate header chunk or a wrong track count as fatal
    pub strict: bool,
    /// Keep system exclusive payloads. When false they decode as empty.
    pub capture_sysex: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict: false,
            capture_sysex: true,
        }
    }
}

impl DecodeOptions {
    /// Set strict mode
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Keep or drop sysex payloads
    pub const fn capture_sysex(mut self, capture: bool) -> Self {
        self.capture_sysex = capture;
        self
    }
}

#[doc = r#"
A decoded Standard MIDI File.

Holds the header, every event of every track merged onto one tick axis, the
tempo map for converting ticks into time, and the anomalies that were
tolerated while decoding.

# Example
```rust
# use smfplay::prelude::*;
let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0,
    b'M', b'T', b'r', b'k', 0, 0, 0, 12,
    0x00, 0x90, 0x3C, 0x40,
    0x83, 0x60, 0x3C, 0x00,
    0x00, 0xFF, 0x2F, 0x00,
];
let file = MidiFile::parse(&bytes).unwrap();
assert_eq!(file.header().format(), Format::SingleTrack);
assert_eq!(file.timeline().len(), 3);
assert!(file.diagnostics().is_empty());
assert_eq!(file.duration().us(), 500_000);
```
"#]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MidiFile<'a> {
    header: FileHeader,
    track_count: usize,
    timeline: Timeline<'a>,
    tempo_map: TempoMap,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> MidiFile<'a> {
    /// Parse a complete file with the default (permissive) options
    pub fn parse(bytes: &'a [u8]) -> DecodeResult<'a, Self> {
        Self::parse_with(bytes, DecodeOptions::default())
    }

    /// Parse a complete file.
    ///
    /// Only a broken chunk structure or a malformed header abort the decode; the
    /// error then carries everything decoded up to that point.
    pub fn parse_with(bytes: &'a [u8], options: DecodeOptions) -> DecodeResult<'a, Self> {
        let mut chunks = ChunkIter::new(bytes);
        let mut builder = MidiFileBuilder::new(options);

        for chunk in chunks.by_ref() {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(ChunkError::UnexpectedEof { position }) => {
                    return Err(DecodeError::new(
                        position,
                        DecodeErrorKind::UnexpectedEof,
                        builder.into_partial(),
                    ));
                }
                Err(ChunkError::TruncatedInput {
                    position,
                    tag,
                    declared,
                    available,
                }) => {
                    return Err(DecodeError::new(
                        position,
                        DecodeErrorKind::TruncatedInput {
                            tag,
                            declared,
                            available,
                        },
                        builder.into_partial(),
                    ));
                }
            };
            let position = chunk.offset();
            if let Err(kind) = builder.handle_chunk(chunk) {
                return Err(DecodeError::new(position, kind, builder.into_partial()));
            }
        }

        builder.build(chunks.position())
    }

    /// Returns header info
    pub const fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Number of track chunks actually present
    pub const fn track_count(&self) -> usize {
        self.track_count
    }

    /// Every event in playback order
    pub const fn timeline(&self) -> &Timeline<'a> {
        &self.timeline
    }

    /// Tempo changes of the file
    pub const fn tempo_map(&self) -> &TempoMap {
        &self.tempo_map
    }

    /// Non-fatal anomalies, in the order they were found
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Time from the start of the file to its last event
    pub fn duration(&self) -> UMicros {
        self.tempo_map
            .ticks_to_micros(self.header.division(), self.timeline.last_tick())
    }

    /// Split the file into its parts
    pub fn into_parts(self) -> (FileHeader, Timeline<'a>, TempoMap, Vec<Diagnostic>) {
        (self.header, self.timeline, self.tempo_map, self.diagnostics)
    }

    /// Copies any borrowed bytes so the file no longer borrows the input.
    pub fn into_owned(self) -> MidiFile<'static> {
        MidiFile {
            header: self.header,
            track_count: self.track_count,
            timeline: self.timeline.into_owned(),
            tempo_map: self.tempo_map,
            diagnostics: self.diagnostics,
        }
    }
}
