pub mod chunk;

use alloc::vec::Vec;

use crate::file::{
    DecodeError, DecodeErrorKind, DecodeOptions, DiagnosticKind, Diagnostics, FileHeader,
    HeaderError, MidiFile, ParsedTrack, PartialDecode, TempoMap, Timeline,
    builder::chunk::{ChunkKind, RawChunk},
};

/// A builder used to create a new [`MidiFile`] from its chunks.
///
/// Feed chunks in file order with [`MidiFileBuilder::handle_chunk`], then call
/// [`MidiFileBuilder::build`].
#[derive(Debug, Default)]
pub struct MidiFileBuilder<'a> {
    options: DecodeOptions,
    header: Option<FileHeader>,
    tracks: Vec<ParsedTrack<'a>>,
    chunks_seen: usize,
    diagnostics: Diagnostics,
}

impl<'a> MidiFileBuilder<'a> {
    /// Create a builder with the given options
    pub fn new(options: DecodeOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Handles a chunk of a midi file.
    ///
    /// An error here is fatal to the whole file.
    pub fn handle_chunk(&mut self, chunk: RawChunk<'a>) -> Result<(), DecodeErrorKind> {
        let first = self.chunks_seen == 0;
        self.chunks_seen += 1;

        match chunk.kind() {
            ChunkKind::Header if self.header.is_none() => {
                let header = FileHeader::decode(chunk.payload())?;
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    format = ?header.format(),
                    tracks = header.track_count(),
                    division = ?header.division(),
                    "decoded header"
                );
                self.header = Some(header);
                Ok(())
            }
            _ if first => Err(HeaderError::BadMagic(chunk.tag()).into()),
            ChunkKind::Header => {
                if self.options.strict {
                    return Err(DecodeErrorKind::DuplicateHeaderChunk);
                }
                self.diagnostics
                    .report(chunk.offset(), None, DiagnosticKind::DuplicateHeaderChunk);
                Ok(())
            }
            ChunkKind::Track => {
                let track = ParsedTrack::parse_with(
                    self.tracks.len(),
                    chunk.payload(),
                    chunk.payload_offset(),
                    self.options.capture_sysex,
                );
                self.diagnostics.extend(track.diagnostics().to_vec());
                self.tracks.push(track);
                Ok(())
            }
            ChunkKind::Unknown => {
                self.diagnostics.report(
                    chunk.offset(),
                    None,
                    DiagnosticKind::UnknownChunk(chunk.tag()),
                );
                Ok(())
            }
        }
    }

    /// Everything gathered so far, for error reporting
    pub fn into_partial(self) -> PartialDecode<'a> {
        PartialDecode {
            header: self.header,
            tracks: self.tracks,
            diagnostics: self.diagnostics.into_vec(),
        }
    }

    /// Attempts to finish the midifile from the provided chunks.
    ///
    /// `end` is the length of the input, used as the position of errors found here.
    pub fn build(mut self, end: usize) -> Result<MidiFile<'a>, DecodeError<'a>> {
        let Some(header) = self.header else {
            return Err(DecodeError::new(
                end,
                HeaderError::Missing.into(),
                self.into_partial(),
            ));
        };

        let declared = header.track_count();
        let found = self.tracks.len();
        if declared as usize != found {
            if self.options.strict {
                return Err(DecodeError::new(
                    end,
                    DecodeErrorKind::TrackCountMismatch { declared, found },
                    self.into_partial(),
                ));
            }
            self.diagnostics
                .report(end, None, DiagnosticKind::TrackCountMismatch { declared, found });
        }

        let timeline = Timeline::merge(header.format(), header.division(), self.tracks);
        let tempo_map = TempoMap::from_timeline(&timeline);

        Ok(MidiFile {
            header,
            track_count: found,
            timeline,
            tempo_map,
            diagnostics: self.diagnostics.into_vec(),
        })
    }
}
