use alloc::{boxed::Box, vec::Vec};
use thiserror::Error;

use crate::file::{Diagnostic, FileHeader, ParsedTrack};

/// Problems with the `MThd` chunk. Any of these is fatal to the file.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeaderError {
    /// The file holds no chunks at all
    #[error("File contains no header chunk")]
    Missing,
    /// The file does not begin with `MThd`
    #[error("File does not begin with an MThd chunk (found {0:?})")]
    BadMagic([u8; 4]),
    /// The header payload is shorter than six bytes
    #[error("Header chunk is {0} bytes long, expected at least 6")]
    Length(u32),
    /// The format field is not 0, 1 or 2
    #[error("Invalid file format {0}")]
    InvalidFormat(u16),
    /// Metrical timing with zero ticks per quarter note
    #[error("Ticks per quarter note is zero")]
    ZeroTicksPerQuarterNote,
    /// The SMPTE frame rate is not -24, -25, -29 or -30
    #[error("Invalid SMPTE frame rate {0}")]
    SmpteFps(i8),
    /// SMPTE timing with zero ticks per frame
    #[error("Ticks per frame is zero")]
    ZeroTicksPerFrame,
}

/// The reason a decode was aborted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// A chunk tag and length could not be read in full
    #[error("Unexpected end of file while reading a chunk header")]
    UnexpectedEof,
    /// A chunk claims more payload than the file holds
    #[error("Chunk {tag:?} declares {declared} bytes but only {available} remain")]
    TruncatedInput {
        /// The chunk's tag
        tag: [u8; 4],
        /// The length field of the chunk
        declared: u32,
        /// Bytes actually left in the file
        available: usize,
    },
    /// The header chunk is missing or invalid
    #[error("Malformed header: {0}")]
    MalformedHeader(#[from] HeaderError),
    /// A second `MThd` chunk, rejected in strict mode
    #[error("Duplicate header chunk")]
    DuplicateHeaderChunk,
    /// The number of track chunks differs from the header, rejected in strict mode
    #[error("Header declares {declared} track(s) but the file holds {found}")]
    TrackCountMismatch {
        /// Count from the header
        declared: u16,
        /// Track chunks found
        found: usize,
    },
}

/// Everything decodable before a fatal error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialDecode<'a> {
    /// The header, if it was decoded
    pub header: Option<FileHeader>,
    /// Every track parsed before the error, in file order
    pub tracks: Vec<ParsedTrack<'a>>,
    /// Non-fatal problems found before the error
    pub diagnostics: Vec<Diagnostic>,
}

#[doc = r#"
A fatal decode error with the byte offset it occurred at.

The partially decoded file is kept for diagnostic tooling.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Decoding at Position {position}, {kind}")]
pub struct DecodeError<'a> {
    position: usize,
    kind: DecodeErrorKind,
    partial: Box<PartialDecode<'a>>,
}

impl<'a> DecodeError<'a> {
    pub(crate) fn new(position: usize, kind: DecodeErrorKind, partial: PartialDecode<'a>) -> Self {
        Self {
            position,
            kind,
            partial: Box::new(partial),
        }
    }

    /// Byte offset of the failure
    pub fn position(&self) -> usize {
        self.position
    }

    /// Classification of the failure
    pub fn error_kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// What was decoded before the failure
    pub fn partial(&self) -> &PartialDecode<'a> {
        &self.partial
    }

    /// Take ownership of the partial result
    pub fn into_partial(self) -> PartialDecode<'a> {
        *self.partial
    }
}

/// The result of decoding a file
pub type DecodeResult<'a, T> = Result<T, DecodeError<'a>>;
