use alloc::vec::Vec;
use thiserror::Error;

/// A non-fatal anomaly found while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// Absolute byte offset in the input
    pub position: usize,
    /// Index of the track chunk the anomaly was found in, if any
    pub track: Option<usize>,
    /// What went wrong
    pub kind: DiagnosticKind,
}

/// The kinds of recoverable anomalies
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// A read ran past the end of the track chunk; the rest of the track is dropped
    #[error("Track data ends in the middle of an event ({needed} byte(s) needed, {remaining} left)")]
    TruncatedInput {
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the chunk
        remaining: usize,
    },
    /// A variable-length quantity longer than four bytes; the rest of the track is dropped
    #[error("Variable-length quantity is longer than four bytes")]
    InvalidVariableLength,
    /// A status byte in `0xF1..=0xFE` other than `0xF7`; one byte was skipped
    #[error("Unknown status byte {0:#04X}")]
    UnknownStatusByte(u8),
    /// A meta event type this crate does not interpret; kept as [`MetaEvent::Unknown`](crate::file::MetaEvent::Unknown)
    #[error("Unknown meta event type {0:#04X}")]
    UnknownMetaType(u8),
    /// A known meta event with a payload of the wrong size
    #[error("Meta event {kind:#04X} has an invalid {len} byte payload")]
    InvalidMetaPayload {
        /// The meta type byte
        kind: u8,
        /// The payload length found
        len: usize,
    },
    /// A data byte with no preceding channel status; the rest of the track is dropped
    #[error("Data byte {0:#04X} without a running status")]
    MissingRunningStatus(u8),
    /// A status byte where a data byte was required; the incomplete event is dropped
    #[error("Status byte {0:#04X} inside channel message data")]
    UnexpectedStatusByte(u8),
    /// The track chunk ended without an end-of-track meta event
    #[error("Track has no end-of-track event")]
    MissingEndOfTrack,
    /// Bytes remain in the track chunk after its end-of-track event
    #[error("{0} byte(s) after end-of-track ignored")]
    EventsAfterEndOfTrack(usize),
    /// A second `MThd` chunk; the first one is kept
    #[error("Duplicate header chunk ignored")]
    DuplicateHeaderChunk,
    /// A chunk with a tag other than `MThd` or `MTrk`
    #[error("Unknown chunk {0:?} skipped")]
    UnknownChunk([u8; 4]),
    /// The number of track chunks differs from the header
    #[error("Header declares {declared} track(s) but the file holds {found}")]
    TrackCountMismatch {
        /// Count from the header
        declared: u16,
        /// Track chunks found
        found: usize,
    },
}

impl DiagnosticKind {
    /// True for anomalies that cut a track short
    pub const fn ends_track(&self) -> bool {
        matches!(
            self,
            Self::TruncatedInput { .. } | Self::InvalidVariableLength | Self::MissingRunningStatus(_)
        )
    }
}

/// An append-only diagnostics list that also logs each entry.
#[derive(Debug, Default, Clone)]
pub(crate) struct Diagnostics {
    list: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn report(&mut self, position: usize, track: Option<usize>, kind: DiagnosticKind) {
        #[cfg(feature = "tracing")]
        tracing::warn!(position, track, "{kind}");
        self.list.push(Diagnostic {
            position,
            track,
            kind,
        });
    }

    pub(crate) fn extend(&mut self, other: Vec<Diagnostic>) {
        self.list.extend(other);
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.list
    }

    pub(crate) fn as_slice(&self) -> &[Diagnostic] {
        &self.list
    }
}
