mod parser;
pub use parser::*;

use alloc::vec::Vec;

use crate::{file::Diagnostic, message::TrackMessage};

/// An event stamped with its absolute tick within its own track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEvent<'a> {
    ticks: u64,
    position: usize,
    message: TrackMessage<'a>,
}

impl<'a> TrackEvent<'a> {
    /// Create a new track event
    pub const fn new(ticks: u64, position: usize, message: TrackMessage<'a>) -> Self {
        Self {
            ticks,
            position,
            message,
        }
    }

    /// Ticks since the start of the track
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Absolute byte offset of the event in the file, for diagnostics
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The decoded message
    pub const fn message(&self) -> &TrackMessage<'a> {
        &self.message
    }

    /// Take the decoded message
    pub fn into_message(self) -> TrackMessage<'a> {
        self.message
    }
}

/// Every event decoded from one `MTrk` chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTrack<'a> {
    index: usize,
    events: Vec<TrackEvent<'a>>,
    length_ticks: u64,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ParsedTrack<'a> {
    /// Parse a track chunk payload.
    ///
    /// `index` is the track's position among the file's track chunks and `offset`
    /// the absolute position of the payload in the file.
    pub fn parse(index: usize, payload: &'a [u8], offset: usize) -> Self {
        Self::parse_with(index, payload, offset, true)
    }

    pub(crate) fn parse_with(
        index: usize,
        payload: &'a [u8],
        offset: usize,
        capture_sysex: bool,
    ) -> Self {
        let mut parser = TrackParser::new(index, payload, offset).capture_sysex(capture_sysex);
        let events = parser.by_ref().collect();
        let length_ticks = parser.ticks();
        Self {
            index,
            events,
            length_ticks,
            diagnostics: parser.into_diagnostics(),
        }
    }

    /// Index of the track chunk in the file
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The decoded events in stream order
    pub fn events(&self) -> &[TrackEvent<'a>] {
        &self.events
    }

    /// Take the decoded events
    pub fn into_events(self) -> Vec<TrackEvent<'a>> {
        self.events
    }

    /// Absolute tick of the last delta time read, including the end-of-track delta
    pub const fn length_ticks(&self) -> u64 {
        self.length_ticks
    }

    /// Anomalies found in this track
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
