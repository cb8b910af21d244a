use alloc::vec::Vec;

use crate::{
    file::{Diagnostic, DiagnosticKind, Diagnostics, MetaEvent, TrackEvent},
    message::{Channel, ChannelVoiceEvent, SysexEvent, TrackMessage, VoiceEvent},
    reader::{Reader, ReaderError, ReaderErrorKind},
};

/// Where a [`TrackParser`] is within the byte stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// Expecting a delta time
    Ready,
    /// A delta time has been read; expecting a status or running-status data byte
    ReadingEvent,
    /// An `F0`/`F7` status has been read; expecting the sysex length and payload
    InSysex,
    /// End of track reached, or the track was cut short
    Done,
}

enum Step<'a> {
    Emit(TrackEvent<'a>),
    Continue,
}

#[doc = r#"
Decodes one track chunk payload into [`TrackEvent`]s.

Each event is a variable-length delta time followed by either a status byte or,
under running status, the first data byte of a channel message repeating the
previous status. Only channel voice statuses (`0x80..=0xEF`) set the running
status; sysex and meta events leave it untouched.

Anomalies never panic. Recoverable ones are recorded and parsing continues;
a read past the end of the chunk ends the track with the events decoded so far.

# Example
```rust
# use smfplay::prelude::*;
// note on, then a running-status note on with velocity 0
let bytes = [0x00, 0x90, 0x3C, 0x40, 0x60, 0x3C, 0x00, 0x00, 0xFF, 0x2F, 0x00];
let mut parser = TrackParser::new(0, &bytes, 0);
let events: Vec<_> = parser.by_ref().collect();
assert_eq!(events.len(), 3);
assert_eq!(events[1].ticks(), 0x60);
assert_eq!(parser.state(), TrackState::Done);
assert!(parser.diagnostics().is_empty());
```
"#]
#[derive(Debug, Clone)]
pub struct TrackParser<'a> {
    track: usize,
    reader: Reader<'a>,
    state: TrackState,
    running_status: Option<u8>,
    sysex_status: u8,
    ticks: u64,
    event_start: usize,
    capture_sysex: bool,
    diagnostics: Diagnostics,
}

impl<'a> TrackParser<'a> {
    /// Parse `payload`, the body of track chunk number `track`, located at
    /// absolute offset `offset` in the file.
    pub fn new(track: usize, payload: &'a [u8], offset: usize) -> Self {
        Self {
            track,
            reader: Reader::with_offset(payload, offset),
            state: TrackState::Ready,
            running_status: None,
            sysex_status: 0xF0,
            ticks: 0,
            event_start: offset,
            capture_sysex: true,
            diagnostics: Diagnostics::default(),
        }
    }

    /// When false, sysex events are emitted with an empty payload.
    pub fn capture_sysex(mut self, capture: bool) -> Self {
        self.capture_sysex = capture;
        self
    }

    /// Current state
    pub const fn state(&self) -> TrackState {
        self.state
    }

    /// Absolute tick reached so far
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Anomalies found so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.as_slice()
    }

    /// Consume the parser, returning its anomalies
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_vec()
    }

    fn report(&mut self, position: usize, kind: DiagnosticKind) {
        self.diagnostics.report(position, Some(self.track), kind);
    }

    fn fail(&mut self, error: ReaderError) {
        let kind = match error.error_kind() {
            ReaderErrorKind::TruncatedInput { needed, remaining } => {
                DiagnosticKind::TruncatedInput {
                    needed: *needed,
                    remaining: *remaining,
                }
            }
            ReaderErrorKind::InvalidVariableLength => DiagnosticKind::InvalidVariableLength,
        };
        self.report(error.position(), kind);
        self.state = TrackState::Done;
    }

    fn emit(&self, message: TrackMessage<'a>) -> Step<'a> {
        Step::Emit(TrackEvent::new(self.ticks, self.event_start, message))
    }

    fn step(&mut self) -> Result<Step<'a>, ReaderError> {
        match self.state {
            TrackState::Done => Ok(Step::Continue),
            TrackState::Ready => {
                if self.reader.is_empty() {
                    self.report(self.reader.buffer_position(), DiagnosticKind::MissingEndOfTrack);
                    self.state = TrackState::Done;
                    return Ok(Step::Continue);
                }
                self.event_start = self.reader.buffer_position();
                let delta = self.reader.read_variable_length()?;
                self.ticks += delta as u64;
                self.state = TrackState::ReadingEvent;
                Ok(Step::Continue)
            }
            TrackState::ReadingEvent => self.read_event(),
            TrackState::InSysex => {
                let len = self.reader.read_variable_length()?;
                let data = self.reader.read_slice(len as usize)?;
                let data: &'a [u8] = if self.capture_sysex { data } else { &[] };
                let event = if self.sysex_status == 0xF7 {
                    SysexEvent::escape(data)
                } else {
                    SysexEvent::new(data)
                };
                self.state = TrackState::Ready;
                Ok(self.emit(TrackMessage::SystemExclusive(event)))
            }
        }
    }

    fn read_event(&mut self) -> Result<Step<'a>, ReaderError> {
        let position = self.reader.buffer_position();
        let byte = self.reader.peek_u8()?;
        let status = if byte & 0x80 != 0 {
            self.reader.read_u8()?;
            byte
        } else {
            match self.running_status {
                Some(status) => status,
                None => {
                    self.report(position, DiagnosticKind::MissingRunningStatus(byte));
                    self.state = TrackState::Done;
                    return Ok(Step::Continue);
                }
            }
        };

        match status {
            0x80..=0xEF => {
                self.running_status = Some(status);
                self.read_channel_voice(status)
            }
            0xF0 | 0xF7 => {
                self.sysex_status = status;
                self.state = TrackState::InSysex;
                Ok(Step::Continue)
            }
            0xFF => self.read_meta(),
            unknown => {
                // skip the byte and try the next one as a status
                self.report(position, DiagnosticKind::UnknownStatusByte(unknown));
                Ok(Step::Continue)
            }
        }
    }

    fn read_channel_voice(&mut self, status: u8) -> Result<Step<'a>, ReaderError> {
        let len = VoiceEvent::data_len(status).unwrap_or(0);
        let mut data = [0u8; 2];
        for slot in data.iter_mut().take(len) {
            let position = self.reader.buffer_position();
            let byte = self.reader.peek_u8()?;
            if byte & 0x80 != 0 {
                // leave the byte in place so it is read as the next status
                self.report(position, DiagnosticKind::UnexpectedStatusByte(byte));
                return Ok(Step::Continue);
            }
            *slot = self.reader.read_u8()?;
        }
        let Some(event) = VoiceEvent::from_status_and_data(status, &data[..len]) else {
            return Ok(Step::Continue);
        };
        self.state = TrackState::Ready;
        Ok(self.emit(TrackMessage::ChannelVoice(ChannelVoiceEvent::new(
            Channel::from_status(status),
            event,
        ))))
    }

    fn read_meta(&mut self) -> Result<Step<'a>, ReaderError> {
        let kind = self.reader.read_u8()?;
        let len = self.reader.read_variable_length()?;
        let position = self.reader.buffer_position();
        let data = self.reader.read_slice(len as usize)?;
        let (meta, issue) = MetaEvent::decode(kind, data);
        if let Some(issue) = issue {
            self.report(position, issue);
        }

        if matches!(meta, MetaEvent::EndOfTrack) {
            self.state = TrackState::Done;
            if !self.reader.is_empty() {
                let remaining = self.reader.remaining();
                self.report(
                    self.reader.buffer_position(),
                    DiagnosticKind::EventsAfterEndOfTrack(remaining),
                );
            }
        } else {
            self.state = TrackState::Ready;
        }
        Ok(self.emit(TrackMessage::Meta(meta)))
    }
}

impl<'a> Iterator for TrackParser<'a> {
    type Item = TrackEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.state != TrackState::Done {
            match self.step() {
                Ok(Step::Emit(event)) => return Some(event),
                Ok(Step::Continue) => {}
                Err(e) => self.fail(e),
            }
        }
        None
    }
}

impl core::iter::FusedIterator for TrackParser<'_> {}

#[cfg(test)]
fn parse(bytes: &[u8]) -> (Vec<TrackEvent<'_>>, Vec<Diagnostic>) {
    let mut parser = TrackParser::new(0, bytes, 0);
    let events = parser.by_ref().collect();
    (events, parser.into_diagnostics())
}

#[cfg(test)]
fn voice(event: &TrackEvent<'_>) -> ChannelVoiceEvent {
    match event.message() {
        TrackMessage::ChannelVoice(c) => *c,
        other => panic!("expected a channel voice event, got {other:?}"),
    }
}

#[test]
fn running_status_produces_one_event_per_group() {
    use pretty_assertions::assert_eq;
    let (events, diagnostics) = parse(&[
        0x00, 0x90, 0x3C, 0x40, //
        0x00, 0x3C, 0x00, //
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    assert!(diagnostics.is_empty());
    assert_eq!(events.len(), 3);
    assert_eq!(
        voice(&events[0]),
        ChannelVoiceEvent::note_on(Channel::One, 0x3C, 0x40)
    );
    assert_eq!(
        voice(&events[1]),
        ChannelVoiceEvent::note_on(Channel::One, 0x3C, 0x00)
    );
    assert!(events[2].message().is_end_of_track());
}

#[test]
fn running_status_survives_meta_events() {
    let (events, diagnostics) = parse(&[
        0x00, 0xC2, 0x05, //
        0x00, 0xFF, 0x01, 0x02, b'h', b'i', //
        0x10, 0x07, //
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    assert!(diagnostics.is_empty());
    assert_eq!(events.len(), 4);
    assert_eq!(
        voice(&events[2]),
        ChannelVoiceEvent::new(Channel::Three, VoiceEvent::ProgramChange { program: 7 })
    );
    assert_eq!(events[2].ticks(), 0x10);
}

#[test]
fn delta_times_accumulate() {
    let (events, _) = parse(&[
        0x81, 0x00, 0xE0, 0x00, 0x40, //
        0x83, 0x60, 0xE0, 0x7F, 0x7F, //
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    assert_eq!(events[0].ticks(), 128);
    assert_eq!(events[1].ticks(), 128 + 480);
    assert_eq!(events[2].ticks(), 608);
    assert!(matches!(
        voice(&events[1]).event(),
        VoiceEvent::PitchBend(b) if b.value() == 0x3FFF
    ));
}

#[test]
fn sysex_spans_are_passed_through() {
    let (events, diagnostics) = parse(&[
        0x00, 0xF0, 0x03, 0x43, 0x12, 0xF7, //
        0x05, 0xF7, 0x02, 0xF3, 0x01, //
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    assert!(diagnostics.is_empty());
    let TrackMessage::SystemExclusive(sysex) = events[0].message() else {
        panic!("expected sysex");
    };
    assert!(!sysex.is_escape());
    assert_eq!(sysex.data(), &[0x43, 0x12, 0xF7]);
    let TrackMessage::SystemExclusive(escape) = events[1].message() else {
        panic!("expected escape");
    };
    assert!(escape.is_escape());
    assert_eq!(escape.data(), &[0xF3, 0x01]);
    assert_eq!(events[1].ticks(), 5);
}

#[test]
fn unknown_status_is_skipped() {
    use pretty_assertions::assert_eq;
    let (events, diagnostics) = parse(&[
        0x00, 0xF4, 0x90, 0x40, 0x7F, //
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    assert_eq!(events.len(), 2);
    assert_eq!(
        voice(&events[0]),
        ChannelVoiceEvent::note_on(Channel::One, 0x40, 0x7F)
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].position, 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UnknownStatusByte(0xF4));
}

#[test]
fn missing_running_status_ends_track() {
    let (events, diagnostics) = parse(&[0x00, 0x3C, 0x40]);
    assert!(events.is_empty());
    assert_eq!(
        diagnostics[0].kind,
        DiagnosticKind::MissingRunningStatus(0x3C)
    );
}

#[test]
fn truncated_event_keeps_earlier_events() {
    let (events, diagnostics) = parse(&[0x00, 0x90, 0x3C, 0x40, 0x00, 0x90, 0x3C]);
    assert_eq!(events.len(), 1);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind,
        DiagnosticKind::TruncatedInput {
            needed: 1,
            remaining: 0
        }
    );
}

#[test]
fn meta_length_overrun_is_truncation() {
    let (events, diagnostics) = parse(&[0x00, 0xFF, 0x01, 0x10, b'a']);
    assert!(events.is_empty());
    assert!(matches!(
        diagnostics[0].kind,
        DiagnosticKind::TruncatedInput { needed: 16, .. }
    ));
}

#[test]
fn missing_end_of_track_is_a_warning() {
    let (events, diagnostics) = parse(&[0x00, 0x90, 0x3C, 0x40]);
    assert_eq!(events.len(), 1);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingEndOfTrack);
    assert_eq!(diagnostics[0].position, 4);
}

#[test]
fn status_byte_inside_data_drops_partial_event() {
    let (events, diagnostics) = parse(&[
        0x00, 0x90, 0x3C, 0x80, 0x3C, 0x00, //
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    assert_eq!(events.len(), 2);
    assert_eq!(
        voice(&events[0]),
        ChannelVoiceEvent::note_off(Channel::One, 0x3C, 0x00)
    );
    assert_eq!(
        diagnostics[0].kind,
        DiagnosticKind::UnexpectedStatusByte(0x80)
    );
}

#[test]
fn bytes_after_end_of_track_are_reported() {
    let (events, diagnostics) = parse(&[0x00, 0xFF, 0x2F, 0x00, 0x00, 0x90, 0x3C, 0x40]);
    assert_eq!(events.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::EventsAfterEndOfTrack(4));
}

#[test]
fn uncaptured_sysex_keeps_stream_position() {
    let bytes = [
        0x00, 0xF0, 0x02, 0x01, 0x02, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let mut parser = TrackParser::new(0, &bytes, 0).capture_sysex(false);
    let events: Vec<_> = parser.by_ref().collect();
    assert_eq!(events.len(), 2);
    let TrackMessage::SystemExclusive(sysex) = events[0].message() else {
        panic!("expected sysex");
    };
    assert!(sysex.data().is_empty());
    assert!(parser.diagnostics().is_empty());
}

#[test]
fn borrowed_text_points_into_input() {
    use alloc::borrow::Cow;
    let bytes = [0x00, 0xFF, 0x03, 0x03, b'a', b'b', b'c', 0x00, 0xFF, 0x2F, 0x00];
    let (events, _) = parse(&bytes);
    let TrackMessage::Meta(MetaEvent::Text { data, .. }) = events[0].message() else {
        panic!("expected text");
    };
    assert!(matches!(data, Cow::Borrowed(_)));
    assert_eq!(data.as_ref(), b"abc");
}
