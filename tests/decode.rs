use pretty_assertions::assert_eq;
use smfplay::prelude::*;

const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

/// Build a file from a format, a raw division field and raw track payloads
fn midi_file(format: u16, division: u16, tracks: &[&[u8]]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    for track in tracks {
        push_chunk(&mut bytes, b"MTrk", track);
    }
    bytes
}

fn push_chunk(bytes: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
    bytes.extend_from_slice(tag);
    bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    bytes.extend_from_slice(payload);
}

fn messages<'a>(file: &'a MidiFile<'_>) -> Vec<&'a TrackMessage<'a>> {
    file.timeline().iter().map(|e| e.message()).collect()
}

fn kinds(file: &MidiFile<'_>) -> Vec<DiagnosticKind> {
    file.diagnostics().iter().map(|d| d.kind.clone()).collect()
}

#[test]
fn running_status_note_pair() {
    let track = [0x00, 0x90, 0x3C, 0x40, 0x00, 0x3C, 0x00, 0x00, 0xFF, 0x2F, 0x00];
    let bytes = midi_file(0, 96, &[&track]);
    let file = MidiFile::parse(&bytes).unwrap();

    let notes: Vec<_> = file
        .timeline()
        .iter()
        .filter_map(|e| match e.message() {
            TrackMessage::ChannelVoice(c) => Some(*c),
            _ => None,
        })
        .collect();
    assert_eq!(
        notes,
        [
            ChannelVoiceEvent::note_on(Channel::One, 0x3C, 0x40),
            ChannelVoiceEvent::note_on(Channel::One, 0x3C, 0x00),
        ]
    );
    assert!(file.diagnostics().is_empty());
}

#[test]
fn running_status_survives_meta_and_sysex() {
    let track = [
        0x00, 0x92, 0x40, 0x50, //
        0x10, 0xFF, 0x01, 0x02, b'h', b'i', //
        0x10, 0xF0, 0x02, 0x01, 0xF7, //
        0x10, 0x40, 0x00, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let bytes = midi_file(0, 96, &[&track]);
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(
        *messages(&file)[3],
        TrackMessage::ChannelVoice(ChannelVoiceEvent::note_on(Channel::Three, 0x40, 0))
    );
    assert_eq!(file.timeline().events()[3].ticks(), 48);
}

#[test]
fn truncated_track_keeps_earlier_tracks() {
    let good = [0x00, 0x90, 0x3C, 0x40, 0x60, 0x80, 0x3C, 0x00, 0x00, 0xFF, 0x2F, 0x00];
    let mut bytes = midi_file(1, 96, &[&good]);
    // claims 100 bytes, holds 4
    let bad_chunk_start = bytes.len();
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&100u32.to_be_bytes());
    bytes.extend_from_slice(&END_OF_TRACK);

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(err.position(), bad_chunk_start);
    assert_eq!(
        *err.error_kind(),
        DecodeErrorKind::TruncatedInput {
            tag: *b"MTrk",
            declared: 100,
            available: 4,
        }
    );

    let partial = err.into_partial();
    assert_eq!(partial.header.map(|h| h.track_count()), Some(1));
    assert_eq!(partial.tracks.len(), 1);
    assert_eq!(partial.tracks[0].events().len(), 3);
    assert!(partial.tracks[0].diagnostics().is_empty());
}

#[test]
fn timeline_is_monotonic() {
    let tracks: [&[u8]; 3] = [
        &[
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, //
            0x83, 0x00, 0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40, //
            0x00, 0xFF, 0x2F, 0x00,
        ],
        &[
            0x05, 0x90, 0x30, 0x40, 0x81, 0x10, 0x30, 0x00, //
            0x07, 0x35, 0x40, 0x20, 0x35, 0x00, //
            0x00, 0xFF, 0x2F, 0x00,
        ],
        &[
            0x00, 0xC1, 0x05, 0x82, 0x00, 0x91, 0x24, 0x7F, //
            0x00, 0xB1, 0x07, 0x64, 0x40, 0x81, 0x24, 0x00, //
            0x00, 0xFF, 0x2F, 0x00,
        ],
    ];
    let bytes = midi_file(1, 480, &tracks);
    let file = MidiFile::parse(&bytes).unwrap();
    assert!(file.diagnostics().is_empty());

    let ticks: Vec<i64> = file.timeline().iter().map(|e| e.ticks()).collect();
    assert!(ticks.windows(2).all(|w| w[0] <= w[1]), "{ticks:?}");
    assert_eq!(ticks.len(), 3 + 5 + 5);

    // same tick: track order, then order within the track
    let at_zero: Vec<_> = file
        .timeline()
        .iter()
        .filter(|e| e.ticks() == 0)
        .map(|e| (e.track(), e.order()))
        .collect();
    assert_eq!(at_zero, [(0, 0), (2, 0)]);

    assert_eq!(file.tempo_map().tempo_at(383), 500_000);
    assert_eq!(file.tempo_map().tempo_at(384), 1_000_000);
}

#[test]
fn sequential_tracks_follow_each_other() {
    let song = [0x00, 0x90, 0x3C, 0x40, 0x83, 0x60, 0x3C, 0x00, 0x00, 0xFF, 0x2F, 0x00];
    let bytes = midi_file(2, 480, &[&song, &song]);
    let file = MidiFile::parse(&bytes).unwrap();

    let starts: Vec<_> = file
        .timeline()
        .iter()
        .map(|e| (e.ticks(), e.track_origin()))
        .collect();
    assert_eq!(
        starts,
        [(0, 0), (480, 0), (480, 0), (480, 480), (960, 480), (960, 480)]
    );
    assert_eq!(file.duration(), UMicros::new(1_000_000));
}

#[test]
fn malformed_headers_are_fatal() {
    let err = MidiFile::parse(b"RIFF\0\0\0\x04WAVE").unwrap_err();
    assert_eq!(
        *err.error_kind(),
        DecodeErrorKind::MalformedHeader(HeaderError::BadMagic(*b"RIFF"))
    );

    let err = MidiFile::parse(&[]).unwrap_err();
    assert_eq!(
        *err.error_kind(),
        DecodeErrorKind::MalformedHeader(HeaderError::Missing)
    );

    let bytes = midi_file(3, 96, &[]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        *err.error_kind(),
        DecodeErrorKind::MalformedHeader(HeaderError::InvalidFormat(3))
    );

    let bytes = midi_file(0, 0, &[]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        *err.error_kind(),
        DecodeErrorKind::MalformedHeader(HeaderError::ZeroTicksPerQuarterNote)
    );

    // -23 fps
    let bytes = midi_file(0, 0xE928, &[]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        *err.error_kind(),
        DecodeErrorKind::MalformedHeader(HeaderError::SmpteFps(-23))
    );

    let mut short = Vec::new();
    push_chunk(&mut short, b"MThd", &[0, 0, 0, 1]);
    let err = MidiFile::parse(&short).unwrap_err();
    assert_eq!(
        *err.error_kind(),
        DecodeErrorKind::MalformedHeader(HeaderError::Length(4))
    );
}

#[test]
fn incomplete_chunk_header() {
    let mut bytes = midi_file(0, 96, &[&END_OF_TRACK]);
    let at = bytes.len();
    bytes.extend_from_slice(b"MTr");
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(err.position(), at);
    assert_eq!(*err.error_kind(), DecodeErrorKind::UnexpectedEof);
    assert_eq!(err.partial().tracks.len(), 1);
}

#[test]
fn long_header_is_accepted() {
    let mut bytes = Vec::new();
    push_chunk(&mut bytes, b"MThd", &[0, 0, 0, 1, 0, 96, 0xAA, 0xBB]);
    push_chunk(&mut bytes, b"MTrk", &END_OF_TRACK);
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(
        file.header().division(),
        TimeDivision::ticks_per_quarter_note(96)
    );
    assert!(file.diagnostics().is_empty());
}

#[test]
fn duplicate_header_and_unknown_chunks() {
    let mut bytes = midi_file(0, 96, &[]);
    push_chunk(&mut bytes, b"XFIH", &[1, 2, 3]);
    push_chunk(&mut bytes, b"MThd", &[0, 1, 0, 9, 0, 48]);
    push_chunk(&mut bytes, b"MTrk", &END_OF_TRACK);
    // the header said zero tracks
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.header().track_count(), 0);
    assert_eq!(
        kinds(&file),
        [
            DiagnosticKind::UnknownChunk(*b"XFIH"),
            DiagnosticKind::DuplicateHeaderChunk,
            DiagnosticKind::TrackCountMismatch {
                declared: 0,
                found: 1
            },
        ]
    );
    assert_eq!(file.diagnostics()[1].position, 14 + 11);

    let strict = DecodeOptions::default().strict(true);
    let err = MidiFile::parse_with(&bytes, strict).unwrap_err();
    assert_eq!(*err.error_kind(), DecodeErrorKind::DuplicateHeaderChunk);
    assert_eq!(err.position(), 14 + 11);
}

#[test]
fn strict_track_count() {
    let mut bytes = midi_file(1, 96, &[&END_OF_TRACK, &END_OF_TRACK]);
    // drop the last track chunk
    bytes.truncate(bytes.len() - 12);
    assert_eq!(
        kinds(&MidiFile::parse(&bytes).unwrap()),
        [DiagnosticKind::TrackCountMismatch {
            declared: 2,
            found: 1
        }]
    );

    let err = MidiFile::parse_with(&bytes, DecodeOptions::default().strict(true)).unwrap_err();
    assert_eq!(
        *err.error_kind(),
        DecodeErrorKind::TrackCountMismatch {
            declared: 2,
            found: 1
        }
    );
    assert_eq!(err.partial().tracks.len(), 1);
}

#[test]
fn event_anomalies_are_collected() {
    let resync = [
        0x00, 0xF4, 0x90, 0x3C, 0x40, // unknown status, then a note
        0x00, 0xFF, 0x60, 0x02, 0xAA, 0xBB, // unknown meta
        0x00, 0xFF, 0x51, 0x02, 0x01, 0x02, // short tempo
        0x00, 0xFF, 0x2F, 0x00, //
        0x00, 0x80, // after end of track
    ];
    let no_status = [0x00, 0x3C, 0x40, 0x00, 0xFF, 0x2F, 0x00];
    let unterminated = [0x00, 0x91, 0x3C, 0x40];
    let bytes = midi_file(1, 96, &[&resync, &no_status, &unterminated]);
    let file = MidiFile::parse(&bytes).unwrap();

    let found: Vec<_> = file
        .diagnostics()
        .iter()
        .map(|d| (d.track, d.kind.clone()))
        .collect();
    assert_eq!(
        found,
        [
            (Some(0), DiagnosticKind::UnknownStatusByte(0xF4)),
            (Some(0), DiagnosticKind::UnknownMetaType(0x60)),
            (Some(0), DiagnosticKind::InvalidMetaPayload { kind: 0x51, len: 2 }),
            (Some(0), DiagnosticKind::EventsAfterEndOfTrack(2)),
            (Some(1), DiagnosticKind::MissingRunningStatus(0x3C)),
            (Some(2), DiagnosticKind::MissingEndOfTrack),
        ]
    );
    // unknown status at offset 14 + 8 + 1
    assert_eq!(file.diagnostics()[0].position, 23);

    let track0: Vec<_> = file
        .timeline()
        .iter()
        .filter(|e| e.track() == 0)
        .map(|e| e.message().clone())
        .collect();
    assert_eq!(
        track0,
        [
            TrackMessage::ChannelVoice(ChannelVoiceEvent::note_on(Channel::One, 0x3C, 0x40)),
            TrackMessage::Meta(MetaEvent::Unknown {
                kind: 0x60,
                data: (&[0xAA, 0xBB][..]).into()
            }),
            TrackMessage::Meta(MetaEvent::Unknown {
                kind: 0x51,
                data: (&[0x01, 0x02][..]).into()
            }),
            TrackMessage::Meta(MetaEvent::EndOfTrack),
        ]
    );
    // a malformed tempo is not applied
    assert_eq!(file.tempo_map().entries().len(), 1);
    assert_eq!(file.timeline().iter().filter(|e| e.track() == 2).count(), 1);
}

#[test]
fn sysex_capture_option() {
    let track = [0x00, 0xF0, 0x03, 0x7E, 0x01, 0xF7, 0x00, 0xF7, 0x01, 0xF8, 0x00, 0xFF, 0x2F, 0x00];
    let bytes = midi_file(0, 96, &[&track]);

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(
        &messages(&file)[..2],
        [
            &TrackMessage::SystemExclusive(SysexEvent::new(&[0x7E, 0x01, 0xF7][..])),
            &TrackMessage::SystemExclusive(SysexEvent::escape(&[0xF8][..])),
        ]
    );

    let file =
        MidiFile::parse_with(&bytes, DecodeOptions::default().capture_sysex(false)).unwrap();
    let found = messages(&file);
    let TrackMessage::SystemExclusive(sysex) = found[0] else {
        panic!("expected sysex");
    };
    assert!(sysex.data().is_empty());
    assert!(file.timeline().events()[2].message().is_end_of_track());
}

#[test]
fn owned_file_outlives_input() {
    let file = {
        let track = [0x00, 0xFF, 0x03, 0x04, b'l', b'e', b'a', b'd', 0x00, 0xFF, 0x2F, 0x00];
        let bytes = midi_file(0, 96, &[&track]);
        MidiFile::parse(&bytes).unwrap().into_owned()
    };
    assert_eq!(
        *file.timeline().events()[0].message(),
        TrackMessage::Meta(MetaEvent::Text {
            kind: TextKind::TrackName,
            data: b"lead".to_vec().into()
        })
    );
}
