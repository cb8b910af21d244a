use pretty_assertions::assert_eq;
use smfplay::prelude::*;

/// Helper function to create a minimal MIDI file with SMPTE offset
/// Returns the complete MIDI file as a byte vector
fn create_midi_with_smpte_offset(
    fps: SmpteFps,
    hour: u8,
    minute: u8,
    second: u8,
    frame: u8,
    subframe: u8,
) -> Vec<u8> {
    let mut bytes = Vec::new();

    // MIDI Header
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&[0x00, 0x00]); // Format 0
    bytes.extend_from_slice(&[0x00, 0x01]); // 1 track

    // High bit set indicates SMPTE timing
    bytes.push(fps.header_byte() as u8);
    bytes.push(40); // 40 ticks per frame

    bytes.extend_from_slice(b"MTrk");
    let track_length_pos = bytes.len();
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    let track_start = bytes.len();

    // SMPTE Offset Meta Event
    bytes.extend_from_slice(&[0x00, 0xFF, 0x54, 0x05]);
    bytes.push((fps.offset_bits() << 5) | (hour & 0x1F));
    bytes.push(minute);
    bytes.push(second);
    bytes.push(frame);
    bytes.push(subframe);

    // Note on, then note off 96 ticks later
    bytes.extend_from_slice(&[0x00, 0x90, 0x3C, 0x64]);
    bytes.extend_from_slice(&[0x60, 0x80, 0x3C, 0x40]);

    // End of Track
    bytes.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    let track_length = bytes.len() - track_start;
    bytes[track_length_pos..track_length_pos + 4]
        .copy_from_slice(&(track_length as u32).to_be_bytes());

    bytes
}

fn offsets(file: &MidiFile<'_>) -> Vec<SmpteOffset> {
    file.timeline()
        .iter()
        .filter_map(|e| match e.message() {
            TrackMessage::Meta(MetaEvent::SmpteOffset(offset)) => Some(*offset),
            _ => None,
        })
        .collect()
}

#[test]
fn test_smpte_offset_24fps() {
    let midi_data = create_midi_with_smpte_offset(SmpteFps::TwentyFour, 12, 30, 15, 18, 50);
    let file = MidiFile::parse(&midi_data).unwrap();

    assert_eq!(
        file.header().division(),
        TimeDivision::smpte(SmpteFps::TwentyFour, 40)
    );
    assert!(file.diagnostics().is_empty());

    let found = offsets(&file);
    let [offset] = found[..] else {
        panic!("Expected one SMPTE offset meta event");
    };
    assert_eq!(
        offset,
        SmpteOffset {
            fps: SmpteFps::TwentyFour,
            hour: 12,
            minute: 30,
            second: 15,
            frame: 18,
            subframe: 50,
        }
    );
    // 18.5 frames at 24 fps
    assert_eq!(offset.as_micros(), 45_015_000_000 + 770_833);
}

#[test]
fn test_smpte_offset_25fps_pal() {
    let midi_data = create_midi_with_smpte_offset(SmpteFps::TwentyFive, 0, 0, 1, 12, 75);
    let file = MidiFile::parse(&midi_data).unwrap();
    let found = offsets(&file);
    let [offset] = found[..] else {
        panic!("Expected one SMPTE offset meta event");
    };
    assert_eq!(offset.fps, SmpteFps::TwentyFive);
    assert_eq!(offset.second, 1);
    assert_eq!(offset.frame, 12);
    assert_eq!(offset.subframe, 75);
    assert_eq!(offset.as_micros(), 1_510_000);
}

#[test]
fn test_smpte_offset_29_97_drop_frame() {
    let midi_data = create_midi_with_smpte_offset(SmpteFps::TwentyNine, 23, 59, 59, 28, 99);
    let file = MidiFile::parse(&midi_data).unwrap();
    let found = offsets(&file);
    let [offset] = found[..] else {
        panic!("Expected one SMPTE offset meta event");
    };
    assert_eq!(offset.fps, SmpteFps::TwentyNine);
    assert_eq!(offset.hour, 23);
    // 28.99 frames of 1001/30000 s each
    assert_eq!(offset.as_micros(), 86_399_000_000 + 967_299);
}

#[test]
fn test_smpte_file_timing() {
    // 25 fps * 40 ticks per frame = 1000 ticks per second
    let midi_data = create_midi_with_smpte_offset(SmpteFps::TwentyFive, 0, 0, 0, 0, 0);
    let file = MidiFile::parse(&midi_data).unwrap();
    assert_eq!(file.timeline().last_tick(), 96);
    assert_eq!(file.duration(), UMicros::from_ms(96));

    // 30 fps * 40 ticks per frame = 1200 ticks per second
    let midi_data = create_midi_with_smpte_offset(SmpteFps::Thirty, 0, 0, 0, 0, 0);
    let file = MidiFile::parse(&midi_data).unwrap();
    assert_eq!(file.duration(), UMicros::new(80_000));
}

#[test]
fn test_multiple_tracks_with_different_offsets() {
    let mut bytes = Vec::new();

    // MIDI Header (Format 1 - multiple simultaneous tracks)
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&[0x00, 0x01]); // Format 1
    bytes.extend_from_slice(&[0x00, 0x02]); // 2 tracks
    bytes.push(0xE7); // 25 fps SMPTE
    bytes.push(40);

    // Track 1 with offset at 00:00:10:00
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(&[0x00, 0xFF, 0x54, 0x05, 0x20, 0x00, 0x0A, 0x00, 0x00]);
    bytes.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    // Track 2 with offset at 00:01:00:00
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(&[0x00, 0xFF, 0x54, 0x05, 0x20, 0x01, 0x00, 0x00, 0x00]);
    bytes.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.track_count(), 2);
    let offsets = offsets(&file);
    assert_eq!(offsets.len(), 2);
    assert_eq!(offsets[1].as_micros() - offsets[0].as_micros(), 50_000_000);
}

#[test]
fn test_invalid_offset_is_reported() {
    // hour 24
    let mut midi_data = create_midi_with_smpte_offset(SmpteFps::TwentyFour, 0, 0, 0, 0, 0);
    let hour_byte = 14 + 8 + 4;
    midi_data[hour_byte] = 24;

    let file = MidiFile::parse(&midi_data).unwrap();
    assert!(offsets(&file).is_empty());
    assert_eq!(file.diagnostics().len(), 1);
    assert!(matches!(
        file.diagnostics()[0].kind,
        DiagnosticKind::InvalidMetaPayload { kind: 0x54, .. }
    ));
    assert!(matches!(
        file.timeline().events()[0].message(),
        TrackMessage::Meta(MetaEvent::Unknown { kind: 0x54, .. })
    ));
}
