use pretty_assertions::assert_eq;
use smfplay::prelude::*;

/// (tick, track, message) triples in playback order
fn synthetic_events() -> Vec<(i64, usize, TrackMessage<'static>)> {
    use Channel::*;
    vec![
        (0, 0, TrackMessage::Meta(MetaEvent::Tempo(500_000))),
        (
            0,
            0,
            TrackMessage::Meta(MetaEvent::TimeSignature(TimeSignature {
                numerator: 3,
                denominator: 2,
                clocks_per_click: 24,
                thirty_seconds_per_quarter: 8,
            })),
        ),
        (0, 1, ChannelVoiceEvent::note_on(One, 60, 100).into()),
        (0, 2, ChannelVoiceEvent::new(Ten, VoiceEvent::ProgramChange { program: 5 }).into()),
        (120, 1, ChannelVoiceEvent::note_on(One, 64, 90).into()),
        (240, 2, ChannelVoiceEvent::note_on(Ten, 36, 127).into()),
        (480, 0, TrackMessage::Meta(MetaEvent::Tempo(400_000))),
        (480, 1, ChannelVoiceEvent::note_off(One, 60, 0).into()),
        (480, 1, ChannelVoiceEvent::note_on(One, 64, 0).into()),
        (
            600,
            1,
            ChannelVoiceEvent::new(One, VoiceEvent::PitchBend(PitchBend::new(0x2100))).into(),
        ),
        (
            600,
            2,
            TrackMessage::SystemExclusive(SysexEvent::new(vec![0x7E, 0x7F, 0x09, 0x01, 0xF7])),
        ),
        (
            720,
            2,
            ChannelVoiceEvent::new(
                Ten,
                VoiceEvent::ControlChange {
                    controller: 7,
                    value: 80,
                },
            )
            .into(),
        ),
    ]
}

fn encode(events: &[(i64, usize, TrackMessage<'static>)], running_status: bool) -> Vec<u8> {
    let mut file = FileWriter::new(
        Format::MultiSimultaneous,
        TimeDivision::ticks_per_quarter_note(480),
    );
    for track in 0..3 {
        let mut writer = TrackWriter::new().running_status(running_status);
        let mut last = 0;
        for (tick, _, message) in events.iter().filter(|(_, t, _)| *t == track) {
            writer.push((tick - last) as u32, message).unwrap();
            last = *tick;
        }
        writer.end_of_track(0).unwrap();
        file = file.track(writer.finish());
    }
    file.finish().unwrap()
}

#[test]
fn encode_then_decode() {
    let events = synthetic_events();
    for running_status in [false, true] {
        let bytes = encode(&events, running_status);
        let file = MidiFile::parse(&bytes).unwrap();
        assert!(file.diagnostics().is_empty());
        assert_eq!(file.track_count(), 3);

        let decoded: Vec<_> = file
            .timeline()
            .iter()
            .filter(|e| !e.message().is_end_of_track())
            .map(|e| (e.ticks(), e.track(), e.message().clone()))
            .collect();
        assert_eq!(decoded, events);
    }
}

#[test]
fn running_status_is_smaller() {
    let events = synthetic_events();
    let plain = encode(&events, false);
    let compact = encode(&events, true);
    // only the second note on of track 1 repeats its status
    assert_eq!(plain.len() - compact.len(), 1);
}

#[test]
fn tempo_changes_map_to_time() {
    let bytes = encode(&synthetic_events(), true);
    let file = MidiFile::parse(&bytes).unwrap();
    let map = file.tempo_map();
    let division = file.header().division();

    assert_eq!(
        map.entries(),
        [
            TempoMapEntry {
                ticks: 0,
                micros_per_quarter: 500_000
            },
            TempoMapEntry {
                ticks: 480,
                micros_per_quarter: 400_000
            },
        ]
    );
    assert_eq!(map.ticks_to_micros(division, 480), UMicros::new(500_000));
    assert_eq!(map.ticks_to_micros(division, 720), UMicros::new(700_000));
    assert_eq!(file.duration(), UMicros::new(700_000));
}

#[test]
fn conversion_reference_values() {
    let division = TimeDivision::ticks_per_quarter_note(480);
    let mut map = TempoMap::new();
    assert_eq!(map.ticks_to_micros(division, 480).us(), 500_000);

    map.insert(960, 1_000_000);
    // two quarters at 120 bpm, then quarters at 60 bpm
    assert_eq!(map.ticks_to_micros(division, 1440).us(), 2_000_000);
    assert_eq!(map.ticks_to_micros(division, 1920).us(), 3_000_000);
}
