use smfplay::prelude::*;

/// Helper to create raw SMPTE offset data bytes
fn create_smpte_bytes(
    fps_bits: u8,
    hour: u8,
    minute: u8,
    second: u8,
    frame: u8,
    subframe: u8,
) -> Vec<u8> {
    vec![
        (fps_bits << 5) | (hour & 0x1F),
        minute,
        second,
        frame,
        subframe,
    ]
}

#[test]
fn test_smpte_offset_invalid_length() {
    let result = SmpteOffset::parse(&[0x00, 0x00, 0x00]);
    assert!(matches!(result, Err(SmpteError::Length(3))));

    let result = SmpteOffset::parse(&[0x00; 6]);
    assert!(matches!(result, Err(SmpteError::Length(6))));

    let result = SmpteOffset::parse(&[]);
    assert!(matches!(result, Err(SmpteError::Length(0))));
}

#[test]
fn test_smpte_offset_invalid_frame_type() {
    // Frame type bits are bits 5-6, bit 7 must be clear
    for bits in [0b100, 0b101, 0b111] {
        let data = create_smpte_bytes(bits, 12, 30, 15, 10, 50);
        assert_eq!(SmpteOffset::parse(&data), Err(SmpteError::TrackFrame(bits)));
    }
}

#[test]
fn test_smpte_offset_invalid_hour() {
    // fps bits 00 + hour 24
    let result = SmpteOffset::parse(&[0x18, 0x00, 0x00, 0x00, 0x00]);
    assert!(matches!(result, Err(SmpteError::HourOffset(24))));

    // all five hour bits set
    let result = SmpteOffset::parse(&[0x1F, 0x00, 0x00, 0x00, 0x00]);
    assert!(matches!(result, Err(SmpteError::HourOffset(31))));
}

#[test]
fn test_smpte_offset_invalid_minute_second_subframe() {
    let data = create_smpte_bytes(0, 12, 60, 30, 15, 50);
    assert!(matches!(SmpteOffset::parse(&data), Err(SmpteError::MinuteOffset(60))));

    for invalid_minute in [61, 70, 99, 255] {
        let data = create_smpte_bytes(0, 12, invalid_minute, 30, 15, 50);
        assert!(matches!(SmpteOffset::parse(&data), Err(SmpteError::MinuteOffset(_))));
    }

    let data = create_smpte_bytes(1, 12, 30, 255, 15, 50);
    assert!(matches!(SmpteOffset::parse(&data), Err(SmpteError::SecondOffset(255))));

    for invalid_subframe in [100, 150, 255] {
        let data = create_smpte_bytes(2, 12, 30, 45, 15, invalid_subframe);
        assert_eq!(
            SmpteOffset::parse(&data),
            Err(SmpteError::Subframe(invalid_subframe))
        );
    }
}

#[test]
fn test_smpte_offset_combined_errors() {
    // the first invalid field is reported
    let data = create_smpte_bytes(0, 25, 61, 30, 15, 50);
    assert!(matches!(SmpteOffset::parse(&data), Err(SmpteError::HourOffset(25))));

    let data = create_smpte_bytes(1, 23, 60, 60, 15, 50);
    assert!(matches!(SmpteOffset::parse(&data), Err(SmpteError::MinuteOffset(60))));

    let data = create_smpte_bytes(2, 23, 59, 59, 29, 100);
    assert!(matches!(SmpteOffset::parse(&data), Err(SmpteError::Subframe(100))));
}

#[test]
fn test_smpte_offset_boundary_values() {
    let test_cases = [
        (0, 0, 0, 0, 0, 0),
        (0, 23, 0, 0, 0, 0),
        (0, 0, 59, 0, 0, 0),
        (0, 0, 0, 59, 0, 0),
        (0, 0, 0, 0, 0, 99),
        (0, 23, 59, 59, 23, 99),
        (1, 23, 59, 59, 24, 99),
        (2, 23, 59, 59, 29, 99),
        (3, 23, 59, 59, 29, 99),
    ];

    for (fps_bits, hour, minute, second, frame, subframe) in test_cases {
        let data = create_smpte_bytes(fps_bits, hour, minute, second, frame, subframe);
        let offset = SmpteOffset::parse(&data).unwrap_or_else(|e| panic!("{data:?}: {e}"));
        assert_eq!(offset.hour, hour);
        assert_eq!(offset.minute, minute);
        assert_eq!(offset.second, second);
        assert_eq!(offset.frame, frame);
        assert_eq!(offset.subframe, subframe);
        assert_eq!(offset.encode()[..], data[..]);
    }
}

#[test]
fn test_smpte_offset_bit_manipulation_edge_cases() {
    let rates = [
        SmpteFps::TwentyFour,
        SmpteFps::TwentyFive,
        SmpteFps::TwentyNine,
        SmpteFps::Thirty,
    ];
    for (fps_bits, expected_fps) in (0u8..).zip(rates) {
        for hour in 0..=23 {
            let data = [(fps_bits << 5) | hour, 30, 45, 15, 50];
            let result = SmpteOffset::parse(&data).unwrap();
            assert_eq!(result.fps, expected_fps);
            assert_eq!(result.hour, hour);
        }
    }
}

#[test]
fn test_smpte_offset_microsecond_edge_cases() {
    // Just before midnight at 24 fps: 23.99 frames
    let data = create_smpte_bytes(0, 23, 59, 59, 23, 99);
    let offset = SmpteOffset::parse(&data).unwrap();
    assert_eq!(offset.as_micros(), 86_399_000_000 + 999_583);

    let data_midnight = create_smpte_bytes(1, 0, 0, 0, 0, 0);
    let offset_midnight = SmpteOffset::parse(&data_midnight).unwrap();
    assert_eq!(offset_midnight.as_micros(), 0);
}

#[test]
fn test_smpte_drop_frame_precision() {
    // One frame at 29.97 fps lasts 1001/30000 s
    let data = create_smpte_bytes(2, 0, 0, 0, 1, 0);
    let offset = SmpteOffset::parse(&data).unwrap();
    assert_eq!(offset.as_micros(), 33_366);
}
