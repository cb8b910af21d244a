#![doc = r#"
SMPTE Offset - the SMPTE time at which a track is meant to start

The payload of meta event `FF 54 05` is five bytes:

```text
0rrhhhhh  mm  ss  ff  ss/100
```

where `rr` is the frame-rate code and `hhhhh` the hour.
"#]

use thiserror::Error;

use crate::file::SmpteFps;

/// Reasons an SMPTE offset payload is rejected
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SmpteError {
    /// The payload is not five bytes long
    #[error("SMPTE offset must be 5 bytes, got {0}")]
    Length(usize),
    /// The frame-rate bits are out of range
    #[error("Invalid SMPTE offset frame type {0}")]
    TrackFrame(u8),
    /// Hours above 23
    #[error("Invalid SMPTE offset hour {0}")]
    HourOffset(u8),
    /// Minutes above 59
    #[error("Invalid SMPTE offset minute {0}")]
    MinuteOffset(u8),
    /// Seconds above 59
    #[error("Invalid SMPTE offset second {0}")]
    SecondOffset(u8),
    /// Subframes above 99
    #[error("Invalid SMPTE offset subframe {0}")]
    Subframe(u8),
}

/// A track's starting position in SMPTE time code.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// The frame rate for this offset.
    pub fps: SmpteFps,
    /// Hour component of the time code (0-23).
    pub hour: u8,
    /// Minute component of the time code (0-59).
    pub minute: u8,
    /// Second component of the time code (0-59).
    pub second: u8,
    /// Frame number within the current second.
    pub frame: u8,
    /// Hundredths of a frame (0-99).
    pub subframe: u8,
}

impl SmpteOffset {
    /// The offset in whole microseconds, using the offset's own frame rate.
    pub const fn as_micros(&self) -> u64 {
        let whole = (self.hour as u64 * 3600 + self.minute as u64 * 60 + self.second as u64)
            * 1_000_000;
        let (num, den) = self.fps.as_ratio();
        // hundredths of a frame, then frames -> microseconds
        let hundredths = self.frame as u64 * 100 + self.subframe as u64;
        whole + hundredths * 10_000 * den / num
    }

    /// Parse a SMPTE offset from its five byte payload.
    pub const fn parse(data: &[u8]) -> Result<Self, SmpteError> {
        if data.len() != 5 {
            return Err(SmpteError::Length(data.len()));
        }

        let Some(fps) = SmpteFps::from_offset_bits(data[0] >> 5) else {
            return Err(SmpteError::TrackFrame(data[0] >> 5));
        };
        let hour = data[0] & 0b0001_1111;
        if hour > 23 {
            return Err(SmpteError::HourOffset(hour));
        }
        let minute = data[1];
        if minute > 59 {
            return Err(SmpteError::MinuteOffset(minute));
        }
        let second = data[2];
        if second > 59 {
            return Err(SmpteError::SecondOffset(second));
        }
        let frame = data[3];
        let subframe = data[4];
        if subframe > 99 {
            return Err(SmpteError::Subframe(subframe));
        }
        Ok(Self {
            fps,
            hour,
            minute,
            second,
            frame,
            subframe,
        })
    }

    /// The five byte payload for this offset
    pub const fn encode(&self) -> [u8; 5] {
        [
            (self.fps.offset_bits() << 5) | (self.hour & 0b0001_1111),
            self.minute,
            self.second,
            self.frame,
            self.subframe,
        ]
    }
}

#[test]
fn parse_smpte_offset() {
    use pretty_assertions::assert_eq;
    // bytes after 00 FF 54 05
    let bytes = [0x41, 0x17, 0x2D, 0x0C, 0x22];
    let offset = SmpteOffset::parse(&bytes).unwrap();

    assert_eq!(offset.fps, SmpteFps::TwentyNine);
    assert_eq!(offset.hour, 1);
    assert_eq!(offset.minute, 23);
    assert_eq!(offset.second, 45);
    assert_eq!(offset.frame, 12);
    assert_eq!(offset.subframe, 34);
    assert_eq!(offset.encode(), bytes);
}

#[test]
fn offset_micros() {
    let offset = SmpteOffset {
        fps: SmpteFps::TwentyFive,
        hour: 0,
        minute: 1,
        second: 2,
        frame: 5,
        subframe: 50,
    };
    // 62 s + 5.5 frames at 25 fps = 62.22 s
    assert_eq!(offset.as_micros(), 62_220_000);
}
