mod smpte;
pub use smpte::*;

use crate::file::HeaderError;

/// How delta-ticks are to be interpreted.
///
/// The header's 16-bit division field selects the variant with its sign bit:
///
/// ```text
/// 0ttt_tttt tttt_tttt   ticks per quarter note (15 bits)
/// 1fff_ffff tttt_tttt   negative SMPTE frame rate, ticks per frame
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeDivision {
    /// Metrical time: the number of ticks in one quarter note
    Ppq {
        /// Ticks in one quarter note
        ticks_per_quarter: u16,
    },
    /// Timecode: ticks subdivide SMPTE frames and tempo does not apply
    Smpte {
        /// Frame rate
        fps: SmpteFps,
        /// Ticks in one frame
        ticks_per_frame: u8,
    },
}

impl TimeDivision {
    /// Metrical timing. The leading bit of `tpqn` is disregarded, so 1-32767.
    pub const fn ticks_per_quarter_note(tpqn: u16) -> Self {
        Self::Ppq {
            ticks_per_quarter: tpqn & 0x7FFF,
        }
    }

    /// Timecode timing
    pub const fn smpte(fps: SmpteFps, ticks_per_frame: u8) -> Self {
        Self::Smpte {
            fps,
            ticks_per_frame,
        }
    }

    /// Decode the raw division field of a header chunk.
    pub const fn decode(raw: u16) -> Result<Self, HeaderError> {
        if raw & 0x8000 == 0 {
            let ticks_per_quarter = raw & 0x7FFF;
            if ticks_per_quarter == 0 {
                return Err(HeaderError::ZeroTicksPerQuarterNote);
            }
            return Ok(Self::Ppq { ticks_per_quarter });
        }
        let [fps_byte, ticks_per_frame] = raw.to_be_bytes();
        let Some(fps) = SmpteFps::from_header_byte(fps_byte as i8) else {
            return Err(HeaderError::SmpteFps(fps_byte as i8));
        };
        if ticks_per_frame == 0 {
            return Err(HeaderError::ZeroTicksPerFrame);
        }
        Ok(Self::Smpte {
            fps,
            ticks_per_frame,
        })
    }

    /// The raw division field for this timing
    pub const fn encode(&self) -> u16 {
        match self {
            Self::Ppq { ticks_per_quarter } => *ticks_per_quarter & 0x7FFF,
            Self::Smpte {
                fps,
                ticks_per_frame,
            } => u16::from_be_bytes([fps.header_byte() as u8, *ticks_per_frame]),
        }
    }

    /// Returns Some if the timing is defined as ticks per quarter note
    pub const fn ticks_per_quarter(&self) -> Option<u16> {
        match self {
            Self::Ppq { ticks_per_quarter } => Some(*ticks_per_quarter),
            Self::Smpte { .. } => None,
        }
    }

    /// True for timecode based timing
    pub const fn is_smpte(&self) -> bool {
        matches!(self, Self::Smpte { .. })
    }
}

#[test]
fn decode_division() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        TimeDivision::decode(0x01E0),
        Ok(TimeDivision::ticks_per_quarter_note(480))
    );
    // -25 fps, 40 ticks per frame
    assert_eq!(
        TimeDivision::decode(0xE728),
        Ok(TimeDivision::smpte(SmpteFps::TwentyFive, 40))
    );
    assert_eq!(
        TimeDivision::decode(0),
        Err(HeaderError::ZeroTicksPerQuarterNote)
    );
    assert_eq!(TimeDivision::decode(0xE500), Err(HeaderError::SmpteFps(-27)));
    assert_eq!(TimeDivision::decode(0xE200), Err(HeaderError::ZeroTicksPerFrame));
}

#[test]
fn encode_division() {
    for division in [
        TimeDivision::ticks_per_quarter_note(96),
        TimeDivision::smpte(SmpteFps::TwentyNine, 80),
        TimeDivision::smpte(SmpteFps::Thirty, 4),
    ] {
        assert_eq!(TimeDivision::decode(division.encode()), Ok(division));
    }
}
