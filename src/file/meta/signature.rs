/// The payload of a time signature meta event (`FF 58 04`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per bar
    pub numerator: u8,
    /// Beat unit as a power of two: 2 means a quarter note
    pub denominator: u8,
    /// MIDI clocks per metronome click
    pub clocks_per_click: u8,
    /// Notated 32nd notes per MIDI quarter note
    pub thirty_seconds_per_quarter: u8,
}

impl TimeSignature {
    /// The beat unit, e.g. 4 for x/4 time. Saturates for nonsense exponents.
    pub fn beat_unit(&self) -> u32 {
        1u32.checked_shl(self.denominator as u32).unwrap_or(u32::MAX)
    }

    /// The four byte payload
    pub const fn encode(&self) -> [u8; 4] {
        [
            self.numerator,
            self.denominator,
            self.clocks_per_click,
            self.thirty_seconds_per_quarter,
        ]
    }
}

/// The payload of a key signature meta event (`FF 59 02`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    /// Positive for sharps, negative for flats
    pub sharps_flats: i8,
    /// Minor key when true
    pub minor: bool,
}

impl KeySignature {
    /// The two byte payload
    pub const fn encode(&self) -> [u8; 2] {
        [self.sharps_flats as u8, self.minor as u8]
    }
}

#[test]
fn beat_unit() {
    let sig = TimeSignature {
        numerator: 6,
        denominator: 3,
        clocks_per_click: 36,
        thirty_seconds_per_quarter: 8,
    };
    assert_eq!(sig.beat_unit(), 8);
}
