/// The 14-bit pitch wheel position, centered at `0x2000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchBend(u16);

impl PitchBend {
    /// The wheel at rest.
    pub const CENTER: Self = Self(0x2000);
    /// Largest representable value.
    pub const MAX: u16 = 0x3FFF;

    /// Reassemble the value from its two data bytes. Top bits are ignored.
    pub const fn from_lsb_msb(lsb: u8, msb: u8) -> Self {
        Self((((msb & 0x7F) as u16) << 7) | (lsb & 0x7F) as u16)
    }

    /// Create from a raw 14-bit value, clamping to [`PitchBend::MAX`].
    pub const fn new(value: u16) -> Self {
        if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// The raw 14-bit value
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Signed offset from the center, `-8192..=8191`
    pub const fn offset(&self) -> i16 {
        self.0 as i16 - 0x2000
    }

    /// Least significant data byte
    pub const fn lsb(&self) -> u8 {
        (self.0 & 0x7F) as u8
    }

    /// Most significant data byte
    pub const fn msb(&self) -> u8 {
        (self.0 >> 7) as u8
    }
}

#[test]
fn reassemble_bend() {
    assert_eq!(PitchBend::from_lsb_msb(0x00, 0x40), PitchBend::CENTER);
    assert_eq!(PitchBend::from_lsb_msb(0x7F, 0x7F).value(), PitchBend::MAX);
    assert_eq!(PitchBend::from_lsb_msb(0x01, 0x00).offset(), -8191);
    let bend = PitchBend::new(0x1234);
    assert_eq!(PitchBend::from_lsb_msb(bend.lsb(), bend.msb()), bend);
}
