use crate::file::HeaderError;

#[doc = r#"
How the tracks of a file relate to one another.

- Format 0: one track holding every channel.
- Format 1: several tracks played simultaneously from the same origin.
- Format 2: several independent sequences played one after another.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    /// Format 0
    SingleTrack,
    /// Format 1
    MultiSimultaneous,
    /// Format 2
    MultiSequential,
}

impl Format {
    /// Decode the header's format field.
    pub const fn from_raw(raw: u16) -> Result<Self, HeaderError> {
        match raw {
            0 => Ok(Self::SingleTrack),
            1 => Ok(Self::MultiSimultaneous),
            2 => Ok(Self::MultiSequential),
            v => Err(HeaderError::InvalidFormat(v)),
        }
    }

    /// The header's format field for this format.
    pub const fn raw(&self) -> u16 {
        match self {
            Self::SingleTrack => 0,
            Self::MultiSimultaneous => 1,
            Self::MultiSequential => 2,
        }
    }

    /// True when tracks are laid end to end rather than overlaid
    pub const fn is_sequential(&self) -> bool {
        matches!(self, Self::MultiSequential)
    }
}
