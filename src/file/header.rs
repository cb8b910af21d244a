use crate::{
    file::{Format, HeaderError, TimeDivision},
    reader::Reader,
};

#[doc = r#"
The decoded `MThd` chunk

```text
| offset | size | field        |
|--------|------|--------------|
| 0      | 2    | format       |
| 2      | 2    | track count  |
| 4      | 2    | division     |
```

Payloads longer than six bytes are accepted; the extra bytes are ignored.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileHeader {
    format: Format,
    track_count: u16,
    division: TimeDivision,
}

impl FileHeader {
    /// Create a new header
    pub const fn new(format: Format, track_count: u16, division: TimeDivision) -> Self {
        Self {
            format,
            track_count,
            division,
        }
    }

    /// Decode a header chunk payload.
    pub fn decode(payload: &[u8]) -> Result<Self, HeaderError> {
        if payload.len() < 6 {
            return Err(HeaderError::Length(payload.len() as u32));
        }
        let mut reader = Reader::from_byte_slice(payload);
        let (Ok(format), Ok(track_count), Ok(division)) =
            (reader.read_u16(), reader.read_u16(), reader.read_u16())
        else {
            return Err(HeaderError::Length(payload.len() as u32));
        };

        Ok(Self {
            format: Format::from_raw(format)?,
            track_count,
            division: TimeDivision::decode(division)?,
        })
    }

    /// The six byte payload for this header
    pub fn encode(&self) -> [u8; 6] {
        let [f0, f1] = self.format.raw().to_be_bytes();
        let [t0, t1] = self.track_count.to_be_bytes();
        let [d0, d1] = self.division.encode().to_be_bytes();
        [f0, f1, t0, t1, d0, d1]
    }

    /// How the tracks relate
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Number of tracks the header declares
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }

    /// The file's time base
    pub const fn division(&self) -> TimeDivision {
        self.division
    }
}

#[test]
fn decode_header() {
    use crate::file::SmpteFps;
    use pretty_assertions::assert_eq;

    let header = FileHeader::decode(&[0x00, 0x01, 0x00, 0x03, 0x01, 0xE0]).unwrap();
    assert_eq!(header.format(), Format::MultiSimultaneous);
    assert_eq!(header.track_count(), 3);
    assert_eq!(header.division(), TimeDivision::ticks_per_quarter_note(480));

    let header = FileHeader::decode(&[0x00, 0x00, 0x00, 0x01, 0xE2, 0x50, 0xAA]).unwrap();
    assert_eq!(header.division(), TimeDivision::smpte(SmpteFps::Thirty, 80));
    assert_eq!(header.encode(), [0x00, 0x00, 0x00, 0x01, 0xE2, 0x50]);
}

#[test]
fn reject_bad_headers() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        FileHeader::decode(&[0x00, 0x01, 0x00]),
        Err(HeaderError::Length(3))
    );
    assert_eq!(
        FileHeader::decode(&[0x00, 0x03, 0x00, 0x01, 0x00, 0x60]),
        Err(HeaderError::InvalidFormat(3))
    );
}
