#![doc = r#"
Bounds-checked big-endian reading over an immutable byte buffer.

Every read is checked against the end of the buffer the [`Reader`] was created
over. A file can claim more data than it holds, so nothing here trusts a
length field it has not verified.
"#]

mod error;
pub use error::*;

/// The largest value a variable-length quantity may hold (four bytes, 28 bits).
pub const MAX_VARIABLE_LENGTH: u32 = 0x0FFF_FFFF;

/// A cursor over a byte slice.
///
/// Positions reported by [`Reader::buffer_position`] are absolute: a reader created
/// with [`Reader::with_offset`] over a chunk payload reports offsets into the
/// whole file.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
    offset: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader at the start of `bytes`.
    pub const fn from_byte_slice(bytes: &'a [u8]) -> Self {
        Self::with_offset(bytes, 0)
    }

    /// Create a reader whose first byte sits at `offset` in the enclosing buffer.
    pub const fn with_offset(bytes: &'a [u8], offset: usize) -> Self {
        Self {
            bytes,
            position: 0,
            offset,
        }
    }

    /// Absolute position of the next byte to be read.
    pub const fn buffer_position(&self) -> usize {
        self.offset + self.position
    }

    /// Number of unread bytes.
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// True once every byte has been read.
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> ReadResult<u8> {
        self.bytes
            .get(self.position)
            .copied()
            .ok_or_else(|| self.truncated(1))
    }

    /// Read `len` bytes, borrowing them from the underlying buffer.
    pub fn read_slice(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.truncated(len));
        }
        let start = self.position;
        self.position += len;
        Ok(&self.bytes[start..self.position])
    }

    /// Read exactly `SIZE` bytes into an array.
    pub fn read_exact_size<const SIZE: usize>(&mut self) -> ReadResult<[u8; SIZE]> {
        let slice = self.read_slice(SIZE)?;
        let mut out = [0; SIZE];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let byte = self.peek_u8()?;
        self.position += 1;
        Ok(byte)
    }

    /// Read a big-endian u16.
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Read a variable-length quantity.
    ///
    /// Each byte contributes its low 7 bits, most significant first; a set top bit
    /// means another byte follows. At most four bytes are accepted.
    pub fn read_variable_length(&mut self) -> ReadResult<u32> {
        let start = self.buffer_position();
        let mut value: u32 = 0;
        for _ in 0..4 {
            let byte = self.read_u8()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ReaderError::new(start, ReaderErrorKind::InvalidVariableLength))
    }

    fn truncated(&self, needed: usize) -> ReaderError {
        ReaderError::new(
            self.buffer_position(),
            ReaderErrorKind::TruncatedInput {
                needed,
                remaining: self.remaining(),
            },
        )
    }
}

#[test]
fn variable_length_reference_values() {
    use pretty_assertions::assert_eq;
    let cases: [(&[u8], u32); 6] = [
        (&[0x00], 0),
        (&[0x7F], 127),
        (&[0x81, 0x00], 128),
        (&[0xFF, 0x7F], 16_383),
        (&[0xFF, 0xFF, 0x7F], 2_097_151),
        (&[0xFF, 0xFF, 0xFF, 0x7F], MAX_VARIABLE_LENGTH),
    ];
    for (bytes, expected) in cases {
        let mut reader = Reader::from_byte_slice(bytes);
        assert_eq!(reader.read_variable_length().unwrap(), expected);
        assert!(reader.is_empty());
    }
}

#[test]
fn variable_length_too_long() {
    let mut reader = Reader::with_offset(&[0x80, 0x80, 0x80, 0x80, 0x00], 10);
    let err = reader.read_variable_length().unwrap_err();
    assert_eq!(err.position(), 10);
    assert!(matches!(err.error_kind(), ReaderErrorKind::InvalidVariableLength));
}

#[test]
fn truncated_reads_do_not_advance() {
    let mut reader = Reader::with_offset(&[0x12, 0x34, 0x56], 100);
    assert_eq!(reader.read_u16().unwrap(), 0x1234);
    let err = reader.read_u32().unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 102);
    assert_eq!(reader.read_u8().unwrap(), 0x56);
    assert!(reader.read_u8().is_err());
    assert!(reader.read_variable_length().unwrap_err().is_truncated());
}
