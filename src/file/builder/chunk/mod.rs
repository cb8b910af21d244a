#![doc = r#"
Contains types for MIDI file chunks

# Overview

MIDI files are organized into chunks, each identified by a 4-character ASCII type identifier
followed by a 32-bit big-endian length field and then exactly that many bytes of data.

- `MThd`: the header chunk. It must be the first chunk in the file.
- `MTrk`: a track chunk holding delta-timed events.
- anything else: an unknown chunk, skipped for forward compatibility.

```text
[Header Chunk: "MThd"]
[Track Chunk 1: "MTrk"]
...
[Track Chunk N: "MTrk"]
[Optional Unknown Chunks]
```

The length field is authoritative: after each chunk, [`ChunkIter`] moves past the
declared payload no matter how much of it the consumer actually parsed.
"#]

/// Tag of the header chunk
pub const HEADER_TAG: [u8; 4] = *b"MThd";
/// Tag of a track chunk
pub const TRACK_TAG: [u8; 4] = *b"MTrk";

/// Classification of a chunk tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// `MThd`
    Header,
    /// `MTrk`
    Track,
    /// Anything else
    Unknown,
}

impl ChunkKind {
    /// Classify a four byte tag
    pub const fn from_tag(tag: [u8; 4]) -> Self {
        match &tag {
            b"MThd" => Self::Header,
            b"MTrk" => Self::Track,
            _ => Self::Unknown,
        }
    }
}

/// A single chunk, borrowed from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChunk<'a> {
    tag: [u8; 4],
    offset: usize,
    payload: &'a [u8],
}

impl<'a> RawChunk<'a> {
    /// The four byte tag
    pub const fn tag(&self) -> [u8; 4] {
        self.tag
    }

    /// What the tag identifies
    pub const fn kind(&self) -> ChunkKind {
        ChunkKind::from_tag(self.tag)
    }

    /// Length of the payload in bytes
    pub const fn len(&self) -> u32 {
        self.payload.len() as u32
    }

    /// True for a zero-length chunk
    pub const fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Absolute offset of the chunk's tag in the file
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Absolute offset of the first payload byte in the file
    pub const fn payload_offset(&self) -> usize {
        self.offset + 8
    }

    /// The payload bytes
    pub const fn payload(&self) -> &'a [u8] {
        self.payload
    }
}

/// Why the chunk walk stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkError {
    /// Fewer than eight bytes remain, so a tag and length cannot be read
    UnexpectedEof {
        /// Where the incomplete chunk header starts
        position: usize,
    },
    /// The declared length runs past the end of the buffer
    TruncatedInput {
        /// Where the chunk starts
        position: usize,
        /// The chunk's tag
        tag: [u8; 4],
        /// The declared payload length
        declared: u32,
        /// Bytes actually available after the chunk header
        available: usize,
    },
}

/// A single forward pass over the chunks of a file.
///
/// Yields `Err` at most once, after which it is exhausted.
#[derive(Debug, Clone)]
pub struct ChunkIter<'a> {
    bytes: &'a [u8],
    position: usize,
    failed: bool,
}

impl<'a> ChunkIter<'a> {
    /// Walk the chunks of a complete file
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            position: 0,
            failed: false,
        }
    }

    /// Offset of the next chunk
    pub const fn position(&self) -> usize {
        self.position
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<RawChunk<'a>, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.position >= self.bytes.len() {
            return None;
        }
        let start = self.position;
        let rest = &self.bytes[start..];
        let Some((head, body)) = rest.split_first_chunk::<8>() else {
            self.failed = true;
            return Some(Err(ChunkError::UnexpectedEof { position: start }));
        };
        let [t0, t1, t2, t3, l0, l1, l2, l3] = *head;
        let tag = [t0, t1, t2, t3];
        let declared = u32::from_be_bytes([l0, l1, l2, l3]);

        let Some(payload) = body.get(..declared as usize) else {
            self.failed = true;
            return Some(Err(ChunkError::TruncatedInput {
                position: start,
                tag,
                declared,
                available: body.len(),
            }));
        };
        self.position = start + 8 + payload.len();

        #[cfg(feature = "tracing")]
        tracing::trace!(
            offset = start,
            length = declared,
            "chunk {:?}",
            core::str::from_utf8(&tag).unwrap_or("????")
        );

        Some(Ok(RawChunk {
            tag,
            offset: start,
            payload,
        }))
    }
}

#[test]
fn walk_chunks() {
    use pretty_assertions::assert_eq;
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 2, 0xAA, 0xBB, //
        b'X', b'Y', b'Z', b'W', 0, 0, 0, 0, //
        b'M', b'T', b'r', b'k', 0, 0, 0, 1, 0xCC,
    ];
    let chunks: Vec<_> = ChunkIter::new(&bytes).collect::<Result<_, _>>().unwrap();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].kind(), ChunkKind::Header);
    assert_eq!(chunks[0].payload(), &[0xAA, 0xBB]);
    assert_eq!(chunks[1].kind(), ChunkKind::Unknown);
    assert!(chunks[1].is_empty());
    assert_eq!(chunks[2].kind(), ChunkKind::Track);
    assert_eq!(chunks[2].offset(), 18);
    assert_eq!(chunks[2].payload_offset(), 26);
}

#[test]
fn chunk_walk_failures() {
    use pretty_assertions::assert_eq;
    let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 9, 1, 2, 3];
    let mut iter = ChunkIter::new(&bytes);
    assert_eq!(
        iter.next(),
        Some(Err(ChunkError::TruncatedInput {
            position: 0,
            tag: TRACK_TAG,
            declared: 9,
            available: 3
        }))
    );
    assert_eq!(iter.next(), None);

    let mut iter = ChunkIter::new(&[b'M', b'T', b'h']);
    assert_eq!(
        iter.next(),
        Some(Err(ChunkError::UnexpectedEof { position: 0 }))
    );
    assert_eq!(iter.next(), None);
}
