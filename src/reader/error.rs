use thiserror::Error;

#[doc = r#"
An error produced while reading raw bytes
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReaderErrorKind {
    /// A read would go past the end of the buffer.
    #[error("Read of {needed} byte(s) exceeds the {remaining} remaining")]
    TruncatedInput {
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },
    /// A variable-length quantity continued past four bytes.
    #[error("Variable-length quantity is longer than four bytes")]
    InvalidVariableLength,
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }
    /// True if the read ran past the end of the buffer
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::TruncatedInput { .. })
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
