use alloc::borrow::Cow;

/// A system exclusive span, passed through without interpretation.
///
/// `F0` events carry the bytes following the `F0` status; `F7` escape events
/// carry arbitrary bytes meant to be sent as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysexEvent<'a> {
    escape: bool,
    data: Cow<'a, [u8]>,
}

impl<'a> SysexEvent<'a> {
    /// A sysex span introduced by `F0`
    pub fn new(data: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            escape: false,
            data: data.into(),
        }
    }

    /// An escape span introduced by `F7`
    pub fn escape(data: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            escape: true,
            data: data.into(),
        }
    }

    /// True when introduced by `F7`
    pub fn is_escape(&self) -> bool {
        self.escape
    }

    /// The status byte that introduced the span
    pub fn status(&self) -> u8 {
        if self.escape { 0xF7 } else { 0xF0 }
    }

    /// Raw payload bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Copy the payload out of the input buffer
    pub fn into_owned(self) -> SysexEvent<'static> {
        SysexEvent {
            escape: self.escape,
            data: Cow::Owned(self.data.into_owned()),
        }
    }
}
