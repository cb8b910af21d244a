#![doc = r#"
Messages that can appear inside a track chunk

# Hierarchy
```text
                   |---------------|
                   | Track Message |
                   |---------------|
                 /        |          \
|---------------|  |-------------|  |------------|
| Channel Voice |  |    Sysex    |  | Meta Event |
|---------------|  |-------------|  |------------|
```
"#]

pub mod channel;
pub use channel::*;

mod sysex;
pub use sysex::*;

use crate::file::MetaEvent;

/// Any event a track chunk can contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackMessage<'a> {
    /// A channel voice message
    ChannelVoice(ChannelVoiceEvent),
    /// A system exclusive or escape span
    SystemExclusive(SysexEvent<'a>),
    /// A meta event
    Meta(MetaEvent<'a>),
}

impl TrackMessage<'_> {
    /// Copies any borrowed bytes so the message no longer borrows the input.
    pub fn into_owned(self) -> TrackMessage<'static> {
        match self {
            Self::ChannelVoice(c) => TrackMessage::ChannelVoice(c),
            Self::SystemExclusive(s) => TrackMessage::SystemExclusive(s.into_owned()),
            Self::Meta(m) => TrackMessage::Meta(m.into_owned()),
        }
    }

    /// True for the end-of-track meta event
    pub fn is_end_of_track(&self) -> bool {
        matches!(self, Self::Meta(MetaEvent::EndOfTrack))
    }

    /// The tempo carried by a tempo meta event, if this is one
    pub fn tempo(&self) -> Option<u32> {
        match self {
            Self::Meta(MetaEvent::Tempo(t)) => Some(*t),
            _ => None,
        }
    }
}

impl From<ChannelVoiceEvent> for TrackMessage<'_> {
    fn from(value: ChannelVoiceEvent) -> Self {
        Self::ChannelVoice(value)
    }
}

impl<'a> From<SysexEvent<'a>> for TrackMessage<'a> {
    fn from(value: SysexEvent<'a>) -> Self {
        Self::SystemExclusive(value)
    }
}

impl<'a> From<MetaEvent<'a>> for TrackMessage<'a> {
    fn from(value: MetaEvent<'a>) -> Self {
        Self::Meta(value)
    }
}
