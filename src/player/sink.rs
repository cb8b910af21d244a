use crate::{
    file::MetaEvent,
    message::{Channel, ChannelVoiceEvent, TrackMessage, VoiceEvent},
};

#[doc = r#"
Receives events from a [`Scheduler`](super::Scheduler) as they become due.

Every handler has a default that does nothing, so a sink only implements what
it cares about. An `Err` from any handler stops playback and is returned from
[`Scheduler::start`](super::Scheduler::start).

# Example
```rust
# use smfplay::prelude::*;
#[derive(Default)]
struct Count(usize);

impl OutputSink for Count {
    type Error = core::convert::Infallible;
    fn on_note_on(&mut self, _: Channel, _: u8, _: u8) -> Result<(), Self::Error> {
        self.0 += 1;
        Ok(())
    }
}
```
"#]
pub trait OutputSink {
    /// Failure type of this sink
    type Error;

    /// A note started. Velocity is never zero.
    fn on_note_on(&mut self, channel: Channel, note: u8, velocity: u8) -> Result<(), Self::Error> {
        let _ = (channel, note, velocity);
        Ok(())
    }

    /// A note stopped, including note-ons with velocity zero
    fn on_note_off(&mut self, channel: Channel, note: u8, velocity: u8) -> Result<(), Self::Error> {
        let _ = (channel, note, velocity);
        Ok(())
    }

    /// Any other channel voice message
    fn on_channel_event(&mut self, event: &ChannelVoiceEvent) -> Result<(), Self::Error> {
        let _ = event;
        Ok(())
    }

    /// New tempo in microseconds per quarter note
    fn on_tempo_change(&mut self, micros_per_quarter: u32) -> Result<(), Self::Error> {
        let _ = micros_per_quarter;
        Ok(())
    }

    /// Any meta event other than a tempo change
    fn on_meta(&mut self, event: &MetaEvent<'_>) -> Result<(), Self::Error> {
        let _ = event;
        Ok(())
    }

    /// A system exclusive or escape payload
    fn on_sysex(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let _ = data;
        Ok(())
    }

    /// Playback reached the end of the timeline
    fn on_end(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Route one message to the matching handler.
pub(crate) fn dispatch<S: OutputSink + ?Sized>(
    sink: &mut S,
    message: &TrackMessage<'_>,
) -> Result<(), S::Error> {
    match message {
        TrackMessage::ChannelVoice(event) => {
            let channel = event.channel();
            match *event.event() {
                VoiceEvent::NoteOn { note, velocity: 0 } => sink.on_note_off(channel, note, 0),
                VoiceEvent::NoteOn { note, velocity } => sink.on_note_on(channel, note, velocity),
                VoiceEvent::NoteOff { note, velocity } => sink.on_note_off(channel, note, velocity),
                _ => sink.on_channel_event(event),
            }
        }
        TrackMessage::SystemExclusive(sysex) => sink.on_sysex(sysex.data()),
        TrackMessage::Meta(MetaEvent::Tempo(tempo)) => sink.on_tempo_change(*tempo),
        TrackMessage::Meta(meta) => sink.on_meta(meta),
    }
}

#[test]
fn zero_velocity_note_on_is_a_note_off() {
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Notes(Vec<(bool, u8, u8)>);
    impl OutputSink for Notes {
        type Error = ();
        fn on_note_on(&mut self, _: Channel, note: u8, velocity: u8) -> Result<(), ()> {
            self.0.push((true, note, velocity));
            Ok(())
        }
        fn on_note_off(&mut self, _: Channel, note: u8, velocity: u8) -> Result<(), ()> {
            self.0.push((false, note, velocity));
            Ok(())
        }
    }

    let mut sink = Notes::default();
    for message in [
        ChannelVoiceEvent::note_on(Channel::Three, 60, 64),
        ChannelVoiceEvent::note_on(Channel::Three, 60, 0),
        ChannelVoiceEvent::note_off(Channel::Three, 62, 10),
    ] {
        dispatch(&mut sink, &message.into()).unwrap();
    }
    assert_eq!(sink.0, [(true, 60, 64), (false, 60, 0), (false, 62, 10)]);
}
