#![doc = r#"
Decode Standard MIDI Files into a tick-ordered timeline and play them back in real time.

# Overview

Decoding is a single synchronous pass over an immutable byte buffer:

```text
bytes -> ChunkIter -> (FileHeader, TrackParser x N) -> Timeline -> TempoMap
```

The resulting [`MidiFile`](crate::file::MidiFile) owns the header, the merged
[`Timeline`](crate::file::Timeline), the [`TempoMap`](crate::file::TempoMap) and
every non-fatal [`Diagnostic`](crate::file::Diagnostic) found along the way.

With the `std` feature, a [`Scheduler`](crate::player::Scheduler) walks the timeline
and dispatches each event to an [`OutputSink`](crate::player::OutputSink) at the right
moment, driven by an injected [`Clock`](crate::player::Clock).

# Example
```rust
# use smfplay::prelude::*;
let mut track = TrackWriter::new();
track.push(0, &TrackMessage::Meta(MetaEvent::Tempo(600_000))).unwrap();
track.push(0, &ChannelVoiceEvent::note_on(Channel::One, 60, 100).into()).unwrap();
track.push(480, &ChannelVoiceEvent::note_off(Channel::One, 60, 0).into()).unwrap();
track.end_of_track(0).unwrap();

let bytes = FileWriter::new(Format::SingleTrack, TimeDivision::ticks_per_quarter_note(480))
    .track(track.finish())
    .finish()
    .unwrap();

let file = MidiFile::parse(&bytes).unwrap();
assert_eq!(file.timeline().len(), 4);
assert_eq!(file.duration().us(), 600_000);
```
"#]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod file;
pub mod message;
pub mod reader;
pub mod writer;

mod micros;
pub use micros::*;

#[cfg(feature = "std")]
pub mod player;

/// Commonly used types
pub mod prelude {
    pub use crate::file::*;
    pub use crate::message::*;
    pub use crate::micros::*;
    pub use crate::reader::{ReadResult, Reader, ReaderError, ReaderErrorKind};
    pub use crate::writer::*;

    #[cfg(feature = "std")]
    pub use crate::player::*;
}
