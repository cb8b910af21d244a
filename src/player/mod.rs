#![doc = r#"
Real-time playback of a decoded timeline

A [`Scheduler`] owns a [`Clock`] and walks a [`Timeline`](crate::file::Timeline),
converting each event's tick into microseconds with a
[`TempoMap`](crate::file::TempoMap) and handing it to an [`OutputSink`] when it
falls due. Playback blocks the calling thread; a [`CancelHandle`] stops it from
any other thread.
"#]

mod clock;
pub use clock::*;

mod sink;
pub use sink::OutputSink;

mod scheduler;
pub use scheduler::*;
