use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

use crate::{
    file::{TempoMap, Timeline},
    player::{Clock, OutputSink, SystemClock, WaitOutcome, sink::dispatch},
};

/// Lifecycle of a [`Scheduler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PlaybackState {
    /// Ready to start
    Idle = 0,
    /// Inside [`Scheduler::start`]
    Running = 1,
    /// Stopped by [`CancelHandle::cancel`]
    Cancelled = 2,
    /// Played to the end, or stopped by a sink error
    Finished = 3,
}

impl PlaybackState {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Cancelled,
            _ => Self::Finished,
        }
    }
}

/// How a playback ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackOutcome {
    /// Every event was dispatched and [`OutputSink::on_end`] was called
    Completed {
        /// Events handed to the sink
        dispatched: usize,
    },
    /// Cancelled before the end. No handler ran after the cancel was seen.
    Cancelled {
        /// Events handed to the sink before the cancel
        dispatched: usize,
    },
}

/// Why a playback could not run to an outcome
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError<E> {
    /// `start` requires an idle scheduler
    #[error("Scheduler is {0:?}, expected Idle")]
    InvalidState(PlaybackState),
    /// A sink handler failed
    #[error("Output sink failed")]
    Sink(E),
}

/// Cancels a playback from any thread.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    state: Arc<AtomicU8>,
    wake: Sender<()>,
}

impl CancelHandle {
    /// Stop the playback.
    ///
    /// Returns false if it had already finished or been cancelled.
    pub fn cancel(&self) -> bool {
        let cancelled = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                match PlaybackState::from_raw(raw) {
                    PlaybackState::Idle | PlaybackState::Running => {
                        Some(PlaybackState::Cancelled as u8)
                    }
                    _ => None,
                }
            })
            .is_ok();
        if cancelled {
            // a full channel already holds a wake-up
            let _ = self.wake.try_send(());
        }
        cancelled
    }

    /// True once the playback was cancelled
    pub fn is_cancelled(&self) -> bool {
        PlaybackState::from_raw(self.state.load(Ordering::Acquire)) == PlaybackState::Cancelled
    }
}

#[doc = r#"
Plays a [`Timeline`] into an [`OutputSink`] in real time.

Each event is due at its tempo-mapped time measured from the moment playback
started, so waits never accumulate error. Cancellation is checked before and
after every wait, and the wait itself is interrupted by
[`CancelHandle::cancel`].

```text
Idle --start--> Running --end--> Finished
  |               |
  +----cancel-----+-----> Cancelled
```

# Example
```rust
# use smfplay::prelude::*;
struct Silent;
impl OutputSink for Silent {
    type Error = core::convert::Infallible;
}

let mut track = TrackWriter::new();
track.push(0, &ChannelVoiceEvent::note_on(Channel::One, 60, 100).into()).unwrap();
track.end_of_track(1).unwrap();
let bytes = FileWriter::new(Format::SingleTrack, TimeDivision::ticks_per_quarter_note(480))
    .track(track.finish())
    .finish()
    .unwrap();
let file = MidiFile::parse(&bytes).unwrap();

let scheduler = Scheduler::new(SystemClock::new());
let outcome = scheduler.start(file.timeline(), file.tempo_map(), &mut Silent).unwrap();
assert_eq!(outcome, PlaybackOutcome::Completed { dispatched: 2 });
assert_eq!(scheduler.state(), PlaybackState::Finished);
```
"#]
#[derive(Debug)]
pub struct Scheduler<C = SystemClock> {
    clock: C,
    state: Arc<AtomicU8>,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl Default for Scheduler<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock::new())
    }
}

impl<C: Clock> Scheduler<C> {
    /// An idle scheduler timed by `clock`
    pub fn new(clock: C) -> Self {
        let (wake_tx, wake_rx) = crossbeam_channel::bounded(1);
        Self {
            clock,
            state: Arc::new(AtomicU8::new(PlaybackState::Idle as u8)),
            wake_tx,
            wake_rx,
        }
    }

    /// The injected clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current lifecycle state
    pub fn state(&self) -> PlaybackState {
        PlaybackState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// A handle that can cancel playback from another thread
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            state: Arc::clone(&self.state),
            wake: self.wake_tx.clone(),
        }
    }

    /// Same as [`CancelHandle::cancel`]
    pub fn cancel(&self) -> bool {
        self.cancel_handle().cancel()
    }

    /// Return a finished or cancelled scheduler to [`PlaybackState::Idle`].
    ///
    /// Returns false while running.
    pub fn reset(&self) -> bool {
        if self.state() == PlaybackState::Running {
            return false;
        }
        while self.wake_rx.try_recv().is_ok() {}
        let raw = self.state.load(Ordering::Acquire);
        raw != PlaybackState::Running as u8
            && self
                .state
                .compare_exchange(
                    raw,
                    PlaybackState::Idle as u8,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
    }

    fn is_cancelled(&self) -> bool {
        self.state() == PlaybackState::Cancelled
    }

    /// Play `timeline` into `sink`, blocking until it ends or is cancelled.
    pub fn start<S>(
        &self,
        timeline: &Timeline<'_>,
        tempo_map: &TempoMap,
        sink: &mut S,
    ) -> Result<PlaybackOutcome, PlaybackError<S::Error>>
    where
        S: OutputSink + ?Sized,
    {
        self.state
            .compare_exchange(
                PlaybackState::Idle as u8,
                PlaybackState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|raw| PlaybackError::InvalidState(PlaybackState::from_raw(raw)))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(events = timeline.len(), "playback started");

        let result = self.run(timeline, tempo_map, sink);
        if result.is_err() {
            // a cancel may have won the race; keep it
            let _ = self.state.compare_exchange(
                PlaybackState::Running as u8,
                PlaybackState::Finished as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
        }

        #[cfg(feature = "tracing")]
        match &result {
            Ok(outcome) => tracing::debug!(?outcome, "playback ended"),
            Err(_) => tracing::debug!("playback stopped by sink error"),
        }

        result
    }

    fn run<S>(
        &self,
        timeline: &Timeline<'_>,
        tempo_map: &TempoMap,
        sink: &mut S,
    ) -> Result<PlaybackOutcome, PlaybackError<S::Error>>
    where
        S: OutputSink + ?Sized,
    {
        let division = timeline.division();
        let origin = self.clock.now();
        let mut dispatched = 0;

        for event in timeline {
            if self.is_cancelled() {
                return Ok(PlaybackOutcome::Cancelled { dispatched });
            }
            let due = origin.saturating_add(tempo_map.ticks_to_micros(division, event.ticks()));
            if self.clock.wait_until(due, &self.wake_rx) == WaitOutcome::Cancelled
                || self.is_cancelled()
            {
                return Ok(PlaybackOutcome::Cancelled { dispatched });
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(ticks = event.ticks(), track = event.track(), due = due.us(), "dispatch");

            dispatch(sink, event.message()).map_err(PlaybackError::Sink)?;
            dispatched += 1;
        }

        let finished = self.state.compare_exchange(
            PlaybackState::Running as u8,
            PlaybackState::Finished as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        if finished.is_err() {
            return Ok(PlaybackOutcome::Cancelled { dispatched });
        }
        sink.on_end().map_err(PlaybackError::Sink)?;
        Ok(PlaybackOutcome::Completed { dispatched })
    }
}
