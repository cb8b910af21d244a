use alloc::vec::Vec;

use crate::{
    file::{Format, ParsedTrack, TimeDivision},
    message::TrackMessage,
};

/// An event placed on the file-wide tick axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEvent<'a> {
    ticks: i64,
    track_origin: i64,
    track: usize,
    order: usize,
    message: TrackMessage<'a>,
}

impl<'a> TimedEvent<'a> {
    /// Create an event at an absolute tick
    pub const fn new(
        ticks: i64,
        track_origin: i64,
        track: usize,
        order: usize,
        message: TrackMessage<'a>,
    ) -> Self {
        Self {
            ticks,
            track_origin,
            track,
            order,
            message,
        }
    }

    /// Ticks from the start of the timeline
    pub const fn ticks(&self) -> i64 {
        self.ticks
    }

    /// Tick at which this event's track starts. Non-zero only in format 2 files.
    pub const fn track_origin(&self) -> i64 {
        self.track_origin
    }

    /// Index of the track the event came from
    pub const fn track(&self) -> usize {
        self.track
    }

    /// Position of the event within its track
    pub const fn order(&self) -> usize {
        self.order
    }

    /// The decoded message
    pub const fn message(&self) -> &TrackMessage<'a> {
        &self.message
    }

    /// Copies any borrowed bytes so the event no longer borrows the input.
    pub fn into_owned(self) -> TimedEvent<'static> {
        TimedEvent {
            ticks: self.ticks,
            track_origin: self.track_origin,
            track: self.track,
            order: self.order,
            message: self.message.into_owned(),
        }
    }
}

#[doc = r#"
Every event of a file in ascending tick order.

Events at the same tick keep their track order, then their order within the
track. A tempo change on a conductor track therefore precedes notes on later
tracks at the same tick.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline<'a> {
    division: TimeDivision,
    events: Vec<TimedEvent<'a>>,
}

impl<'a> Timeline<'a> {
    /// Merge per-track event lists into one timeline.
    ///
    /// In a [`Format::MultiSequential`] file each track starts where the previous
    /// one ended. Otherwise every track starts at tick 0.
    pub fn merge<I>(format: Format, division: TimeDivision, tracks: I) -> Self
    where
        I: IntoIterator<Item = ParsedTrack<'a>>,
    {
        let mut events = Vec::new();
        let mut origin: i64 = 0;
        for track in tracks {
            let index = track.index();
            let length = track.length_ticks() as i64;
            events.extend(track.into_events().into_iter().enumerate().map(|(order, e)| {
                let ticks = origin + e.ticks() as i64;
                TimedEvent::new(ticks, origin, index, order, e.into_message())
            }));
            if format.is_sequential() {
                origin += length;
            }
        }
        // stable, and fully keyed so input order does not matter
        events.sort_by_key(|e| (e.ticks, e.track, e.order));

        #[cfg(feature = "tracing")]
        tracing::debug!(events = events.len(), "merged timeline");

        Self { division, events }
    }

    /// Build a timeline from events that are already in order
    pub fn from_sorted(division: TimeDivision, events: Vec<TimedEvent<'a>>) -> Self {
        debug_assert!(events.windows(2).all(|w| w[0].ticks <= w[1].ticks));
        Self { division, events }
    }

    /// The file's time base
    pub const fn division(&self) -> TimeDivision {
        self.division
    }

    /// The events in playback order
    pub fn events(&self) -> &[TimedEvent<'a>] {
        &self.events
    }

    /// Iterate the events in playback order
    pub fn iter(&self) -> core::slice::Iter<'_, TimedEvent<'a>> {
        self.events.iter()
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when there is nothing to play
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Tick of the last event
    pub fn last_tick(&self) -> i64 {
        self.events.last().map(|e| e.ticks).unwrap_or(0)
    }

    /// Copies any borrowed bytes so the timeline no longer borrows the input.
    pub fn into_owned(self) -> Timeline<'static> {
        Timeline {
            division: self.division,
            events: self.events.into_iter().map(TimedEvent::into_owned).collect(),
        }
    }
}

impl<'a, 't> IntoIterator for &'t Timeline<'a> {
    type Item = &'t TimedEvent<'a>;
    type IntoIter = core::slice::Iter<'t, TimedEvent<'a>>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
fn track(index: usize, bytes: &[u8]) -> ParsedTrack<'_> {
    ParsedTrack::parse(index, bytes, 0)
}

#[test]
fn simultaneous_tracks_interleave() {
    use pretty_assertions::assert_eq;
    // track 0: tempo at 0, note at 96
    let conductor = [
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, //
        0x60, 0x90, 0x30, 0x40, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    // track 1: note at 0, note at 48
    let melody = [
        0x00, 0x91, 0x40, 0x40, //
        0x30, 0x91, 0x41, 0x40, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let timeline = Timeline::merge(
        Format::MultiSimultaneous,
        TimeDivision::ticks_per_quarter_note(96),
        [track(0, &conductor), track(1, &melody)],
    );
    let order: Vec<_> = timeline.iter().map(|e| (e.ticks(), e.track())).collect();
    assert_eq!(order, [(0, 0), (0, 1), (48, 1), (48, 1), (96, 0), (96, 0)]);
    assert!(timeline.events()[0].message().tempo().is_some());
}

#[test]
fn sequential_tracks_are_laid_end_to_end() {
    use pretty_assertions::assert_eq;
    let first = [0x00, 0x90, 0x30, 0x40, 0x83, 0x60, 0xFF, 0x2F, 0x00];
    let second = [0x00, 0x90, 0x32, 0x40, 0x60, 0xFF, 0x2F, 0x00];
    let timeline = Timeline::merge(
        Format::MultiSequential,
        TimeDivision::ticks_per_quarter_note(480),
        [track(0, &first), track(1, &second)],
    );
    let ticks: Vec<_> = timeline.iter().map(|e| e.ticks()).collect();
    assert_eq!(ticks, [0, 480, 480, 576]);
    assert_eq!(timeline.events()[2].track_origin(), 480);
    assert_eq!(timeline.last_tick(), 576);
}
