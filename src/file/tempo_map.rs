use alloc::vec::Vec;

use crate::{
    UMicros,
    file::{DEFAULT_TEMPO, TimeDivision, Timeline},
};

/// A tempo in effect from `ticks` onwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoMapEntry {
    /// First tick the tempo applies to
    pub ticks: i64,
    /// Microseconds per quarter note
    pub micros_per_quarter: u32,
}

#[doc = r#"
Converts tick positions into elapsed microseconds.

The map always starts with a tempo at tick 0; without an explicit tempo event
that is 500 000 µs per quarter note (120 BPM). When two tempo changes share a
tick the later one wins.

Time is accumulated as an exact integer sum of `ticks * tempo` products and
divided once, so long files do not drift.

# Example
```rust
# use smfplay::prelude::*;
let mut map = TempoMap::new();
map.insert(960, 1_000_000);
let division = TimeDivision::ticks_per_quarter_note(480);
assert_eq!(map.ticks_to_micros(division, 480).us(), 500_000);
assert_eq!(map.ticks_to_micros(division, 1440).us(), 2_000_000);
```
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempoMap {
    entries: Vec<TempoMapEntry>,
    // sum of ticks * tempo from tick 0 up to the start of each entry
    weighted: Vec<u128>,
}

impl Default for TempoMap {
    fn default() -> Self {
        Self::new()
    }
}

impl TempoMap {
    /// A map holding only the default tempo
    pub fn new() -> Self {
        Self {
            entries: alloc::vec![TempoMapEntry {
                ticks: 0,
                micros_per_quarter: DEFAULT_TEMPO,
            }],
            weighted: alloc::vec![0],
        }
    }

    /// Collect every tempo meta event of a timeline.
    pub fn from_timeline(timeline: &Timeline<'_>) -> Self {
        let mut map = Self::new();
        for event in timeline {
            if let Some(tempo) = event.message().tempo() {
                map.push(event.ticks(), tempo);
            }
        }
        map.recompute();
        map
    }

    /// Add a tempo change, replacing any change already at `ticks`.
    pub fn insert(&mut self, ticks: i64, micros_per_quarter: u32) {
        let ticks = ticks.max(0);
        match self.entries.binary_search_by_key(&ticks, |e| e.ticks) {
            Ok(i) => self.entries[i].micros_per_quarter = micros_per_quarter,
            Err(i) => self.entries.insert(
                i,
                TempoMapEntry {
                    ticks,
                    micros_per_quarter,
                },
            ),
        }
        self.recompute();
    }

    // entries arrive in tick order from a timeline
    fn push(&mut self, ticks: i64, micros_per_quarter: u32) {
        let ticks = ticks.max(0);
        match self.entries.last_mut() {
            Some(last) if last.ticks == ticks => last.micros_per_quarter = micros_per_quarter,
            _ => self.entries.push(TempoMapEntry {
                ticks,
                micros_per_quarter,
            }),
        }
    }

    fn recompute(&mut self) {
        self.weighted.clear();
        let mut acc: u128 = 0;
        let mut previous: Option<&TempoMapEntry> = None;
        for entry in &self.entries {
            if let Some(prev) = previous {
                acc += (entry.ticks - prev.ticks) as u128 * prev.micros_per_quarter as u128;
            }
            self.weighted.push(acc);
            previous = Some(entry);
        }
    }

    /// The tempo changes in tick order
    pub fn entries(&self) -> &[TempoMapEntry] {
        &self.entries
    }

    /// Index of the entry in effect at `tick`
    fn segment(&self, tick: i64) -> usize {
        self.entries
            .partition_point(|e| e.ticks <= tick)
            .saturating_sub(1)
    }

    /// Microseconds per quarter note in effect at `tick`
    pub fn tempo_at(&self, tick: i64) -> u32 {
        self.entries[self.segment(tick)].micros_per_quarter
    }

    /// Elapsed time from tick 0 to `tick`.
    ///
    /// With [`TimeDivision::Smpte`] the tempo map is ignored: a tick is a fixed
    /// fraction of a frame.
    pub fn ticks_to_micros(&self, division: TimeDivision, tick: i64) -> UMicros {
        let tick = tick.max(0);
        let micros = match division {
            TimeDivision::Ppq { ticks_per_quarter } => {
                let i = self.segment(tick);
                let entry = &self.entries[i];
                let weighted = self.weighted[i]
                    + (tick - entry.ticks) as u128 * entry.micros_per_quarter as u128;
                weighted / ticks_per_quarter.max(1) as u128
            }
            TimeDivision::Smpte {
                fps,
                ticks_per_frame,
            } => {
                // µs = tick / (fps * tpf) * 1e6, with fps = num / den
                let (num, den) = fps.as_ratio();
                tick as u128 * 1_000_000 * den as u128
                    / (num as u128 * ticks_per_frame.max(1) as u128)
            }
        };
        UMicros::new(u64::try_from(micros).unwrap_or(u64::MAX))
    }
}

#[test]
fn default_tempo_is_120_bpm() {
    let map = TempoMap::new();
    let division = TimeDivision::ticks_per_quarter_note(480);
    assert_eq!(map.ticks_to_micros(division, 480).us(), 500_000);
    assert_eq!(map.ticks_to_micros(division, 0).us(), 0);
    assert_eq!(map.tempo_at(1_000_000), DEFAULT_TEMPO);
}

#[test]
fn tempo_segments_accumulate() {
    use pretty_assertions::assert_eq;
    let mut map = TempoMap::new();
    map.insert(960, 1_000_000);
    let division = TimeDivision::ticks_per_quarter_note(480);
    // two quarters at 120 bpm, then one at 60 bpm
    assert_eq!(map.ticks_to_micros(division, 1440).us(), 2_000_000);
    assert_eq!(map.ticks_to_micros(division, 1920).us(), 3_000_000);
    assert_eq!(map.ticks_to_micros(division, 960).us(), 1_000_000);
    assert_eq!(map.tempo_at(959), 500_000);
    assert_eq!(map.tempo_at(960), 1_000_000);
}

#[test]
fn duplicate_ticks_last_wins() {
    use pretty_assertions::assert_eq;
    let mut map = TempoMap::new();
    map.insert(0, 400_000);
    map.insert(0, 250_000);
    assert_eq!(
        map.entries(),
        &[TempoMapEntry {
            ticks: 0,
            micros_per_quarter: 250_000
        }]
    );
}

#[test]
fn no_drift_over_many_changes() {
    let mut map = TempoMap::new();
    // a tempo that does not divide evenly by the division
    for i in 0..10_000 {
        map.push(i * 7, 333_333);
    }
    map.recompute();
    let division = TimeDivision::ticks_per_quarter_note(7);
    // every 7 ticks is exactly one quarter note
    assert_eq!(map.ticks_to_micros(division, 70_000).us(), 3_333_330_000);
}

#[test]
fn smpte_ignores_tempo() {
    use crate::file::SmpteFps;
    let mut map = TempoMap::new();
    map.insert(10, 1);
    // 25 fps * 40 ticks = 1000 ticks per second
    let division = TimeDivision::smpte(SmpteFps::TwentyFive, 40);
    assert_eq!(map.ticks_to_micros(division, 1500).us(), 1_500_000);
    // 29.97 fps * 100 ticks: thirty frames last 1.001 s
    let division = TimeDivision::smpte(SmpteFps::TwentyNine, 100);
    assert_eq!(map.ticks_to_micros(division, 2997).us(), 999_999);
    assert_eq!(map.ticks_to_micros(division, 3000).us(), 1_001_000);
}
