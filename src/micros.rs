use core::ops::{Add, AddAssign, Sub};

/// Unsigned Microseconds
///
/// All playback times in this crate are whole microseconds measured from the
/// start of the timeline.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UMicros(u64);

impl UMicros {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates a new instance of microseconds
    #[inline]
    pub const fn new(microseconds: u64) -> Self {
        Self(microseconds)
    }

    /// Returns the microseconds as a u64
    #[inline]
    pub const fn us(&self) -> u64 {
        self.0
    }

    /// ms -> us
    #[inline]
    pub const fn from_ms(ms: u64) -> Self {
        Self(ms * 1_000)
    }

    /// Returns seconds
    #[inline]
    pub const fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000.
    }

    /// Returns no time if I am less than other.
    pub const fn saturating_sub(&self, other: Self) -> UMicros {
        if self.0 < other.0 {
            UMicros(0)
        } else {
            UMicros(self.0 - other.0)
        }
    }

    /// Adds, clamping at [`u64::MAX`] microseconds.
    pub const fn saturating_add(&self, other: Self) -> UMicros {
        UMicros(self.0.saturating_add(other.0))
    }

    /// Converts into a [`core::time::Duration`].
    #[inline]
    pub const fn as_duration(&self) -> core::time::Duration {
        core::time::Duration::from_micros(self.0)
    }
}

impl Add for UMicros {
    type Output = UMicros;
    fn add(self, rhs: Self) -> Self::Output {
        UMicros(self.0 + rhs.0)
    }
}

impl AddAssign for UMicros {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for UMicros {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        UMicros(self.0 - rhs.0)
    }
}

impl From<UMicros> for core::time::Duration {
    fn from(value: UMicros) -> Self {
        value.as_duration()
    }
}

#[test]
fn saturating_ops() {
    let a = UMicros::new(5);
    let b = UMicros::from_ms(1);
    assert_eq!(a.saturating_sub(b), UMicros::ZERO);
    assert_eq!(b.saturating_sub(a).us(), 995);
    assert_eq!(UMicros::new(u64::MAX).saturating_add(a).us(), u64::MAX);
    assert_eq!(b.as_duration(), core::time::Duration::from_millis(1));
}
