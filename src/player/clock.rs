use std::{thread, time::Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::UMicros;

/// How a [`Clock::wait_until`] call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitOutcome {
    /// The deadline was reached
    Elapsed,
    /// A cancellation arrived first
    Cancelled,
}

#[doc = r#"
The time source a [`Scheduler`](super::Scheduler) plays against.

A clock must be able to wait *interruptibly*: `wait_until` returns as soon as
a value arrives on `cancel`, without waiting out the deadline.
"#]
pub trait Clock {
    /// Microseconds since an arbitrary fixed point
    fn now(&self) -> UMicros;

    /// Block until `now() >= deadline` or a message arrives on `cancel`.
    fn wait_until(&self, deadline: UMicros, cancel: &Receiver<()>) -> WaitOutcome;
}

/// Wall clock time, waiting on the cancel channel with a timeout.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// A clock reading zero now
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> UMicros {
        let elapsed = self.epoch.elapsed().as_micros();
        UMicros::new(u64::try_from(elapsed).unwrap_or(u64::MAX))
    }

    fn wait_until(&self, deadline: UMicros, cancel: &Receiver<()>) -> WaitOutcome {
        loop {
            let now = self.now();
            if now >= deadline {
                return WaitOutcome::Elapsed;
            }
            let remaining = (deadline - now).as_duration();
            match cancel.recv_timeout(remaining) {
                Ok(()) => return WaitOutcome::Cancelled,
                // timeouts can fire early; re-check against the clock
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => thread::sleep(remaining),
            }
        }
    }
}

#[test]
fn system_clock_waits_and_interrupts() {
    use std::time::Duration;
    let clock = SystemClock::new();
    let (tx, rx) = crossbeam_channel::bounded(1);

    let deadline = clock.now() + UMicros::from_ms(5);
    assert_eq!(clock.wait_until(deadline, &rx), WaitOutcome::Elapsed);
    assert!(clock.now() >= deadline);

    tx.send(()).unwrap();
    let start = Instant::now();
    let far = clock.now() + UMicros::from_ms(60_000);
    assert_eq!(clock.wait_until(far, &rx), WaitOutcome::Cancelled);
    assert!(start.elapsed() < Duration::from_secs(5));
}
