//! Clock abstraction for timestamp stamping.
//!
//! Changelog entries and build dates carry the current time. Routing all
//! time reads through [`Clock`] keeps the engine deterministic under test.

use chrono::{DateTime, Utc};

/// Source of the current time
pub trait Clock {
  fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// Clock returning a fixed instant, for tests
#[derive(Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    self.0
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn fixed_clock_returns_given_instant() {
    let instant = Utc.with_ymd_and_hms(2016, 1, 1, 12, 0, 0).unwrap();
    let clock = FixedClock(instant);
    assert_eq!(clock.now(), instant);
    assert_eq!(clock.now(), instant);
  }
}
