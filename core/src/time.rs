use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_derive::{Deserialize, Serialize};

/// Wall clock instant in milliseconds since the UNIX epoch.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
  pub fn new(millis: u64) -> Timestamp {
    Timestamp(millis)
  }

  pub fn now() -> Timestamp {
    Timestamp::from(SystemTime::now())
  }

  pub fn millis(&self) -> u64 {
    self.0
  }

  pub fn to_system_time(&self) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(self.0)
  }
}

impl From<SystemTime> for Timestamp {
  // Instants before the epoch collapse to zero.
  fn from(time: SystemTime) -> Self {
    let elapsed = time.duration_since(UNIX_EPOCH).unwrap_or_default();
    Timestamp(elapsed.as_secs() * 1000 + u64::from(elapsed.subsec_millis()))
  }
}

impl From<Timestamp> for u64 {
  fn from(item: Timestamp) -> Self {
    item.0
  }
}
