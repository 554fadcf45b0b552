use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Longest accepted poll interval. Keeps timer deadlines representable.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Delay between delta polls. The first poll runs one interval after start.
    pub poll_interval: Duration,
}

impl SyncConfig {
    /// `poll_interval` clamped to what the poll timer can schedule.
    pub fn poll_period(&self) -> Duration {
        self.poll_interval.clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
