use std::time::Duration;

use thiserror::Error;

pub const MIN_WINDOW_HOURS: u32 = 1;
pub const MAX_WINDOW_HOURS: u32 = 168;
pub const DEFAULT_WINDOW_HOURS: u32 = 24;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("hours must be between 1 and 168, got {0}")]
    OutOfRange(u32),
}

/// Query window in whole hours, 1 to 168 (one week)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow(u32);

impl TimeWindow {
    pub fn hours(hours: u32) -> Result<Self, WindowError> {
        if !(MIN_WINDOW_HOURS..=MAX_WINDOW_HOURS).contains(&hours) {
            return Err(WindowError::OutOfRange(hours));
        }
        Ok(Self(hours))
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.0) * 3600)
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self(DEFAULT_WINDOW_HOURS)
    }
}
