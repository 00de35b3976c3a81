//! Upload progress telemetry.

use serde::{Deserialize, Serialize};

/// A single progress report from the conversion backend.
///
/// Transient; not persisted. A percent of 100 signals completion of the
/// channel that delivered it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Completion percentage, 0 through 100.
    pub percent: u8,
}

impl ProgressEvent {
    /// Create a progress event, clamping to 100.
    pub fn new(percent: u8) -> Self {
        Self {
            percent: percent.min(100),
        }
    }

    /// Build an event from a raw wire integer, clamping into 0..=100.
    pub fn from_raw(raw: i64) -> Self {
        Self {
            percent: raw.clamp(0, 100) as u8,
        }
    }

    /// Whether this event signals completion.
    pub fn is_done(self) -> bool {
        self.percent >= 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(ProgressEvent::from_raw(-5).percent, 0);
        assert_eq!(ProgressEvent::from_raw(45).percent, 45);
        assert_eq!(ProgressEvent::from_raw(250).percent, 100);
        assert_eq!(ProgressEvent::new(120).percent, 100);
    }

    #[test]
    fn hundred_percent_is_done() {
        assert!(ProgressEvent::new(100).is_done());
        assert!(!ProgressEvent::new(99).is_done());
    }
}
