//! Step-count integration.

/// Source of the step count snapshotted when a workout is saved.
pub trait StepCounter {
    /// Steps observed so far this session, or `None` if nothing was counted.
    fn steps(&self) -> Option<u64>;
}

/// Live step count for the current session.
///
/// Readings never move the count backwards: a sensor that reports a lower
/// value (after a reset, say) is ignored until it catches up.
#[derive(Debug, Default)]
pub struct SessionPedometer {
    count: Option<u64>,
}

impl SessionPedometer {
    /// Records a reading from the sensor.
    pub fn observe(&mut self, reading: u64) {
        self.count = Some(self.count.map_or(reading, |count| count.max(reading)));
    }
}

impl StepCounter for SessionPedometer {
    fn steps(&self) -> Option<u64> {
        self.count
    }
}
