//=========================================================================
// Frame Clock
//=========================================================================
//
// Turns host timestamps (seconds) into per-frame delta times.
//
// The clock ticks on every host frame, paused or not, so the first frame
// after a resume carries an ordinary delta; paused time is never caught
// up.
//
//=========================================================================

/// Delta-time source fed with host timestamps.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
    delta: f64,
    ticks: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `current_time` and returns the seconds since the previous
    /// tick. The first tick yields `0.0`; time running backwards yields
    /// `0.0` as well.
    pub fn tick(&mut self, current_time: f64) -> f64 {
        self.delta = match self.last_time {
            Some(last) => (current_time - last).max(0.0),
            None => 0.0,
        };
        self.last_time = Some(current_time);
        self.ticks += 1;
        self.delta
    }

    /// Delta returned by the most recent tick.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Forgets the last timestamp; the next tick yields `0.0`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_has_zero_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(12.5), 0.0);
        assert_eq!(clock.tick(12.75), 0.25);
        assert_eq!(clock.ticks(), 2);
    }

    #[test]
    fn backwards_time_clamps_to_zero() {
        let mut clock = FrameClock::new();
        clock.tick(3.0);
        assert_eq!(clock.tick(2.0), 0.0);
        assert_eq!(clock.last_time(), Some(2.0));
    }

    #[test]
    fn reset_restarts_deltas() {
        let mut clock = FrameClock::new();
        clock.tick(1.0);
        clock.reset();
        assert_eq!(clock.tick(5.0), 0.0);
    }
}
