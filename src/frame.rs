use std::time::{Duration, Instant};

/// Coalesces redraw requests so any burst of gestures between two frames
/// produces exactly one scene update.
#[derive(Debug, Clone)]
pub struct FrameGate {
    interval: Duration,
    pending: bool,
    last: Option<Instant>,
}

impl FrameGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: true,
            last: None,
        }
    }

    /// Mark the scene dirty
    pub fn request(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether a frame should run at `now`; consumes the pending request
    pub fn take(&mut self, now: Instant) -> bool {
        if !self.pending {
            return false;
        }
        if let Some(last) = self.last {
            if now.duration_since(last) < self.interval {
                return false;
            }
        }
        self.pending = false;
        self.last = Some(now);
        true
    }

    /// How long the event loop may block before the next frame is due
    pub fn timeout(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) if self.pending => self.interval.saturating_sub(now.duration_since(last)),
            _ => self.interval,
        }
    }
}

/// Shared epoch that every animation phase is sampled from
#[derive(Debug, Clone, Copy)]
pub struct AnimationClock {
    epoch: Instant,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub fn starting_at(epoch: Instant) -> Self {
        Self { epoch }
    }

    /// Seconds since the epoch at `now`
    pub fn seconds_at(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.epoch).as_secs_f64()
    }

    pub fn seconds(&self) -> f64 {
        self.seconds_at(Instant::now())
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_of_requests_yields_one_frame() {
        let start = Instant::now();
        let mut gate = FrameGate::new(Duration::from_millis(16));
        assert!(gate.take(start));

        for _ in 0..10 {
            gate.request();
        }
        assert!(!gate.take(start + Duration::from_millis(5)));
        assert!(gate.take(start + Duration::from_millis(16)));
        assert!(!gate.take(start + Duration::from_millis(40)));
    }

    #[test]
    fn test_timeout_shrinks_while_pending() {
        let start = Instant::now();
        let mut gate = FrameGate::new(Duration::from_millis(16));
        gate.take(start);
        assert_eq!(gate.timeout(start), Duration::from_millis(16));

        gate.request();
        assert_eq!(gate.timeout(start + Duration::from_millis(10)), Duration::from_millis(6));
        assert_eq!(gate.timeout(start + Duration::from_millis(30)), Duration::ZERO);
    }

    #[test]
    fn test_clock_is_shared() {
        let epoch = Instant::now();
        let clock = AnimationClock::starting_at(epoch);
        let copy = clock;
        let at = epoch + Duration::from_millis(1500);
        assert_eq!(clock.seconds_at(at), 1.5);
        assert_eq!(copy.seconds_at(at), clock.seconds_at(at));
    }
}
