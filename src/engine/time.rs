/// Simulation clock threaded through every tick.
///
/// `time` only advances by scaled deltas, so a scale of zero (pause) freezes
/// every [`Timer`] that reads from this clock.
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    /// Seconds of simulated time since the clock was created.
    pub time: f32,
    /// Scaled delta of the most recent [`advance`](Self::advance).
    pub dt: f32,
    pub scale: f32,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            time: 0.0,
            dt: 0.0,
            scale: 1.0,
        }
    }

    pub fn advance(&mut self, raw_dt: f32) {
        self.dt = raw_dt.max(0.0) * self.scale;
        self.time += self.dt;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Countdown measured against a [`SimClock`].
///
/// A default timer is already elapsed: nothing is pending until `set` is called.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    start: f32,
    duration: f32,
    offset: f32,
    ended: bool,
}

impl Default for Timer {
    fn default() -> Self {
        Self {
            start: 0.0,
            duration: 0.0,
            offset: 0.0,
            ended: true,
        }
    }
}

impl Timer {
    /// A timer started at the clock's current time.
    pub fn started(duration: f32, clock: &SimClock) -> Self {
        let mut timer = Self::default();
        timer.set(duration, clock);
        timer
    }

    /// Restart with a new duration. Clears any offset and forced end.
    pub fn set(&mut self, duration: f32, clock: &SimClock) {
        self.duration = duration;
        self.start = clock.time;
        self.offset = 0.0;
        self.ended = false;
    }

    /// Force the timer to elapse.
    pub fn end(&mut self) {
        self.ended = true;
    }

    /// Shift this timer's local time. Positive values bring the end closer.
    pub fn offset_clock(&mut self, delta: f32) {
        self.offset += delta;
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn local_time(&self, clock: &SimClock) -> f32 {
        clock.time + self.offset
    }

    pub fn time_since_start(&self, clock: &SimClock) -> f32 {
        self.local_time(clock) - self.start
    }

    /// Number of whole-or-partial durations since the start.
    pub fn completions(&self, clock: &SimClock) -> f32 {
        if self.duration <= 0.0 {
            return if self.has_elapsed(clock) { 1.0 } else { 0.0 };
        }
        self.time_since_start(clock) / self.duration
    }

    pub fn has_elapsed(&self, clock: &SimClock) -> bool {
        self.ended || self.start + self.duration <= self.local_time(clock)
    }

    /// Seconds of progress, capped at the duration once elapsed.
    pub fn progress(&self, clock: &SimClock) -> f32 {
        if self.has_elapsed(clock) {
            self.duration
        } else {
            self.time_since_start(clock).max(0.0)
        }
    }

    /// Progress in `[0, 1]`. Zero-length timers report 1.
    pub fn relative_progress(&self, clock: &SimClock) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.progress(clock) / self.duration).clamp(0.0, 1.0)
    }

    pub fn remainder(&self, clock: &SimClock) -> f32 {
        self.duration - self.progress(clock)
    }

    pub fn relative_remainder(&self, clock: &SimClock) -> f32 {
        1.0 - self.relative_progress(clock)
    }
}
