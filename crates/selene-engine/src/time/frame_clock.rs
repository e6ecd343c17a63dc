use std::time::{Duration, Instant};

/// Weight of the newest sample in the smoothed frame rate.
const FPS_SMOOTHING: f32 = 0.1;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,

    /// Exponentially smoothed frames per second.
    pub fps: f32,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped to avoid pathological values when the application is paused
/// by the debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
    fps: f32,
}

impl FrameClock {
    /// Creates a new clock with default clamps (0.1 ms .. 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
            fps: 0.0,
        }
    }

    /// Resets the clock baseline.
    ///
    /// Useful after surface reconfigure events or when resuming from suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let instant_fps = 1.0 / dt.as_secs_f32();
        self.fps = if self.frame_index == 0 {
            instant_fps
        } else {
            self.fps + (instant_fps - self.fps) * FPS_SMOOTHING
        };

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
            fps: self.fps,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_increments_from_zero() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        assert_eq!(clock.tick_at(t0).frame_index, 0);
        assert_eq!(clock.tick_at(t0 + Duration::from_millis(16)).frame_index, 1);
    }

    #[test]
    fn long_stall_is_clamped() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        let ft = clock.tick_at(t0 + Duration::from_secs(5));
        assert!((ft.dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn zero_interval_is_clamped_to_minimum() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        let ft = clock.tick_at(t0);
        assert!(ft.dt > 0.0);
    }

    #[test]
    fn fps_converges_on_steady_frames() {
        let mut clock = FrameClock::with_clamps(Duration::from_micros(100), Duration::from_secs(1));
        let mut t = Instant::now();
        clock.tick_at(t);
        let mut last = 0.0;
        for _ in 0..200 {
            t += Duration::from_millis(20);
            last = clock.tick_at(t).fps;
        }
        assert!((last - 50.0).abs() < 0.5, "fps = {last}");
    }
}
