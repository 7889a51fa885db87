//! Time management utilities

use std::time::{Duration, Instant};

/// Timing information handed to every `before_render` hook
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Seconds elapsed since the previous frame
    pub delta_time_in_sec: f32,
    /// Milliseconds elapsed since the render loop started
    pub time: f64,
}

impl FrameInfo {
    /// Build frame info from a delta (seconds) and a running clock (milliseconds)
    pub fn new(delta_time_in_sec: f32, time: f64) -> Self {
        Self { delta_time_in_sec, time }
    }
}

/// High-precision clock for the render loop
pub struct FrameClock {
    last_frame: Instant,
    delta_time: f32,
    total_time: Duration,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new clock starting now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Restart the clock, e.g. when the loop resumes after a pause
    ///
    /// Elapsed time is kept so `FrameInfo::time` stays monotonic.
    pub fn resume(&mut self) {
        self.last_frame = Instant::now();
        self.delta_time = 0.0;
    }

    /// Advance the clock by one frame and report the timing
    pub fn tick(&mut self) -> FrameInfo {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += elapsed;
        self.last_frame = now;
        self.frame_count += 1;

        FrameInfo::new(self.delta_time, self.total_time.as_secs_f64() * 1000.0)
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let current_elapsed = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + current_elapsed
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}
