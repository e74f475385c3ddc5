//! Frame timestamp sources

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Delivers frame timestamps in milliseconds
pub trait FrameSource {
    /// Block until the next frame is due and return its timestamp, or `None`
    /// once the source is exhausted or stopped
    fn next_frame(&mut self) -> Option<f64>;
}

/// Wall-clock frames paced to a target rate
#[derive(Debug)]
pub struct PacedFrames {
    start: Instant,
    interval: Duration,
    next_due: Instant,
    remaining: Option<u64>,
    stop: Arc<AtomicBool>,
}

impl PacedFrames {
    /// Frames at `fps` frames per second until stopped
    pub fn new(fps: f64) -> Self {
        let interval = Duration::from_secs_f64(1.0 / fps.max(1.0));
        let start = Instant::now();
        Self {
            start,
            interval,
            next_due: start,
            remaining: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop after `frames` frames
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }

    /// Flag that ends the source from another thread
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }
}

impl FrameSource for PacedFrames {
    fn next_frame(&mut self) -> Option<f64> {
        if self.stop.load(Ordering::Relaxed) {
            return None;
        }
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }

        let now = Instant::now();
        if self.next_due > now {
            std::thread::sleep(self.next_due - now);
        }
        // Fall behind rather than burst when a frame overruns
        self.next_due = Instant::now().max(self.next_due) + self.interval;

        Some(self.start.elapsed().as_secs_f64() * 1000.0)
    }
}

/// Synthetic frames at a fixed interval, never sleeping
#[derive(Debug, Clone)]
pub struct SimulatedFrames {
    now_ms: f64,
    interval_ms: f64,
    remaining: u64,
}

impl SimulatedFrames {
    /// `frames` timestamps starting at 0, `interval_ms` apart
    pub fn new(interval_ms: f64, frames: u64) -> Self {
        Self {
            now_ms: 0.0,
            interval_ms,
            remaining: frames,
        }
    }

    /// Frames at `fps` frames per second
    pub fn at_fps(fps: f64, frames: u64) -> Self {
        Self::new(1000.0 / fps, frames)
    }
}

impl FrameSource for SimulatedFrames {
    fn next_frame(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let now = self.now_ms;
        self.now_ms += self.interval_ms;
        Some(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_frames() {
        let mut frames = SimulatedFrames::new(20.0, 3);
        assert_eq!(frames.next_frame(), Some(0.0));
        assert_eq!(frames.next_frame(), Some(20.0));
        assert_eq!(frames.next_frame(), Some(40.0));
        assert_eq!(frames.next_frame(), None);
    }

    #[test]
    fn test_paced_frames_are_monotonic_and_limited() {
        let mut frames = PacedFrames::new(1000.0).with_limit(3);
        let a = frames.next_frame().unwrap();
        let b = frames.next_frame().unwrap();
        let c = frames.next_frame().unwrap();
        assert!(a <= b && b <= c);
        assert!(frames.next_frame().is_none());
    }

    #[test]
    fn test_paced_frames_stop_handle() {
        let mut frames = PacedFrames::new(1000.0);
        frames.stop_handle().store(true, Ordering::Relaxed);
        assert!(frames.next_frame().is_none());
    }
}
