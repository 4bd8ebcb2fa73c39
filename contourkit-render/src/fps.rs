//! Frame rate counter

use instant::Instant;
use std::time::Duration;

/// Counts frames and publishes the count once per elapsed second
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            window_start: start,
            frames: 0,
            fps: 0,
        }
    }

    /// Register a frame. Returns the new rate when a one-second window closed.
    pub fn tick(&mut self) -> Option<u32> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        if now.duration_since(self.window_start) < Duration::from_secs(1) {
            return None;
        }
        self.fps = self.frames;
        self.frames = 0;
        self.window_start = now;
        Some(self.fps)
    }

    /// Frames counted in the last completed window
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publishes_after_one_second() {
        let start = Instant::now();
        let mut counter = FpsCounter::starting_at(start);
        for i in 1..30u64 {
            assert_eq!(counter.tick_at(start + Duration::from_millis(i * 30)), None);
        }
        assert_eq!(counter.tick_at(start + Duration::from_millis(1000)), Some(30));
        assert_eq!(counter.fps(), 30);
        assert_eq!(counter.tick_at(start + Duration::from_millis(1010)), None);
    }
}
