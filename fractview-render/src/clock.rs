use serde::Serialize;

/// Frames-per-second report, produced once per second of frame time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceSample {
    pub fps: u32,
    pub frame_time_ms: f32,
}

/// Counts frames against the accumulated `dt` of the render loop.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    elapsed: f32,
    frames: u32,
}

impl FrameClock {
    pub const REPORT_INTERVAL: f32 = 1.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one frame that took `dt` seconds.
    pub fn record(&mut self, dt: f32) -> Option<PerformanceSample> {
        if !dt.is_finite() || dt < 0.0 {
            return None;
        }
        self.elapsed += dt;
        self.frames += 1;
        if self.elapsed < Self::REPORT_INTERVAL {
            return None;
        }
        let sample = PerformanceSample {
            fps: (self.frames as f32 / self.elapsed).round() as u32,
            frame_time_ms: self.elapsed * 1000.0 / self.frames as f32,
        };
        *self = Self::default();
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_second() {
        let mut clock = FrameClock::new();
        let mut samples = Vec::new();
        for _ in 0..48 {
            if let Some(s) = clock.record(0.0625) {
                samples.push(s);
            }
        }
        assert_eq!(samples.len(), 3);
        for s in samples {
            assert_eq!(s.fps, 16);
            assert_eq!(s.frame_time_ms, 62.5);
        }
    }

    #[test]
    fn ignores_bad_dt() {
        let mut clock = FrameClock::new();
        assert!(clock.record(f32::NAN).is_none());
        assert!(clock.record(-1.0).is_none());
        assert_eq!(clock.record(2.0).map(|s| s.fps), Some(1));
    }
}
