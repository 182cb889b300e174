use std::time::{Duration, Instant};

use crate::circular_queue::CircularQueue;

pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(10);
const HISTORY: usize = 64;

/// Rolling frames-per-second over the last few frames.
#[derive(Debug)]
pub struct FpsMeter {
    history: CircularQueue<Instant>,
    report_every: Duration,
    last_report: Option<Instant>,
}

impl FpsMeter {
    pub fn new(report_every: Duration) -> Self {
        Self {
            history: CircularQueue::with_capacity(HISTORY),
            report_every,
            last_report: None,
        }
    }

    /// Records a frame at `now`; returns the current rate when a report is due.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        self.history.push(now);

        let last = *self.last_report.get_or_insert(now);
        if now.duration_since(last) < self.report_every {
            return None;
        }

        self.last_report = Some(now);
        self.fps()
    }

    pub fn fps(&self) -> Option<f32> {
        let newest = self.history.newest()?;
        let oldest = self.history.oldest()?;
        let span = newest.duration_since(*oldest).as_secs_f32();

        if span <= 0.0 {
            return None;
        }

        Some((self.history.len() - 1) as f32 / span)
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.last_report = None;
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_at_interval() {
        let mut meter = FpsMeter::new(Duration::from_secs(1));
        let start = Instant::now();

        assert_eq!(meter.tick(start), None);
        for i in 1..10 {
            assert_eq!(meter.tick(start + Duration::from_millis(100 * i)), None);
        }

        let fps = meter.tick(start + Duration::from_secs(1)).unwrap();
        assert!((fps - 10.0).abs() < 1e-3);

        assert_eq!(meter.tick(start + Duration::from_millis(1100)), None);
    }

    #[test]
    fn no_rate_without_elapsed_time() {
        let mut meter = FpsMeter::default();
        meter.tick(Instant::now());

        assert_eq!(meter.fps(), None);
        meter.reset();
        assert_eq!(meter.fps(), None);
    }
}
