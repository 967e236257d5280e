//! Frame pacing for the playback loop.
//!
//! `FrameTicker` says when the next frame is due; the owner waits (polling
//! input in the meantime) and calls `advance` after each frame. The loop
//! ends once the ticker is cancelled through any of its `CancelHandle`s,
//! and dropping the ticker cancels it so no handle outlives a live loop.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Shared stop flag for a `FrameTicker`.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Rc<Cell<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug)]
pub struct FrameTicker {
    interval: Duration,
    next_due: Instant,
    frames: u64,
    cancel: CancelHandle,
}

impl FrameTicker {
    /// Ticker firing `fps` times per second, first frame due immediately.
    pub fn new(fps: u32, now: Instant) -> Self {
        let fps = fps.max(1);
        FrameTicker {
            interval: Duration::from_secs(1) / fps,
            next_due: now,
            frames: 0,
            cancel: CancelHandle::default(),
        }
    }

    pub fn handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Time left before the next frame, zero if it is already due, `None`
    /// once cancelled.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        if self.is_cancelled() {
            return None;
        }
        Some(self.next_due.saturating_duration_since(now))
    }

    pub fn is_due(&self, now: Instant) -> bool {
        !self.is_cancelled() && now >= self.next_due
    }

    /// Record a presented frame and schedule the next one.
    ///
    /// A late frame is not made up for: if the schedule has fallen behind,
    /// the next frame is due one interval from `now`, so playback slows down
    /// rather than bursting.
    pub fn advance(&mut self, now: Instant) {
        self.frames += 1;
        self.next_due += self.interval;
        if self.next_due <= now {
            self.next_due = now + self.interval;
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for FrameTicker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_due_immediately() {
        let now = Instant::now();
        let ticker = FrameTicker::new(60, now);
        assert!(ticker.is_due(now));
        assert_eq!(ticker.time_until_next(now), Some(Duration::ZERO));
    }

    #[test]
    fn advance_schedules_one_interval_ahead() {
        let now = Instant::now();
        let mut ticker = FrameTicker::new(50, now);
        ticker.advance(now);
        assert_eq!(ticker.frames(), 1);
        assert_eq!(ticker.time_until_next(now), Some(Duration::from_millis(20)));
        assert!(!ticker.is_due(now + Duration::from_millis(19)));
        assert!(ticker.is_due(now + Duration::from_millis(20)));
    }

    #[test]
    fn late_frames_are_not_made_up() {
        let now = Instant::now();
        let mut ticker = FrameTicker::new(50, now);
        let late = now + Duration::from_millis(500);
        ticker.advance(late);
        assert_eq!(ticker.time_until_next(late), Some(Duration::from_millis(20)));
    }

    #[test]
    fn cancel_through_handle_stops_ticker() {
        let now = Instant::now();
        let ticker = FrameTicker::new(30, now);
        let handle = ticker.handle();
        handle.cancel();
        assert!(ticker.is_cancelled());
        assert!(!ticker.is_due(now));
        assert_eq!(ticker.time_until_next(now), None);
    }

    #[test]
    fn dropping_ticker_cancels_outstanding_handles() {
        let ticker = FrameTicker::new(30, Instant::now());
        let handle = ticker.handle();
        assert!(!handle.is_cancelled());
        drop(ticker);
        assert!(handle.is_cancelled());
    }

    #[test]
    fn zero_fps_is_treated_as_one() {
        let ticker = FrameTicker::new(0, Instant::now());
        assert_eq!(ticker.interval(), Duration::from_secs(1));
    }
}
