use std::time::{Duration, Instant};

use tracing::debug;

use crate::session::Canvas;

/// Reference tick period.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(20);
/// Degrees of hue the palette advances per tick.
pub const DEFAULT_HUE_STEP: u32 = 4;

/// A cancellable periodic timer driving palette cycling.
///
/// The loop does no work itself: the owner polls it with the current time,
/// runs the tick when one is due, then re-arms it. Stopping it cancels the
/// pending tick.
#[derive(Debug, Clone)]
pub struct AnimationLoop {
    period: Duration,
    hue_step: u32,
    animate: [bool; 2],
    next_tick: Option<Instant>,
    ticks: u64,
}

impl AnimationLoop {
    pub fn new(period: Duration, hue_step: u32) -> Self {
        Self {
            period,
            hue_step: hue_step % 360,
            animate: [false; 2],
            next_tick: None,
            ticks: 0,
        }
    }

    pub fn hue_step(&self) -> u32 {
        self.hue_step
    }

    /// Number of ticks run since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Arm the timer; the first tick is due immediately.
    pub fn start(&mut self, now: Instant) {
        if self.next_tick.is_none() {
            debug!(period = ?self.period, "animation loop started");
            self.next_tick = Some(now);
        }
    }

    /// Cancel the pending tick.
    pub fn stop(&mut self) {
        if self.next_tick.take().is_some() {
            debug!(ticks = self.ticks, "animation loop stopped");
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.next_tick, Some(due) if now >= due)
    }

    /// Schedule the next tick one period after `finished`, the moment the
    /// current tick completed. No-op when stopped.
    pub fn rearm(&mut self, finished: Instant) {
        if self.next_tick.is_some() {
            self.ticks += 1;
            self.next_tick = Some(finished + self.period);
        }
    }

    /// Time left until the next tick, `None` when stopped.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_tick
            .map(|due| due.saturating_duration_since(now))
    }

    pub fn is_enabled(&self, canvas: Canvas) -> bool {
        self.animate[canvas.index()]
    }

    pub fn set_enabled(&mut self, canvas: Canvas, enabled: bool) {
        self.animate[canvas.index()] = enabled;
    }

    /// Flip a canvas's animation flag and return the new value.
    pub fn toggle(&mut self, canvas: Canvas) -> bool {
        let flag = &mut self.animate[canvas.index()];
        *flag = !*flag;
        *flag
    }
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_PERIOD, DEFAULT_HUE_STEP)
    }
}
