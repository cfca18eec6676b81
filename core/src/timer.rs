//! Single-exercise countdown engine.
//!
//! Wall-clock driven: the frontend calls [`TimerEngine::poll`] on every UI
//! tick (sub-second cadence) and the remaining-seconds value decrements only
//! when a full second of wall-clock time has accumulated, so a slow or
//! jittery tick loop never loses time. Every clock-sensitive operation takes
//! `now` explicitly, which keeps the engine testable with synthetic instants.

use std::time::{Duration, Instant};

const ONE_SECOND: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Fired on every poll while running; not necessarily a whole-second
    /// change.
    Tick { remaining: u32 },
    /// Fired exactly once when the countdown reaches zero; the engine
    /// auto-stops afterwards.
    Finished,
}

#[derive(Debug)]
pub struct TimerEngine {
    duration: u32,
    remaining: u32,
    /// Elapsed time not yet converted into a whole-second decrement.
    carry: Duration,
    last_poll: Option<Instant>,
    state: TimerState,
    finished: bool,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self {
            duration: 0,
            remaining: 0,
            carry: Duration::ZERO,
            last_poll: None,
            state: TimerState::Idle,
            finished: false,
        }
    }

    /// Loads a fresh countdown. Must precede `start` for a new exercise.
    pub fn configure(&mut self, duration_secs: u32) {
        self.duration = duration_secs;
        self.remaining = duration_secs;
        self.carry = Duration::ZERO;
        self.last_poll = None;
        self.state = TimerState::Idle;
        self.finished = false;
    }

    /// Begins decrementing from the current remaining value. Restarting
    /// while running discards the in-flight run first; runs never stack.
    pub fn start(&mut self, now: Instant) {
        self.carry = Duration::ZERO;
        self.last_poll = Some(now);
        self.state = TimerState::Running;
    }

    /// Stops decrementing, banking the sub-second fraction so a later
    /// `resume` continues exactly where it left off.
    pub fn pause(&mut self, now: Instant) {
        if self.state != TimerState::Running {
            return;
        }
        if let Some(last) = self.last_poll {
            self.carry += now.saturating_duration_since(last);
        }
        self.last_poll = None;
        self.state = TimerState::Paused;
    }

    /// Continues a paused countdown. No-op unless paused.
    pub fn resume(&mut self, now: Instant) {
        if self.state != TimerState::Paused {
            return;
        }
        self.last_poll = Some(now);
        self.state = TimerState::Running;
    }

    /// Halts without touching `remaining`. Safe to call when idle.
    pub fn stop(&mut self) {
        self.state = TimerState::Idle;
        self.last_poll = None;
    }

    /// Back to the configured duration, halted.
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.carry = Duration::ZERO;
        self.finished = false;
        self.stop();
    }

    /// Advances the countdown by the wall-clock time since the last poll.
    pub fn poll(&mut self, now: Instant) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        let last = self.last_poll?;

        let mut elapsed = self.carry + now.saturating_duration_since(last);
        self.last_poll = Some(now);
        while elapsed >= ONE_SECOND && self.remaining > 0 {
            elapsed -= ONE_SECOND;
            self.remaining -= 1;
        }
        self.carry = elapsed;

        if self.remaining == 0 {
            self.stop();
            if self.finished {
                return None;
            }
            self.finished = true;
            return Some(TimerEvent::Finished);
        }
        Some(TimerEvent::Tick {
            remaining: self.remaining,
        })
    }

    /// Completion fraction in [0, 100], interpolated below the whole-second
    /// granularity so a progress bar moves smoothly between decrements.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration == 0 {
            return 100.0;
        }
        let mut sub_second = self.carry;
        if self.state == TimerState::Running
            && let Some(last) = self.last_poll
        {
            sub_second += now.saturating_duration_since(last);
        }
        let elapsed = f64::from(self.duration - self.remaining) + sub_second.as_secs_f64();
        (elapsed / f64::from(self.duration) * 100.0).clamp(0.0, 100.0)
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn state(&self) -> TimerState {
        self.state
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn decrements_on_accumulated_wall_clock_seconds() {
        let t0 = Instant::now();
        let mut timer = TimerEngine::new();
        timer.configure(3);
        timer.start(t0);

        // Sub-second polls do not decrement.
        assert_eq!(timer.poll(t0 + ms(400)), Some(TimerEvent::Tick { remaining: 3 }));
        assert_eq!(timer.poll(t0 + ms(900)), Some(TimerEvent::Tick { remaining: 3 }));
        // Crossing the second does, even though no single poll gap was 1s.
        assert_eq!(timer.poll(t0 + ms(1100)), Some(TimerEvent::Tick { remaining: 2 }));
    }

    #[test]
    fn tolerates_a_stalled_tick_loop() {
        let t0 = Instant::now();
        let mut timer = TimerEngine::new();
        timer.configure(10);
        timer.start(t0);

        // One late poll catches up on all missed seconds at once.
        assert_eq!(
            timer.poll(t0 + ms(3500)),
            Some(TimerEvent::Tick { remaining: 7 })
        );
    }

    #[test]
    fn finishes_once_then_goes_quiet() {
        let t0 = Instant::now();
        let mut timer = TimerEngine::new();
        timer.configure(2);
        timer.start(t0);

        assert_eq!(timer.poll(t0 + ms(2000)), Some(TimerEvent::Finished));
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.remaining(), 0);

        // Even if restarted at zero, completion never fires twice.
        timer.start(t0 + ms(2000));
        assert_eq!(timer.poll(t0 + ms(3000)), None);
    }

    #[test]
    fn remaining_never_goes_negative() {
        let t0 = Instant::now();
        let mut timer = TimerEngine::new();
        timer.configure(1);
        timer.start(t0);
        // Way past the end.
        assert_eq!(timer.poll(t0 + ms(60_000)), Some(TimerEvent::Finished));
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn pause_banks_the_fraction_for_exact_resume() {
        let t0 = Instant::now();
        let mut timer = TimerEngine::new();
        timer.configure(5);
        timer.start(t0);

        timer.poll(t0 + ms(600));
        timer.pause(t0 + ms(900)); // 0.9s elapsed, banked
        assert_eq!(timer.state(), TimerState::Paused);

        // Time passing while paused changes nothing.
        assert_eq!(timer.poll(t0 + ms(10_000)), None);
        assert_eq!(timer.remaining(), 5);

        timer.resume(t0 + ms(10_000));
        // 0.9s banked + 0.2s since resume crosses the second.
        assert_eq!(
            timer.poll(t0 + ms(10_200)),
            Some(TimerEvent::Tick { remaining: 4 })
        );
    }

    #[test]
    fn resume_requires_a_paused_timer() {
        let t0 = Instant::now();
        let mut timer = TimerEngine::new();
        timer.configure(5);
        timer.resume(t0);
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.poll(t0 + ms(2000)), None);
    }

    #[test]
    fn restart_does_not_stack_runs() {
        let t0 = Instant::now();
        let mut timer = TimerEngine::new();
        timer.configure(10);
        timer.start(t0);
        timer.poll(t0 + ms(900));
        // Restart clears the 0.9s fraction; the next second starts fresh.
        timer.start(t0 + ms(900));
        assert_eq!(
            timer.poll(t0 + ms(1700)),
            Some(TimerEvent::Tick { remaining: 10 })
        );
        assert_eq!(
            timer.poll(t0 + ms(1900)),
            Some(TimerEvent::Tick { remaining: 9 })
        );
    }

    #[test]
    fn stop_preserves_remaining_and_reset_restores_duration() {
        let t0 = Instant::now();
        let mut timer = TimerEngine::new();
        timer.configure(5);
        timer.start(t0);
        timer.poll(t0 + ms(2000));
        assert_eq!(timer.remaining(), 3);

        timer.stop();
        assert_eq!(timer.remaining(), 3);
        // stop on an idle timer is harmless
        timer.stop();

        timer.reset();
        assert_eq!(timer.remaining(), 5);
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn progress_is_monotone_and_bounded() {
        let t0 = Instant::now();
        let mut timer = TimerEngine::new();
        timer.configure(4);
        timer.start(t0);

        let mut last = timer.progress(t0);
        assert_eq!(last, 0.0);
        for step in 1..=50u64 {
            let now = t0 + ms(step * 100);
            timer.poll(now);
            let p = timer.progress(now);
            assert!(p >= last, "progress regressed: {last} -> {p}");
            assert!((0.0..=100.0).contains(&p));
            last = p;
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn progress_interpolates_between_seconds() {
        let t0 = Instant::now();
        let mut timer = TimerEngine::new();
        timer.configure(10);
        timer.start(t0);
        timer.poll(t0 + ms(500));
        let p = timer.progress(t0 + ms(500));
        assert!((p - 5.0).abs() < 0.1, "expected ~5%, got {p}");
    }

    #[test]
    fn zero_duration_reports_full_progress() {
        let t0 = Instant::now();
        let mut timer = TimerEngine::new();
        timer.configure(0);
        assert_eq!(timer.progress(t0), 100.0);
        timer.start(t0);
        // Fires immediately on the first poll.
        assert_eq!(timer.poll(t0), Some(TimerEvent::Finished));
    }
}
