//! Workout execution state machine.
//!
//! A [`WorkoutSession`] owns a parsed [`Workout`] plus all per-run state:
//! the cursor, the run state, a parallel completed-flags map and the
//! countdown engine for the current exercise. The parsed workout itself is
//! never mutated, so re-parsing or restarting cannot corrupt definitions.
//!
//! Invalid operations (pausing a reps exercise, completing reps twice) are
//! deliberate no-ops rather than errors; every state has a defined response
//! to every operation.

use std::time::{Duration, Instant};

use crate::model::{Exercise, ExerciseKind, Workout};
use crate::timer::{TimerEngine, TimerEvent, TimerState};

/// Window within which repeated rep-completion calls are treated as
/// duplicate deliveries of one UI event.
const REP_REENTRY_WINDOW: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Paused,
    /// Terminal until an explicit `reset`.
    Completed,
}

/// Pushed to the frontend after operations that move the cursor; the
/// display reads current state back through the accessors, the audio
/// adapter maps these to cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ExerciseFinished { index: usize },
    WorkoutFinished,
}

#[derive(Debug)]
pub struct WorkoutSession {
    workout: Workout,
    /// Per-run progress, parallel to `workout.exercises`.
    completed: Vec<bool>,
    cursor: usize,
    run_state: RunState,
    timer: TimerEngine,
    /// Guards transitions against re-entrant double-advance.
    advancing: bool,
    last_rep_advance: Option<Instant>,
}

impl WorkoutSession {
    pub fn new(workout: Workout) -> Self {
        let completed = vec![false; workout.len()];
        let mut session = Self {
            workout,
            completed,
            cursor: 0,
            run_state: RunState::Idle,
            timer: TimerEngine::new(),
            advancing: false,
            last_rep_advance: None,
        };
        session.load_current();
        session
    }

    /// Begins execution at the cursor. No-op on an empty workout or while
    /// already underway; from `Paused` this is a resume.
    pub fn start(&mut self, now: Instant) {
        if self.workout.is_empty() {
            return;
        }
        match self.run_state {
            RunState::Idle => {
                self.run_state = RunState::Running;
                self.start_timer_if_timed(now);
            }
            RunState::Paused => self.resume(now),
            RunState::Running | RunState::Completed => {}
        }
    }

    /// Suspends the countdown. Reps exercises have no countdown to suspend,
    /// so pausing one is a no-op.
    pub fn pause(&mut self, now: Instant) {
        if self.run_state != RunState::Running {
            return;
        }
        if self.current().is_some_and(|ex| ex.kind.is_timed()) {
            self.timer.pause(now);
            self.run_state = RunState::Paused;
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.run_state != RunState::Paused {
            return;
        }
        self.run_state = RunState::Running;
        // Skipping while paused loads the next exercise with an idle engine,
        // so resuming must start it rather than resume it.
        if self.timer.state() == TimerState::Paused {
            self.timer.resume(now);
        } else {
            self.start_timer_if_timed(now);
        }
    }

    /// Advances unconditionally, whatever the run state: stops any active
    /// countdown and marks the departed exercise completed. An escape
    /// hatch, not validated completion.
    pub fn skip(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.run_state == RunState::Completed || self.cursor >= self.workout.len() {
            return events;
        }
        self.timer.stop();
        self.mark_current_completed();
        self.advance(now, &mut events);
        events
    }

    /// Marks the current reps exercise done and advances. No-op unless the
    /// session is running on a not-yet-completed reps exercise. Calls
    /// landing inside the re-entry window advance at most once, guarding
    /// against duplicate UI-event delivery.
    pub fn complete_reps(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.run_state != RunState::Running {
            return events;
        }
        let Some(current) = self.current() else {
            return events;
        };
        if current.kind != ExerciseKind::Reps || self.is_current_completed() {
            return events;
        }
        if self
            .last_rep_advance
            .is_some_and(|last| now.saturating_duration_since(last) < REP_REENTRY_WINDOW)
        {
            return events;
        }
        self.last_rep_advance = Some(now);
        self.mark_current_completed();
        self.advance(now, &mut events);
        events
    }

    /// Back to a fresh session: cursor 0, idle, all completion cleared,
    /// first exercise reloaded at full duration.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.run_state = RunState::Idle;
        self.completed.fill(false);
        self.advancing = false;
        self.last_rep_advance = None;
        self.timer.stop();
        self.load_current();
    }

    /// Drives the countdown; call on every UI tick. A finished countdown
    /// completes the current exercise and advances.
    pub fn poll(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.run_state != RunState::Running {
            return events;
        }
        if self.timer.poll(now) == Some(TimerEvent::Finished) {
            self.mark_current_completed();
            self.advance(now, &mut events);
        }
        events
    }

    // Accessors -------------------------------------------------------------

    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    pub fn current(&self) -> Option<&Exercise> {
        self.workout.exercise(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Complete precisely when the cursor has moved past the last exercise,
    /// however the last one was finished.
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.workout.len()
    }

    pub fn exercise_completed(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    /// Seconds left on the current exercise; zero once the workout is done
    /// and for reps exercises, which have no countdown.
    pub fn time_remaining(&self) -> u32 {
        if self.is_complete() {
            return 0;
        }
        match self.current() {
            Some(ex) if ex.kind.is_timed() => self.timer.remaining(),
            _ => 0,
        }
    }

    /// Progress of the current exercise in [0, 100]; pinned to 100 once the
    /// workout is done, zero for a pending reps exercise.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.is_complete() {
            return 100.0;
        }
        match self.current() {
            Some(ex) if ex.kind.is_timed() => self.timer.progress(now),
            Some(_) => {
                if self.is_current_completed() {
                    100.0
                } else {
                    0.0
                }
            }
            None => 100.0,
        }
    }

    // Internals -------------------------------------------------------------

    fn is_current_completed(&self) -> bool {
        self.exercise_completed(self.cursor)
    }

    fn mark_current_completed(&mut self) {
        if let Some(flag) = self.completed.get_mut(self.cursor) {
            *flag = true;
        }
    }

    /// Loads the exercise at the cursor into the countdown engine. Reps
    /// exercises leave the engine idle at zero.
    fn load_current(&mut self) {
        let duration = match self.current() {
            Some(ex) if ex.kind.is_timed() => ex.duration_secs.unwrap_or(0),
            _ => 0,
        };
        self.timer.configure(duration);
    }

    fn start_timer_if_timed(&mut self, now: Instant) {
        if self.current().is_some_and(|ex| ex.kind.is_timed()) {
            self.timer.start(now);
        }
    }

    /// The single transition path, shared by timer completion, skip and rep
    /// completion. The flag rejects re-entrant calls so a timer firing while
    /// a skip is processed cannot double-advance.
    fn advance(&mut self, now: Instant, events: &mut Vec<SessionEvent>) {
        if self.advancing {
            return;
        }
        self.advancing = true;

        events.push(SessionEvent::ExerciseFinished { index: self.cursor });
        self.cursor += 1;

        if self.cursor >= self.workout.len() {
            self.run_state = RunState::Completed;
            self.timer.stop();
            events.push(SessionEvent::WorkoutFinished);
        } else {
            self.load_current();
            if self.run_state == RunState::Running {
                self.start_timer_if_timed(now);
            }
        }

        self.advancing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn session(text: &str) -> WorkoutSession {
        WorkoutSession::new(parse(text).expect("test workout parses"))
    }

    #[test]
    fn start_on_empty_workout_is_a_no_op() {
        let mut s = WorkoutSession::new(Workout::default());
        s.start(Instant::now());
        assert_eq!(s.run_state(), RunState::Idle);
        assert!(s.is_complete());
    }

    #[test]
    fn timed_exercise_counts_down_then_advances() {
        let t0 = Instant::now();
        let mut s = session("## A - 0:02\n## B - 0:05");
        s.start(t0);
        assert_eq!(s.run_state(), RunState::Running);
        assert_eq!(s.time_remaining(), 2);

        assert_eq!(s.poll(t0 + ms(1000)), vec![]);
        assert_eq!(s.time_remaining(), 1);

        let events = s.poll(t0 + ms(2000));
        assert_eq!(events, vec![SessionEvent::ExerciseFinished { index: 0 }]);
        assert_eq!(s.cursor(), 1);
        assert!(s.exercise_completed(0));
        // Still running: the next timed exercise auto-started.
        assert_eq!(s.run_state(), RunState::Running);
        assert_eq!(s.time_remaining(), 5);
    }

    #[test]
    fn finishing_the_last_exercise_completes_the_workout() {
        let t0 = Instant::now();
        let mut s = session("## A - 0:01");
        s.start(t0);
        let events = s.poll(t0 + ms(1000));
        assert_eq!(
            events,
            vec![
                SessionEvent::ExerciseFinished { index: 0 },
                SessionEvent::WorkoutFinished,
            ]
        );
        assert_eq!(s.run_state(), RunState::Completed);
        assert!(s.is_complete());
        assert_eq!(s.time_remaining(), 0);
        assert_eq!(s.progress(t0 + ms(5000)), 100.0);
    }

    #[test]
    fn reps_exercise_waits_for_explicit_completion() {
        let t0 = Instant::now();
        let mut s = session("## Squats - 20 reps\n## B - 0:10");
        s.start(t0);
        // No countdown runs; time passing changes nothing.
        assert_eq!(s.poll(t0 + ms(60_000)), vec![]);
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.progress(t0 + ms(60_000)), 0.0);

        let events = s.complete_reps(t0 + ms(60_000));
        assert_eq!(events, vec![SessionEvent::ExerciseFinished { index: 0 }]);
        assert_eq!(s.cursor(), 1);
        // The following timed exercise auto-starts.
        assert_eq!(s.time_remaining(), 10);
        assert_eq!(s.poll(t0 + ms(61_000)), vec![]);
        assert_eq!(s.time_remaining(), 9);
    }

    #[test]
    fn rapid_rep_completion_advances_exactly_once() {
        let t0 = Instant::now();
        let mut s = session("## A - 5 reps\n## B - 5 reps\n## C - 5 reps");
        s.start(t0);

        s.complete_reps(t0);
        s.complete_reps(t0 + ms(10));
        s.complete_reps(t0 + ms(20));
        assert_eq!(s.cursor(), 1);

        // Past the window it is a legitimate new completion.
        s.complete_reps(t0 + ms(400));
        assert_eq!(s.cursor(), 2);
    }

    #[test]
    fn complete_reps_ignores_timed_exercises() {
        let t0 = Instant::now();
        let mut s = session("## A - 0:30");
        s.start(t0);
        assert_eq!(s.complete_reps(t0 + ms(100)), vec![]);
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn pause_during_reps_is_a_no_op() {
        let t0 = Instant::now();
        let mut s = session("## Squats - 20 reps");
        s.start(t0);
        s.pause(t0 + ms(500));
        assert_eq!(s.run_state(), RunState::Running);
    }

    #[test]
    fn pause_and_resume_preserve_the_countdown() {
        let t0 = Instant::now();
        let mut s = session("## A - 0:10");
        s.start(t0);
        s.poll(t0 + ms(2500));
        assert_eq!(s.time_remaining(), 8);

        s.pause(t0 + ms(2500));
        assert_eq!(s.run_state(), RunState::Paused);
        assert_eq!(s.poll(t0 + ms(30_000)), vec![]);
        assert_eq!(s.time_remaining(), 8);

        s.resume(t0 + ms(30_000));
        s.poll(t0 + ms(30_500));
        // 0.5s banked before the pause + 0.5s after completes a second.
        assert_eq!(s.time_remaining(), 7);
    }

    #[test]
    fn resume_after_skipping_while_paused_starts_the_new_countdown() {
        let t0 = Instant::now();
        let mut s = session("## A - 0:10\n## B - 0:10");
        s.start(t0);
        s.pause(t0 + ms(1000));

        // Skipping mid-pause lands on B with its engine loaded but idle.
        s.skip(t0 + ms(2000));
        assert_eq!(s.run_state(), RunState::Paused);
        assert_eq!(s.time_remaining(), 10);

        s.resume(t0 + ms(3000));
        assert_eq!(s.run_state(), RunState::Running);
        s.poll(t0 + ms(5000));
        assert_eq!(s.time_remaining(), 8);
    }

    #[test]
    fn space_cycle_after_skip_while_paused_keeps_counting() {
        let t0 = Instant::now();
        let mut s = session("## A - 0:10\n## B - 0:10");
        s.start(t0);
        s.pause(t0 + ms(1000));
        s.skip(t0 + ms(1000));

        // start from Paused goes through resume semantics.
        s.start(t0 + ms(2000));
        s.pause(t0 + ms(3000));
        s.resume(t0 + ms(4000));
        s.poll(t0 + ms(5000));
        // 1s before the pause + 1s after; the gap while paused is ignored.
        assert_eq!(s.time_remaining(), 8);
    }

    #[test]
    fn start_from_paused_resumes() {
        let t0 = Instant::now();
        let mut s = session("## A - 0:10");
        s.start(t0);
        s.pause(t0 + ms(1000));
        s.start(t0 + ms(5000));
        assert_eq!(s.run_state(), RunState::Running);
    }

    #[test]
    fn skip_advances_whatever_the_state() {
        let t0 = Instant::now();
        let mut s = session("## A - 0:30\n## B - 10 reps\n## C - 0:10");

        // Skipping works from idle.
        let events = s.skip(t0);
        assert_eq!(events, vec![SessionEvent::ExerciseFinished { index: 0 }]);
        assert_eq!(s.cursor(), 1);
        assert!(s.exercise_completed(0));
        assert_eq!(s.run_state(), RunState::Idle);

        // And for reps exercises mid-run.
        s.start(t0);
        s.skip(t0);
        assert_eq!(s.cursor(), 2);
        assert!(s.exercise_completed(1));
        // The timed exercise after it auto-started.
        assert_eq!(s.time_remaining(), 10);

        let events = s.skip(t0);
        assert_eq!(
            events,
            vec![
                SessionEvent::ExerciseFinished { index: 2 },
                SessionEvent::WorkoutFinished,
            ]
        );
        assert_eq!(s.run_state(), RunState::Completed);

        // Skipping a completed workout does nothing.
        assert_eq!(s.skip(t0), vec![]);
    }

    #[test]
    fn completed_is_terminal_until_reset() {
        let t0 = Instant::now();
        let mut s = session("## A - 0:01");
        s.start(t0);
        s.poll(t0 + ms(1000));
        assert_eq!(s.run_state(), RunState::Completed);

        s.start(t0 + ms(2000));
        assert_eq!(s.run_state(), RunState::Completed);

        s.reset();
        assert_eq!(s.run_state(), RunState::Idle);
        s.start(t0 + ms(3000));
        assert_eq!(s.run_state(), RunState::Running);
    }

    #[test]
    fn reset_restores_a_fresh_session() {
        let t0 = Instant::now();
        let mut s = session("## A - 0:05\n## B - 0:05\n## C - 0:05");
        s.start(t0);
        s.skip(t0);
        s.skip(t0);
        assert_eq!(s.cursor(), 2);

        s.reset();
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.run_state(), RunState::Idle);
        assert!(!s.exercise_completed(0));
        assert!(!s.exercise_completed(1));
        // First exercise reloaded at full duration.
        assert_eq!(s.time_remaining(), 5);
        assert_eq!(s.progress(t0), 0.0);
    }

    #[test]
    fn rest_exercises_run_on_the_timer() {
        let t0 = Instant::now();
        let mut s = session("## A - 0:01\nRest - 0:03");
        s.start(t0);
        s.poll(t0 + ms(1000));
        assert_eq!(s.current().map(|e| e.name.as_str()), Some("Rest"));
        assert_eq!(s.time_remaining(), 3);
        s.poll(t0 + ms(2000));
        assert_eq!(s.time_remaining(), 2);
    }
}
