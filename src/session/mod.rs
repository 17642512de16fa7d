//! A typing run against one reference text: phase transitions, the typed
//! buffer, and the countdown.

pub mod projector;
pub mod rank;
pub mod stats;

use std::time::Instant;

use crate::session::projector::{Projection, project};
use crate::session::stats::{StatsSnapshot, compute_stats};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// Which condition ends a run automatically. Exactly one policy is active;
/// selected from config.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FinishPolicy {
    /// Run ends when the countdown reaches zero.
    #[default]
    Countdown,
    /// Run ends when the typed buffer reaches the reference length.
    Complete,
}

/// One attempt at typing one reference text.
///
/// Invalid transitions (starting with no reference, finishing twice, typing
/// after finish) are silent no-ops, never errors. The reference is replaced
/// wholesale by [`Session::load`]; it is never edited in place.
pub struct Session {
    phase: Phase,
    identifier: Option<String>,
    reference: Vec<char>,
    typed: Vec<char>,
    started_at: Option<Instant>,
    countdown_total: u32,
    remaining_secs: f64,
    policy: FinishPolicy,
    final_elapsed: f64,
    final_stats: Option<StatsSnapshot>,
}

impl Session {
    pub fn new(countdown_total: u32, policy: FinishPolicy) -> Self {
        Self {
            phase: Phase::Idle,
            identifier: None,
            reference: Vec::new(),
            typed: Vec::new(),
            started_at: None,
            countdown_total,
            remaining_secs: countdown_total as f64,
            policy,
            final_elapsed: 0.0,
            final_stats: None,
        }
    }

    /// Replace the loaded reference text and return to a fresh idle state.
    pub fn load(&mut self, identifier: &str, text: &str) {
        self.identifier = Some(identifier.to_string());
        self.reference = text.chars().collect();
        self.reset(true);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn reference(&self) -> &[char] {
        &self.reference
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn line_count(&self) -> usize {
        if self.reference.is_empty() {
            0
        } else {
            1 + self.reference.iter().filter(|&&c| c == '\n').count()
        }
    }

    pub fn countdown_total(&self) -> u32 {
        self.countdown_total
    }

    pub fn remaining_secs(&self) -> f64 {
        self.remaining_secs
    }

    /// Change the countdown duration. Only honored while idle so a running
    /// clock cannot be stretched mid-run.
    pub fn set_countdown(&mut self, secs: u32) {
        if self.phase == Phase::Idle {
            self.countdown_total = secs;
            self.remaining_secs = secs as f64;
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        match self.phase {
            Phase::Finished => self.final_elapsed,
            _ => self
                .started_at
                .map(|s| s.elapsed().as_secs_f64())
                .unwrap_or(0.0),
        }
    }

    /// Idle -> Running. A no-op without a loaded, non-empty reference.
    pub fn start(&mut self) {
        if self.phase != Phase::Idle || self.reference.is_empty() {
            return;
        }
        self.phase = Phase::Running;
        self.started_at = Some(Instant::now());
        self.remaining_secs = self.countdown_total as f64;
    }

    /// Append one character to the typed buffer. The first character of an
    /// idle session starts the clock. The buffer is frozen once finished.
    pub fn type_char(&mut self, ch: char) {
        if self.phase == Phase::Idle {
            self.start();
        }
        if self.phase != Phase::Running {
            return;
        }
        self.typed.push(ch);
        if self.policy == FinishPolicy::Complete && self.typed.len() >= self.reference.len() {
            self.finish();
        }
    }

    pub fn backspace(&mut self) {
        if self.phase == Phase::Running {
            self.typed.pop();
        }
    }

    /// Periodic update while running: refresh the countdown and auto-finish
    /// when it expires. Phase guards make a tick delivered after finish or
    /// reset harmless.
    pub fn tick(&mut self) {
        let elapsed = self.elapsed_secs();
        self.tick_at(elapsed);
    }

    /// [`Session::tick`] with an explicit elapsed reading, split out so
    /// tests can drive the countdown without sleeping.
    pub fn tick_at(&mut self, elapsed_secs: f64) {
        if self.phase != Phase::Running {
            return;
        }
        self.remaining_secs = (self.countdown_total as f64 - elapsed_secs).max(0.0);
        if self.policy == FinishPolicy::Countdown && self.remaining_secs <= 0.0 {
            self.finish_at(elapsed_secs);
        }
    }

    /// Running -> Finished. Returns whether the transition happened, so the
    /// caller records the result exactly once. Finishing twice is a no-op.
    pub fn finish(&mut self) -> bool {
        let elapsed = self.elapsed_secs();
        self.finish_at(elapsed)
    }

    fn finish_at(&mut self, elapsed_secs: f64) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.phase = Phase::Finished;
        self.final_elapsed = elapsed_secs;
        self.final_stats = Some(compute_stats(&self.typed, &self.reference, elapsed_secs));
        true
    }

    /// Return to idle, clearing the typed buffer and clock. With
    /// `keep_reference: false` the loaded text and identifier are dropped
    /// too, leaving nothing to type against.
    pub fn reset(&mut self, keep_reference: bool) {
        self.phase = Phase::Idle;
        self.typed.clear();
        self.started_at = None;
        self.final_elapsed = 0.0;
        self.final_stats = None;
        self.remaining_secs = self.countdown_total as f64;
        if !keep_reference {
            self.reference.clear();
            self.identifier = None;
        }
    }

    /// Current metrics. After finish this returns the frozen final snapshot
    /// rather than recomputing against a still-advancing clock.
    pub fn stats(&self) -> StatsSnapshot {
        match (self.phase, self.final_stats) {
            (Phase::Finished, Some(frozen)) => frozen,
            _ => compute_stats(&self.typed, &self.reference, self.elapsed_secs()),
        }
    }

    pub fn projection(&self) -> Projection {
        project(&self.typed, &self.reference, self.phase == Phase::Finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(text: &str) -> Session {
        let mut session = Session::new(60, FinishPolicy::Countdown);
        session.load("lab/main.cpp", text);
        session
    }

    #[test]
    fn starts_idle_with_no_reference() {
        let session = Session::new(60, FinishPolicy::Countdown);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.identifier().is_none());
    }

    #[test]
    fn start_without_reference_is_a_noop() {
        let mut session = Session::new(60, FinishPolicy::Countdown);
        session.start();
        assert_eq!(session.phase(), Phase::Idle);
        // Typing with no reference must not start the clock either.
        session.type_char('a');
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.typed().is_empty());
    }

    #[test]
    fn first_typed_char_starts_the_run() {
        let mut session = loaded("abc");
        assert_eq!(session.phase(), Phase::Idle);
        session.type_char('a');
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.typed(), ['a']);
    }

    #[test]
    fn backspace_only_edits_a_running_session() {
        let mut session = loaded("abc");
        session.backspace();
        assert!(session.typed().is_empty());
        session.type_char('a');
        session.type_char('b');
        session.backspace();
        assert_eq!(session.typed(), ['a']);
    }

    #[test]
    fn finish_freezes_the_buffer_and_stats() {
        let mut session = loaded("abc");
        session.type_char('a');
        assert!(session.finish());
        assert_eq!(session.phase(), Phase::Finished);

        session.type_char('b');
        session.backspace();
        assert_eq!(session.typed(), ['a']);

        let frozen = session.stats();
        assert_eq!(frozen.typed_len, 1);
        assert_eq!(session.stats(), frozen);
    }

    #[test]
    fn finish_is_idempotent() {
        let mut session = loaded("abc");
        session.type_char('a');
        assert!(session.finish());
        assert!(!session.finish());
        assert_eq!(session.phase(), Phase::Finished);
    }

    #[test]
    fn finish_from_idle_is_a_noop() {
        let mut session = loaded("abc");
        assert!(!session.finish());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn countdown_expiry_finishes_the_run() {
        let mut session = loaded("abc");
        session.type_char('a');
        session.tick_at(59.0);
        assert_eq!(session.phase(), Phase::Running);
        assert!((session.remaining_secs() - 1.0).abs() < 1e-9);

        session.tick_at(60.0);
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.remaining_secs(), 0.0);
        assert!((session.elapsed_secs() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn stale_tick_after_finish_is_harmless() {
        let mut session = loaded("abc");
        session.type_char('a');
        session.finish();
        let frozen = session.stats();
        session.tick_at(120.0);
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.stats(), frozen);
    }

    #[test]
    fn countdown_policy_allows_typing_past_the_reference() {
        let mut session = loaded("ab");
        for ch in "abXY".chars() {
            session.type_char(ch);
        }
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.stats().incorrect, 2);
    }

    #[test]
    fn complete_policy_finishes_at_reference_length() {
        let mut session = Session::new(60, FinishPolicy::Complete);
        session.load("lab/main.cpp", "ab");
        session.type_char('a');
        assert_eq!(session.phase(), Phase::Running);
        session.type_char('b');
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.stats().correct, 2);
    }

    #[test]
    fn reset_keeping_reference_allows_a_new_run() {
        let mut session = loaded("abc");
        session.type_char('a');
        session.finish();

        session.reset(true);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.typed().is_empty());
        assert_eq!(session.identifier(), Some("lab/main.cpp"));
        assert_eq!(session.reference().len(), 3);

        session.type_char('a');
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn reset_dropping_reference_disables_typing() {
        let mut session = loaded("abc");
        session.type_char('a');
        session.reset(false);
        assert!(session.identifier().is_none());
        assert!(session.reference().is_empty());

        session.type_char('a');
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.typed().is_empty());
    }

    #[test]
    fn reset_restores_zero_state_stats() {
        let mut session = loaded("abc");
        session.type_char('x');
        session.reset(true);
        let stats = session.stats();
        assert_eq!(stats.typed_len, 0);
        assert_eq!(stats.accuracy, 100.0);
        assert_eq!(stats.error_rate, 0.0);
        assert_eq!(stats.progress, 0.0);
        assert!((session.remaining_secs() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn set_countdown_ignored_while_running() {
        let mut session = loaded("abc");
        session.set_countdown(120);
        assert_eq!(session.countdown_total(), 120);
        session.type_char('a');
        session.set_countdown(300);
        assert_eq!(session.countdown_total(), 120);
    }

    #[test]
    fn line_count_matches_newlines() {
        assert_eq!(loaded("a\nb\nc").line_count(), 3);
        assert_eq!(loaded("abc").line_count(), 1);
        let session = Session::new(60, FinishPolicy::Countdown);
        assert_eq!(session.line_count(), 0);
    }
}
