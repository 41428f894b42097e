//! Idle clock.
//!
//! Pure state machine behind the inactivity sign-out. It never reads the
//! clock itself; every call takes `now`, so the watcher task and the tests
//! drive it the same way.
//!
//! ```text
//! Active --warn_after idle--> Warned --confirm--> Active
//!   |                           |
//!   +--sign_out_after idle--+   +--decline / sign_out_after idle--+
//!                           v                                     v
//!                       SignedOut <-------------------------------+
//! ```
//!
//! While hidden the clock is frozen: no deadlines, and the hidden interval
//! is not counted toward idle time once the page is visible again.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

pub const DEFAULT_WARN_AFTER: Duration = Duration::from_millis(60_000);
pub const DEFAULT_SIGN_OUT_AFTER: Duration = Duration::from_millis(180_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleConfig {
    pub warn_after: Duration,
    pub sign_out_after: Duration,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            warn_after: DEFAULT_WARN_AFTER,
            sign_out_after: DEFAULT_SIGN_OUT_AFTER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdlePhase {
    Active,
    Warned,
    SignedOut,
}

/// What the owner of the clock must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleEvent {
    /// Ask the user whether to stay signed in.
    Prompt,
    /// Force sign-out. Emitted at most once per clock.
    SignOut,
}

#[derive(Debug, Clone)]
pub struct IdleClock {
    config: IdleConfig,
    phase: IdlePhase,
    last_activity: Instant,
    hidden_since: Option<Instant>,
}

impl IdleClock {
    pub fn new(config: IdleConfig, now: Instant) -> Self {
        Self {
            config,
            phase: IdlePhase::Active,
            last_activity: now,
            hidden_since: None,
        }
    }

    pub fn phase(&self) -> IdlePhase {
        self.phase
    }

    pub fn config(&self) -> IdleConfig {
        self.config
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden_since.is_some()
    }

    /// Idle time excluding any interval spent hidden.
    pub fn idle_for(&self, now: Instant) -> Duration {
        let until = self.hidden_since.unwrap_or(now);
        until.saturating_duration_since(self.last_activity)
    }

    /// Pointer, key, touch or scroll input. Ignored while hidden, while the
    /// prompt is open, and after sign-out.
    pub fn record_activity(&mut self, now: Instant) -> bool {
        if self.phase != IdlePhase::Active || self.is_hidden() {
            return false;
        }
        self.last_activity = now;
        true
    }

    pub fn hide(&mut self, now: Instant) {
        if self.hidden_since.is_none() {
            self.hidden_since = Some(now);
        }
    }

    /// Resumes counting from the idle time accumulated before hiding.
    pub fn show(&mut self, now: Instant) {
        if let Some(since) = self.hidden_since.take() {
            self.last_activity += now.saturating_duration_since(since);
        }
    }

    /// "Stay signed in". Only meaningful while the prompt is open.
    pub fn confirm(&mut self, now: Instant) -> bool {
        if self.phase != IdlePhase::Warned {
            return false;
        }
        self.phase = IdlePhase::Active;
        self.last_activity = now;
        true
    }

    /// "Leave", or the prompt was dismissed.
    pub fn decline(&mut self) -> Option<IdleEvent> {
        if self.phase != IdlePhase::Warned {
            return None;
        }
        self.phase = IdlePhase::SignedOut;
        Some(IdleEvent::SignOut)
    }

    /// Applies any threshold crossed by `now`. Sign-out is checked first so a
    /// clock resumed past both thresholds goes straight to `SignedOut`.
    pub fn evaluate(&mut self, now: Instant) -> Option<IdleEvent> {
        if self.phase == IdlePhase::SignedOut || self.is_hidden() {
            return None;
        }
        let idle = self.idle_for(now);
        if idle >= self.config.sign_out_after {
            self.phase = IdlePhase::SignedOut;
            return Some(IdleEvent::SignOut);
        }
        if self.phase == IdlePhase::Active && idle >= self.config.warn_after {
            self.phase = IdlePhase::Warned;
            return Some(IdleEvent::Prompt);
        }
        None
    }

    /// When `evaluate` next needs to run. `None` while hidden or finished.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.is_hidden() {
            return None;
        }
        let sign_out = self.last_activity + self.config.sign_out_after;
        match self.phase {
            IdlePhase::Active => Some(sign_out.min(self.last_activity + self.config.warn_after)),
            IdlePhase::Warned => Some(sign_out),
            IdlePhase::SignedOut => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn clock() -> (IdleClock, Instant) {
        let t0 = Instant::now();
        (IdleClock::new(IdleConfig::default(), t0), t0)
    }

    #[test]
    fn test_nothing_before_warn() {
        let (mut c, t0) = clock();
        assert_eq!(c.evaluate(t0 + DEFAULT_WARN_AFTER - MS), None);
        assert_eq!(c.phase(), IdlePhase::Active);
        assert_eq!(c.next_deadline(), Some(t0 + DEFAULT_WARN_AFTER));
    }

    #[test]
    fn test_warn_then_sign_out_once() {
        let (mut c, t0) = clock();
        assert_eq!(c.evaluate(t0 + DEFAULT_WARN_AFTER), Some(IdleEvent::Prompt));
        assert_eq!(c.phase(), IdlePhase::Warned);
        assert_eq!(c.next_deadline(), Some(t0 + DEFAULT_SIGN_OUT_AFTER));
        assert_eq!(c.evaluate(t0 + DEFAULT_SIGN_OUT_AFTER - MS), None);
        assert_eq!(c.evaluate(t0 + DEFAULT_SIGN_OUT_AFTER), Some(IdleEvent::SignOut));
        assert_eq!(c.evaluate(t0 + DEFAULT_SIGN_OUT_AFTER * 2), None);
        assert_eq!(c.next_deadline(), None);
    }

    #[test]
    fn test_confirm_resets() {
        let (mut c, t0) = clock();
        c.evaluate(t0 + DEFAULT_WARN_AFTER);
        let t1 = t0 + DEFAULT_WARN_AFTER + MS * 500;
        assert!(c.confirm(t1));
        assert_eq!(c.phase(), IdlePhase::Active);
        assert_eq!(c.idle_for(t1), Duration::ZERO);
        assert_eq!(c.evaluate(t1 + DEFAULT_WARN_AFTER - MS), None);
        assert_eq!(c.evaluate(t1 + DEFAULT_WARN_AFTER), Some(IdleEvent::Prompt));
    }

    #[test]
    fn test_decline_signs_out() {
        let (mut c, t0) = clock();
        assert_eq!(c.decline(), None);
        c.evaluate(t0 + DEFAULT_WARN_AFTER);
        assert_eq!(c.decline(), Some(IdleEvent::SignOut));
        assert_eq!(c.decline(), None);
        assert_eq!(c.phase(), IdlePhase::SignedOut);
    }

    #[test]
    fn test_activity_ignored_while_warned() {
        let (mut c, t0) = clock();
        c.evaluate(t0 + DEFAULT_WARN_AFTER);
        assert!(!c.record_activity(t0 + DEFAULT_WARN_AFTER + MS));
        assert_eq!(c.phase(), IdlePhase::Warned);
    }

    #[test]
    fn test_hidden_time_not_counted() {
        let (mut c, t0) = clock();
        let hide_at = t0 + DEFAULT_WARN_AFTER - MS;
        c.hide(hide_at);
        assert_eq!(c.next_deadline(), None);
        let show_at = hide_at + DEFAULT_SIGN_OUT_AFTER * 3;
        assert_eq!(c.evaluate(show_at), None);
        assert!(!c.record_activity(show_at));
        c.show(show_at);
        assert_eq!(c.idle_for(show_at), DEFAULT_WARN_AFTER - MS);
        assert_eq!(c.evaluate(show_at), None);
        assert_eq!(c.evaluate(show_at + MS), Some(IdleEvent::Prompt));
    }

    #[test]
    fn test_resume_past_both_thresholds_signs_out_directly() {
        let config = IdleConfig {
            warn_after: Duration::from_secs(10),
            sign_out_after: Duration::from_secs(20),
        };
        let t0 = Instant::now();
        let mut c = IdleClock::new(config, t0);
        // No evaluation ran while visible (e.g. the task was starved).
        assert_eq!(c.evaluate(t0 + Duration::from_secs(25)), Some(IdleEvent::SignOut));
    }
}
