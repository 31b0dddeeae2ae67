//! Debounced rebuild triggering.
//!
//! A single-slot state machine: any filesystem event re-arms the deadline
//! to `now + quiet`, superseding an earlier one; when the deadline passes
//! the machine returns to idle and the caller runs exactly one rebuild.
//! Event payloads are never inspected.

use std::time::{Duration, Instant};

/// Debouncer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// No rebuild scheduled.
    Idle,

    /// A rebuild fires once `deadline` passes, unless superseded first.
    Pending { deadline: Instant },
}

/// Pure debouncer: only timing, no business logic.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    state: DebounceState,
}

impl Debouncer {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            state: DebounceState::Idle,
        }
    }

    /// Record a filesystem event, re-arming the deadline.
    pub fn on_event(&mut self, now: Instant) {
        self.state = DebounceState::Pending {
            deadline: now + self.quiet,
        };
    }

    /// The armed deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Idle => None,
            DebounceState::Pending { deadline } => Some(deadline),
        }
    }

    /// If the deadline has passed, return to idle and report that the
    /// batch callback should run.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.state {
            DebounceState::Pending { deadline } if now >= deadline => {
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(100);

    #[test]
    fn test_burst_of_events_fires_once() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);

        // Five events, 10ms apart: all inside one quiet window.
        let mut last = start;
        for i in 0..5 {
            last = start + Duration::from_millis(10 * i);
            debouncer.on_event(last);
        }

        // Not due before the quiet period after the LAST event.
        assert!(!debouncer.fire_due(last + QUIET - Duration::from_millis(1)));
        assert_eq!(debouncer.deadline(), Some(last + QUIET));

        // Due exactly at the deadline, and only once.
        assert!(debouncer.fire_due(last + QUIET));
        assert!(!debouncer.fire_due(last + QUIET * 2));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_separated_events_fire_twice() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);

        debouncer.on_event(start);
        assert!(debouncer.fire_due(start + QUIET));

        let second = start + QUIET * 3;
        debouncer.on_event(second);
        assert!(debouncer.fire_due(second + QUIET));
    }

    #[test]
    fn test_event_supersedes_pending_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);

        debouncer.on_event(start);
        let rearm = start + Duration::from_millis(50);
        debouncer.on_event(rearm);

        // The original deadline no longer fires.
        assert!(!debouncer.fire_due(start + QUIET));
        assert!(debouncer.fire_due(rearm + QUIET));
    }

    #[test]
    fn test_idle_never_fires() {
        let mut debouncer = Debouncer::new(QUIET);

        assert_eq!(debouncer.deadline(), None);
        assert!(!debouncer.fire_due(Instant::now() + QUIET * 10));
    }
}
