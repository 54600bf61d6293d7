use std::sync::Mutex;
use std::time::Duration;

use serde::Deserialize;
use tokio::time::Instant;

/// Source of "now" for scheduled transitions.
pub trait Clock: std::fmt::Debug + Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by tokio, so paused test runtimes are honoured as well.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A transition scheduled for later. Dropping it cancels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled<T> {
    due: Instant,
    task: T,
}

impl<T: Copy> Scheduled<T> {
    pub fn new(now: Instant, delay: Duration, task: T) -> Self {
        Self {
            due: now + delay,
            task,
        }
    }

    pub fn due(&self) -> Instant {
        self.due
    }

    pub fn task(&self) -> T {
        self.task
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }
}

/// Takes the scheduled task out of `slot` if it is due at `now`.
pub fn take_due<T: Copy>(slot: &mut Option<Scheduled<T>>, now: Instant) -> Option<T> {
    match slot {
        Some(scheduled) if scheduled.is_due(now) => slot.take().map(|s| s.task()),
        _ => None,
    }
}

/// Delays applied between a user action and the transition it causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Timing {
    #[serde(default = "default_answer_advance_ms")]
    answer_advance_ms: u64,
    #[serde(default = "default_minigame_exit_ms")]
    minigame_exit_ms: u64,
}

fn default_answer_advance_ms() -> u64 {
    1500
}

fn default_minigame_exit_ms() -> u64 {
    2000
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            answer_advance_ms: default_answer_advance_ms(),
            minigame_exit_ms: default_minigame_exit_ms(),
        }
    }
}

impl Timing {
    pub fn new(answer_advance: Duration, minigame_exit: Duration) -> Self {
        Self {
            answer_advance_ms: answer_advance.as_millis() as u64,
            minigame_exit_ms: minigame_exit.as_millis() as u64,
        }
    }

    /// No delays at all; scheduled transitions fire on the next poll.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    #[inline]
    pub fn answer_advance(&self) -> Duration {
        Duration::from_millis(self.answer_advance_ms)
    }

    #[inline]
    pub fn minigame_exit(&self) -> Duration {
        Duration::from_millis(self.minigame_exit_ms)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_take_due_fires_once() {
        let start = Instant::now();
        let mut slot = Some(Scheduled::new(start, Duration::from_millis(100), 7u8));

        assert_eq!(take_due(&mut slot, start), None);
        assert!(slot.is_some());

        let later = start + Duration::from_millis(100);
        assert_eq!(take_due(&mut slot, later), Some(7));
        assert_eq!(take_due(&mut slot, later), None);
        assert!(slot.is_none());
    }

    #[test]
    fn test_manual_clock_moves_only_when_advanced() {
        let clock = ManualClock::new();
        let before = clock.now();
        assert_eq!(clock.now(), before);

        clock.advance(Duration::from_secs(2));
        assert_eq!(clock.now(), before + Duration::from_secs(2));
    }

    #[test]
    fn test_timing_defaults_from_toml() {
        let timing: Timing = toml::from_str("answer_advance_ms = 10").unwrap();
        assert_eq!(timing.answer_advance(), Duration::from_millis(10));
        assert_eq!(timing.minigame_exit(), Duration::from_millis(2000));
    }
}
