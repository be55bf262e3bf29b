//! Delayed execution of ambiguous matches
//!
//! The scheduler is deadline based: it never sleeps or spawns. The host event
//! loop asks for [`DisambiguationScheduler::deadline`] to know when to wake up
//! and calls [`DisambiguationScheduler::poll`] on every iteration, the same way
//! it expires status messages or blinks the cursor.

use std::time::{Duration, Instant};

/// A resolved command waiting to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExecution {
    pub command: String,
    pub count: Option<u32>,
}

/// The single live timer
#[derive(Debug, Clone)]
pub struct TimerHandle {
    deadline: Instant,
    pending: PendingExecution,
}

impl TimerHandle {
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn pending(&self) -> &PendingExecution {
        &self.pending
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

/// What the caller has to do after [`DisambiguationScheduler::schedule`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheduled {
    /// Zero delay: run the command right away, no timer was started
    FireNow(PendingExecution),
    /// A timer is running until the given instant
    Until(Instant),
}

/// Owns at most one pending delayed execution
#[derive(Debug, Default)]
pub struct DisambiguationScheduler {
    timer: Option<TimerHandle>,
}

impl DisambiguationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrange for `command` to run after `delay_ms`
    ///
    /// Any timer already running is cancelled first.
    pub fn schedule(
        &mut self,
        command: impl Into<String>,
        count: Option<u32>,
        delay_ms: u64,
        now: Instant,
    ) -> Scheduled {
        self.cancel();

        let pending = PendingExecution {
            command: command.into(),
            count,
        };
        if delay_ms == 0 {
            return Scheduled::FireNow(pending);
        }

        let deadline = now + Duration::from_millis(delay_ms);
        tracing::debug!(
            "Scheduling execution of {} in {}ms",
            pending.command,
            delay_ms
        );
        self.timer = Some(TimerHandle { deadline, pending });
        Scheduled::Until(deadline)
    }

    /// Stop the running timer, if any. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        match self.timer.take() {
            Some(_) => {
                tracing::debug!("Stopping delayed execution.");
                true
            }
            None => false,
        }
    }

    /// Take the pending execution once its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<PendingExecution> {
        if !self.timer.as_ref()?.is_expired(now) {
            return None;
        }
        self.timer.take().map(|timer| timer.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.as_ref().map(TimerHandle::deadline)
    }

    pub fn timer(&self) -> Option<&TimerHandle> {
        self.timer.as_ref()
    }
}
