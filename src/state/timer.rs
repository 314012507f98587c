//! One-slot cancellable phase timer owned by each game.

use tokio::task::AbortHandle;

/// Handle to the single pending phase-advance timer of a game.
///
/// At most one timer is pending per game at any instant: arming a new one
/// always cancels the previous, which makes the invariant structural rather
/// than a convention the callers must uphold. Each armed timer carries the
/// sequence number current at scheduling time; a callback that fires must
/// verify its number still matches under the store lock before mutating, so
/// a cancellation that raced with the firing still wins.
#[derive(Debug, Default)]
pub struct PhaseTimer {
    seq: u64,
    handle: Option<AbortHandle>,
}

impl PhaseTimer {
    /// Cancel the pending timer, if any.
    ///
    /// Idempotent: cancelling an already-fired, already-cancelled, or
    /// never-armed slot is a no-op. Bumping the sequence number invalidates
    /// any callback that already left its sleep but has not yet mutated.
    pub fn cancel(&mut self) {
        self.seq = self.seq.wrapping_add(1);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Clear the slot without aborting the task.
    ///
    /// For a fired timer clearing itself from within its own callback:
    /// aborting there would cancel the callback task mid-flight.
    pub fn disarm(&mut self) {
        self.seq = self.seq.wrapping_add(1);
        self.handle = None;
    }

    /// Sequence number identifying the timer armed next.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Whether `seq` still identifies the currently armed timer.
    pub fn matches(&self, seq: u64) -> bool {
        self.seq == seq
    }

    /// Place a freshly spawned timer task into the slot.
    ///
    /// Callers must [`cancel`](Self::cancel) first and spawn the task with
    /// the sequence number read afterwards.
    pub fn arm(&mut self, handle: AbortHandle) {
        self.handle = Some(handle);
    }
}
