//! Cooperative cancellation gate for one session.
//!
//! A thin wrapper over [`CancellationToken`]: the flag only ever goes from
//! "running" to "cancelled". Setting it never interrupts a sink call that is
//! already in flight; the relay checks it before dispatching each event.

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct CancellationGate {
    token: CancellationToken,
}

impl CancellationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the gate. Returns `true` if this call did the flipping.
    pub fn cancel(&self) -> bool {
        let first = !self.token.is_cancelled();
        self.token.cancel();
        first
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_monotone() {
        let gate = CancellationGate::new();
        assert!(!gate.is_cancelled());
        assert!(gate.cancel());
        assert!(gate.is_cancelled());
        assert!(!gate.cancel());
        assert!(gate.is_cancelled());
    }
}
