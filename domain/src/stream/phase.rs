//! Session lifecycle phases.

use serde::{Deserialize, Serialize};

/// Lifecycle of a relayed session.
///
/// `Starting → Streaming → Finalizing → Closed`, never backwards.
/// Cancellation is tracked separately and does not change the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Initial status message sent, no events yet.
    #[default]
    Starting,
    /// At least one event has been dispatched.
    Streaming,
    /// `finalize` is running.
    Finalizing,
    /// Finalized and removed from the registry.
    Closed,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Starting => "starting",
            SessionPhase::Streaming => "streaming",
            SessionPhase::Finalizing => "finalizing",
            SessionPhase::Closed => "closed",
        }
    }

    /// Whether events may still be dispatched in this phase.
    pub fn accepts_events(&self) -> bool {
        matches!(self, SessionPhase::Starting | SessionPhase::Streaming)
    }

    pub fn can_transition_to(&self, next: SessionPhase) -> bool {
        use SessionPhase::*;
        matches!(
            (self, next),
            (Starting, Streaming)
                | (Starting, Finalizing)
                | (Streaming, Finalizing)
                | (Finalizing, Closed)
        )
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
