use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Ambient per-call context handed in by the scheduling framework.
#[derive(Debug, Clone)]
pub struct ScoreContext {
    /// Identifies the scheduling cycle in logs.
    pub cycle_id: String,
    pub cancel: CancellationToken,
    pub deadline: Option<Instant>,
}

impl ScoreContext {
    pub fn new() -> Self {
        Self {
            cycle_id: format!("cycle_{}", uuid::Uuid::new_v4()),
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A context sharing the caller's cancellation token.
    pub fn with_cancel(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            ..Self::new()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// The earlier of the ambient deadline and `now + timeout`.
    pub fn effective_deadline(&self, timeout: Option<Duration>) -> Option<Instant> {
        let local = timeout.map(|t| Instant::now() + t);
        match (self.deadline, local) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl Default for ScoreContext {
    fn default() -> Self {
        Self::new()
    }
}
